//! The declaration pass: finds every module declaration and records its name,
//! ports and parameters in the [`Table`].
//!
//! Port and parameter extraction is best effort. Shapes that aren't
//! recognized are left out of the signature rather than reported.

use hdlgraph_handler::{Handler, Storage};
use hdlgraph_tree::{FileID, Forest, NodeID};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    diagnostic::{
        Diagnostic, MissingModuleHeader, MissingModuleName, ModuleRedefinition,
    },
    symbol::{DataType, Direction, Module, Parameter, Port, Range},
    table::{Collision, Table},
    tag,
};

/// Subtrees that never contain the declared name of a port or parameter.
const NOT_A_NAME: &[&str] = &[
    tag::DATA_TYPE,
    tag::PACKED_DIMENSIONS,
    tag::UNPACKED_DIMENSIONS,
    tag::TRAILING_ASSIGN,
];

/// Subtrees that never contain the type keyword of a port or parameter.
const NOT_A_TYPE: &[&str] = &[
    tag::PACKED_DIMENSIONS,
    tag::UNPACKED_DIMENSIONS,
    tag::TRAILING_ASSIGN,
];

/// Runs the declaration pass over every file of the forest.
///
/// Files are extracted concurrently, then inserted into the table one file
/// at a time in forest order, so that which declaration wins a name
/// collision doesn't depend on scheduling. The diagnostics of each file are
/// held back until its turn to keep their order stable as well.
pub fn declare(
    forest: &Forest,
    table: &mut Table,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) {
    let files = forest.files().map(|(id, _)| id).collect::<Vec<_>>();

    let extracted = files
        .into_par_iter()
        .map(|file| {
            let storage = Storage::<Box<dyn Diagnostic>>::new();
            let modules = extract_file(forest, file, &storage);

            (modules, storage)
        })
        .collect::<Vec<_>>();

    for (modules, storage) in extracted {
        storage.propagate(handler);

        for module in modules {
            insert(forest, table, module, handler);
        }
    }

    log::info!("symbol table size: {}", table.len());
}

/// Runs the declaration pass over a single file, inserting each module as
/// soon as it's extracted.
pub fn declare_file(
    forest: &Forest,
    file: FileID,
    table: &mut Table,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) {
    let Some(root) = forest.file(file).root() else { return };

    for declaration in forest.pre_order(root) {
        if !forest.has_tag(declaration, tag::MODULE_DECLARATION) {
            continue;
        }

        if let Some(module) =
            extract_module(forest, file, declaration, handler)
        {
            insert(forest, table, module, handler);
        }
    }
}

/// Extracts every module declared in the file, in pre-order.
///
/// Module declarations nested inside another declaration are extracted as
/// well.
#[must_use]
pub fn extract_file(
    forest: &Forest,
    file: FileID,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) -> Vec<Module> {
    let Some(root) = forest.file(file).root() else {
        return Vec::new();
    };

    let mut declarations = Vec::new();
    forest.collect_all(root, tag::MODULE_DECLARATION, &mut declarations);

    declarations
        .into_iter()
        .filter_map(|declaration| {
            extract_module(forest, file, declaration, handler)
        })
        .collect()
}

fn insert(
    forest: &Forest,
    table: &mut Table,
    module: Module,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) {
    log::debug!(
        "{}: declared module `{}`",
        forest.file(module.source_file()).path().display(),
        module.name()
    );

    if let Err(Collision { existing, rejected }) = table.insert(module) {
        let existing = &table[existing];
        let rejected = *rejected;

        handler.receive(Box::new(ModuleRedefinition {
            name: rejected.name,
            existing_file: existing.source_file(),
            existing_declaration: existing.declaration(),
            file: rejected.source_file,
            declaration: rejected.declaration,
        }));
    }
}

/// Extracts a single module declaration.
///
/// Returns `None`, after reporting why, if the declaration has no header or
/// the header doesn't name the module.
#[must_use]
pub fn extract_module(
    forest: &Forest,
    file: FileID,
    declaration: NodeID,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) -> Option<Module> {
    let Some(header) = forest.find_first(declaration, tag::MODULE_HEADER)
    else {
        handler.receive(Box::new(MissingModuleHeader { file, declaration }));
        return None;
    };

    let mut name = None;
    let mut ports = Vec::new();
    let mut parameters = Vec::new();

    for child in forest.present_children(header) {
        match forest.tag_of(child) {
            tag::IDENTIFIER | tag::ESCAPED_IDENTIFIER if name.is_none() => {
                name = forest.text_of(child).map(ToOwned::to_owned);
            }

            tag::FORMAL_PARAMETER_LIST_DECLARATION => {
                parameters.extend(extract_parameters(forest, child));
            }

            tag::PAREN_GROUP => ports.extend(extract_ports(forest, child)),

            _ => {}
        }
    }

    let Some(name) = name else {
        handler.receive(Box::new(MissingModuleName { file, declaration }));
        return None;
    };

    let mut module = Module::new(name, file, declaration);
    module.ports = ports;
    module.parameters = parameters;

    Some(module)
}

fn extract_ports(forest: &Forest, group: NodeID) -> Vec<Port> {
    // non-ANSI headers list bare names here; their directions are declared
    // in the body and aren't extracted
    let Some(list) = forest.find_first(group, tag::PORT_DECLARATION_LIST)
    else {
        return Vec::new();
    };

    let mut declarations = Vec::new();
    forest.collect_all(list, tag::PORT_DECLARATION, &mut declarations);

    let mut ports = Vec::<Port>::with_capacity(declarations.len());
    let mut direction = Direction::Inout;

    for declaration in declarations {
        let explicit = direction_of(forest, declaration);
        if let Some(explicit) = explicit {
            direction = explicit;
        }

        let Some(name) = declared_name(forest, declaration) else {
            log::debug!("skipping a port declaration without a name");
            continue;
        };

        let mut data_type = data_type_of(forest, declaration);
        let mut packed = forest
            .find_first(declaration, tag::PACKED_DIMENSIONS)
            .and_then(|x| range_of(forest, x));

        // a port that only names itself continues the previous port's
        // direction, type and packed dimensions
        if explicit.is_none() && data_type.is_implicit() && packed.is_none() {
            if let Some(previous) = ports.last() {
                data_type = previous.data_type.clone();
                packed = previous.packed.clone();
            }
        }

        ports.push(Port {
            name,
            direction,
            data_type,
            packed,
            unpacked: forest
                .find_first(declaration, tag::UNPACKED_DIMENSIONS)
                .and_then(|x| range_of(forest, x)),
            node: declaration,
        });
    }

    ports
}

fn extract_parameters(forest: &Forest, list: NodeID) -> Vec<Parameter> {
    let mut declarations = Vec::new();
    forest.collect_all(list, tag::PARAM_DECLARATION, &mut declarations);

    declarations
        .into_iter()
        .filter_map(|declaration| {
            let Some(name) = declared_name(forest, declaration) else {
                log::debug!("skipping a parameter declaration without a name");
                return None;
            };

            Some(Parameter {
                name,
                default_value: forest
                    .find_first(declaration, tag::TRAILING_ASSIGN)
                    .map(|x| assigned_text(forest, x)),
                data_type: data_type_of(forest, declaration),
                node: declaration,
            })
        })
        .collect()
}

fn direction_of(forest: &Forest, declaration: NodeID) -> Option<Direction> {
    forest
        .present_children(declaration)
        .find_map(|x| forest.tag_of(x).parse().ok())
}

/// The declared name: the last identifier outside of the type, the
/// dimensions and the default value. Falls back to looking inside the type
/// for declarations that wrap their name in it.
fn declared_name(forest: &Forest, declaration: NodeID) -> Option<String> {
    let last_identifier = |pruned| {
        forest
            .pre_order_pruned(declaration, pruned)
            .filter_map(|x| forest.identifier_text(x))
            .last()
    };

    last_identifier(NOT_A_NAME)
        .or_else(|| last_identifier(NOT_A_TYPE))
        .map(ToOwned::to_owned)
}

/// The first built-in type keyword of the declaration; otherwise the
/// identifier of a user-defined type, otherwise [`DataType::Implicit`].
fn data_type_of(forest: &Forest, declaration: NodeID) -> DataType {
    let keyword = forest
        .pre_order_pruned(declaration, NOT_A_TYPE)
        .filter(|x| forest.identifier_text(*x).is_none())
        .find_map(|x| forest.text_of(x)?.parse::<DataType>().ok());

    if let Some(keyword) = keyword {
        return keyword;
    }

    forest
        .find_first(declaration, tag::DATA_TYPE)
        .and_then(|data_type| {
            forest
                .pre_order_pruned(data_type, NOT_A_TYPE)
                .find_map(|x| forest.identifier_text(x))
        })
        .map_or(DataType::Implicit, |name| DataType::Named(name.to_owned()))
}

/// Splits the first `[msb:lsb]` of the dimensions at the colon.
fn range_of(forest: &Forest, dimensions: NodeID) -> Option<Range> {
    let range = forest.find_first(dimensions, tag::DIMENSION_RANGE)?;
    let children = forest.present_children(range).collect::<Vec<_>>();
    let colon = children.iter().position(|x| forest.has_tag(*x, ":"))?;

    let text = |nodes: &[NodeID]| {
        nodes
            .iter()
            .filter(|x| !forest.has_tag(**x, "[") && !forest.has_tag(**x, "]"))
            .map(|x| forest.source_text(*x))
            .collect::<String>()
    };

    Some(Range::new(text(&children[..colon]), text(&children[colon + 1..])))
}

/// The source text of `= <expression>` without the `=`.
fn assigned_text(forest: &Forest, assign: NodeID) -> String {
    forest
        .present_children(assign)
        .filter(|x| !forest.has_tag(*x, "="))
        .map(|x| forest.source_text(x))
        .collect()
}

#[cfg(test)]
mod test;
