//! The instantiation pass: links every module to the modules it
//! instantiates.
//!
//! Must run after the declaration pass has seen every file, since a module
//! may be instantiated before (or in another file than) its declaration.

use hdlgraph_handler::{Handler, Storage};
use hdlgraph_tree::{Forest, NodeID};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    diagnostic::{
        Diagnostic, MalformedInstantiation, MalformedInstantiationKind,
    },
    symbol::{DataType, Instance, ModuleID},
    table::Table,
    tag,
};

/// Runs the instantiation pass over every module of the table.
///
/// The declaration subtrees are scanned concurrently; the edges and the
/// diagnostics are then handed over on the calling thread in module order,
/// followed by site order within each module.
pub fn resolve_instantiations(
    forest: &Forest,
    table: &mut Table,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) {
    let modules = table.modules().map(|(id, _)| id).collect::<Vec<_>>();

    let resolved = {
        let table = &*table;

        modules
            .into_par_iter()
            .map(|id| {
                let storage = Storage::<Box<dyn Diagnostic>>::new();
                let instances = scan_module(forest, table, id, &storage);

                (id, instances, storage)
            })
            .collect::<Vec<_>>()
    };

    let mut edges = 0;
    for (instantiator, instances, storage) in resolved {
        storage.propagate(handler);
        edges += instances.len();

        for instance in instances {
            table.link(instantiator, instance);
        }
    }

    log::info!("resolved {edges} instantiation(s)");
}

/// Resolves every instantiation site below the declaration of the module.
///
/// Returns the resolved instances in pre-order. Unresolved targets are
/// dropped without a diagnostic; they usually name primitives or modules
/// that were not part of the input.
#[must_use]
pub fn scan_module(
    forest: &Forest,
    table: &Table,
    id: ModuleID,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) -> Vec<Instance> {
    let module = &table[id];

    let mut sites = Vec::new();
    forest.collect_all(
        module.declaration(),
        tag::INSTANTIATION_BASE,
        &mut sites,
    );

    let mut instances = Vec::new();

    for site in sites {
        let (target, name) = match read_site(forest, site) {
            Ok(Some(names)) => names,
            Ok(None) => continue,
            Err(kind) => {
                handler.receive(Box::new(MalformedInstantiation {
                    module_name: module.name().clone(),
                    file: module.source_file(),
                    site,
                    kind,
                }));
                continue;
            }
        };

        let Some(target) = table.lookup(target) else {
            log::debug!(
                "{}: `{}` instantiates unknown module `{target}` as `{name}`",
                forest.file(module.source_file()).path().display(),
                module.name(),
            );
            continue;
        };

        instances.push(Instance {
            name: name.to_owned(),
            module: target,
            node: site,
        });
    }

    instances
}

/// Reads the target module name and the instance name of a site.
///
/// Returns `Ok(None)` for variable declarations, which share the shape of an
/// instantiation but name a built-in type instead of a module.
fn read_site(
    forest: &Forest,
    site: NodeID,
) -> Result<Option<(&str, &str)>, MalformedInstantiationKind> {
    let instantiation_type = forest
        .find_first(site, tag::INSTANTIATION_TYPE)
        .ok_or(MalformedInstantiationKind::MissingInstantiationType)?;

    let Some(target) = forest
        .find_identifier(instantiation_type)
        .and_then(|x| forest.identifier_text(x))
    else {
        return if declares_variable(forest, instantiation_type) {
            Ok(None)
        } else {
            Err(MalformedInstantiationKind::MissingTypeName)
        };
    };

    let instance_list = forest
        .find_first(site, tag::GATE_INSTANCE_REGISTER_VARIABLE_LIST)
        .ok_or(MalformedInstantiationKind::MissingInstanceList)?;

    let name = forest
        .find_identifier(instance_list)
        .and_then(|x| forest.identifier_text(x))
        .ok_or(MalformedInstantiationKind::MissingInstanceName)?;

    Ok(Some((target, name)))
}

fn declares_variable(forest: &Forest, instantiation_type: NodeID) -> bool {
    forest.pre_order(instantiation_type).any(|x| {
        forest.text_of(x).is_some_and(|text| text.parse::<DataType>().is_ok())
    })
}
