//! Contains the diagnostics reported while building the module graph.
//!
//! None of them is fatal: the offending declaration or instantiation is
//! skipped and the analysis carries on with the rest of the project.

use std::{any::Any, fmt::Debug};

use hdlgraph_diagnostic::{
    Diagnostic as DiagnosticReport, Highlight, Report, Severity,
};
use hdlgraph_tree::{FileID, Forest, NodeID};

/// Implemented by all diagnostic objects.
pub trait Diagnostic:
    for<'a> Report<&'a Forest> + Debug + Any + Send + Sync + 'static
{
    #[allow(missing_docs)]
    fn as_any(&self) -> &dyn Any;
}

impl<U: for<'a> Report<&'a Forest> + Debug + Any + Send + Sync + 'static>
    Diagnostic for U
{
    fn as_any(&self) -> &dyn Any { self }
}

impl<U: for<'a> Report<&'a Forest> + Debug + Any + Send + Sync + 'static>
    From<U> for Box<dyn Diagnostic>
{
    fn from(value: U) -> Self { Box::new(value) }
}

fn highlight(
    forest: &Forest,
    file: FileID,
    node: NodeID,
    message: Option<String>,
) -> Highlight {
    Highlight::new(
        forest.file(file).path().clone(),
        forest.extent_of(node),
        message,
    )
}

/// A module declaration without a `kModuleHeader`. The declaration is
/// skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MissingModuleHeader {
    /// The file containing the declaration.
    pub file: FileID,

    /// The `kModuleDeclaration` node.
    pub declaration: NodeID,
}

impl Report<&Forest> for MissingModuleHeader {
    fn report(&self, forest: &Forest) -> DiagnosticReport {
        DiagnosticReport {
            primary_highlight: Some(highlight(
                forest,
                self.file,
                self.declaration,
                None,
            )),
            message: "could not find the header of the module declaration"
                .to_owned(),
            severity: Severity::Warning,
            help_message: Some(
                "the declaration is skipped; it won't appear in the module \
                 graph"
                    .to_owned(),
            ),
            related: Vec::new(),
        }
    }
}

/// A module header without an identifier naming the module. The declaration
/// is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MissingModuleName {
    /// The file containing the declaration.
    pub file: FileID,

    /// The `kModuleDeclaration` node.
    pub declaration: NodeID,
}

impl Report<&Forest> for MissingModuleName {
    fn report(&self, forest: &Forest) -> DiagnosticReport {
        DiagnosticReport {
            primary_highlight: Some(highlight(
                forest,
                self.file,
                self.declaration,
                None,
            )),
            message: "could not find the name of the module declaration"
                .to_owned(),
            severity: Severity::Warning,
            help_message: Some(
                "the declaration is skipped; it won't appear in the module \
                 graph"
                    .to_owned(),
            ),
            related: Vec::new(),
        }
    }
}

/// A second declaration of an already declared module name. The second
/// declaration is rejected; the first one stays.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleRedefinition {
    /// The contested module name.
    pub name: String,

    /// The file of the declaration that keeps the name.
    pub existing_file: FileID,

    /// The declaration that keeps the name.
    pub existing_declaration: NodeID,

    /// The file of the rejected declaration.
    pub file: FileID,

    /// The rejected declaration.
    pub declaration: NodeID,
}

impl Report<&Forest> for ModuleRedefinition {
    fn report(&self, forest: &Forest) -> DiagnosticReport {
        DiagnosticReport {
            primary_highlight: Some(highlight(
                forest,
                self.file,
                self.declaration,
                None,
            )),
            message: format!("the module `{}` is already declared", self.name),
            severity: Severity::Warning,
            help_message: Some(
                "this declaration is ignored in favor of the first one"
                    .to_owned(),
            ),
            related: vec![highlight(
                forest,
                self.existing_file,
                self.existing_declaration,
                Some("first declared here".to_owned()),
            )],
        }
    }
}

/// What is missing from a malformed instantiation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::EnumIter,
)]
pub enum MalformedInstantiationKind {
    /// No `kInstantiationType` below the instantiation.
    MissingInstantiationType,

    /// No identifier naming the instantiated module.
    MissingTypeName,

    /// No `kGateInstanceRegisterVariableList` below the instantiation.
    MissingInstanceList,

    /// No identifier naming the instance.
    MissingInstanceName,
}

impl MalformedInstantiationKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::MissingInstantiationType => {
                "could not find the type of the instantiation"
            }
            Self::MissingTypeName => {
                "could not find the name of the instantiated module"
            }
            Self::MissingInstanceList => {
                "could not find the instance list of the instantiation"
            }
            Self::MissingInstanceName => {
                "could not find the name of the instance"
            }
        }
    }
}

/// An instantiation site that could not be understood. Only that site is
/// skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MalformedInstantiation {
    /// The name of the module containing the site.
    pub module_name: String,

    /// The file containing the site.
    pub file: FileID,

    /// The `kInstantiationBase` node.
    pub site: NodeID,

    /// What is missing.
    pub kind: MalformedInstantiationKind,
}

impl Report<&Forest> for MalformedInstantiation {
    fn report(&self, forest: &Forest) -> DiagnosticReport {
        DiagnosticReport {
            primary_highlight: Some(highlight(
                forest,
                self.file,
                self.site,
                None,
            )),
            message: format!(
                "{} in module `{}`",
                self.kind.describe(),
                self.module_name
            ),
            severity: Severity::Warning,
            help_message: Some(
                "the instantiation is skipped; no edge is recorded for it"
                    .to_owned(),
            ),
            related: Vec::new(),
        }
    }
}
