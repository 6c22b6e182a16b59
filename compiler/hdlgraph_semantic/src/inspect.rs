//! A read-only, name-based view of the resolved module graph.

use std::{fmt::Display, path::PathBuf};

use derive_more::Deref;
use hdlgraph_tree::Forest;
use serde::Serialize;

use crate::{
    symbol::{Direction, Module, ModuleID, Parameter, Port, Range},
    table::Table,
};

/// A port as it appears in an [`Inspection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct PortSummary {
    pub name: String,
    pub direction: Direction,
    pub data_type: String,
    pub packed: Option<Range>,
    pub unpacked: Option<Range>,
}

impl From<&Port> for PortSummary {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name().clone(),
            direction: port.direction(),
            data_type: port.data_type().to_string(),
            packed: port.packed().clone(),
            unpacked: port.unpacked().clone(),
        }
    }
}

/// A parameter as it appears in an [`Inspection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ParameterSummary {
    pub name: String,
    pub data_type: String,
    pub default_value: Option<String>,
}

impl From<&Parameter> for ParameterSummary {
    fn from(parameter: &Parameter) -> Self {
        Self {
            name: parameter.name().clone(),
            data_type: parameter.data_type().to_string(),
            default_value: parameter.default_value().clone(),
        }
    }
}

/// A resolved instantiation, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSummary {
    /// The local instance name.
    pub name: String,

    /// The name of the instantiated module.
    pub module: String,
}

/// Everything known about one module, with every cross reference replaced
/// by a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    /// The module name.
    pub name: String,

    /// The path of the declaring file.
    pub source_file: PathBuf,

    /// The modules instantiating this one, once per instantiation.
    pub references: Vec<String>,

    /// The modules this one instantiates, once per instantiation.
    pub dependencies: Vec<String>,

    /// The resolved instantiations.
    pub instances: Vec<InstanceSummary>,

    /// The ports in declaration order.
    pub ports: Vec<PortSummary>,

    /// The header parameters in declaration order.
    pub parameters: Vec<ParameterSummary>,
}

/// The summaries of every module of a [`Table`], in declaration order.
///
/// Displays as the plain-text listing of the graph:
///
/// ```text
/// rtl/top.sv: top
/// Referenced by:
/// Depends on:
///     - adder
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deref)]
#[serde(transparent)]
pub struct Inspection {
    modules: Vec<ModuleSummary>,
}

impl Inspection {
    /// Finds the summary of the module with the given name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleSummary> {
        self.modules.iter().find(|x| x.name == name)
    }
}

impl Display for Inspection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for module in &self.modules {
            writeln!(f, "{}: {}", module.source_file.display(), module.name)?;

            writeln!(f, "Referenced by:")?;
            for reference in &module.references {
                writeln!(f, "    - {reference}")?;
            }

            writeln!(f, "Depends on:")?;
            for dependency in &module.dependencies {
                writeln!(f, "    - {dependency}")?;
            }
        }

        Ok(())
    }
}

impl Table {
    /// Summarizes every module of the table. Doesn't modify anything, so
    /// inspecting the same table twice gives equal results.
    #[must_use]
    pub fn inspect(&self, forest: &Forest) -> Inspection {
        Inspection {
            modules: self
                .modules()
                .map(|(_, module)| self.summarize(forest, module))
                .collect(),
        }
    }

    fn summarize(&self, forest: &Forest, module: &Module) -> ModuleSummary {
        let names = |ids: &[ModuleID]| -> Vec<String> {
            self.names_of(ids).into_iter().map(ToOwned::to_owned).collect()
        };

        ModuleSummary {
            name: module.name().clone(),
            source_file: forest.file(module.source_file()).path().clone(),
            references: names(module.references()),
            dependencies: names(module.dependencies()),
            instances: module
                .instances()
                .iter()
                .map(|x| InstanceSummary {
                    name: x.name().clone(),
                    module: self[x.module()].name().clone(),
                })
                .collect(),
            ports: module.ports().iter().map(PortSummary::from).collect(),
            parameters: module
                .parameters()
                .iter()
                .map(ParameterSummary::from)
                .collect(),
        }
    }
}
