//! The semantic model of a declared module and its signature.

use std::fmt::Display;

use getset::{CopyGetters, Getters};
use hdlgraph_arena::ID;
use hdlgraph_tree::{FileID, NodeID};
use serde::Serialize;

/// The ID of a [`Module`] in the [`crate::table::Table`].
pub type ModuleID = ID<Module>;

/// The direction of a port.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `input`
    Input,

    /// `output`
    Output,

    /// `inout`; also the direction of a first port declared without one.
    Inout,

    /// `ref`
    Ref,
}

/// The data type of a port or parameter.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    strum_macros::EnumString,
    enum_as_inner::EnumAsInner,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum DataType {
    Reg,
    Wire,
    Integer,
    Real,
    Time,
    RealTime,
    Logic,
    Bit,
    Byte,
    ShortInt,
    Int,
    LongInt,
    ShortReal,

    /// No type was written; the language picks a default.
    #[strum(disabled)]
    Implicit,

    /// A user-defined type such as a typedef or an interface.
    #[strum(disabled)]
    Named(String),
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = match self {
            Self::Reg => "reg",
            Self::Wire => "wire",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Time => "time",
            Self::RealTime => "realtime",
            Self::Logic => "logic",
            Self::Bit => "bit",
            Self::Byte => "byte",
            Self::ShortInt => "shortint",
            Self::Int => "int",
            Self::LongInt => "longint",
            Self::ShortReal => "shortreal",
            Self::Implicit => "<implicit>",
            Self::Named(name) => name,
        };

        f.write_str(keyword)
    }
}

/// A `[msb:lsb]` dimension. The bounds are kept as source text; they are
/// not evaluated.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_new::new,
)]
pub struct Range {
    /// The left bound.
    pub msb: String,

    /// The right bound.
    pub lsb: String,
}

impl Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

/// A port of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters)]
pub struct Port {
    /// The declared name.
    #[get = "pub"]
    pub(crate) name: String,

    /// The declared (or inherited) direction.
    #[get_copy = "pub"]
    pub(crate) direction: Direction,

    /// The declared (or inherited) data type.
    #[get = "pub"]
    pub(crate) data_type: DataType,

    /// The first packed dimension, declared or inherited, e.g. `[7:0]` in
    /// `logic [7:0] a`.
    #[get = "pub"]
    pub(crate) packed: Option<Range>,

    /// The first unpacked dimension, e.g. `[0:3]` in `logic a [0:3]`.
    #[get = "pub"]
    pub(crate) unpacked: Option<Range>,

    /// The port declaration node.
    #[get_copy = "pub"]
    pub(crate) node: NodeID,
}

/// A parameter of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters)]
pub struct Parameter {
    /// The declared name.
    #[get = "pub"]
    pub(crate) name: String,

    /// The source text of the default value, if any.
    #[get = "pub"]
    pub(crate) default_value: Option<String>,

    /// The declared data type.
    #[get = "pub"]
    pub(crate) data_type: DataType,

    /// The parameter declaration node.
    #[get_copy = "pub"]
    pub(crate) node: NodeID,
}

/// A resolved instantiation of another module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters)]
pub struct Instance {
    /// The local instance name, e.g. `u0`.
    #[get = "pub"]
    pub(crate) name: String,

    /// The instantiated module.
    #[get_copy = "pub"]
    pub(crate) module: ModuleID,

    /// The `kInstantiationBase` node.
    #[get_copy = "pub"]
    pub(crate) node: NodeID,
}

/// A declared module.
///
/// Created once per declaration by the declaration pass. Afterwards only the
/// instantiation pass touches it, to append edges.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Module {
    /// The declared name; unique within a table.
    #[get = "pub"]
    pub(crate) name: String,

    /// The file in which the module is declared.
    #[get_copy = "pub"]
    pub(crate) source_file: FileID,

    /// The `kModuleDeclaration` node.
    #[get_copy = "pub"]
    pub(crate) declaration: NodeID,

    /// The ports, in declaration order.
    #[get = "pub"]
    pub(crate) ports: Vec<Port>,

    /// The header parameters, in declaration order.
    #[get = "pub"]
    pub(crate) parameters: Vec<Parameter>,

    /// The modules this module instantiates, once per instantiation.
    #[get = "pub"]
    pub(crate) dependencies: Vec<ModuleID>,

    /// The modules instantiating this module, once per instantiation.
    #[get = "pub"]
    pub(crate) references: Vec<ModuleID>,

    /// The resolved instantiations, in the same order as `dependencies`.
    #[get = "pub"]
    pub(crate) instances: Vec<Instance>,
}

impl Module {
    /// Creates a module without ports, parameters or edges.
    #[must_use]
    pub const fn new(
        name: String,
        source_file: FileID,
        declaration: NodeID,
    ) -> Self {
        Self {
            name,
            source_file,
            declaration,
            ports: Vec::new(),
            parameters: Vec::new(),
            dependencies: Vec::new(),
            references: Vec::new(),
            instances: Vec::new(),
        }
    }
}
