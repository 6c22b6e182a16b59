//! The tags of the Verible concrete syntax tree that the analysis looks at.

pub use hdlgraph_tree::query::{ESCAPED_IDENTIFIER, IDENTIFIER};

/// `module ... endmodule` (also `macromodule`).
pub const MODULE_DECLARATION: &str = "kModuleDeclaration";

/// Everything of a module declaration up to and including the `;` after the
/// port list.
pub const MODULE_HEADER: &str = "kModuleHeader";

/// `#( parameter ... )` in a module header.
pub const FORMAL_PARAMETER_LIST_DECLARATION: &str =
    "kFormalParameterListDeclaration";

/// A single `parameter`/`localparam` declaration.
pub const PARAM_DECLARATION: &str = "kParamDeclaration";

/// `= <expression>` after a declared name.
pub const TRAILING_ASSIGN: &str = "kTrailingAssign";

/// A parenthesized group, such as the port list of a module header.
pub const PAREN_GROUP: &str = "kParenGroup";

/// The comma separated ANSI port declarations.
pub const PORT_DECLARATION_LIST: &str = "kPortDeclarationList";

/// A single ANSI port declaration.
pub const PORT_DECLARATION: &str = "kPortDeclaration";

/// The declared type of a port, parameter or variable.
pub const DATA_TYPE: &str = "kDataType";

/// `[msb:lsb]` dimensions before the declared name.
pub const PACKED_DIMENSIONS: &str = "kPackedDimensions";

/// `[msb:lsb]` dimensions after the declared name.
pub const UNPACKED_DIMENSIONS: &str = "kUnpackedDimensions";

/// One `[msb:lsb]` dimension.
pub const DIMENSION_RANGE: &str = "kDimensionRange";

/// The common shape of module instantiations and data declarations.
pub const INSTANTIATION_BASE: &str = "kInstantiationBase";

/// The instantiated module (or declared data type).
pub const INSTANTIATION_TYPE: &str = "kInstantiationType";

/// The instances (or variables) declared by an instantiation.
pub const GATE_INSTANCE_REGISTER_VARIABLE_LIST: &str =
    "kGateInstanceRegisterVariableList";
