//! Builders for Verible-shaped syntax trees used throughout the tests.

use hdlgraph_tree::Forest;
use serde_json::{json, Map, Value};

use crate::tag;

pub fn node(tag: &str, children: Vec<Value>) -> Value {
    json!({ "tag": tag, "children": children })
}

pub fn leaf(tag: &str, text: &str) -> Value {
    json!({ "tag": tag, "text": text })
}

pub fn keyword(text: &str) -> Value { leaf(text, text) }

pub fn identifier(name: &str) -> Value { leaf(tag::IDENTIFIER, name) }

pub fn number(text: &str) -> Value { leaf("TK_DecNumber", text) }

/// `[msb:lsb]` wrapped in the given dimensions tag.
pub fn dimensions(tag: &str, msb: Value, lsb: Value) -> Value {
    node(tag, vec![node("kDeclarationDimensions", vec![node(
        tag::DIMENSION_RANGE,
        vec![keyword("["), msb, keyword(":"), lsb, keyword("]")],
    )])])
}

/// An ANSI port declaration. `data_type` holds the children of `kDataType`.
pub fn port(
    direction: Option<&str>,
    data_type: Vec<Value>,
    name: &str,
    unpacked: Option<Value>,
) -> Value {
    let mut children = Vec::new();
    children.extend(direction.map(keyword));
    children.push(node(tag::DATA_TYPE, data_type));
    children.push(node("kUnqualifiedId", vec![identifier(name)]));
    children.extend(unpacked);

    node(tag::PORT_DECLARATION, children)
}

/// `parameter <type> <name> = <default>`.
pub fn parameter(
    data_type: Vec<Value>,
    name: &str,
    default: Option<Vec<Value>>,
) -> Value {
    let mut children = vec![
        keyword("parameter"),
        node("kParamType", vec![
            node(tag::DATA_TYPE, data_type),
            node("kUnqualifiedId", vec![identifier(name)]),
        ]),
    ];

    if let Some(default) = default {
        let mut assign = vec![keyword("=")];
        assign.push(node("kExpression", default));
        children.push(node(tag::TRAILING_ASSIGN, assign));
    }

    node(tag::PARAM_DECLARATION, children)
}

/// A module declaration with the given header parameters, ports and body
/// items.
pub fn module(
    name: &str,
    parameters: Vec<Value>,
    ports: Vec<Value>,
    items: Vec<Value>,
) -> Value {
    let mut header = vec![keyword("module"), identifier(name)];

    if !parameters.is_empty() {
        let mut list = vec![keyword("#"), keyword("(")];
        list.push(node("kFormalParameterList", parameters));
        list.push(keyword(")"));
        header.push(node(tag::FORMAL_PARAMETER_LIST_DECLARATION, list));
    }

    if !ports.is_empty() {
        header.push(node(tag::PAREN_GROUP, vec![
            keyword("("),
            node(tag::PORT_DECLARATION_LIST, ports),
            keyword(")"),
        ]));
    }

    header.push(keyword(";"));

    node(tag::MODULE_DECLARATION, vec![
        node(tag::MODULE_HEADER, header),
        node("kModuleItemList", items),
        keyword("endmodule"),
    ])
}

/// `<module> <instance>();`
pub fn instantiation(module: &str, instance: &str) -> Value {
    node("kDataDeclaration", vec![
        node(tag::INSTANTIATION_BASE, vec![
            node(tag::INSTANTIATION_TYPE, vec![node(tag::DATA_TYPE, vec![
                node("kUnqualifiedId", vec![identifier(module)]),
            ])]),
            node(tag::GATE_INSTANCE_REGISTER_VARIABLE_LIST, vec![node(
                "kGateInstance",
                vec![identifier(instance), node(tag::PAREN_GROUP, vec![
                    keyword("("),
                    Value::Null,
                    keyword(")"),
                ])],
            )]),
        ]),
        keyword(";"),
    ])
}

/// `<keyword> <name>;`, a variable declaration sharing the shape of an
/// instantiation.
pub fn variable(data_type: &str, name: &str) -> Value {
    node("kDataDeclaration", vec![
        node(tag::INSTANTIATION_BASE, vec![
            node(tag::INSTANTIATION_TYPE, vec![node(tag::DATA_TYPE, vec![
                node("kDataTypePrimitive", vec![keyword(data_type)]),
            ])]),
            node(tag::GATE_INSTANCE_REGISTER_VARIABLE_LIST, vec![node(
                "kRegisterVariable",
                vec![identifier(name)],
            )]),
        ]),
        keyword(";"),
    ])
}

/// Wraps the declarations of each file the way the parser reports them.
pub fn forest(files: &[(&str, Vec<Value>)]) -> Forest {
    let mut output = Map::new();

    for (path, declarations) in files {
        output.insert(
            (*path).to_owned(),
            json!({ "tree": node("kDescriptionList", declarations.clone()) }),
        );
    }

    Forest::from_json(&Value::Object(output))
}
