use hdlgraph_tree::{FileID, Forest, NodeID};
use serde_json::json;

use crate::{
    symbol::{Instance, Module},
    table::{Collision, Table},
};

fn placeholders() -> (FileID, NodeID) {
    let mut forest = Forest::new();
    let file = forest.add_file("a.sv".into(), &json!({ "tree": {} }));
    let node = forest.file(file).root().unwrap();

    (file, node)
}

fn record(name: &str) -> Module {
    let (file, node) = placeholders();
    Module::new(name.to_owned(), file, node)
}

#[test]
fn insert_and_lookup() {
    let mut table = Table::new();
    assert!(table.is_empty());

    let adder = table.insert(record("adder")).unwrap();
    let top = table.insert(record("top")).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup("adder"), Some(adder));
    assert_eq!(table.lookup("top"), Some(top));
    assert_eq!(table.lookup("Adder"), None);
    assert_eq!(table.get(top).map(|x| x.name().as_str()), Some("top"));
}

#[test]
fn collision_leaves_table_unchanged() {
    let mut table = Table::new();

    let first = table.insert(record("x")).unwrap();
    table.link(first, Instance {
        name: "u0".to_owned(),
        module: first,
        node: table[first].declaration(),
    });

    let before = table[first].clone();

    let Err(Collision { existing, rejected }) = table.insert(record("x")) else {
        panic!("expected a collision");
    };

    assert_eq!(existing, first);
    assert_eq!(rejected.name(), "x");
    assert!(rejected.dependencies().is_empty());

    assert_eq!(table.len(), 1);
    assert_eq!(table[first], before);
}

#[test]
fn collision_message() {
    let mut table = Table::new();
    table.insert(record("x")).unwrap();

    let collision = table.insert(record("x")).unwrap_err();
    assert_eq!(collision.to_string(), "the module `x` is already declared");
}

#[test]
fn insertion_order_is_iteration_order() {
    let names = ["m9", "m1", "m5", "a", "zz", "m0", "b", "m3"];

    let mut table = Table::new();
    for name in names {
        table.insert(record(name)).unwrap();
    }

    let iterated =
        table.modules().map(|(_, x)| x.name().as_str()).collect::<Vec<_>>();
    assert_eq!(iterated, names);

    let ids = table.modules().map(|(id, _)| id).collect::<Vec<_>>();
    assert_eq!(table.names_of(&ids), names);
}

#[test]
fn link_appends_both_edges() {
    let mut table = Table::new();

    let leaf = table.insert(record("leaf")).unwrap();
    let top = table.insert(record("top")).unwrap();

    for name in ["l0", "l1"] {
        table.link(top, Instance {
            name: name.to_owned(),
            module: leaf,
            node: table[top].declaration(),
        });
    }

    assert_eq!(table[top].dependencies(), &vec![leaf, leaf]);
    assert_eq!(table[leaf].references(), &vec![top, top]);
    assert_eq!(table[top].instances().len(), 2);
    assert!(table[leaf].dependencies().is_empty());
}
