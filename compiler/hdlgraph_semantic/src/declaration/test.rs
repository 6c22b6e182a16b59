use hdlgraph_handler::{Panic, Storage};

use crate::{
    declaration::{declare, declare_file, extract_file},
    diagnostic::{
        Diagnostic, MissingModuleHeader, MissingModuleName, ModuleRedefinition,
    },
    fixture::{
        dimensions, forest, identifier, keyword, module, node, number,
        parameter, port, variable,
    },
    symbol::{DataType, Direction, Range},
    table::Table,
    tag,
};

#[test]
fn module_without_signature() {
    let forest = forest(&[("a.sv", vec![module("adder", vec![], vec![], vec![
        variable("logic", "carry"),
    ])])]);

    let mut table = Table::new();
    declare(&forest, &mut table, &Panic);

    assert_eq!(table.len(), 1);

    let adder = &table[table.lookup("adder").unwrap()];
    assert_eq!(adder.name(), "adder");
    assert!(adder.ports().is_empty());
    assert!(adder.parameters().is_empty());
    assert!(adder.dependencies().is_empty());
    assert!(adder.references().is_empty());
    assert_eq!(forest.file(adder.source_file()).path().to_str(), Some("a.sv"));
    assert!(forest.has_tag(adder.declaration(), tag::MODULE_DECLARATION));
}

#[test]
fn ports() {
    let ports = vec![
        port(
            Some("input"),
            vec![
                node("kDataTypePrimitive", vec![keyword("logic")]),
                dimensions(
                    tag::PACKED_DIMENSIONS,
                    node("kBinaryExpression", vec![
                        identifier("WIDTH"),
                        keyword("-"),
                        number("1"),
                    ]),
                    number("0"),
                ),
            ],
            "a",
            None,
        ),
        // continues as an input `logic [WIDTH-1:0]`
        port(None, vec![], "b", None),
        port(
            Some("output"),
            vec![node("kDataTypePrimitive", vec![keyword("wire")])],
            "sum",
            Some(dimensions(
                tag::UNPACKED_DIMENSIONS,
                number("0"),
                number("3"),
            )),
        ),
        port(
            Some("inout"),
            vec![node("kUnqualifiedId", vec![identifier("bus_t")])],
            "bus",
            None,
        ),
    ];

    let forest =
        forest(&[("a.sv", vec![module("adder", vec![], ports, vec![])])]);

    let mut table = Table::new();
    declare(&forest, &mut table, &Panic);

    let adder = &table[table.lookup("adder").unwrap()];
    let ports = adder.ports();

    assert_eq!(
        ports.iter().map(|x| x.name().as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "sum", "bus"]
    );
    assert_eq!(
        ports.iter().map(|x| x.direction()).collect::<Vec<_>>(),
        vec![
            Direction::Input,
            Direction::Input,
            Direction::Output,
            Direction::Inout
        ]
    );

    assert_eq!(ports[0].data_type(), &DataType::Logic);
    assert_eq!(
        ports[0].packed(),
        &Some(Range::new("WIDTH-1".to_owned(), "0".to_owned()))
    );
    assert_eq!(ports[0].unpacked(), &None);

    assert_eq!(ports[1].data_type(), &DataType::Logic);
    assert_eq!(
        ports[1].packed(),
        &Some(Range::new("WIDTH-1".to_owned(), "0".to_owned()))
    );
    assert_eq!(ports[1].unpacked(), &None);

    assert_eq!(ports[2].data_type(), &DataType::Wire);
    assert_eq!(
        ports[2].unpacked(),
        &Some(Range::new("0".to_owned(), "3".to_owned()))
    );

    assert_eq!(
        ports[3].data_type().as_named().map(String::as_str),
        Some("bus_t")
    );
}

#[test]
fn port_inheritance_stops_at_any_explicit_part() {
    let logic = || node("kDataTypePrimitive", vec![keyword("logic")]);
    let byte =
        || dimensions(tag::PACKED_DIMENSIONS, number("7"), number("0"));
    let bit = node("kDataTypePrimitive", vec![keyword("bit")]);
    let nibble = dimensions(tag::PACKED_DIMENSIONS, number("3"), number("0"));

    let ports = vec![
        port(Some("input"), vec![logic(), byte()], "a", None),
        // own type, inherited direction
        port(None, vec![bit], "b", None),
        // own dimensions, inherited direction only
        port(None, vec![nibble], "c", None),
        // an explicit direction starts over with an implicit type
        port(Some("output"), vec![], "d", None),
        port(None, vec![], "e", None),
        // the unpacked dimensions belong to the name and aren't inherited
        port(Some("input"), vec![logic(), byte()], "f", Some(dimensions(
            tag::UNPACKED_DIMENSIONS,
            number("0"),
            number("1"),
        ))),
        port(None, vec![], "g", None),
    ];

    let forest =
        forest(&[("a.sv", vec![module("m", vec![], ports, vec![])])]);

    let mut table = Table::new();
    declare(&forest, &mut table, &Panic);

    let ports = table[table.lookup("m").unwrap()].ports();
    let byte = Some(Range::new("7".to_owned(), "0".to_owned()));

    assert_eq!(ports[1].direction(), Direction::Input);
    assert_eq!(ports[1].data_type(), &DataType::Bit);
    assert_eq!(ports[1].packed(), &None);

    assert_eq!(ports[2].direction(), Direction::Input);
    assert!(ports[2].data_type().is_implicit());
    assert_eq!(
        ports[2].packed(),
        &Some(Range::new("3".to_owned(), "0".to_owned()))
    );

    assert_eq!(ports[3].direction(), Direction::Output);
    assert!(ports[3].data_type().is_implicit());
    assert_eq!(ports[3].packed(), &None);

    // continues `output d`, which has nothing to pass on
    assert_eq!(ports[4].direction(), Direction::Output);
    assert!(ports[4].data_type().is_implicit());

    assert_eq!(ports[6].direction(), Direction::Input);
    assert_eq!(ports[6].data_type(), &DataType::Logic);
    assert_eq!(ports[6].packed(), &byte);
    assert_eq!(ports[6].unpacked(), &None);
}

#[test]
fn first_port_without_direction_is_inout() {
    let forest = forest(&[("a.sv", vec![module(
        "m",
        vec![],
        vec![port(None, vec![], "x", None)],
        vec![],
    )])]);

    let mut table = Table::new();
    declare(&forest, &mut table, &Panic);

    let module = &table[table.lookup("m").unwrap()];
    assert_eq!(module.ports()[0].direction(), Direction::Inout);
    assert!(module.ports()[0].data_type().is_implicit());
}

#[test]
fn parameters() {
    let parameters = vec![
        parameter(
            vec![node("kDataTypePrimitive", vec![keyword("int")])],
            "WIDTH",
            Some(vec![number("8")]),
        ),
        parameter(vec![], "DEPTH", Some(vec![node("kBinaryExpression", vec![
            identifier("WIDTH"),
            keyword("*"),
            number("2"),
        ])])),
        parameter(vec![], "MODE", None),
    ];

    let forest = forest(&[("a.sv", vec![module(
        "fifo",
        parameters,
        vec![],
        vec![],
    )])]);

    let mut table = Table::new();
    declare(&forest, &mut table, &Panic);

    let fifo = &table[table.lookup("fifo").unwrap()];
    let parameters = fifo.parameters();

    assert_eq!(
        parameters.iter().map(|x| x.name().as_str()).collect::<Vec<_>>(),
        vec!["WIDTH", "DEPTH", "MODE"]
    );
    assert_eq!(
        parameters
            .iter()
            .map(|x| x.default_value().as_deref())
            .collect::<Vec<_>>(),
        vec![Some("8"), Some("WIDTH*2"), None]
    );
    assert_eq!(parameters[0].data_type(), &DataType::Int);
    assert_eq!(parameters[1].data_type(), &DataType::Implicit);
}

#[test]
fn missing_header_is_skipped() {
    let headless = node(tag::MODULE_DECLARATION, vec![
        keyword("module"),
        node("kModuleItemList", vec![]),
        keyword("endmodule"),
    ]);

    let forest = forest(&[
        ("a.sv", vec![headless, module("after", vec![], vec![], vec![])]),
        ("b.sv", vec![module("other", vec![], vec![], vec![])]),
    ]);

    let storage = Storage::<Box<dyn Diagnostic>>::new();
    let mut table = Table::new();
    declare(&forest, &mut table, &storage);

    assert_eq!(table.len(), 2);
    assert!(table.lookup("after").is_some());
    assert!(table.lookup("other").is_some());

    let diagnostics = storage.into_vec();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .as_any()
        .downcast_ref::<MissingModuleHeader>()
        .is_some());
}

#[test]
fn missing_name_is_skipped() {
    let nameless = node(tag::MODULE_DECLARATION, vec![node(
        tag::MODULE_HEADER,
        vec![keyword("module"), keyword(";")],
    )]);

    let forest = forest(&[("a.sv", vec![nameless])]);

    let storage = Storage::<Box<dyn Diagnostic>>::new();
    let mut table = Table::new();
    declare(&forest, &mut table, &storage);

    assert!(table.is_empty());

    let diagnostics = storage.into_vec();
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = diagnostics[0]
        .as_any()
        .downcast_ref::<MissingModuleName>()
        .unwrap();
    assert_eq!(forest.file(diagnostic.file).path().to_str(), Some("a.sv"));
}

#[test]
fn first_declaration_wins() {
    let forest = forest(&[
        ("a.sv", vec![module(
            "x",
            vec![],
            vec![port(Some("input"), vec![], "first", None)],
            vec![],
        )]),
        ("b.sv", vec![module(
            "x",
            vec![],
            vec![port(Some("input"), vec![], "second", None)],
            vec![],
        )]),
    ]);

    let storage = Storage::<Box<dyn Diagnostic>>::new();
    let mut table = Table::new();
    declare(&forest, &mut table, &storage);

    assert_eq!(table.len(), 1);

    let x = &table[table.lookup("x").unwrap()];
    assert_eq!(x.ports()[0].name(), "first");
    assert_eq!(forest.file(x.source_file()).path().to_str(), Some("a.sv"));

    let diagnostics = storage.into_vec();
    assert_eq!(diagnostics.len(), 1);

    let redefinition = diagnostics[0]
        .as_any()
        .downcast_ref::<ModuleRedefinition>()
        .unwrap();
    assert_eq!(redefinition.name, "x");
    assert_eq!(redefinition.existing_declaration, x.declaration());
    assert_eq!(
        forest.file(redefinition.file).path().to_str(),
        Some("b.sv")
    );
}

#[test]
fn nested_declarations_are_found() {
    let outer = module("outer", vec![], vec![], vec![module(
        "inner",
        vec![],
        vec![],
        vec![],
    )]);

    let forest = forest(&[("a.sv", vec![node("kPackageItemList", vec![
        outer,
    ])])]);

    let (file, _) = forest.files().next().unwrap();
    let modules = extract_file(&forest, file, &Panic);

    assert_eq!(
        modules.iter().map(|x| x.name().as_str()).collect::<Vec<_>>(),
        vec!["outer", "inner"]
    );
}

#[test]
fn streaming_matches_parallel() {
    let forest = forest(&[
        ("a.sv", vec![
            module("a", vec![], vec![], vec![]),
            module("b", vec![], vec![], vec![]),
        ]),
        ("b.sv", vec![
            module("b", vec![], vec![], vec![]),
            module("c", vec![], vec![], vec![]),
        ]),
    ]);

    let parallel_diagnostics = Storage::<Box<dyn Diagnostic>>::new();
    let mut parallel = Table::new();
    declare(&forest, &mut parallel, &parallel_diagnostics);

    let streaming_diagnostics = Storage::<Box<dyn Diagnostic>>::new();
    let mut streaming = Table::new();
    for (file, _) in forest.files() {
        declare_file(&forest, file, &mut streaming, &streaming_diagnostics);
    }

    let names = |table: &Table| {
        table
            .modules()
            .map(|(_, x)| (x.name().clone(), x.declaration()))
            .collect::<Vec<_>>()
    };

    assert_eq!(names(&parallel), names(&streaming));
    assert_eq!(parallel_diagnostics.len(), 1);
    assert_eq!(streaming_diagnostics.len(), 1);
}
