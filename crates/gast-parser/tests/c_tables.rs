use gast_core::config::{GenerateConfig, Granularity};
use gast_core::node::{GenericNode, NodeTable, NodeValue};
use gast_parser::{Language, generate_source};

fn generate(source: &str, granularity: Granularity) -> NodeTable {
    let options = GenerateConfig {
        granularity,
        ..GenerateConfig::default()
    };
    generate_source(Language::C, source, &options).unwrap().table
}

fn child_kinds(table: &NodeTable, node: &GenericNode) -> Vec<String> {
    table.children_of(node.id).map(|n| n.kind.to_string()).collect()
}

fn first<'a>(table: &'a NodeTable, kind: &str) -> &'a GenericNode {
    table
        .iter()
        .find(|n| n.kind == kind)
        .unwrap_or_else(|| panic!("no {kind} node"))
}

#[test]
fn test_function_definition() {
    let out = generate("int add(int a, int b) { return a + b; }\n", Granularity::Fine);
    let funcdef = out.get(1).unwrap();
    assert_eq!(funcdef.kind, "funcdef");
    assert_eq!(funcdef.value, Some(NodeValue::from("add")));
    assert_eq!(child_kinds(&out, funcdef), vec!["param", "block"]);

    let param = first(&out, "param");
    assert_eq!(child_kinds(&out, param), vec!["arg", "arg"]);
    let arg = out.get(param.children[1]).unwrap();
    assert_eq!(arg.value, Some(NodeValue::from("b")));
    assert_eq!(child_kinds(&out, arg), vec!["type"]);

    let ret = first(&out, "return");
    assert_eq!(child_kinds(&out, ret), vec!["add"]);
}

#[test]
fn test_pointer_returning_function_keeps_its_name() {
    let out = generate("char *dup(const char *s) { return 0; }\n", Granularity::Fine);
    let funcdef = first(&out, "funcdef");
    assert_eq!(funcdef.value, Some(NodeValue::from("dup")));
    let arg = first(&out, "arg");
    assert_eq!(arg.value, Some(NodeValue::from("s")));
}

#[test]
fn test_declarator_chains_collapse_with_tags() {
    let source = "int *p = 0;\nint a[10];\nint **pp;\nint x = 5;\n";
    let out = generate(source, Granularity::Fine);
    let root = out.get(0).unwrap();
    assert_eq!(
        child_kinds(&out, root),
        vec!["vardec", "vardec", "vardec", "vardec"]
    );

    let declared: Vec<(String, Option<NodeValue>)> = out
        .children_of(0)
        .map(|vardec| {
            let decl = out.get(vardec.children[1]).unwrap();
            (decl.kind.to_string(), decl.value.clone())
        })
        .collect();
    assert_eq!(
        declared,
        vec![
            ("pointer".to_string(), Some(NodeValue::from("p"))),
            ("arraydec".to_string(), Some(NodeValue::from("a"))),
            ("pointer".to_string(), Some(NodeValue::from("pp"))),
            ("var".to_string(), Some(NodeValue::from("x"))),
        ]
    );

    let pointer = first(&out, "pointer");
    assert_eq!(child_kinds(&out, pointer), vec!["constant"]);
    let array = first(&out, "arraydec");
    assert_eq!(child_kinds(&out, array), vec!["constant"]);
}

#[test]
fn test_prototype_is_a_funcdec() {
    let out = generate("int f(int a);\n", Granularity::Fine);
    let funcdec = first(&out, "funcdec");
    assert_eq!(funcdec.value, Some(NodeValue::from("f")));
    assert_eq!(child_kinds(&out, funcdec), vec!["param"]);
}

#[test]
fn test_function_pointer_is_named_through_parentheses() {
    let out = generate("int (*fp)(int);\n", Granularity::Fine);
    let funcdec = first(&out, "funcdec");
    assert_eq!(funcdec.value, Some(NodeValue::from("fp")));

    let out = generate("void run(void (*cb)(int)) { cb(1); }\n", Granularity::Fine);
    assert_eq!(first(&out, "funcdef").value, Some(NodeValue::from("run")));
    assert_eq!(first(&out, "arg").value, Some(NodeValue::from("cb")));
}

#[test]
fn test_multidimensional_array_keeps_every_size() {
    let out = generate("int a[3][4];\n", Granularity::Fine);
    let array = first(&out, "arraydec");
    assert_eq!(array.value, Some(NodeValue::from("a")));
    let sizes: Vec<_> = out
        .children_of(array.id)
        .map(|n| (n.kind.to_string(), n.value.clone()))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("constant".to_string(), Some(NodeValue::Int(3))),
            ("constant".to_string(), Some(NodeValue::Int(4))),
        ]
    );
}

#[test]
fn test_operators_and_compound_assignment() {
    let source = "void f() { x += 1; y = !x; z = *p; i++; }\n";
    let out = generate(source, Granularity::Fine);
    let values: Vec<_> = out
        .iter()
        .filter(|n| n.kind == "assignment")
        .map(|n| n.value.clone())
        .collect();
    assert_eq!(values, vec![Some(NodeValue::from("add")), None, None]);

    let kinds: Vec<&str> = out.iter().map(|n| n.kind.as_ref()).collect();
    assert!(kinds.contains(&"not"));
    assert!(kinds.contains(&"dereference"));
    assert!(kinds.contains(&"increment"));

    let coarse = generate(source, Granularity::Coarse);
    let unary = coarse.iter().filter(|n| n.kind == "unaryop").count();
    assert_eq!(unary, 3);
}

#[test]
fn test_loops_and_switch() {
    let source = "\
void f(int n) {
    for (int i = 0; i < n; i++) { g(i); }
    do { n--; } while (n > 0);
    switch (n) { case 1: break; default: h(); }
}
";
    let fine = generate(source, Granularity::Fine);
    let for_node = first(&fine, "for");
    assert_eq!(
        child_kinds(&fine, for_node),
        vec!["vardec", "lt", "increment", "block"]
    );
    let dowhile = first(&fine, "dowhile");
    assert_eq!(child_kinds(&fine, dowhile), vec!["gt", "block"]);
    let switch = first(&fine, "switch");
    assert_eq!(child_kinds(&fine, switch), vec!["identifier", "block"]);
    let cases = fine.iter().filter(|n| n.kind == "case").count();
    assert_eq!(cases, 2);

    let coarse = generate(source, Granularity::Coarse);
    let for_node = first(&coarse, "for");
    assert_eq!(child_kinds(&coarse, for_node), vec!["condition", "block"]);
    let loops: Vec<&str> = coarse
        .iter()
        .filter(|n| n.kind == "while" || n.kind == "dowhile")
        .map(|n| n.kind.as_ref())
        .collect();
    assert_eq!(loops, vec!["while"]);
    assert!(!coarse.iter().any(|n| n.kind == "switch"));
}

#[test]
fn test_struct_fields_and_access() {
    let source = "struct point { int x; int y; };\nint get(struct point *p) { return p->x; }\n";
    let out = generate(source, Granularity::Fine);
    let record = first(&out, "struct");
    assert_eq!(record.value, Some(NodeValue::from("point")));
    let body = out.get(record.children[0]).unwrap();
    assert_eq!(child_kinds(&out, body), vec!["vardec", "vardec"]);

    let access = first(&out, "AttributeLoad");
    assert_eq!(access.value, Some(NodeValue::from("x")));
    assert_eq!(child_kinds(&out, access), vec!["identifier"]);
}

#[test]
fn test_preprocessor_and_literals() {
    let source = "#include <stdio.h>\n#define LIMIT 10\nchar *s = \"hi\";\nchar c = 'z';\n";
    let out = generate(source, Granularity::Fine);
    let import = first(&out, "import");
    assert_eq!(import.value, Some(NodeValue::from("<stdio.h>")));
    let define = first(&out, "define");
    assert_eq!(define.value, Some(NodeValue::from("LIMIT")));

    let constants: Vec<_> = out
        .iter()
        .filter(|n| n.kind == "constant")
        .filter_map(|n| n.value.clone())
        .collect();
    assert_eq!(constants, vec![NodeValue::from("hi"), NodeValue::from("z")]);
}

#[test]
fn test_coarse_drops_casts_and_keeps_call_arguments_inline() {
    let out = generate("void f() { g((long) a, 2); }\n", Granularity::Coarse);
    let call = first(&out, "call");
    assert_eq!(
        child_kinds(&out, call),
        vec!["identifier", "identifier", "constant"]
    );
    assert!(!out.iter().any(|n| n.kind == "cast"));
}
