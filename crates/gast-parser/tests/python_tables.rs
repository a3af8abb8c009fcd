use gast_core::config::{GenerateConfig, Granularity};
use gast_core::node::{GenericNode, NodeTable, NodeValue};
use gast_parser::{Language, generate_source};

fn fine(source: &str) -> NodeTable {
    generate_source(Language::Python, source, &GenerateConfig::default())
        .unwrap()
        .table
}

fn coarse(source: &str) -> NodeTable {
    let options = GenerateConfig {
        granularity: Granularity::Coarse,
        ..GenerateConfig::default()
    };
    generate_source(Language::Python, source, &options)
        .unwrap()
        .table
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
fn test_function_parameters_are_args() {
    let out = fine("def add(a, b=1, *rest, **opts):\n    return a\n");
    let funcdef = first(&out, "funcdef");
    assert_eq!(funcdef.value, Some(NodeValue::from("add")));
    assert_eq!(child_kinds(&out, funcdef), vec!["param", "block"]);

    let param = first(&out, "param");
    assert_eq!(child_kinds(&out, param), vec!["arg", "arg", "vararg", "kwarg"]);
    let names: Vec<_> = out
        .children_of(param.id)
        .map(|n| n.value.clone().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            NodeValue::from("a"),
            NodeValue::from("b"),
            NodeValue::from("rest"),
            NodeValue::from("opts")
        ]
    );
}

#[test]
fn test_elif_chains_nest_inside_else_block() {
    let out = fine("if a:\n    x()\nelif b:\n    y()\nelse:\n    z()\n");
    let outer = out.get(1).unwrap();
    assert_eq!(outer.kind, "if");
    assert_eq!(child_kinds(&out, outer), vec!["identifier", "block", "block"]);

    let else_block = out.get(outer.children[2]).unwrap();
    assert_eq!(child_kinds(&out, else_block), vec!["if"]);
    let inner = out.get(else_block.children[0]).unwrap();
    assert_eq!(inner.kind, "if");
    assert_eq!(child_kinds(&out, inner), vec!["identifier", "block", "block"]);
    assert_eq!(
        out.get(inner.children[0]).unwrap().value,
        Some(NodeValue::from("b"))
    );
}

#[test]
fn test_store_context_reaches_tuple_targets() {
    let out = fine("a, b = b, a\n");
    let assignment = first(&out, "assignment");
    assert_eq!(child_kinds(&out, assignment), vec!["TupleStore", "TupleLoad"]);
    let store = out.get(assignment.children[0]).unwrap();
    assert_eq!(child_kinds(&out, store), vec!["var", "var"]);
    let load = out.get(assignment.children[1]).unwrap();
    assert_eq!(child_kinds(&out, load), vec!["identifier", "identifier"]);
}

#[test]
fn test_attribute_access_context() {
    let out = fine("self.value = other.value\n");
    let assignment = first(&out, "assignment");
    assert_eq!(
        child_kinds(&out, assignment),
        vec!["AttributeStore", "AttributeLoad"]
    );
    let store = out.get(assignment.children[0]).unwrap();
    assert_eq!(store.value, Some(NodeValue::from("value")));

    let coarse = coarse("self.value = other.value\n");
    let assignment = first(&coarse, "assignment");
    assert_eq!(
        child_kinds(&coarse, assignment),
        vec!["Attribute", "AttributeLoad"]
    );
}

#[test]
fn test_augmented_assignment_carries_operator() {
    let out = fine("total += 2\ncount = 0\n");
    let values: Vec<_> = out
        .iter()
        .filter(|n| n.kind == "assignment")
        .map(|n| n.value.clone())
        .collect();
    assert_eq!(values, vec![Some(NodeValue::from("add")), None]);
}

#[test]
fn test_comparison_and_boolean_operators() {
    let out = fine("ok = a < b and c is not None\n");
    let kinds: Vec<&str> = out.iter().map(|n| n.kind.as_ref()).collect();
    assert!(kinds.contains(&"and"));
    assert!(kinds.contains(&"lt"));
    assert!(kinds.contains(&"isnot"));
}

#[test]
fn test_try_orders_body_handlers_else_finally() {
    let source = "try:\n    a()\nexcept ValueError as e:\n    b()\nelse:\n    c()\nfinally:\n    d()\n";
    let out = fine(source);
    let try_node = first(&out, "try");
    assert_eq!(
        child_kinds(&out, try_node),
        vec!["block", "catch", "block", "block"]
    );

    let out = coarse(source);
    let try_node = first(&out, "try");
    assert_eq!(
        child_kinds(&out, try_node),
        vec!["block", "catch", "block", "block"]
    );
    let catch = first(&out, "catch");
    assert_eq!(child_kinds(&out, catch), vec!["block"]);
}

#[test]
fn test_coarse_collapses_expressions() {
    let out = coarse("def f(a, b=2):\n    return [x for x in a]\n");
    let param = first(&out, "param");
    assert_eq!(child_kinds(&out, param), vec!["arg", "arg"]);
    let ret = first(&out, "return");
    assert!(ret.is_leaf());
    assert!(!out.iter().any(|n| n.kind == "comprehension"));
}

#[test]
fn test_coarse_for_uses_condition_placeholder() {
    let out = coarse("for i in range(3):\n    print(i)\n");
    let for_node = first(&out, "for");
    assert_eq!(child_kinds(&out, for_node), vec!["condition", "block"]);
}

#[test]
fn test_class_with_bases() {
    let out = fine("class Box(Base):\n    size = 1\n");
    let class = first(&out, "classdef");
    assert_eq!(class.value, Some(NodeValue::from("Box")));
    assert_eq!(child_kinds(&out, class), vec!["identifier", "block"]);
}

#[test]
fn test_decorators_are_skipped() {
    let out = fine("@cache\ndef f():\n    return 1\n");
    assert_eq!(out.get(1).unwrap().kind, "funcdef");
    assert!(!out.iter().any(|n| n.value == Some(NodeValue::from("cache"))));
}
