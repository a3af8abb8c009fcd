//! Python adapter (tree-sitter-python).

use super::prelude::*;
use crate::languages::Language;
use crate::native::NativeAdapter;

pub struct PythonAdapter;

impl NativeAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn rules(&self, granularity: Granularity) -> Option<&'static RuleTable> {
        match granularity {
            Granularity::Verbatim => None,
            Granularity::Fine => Some(&FINE),
            Granularity::Coarse => Some(&COARSE),
        }
    }

    fn verbatim_prefix(&self) -> &'static str {
        "py_"
    }

    fn containers(&self) -> &'static [&'static str] {
        &[
            "block",
            "parameters",
            "lambda_parameters",
            "argument_list",
            "with_clause",
        ]
    }

    fn clauses(&self) -> &'static [&'static str] {
        &["else_clause", "finally_clause"]
    }

    fn simplify_rules(&self) -> &'static SimplifyRules {
        &SIMPLIFY
    }
}

static SIMPLIFY: SimplifyRules = SimplifyRules {
    drop: &["comment", "pass_statement"],
    unwrap: &["parenthesized_expression"],
    docstring_owners: &["module", "function_definition", "class_definition"],
};

const TUPLE: TypeRule = Context {
    load: "TupleLoad",
    store: "TupleStore",
    param: "TupleLoad",
};

const LIST: TypeRule = Context {
    load: "ListLoad",
    store: "ListStore",
    param: "ListLoad",
};

const ATTRIBUTE: TypeRule = Context {
    load: "AttributeLoad",
    store: "AttributeStore",
    param: "AttributeLoad",
};

/// Coarse names only mark the load context.
const COARSE_ATTRIBUTE: TypeRule = Context {
    load: "AttributeLoad",
    store: "Attribute",
    param: "AttributeLoad",
};

const COARSE_LIST: TypeRule = Context {
    load: "ListLoad",
    store: "List",
    param: "ListLoad",
};

const FINE_IF: &[Slot] = &[
    Slot(Field("condition"), Direct, Load),
    Slot(Field("consequence"), Group("block"), Load),
    Slot(Field("alternative"), Alternate("block"), Load),
];

const COARSE_IF: &[Slot] = &[
    Slot(Field("condition"), Placeholder("condition"), Load),
    Slot(Field("consequence"), Group("block"), Load),
    Slot(Field("alternative"), Alternate("block"), Load),
];

const FUNCTION: &[Slot] = &[
    Slot(Field("parameters"), Group("param"), Param),
    Slot(Field("body"), Group("block"), Load),
];

const TRY: &[Slot] = &[
    Slot(Field("body"), Group("block"), Load),
    Slot(Kind("except_clause"), Direct, Load),
    Slot(Kind("except_group_clause"), Direct, Load),
    Slot(Kind("else_clause"), Alternate("block"), Load),
    Slot(Kind("finally_clause"), Alternate("block"), Load),
];

static FINE: RuleTable = RuleTable {
    name: "python/fine",
    gap: GapRule::Recurse,
    rules: &[
        // statements
        ("expression_statement", Unwrap(Named)),
        (
            "assignment",
            node(
                "assignment",
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("type"), Direct, Load),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        (
            "augmented_assignment",
            emit(
                Fixed("assignment"),
                Compound,
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        (
            "named_expression",
            node(
                "assignment",
                Slots(&[
                    Slot(Field("name"), Direct, Store),
                    Slot(Field("value"), Direct, Load),
                ]),
            ),
        ),
        ("return_statement", node("return", All(Load))),
        ("raise_statement", node("throw", All(Load))),
        ("assert_statement", node("assert", All(Load))),
        ("delete_statement", node("delete", All(Store))),
        ("global_statement", node("global", All(Load))),
        ("nonlocal_statement", node("nonlocal", All(Load))),
        ("pass_statement", leaf("pass")),
        ("break_statement", leaf("break")),
        ("continue_statement", leaf("continue")),
        ("import_statement", leaf("import")),
        ("import_from_statement", leaf("import")),
        ("future_import_statement", leaf("import")),
        ("if_statement", node("if", Slots(FINE_IF))),
        ("elif_clause", node("if", Slots(FINE_IF))),
        (
            "for_statement",
            node(
                "for",
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                    Slot(Field("alternative"), Alternate("block"), Load),
                ]),
            ),
        ),
        (
            "while_statement",
            node(
                "while",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                    Slot(Field("alternative"), Alternate("block"), Load),
                ]),
            ),
        ),
        ("try_statement", node("try", Slots(TRY))),
        ("except_clause", node("catch", All(Load))),
        ("except_group_clause", node("catch", All(Load))),
        (
            "as_pattern",
            node(
                "alias",
                Slots(&[
                    Slot(Nth(0), Direct, Load),
                    Slot(Field("alias"), Direct, Store),
                ]),
            ),
        ),
        ("as_pattern_target", Unwrap(Named)),
        (
            "with_statement",
            node(
                "with",
                Slots(&[
                    Slot(Kind("with_clause"), Inline, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("with_item", Unwrap(Field("value"))),
        ("block", node("block", All(Load))),
        // definitions
        (
            "function_definition",
            emit(Fixed("funcdef"), FieldText("name"), Slots(FUNCTION)),
        ),
        (
            "class_definition",
            emit(
                Fixed("classdef"),
                FieldText("name"),
                Slots(&[
                    Slot(Field("superclasses"), Inline, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("decorated_definition", Unwrap(Field("definition"))),
        ("decorator", Skip),
        ("comment", Skip),
        // parameters
        (
            "typed_parameter",
            emit(
                Fixed("arg"),
                KindText("identifier"),
                Slots(&[Slot(Field("type"), Direct, Load)]),
            ),
        ),
        (
            "default_parameter",
            emit(
                Fixed("arg"),
                FieldText("name"),
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        (
            "typed_default_parameter",
            emit(
                Fixed("arg"),
                FieldText("name"),
                Slots(&[
                    Slot(Field("type"), Direct, Load),
                    Slot(Field("value"), Direct, Load),
                ]),
            ),
        ),
        (
            "list_splat_pattern",
            emit(Fixed("vararg"), KindText("identifier"), Childless),
        ),
        (
            "dictionary_splat_pattern",
            emit(Fixed("kwarg"), KindText("identifier"), Childless),
        ),
        ("keyword_separator", Skip),
        ("positional_separator", Skip),
        ("type", emit(Fixed("type"), Text, Childless)),
        // expressions
        ("identifier", emit(NAME, Text, Childless)),
        ("integer", emit(Fixed("constant"), Literal, Childless)),
        ("float", emit(Fixed("constant"), Literal, Childless)),
        ("string", emit(Fixed("constant"), Unquoted, Childless)),
        ("concatenated_string", node("concat", All(Load))),
        ("true", emit(Fixed("constant"), Text, Childless)),
        ("false", emit(Fixed("constant"), Text, Childless)),
        ("none", emit(Fixed("constant"), Text, Childless)),
        ("ellipsis", emit(Fixed("constant"), Constant("..."), Childless)),
        ("binary_operator", emit(Binary, Absent, All(Load))),
        ("boolean_operator", emit(Binary, Absent, All(Load))),
        ("comparison_operator", emit(Binary, Absent, All(Load))),
        (
            "unary_operator",
            emit(Unary, Absent, Slots(&[Slot(Field("argument"), Direct, Load)])),
        ),
        (
            "not_operator",
            node("not", Slots(&[Slot(Field("argument"), Direct, Load)])),
        ),
        (
            "call",
            node(
                "call",
                Slots(&[
                    Slot(Field("function"), Direct, Load),
                    Slot(Field("arguments"), Group("arguments"), Load),
                ]),
            ),
        ),
        (
            "keyword_argument",
            emit(
                Fixed("keyword"),
                FieldText("name"),
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        ("list_splat", node("starred", All(Load))),
        ("dictionary_splat", node("doublestarred", All(Load))),
        (
            "attribute",
            emit(
                ATTRIBUTE,
                FieldText("attribute"),
                Slots(&[Slot(Field("object"), Direct, Load)]),
            ),
        ),
        (
            "subscript",
            node(
                "arrayaccess",
                Slots(&[
                    Slot(Field("value"), Direct, Load),
                    Slot(Field("subscript"), Direct, Load),
                ]),
            ),
        ),
        ("slice", node("slice", All(Load))),
        (
            "conditional_expression",
            node(
                "ternary",
                Slots(&[
                    Slot(Nth(1), Direct, Load),
                    Slot(Nth(0), Direct, Load),
                    Slot(Nth(2), Direct, Load),
                ]),
            ),
        ),
        (
            "lambda",
            node(
                "lambda",
                Slots(&[
                    Slot(Field("parameters"), Group("param"), Param),
                    Slot(Field("body"), Direct, Load),
                ]),
            ),
        ),
        ("list_comprehension", node("comprehension", All(Load))),
        ("set_comprehension", node("comprehension", All(Load))),
        ("dictionary_comprehension", node("comprehension", All(Load))),
        ("generator_expression", node("comprehension", All(Load))),
        (
            "for_in_clause",
            node(
                "for",
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        ("if_clause", node("filter", All(Load))),
        ("list", emit(LIST, Absent, All(Inherit))),
        ("list_pattern", emit(LIST, Absent, All(Inherit))),
        ("tuple", emit(TUPLE, Absent, All(Inherit))),
        ("tuple_pattern", emit(TUPLE, Absent, All(Inherit))),
        ("pattern_list", emit(TUPLE, Absent, All(Inherit))),
        ("expression_list", emit(TUPLE, Absent, All(Inherit))),
        ("set", node("set", All(Load))),
        ("dictionary", node("dict", All(Load))),
        (
            "pair",
            node(
                "pair",
                Slots(&[
                    Slot(Field("key"), Direct, Load),
                    Slot(Field("value"), Direct, Load),
                ]),
            ),
        ),
        ("parenthesized_expression", Unwrap(Named)),
        ("await", node("await", All(Load))),
        ("yield", node("yield", All(Load))),
    ],
};

static COARSE: RuleTable = RuleTable {
    name: "python/coarse",
    gap: GapRule::Drop,
    rules: &[
        ("expression_statement", Unwrap(Named)),
        (
            "assignment",
            node(
                "assignment",
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        (
            "augmented_assignment",
            node(
                "assignment",
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        ("return_statement", leaf("return")),
        ("raise_statement", leaf("throw")),
        ("assert_statement", leaf("assert")),
        ("break_statement", leaf("break")),
        ("continue_statement", leaf("continue")),
        ("import_statement", leaf("import")),
        ("import_from_statement", leaf("import")),
        ("future_import_statement", leaf("import")),
        ("if_statement", node("if", Slots(COARSE_IF))),
        ("elif_clause", node("if", Slots(COARSE_IF))),
        (
            "for_statement",
            node(
                "for",
                Slots(&[
                    Slot(Field("right"), Placeholder("condition"), Load),
                    Slot(Field("body"), Group("block"), Load),
                    Slot(Field("alternative"), Alternate("block"), Load),
                ]),
            ),
        ),
        (
            "while_statement",
            node(
                "while",
                Slots(&[
                    Slot(Field("condition"), Placeholder("condition"), Load),
                    Slot(Field("body"), Group("block"), Load),
                    Slot(Field("alternative"), Alternate("block"), Load),
                ]),
            ),
        ),
        ("try_statement", node("try", Slots(TRY))),
        (
            "except_clause",
            node("catch", Slots(&[Slot(Kind("block"), Group("block"), Load)])),
        ),
        (
            "except_group_clause",
            node("catch", Slots(&[Slot(Kind("block"), Group("block"), Load)])),
        ),
        (
            "function_definition",
            emit(Fixed("funcdef"), FieldText("name"), Slots(FUNCTION)),
        ),
        (
            "lambda",
            emit(
                Fixed("funcdef"),
                Constant("lambda"),
                Slots(&[
                    Slot(Field("parameters"), Group("param"), Param),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        (
            "class_definition",
            emit(
                Fixed("classdef"),
                FieldText("name"),
                Slots(&[Slot(Field("body"), Group("block"), Load)]),
            ),
        ),
        ("decorated_definition", Unwrap(Field("definition"))),
        ("typed_parameter", leaf("arg")),
        ("default_parameter", leaf("arg")),
        ("typed_default_parameter", leaf("arg")),
        (
            "list_splat_pattern",
            emit(Fixed("vararg"), KindText("identifier"), Childless),
        ),
        (
            "dictionary_splat_pattern",
            emit(Fixed("kwarg"), KindText("identifier"), Childless),
        ),
        ("identifier", emit(NAME, Text, Childless)),
        ("integer", emit(Fixed("constant"), Literal, Childless)),
        ("float", emit(Fixed("constant"), Literal, Childless)),
        ("string", emit(Fixed("constant"), Unquoted, Childless)),
        ("concatenated_string", emit(Fixed("constant"), Unquoted, Childless)),
        ("true", emit(Fixed("constant"), Text, Childless)),
        ("false", emit(Fixed("constant"), Text, Childless)),
        ("none", emit(Fixed("constant"), Text, Childless)),
        ("ellipsis", emit(Fixed("constant"), Constant("..."), Childless)),
        ("binary_operator", node("binaryop", All(Load))),
        ("boolean_operator", node("binaryop", All(Load))),
        ("comparison_operator", node("binaryop", All(Load))),
        ("unary_operator", node("unaryop", All(Load))),
        ("not_operator", node("unaryop", All(Load))),
        (
            "call",
            node(
                "call",
                Slots(&[
                    Slot(Field("function"), Direct, Load),
                    Slot(Field("arguments"), Inline, Load),
                ]),
            ),
        ),
        ("keyword_argument", Unwrap(Field("value"))),
        ("list_splat", Unwrap(Named)),
        ("dictionary_splat", Unwrap(Named)),
        (
            "attribute",
            emit(
                COARSE_ATTRIBUTE,
                FieldText("attribute"),
                Slots(&[Slot(Field("object"), Direct, Load)]),
            ),
        ),
        (
            "subscript",
            node(
                "arrayaccess",
                Slots(&[
                    Slot(Field("value"), Direct, Load),
                    Slot(Field("subscript"), Direct, Load),
                ]),
            ),
        ),
        ("conditional_expression", leaf("ternary")),
        ("list_comprehension", leaf("for")),
        ("set_comprehension", leaf("for")),
        ("dictionary_comprehension", leaf("for")),
        ("generator_expression", leaf("for")),
        ("list", emit(COARSE_LIST, Absent, All(Inherit))),
        ("list_pattern", emit(COARSE_LIST, Absent, All(Inherit))),
        // Tuples degenerate to an empty name placeholder.
        ("tuple", emit(NAME, Absent, Childless)),
        ("tuple_pattern", emit(NAME, Absent, Childless)),
        ("pattern_list", emit(NAME, Absent, Childless)),
        ("expression_list", emit(NAME, Absent, Childless)),
        ("parenthesized_expression", Unwrap(Named)),
        ("comment", Skip),
        ("decorator", Skip),
    ],
};
