//! Java adapter (tree-sitter-java).

use super::prelude::*;
use crate::languages::Language;
use crate::native::NativeAdapter;

pub struct JavaAdapter;

impl NativeAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn rules(&self, granularity: Granularity) -> Option<&'static RuleTable> {
        match granularity {
            Granularity::Verbatim => None,
            Granularity::Fine => Some(&FINE),
            Granularity::Coarse => Some(&COARSE),
        }
    }

    fn verbatim_prefix(&self) -> &'static str {
        "java_"
    }

    fn containers(&self) -> &'static [&'static str] {
        &[
            "block",
            "class_body",
            "interface_body",
            "enum_body",
            "enum_body_declarations",
            "annotation_type_body",
            "constructor_body",
            "formal_parameters",
            "inferred_parameters",
            "argument_list",
            "switch_block",
            "resource_specification",
        ]
    }

    fn clauses(&self) -> &'static [&'static str] {
        &["finally_clause"]
    }

    fn simplify_rules(&self) -> &'static SimplifyRules {
        &SIMPLIFY
    }
}

static SIMPLIFY: SimplifyRules = SimplifyRules {
    drop: &["line_comment", "block_comment"],
    unwrap: &["parenthesized_expression"],
    docstring_owners: &[],
};

const ATTRIBUTE: TypeRule = Context {
    load: "AttributeLoad",
    store: "AttributeStore",
    param: "AttributeLoad",
};

const CLASS: Disposition = emit(
    Fixed("classdef"),
    FieldText("name"),
    Slots(&[Slot(Field("body"), Group("block"), Load)]),
);

const FUNCTION: Disposition = emit(
    Fixed("funcdef"),
    FieldText("name"),
    Slots(&[
        Slot(Field("parameters"), Group("param"), Param),
        Slot(Field("body"), Group("block"), Load),
    ]),
);

const VARDEC: Disposition = node(
    "vardec",
    Slots(&[
        Slot(Field("type"), Direct, Load),
        Slot(Field("declarator"), Direct, Store),
    ]),
);

const TYPE: Disposition = emit(Fixed("type"), Text, Childless);
const NUMBER: Disposition = emit(Fixed("constant"), Literal, Childless);
const QUOTED: Disposition = emit(Fixed("constant"), Unquoted, Childless);
const KEYWORD: Disposition = emit(Fixed("constant"), Text, Childless);

const CALL_FINE: Disposition = emit(
    Fixed("call"),
    FieldText("name"),
    Slots(&[
        Slot(Field("object"), Direct, Load),
        Slot(Field("arguments"), Group("arguments"), Load),
    ]),
);

const TRY_FINE: &[Slot] = &[
    Slot(Field("resources"), Inline, Load),
    Slot(Field("body"), Group("block"), Load),
    Slot(Kind("catch_clause"), Direct, Load),
    Slot(Kind("finally_clause"), Alternate("block"), Load),
];

static FINE: RuleTable = RuleTable {
    name: "java/fine",
    gap: GapRule::Recurse,
    rules: &[
        // declarations
        ("package_declaration", Skip),
        ("import_declaration", leaf("import")),
        ("class_declaration", CLASS),
        ("interface_declaration", CLASS),
        ("enum_declaration", CLASS),
        ("record_declaration", CLASS),
        ("annotation_type_declaration", CLASS),
        ("field_declaration", VARDEC),
        ("constant_declaration", VARDEC),
        ("local_variable_declaration", VARDEC),
        (
            "variable_declarator",
            emit(
                Fixed("var"),
                FieldText("name"),
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        ("enum_constant", emit(Fixed("var"), FieldText("name"), Childless)),
        ("method_declaration", FUNCTION),
        ("constructor_declaration", FUNCTION),
        ("compact_constructor_declaration", FUNCTION),
        (
            "formal_parameter",
            emit(
                Fixed("arg"),
                FieldText("name"),
                Slots(&[Slot(Field("type"), Direct, Load)]),
            ),
        ),
        (
            "spread_parameter",
            emit(
                Fixed("vararg"),
                KindText("variable_declarator"),
                Slots(&[Slot(Nth(0), Direct, Load)]),
            ),
        ),
        ("receiver_parameter", Skip),
        ("static_initializer", Unwrap(Named)),
        ("block", node("block", All(Load))),
        // statements
        ("expression_statement", Unwrap(Named)),
        (
            "if_statement",
            node(
                "if",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("consequence"), Group("block"), Load),
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
                ]),
            ),
        ),
        (
            "do_statement",
            node(
                "dowhile",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        (
            "for_statement",
            node(
                "for",
                Slots(&[
                    Slot(Field("init"), Direct, Load),
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("update"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        (
            "enhanced_for_statement",
            node(
                "foreach",
                Slots(&[
                    Slot(Field("type"), Direct, Load),
                    Slot(Field("name"), Direct, Store),
                    Slot(Field("value"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("try_statement", node("try", Slots(TRY_FINE))),
        ("try_with_resources_statement", node("try", Slots(TRY_FINE))),
        (
            "resource",
            emit(
                Fixed("var"),
                FieldText("name"),
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        (
            "catch_clause",
            node(
                "catch",
                Slots(&[
                    Slot(Kind("catch_formal_parameter"), Direct, Param),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        (
            "catch_formal_parameter",
            emit(
                Fixed("arg"),
                FieldText("name"),
                Slots(&[Slot(Kind("catch_type"), Direct, Load)]),
            ),
        ),
        ("catch_type", TYPE),
        (
            "switch_expression",
            node(
                "switch",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("switch_block_statement_group", node("case", All(Load))),
        ("switch_rule", node("case", All(Load))),
        ("switch_label", Unwrap(Named)),
        ("return_statement", node("return", All(Load))),
        ("throw_statement", node("throw", All(Load))),
        ("yield_statement", node("yield", All(Load))),
        ("assert_statement", node("assert", All(Load))),
        ("break_statement", leaf("break")),
        ("continue_statement", leaf("continue")),
        ("labeled_statement", node("labeled", All(Load))),
        ("synchronized_statement", node("synchronized", All(Load))),
        (
            "explicit_constructor_invocation",
            node(
                "call",
                Slots(&[
                    Slot(Field("constructor"), Direct, Load),
                    Slot(Field("arguments"), Group("arguments"), Load),
                ]),
            ),
        ),
        // expressions
        ("method_invocation", CALL_FINE),
        (
            "object_creation_expression",
            node(
                "call",
                Slots(&[
                    Slot(Field("type"), Direct, Load),
                    Slot(Field("arguments"), Group("arguments"), Load),
                ]),
            ),
        ),
        (
            "assignment_expression",
            emit(
                Fixed("assignment"),
                Compound,
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        ("binary_expression", emit(Binary, Absent, All(Load))),
        ("unary_expression", emit(Unary, Absent, All(Load))),
        ("update_expression", emit(Unary, Absent, All(Load))),
        (
            "ternary_expression",
            node(
                "ternary",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("consequence"), Direct, Load),
                    Slot(Field("alternative"), Direct, Load),
                ]),
            ),
        ),
        ("instanceof_expression", node("instanceof", All(Load))),
        (
            "field_access",
            emit(
                ATTRIBUTE,
                FieldText("field"),
                Slots(&[Slot(Field("object"), Direct, Load)]),
            ),
        ),
        (
            "array_access",
            node(
                "arrayaccess",
                Slots(&[
                    Slot(Field("array"), Direct, Load),
                    Slot(Field("index"), Direct, Load),
                ]),
            ),
        ),
        (
            "cast_expression",
            node(
                "cast",
                Slots(&[
                    Slot(Field("type"), Direct, Load),
                    Slot(Field("value"), Direct, Load),
                ]),
            ),
        ),
        (
            "lambda_expression",
            node(
                "lambda",
                Slots(&[
                    Slot(Field("parameters"), Group("param"), Param),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("method_reference", node("methodref", All(Load))),
        ("array_creation_expression", node("arraydec", All(Load))),
        ("dimensions_expr", Unwrap(Named)),
        ("array_initializer", node("ListLoad", All(Load))),
        ("class_literal", node("expression", All(Load))),
        ("parenthesized_expression", Unwrap(Named)),
        ("identifier", emit(NAME, Text, Childless)),
        ("this", emit(Fixed("identifier"), Text, Childless)),
        ("super", emit(Fixed("identifier"), Text, Childless)),
        // literals
        ("decimal_integer_literal", NUMBER),
        ("hex_integer_literal", NUMBER),
        ("octal_integer_literal", NUMBER),
        ("binary_integer_literal", NUMBER),
        ("decimal_floating_point_literal", NUMBER),
        ("hex_floating_point_literal", NUMBER),
        ("string_literal", QUOTED),
        ("text_block", QUOTED),
        ("character_literal", QUOTED),
        ("true", KEYWORD),
        ("false", KEYWORD),
        ("null_literal", KEYWORD),
        // types
        ("type_identifier", TYPE),
        ("integral_type", TYPE),
        ("floating_point_type", TYPE),
        ("boolean_type", TYPE),
        ("void_type", TYPE),
        ("generic_type", TYPE),
        ("array_type", TYPE),
        ("scoped_type_identifier", TYPE),
        // noise
        ("line_comment", Skip),
        ("block_comment", Skip),
        ("modifiers", Skip),
        ("marker_annotation", Skip),
        ("annotation", Skip),
    ],
};

const COARSE_LOOP: &[Slot] = &[
    Slot(Field("condition"), Placeholder("condition"), Load),
    Slot(Field("body"), Group("block"), Load),
];

const CALL_COARSE: Disposition = emit(
    Fixed("call"),
    FieldText("name"),
    Slots(&[
        Slot(Field("object"), Direct, Load),
        Slot(Field("arguments"), Inline, Load),
    ]),
);

const TRY_COARSE: &[Slot] = &[
    Slot(Field("body"), Group("block"), Load),
    Slot(Kind("catch_clause"), Direct, Load),
    Slot(Kind("finally_clause"), Alternate("block"), Load),
];

static COARSE: RuleTable = RuleTable {
    name: "java/coarse",
    gap: GapRule::Drop,
    rules: &[
        ("import_declaration", leaf("import")),
        ("class_declaration", CLASS),
        ("interface_declaration", CLASS),
        ("enum_declaration", CLASS),
        ("record_declaration", CLASS),
        ("field_declaration", Unwrap(Field("declarator"))),
        ("constant_declaration", Unwrap(Field("declarator"))),
        ("local_variable_declaration", Unwrap(Field("declarator"))),
        (
            "variable_declarator",
            emit(
                Fixed("var"),
                FieldText("name"),
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        ("method_declaration", FUNCTION),
        ("constructor_declaration", FUNCTION),
        ("formal_parameter", emit(Fixed("arg"), FieldText("name"), Childless)),
        (
            "spread_parameter",
            emit(Fixed("arg"), KindText("variable_declarator"), Childless),
        ),
        ("block", node("block", All(Load))),
        ("expression_statement", Unwrap(Named)),
        (
            "if_statement",
            node(
                "if",
                Slots(&[
                    Slot(Field("condition"), Placeholder("condition"), Load),
                    Slot(Field("consequence"), Group("block"), Load),
                    Slot(Field("alternative"), Alternate("block"), Load),
                ]),
            ),
        ),
        ("while_statement", node("while", Slots(COARSE_LOOP))),
        ("do_statement", node("while", Slots(COARSE_LOOP))),
        ("for_statement", node("for", Slots(COARSE_LOOP))),
        ("enhanced_for_statement", node("for", Slots(COARSE_LOOP))),
        ("try_statement", node("try", Slots(TRY_COARSE))),
        ("try_with_resources_statement", node("try", Slots(TRY_COARSE))),
        (
            "catch_clause",
            node("catch", Slots(&[Slot(Field("body"), Group("block"), Load)])),
        ),
        ("return_statement", leaf("return")),
        ("throw_statement", leaf("throw")),
        ("assert_statement", leaf("assert")),
        ("break_statement", leaf("break")),
        ("continue_statement", leaf("continue")),
        ("method_invocation", CALL_COARSE),
        (
            "object_creation_expression",
            node(
                "call",
                Slots(&[Slot(Field("arguments"), Inline, Load)]),
            ),
        ),
        (
            "assignment_expression",
            node(
                "assignment",
                Slots(&[
                    Slot(Field("left"), Direct, Store),
                    Slot(Field("right"), Direct, Load),
                ]),
            ),
        ),
        ("binary_expression", node("binaryop", All(Load))),
        ("unary_expression", node("unaryop", All(Load))),
        ("update_expression", node("unaryop", All(Load))),
        ("ternary_expression", leaf("ternary")),
        (
            "field_access",
            emit(
                Fixed("AttributeLoad"),
                FieldText("field"),
                Slots(&[Slot(Field("object"), Direct, Load)]),
            ),
        ),
        (
            "array_access",
            node(
                "arrayaccess",
                Slots(&[
                    Slot(Field("array"), Direct, Load),
                    Slot(Field("index"), Direct, Load),
                ]),
            ),
        ),
        ("cast_expression", Unwrap(Field("value"))),
        (
            "lambda_expression",
            emit(
                Fixed("funcdef"),
                Constant("lambda"),
                Slots(&[
                    Slot(Field("parameters"), Group("param"), Param),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("array_initializer", node("ListLoad", All(Load))),
        ("parenthesized_expression", Unwrap(Named)),
        ("identifier", emit(NAME, Text, Childless)),
        ("decimal_integer_literal", NUMBER),
        ("hex_integer_literal", NUMBER),
        ("octal_integer_literal", NUMBER),
        ("binary_integer_literal", NUMBER),
        ("decimal_floating_point_literal", NUMBER),
        ("hex_floating_point_literal", NUMBER),
        ("string_literal", QUOTED),
        ("text_block", QUOTED),
        ("character_literal", QUOTED),
        ("true", KEYWORD),
        ("false", KEYWORD),
        ("null_literal", KEYWORD),
    ],
};
