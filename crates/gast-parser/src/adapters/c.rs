//! C adapter (tree-sitter-c).

use super::prelude::*;
use crate::languages::Language;
use crate::native::NativeAdapter;

pub struct CAdapter;

impl NativeAdapter for CAdapter {
    fn language(&self) -> Language {
        Language::C
    }

    fn rules(&self, granularity: Granularity) -> Option<&'static RuleTable> {
        match granularity {
            Granularity::Verbatim => None,
            Granularity::Fine => Some(&FINE),
            Granularity::Coarse => Some(&COARSE),
        }
    }

    fn verbatim_prefix(&self) -> &'static str {
        "c_"
    }

    fn containers(&self) -> &'static [&'static str] {
        &[
            "compound_statement",
            "parameter_list",
            "argument_list",
            "field_declaration_list",
            "enumerator_list",
        ]
    }

    fn clauses(&self) -> &'static [&'static str] {
        &["else_clause"]
    }

    fn simplify_rules(&self) -> &'static SimplifyRules {
        &SIMPLIFY
    }
}

static SIMPLIFY: SimplifyRules = SimplifyRules {
    drop: &["comment", "preproc_call"],
    unwrap: &["parenthesized_expression"],
    docstring_owners: &[],
};

/// Declarator wrapper kinds and the tag the collapsed declaration carries.
const DECLARATOR_TAGS: &[(&str, &str)] = &[
    ("pointer_declarator", "pointer"),
    ("array_declarator", "arraydec"),
    ("function_declarator", "funcdec"),
];

const ATTRIBUTE: TypeRule = Context {
    load: "AttributeLoad",
    store: "AttributeStore",
    param: "AttributeLoad",
};

const FUNCTION: Disposition = emit(
    Fixed("funcdef"),
    DeclName,
    Slots(&[
        Slot(Declarator("parameters"), Group("param"), Param),
        Slot(Field("body"), Group("block"), Load),
    ]),
);

const DECLARATION: Disposition = node(
    "vardec",
    Slots(&[
        Slot(Field("type"), Direct, Load),
        Slot(Field("declarator"), Direct, Store),
    ]),
);

const INIT_DECLARATOR: Disposition = emit(
    Tagged {
        field: "declarator",
        tags: DECLARATOR_TAGS,
        default: "var",
    },
    DeclName,
    Slots(&[Slot(Field("value"), Direct, Load)]),
);

const RECORD: Disposition = emit(
    Fixed("struct"),
    FieldText("name"),
    Slots(&[Slot(Field("body"), Direct, Load)]),
);

const TYPE: Disposition = emit(Fixed("type"), Text, Childless);
const NUMBER: Disposition = emit(Fixed("constant"), Literal, Childless);
const QUOTED: Disposition = emit(Fixed("constant"), Unquoted, Childless);
const KEYWORD: Disposition = emit(Fixed("constant"), Text, Childless);

static FINE: RuleTable = RuleTable {
    name: "c/fine",
    gap: GapRule::Recurse,
    rules: &[
        // declarations
        ("function_definition", FUNCTION),
        (
            "parameter_declaration",
            emit(
                Fixed("arg"),
                DeclName,
                Slots(&[Slot(Field("type"), Direct, Load)]),
            ),
        ),
        ("variadic_parameter", leaf("vararg")),
        ("declaration", DECLARATION),
        ("field_declaration", DECLARATION),
        ("init_declarator", INIT_DECLARATOR),
        ("pointer_declarator", emit(Fixed("pointer"), DeclName, Childless)),
        (
            "array_declarator",
            emit(
                Fixed("arraydec"),
                DeclName,
                Slots(&[Slot(Chain("size"), Direct, Load)]),
            ),
        ),
        (
            "function_declarator",
            emit(
                Fixed("funcdec"),
                DeclName,
                Slots(&[Slot(Field("parameters"), Group("param"), Param)]),
            ),
        ),
        (
            "type_definition",
            node(
                "typedef",
                Slots(&[
                    Slot(Field("type"), Direct, Load),
                    Slot(Field("declarator"), Direct, Store),
                ]),
            ),
        ),
        ("struct_specifier", RECORD),
        ("union_specifier", RECORD),
        (
            "enum_specifier",
            emit(
                Fixed("enum"),
                FieldText("name"),
                Slots(&[Slot(Field("body"), Direct, Load)]),
            ),
        ),
        ("field_declaration_list", node("block", All(Load))),
        ("enumerator_list", node("block", All(Load))),
        (
            "enumerator",
            emit(
                Fixed("var"),
                FieldText("name"),
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        ("compound_statement", node("block", All(Load))),
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
                    Slot(Field("initializer"), Direct, Load),
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("update"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        (
            "switch_statement",
            node(
                "switch",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("body"), Group("block"), Load),
                ]),
            ),
        ),
        ("case_statement", node("case", All(Load))),
        ("return_statement", node("return", All(Load))),
        ("break_statement", leaf("break")),
        ("continue_statement", leaf("continue")),
        ("goto_statement", emit(Fixed("goto"), FieldText("label"), Childless)),
        (
            "labeled_statement",
            emit(
                Fixed("label"),
                FieldText("label"),
                Slots(&[Slot(Nth(1), Direct, Load)]),
            ),
        ),
        // expressions
        (
            "call_expression",
            node(
                "call",
                Slots(&[
                    Slot(Field("function"), Direct, Load),
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
        ("pointer_expression", emit(Unary, Absent, All(Load))),
        ("update_expression", emit(Unary, Absent, All(Load))),
        ("sizeof_expression", node("sizeof", All(Load))),
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
            "subscript_expression",
            node(
                "arrayaccess",
                Slots(&[
                    Slot(Field("argument"), Direct, Load),
                    Slot(Field("index"), Direct, Load),
                ]),
            ),
        ),
        (
            "field_expression",
            emit(
                ATTRIBUTE,
                FieldText("field"),
                Slots(&[Slot(Field("argument"), Direct, Load)]),
            ),
        ),
        (
            "conditional_expression",
            node(
                "ternary",
                Slots(&[
                    Slot(Field("condition"), Direct, Load),
                    Slot(Field("consequence"), Direct, Load),
                    Slot(Field("alternative"), Direct, Load),
                ]),
            ),
        ),
        ("comma_expression", node("expression", All(Load))),
        ("initializer_list", node("ListLoad", All(Load))),
        ("initializer_pair", node("pair", All(Load))),
        ("parenthesized_expression", Unwrap(Named)),
        ("identifier", emit(NAME, Text, Childless)),
        ("field_identifier", emit(NAME, Text, Childless)),
        // literals
        ("number_literal", NUMBER),
        ("string_literal", QUOTED),
        ("char_literal", QUOTED),
        ("concatenated_string", node("concat", All(Load))),
        ("true", KEYWORD),
        ("false", KEYWORD),
        ("null", KEYWORD),
        // types
        ("primitive_type", TYPE),
        ("sized_type_specifier", TYPE),
        ("type_identifier", TYPE),
        ("type_descriptor", TYPE),
        // preprocessor
        ("preproc_include", emit(Fixed("import"), FieldText("path"), Childless)),
        ("preproc_def", emit(Fixed("define"), FieldText("name"), Childless)),
        (
            "preproc_function_def",
            emit(Fixed("define"), FieldText("name"), Childless),
        ),
        (
            "preproc_call",
            emit(Fixed("directive"), FieldText("directive"), Childless),
        ),
        ("preproc_if", node("preproc", All(Load))),
        ("preproc_ifdef", node("preproc", All(Load))),
        ("preproc_else", node("preproc", All(Load))),
        ("preproc_elif", node("preproc", All(Load))),
        // noise
        ("comment", Skip),
        ("storage_class_specifier", Skip),
        ("type_qualifier", Skip),
        ("attribute_specifier", Skip),
    ],
};

const COARSE_LOOP: &[Slot] = &[
    Slot(Field("condition"), Placeholder("condition"), Load),
    Slot(Field("body"), Group("block"), Load),
];

static COARSE: RuleTable = RuleTable {
    name: "c/coarse",
    gap: GapRule::Drop,
    rules: &[
        ("function_definition", FUNCTION),
        (
            "parameter_declaration",
            emit(Fixed("arg"), DeclName, Childless),
        ),
        ("declaration", Unwrap(Field("declarator"))),
        ("field_declaration", Unwrap(Field("declarator"))),
        (
            "init_declarator",
            emit(
                Fixed("var"),
                DeclName,
                Slots(&[Slot(Field("value"), Direct, Load)]),
            ),
        ),
        ("pointer_declarator", emit(Fixed("var"), DeclName, Childless)),
        ("array_declarator", emit(Fixed("var"), DeclName, Childless)),
        ("struct_specifier", RECORD),
        ("union_specifier", RECORD),
        ("field_declaration_list", node("block", All(Load))),
        ("compound_statement", node("block", All(Load))),
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
        ("return_statement", leaf("return")),
        ("break_statement", leaf("break")),
        ("continue_statement", leaf("continue")),
        (
            "call_expression",
            node(
                "call",
                Slots(&[
                    Slot(Field("function"), Direct, Load),
                    Slot(Field("arguments"), Inline, Load),
                ]),
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
        ("pointer_expression", node("unaryop", All(Load))),
        ("update_expression", node("unaryop", All(Load))),
        ("sizeof_expression", node("unaryop", All(Load))),
        ("cast_expression", Unwrap(Field("value"))),
        (
            "subscript_expression",
            node(
                "arrayaccess",
                Slots(&[
                    Slot(Field("argument"), Direct, Load),
                    Slot(Field("index"), Direct, Load),
                ]),
            ),
        ),
        (
            "field_expression",
            emit(
                Fixed("AttributeLoad"),
                FieldText("field"),
                Slots(&[Slot(Field("argument"), Direct, Load)]),
            ),
        ),
        ("conditional_expression", leaf("ternary")),
        ("comma_expression", node("expression", All(Load))),
        ("initializer_list", node("ListLoad", All(Load))),
        ("parenthesized_expression", Unwrap(Named)),
        ("identifier", emit(NAME, Text, Childless)),
        ("field_identifier", emit(NAME, Text, Childless)),
        ("number_literal", NUMBER),
        ("string_literal", QUOTED),
        ("char_literal", QUOTED),
        ("true", KEYWORD),
        ("false", KEYWORD),
        ("null", KEYWORD),
    ],
};
