//! Granularity policies as data.
//!
//! A policy maps each native node kind to a [`Disposition`]: emit a node
//! (with a type rule, a value rule and a child layout), unwrap transparently
//! to a selected child, or skip. Fine and coarse tables live next to each
//! adapter; verbatim needs no table at all.

use crate::native::NativeAdapter;
use crate::languages::Language;
use std::collections::HashMap;

pub use gast_core::config::Granularity;

/// Name-resolution context flowing from a parent into its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Load,
    Store,
    Param,
}

/// Context a slot hands to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCtx {
    Load,
    Store,
    Param,
    Inherit,
}

impl SlotCtx {
    pub fn resolve(self, parent: Access) -> Access {
        match self {
            Self::Load => Access::Load,
            Self::Store => Access::Store,
            Self::Param => Access::Param,
            Self::Inherit => parent,
        }
    }
}

/// How the canonical `type` of an emitted node is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    Fixed(&'static str),
    /// The native kind, with the policy's prefix.
    Native,
    /// Binary operator symbol through [`binary_symbol`].
    Binary,
    /// Unary operator symbol through [`unary_symbol`].
    Unary,
    /// Chosen by the access context.
    Context {
        load: &'static str,
        store: &'static str,
        param: &'static str,
    },
    /// Chosen by the kind of the child in `field`; `default` when unmatched.
    Tagged {
        field: &'static str,
        tags: &'static [(&'static str, &'static str)],
        default: &'static str,
    },
}

/// How the `value` of an emitted node is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    Absent,
    /// Coerced literal: int, then float, else text.
    Literal,
    /// String literal body with prefix letters and quotes removed.
    Unquoted,
    Text,
    /// Text of the child occupying a field.
    FieldText(&'static str),
    /// Text of the first named child of a kind.
    KindText(&'static str),
    /// Name at the bottom of a `declarator` chain.
    DeclName,
    /// Canonical name of a compound assignment operator (`+=` → `add`);
    /// absent for plain `=`.
    Compound,
    Constant(&'static str),
    /// Coerced text when the node has no named children.
    LeafText,
}

/// Which native children a slot draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Select {
    Named,
    Field(&'static str),
    Kind(&'static str),
    /// The n-th named, non-extra child.
    Nth(usize),
    /// Children in `field` of the first node along the declarator chain
    /// that has such a field.
    Declarator(&'static str),
    /// Children in `field` of every same-kind link of the declarator chain,
    /// in source order.
    Chain(&'static str),
}

/// How a slot's selected children are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Each selected child normalized in place.
    Direct,
    /// Always a synthetic node of this type, containers spliced into it.
    Group(&'static str),
    /// A synthetic node of this type only when something is selected;
    /// a non-block alternative (elif, else-if) nests inside it.
    Alternate(&'static str),
    /// Containers spliced straight into the parent.
    Inline,
    /// An empty synthetic node standing in for the real content.
    Placeholder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(pub Select, pub Shape, pub SlotCtx);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Children {
    Childless,
    All(SlotCtx),
    Slots(&'static [Slot]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule(pub TypeRule, pub ValueRule, pub Children);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Emit(Rule),
    /// The node gets no id; its selected child stands in for it.
    Unwrap(Select),
    Skip,
}

/// What happens to native kinds a table has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapRule {
    /// Keep a node typed by the bare native kind and recurse.
    Recurse,
    /// Produce nothing for the subtree.
    Drop,
}

#[derive(Debug)]
pub struct RuleTable {
    pub name: &'static str,
    pub rules: &'static [(&'static str, Disposition)],
    pub gap: GapRule,
}

/// A node with a fixed type and no value.
pub const fn node(kind: &'static str, children: Children) -> Disposition {
    Disposition::Emit(Rule(TypeRule::Fixed(kind), ValueRule::Absent, children))
}

/// A childless node with a fixed type and no value.
pub const fn leaf(kind: &'static str) -> Disposition {
    node(kind, Children::Childless)
}

pub const fn emit(ty: TypeRule, value: ValueRule, children: Children) -> Disposition {
    Disposition::Emit(Rule(ty, value, children))
}

const VERBATIM: Disposition = emit(
    TypeRule::Native,
    ValueRule::LeafText,
    Children::All(SlotCtx::Inherit),
);

/// A resolved policy for one language and granularity.
pub struct Policy {
    language: Language,
    granularity: Granularity,
    prefix: &'static str,
    index: Option<HashMap<&'static str, Disposition>>,
    gap: GapRule,
    containers: &'static [&'static str],
    clauses: &'static [&'static str],
}

impl Policy {
    pub fn new(adapter: &dyn NativeAdapter, granularity: Granularity) -> Self {
        let table = adapter.rules(granularity);
        let index = table.map(|t| t.rules.iter().copied().collect::<HashMap<_, _>>());
        Self {
            language: adapter.language(),
            granularity,
            prefix: if table.is_none() {
                adapter.verbatim_prefix()
            } else {
                ""
            },
            index,
            gap: table.map_or(GapRule::Recurse, |t| t.gap),
            containers: adapter.containers(),
            clauses: adapter.clauses(),
        }
    }

    pub fn for_language(language: Language, granularity: Granularity) -> Self {
        Self::new(language.adapter(), granularity)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn gap_rule(&self) -> GapRule {
        self.gap
    }

    /// Disposition for a native kind, `None` for a normalization gap.
    pub fn disposition(&self, kind: &str) -> Option<Disposition> {
        match &self.index {
            Some(index) => index.get(kind).copied(),
            None => Some(VERBATIM),
        }
    }

    pub fn is_container(&self, kind: &str) -> bool {
        self.containers.contains(&kind)
    }

    pub fn is_clause(&self, kind: &str) -> bool {
        self.clauses.contains(&kind)
    }
}

/// Canonical name of a binary operator. Unknown symbols give `""`.
pub fn binary_symbol(op: &str) -> &'static str {
    match op {
        "&&" | "and" => "and",
        "||" | "or" => "or",
        "+" => "add",
        "-" => "sub",
        "*" => "multiply",
        "/" => "divide",
        "//" => "floordiv",
        "%" => "remainder",
        "**" => "pow",
        "@" => "matmul",
        "<<" => "lshift",
        ">>" => "rshift",
        ">>>" => "unsignedrshift",
        "|" => "bitor",
        "^" => "bitxor",
        "&" => "bitand",
        "==" => "equal",
        "!=" | "<>" => "notequal",
        "<" => "lt",
        "<=" => "lte",
        ">" => "gt",
        ">=" => "gte",
        "is" => "is",
        "is not" => "isnot",
        "in" => "in",
        "not in" => "notin",
        _ => "",
    }
}

/// Canonical name of a unary operator. Unknown symbols give `""`.
pub fn unary_symbol(op: &str) -> &'static str {
    match op {
        "~" => "invert",
        "!" | "not" => "not",
        "+" => "uadd",
        "-" => "usub",
        "++" => "increment",
        "--" => "decrement",
        "&" => "addressof",
        "*" => "dereference",
        "sizeof" => "sizeof",
        _ => "",
    }
}

/// Canonical name of a compound assignment operator, `None` for plain `=`.
pub fn compound_symbol(op: &str) -> Option<&'static str> {
    let base = op.strip_suffix('=')?;
    if base.is_empty() {
        return None;
    }
    Some(binary_symbol(base))
}

/// Strip string prefix letters (`b`, `r`, `f`, `u`, `L`, ...) and one layer
/// of matching single or triple quotes. Anything unrecognized is returned as is.
pub fn unquote(text: &str) -> &str {
    let body = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len()
            && let Some(inner) = body.strip_prefix(quote).and_then(|b| b.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
