//! Native adapters, one per source language, each with its fine and coarse
//! rule tables.

pub mod c;
pub mod java;
pub mod python;

/// Everything a rule table needs, variants included, so tables read as data.
mod prelude {
    pub use crate::policy::Children::*;
    pub use crate::policy::Disposition::*;
    pub use crate::policy::Select::*;
    pub use crate::policy::Shape::*;
    pub use crate::policy::SlotCtx::*;
    pub use crate::policy::TypeRule::*;
    pub use crate::policy::ValueRule::*;
    pub use crate::policy::{
        Disposition, GapRule, Granularity, RuleTable, Slot, TypeRule, emit, leaf, node,
    };
    pub use crate::simplify::SimplifyRules;

    /// Identifier typed by access context.
    pub const NAME: TypeRule = Context {
        load: "identifier",
        store: "var",
        param: "arg",
    };
}
