//! Native syntax trees in, generic node tables out.
//!
//! Each supported language has a [`native::NativeAdapter`] wrapping its
//! tree-sitter grammar and carrying declarative rule tables for the fine and
//! coarse granularities. A single [`builder::TreeBuilder`] walks any native
//! tree under any [`policy::Policy`].

pub mod adapters;
pub mod builder;
pub mod languages;
pub mod native;
pub mod policy;
pub mod simplify;
pub mod treesitter;

use gast_core::config::GenerateConfig;

pub use builder::{Normalized, generate};
pub use languages::Language;
pub use native::{NativeAdapter, NativeTree, ParseFailure};
pub use policy::Policy;

/// Parse `source` as `language` and normalize it with the given options.
///
/// This is the whole per-file pipeline minus file reading: adapter parse,
/// optional simplification, then tree building.
pub fn generate_source(
    language: Language,
    source: &str,
    options: &GenerateConfig,
) -> Result<Normalized, ParseFailure> {
    let adapter = language.adapter();
    let mut tree = adapter.parse(source)?;
    if options.normalize {
        simplify::simplify(&mut tree, adapter.simplify_rules());
    }
    let policy = Policy::new(adapter, options.granularity);
    Ok(generate(&tree, &policy))
}
