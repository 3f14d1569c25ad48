//! Stage an Obsidian vault as a MyST Jupyter Book source tree.
//!
//! The pipeline walks the vault, indexes every file under a normalized key,
//! copies the tree into a staging directory while rewriting `![[embeds]]`,
//! and writes a `myst.yml` describing the book.

pub mod config;
pub mod myst;
pub mod normalize;
pub mod pipeline;
pub mod rewrite;
pub mod stage;
pub mod vault;
