//! Obsidian marker rewriting.
//!
//! Turns `![[file]]` embeds into image tags or download links and `[[note]]`
//! wikilinks into relative markdown links, resolving every reference through
//! the [`FileIndex`](crate::vault::FileIndex).

mod code;
mod embed;
mod rewriter;

pub use embed::{LinkReference, MarkerKind};
pub use rewriter::{
    ATTACHMENT_ICON, BrokenReference, LinkRewriter, RewriteOutcome, broken_placeholder,
};
