//! Obsidian link marker parsing.

use std::sync::LazyLock;

use regex::Regex;

// Matches ![[target]] embeds and [[target]] wikilinks, with optional
// #section and |alias suffixes inside the brackets.
pub(crate) static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\[\]\n]+)\]\]").expect("marker regex is valid")
});

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(x\d+)?$").expect("size regex is valid"));

/// Whether the marker embeds the file or only links to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `![[...]]`
    Embed,
    /// `[[...]]`
    Wikilink,
}

/// The inside of a marker, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub kind: MarkerKind,
    /// File reference as written (may contain spaces or percent-escapes).
    pub target: String,
    /// Heading or block after `#`, if any.
    pub section: Option<String>,
    /// Display text after `|`, unless it was a size hint like `300` or `300x200`.
    pub alias: Option<String>,
}

impl LinkReference {
    /// Split marker contents (`target#section|alias`).
    pub fn parse(kind: MarkerKind, inner: &str) -> Self {
        let (target_part, alias) = match inner.split_once('|') {
            Some((t, a)) => (t, Some(a.trim())),
            None => (inner, None),
        };
        let (target, section) = match target_part.split_once('#') {
            Some((t, s)) => (t, Some(s.trim().to_string()).filter(|s| !s.is_empty())),
            None => (target_part, None),
        };

        let alias = alias
            .filter(|a| !a.is_empty() && !SIZE_RE.is_match(a))
            .map(ToOwned::to_owned);

        Self { kind, target: target.trim().to_string(), section, alias }
    }
}
