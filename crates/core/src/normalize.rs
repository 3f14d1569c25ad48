//! Filename normalization and staged-path sanitization.
//!
//! Obsidian writes references the way the user typed them: with spaces,
//! percent-escapes, or a different letter case than the file on disk.
//! Everything that compares names goes through [`normalize_key`]; everything
//! that decides where a file lands in the staging tree goes through
//! [`staged_relative_path`].

use std::path::{Component, Path, PathBuf};

/// Separator that replaces whitespace in keys and staged file names.
pub const SEPARATOR: char = '_';

/// Produce the canonical comparison key for a raw file name or reference.
///
/// Percent-escapes are decoded, each run of whitespace becomes a single
/// [`SEPARATOR`], and the result is lower-cased. The function is idempotent.
pub fn normalize_key(raw: &str) -> String {
    let decoded = percent_decode(raw);
    collapse_whitespace(&decoded).to_lowercase()
}

/// Decode percent-escapes until none are left.
///
/// Decoding repeats so that double-encoded input (`%2520`) reaches the same
/// result as single-encoded input. Escapes that are not two hex digits are
/// kept literally and invalid UTF-8 is replaced lossily.
pub fn percent_decode(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let decoded = urlencoding::decode_binary(current.as_bytes());
        let next = String::from_utf8_lossy(&decoded).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(SEPARATOR);
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Name a file gets in the staging tree: whitespace replaced, case kept.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars().map(|c| if c.is_whitespace() { SEPARATOR } else { c }).collect()
}

/// Staged location of a source-relative path.
///
/// Only the final component is sanitized; directories mirror the source.
pub fn staged_relative_path(rel: &Path) -> PathBuf {
    match rel.file_name() {
        Some(name) => {
            let sanitized = sanitize_file_name(&name.to_string_lossy());
            rel.with_file_name(sanitized)
        }
        None => rel.to_path_buf(),
    }
}

/// Forward-slash form of a relative path, independent of the host separator.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative URL from the document at `from_doc` to the file at `to_file`.
///
/// Both paths are relative to the same root.
pub fn relative_link(from_doc: &Path, to_file: &Path) -> String {
    let from_dir: Vec<_> = from_doc
        .parent()
        .map(|p| p.components().filter(|c| matches!(c, Component::Normal(_))).collect())
        .unwrap_or_default();
    let target: Vec<_> =
        to_file.components().filter(|c| matches!(c, Component::Normal(_))).collect();

    let common = from_dir.iter().zip(target.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..".to_string());
    }
    for comp in &target[common..] {
        parts.push(comp.as_os_str().to_string_lossy().into_owned());
    }
    parts.join("/")
}

/// Wrap a link destination in angle brackets when CommonMark needs them.
pub fn link_destination(url: &str) -> String {
    if url.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
        format!("<{url}>")
    } else {
        url.to_string()
    }
}

/// Anchor id a heading gets in the rendered book.
///
/// Lower-cased; whitespace runs become `-`; punctuation other than `-` and
/// `_` is dropped.
pub fn heading_slug(heading: &str) -> String {
    let mut slug = String::with_capacity(heading.len());
    let mut pending_dash = false;
    for c in heading.trim().chars() {
        if c.is_whitespace() {
            pending_dash = true;
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        }
    }
    slug
}
