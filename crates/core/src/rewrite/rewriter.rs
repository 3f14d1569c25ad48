//! Embed and wikilink rewriting.

use std::path::{Path, PathBuf};

use regex::Captures;

use super::code::code_regions;
use super::embed::{LinkReference, MARKER_RE, MarkerKind};
use crate::normalize::{heading_slug, link_destination, percent_decode, relative_link};
use crate::vault::{FileIndex, FileKind, IndexEntry};

/// Prefix marking a download link to a non-image attachment.
pub const ATTACHMENT_ICON: &str = "📎";

/// Placeholder text left where an embedded file could not be found.
pub fn broken_placeholder(target: &str) -> String {
    format!("**⚠ missing: {target}**")
}

/// A reference that did not resolve against the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenReference {
    /// Referencing document, relative to the source root.
    pub document: PathBuf,
    /// Target as written in the marker.
    pub target: String,
    /// 1-based line number in the document.
    pub line: usize,
}

/// Result of rewriting one document.
#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
    pub content: String,
    /// Markers replaced by a link or image.
    pub resolved: usize,
    /// Embeds (`![[...]]`) that were replaced by a placeholder.
    pub broken: Vec<BrokenReference>,
    /// Plain wikilinks that degraded to their display text.
    pub dangling: Vec<BrokenReference>,
}

/// Rewrites Obsidian markers into MyST-compatible markdown.
pub struct LinkRewriter<'a> {
    index: &'a FileIndex,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(index: &'a FileIndex) -> Self {
        Self { index }
    }

    /// Rewrite every marker in `content` outside code blocks and code spans.
    ///
    /// `document` is the index entry of the file being rewritten; links are
    /// computed relative to its staged location.
    pub fn rewrite(&self, content: &str, document: &IndexEntry) -> RewriteOutcome {
        let code = code_regions(content);
        let mut outcome = RewriteOutcome {
            content: String::with_capacity(content.len()),
            ..Default::default()
        };

        for (i, line) in content.split_inclusive('\n').enumerate() {
            let line_number = i + 1;
            if code.covers_line(line_number) {
                outcome.content.push_str(line);
                continue;
            }

            let replaced = MARKER_RE.replace_all(line, |caps: &Captures| {
                let column = caps.get(0).map_or(0, |m| m.start()) + 1;
                if code.covers(line_number, column) {
                    return caps[0].to_string();
                }
                let kind = if &caps[1] == "!" { MarkerKind::Embed } else { MarkerKind::Wikilink };
                let reference = LinkReference::parse(kind, &caps[2]);
                self.render(&reference, document, line_number, &mut outcome)
            });
            outcome.content.push_str(&replaced);
        }

        outcome
    }

    fn render(
        &self,
        reference: &LinkReference,
        document: &IndexEntry,
        line: usize,
        outcome: &mut RewriteOutcome,
    ) -> String {
        if reference.target.is_empty()
            && let Some(ref section) = reference.section
        {
            // Heading in the same note
            outcome.resolved += 1;
            let text = reference.alias.clone().unwrap_or_else(|| section.clone());
            return format!("[{text}](#{})", heading_slug(section));
        }

        let Some(entry) = self.index.resolve(&reference.target) else {
            return self.render_missing(reference, document, line, outcome);
        };

        outcome.resolved += 1;
        let mut url = relative_link(&document.staged_path, &entry.staged_path);
        if entry.kind == FileKind::Markdown
            && let Some(ref section) = reference.section
        {
            url.push('#');
            url.push_str(&heading_slug(section));
        }
        let dest = link_destination(&url);

        match (reference.kind, entry.kind) {
            (MarkerKind::Embed, FileKind::Image) => {
                let alt = reference.alias.clone().unwrap_or_else(|| display_name(entry));
                format!("![{alt}]({dest})")
            }
            (MarkerKind::Embed, FileKind::Attachment) => {
                let text = reference.alias.clone().unwrap_or_else(|| display_name(entry));
                format!("[{ATTACHMENT_ICON} {text}]({dest})")
            }
            (MarkerKind::Embed, FileKind::Markdown) | (MarkerKind::Wikilink, _) => {
                let text = reference.alias.clone().unwrap_or_else(|| {
                    let written = percent_decode(&reference.target);
                    match entry.kind {
                        FileKind::Markdown => note_title(&written),
                        _ => written,
                    }
                });
                format!("[{text}]({dest})")
            }
        }
    }

    fn render_missing(
        &self,
        reference: &LinkReference,
        document: &IndexEntry,
        line: usize,
        outcome: &mut RewriteOutcome,
    ) -> String {
        let broken = BrokenReference {
            document: document.source_path.clone(),
            target: reference.target.clone(),
            line,
        };

        match reference.kind {
            MarkerKind::Embed => {
                tracing::error!(
                    "Missing file '{}' referenced from {} (line {})",
                    reference.target,
                    document.source_path.display(),
                    line
                );
                outcome.broken.push(broken);
                broken_placeholder(&reference.target)
            }
            MarkerKind::Wikilink => {
                tracing::warn!(
                    "Unresolved link '{}' in {} (line {})",
                    reference.target,
                    document.source_path.display(),
                    line
                );
                outcome.dangling.push(broken);
                reference
                    .alias
                    .clone()
                    .unwrap_or_else(|| note_title(&percent_decode(&reference.target)))
            }
        }
    }
}

/// File name as it appeared in the source vault.
fn display_name(entry: &IndexEntry) -> String {
    entry
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Last path segment without a trailing `.md`.
fn note_title(written: &str) -> String {
    let name = written.rsplit('/').next().unwrap_or(written);
    let path = Path::new(name);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("md") => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string()),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::WalkedFile;

    fn index(paths: &[&str]) -> FileIndex {
        let files: Vec<_> = paths
            .iter()
            .map(|p| WalkedFile {
                absolute_path: PathBuf::from("/vault").join(p),
                relative_path: PathBuf::from(p),
            })
            .collect();
        FileIndex::build(&files)
    }

    fn doc<'a>(index: &'a FileIndex, path: &str) -> &'a IndexEntry {
        index.entries().iter().find(|e| e.source_path == Path::new(path)).unwrap()
    }

    #[test]
    fn test_attachment_becomes_download_link() {
        let idx = index(&["proj/1_ELN/day.md", "proj/1_ELN/Lab Notebook.stl"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite("Model: ![[Lab%20Notebook.stl]]\n", doc(&idx, "proj/1_ELN/day.md"));

        assert_eq!(out.content, "Model: [📎 Lab Notebook.stl](Lab_Notebook.stl)\n");
        assert_eq!(out.resolved, 1);
        assert!(out.broken.is_empty());
        assert!(!out.content.contains("!["));
    }

    #[test]
    fn test_image_becomes_image_tag() {
        let idx = index(&["proj/1_ELN/day.md", "proj/attachments/Gel Image.PNG"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite("![[Gel Image.PNG|400]]", doc(&idx, "proj/1_ELN/day.md"));

        assert_eq!(out.content, "![Gel Image.PNG](../attachments/Gel_Image.PNG)");
    }

    #[test]
    fn test_image_alias_is_alt_text() {
        let idx = index(&["note.md", "plot.png"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite("![[plot.png|Growth curve]]", doc(&idx, "note.md"));

        assert_eq!(out.content, "![Growth curve](plot.png)");
    }

    #[test]
    fn test_missing_embed_leaves_placeholder() {
        let idx = index(&["note.md"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite("line one\nsee ![[ghost.png]] here\n", doc(&idx, "note.md"));

        assert_eq!(out.content, "line one\nsee **⚠ missing: ghost.png** here\n");
        assert_eq!(
            out.broken,
            vec![BrokenReference {
                document: PathBuf::from("note.md"),
                target: "ghost.png".to_string(),
                line: 2,
            }]
        );
        assert_eq!(out.resolved, 0);
    }

    #[test]
    fn test_wikilinks() {
        let idx = index(&["a/note.md", "b/Other Note.md"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite(
            "[[Other Note]] and [[Other Note|see this]] and [[Nowhere]]",
            doc(&idx, "a/note.md"),
        );

        assert_eq!(
            out.content,
            "[Other Note](../b/Other_Note.md) and [see this](../b/Other_Note.md) and Nowhere"
        );
        assert_eq!(out.resolved, 2);
        assert!(out.broken.is_empty());
        assert_eq!(out.dangling.len(), 1);
    }

    #[test]
    fn test_destination_with_space_in_directory() {
        let idx = index(&["index.md", "My Project/attachments/fig.png"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite("![[fig.png]]", doc(&idx, "index.md"));

        assert_eq!(out.content, "![fig.png](<My Project/attachments/fig.png>)");
    }

    #[test]
    fn test_same_note_heading_links() {
        let idx = index(&["note.md"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite(
            "See [[#Methods]] below. ![[#Results]] and [[#Step 2|the second step]]\n",
            doc(&idx, "note.md"),
        );

        assert_eq!(
            out.content,
            "See [Methods](#methods) below. [Results](#results) and [the second step](#step-2)\n"
        );
        assert_eq!(out.resolved, 3);
        assert!(out.broken.is_empty());
        assert!(out.dangling.is_empty());
    }

    #[test]
    fn test_heading_in_other_note_becomes_anchor() {
        let idx = index(&["a/note.md", "protocols/PCR Protocol.md", "a/gel.png"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite(
            "[[PCR Protocol#Step 2]] and ![[gel.png#ignored]]",
            doc(&idx, "a/note.md"),
        );

        assert_eq!(
            out.content,
            "[PCR Protocol](../protocols/PCR_Protocol.md#step-2) and ![gel.png](gel.png)"
        );
    }

    #[test]
    fn test_inline_code_untouched() {
        let idx = index(&["note.md", "a.png"]);
        let rewriter = LinkRewriter::new(&idx);

        let out = rewriter.rewrite("Use `![[a.png]]` to embed: ![[a.png]]\n", doc(&idx, "note.md"));

        assert_eq!(out.content, "Use `![[a.png]]` to embed: ![a.png](a.png)\n");
        assert_eq!(out.resolved, 1);
    }

    #[test]
    fn test_code_blocks_untouched() {
        let idx = index(&["note.md", "a.png"]);
        let rewriter = LinkRewriter::new(&idx);
        let input = "![[a.png]]\n\n```\n![[a.png]]\n```\n";

        let out = rewriter.rewrite(input, doc(&idx, "note.md"));

        assert_eq!(out.content, "![a.png](a.png)\n\n```\n![[a.png]]\n```\n");
        assert_eq!(out.resolved, 1);
    }
}
