//! Code detection.
//!
//! Embed markers inside fenced or indented code blocks and inline code spans
//! are literal text and must survive rewriting untouched.

use std::ops::RangeInclusive;

use comrak::nodes::{LineColumn, NodeValue};
use comrak::{Arena, Options, parse_document};

/// Parts of a document that hold code, in 1-based source positions.
#[derive(Debug, Default)]
pub struct CodeRegions {
    /// Inclusive line ranges of code blocks.
    blocks: Vec<RangeInclusive<usize>>,
    /// Inclusive (line, column) ranges of inline code spans, backticks included.
    spans: Vec<(LineColumn, LineColumn)>,
}

impl CodeRegions {
    /// Whether the whole line belongs to a code block.
    pub fn covers_line(&self, line: usize) -> bool {
        self.blocks.iter().any(|r| r.contains(&line))
    }

    /// Whether the byte at `column` of `line` sits inside an inline code span.
    pub fn covers(&self, line: usize, column: usize) -> bool {
        self.spans.iter().any(|(start, end)| {
            (start.line, start.column) <= (line, column) && (line, column) <= (end.line, end.column)
        })
    }
}

/// Locate code blocks and inline code spans in `input`.
pub fn code_regions(input: &str) -> CodeRegions {
    let arena = Arena::new();
    let options = parse_options();
    let root = parse_document(&arena, input, &options);

    let mut regions = CodeRegions::default();
    for node in root.descendants() {
        let data = node.data.borrow();
        match data.value {
            NodeValue::CodeBlock(_) => {
                regions.blocks.push(data.sourcepos.start.line..=data.sourcepos.end.line);
            }
            NodeValue::Code(_) => {
                regions.spans.push((data.sourcepos.start, data.sourcepos.end));
            }
            _ => {}
        }
    }
    regions
}

fn parse_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.parse.smart = false;
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_lines() {
        let input = "intro\n\n```python\nx = \"![[a.png]]\"\n```\n\nafter\n";
        let regions = code_regions(input);
        assert!(regions.covers_line(4));
        assert!(!regions.covers_line(1));
        assert!(!regions.covers_line(7));
    }

    #[test]
    fn test_indented_block_lines() {
        let input = "para\n\n    ![[literal.png]]\n\ntext\n";
        let regions = code_regions(input);
        assert!(regions.covers_line(3));
        assert!(!regions.covers_line(5));
    }

    #[test]
    fn test_inline_code_span() {
        // `![[a.png]]` occupies columns 5 to 16 of line 1
        let regions = code_regions("Use `![[a.png]]` or ![[a.png]]\n");
        assert!(!regions.covers_line(1));
        assert!(regions.covers(1, 6));
        assert!(!regions.covers(1, 21));
    }

    #[test]
    fn test_no_code() {
        let regions = code_regions("# Title\n\n![[a.png]]\n");
        assert!(!regions.covers_line(3));
        assert!(!regions.covers(3, 1));
    }
}
