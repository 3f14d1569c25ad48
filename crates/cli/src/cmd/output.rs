//! Shared output formatting for build and check.

use mystage_core::rewrite::BrokenReference;
use mystage_core::stage::StageReport;
use serde::Serialize;

/// Formatted broken reference for JSON output.
#[derive(Debug, Serialize)]
pub struct BrokenOutput {
    pub document: String,
    pub line: usize,
    pub target: String,
}

impl From<&BrokenReference> for BrokenOutput {
    fn from(b: &BrokenReference) -> Self {
        Self {
            document: b.document.to_string_lossy().to_string(),
            line: b.line,
            target: b.target.clone(),
        }
    }
}

/// Formatted staging report for JSON output.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub files_staged: usize,
    pub documents_rewritten: usize,
    pub references_resolved: usize,
    pub broken: Vec<BrokenOutput>,
    pub dangling: Vec<BrokenOutput>,
    pub failures: Vec<FailureOutput>,
    pub duplicates: Vec<DuplicateOutput>,
}

#[derive(Debug, Serialize)]
pub struct FailureOutput {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct DuplicateOutput {
    pub key: String,
    pub kept: String,
    pub ignored: String,
}

impl From<&StageReport> for ReportOutput {
    fn from(r: &StageReport) -> Self {
        Self {
            files_staged: r.files_staged,
            documents_rewritten: r.documents_rewritten,
            references_resolved: r.references_resolved,
            broken: r.broken.iter().map(BrokenOutput::from).collect(),
            dangling: r.dangling.iter().map(BrokenOutput::from).collect(),
            failures: r
                .failures
                .iter()
                .map(|f| FailureOutput {
                    path: f.path.to_string_lossy().to_string(),
                    reason: f.reason.clone(),
                })
                .collect(),
            duplicates: r
                .collisions
                .iter()
                .map(|c| DuplicateOutput {
                    key: c.key.clone(),
                    kept: c.kept.to_string_lossy().to_string(),
                    ignored: c.ignored.to_string_lossy().to_string(),
                })
                .collect(),
        }
    }
}

/// Print the counters of a staging report.
pub fn print_summary(report: &StageReport) {
    println!("  Files staged:        {}", report.files_staged);
    println!("  Documents rewritten: {}", report.documents_rewritten);
    println!("  References resolved: {}", report.references_resolved);
    println!("  Broken embeds:       {}", report.broken.len());
    if !report.dangling.is_empty() {
        println!("  Unresolved links:    {}", report.dangling.len());
    }
    if !report.collisions.is_empty() {
        println!("  Duplicate names:     {}", report.collisions.len());
    }
    if !report.failures.is_empty() {
        println!("  Failed files:        {}", report.failures.len());
    }
}

/// Print broken references as a table.
pub fn print_broken_table(broken: &[BrokenReference]) {
    if broken.is_empty() {
        return;
    }

    let rows: Vec<(String, String)> = broken
        .iter()
        .map(|b| (format!("{}:{}", b.document.display(), b.line), b.target.clone()))
        .collect();

    let doc_width = rows.iter().map(|(d, _)| d.len()).max().unwrap_or(8).clamp(8, 60);

    println!("{:<doc_width$}  MISSING", "DOCUMENT", doc_width = doc_width);
    println!("{:-<doc_width$}  {:-<7}", "", "", doc_width = doc_width);
    for (doc, target) in rows {
        println!("{:<doc_width$}  {}", doc, target, doc_width = doc_width);
    }
}

/// Print duplicate-name collisions.
pub fn print_collisions(report: &StageReport) {
    for c in &report.collisions {
        println!(
            "duplicate name '{}': kept {}, ignored {}",
            c.key,
            c.kept.display(),
            c.ignored.display()
        );
    }
}

/// Print files that could not be staged.
pub fn print_failures(report: &StageReport) {
    for f in &report.failures {
        println!("failed: {} ({})", f.path.display(), f.reason);
    }
}
