//! Staging: copy the vault into a build directory, rewriting markdown on the way.
//!
//! The source tree is only ever read. Every file lands at its sanitized path
//! (spaces replaced in the file name) below the staging root, and markdown
//! documents pass through the [`LinkRewriter`] first.

mod paths;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::rewrite::{BrokenReference, LinkRewriter};
use crate::vault::{FileIndex, FileKind, IndexEntry, KeyCollision};

pub use paths::absolute_path;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("staging directory {} overlaps source {}", .staging.display(), .source_root.display())]
    UnsafeStagingDir { staging: PathBuf, source_root: PathBuf },

    #[error("failed to resolve path {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to clean staging directory {}: {source}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create staging directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file that could not be staged. The run continues without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Path relative to the source root.
    pub path: PathBuf,
    pub reason: String,
}

/// Statistics from a staging run.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    /// Number of files written (or that would be written, in a dry run).
    pub files_staged: usize,
    /// Number of markdown documents passed through the rewriter.
    pub documents_rewritten: usize,
    /// Number of embeds and wikilinks resolved.
    pub references_resolved: usize,
    /// Embeds replaced by a missing-file placeholder.
    pub broken: Vec<BrokenReference>,
    /// Wikilinks that degraded to plain text.
    pub dangling: Vec<BrokenReference>,
    /// Files skipped because of I/O errors or staged-name clashes.
    pub failures: Vec<StageFailure>,
    /// Name keys shared by more than one source file.
    pub collisions: Vec<KeyCollision>,
    /// Staging duration in milliseconds.
    pub duration_ms: u64,
}

impl StageReport {
    /// Whether anything went wrong that a strict run should fail on.
    pub fn has_problems(&self) -> bool {
        !self.broken.is_empty() || !self.failures.is_empty()
    }
}

/// Progress callback for staging.
/// Parameters: (current, total, current_path)
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str)>;

/// Copies an indexed vault into a staging directory.
#[derive(Debug)]
pub struct Stager {
    source_root: PathBuf,
    staging_root: PathBuf,
}

impl Stager {
    /// Create a stager, refusing staging roots that overlap the source.
    pub fn new(source_root: &Path, staging_root: &Path) -> Result<Self, StageError> {
        let source_root = absolute_path(source_root)
            .map_err(|e| StageError::Resolve { path: source_root.to_path_buf(), source: e })?;
        let staging_root = absolute_path(staging_root)
            .map_err(|e| StageError::Resolve { path: staging_root.to_path_buf(), source: e })?;

        if staging_root.starts_with(&source_root) || source_root.starts_with(&staging_root) {
            return Err(StageError::UnsafeStagingDir { staging: staging_root, source_root });
        }

        Ok(Self { source_root, staging_root })
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Remove the staging directory if it exists.
    pub fn clean(&self) -> Result<(), StageError> {
        if self.staging_root.exists() {
            tracing::info!("Removing previous staging directory {}", self.staging_root.display());
            fs::remove_dir_all(&self.staging_root)
                .map_err(|e| StageError::Clean { path: self.staging_root.clone(), source: e })?;
        }
        Ok(())
    }

    /// Stage every indexed file.
    pub fn stage(
        &self,
        index: &FileIndex,
        progress: Option<ProgressCallback>,
    ) -> Result<StageReport, StageError> {
        fs::create_dir_all(&self.staging_root).map_err(|e| StageError::CreateDir {
            path: self.staging_root.clone(),
            source: e,
        })?;
        Ok(self.run(index, progress, true))
    }

    /// Read and rewrite every file under `source_root` without writing anything.
    pub fn dry_run(source_root: &Path, index: &FileIndex) -> Result<StageReport, StageError> {
        let source_root = absolute_path(source_root)
            .map_err(|e| StageError::Resolve { path: source_root.to_path_buf(), source: e })?;
        let stager = Self { source_root, staging_root: PathBuf::new() };
        Ok(stager.run(index, None, false))
    }

    fn run(
        &self,
        index: &FileIndex,
        progress: Option<ProgressCallback>,
        write: bool,
    ) -> StageReport {
        let start = Instant::now();
        let rewriter = LinkRewriter::new(index);
        let mut report =
            StageReport { collisions: index.collisions().to_vec(), ..Default::default() };
        let mut claimed: HashSet<&Path> = HashSet::new();

        let entries = index.entries();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(ref cb) = progress {
                cb(i + 1, entries.len(), &entry.source_path.to_string_lossy());
            }

            if !claimed.insert(entry.staged_path.as_path()) {
                tracing::warn!(
                    "Skipping {}: staged name {} is already taken",
                    entry.source_path.display(),
                    entry.staged_path.display()
                );
                report.failures.push(StageFailure {
                    path: entry.source_path.clone(),
                    reason: format!("staged name {} is already taken", entry.staged_path.display()),
                });
                continue;
            }

            match self.stage_file(entry, &rewriter, &mut report, write) {
                Ok(()) => report.files_staged += 1,
                Err(e) => {
                    // Log error but continue staging
                    tracing::error!("Failed to stage {}: {}", entry.source_path.display(), e);
                    report.failures.push(StageFailure {
                        path: entry.source_path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        report
    }

    fn stage_file(
        &self,
        entry: &IndexEntry,
        rewriter: &LinkRewriter<'_>,
        report: &mut StageReport,
        write: bool,
    ) -> std::io::Result<()> {
        let source = self.source_root.join(&entry.source_path);
        let target = self.staging_root.join(&entry.staged_path);

        if entry.kind == FileKind::Markdown {
            let content = fs::read_to_string(&source)?;
            let outcome = rewriter.rewrite(&content, entry);

            if write {
                ensure_parent(&target)?;
                fs::write(&target, &outcome.content)?;
            }

            tracing::debug!(
                "Rewrote {} ({} resolved, {} broken)",
                entry.source_path.display(),
                outcome.resolved,
                outcome.broken.len()
            );
            report.documents_rewritten += 1;
            report.references_resolved += outcome.resolved;
            report.broken.extend(outcome.broken);
            report.dangling.extend(outcome.dangling);
        } else if write {
            ensure_parent(&target)?;
            fs::copy(&source, &target)?;
            tracing::trace!("Copied {} {}", entry.kind.as_str(), entry.staged_path.display());
        } else {
            fs::metadata(&source)?;
        }

        Ok(())
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
