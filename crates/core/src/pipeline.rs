//! End-to-end build: walk, index, stage, generate `myst.yml`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::myst::{MystError, generate_myst_config};
use crate::stage::{ProgressCallback, StageError, StageReport, Stager};
use crate::vault::{FileIndex, VaultWalker, VaultWalkerError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Vault walker error: {0}")]
    Walker(#[from] VaultWalkerError),

    #[error("Staging error: {0}")]
    Stage(#[from] StageError),

    #[error("Book config error: {0}")]
    Myst(#[from] MystError),
}

/// Per-run overrides on top of the resolved config.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub staging_dir: PathBuf,
    /// Book title source; defaults to the source folder name.
    pub book_name: Option<String>,
    pub clean: bool,
}

impl BuildOptions {
    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        Self { staging_dir: cfg.staging_dir.clone(), book_name: None, clean: cfg.clean }
    }
}

/// Outcome of a full build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub book_name: String,
    pub staging_root: PathBuf,
    pub myst_config: PathBuf,
    pub homepage_generated: bool,
    pub stage: StageReport,
}

/// Book name for a source folder: its final component without a
/// `_local` or `_gcs` suffix.
pub fn bucket_name_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            path.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "book".to_string());

    name.replace("_local", "").replace("_gcs", "")
}

fn build_index(source: &Path, cfg: &ResolvedConfig) -> Result<FileIndex, PipelineError> {
    let walker = VaultWalker::with_exclusions(source, cfg.excluded_folders.clone())?;
    let files = walker.walk()?;
    tracing::info!("Found {} files in {}", files.len(), walker.root().display());

    let index = FileIndex::build(&files);
    if !index.collisions().is_empty() {
        tracing::warn!("{} duplicate file name key(s); first occurrence wins", index.collisions().len());
    }
    Ok(index)
}

/// Run the whole pipeline.
pub fn build(
    source: &Path,
    cfg: &ResolvedConfig,
    options: &BuildOptions,
    progress: Option<ProgressCallback>,
) -> Result<BuildReport, PipelineError> {
    let index = build_index(source, cfg)?;

    let stager = Stager::new(source, &options.staging_dir)?;
    if options.clean {
        stager.clean()?;
    }

    tracing::info!("Creating staging directory: {}", stager.staging_root().display());
    let stage = stager.stage(&index, progress)?;

    let book_name =
        options.book_name.clone().unwrap_or_else(|| bucket_name_from_path(stager.source_root()));

    let generated = generate_myst_config(stager.staging_root(), &book_name, &cfg.book)?;
    tracing::debug!(
        "Book config has {} top-level toc entries",
        generated.config.project.toc.len()
    );

    Ok(BuildReport {
        book_name,
        staging_root: stager.staging_root().to_path_buf(),
        myst_config: generated.path,
        homepage_generated: generated.homepage.generated,
        stage,
    })
}

/// Resolve and rewrite everything in memory without writing files.
pub fn check(source: &Path, cfg: &ResolvedConfig) -> Result<StageReport, PipelineError> {
    let index = build_index(source, cfg)?;
    Ok(Stager::dry_run(source, &index)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_name_strips_suffixes() {
        assert_eq!(
            bucket_name_from_path(Path::new("../research_biology_md_local")),
            "research_biology_md"
        );
        assert_eq!(bucket_name_from_path(Path::new("/mnt/lab_gcs")), "lab");
        assert_eq!(bucket_name_from_path(&PathBuf::from("plain")), "plain");
    }
}
