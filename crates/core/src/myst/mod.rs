//! `myst.yml` generation.
//!
//! The book configuration is derived from the staged tree: a table of
//! contents from the folder layout, a homepage, and the site options from
//! the `[book]` section of the config file.

mod homepage;
mod toc;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{BookConfig, SiteOptions};

pub use homepage::{Homepage, ROOT_INTRO_FILES, find_or_create_homepage};
pub use toc::{TocEntry, prettify_folder_name, scan_book_structure, scan_folder};

/// File name MyST looks for at the book root.
pub const MYST_CONFIG_FILE: &str = "myst.yml";

#[derive(Debug, Error)]
pub enum MystError {
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize myst.yml: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Top level of `myst.yml`.
#[derive(Debug, Clone, Serialize)]
pub struct MystConfig {
    pub version: u32,
    pub project: ProjectSection,
    pub site: SiteSection,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub open_access: bool,
    pub license: String,
    pub toc: Vec<TocEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSection {
    pub template: String,
    pub options: SiteOptions,
}

/// Stable project id for a book name.
pub fn project_id(book_name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("mystage:{book_name}").as_bytes())
}

/// A written `myst.yml`.
#[derive(Debug, Clone)]
pub struct GeneratedConfig {
    pub path: PathBuf,
    pub config: MystConfig,
    pub homepage: Homepage,
}

/// Build the configuration for the book rooted at `root`.
///
/// May write a placeholder homepage into `root`.
pub fn build_myst_config(
    root: &Path,
    book_name: &str,
    book: &BookConfig,
) -> Result<(MystConfig, Homepage), MystError> {
    let toc = scan_book_structure(root, book)?;
    let homepage = find_or_create_homepage(root, book_name)?;
    let pretty = prettify_folder_name(book_name);

    let mut entries = Vec::with_capacity(toc.len() + 1);
    entries.push(TocEntry::File { file: homepage.file.clone(), title: Some("Home".to_string()) });
    entries.extend(toc);

    let config = MystConfig {
        version: 1,
        project: ProjectSection {
            id: project_id(book_name).to_string(),
            title: pretty.clone(),
            description: format!("Research data from {pretty}"),
            open_access: true,
            license: book.license.clone(),
            toc: entries,
        },
        site: SiteSection { template: book.template.clone(), options: book.site.clone() },
    };
    Ok((config, homepage))
}

/// Generate `myst.yml` at the root of the staged tree.
pub fn generate_myst_config(
    root: &Path,
    book_name: &str,
    book: &BookConfig,
) -> Result<GeneratedConfig, MystError> {
    let (config, homepage) = build_myst_config(root, book_name, book)?;
    let yaml = serde_yaml::to_string(&config)?;

    let path = root.join(MYST_CONFIG_FILE);
    fs::write(&path, yaml).map_err(|e| MystError::Write { path: path.clone(), source: e })?;

    tracing::info!("Generated {}", path.display());
    Ok(GeneratedConfig { path, config, homepage })
}
