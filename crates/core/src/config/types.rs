use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub staging: StagingConfig,
    #[serde(default)]
    pub book: BookConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where and how the vault is copied before building.
#[derive(Debug, Deserialize, Clone)]
pub struct StagingConfig {
    /// Staging directory (default: `../_build_staging`, next to the working
    /// directory so a build started inside the vault lands outside it).
    #[serde(default = "default_staging_dir")]
    pub dir: String,
    /// Remove the staging directory before copying (default: true).
    #[serde(default = "default_clean")]
    pub clean: bool,
    /// Folders to skip while walking the source (relative to the source root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: default_staging_dir(),
            clean: default_clean(),
            excluded_folders: Vec::new(),
        }
    }
}

fn default_staging_dir() -> String {
    "../_build_staging".to_string()
}

fn default_clean() -> bool {
    true
}

/// Settings that shape the generated `myst.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct BookConfig {
    /// Maximum folder depth scanned below each chapter (default: 4)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Chapter numbers left out of the table of contents (default: ["5"])
    #[serde(default = "default_skip_chapters")]
    pub skip_chapters: Vec<String>,
    /// Display titles keyed by chapter number.
    #[serde(default = "default_chapter_titles")]
    pub chapter_titles: BTreeMap<String, String>,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub site: SiteOptions,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            skip_chapters: default_skip_chapters(),
            chapter_titles: default_chapter_titles(),
            license: default_license(),
            template: default_template(),
            site: SiteOptions::default(),
        }
    }
}

fn default_max_depth() -> usize {
    4
}

fn default_skip_chapters() -> Vec<String> {
    vec!["5".to_string()]
}

fn default_chapter_titles() -> BTreeMap<String, String> {
    [("1", "ELN"), ("2", "Curated Datasets"), ("3", "Code"), ("4", "Auxiliary Files")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_license() -> String {
    "CC-BY-4.0".to_string()
}

fn default_template() -> String {
    "book-theme".to_string()
}

/// Static assets referenced from the site section of `myst.yml`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteOptions {
    #[serde(default = "default_favicon")]
    pub favicon: String,
    #[serde(default = "default_logo")]
    pub logo: String,
    #[serde(default = "default_logo_dark")]
    pub logo_dark: String,
    #[serde(default = "default_style")]
    pub style: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            favicon: default_favicon(),
            logo: default_logo(),
            logo_dark: default_logo_dark(),
            style: default_style(),
        }
    }
}

fn default_favicon() -> String {
    "_static/favicon.png".to_string()
}

fn default_logo() -> String {
    "_static/logo-light.png".to_string()
}

fn default_logo_dark() -> String {
    "_static/logo-dark.png".to_string()
}

fn default_style() -> String {
    "_static/style.css".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Config file the values came from, if one was read.
    pub source_file: Option<PathBuf>,
    pub staging_dir: PathBuf,
    pub clean: bool,
    pub excluded_folders: Vec<PathBuf>,
    pub book: BookConfig,
    pub logging: LoggingConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let staging = StagingConfig::default();
        Self {
            source_file: None,
            staging_dir: PathBuf::from(staging.dir),
            clean: staging.clean,
            excluded_folders: Vec::new(),
            book: BookConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
