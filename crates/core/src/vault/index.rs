//! Normalized lookup from file names to vault files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::normalize::{normalize_key, staged_relative_path, to_url_path};
use crate::vault::walker::WalkedFile;

/// Extensions rendered inline as images.
pub const IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "tif", "tiff", "avif"];

/// How a file is presented when something embeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Markdown,
    Image,
    Attachment,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ext == "md" {
            Self::Markdown
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else {
            Self::Attachment
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Image => "image",
            Self::Attachment => "attachment",
        }
    }
}

/// One indexed vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Normalized file name.
    pub key: String,
    /// Path relative to the source root, as found on disk.
    pub source_path: PathBuf,
    /// Path relative to the staging root.
    pub staged_path: PathBuf,
    pub kind: FileKind,
}

/// Two files that normalize to the same key; the first one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    pub kept: PathBuf,
    pub ignored: PathBuf,
}

/// Lookup table built once per run.
#[derive(Debug, Default)]
pub struct FileIndex {
    by_name: HashMap<String, IndexEntry>,
    by_path: HashMap<String, IndexEntry>,
    entries: Vec<IndexEntry>,
    collisions: Vec<KeyCollision>,
}

impl FileIndex {
    /// Build the index from walked files.
    ///
    /// Files should arrive in a stable order (the walker sorts them) so that
    /// "first occurrence wins" means the same file on every run.
    pub fn build(files: &[WalkedFile]) -> Self {
        let mut index = Self::default();
        for file in files {
            index.insert(&file.relative_path);
        }
        index
    }

    fn insert(&mut self, relative_path: &Path) {
        let name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let entry = IndexEntry {
            key: normalize_key(&name),
            source_path: relative_path.to_path_buf(),
            staged_path: staged_relative_path(relative_path),
            kind: FileKind::from_path(relative_path),
        };

        self.entries.push(entry.clone());

        let path_key = normalize_key(&to_url_path(relative_path));
        self.by_path.entry(path_key).or_insert_with(|| entry.clone());

        match self.by_name.get(&entry.key) {
            Some(existing) => {
                tracing::warn!(
                    "Duplicate file name key '{}': keeping {}, ignoring {}",
                    entry.key,
                    existing.source_path.display(),
                    entry.source_path.display()
                );
                self.collisions.push(KeyCollision {
                    key: entry.key.clone(),
                    kept: existing.source_path.clone(),
                    ignored: entry.source_path,
                });
            }
            None => {
                self.by_name.insert(entry.key.clone(), entry);
            }
        }
    }

    /// Resolve a reference as written inside an embed or wikilink.
    ///
    /// Tries the reference as a vault-relative path, then as a bare file
    /// name, then as a note name with `.md` appended.
    pub fn resolve(&self, reference: &str) -> Option<&IndexEntry> {
        let key = normalize_key(reference.trim().trim_start_matches("./"));
        if key.is_empty() {
            return None;
        }

        if let Some(entry) = self.by_path.get(&key) {
            return Some(entry);
        }

        let name_key = key.rsplit('/').next().unwrap_or(&key);
        if let Some(entry) = self.by_name.get(name_key) {
            return Some(entry);
        }

        // Note references usually omit the extension, and note names may
        // contain dots of their own (`2024.03.01 Imaging`).
        if let Some(entry) = self.by_path.get(&format!("{key}.md")) {
            return Some(entry);
        }
        self.by_name.get(&format!("{name_key}.md"))
    }

    /// Every indexed file, in walk order (including collision losers).
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of distinct name keys.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }
}
