//! Homepage discovery for the book.

use std::fs;
use std::path::Path;

use super::MystError;
use super::toc::{prettify_folder_name, project_folders};
use crate::normalize::to_url_path;

/// Files accepted as the book homepage at the root, in order of preference.
pub const ROOT_INTRO_FILES: &[&str] = &["README.md", "index.md", "intro.md"];

/// The page used as the book homepage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homepage {
    /// Path relative to the book root, forward slashes.
    pub file: String,
    /// True when a placeholder page had to be written.
    pub generated: bool,
}

/// Find an existing homepage or write a placeholder `index.md`.
///
/// Search order: root intro files, then the first project `README.md`.
/// `root` must be the staged tree; the placeholder is written there.
pub fn find_or_create_homepage(root: &Path, book_name: &str) -> Result<Homepage, MystError> {
    for intro in ROOT_INTRO_FILES {
        if root.join(intro).is_file() {
            return Ok(Homepage { file: (*intro).to_string(), generated: false });
        }
    }

    for project in project_folders(root)? {
        let readme = project.join("README.md");
        if readme.is_file() {
            let rel = readme.strip_prefix(root).unwrap_or(&readme);
            return Ok(Homepage { file: to_url_path(rel), generated: false });
        }
    }

    let pretty = prettify_folder_name(book_name);
    let content = format!("# {pretty}\n\nResearch data and documentation from {pretty}.\n");
    let path = root.join("index.md");
    fs::write(&path, content).map_err(|e| MystError::Write { path: path.clone(), source: e })?;

    tracing::info!("Generated placeholder homepage: {}", path.display());
    Ok(Homepage { file: "index.md".to_string(), generated: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_root_intro_preferred() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("intro.md"), "# Intro").unwrap();
        fs::write(dir.path().join("index.md"), "# Index").unwrap();

        let home = find_or_create_homepage(dir.path(), "bucket").unwrap();
        assert_eq!(home, Homepage { file: "index.md".to_string(), generated: false });
    }

    #[test]
    fn test_project_readme_fallback() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("_static")).unwrap();
        fs::write(dir.path().join("_static/README.md"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join("beta")).unwrap();
        fs::write(dir.path().join("beta/README.md"), "# Beta").unwrap();

        let home = find_or_create_homepage(dir.path(), "bucket").unwrap();
        assert_eq!(home.file, "beta/README.md");
        assert!(!home.generated);
    }

    #[test]
    fn test_placeholder_written() {
        let dir = TempDir::new().unwrap();

        let home = find_or_create_homepage(dir.path(), "research_biology_md").unwrap();

        assert!(home.generated);
        let content = fs::read_to_string(dir.path().join("index.md")).unwrap();
        assert_eq!(
            content,
            "# Research Biology Md\n\nResearch data and documentation from Research Biology Md.\n"
        );
    }
}
