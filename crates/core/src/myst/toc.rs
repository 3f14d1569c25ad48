//! Table of contents discovery from the staged folder layout.
//!
//! Layout convention: top-level folders are projects, project sub-folders
//! whose name starts with a digit are chapters, and everything below a
//! chapter is scanned recursively for `.md` and `.ipynb` documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::MystError;
use crate::config::BookConfig;
use crate::normalize::to_url_path;
use crate::vault::walker::is_excluded_folder_name;

const TOC_EXTENSIONS: &[&str] = &["md", "ipynb"];

/// One entry of the `toc` list in `myst.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TocEntry {
    File {
        file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Section {
        title: String,
        children: Vec<TocEntry>,
    },
}

impl TocEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self::File { file: path.into(), title: None }
    }
}

/// Convert a folder name like `02_cell_culture` to `Cell Culture`.
pub fn prettify_folder_name(name: &str) -> String {
    let stripped = name.trim_start_matches(|c: char| c.is_ascii_digit() || c == '_');
    title_case(&stripped.replace('_', " "))
}

// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Top-level folders that are treated as projects.
pub fn project_folders(root: &Path) -> Result<Vec<PathBuf>, MystError> {
    sorted_dirs(root, |name| {
        !name.starts_with('_') && !name.starts_with('.') && !is_excluded_folder_name(name)
    })
}

/// Build the table of contents for the book rooted at `root`.
pub fn scan_book_structure(root: &Path, book: &BookConfig) -> Result<Vec<TocEntry>, MystError> {
    let mut toc = Vec::new();

    for project in project_folders(root)? {
        let mut chapters = Vec::new();

        let chapter_dirs =
            sorted_dirs(&project, |name| name.starts_with(|c: char| c.is_ascii_digit()))?;

        for chapter in chapter_dirs {
            let name = dir_name(&chapter);
            let number: String = name.chars().take(1).collect();

            if book.skip_chapters.contains(&number) {
                tracing::debug!("Skipping chapter {}", chapter.display());
                continue;
            }

            let title = book
                .chapter_titles
                .get(&number)
                .cloned()
                .unwrap_or_else(|| prettify_folder_name(&name));

            let children = scan_folder(&chapter, root, book.max_depth, 0)?;
            if !children.is_empty() {
                chapters.push(TocEntry::Section {
                    title: format!("Chapter {number}: {title}"),
                    children,
                });
            }
        }

        if !chapters.is_empty() {
            toc.push(TocEntry::Section {
                title: format!("Project: {}", prettify_folder_name(&dir_name(&project))),
                children: chapters,
            });
        }
    }

    Ok(toc)
}

/// Recursively list documents and non-empty sub-folders of `folder`.
pub fn scan_folder(
    folder: &Path,
    root: &Path,
    max_depth: usize,
    depth: usize,
) -> Result<Vec<TocEntry>, MystError> {
    if depth >= max_depth {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    let mut files: Vec<PathBuf> = read_dir(folder)?
        .into_iter()
        .filter(|p| p.is_file() && has_toc_extension(p))
        .collect();
    files.sort();

    for file in files {
        let rel = file.strip_prefix(root).unwrap_or(&file);
        entries.push(TocEntry::file(to_url_path(rel)));
    }

    let subfolders = sorted_dirs(folder, |name| {
        !name.starts_with('.') && !is_excluded_folder_name(name)
    })?;

    for sub in subfolders {
        let children = scan_folder(&sub, root, max_depth, depth + 1)?;
        if !children.is_empty() {
            entries.push(TocEntry::Section {
                title: prettify_folder_name(&dir_name(&sub)),
                children,
            });
        }
    }

    Ok(entries)
}

fn has_toc_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| TOC_EXTENSIONS.contains(&e))
}

fn dir_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, MystError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| MystError::ReadDir { path: dir.to_path_buf(), source: e })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| MystError::ReadDir { path: dir.to_path_buf(), source: e })?;
        paths.push(entry.path());
    }
    Ok(paths)
}

fn sorted_dirs(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, MystError> {
    let mut dirs: Vec<PathBuf> =
        read_dir(dir)?.into_iter().filter(|p| p.is_dir() && keep(&dir_name(p))).collect();
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# x\n").unwrap();
    }

    #[rstest]
    #[case("my_project", "My Project")]
    #[case("02_cell_culture", "Cell Culture")]
    #[case("1_ELN", "Eln")]
    #[case("research_biology_md", "Research Biology Md")]
    #[case("qPCR_runs", "Qpcr Runs")]
    #[case("", "")]
    fn test_prettify_folder_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(prettify_folder_name(name), expected);
    }

    #[test]
    fn test_scan_book_structure() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "alpha_project/1_eln/2024-01-02.md");
        touch(root, "alpha_project/1_eln/2024-01-01.md");
        touch(root, "alpha_project/1_eln/runs/day_1/run.ipynb");
        touch(root, "alpha_project/1_eln/runs/empty_dir/data.csv");
        touch(root, "alpha_project/3_scripts/analysis.md");
        touch(root, "alpha_project/5_confidential/secret.md");
        touch(root, "alpha_project/notes/loose.md");
        touch(root, "_static/style.md");
        touch(root, ".obsidian/x.md");
        touch(root, "empty_project/1_eln/readme.txt");

        let toc = scan_book_structure(root, &BookConfig::default()).unwrap();

        assert_eq!(
            toc,
            vec![TocEntry::Section {
                title: "Project: Alpha Project".to_string(),
                children: vec![
                    TocEntry::Section {
                        title: "Chapter 1: ELN".to_string(),
                        children: vec![
                            TocEntry::file("alpha_project/1_eln/2024-01-01.md"),
                            TocEntry::file("alpha_project/1_eln/2024-01-02.md"),
                            TocEntry::Section {
                                title: "Runs".to_string(),
                                children: vec![TocEntry::Section {
                                    title: "Day 1".to_string(),
                                    children: vec![TocEntry::file(
                                        "alpha_project/1_eln/runs/day_1/run.ipynb"
                                    )],
                                }],
                            },
                        ],
                    },
                    TocEntry::Section {
                        title: "Chapter 3: Code".to_string(),
                        children: vec![TocEntry::file("alpha_project/3_scripts/analysis.md")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_max_depth_limits_recursion() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "p/1_eln/a/b/deep.md");

        let toc = scan_folder(&root.join("p/1_eln"), root, 2, 0).unwrap();
        assert!(toc.is_empty());

        let toc = scan_folder(&root.join("p/1_eln"), root, 3, 0).unwrap();
        assert_eq!(toc.len(), 1);
    }
}
