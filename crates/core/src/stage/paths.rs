use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute, symlink-resolved form of a path that may not exist yet.
///
/// The longest existing ancestor is canonicalized and the remaining
/// components are appended lexically.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined =
        if path.is_absolute() { path.to_path_buf() } else { std::env::current_dir()?.join(path) };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    let mut existing = normalized.as_path();
    let mut rest = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in rest.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
