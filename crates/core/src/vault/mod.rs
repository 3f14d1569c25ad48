//! Vault file discovery and lookup.
//!
//! This module provides utilities for walking vault directories and
//! building the normalized file-name index that embeds resolve against.

pub mod index;
pub mod walker;

pub use index::{FileIndex, FileKind, IMAGE_EXTENSIONS, IndexEntry, KeyCollision};
pub use walker::{EXCLUDED_FOLDERS, VaultWalker, VaultWalkerError, WalkedFile};
