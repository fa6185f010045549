//! Collaborators that find documents on disk and turn them into text.

use crate::error::EngineError;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
}

/// How raw document bytes become indexable text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Strip every `<...>` tag (XML/HTML sources).
    #[default]
    Markup,
    /// Use the file contents unchanged.
    Plain,
}

/// Recursive listing of the regular files under a root.
pub trait FileEnumerator {
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, EngineError>;
}

/// Produces the decoded text of one document.
pub trait DocumentLoader {
    fn load(&self, path: &Path, mode: ParseMode) -> Result<String, EngineError>;
}

/// Walks the directory tree with `walkdir`, following symlinks to files and
/// directories. A link that loops back to an ancestor is reported by `walkdir`
/// and skipped like any other unreadable entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirEnumerator;

impl FileEnumerator for WalkDirEnumerator {
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, EngineError> {
        if !root.is_dir() {
            return Err(EngineError::InvalidRoot(root.to_path_buf()));
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            match entry {
                Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "skipping unreadable directory entry"),
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Reads documents straight from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentLoader;

impl DocumentLoader for FsDocumentLoader {
    fn load(&self, path: &Path, mode: ParseMode) -> Result<String, EngineError> {
        let bytes = fs::read(path)
            .map_err(|source| EngineError::DocumentUnreadable { path: path.to_path_buf(), source })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(match mode {
            ParseMode::Markup => strip_tags(&text).into_owned(),
            ParseMode::Plain => text.into_owned(),
        })
    }
}

/// Remove every angle-bracket-delimited tag.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(text, "")
}
