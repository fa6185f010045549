use crate::CorpusIndex;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// File name used when the hosting application does not pick one.
pub const DEFAULT_INDEX_FILE: &str = "index.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed index {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not move new index into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Durable home of the corpus index: a single JSON file.
///
/// Writes go to a temp file next to the destination which is then renamed over
/// it, so a concurrent reader sees either the old index or the new one.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl Default for IndexStore {
    fn default() -> Self { Self::new(DEFAULT_INDEX_FILE) }
}

impl IndexStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Replace the persisted index with `corpus` in full.
    pub fn save(&self, corpus: &CorpusIndex) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        fs::create_dir_all(dir).map_err(io_err)?;

        let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut w = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut w, corpus)
                .map_err(|source| StoreError::Serialization { path: self.path.clone(), source })?;
            w.flush().map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path)
            .map_err(|source| StoreError::Persist { path: self.path.clone(), source })?;
        tracing::debug!(path = %self.path.display(), docs = corpus.len(), "index saved");
        Ok(())
    }

    /// Read the persisted index, failing on a missing or malformed file.
    pub fn try_load(&self) -> Result<CorpusIndex, StoreError> {
        let f = File::open(&self.path).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        let corpus = serde_json::from_reader(BufReader::new(f))
            .map_err(|source| StoreError::Serialization { path: self.path.clone(), source })?;
        Ok(corpus)
    }

    /// Read the persisted index; anything unusable reads as an empty corpus.
    pub fn load(&self) -> CorpusIndex {
        match self.try_load() {
            Ok(corpus) => corpus,
            Err(err) => {
                tracing::warn!(error = %err, "index unavailable, using empty corpus");
                CorpusIndex::new()
            }
        }
    }
}
