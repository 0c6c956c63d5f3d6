//! Loading input text.
//!
//! The [`SourceProvider`] trait abstracts file I/O so the pipeline can run on
//! in-memory text in tests and embeddings. Every loaded file becomes one
//! tokenizer section, named by its path, so diagnostics point at the right
//! file.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub trait SourceProvider {
    /// Read the full text of `path`.
    fn read_source(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads from the file system with `std::fs::read_to_string`.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Maps paths to text without touching the file system.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        Self { files }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> std::io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", path.display()),
            )
        })
    }
}

/// One named piece of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub content: String,
}

impl Source {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads everything from `reader`, e.g. standard input.
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> Result<Self> {
        let name = name.into();
        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(|e| Error::Io {
            path: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Source { name, content })
    }
}

/// Loads every path through `provider`, in order.
pub fn load_sources<P: AsRef<Path>>(provider: &dyn SourceProvider, paths: &[P]) -> Result<Vec<Source>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            log::debug!("reading “{}”", path.display());
            let content = provider.read_source(path).map_err(|e| Error::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            Ok(Source::new(path.display().to_string(), content))
        })
        .collect()
}
