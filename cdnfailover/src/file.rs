use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Payload of a file in flight.
pub enum Contents {
    /// No contents (eg. a directory).
    Empty,
    /// Not yet read into memory.
    Streamed(Box<dyn Read + Send>),
    Buffered(Vec<u8>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Empty => f.write_str("Empty"),
            Contents::Streamed(_) => f.write_str("Streamed(..)"),
            Contents::Buffered(bytes) => write!(f, "Buffered({} bytes)", bytes.len()),
        }
    }
}

/// One file passing through the pipeline.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: Contents,
}

impl SourceFile {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        SourceFile { path: path.into(), contents: Contents::Empty }
    }
    pub fn buffered(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        SourceFile { path: path.into(), contents: Contents::Buffered(bytes.into()) }
    }
    pub fn streamed(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        SourceFile { path: path.into(), contents: Contents::Streamed(Box::new(reader)) }
    }
    /// Directories load as empty records, anything else is read into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let io_error = |error| Error::Io(path.to_path_buf(), error);
        let metadata = std::fs::metadata(path).map_err(io_error)?;
        if metadata.is_dir() {
            return Ok(SourceFile::empty(path))
        }
        let bytes = std::fs::read(path).map_err(io_error)?;
        Ok(SourceFile::buffered(path, bytes))
    }
    pub fn is_empty_payload(&self) -> bool {
        matches!(self.contents, Contents::Empty)
    }
    pub fn is_streamed_payload(&self) -> bool {
        matches!(self.contents, Contents::Streamed(_))
    }
    pub fn is_buffered_payload(&self) -> bool {
        matches!(self.contents, Contents::Buffered(_))
    }
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffered(bytes) => Some(bytes),
            _ => None,
        }
    }
}
