use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document encoding in {path}: {source}")]
    InvalidEncoding {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("Invalid documents directory: {0}")]
    InvalidRoot(String),
}

/// Load a document from a text file under the documents root.
pub fn read_document(relative_path: &RelativePath, root: &Path) -> Result<Document, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let bytes = fs::read(&absolute_path).map_err(IoError::Io)?;
    let text = std::str::from_utf8(&bytes).map_err(|source| IoError::InvalidEncoding {
        path: absolute_path,
        source,
    })?;
    Ok(Document::from_text(text))
}

/// Write a document's text content under the documents root.
///
/// Only the text stream is written; embedded objects belong to whatever
/// storage format the surrounding layer uses.
pub fn write_document(
    relative_path: &RelativePath,
    root: &Path,
    doc: &Document,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, doc.text()).map_err(IoError::Io)
}

pub fn validate_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidRoot(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
