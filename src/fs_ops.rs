//! Filesystem helpers that attach the offending path to every I/O error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

pub fn exists(path: &Path) -> bool {
    path.exists()
}

pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a text file, creating missing parent directories.
pub fn write(path: &Path, content: &str) -> Result<()> {
    write_bytes(path, content.as_bytes())
}

pub fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    debug!(path = %path.display(), bytes = content.len(), "writing file");
    std::fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy a file, creating missing parent directories of the destination.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    debug!(from = %from.display(), to = %to.display(), "copying file");
    std::fs::copy(from, to).map_err(|e| Error::FileCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write pretty-printed JSON (two-space indent, trailing newline).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).map_err(|e| Error::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    content.push('\n');
    write(path, &content)
}

/// List the entry names of a directory, sorted.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::FileRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::FileRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Returns the entries of `dir` whose names are not in `allowed`.
/// A missing directory has no entries.
pub fn unexpected_entries(dir: &Path, allowed: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    Ok(list_files(dir)?
        .into_iter()
        .filter(|name| !allowed.contains(&name.as_str()))
        .map(|name| dir.join(name))
        .collect())
}
