use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A file found on disk, ready to be offered for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Set for files found inside a directory: `<dir>/<sub>/<file>`.
    pub relative_path: Option<String>,
}

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}: not a regular file or directory")]
    Unsupported(PathBuf),
}

/// Expands a picked path the way a browser expands a folder drop.
///
/// A file yields itself. A directory is walked recursively in name order,
/// skipping dot-entries, and every file carries its path relative to the
/// directory's parent.
pub fn discover_files(path: &Path) -> Result<Vec<DiscoveredFile>, DiscoverError> {
    let meta = fs::metadata(path).map_err(|source| DiscoverError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if meta.is_file() {
        return Ok(vec![DiscoveredFile {
            path: path.to_path_buf(),
            file_name: file_name_of(path),
            relative_path: None,
        }]);
    }
    if !meta.is_dir() {
        return Err(DiscoverError::Unsupported(path.to_path_buf()));
    }

    let mut found = Vec::new();
    let root_name = file_name_of(path);
    walk(path, &root_name, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, prefix: &str, found: &mut Vec<DiscoveredFile>) -> Result<(), DiscoverError> {
    let io_err = |source| DiscoverError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let relative = format!("{prefix}/{name}");
        let file_type = entry.file_type().map_err(io_err)?;
        if file_type.is_dir() {
            walk(&path, &relative, found)?;
        } else if path.is_file() {
            found.push(DiscoveredFile {
                path,
                file_name: name,
                relative_path: Some(relative),
            });
        }
    }
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            path.canonicalize()
                .ok()
                .and_then(|full| full.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| path.display().to_string())
}
