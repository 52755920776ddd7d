use super::interface::{PathEntry, TemplateLoader, Walk};
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Loader for templates stored as a directory tree.
#[derive(Debug)]
pub struct PathLoader {
    path: PathBuf,
}

impl PathLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(unix)]
fn permissions_of(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permissions_of(_metadata: &fs::Metadata) -> Option<u32> {
    None
}

/// Joins the components of `path` below `base` with forward slashes.
fn relative_path(base: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(base).map_err(|e| Error::SourceError(e.to_string()))?;
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            Error::SourceError(format!("non UTF-8 path '{}'", path.display()))
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Reads one walked entry. Symlinks are followed, so a dangling link fails
/// here without stopping the walk.
fn path_entry(base: &Path, entry: DirEntry) -> Result<PathEntry> {
    let path = entry.path();
    let relative = relative_path(base, path)?;
    let unreadable =
        |e: std::io::Error| Error::SourceError(format!("cannot read '{}': {}", relative, e));
    let metadata = fs::metadata(path).map_err(unreadable)?;
    let permissions = permissions_of(&metadata);

    if metadata.is_dir() {
        Ok(PathEntry::directory(relative, permissions))
    } else {
        let content = fs::read(path).map_err(unreadable)?;
        Ok(PathEntry::file(relative, permissions, content))
    }
}

impl TemplateLoader for PathLoader {
    fn root(&self) -> &Path {
        &self.path
    }

    fn walk(&self, relative_path: &str) -> Result<Walk<'_>> {
        let source = self.path.join(relative_path);
        debug!("Walking over '{}'.", source.display());

        if !source.is_dir() {
            debug!("'{}' is not a directory, nothing to walk.", source.display());
            return Ok(Box::new(std::iter::empty()));
        }

        let entries = WalkDir::new(&source).min_depth(1).sort_by_file_name().into_iter();
        Ok(Box::new(entries.map(move |entry| {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            path_entry(&source, entry)
        })))
    }

    fn read_file(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path.join(relative_path);
        if !path.is_file() {
            return Ok(None);
        }
        debug!("Reading '{}'.", path.display());
        Ok(Some(fs::read(path)?))
    }
}
