use super::interface::{PathEntry, TemplateLoader, Walk};
use crate::error::Result;
use log::debug;
use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Loader for templates packed in a zip archive.
///
/// Archive members carry no permission bits, so every entry reports `None`.
#[derive(Debug)]
pub struct ZipLoader {
    path: PathBuf,
}

impl ZipLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns true if `path` is a file that opens as a zip archive.
    pub fn is_zipfile<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        path.is_file() && File::open(path).map(|f| ZipArchive::new(f).is_ok()).unwrap_or(false)
    }

    fn open(&self) -> Result<ZipArchive<File>> {
        let file = File::open(&self.path)?;
        Ok(ZipArchive::new(file)?)
    }
}

/// Walk over the members of an archive below a prefix.
///
/// Directories are not required to be archive members: every ancestor of a
/// member is emitted once, the first time it is seen.
struct ArchiveWalk {
    archive: ZipArchive<File>,
    index: usize,
    prefix: String,
    seen: HashSet<String>,
    pending: VecDeque<PathEntry>,
}

impl ArchiveWalk {
    fn new(archive: ZipArchive<File>, relative_path: &str) -> Self {
        let prefix = relative_path.trim_matches('/');
        let prefix = if prefix.is_empty() { String::new() } else { format!("{}/", prefix) };
        Self { archive, index: 0, prefix, seen: HashSet::new(), pending: VecDeque::new() }
    }

    /// Queues every unseen directory on the way to `path`.
    fn queue_directories(&mut self, path: &str, include_self: bool) {
        let mut segments: Vec<&str> = path.split('/').collect();
        if !include_self {
            segments.pop();
        }
        for end in 1..=segments.len() {
            let directory = segments[..end].join("/");
            if self.seen.insert(directory.clone()) {
                self.pending.push_back(PathEntry::directory(directory, None));
            }
        }
    }

    fn read_member(&mut self, index: usize) -> Result<()> {
        let mut member = self.archive.by_index(index)?;
        let name = member.name().to_string();

        let Some(relative) = name.strip_prefix(&self.prefix) else {
            return Ok(());
        };
        let relative = relative.trim_end_matches('/').to_string();
        if relative.is_empty() {
            return Ok(());
        }

        if member.is_dir() {
            drop(member);
            self.queue_directories(&relative, true);
            return Ok(());
        }

        let mut content = Vec::new();
        member.read_to_end(&mut content)?;
        drop(member);

        self.queue_directories(&relative, false);
        self.pending.push_back(PathEntry::file(relative, None, content));
        Ok(())
    }
}

impl Iterator for ArchiveWalk {
    type Item = Result<PathEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Some(Ok(entry));
            }
            if self.index >= self.archive.len() {
                return None;
            }
            let index = self.index;
            self.index += 1;
            if let Err(e) = self.read_member(index) {
                return Some(Err(e));
            }
        }
    }
}

impl TemplateLoader for ZipLoader {
    fn root(&self) -> &Path {
        &self.path
    }

    fn walk(&self, relative_path: &str) -> Result<Walk<'_>> {
        debug!("Walking over '{}' in '{}'.", relative_path, self.path.display());
        let archive = self.open()?;
        Ok(Box::new(ArchiveWalk::new(archive, relative_path)))
    }

    fn read_file(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let mut archive = self.open()?;
        let mut member = match archive.by_name(relative_path) {
            Ok(member) => member,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!("Reading '{}' from '{}'.", relative_path, self.path.display());
        let mut content = Vec::new();
        member.read_to_end(&mut content)?;
        Ok(Some(content))
    }
}
