use crate::error::Result;
use std::path::Path;

/// Kind of a node found while walking a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One directory or file of a template, relative to the walked sub-path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub kind: EntryKind,
    /// Slash separated path relative to the walked root
    pub relative_path: String,
    /// Permission bits of the source, when the source can express them
    pub permissions: Option<u32>,
    /// File content; empty for directories
    pub content: Vec<u8>,
}

impl PathEntry {
    pub fn directory<S: Into<String>>(relative_path: S, permissions: Option<u32>) -> Self {
        Self {
            kind: EntryKind::Directory,
            relative_path: relative_path.into(),
            permissions,
            content: Vec::new(),
        }
    }

    pub fn file<S: Into<String>>(
        relative_path: S,
        permissions: Option<u32>,
        content: Vec<u8>,
    ) -> Self {
        Self { kind: EntryKind::File, relative_path: relative_path.into(), permissions, content }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Lazy sequence of entries produced by a walk.
pub type Walk<'a> = Box<dyn Iterator<Item = Result<PathEntry>> + 'a>;

/// Read access to the contents of a template, whatever stores it.
pub trait TemplateLoader {
    /// Location the loader reads from.
    fn root(&self) -> &Path;

    /// Walks every directory and file below `relative_path`.
    ///
    /// Each call starts a fresh walk. A sub-path that does not exist yields
    /// an empty walk.
    fn walk(&self, relative_path: &str) -> Result<Walk<'_>>;

    /// Reads a file relative to the template root, `None` if it is absent.
    fn read_file(&self, relative_path: &str) -> Result<Option<Vec<u8>>>;
}
