//! Template sources.
//! A template is either a directory tree or a zip archive; both are read
//! through the same [`TemplateLoader`] interface and exposed as a [`Template`].
use crate::config::{parse_metadata, parse_settings, Metadata, Settings};
use crate::constants::{METADATA_FILES, SETTINGS_FILES};
use crate::error::{Error, Result};
use log::debug;
use std::cell::OnceCell;
use std::path::Path;

pub mod archive;
pub mod interface;
pub mod local;

pub use archive::ZipLoader;
pub use interface::{EntryKind, PathEntry, TemplateLoader, Walk};
pub use local::PathLoader;

/// A template source together with its lazily loaded documents.
///
/// Settings and metadata are read on first access and kept for the lifetime
/// of the value; later accesses never touch the source again.
pub struct Template {
    loader: Box<dyn TemplateLoader>,
    settings: OnceCell<Settings>,
    metadata: OnceCell<Metadata>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").field("root", &self.loader.root()).finish()
    }
}

impl Template {
    pub fn new(loader: Box<dyn TemplateLoader>) -> Self {
        Self { loader, settings: OnceCell::new(), metadata: OnceCell::new() }
    }

    pub fn root(&self) -> &Path {
        self.loader.root()
    }

    pub fn walk(&self, relative_path: &str) -> Result<Walk<'_>> {
        self.loader.walk(relative_path)
    }

    pub fn read_file(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        self.loader.read_file(relative_path)
    }

    /// Reads a text file of the template, `None` if it is absent.
    pub fn read_to_string(&self, relative_path: &str) -> Result<Option<String>> {
        match self.read_file(relative_path)? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                Error::SourceError(format!("'{}' is not valid UTF-8", relative_path))
            }),
            None => Ok(None),
        }
    }

    /// Returns the first of `candidates` present in the template.
    fn find_document(&self, candidates: &[&str]) -> Result<Option<(String, String)>> {
        for name in candidates {
            if let Some(content) = self.read_to_string(name)? {
                debug!("Loading '{}' from '{}'.", name, self.root().display());
                return Ok(Some((name.to_string(), content)));
            }
        }
        Ok(None)
    }

    /// Returns the template settings, loading them on first access.
    ///
    /// A template without a settings file has empty settings.
    ///
    /// # Errors
    /// * `Error::SettingsParseError` if the settings file is malformed
    pub fn settings(&self) -> Result<&Settings> {
        if let Some(settings) = self.settings.get() {
            return Ok(settings);
        }
        let settings = match self.find_document(&SETTINGS_FILES)? {
            Some((name, content)) => parse_settings(&content, &name)?,
            None => {
                debug!("No settings file found (tried: {}).", SETTINGS_FILES.join(", "));
                Settings::default()
            }
        };
        Ok(self.settings.get_or_init(|| settings))
    }

    /// Returns the package metadata, loading it on first access.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no metadata file exists
    /// * `Error::SettingsParseError` if the metadata file is malformed
    pub fn metadata(&self) -> Result<&Metadata> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let Some((name, content)) = self.find_document(&METADATA_FILES)? else {
            return Err(Error::ConfigError(format!(
                "No metadata file found (tried: {})",
                METADATA_FILES.join(", ")
            )));
        };
        let metadata = parse_metadata(&content, &name)?;
        Ok(self.metadata.get_or_init(|| metadata))
    }

    /// Checks that the template is a valid package and returns its metadata.
    pub fn validate(&self) -> Result<&Metadata> {
        let metadata = self.metadata()?;
        metadata.validate()?;
        self.settings()?;
        Ok(metadata)
    }
}

/// Opens the template at `path`.
///
/// # Returns
/// * A directory-backed template if `path` is a directory
/// * An archive-backed template if `path` is a zip file
///
/// # Errors
/// * `Error::UnsupportedSourceError` for anything else
pub fn get_loader<P: AsRef<Path>>(path: P) -> Result<Template> {
    let path = path.as_ref();
    if path.is_dir() {
        debug!("Using template directory '{}'.", path.display());
        return Ok(Template::new(Box::new(PathLoader::new(path))));
    }
    if ZipLoader::is_zipfile(path) {
        debug!("Using template archive '{}'.", path.display());
        return Ok(Template::new(Box::new(ZipLoader::new(path))));
    }
    Err(Error::UnsupportedSourceError { path: path.display().to_string() })
}
