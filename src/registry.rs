//! Local package repository.
//!
//! Packages are stored by name and version under
//! `<data>/repository/<name>/<version>/package.zip`; a small JSON database maps
//! package names to the location they were obtained from.

use crate::constants::{DATABASE_FILE, DATA_DIR, PACKAGE_FILE};
use crate::error::{Error, Result};
use crate::loader::{get_loader, Template};
use indexmap::IndexMap;
use log::{debug, info, warn};
use semver::Version;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Returns the data directory, `$HOME/.inception`.
pub fn data_path() -> Result<PathBuf> {
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(DATA_DIR))
        .map_err(|_| Error::ConfigError("HOME is not set".to_string()))
}

/// Name to source url index.
///
/// The backing file is read and written on every call; no handle is kept.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self { path: data_path.as_ref().join(DATABASE_FILE) }
    }

    fn read(&self) -> Result<IndexMap<String, String>> {
        if !self.path.exists() {
            return Ok(IndexMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::ConfigError(format!("corrupted database '{}': {}", self.path.display(), e))
        })
    }

    fn write(&self, data: &IndexMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| Error::ConfigError(format!("failed to serialize database: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(name).cloned())
    }

    /// Records the source url of `name`, replacing any previous one.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `url` is not a valid url
    pub fn insert(&self, name: &str, url: &str) -> Result<()> {
        Url::parse(url)
            .map_err(|e| Error::ValidationError(format!("invalid url '{}': {}", url, e)))?;
        let mut data = self.read()?;
        data.insert(name.to_string(), url.to_string());
        self.write(&data)
    }
}

/// Version addressed store of template packages.
#[derive(Debug, Clone)]
pub struct FileManager {
    repo_path: PathBuf,
}

impl FileManager {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self { repo_path: data_path.as_ref().join("repository") }
    }

    pub fn package_dir(&self, name: &str, version: &str) -> PathBuf {
        self.repo_path.join(name).join(version)
    }

    /// Lists the stored versions of `name`, oldest first.
    ///
    /// Directories whose name is not a semantic version are ignored.
    pub fn versions(&self, name: &str) -> Result<Vec<Version>> {
        let path = self.repo_path.join(name);
        if !path.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            match file_name.to_str().map(Version::parse) {
                Some(Ok(version)) => versions.push(version),
                _ => debug!("Ignoring '{}' in '{}'.", entry.path().display(), path.display()),
            }
        }
        versions.sort();
        Ok(versions)
    }

    pub fn latest(&self, name: &str) -> Result<Option<Version>> {
        Ok(self.versions(name)?.pop())
    }

    /// Opens a stored package; `version` defaults to the latest one.
    ///
    /// # Errors
    /// * `Error::VersionNotFoundError` if the version directory is absent
    /// * `Error::PackageNotFoundError` if it holds no package archive
    pub fn load(&self, name: &str, version: Option<&str>) -> Result<Template> {
        let version = match version {
            Some(version) => version.to_string(),
            None => match self.latest(name)? {
                Some(version) => version.to_string(),
                None => {
                    return Err(Error::VersionNotFoundError {
                        name: name.to_string(),
                        version: "latest".to_string(),
                    })
                }
            },
        };

        let path = self.package_dir(name, &version);
        let package = path.join(PACKAGE_FILE);
        if !path.is_dir() {
            return Err(Error::VersionNotFoundError { name: name.to_string(), version });
        }
        if !package.is_file() {
            return Err(Error::PackageNotFoundError { name: name.to_string(), version });
        }
        debug!("Loading package '{}'.", package.display());
        get_loader(package)
    }

    /// Stores a template directory or archive as a package.
    ///
    /// Directories are zipped, archives are copied as they are. Stored
    /// versions are never replaced, and a failed save leaves nothing behind.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the stored package archive
    ///
    /// # Errors
    /// * `Error::UnsupportedSourceError` if `source` is not a template
    /// * `Error::ValidationError` if the template metadata is invalid
    /// * `Error::PackageExistsError` if this version is already stored
    pub fn save<P: AsRef<Path>>(&self, source: P) -> Result<PathBuf> {
        let source = source.as_ref();
        let template = get_loader(source)?;
        let metadata = template.validate()?;

        let path = self.package_dir(&metadata.name, &metadata.version);
        let package = path.join(PACKAGE_FILE);
        if package.exists() {
            return Err(Error::PackageExistsError {
                name: metadata.name.clone(),
                version: metadata.version.clone(),
            });
        }

        fs::create_dir_all(&path)?;
        info!("Storing '{}' in '{}'.", source.display(), path.display());

        // The archive only takes its final name once it is complete.
        let partial = path.join(format!("{}.partial", PACKAGE_FILE));
        let stored = if source.is_dir() {
            zip_directory(source, &partial)
        } else {
            fs::copy(source, &partial).map(|_| ()).map_err(Error::from)
        }
        .and_then(|()| fs::rename(&partial, &package).map_err(Error::from));

        if let Err(e) = stored {
            warn!("Discarding incomplete package '{}'.", partial.display());
            let _ = fs::remove_file(&partial);
            let _ = fs::remove_dir(&path);
            return Err(e);
        }
        Ok(package)
    }
}

/// Packs the contents of `source` into a new archive at `target`.
fn zip_directory(source: &Path, target: &Path) -> Result<()> {
    let file = File::create(target)?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::SourceError(e.to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
        } else {
            zip.start_file(name, options)?;
            zip.write_all(&fs::read(entry.path())?)?;
        }
    }

    zip.finish()?;
    Ok(())
}
