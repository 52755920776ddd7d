use super::Context;
use crate::constants::{DEFAULT_COPY_SOURCE, TEMPLATE_SUFFIX};
use crate::error::{Error, Result};
use crate::ignore::build_ignore_set;
use crate::loader::{EntryKind, PathEntry, Template};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Copies a sub-directory of the template into the output directory,
/// rendering paths and template files on the way.
///
/// Existing directories are reused; existing files are never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    source: String,
}

impl Default for CopyCommand {
    fn default() -> Self {
        Self::new(DEFAULT_COPY_SOURCE)
    }
}

impl CopyCommand {
    pub fn new<S: Into<String>>(source: S) -> Self {
        Self { source: source.into() }
    }

    pub fn from_args(args: Option<Value>) -> Result<Self> {
        match args {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(source)) => Ok(Self::new(source)),
            Some(Value::Object(map)) => match map.get("source") {
                Some(Value::String(source)) if map.len() == 1 => Ok(Self::new(source.clone())),
                _ => Err(Error::ConfigError("copy expects a 'source' string".to_string())),
            },
            Some(_) => Err(Error::ConfigError("copy expects a source directory".to_string())),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn execute(&self, template: &Template, output: &Path, context: &mut Context) -> Result<()> {
        let ignored = build_ignore_set(&template.settings()?.ignore)?;

        for entry in template.walk(&self.source)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Failed to read template entry: {}", e);
                    continue;
                }
            };
            if ignored.is_match(&entry.relative_path) {
                debug!("Skipping ignored '{}'.", entry.relative_path);
                continue;
            }

            let result = match entry.kind {
                EntryKind::Directory => create_directory(&entry, output, context),
                EntryKind::File => copy_file(&entry, output, context),
            };
            if let Err(e) = result {
                error!("Failed to process '{}': {}", entry.relative_path, e);
            }
        }
        Ok(())
    }
}

/// Returns the path without the template suffix, if it names a template file.
pub fn strip_template_suffix(path: &str) -> Option<&str> {
    path.strip_suffix(TEMPLATE_SUFFIX)
        .filter(|stripped| !stripped.is_empty() && !stripped.ends_with('/'))
}

/// Checks that a rendered relative path stays inside the output directory.
pub fn is_rendered_path_valid(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.split('/').any(|segment| segment.is_empty() || segment == "..")
}

/// Renders `relative` and returns it if it is usable as an output path.
///
/// Paths rendering to nothing are conditional entries switched off by the
/// variables and are skipped quietly.
fn render_path(relative: &str, context: &Context) -> Result<Option<String>> {
    let rendered = context.render(relative)?;
    if rendered.trim().is_empty() {
        debug!("Skipping '{}' as its rendered path is empty.", relative);
        return Ok(None);
    }
    if !is_rendered_path_valid(&rendered) {
        warn!("Skipping '{}': rendered path '{}' is not valid.", relative, rendered);
        return Ok(None);
    }
    Ok(Some(rendered))
}

fn create_directory(entry: &PathEntry, output: &Path, context: &Context) -> Result<()> {
    let Some(relative) = render_path(&entry.relative_path, context)? else {
        return Ok(());
    };
    let path = output.join(relative);
    if !path.exists() {
        info!("Creating directory '{}'.", path.display());
        fs::create_dir_all(&path)?;
    }
    Ok(())
}

fn copy_file(entry: &PathEntry, output: &Path, context: &Context) -> Result<()> {
    let (relative, is_template) = match strip_template_suffix(&entry.relative_path) {
        Some(stripped) => (stripped, true),
        None => (entry.relative_path.as_str(), false),
    };
    let Some(relative) = render_path(relative, context)? else {
        return Ok(());
    };

    let target = output.join(relative);
    if target.exists() {
        warn!("File '{}' already exists and will not be overwritten.", target.display());
        return Ok(());
    }

    let content: Cow<[u8]> = if is_template {
        let text = std::str::from_utf8(&entry.content).map_err(|_| {
            Error::TemplateError(format!("'{}' is not valid UTF-8", entry.relative_path))
        })?;
        Cow::Owned(context.render(text)?.into_bytes())
    } else {
        Cow::Borrowed(entry.content.as_slice())
    };

    write_new_file(&target, &content, entry.permissions)
}

/// Writes `content` to a file that must not exist yet.
fn write_new_file(target: &Path, content: &[u8], permissions: Option<u32>) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!("Writing file '{}'.", target.display());
    let mut file = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            warn!("File '{}' already exists and will not be overwritten.", target.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(content)?;
    drop(file);

    if let Some(mode) = permissions {
        set_permissions(target, mode)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_permissions(target: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(target, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_permissions(_target: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
