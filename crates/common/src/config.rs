// Project configuration document: `<root>/.stax/config.json`.
//
// Every operation is a fresh full read or full rewrite of the file. Nothing is cached
// between calls and there is no locking, so concurrent writers race and the last
// rewrite wins.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Result, StaxError};
use crate::paths::canonical_path;

/// Name of the configuration file inside the metadata directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Permission bits for a newly created configuration file (before umask).
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o644;

const WHAT: &str = "configuration file";

/// The full configuration document of one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Generated once when the project is created, never regenerated.
    pub uuid: Uuid,
    pub name: String,
    pub creation_date: NaiveDate,
    pub author: Option<String>,
    #[serde(alias = "description")]
    pub desc: Option<String>,
    pub modules: Vec<ModuleRecord>,
}

/// A named sub-unit of a project. Names are unique within one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ModuleRecord {
    pub name: String,
    pub creation_date: NaiveDate,
    #[serde(alias = "description")]
    pub desc: Option<String>,
}

impl ProjectConfig {
    /// A fresh document with no modules.
    pub fn template(
        uuid: Uuid,
        name: impl Into<String>,
        creation_date: NaiveDate,
        author: Option<String>,
        desc: Option<String>,
    ) -> Self {
        Self { uuid, name: name.into(), creation_date, author, desc, modules: Vec::new() }
    }

    pub fn module(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.iter().find(|module| module.name == name)
    }

    /// Replace the module with the same name in place, or append it.
    /// Returns `true` when an existing entry was replaced.
    pub fn upsert_module(&mut self, record: ModuleRecord) -> bool {
        match self.modules.iter_mut().find(|module| module.name == record.name) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.modules.push(record);
                false
            }
        }
    }

    /// Check the document invariants: a non-empty name and unique module names.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("project name is empty".to_string());
        }
        for (index, module) in self.modules.iter().enumerate() {
            if self.modules[..index].iter().any(|earlier| earlier.name == module.name) {
                return Err(format!("duplicate module name `{}`", module.name));
            }
        }
        Ok(())
    }
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>, creation_date: NaiveDate, desc: Option<String>) -> Self {
        Self { name: name.into(), creation_date, desc }
    }
}

/// Handle to an existing configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Bind to the file at `path` without reading it.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current document from disk.
    pub fn model(&self) -> Result<ProjectConfig> {
        read_config(&self.path)
    }

    pub fn write(&self, config: &ProjectConfig) -> Result<()> {
        write_config(&self.path, config)
    }

    pub fn upsert_module(
        &self,
        name: &str,
        creation_date: NaiveDate,
        desc: Option<String>,
    ) -> Result<bool> {
        upsert_module(&self.path, name, creation_date, desc)
    }
}

/// Create the configuration file at `path` and write `config` into it.
///
/// Fails with `AlreadyExists` if anything already exists at `path`, and with
/// `InvalidArgument` if `config` is not a well-formed document. Nothing is left
/// on disk when creation fails.
pub fn create_config(path: &Path, config: &ProjectConfig) -> Result<ConfigFile> {
    create_with(path, config, write_config)
}

fn create_with<W>(path: &Path, config: &ProjectConfig, write: W) -> Result<ConfigFile>
where
    W: FnOnce(&Path, &ProjectConfig) -> Result<()>,
{
    ensure_valid(config)?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }

    // create_new makes the existence check and the creation a single step.
    let file = options.open(path).map_err(|error| StaxError::from_io(WHAT, path, error))?;
    drop(file);

    if let Err(error) = write(path, config) {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "failed to remove partial configuration");
        }
        return Err(error);
    }
    let canonical = canonical_path(path).map_err(|error| StaxError::from_io(WHAT, path, error))?;
    debug!(path = %canonical.display(), uuid = %config.uuid, "configuration created");
    Ok(ConfigFile { path: canonical })
}

/// Read and validate the document at `path`.
pub fn read_config(path: &Path) -> Result<ProjectConfig> {
    if !path.is_file() {
        return Err(StaxError::NotFound { what: WHAT, path: path.to_path_buf() });
    }

    let file = File::open(path).map_err(|error| StaxError::from_io(WHAT, path, error))?;
    let config: ProjectConfig = serde_json::from_reader(BufReader::new(file)).map_err(|error| {
        StaxError::MalformedData { path: path.to_path_buf(), reason: error.to_string() }
    })?;
    config
        .validate()
        .map_err(|reason| StaxError::MalformedData { path: path.to_path_buf(), reason })?;

    debug!(path = %path.display(), modules = config.modules.len(), "configuration read");
    Ok(config)
}

/// Overwrite the document at `path`. The file must already exist.
///
/// The new content is written to a uniquely named temporary file next to the real
/// file (after following symlinks) and renamed over it, so a reader sees either the
/// old or the new document.
pub fn write_config(path: &Path, config: &ProjectConfig) -> Result<()> {
    ensure_valid(config)?;

    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(StaxError::NotFound { what: WHAT, path: path.to_path_buf() }),
        Err(error) => return Err(StaxError::from_io(WHAT, path, error)),
    };
    let target = canonical_path(path).map_err(|error| StaxError::from_io(WHAT, path, error))?;

    let mut contents = serde_json::to_string_pretty(config).map_err(|error| {
        StaxError::MalformedData { path: path.to_path_buf(), reason: error.to_string() }
    })?;
    contents.push('\n');

    write_staged(&target, contents.as_bytes(), &metadata)
        .map_err(|error| StaxError::from_io(WHAT, path, error))?;

    debug!(path = %target.display(), modules = config.modules.len(), "configuration written");
    Ok(())
}

/// Insert or replace the module named `name` in the document at `path`.
///
/// Returns `true` if a module with that name already existed and was updated in
/// place, `false` if a new entry was appended.
pub fn upsert_module(
    path: &Path,
    name: &str,
    creation_date: NaiveDate,
    desc: Option<String>,
) -> Result<bool> {
    if name.is_empty() {
        return Err(StaxError::InvalidArgument("module name must not be empty".into()));
    }

    let mut config = read_config(path)?;
    let updated = config.upsert_module(ModuleRecord::new(name, creation_date, desc));
    write_config(path, &config)?;

    debug!(path = %path.display(), module = name, updated, "module upserted");
    Ok(updated)
}

fn ensure_valid(config: &ProjectConfig) -> Result<()> {
    config
        .validate()
        .map_err(|reason| StaxError::InvalidArgument(format!("invalid configuration: {reason}")))
}

/// Stage `contents` in the directory of `target` and atomically replace `target`.
/// The staging file is removed if anything fails before the rename.
fn write_staged(target: &Path, contents: &[u8], original: &fs::Metadata) -> io::Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.as_file().set_permissions(original.permissions())?;
    staged.persist(target).map_err(|error| error.error)?;
    Ok(())
}
