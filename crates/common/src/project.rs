// Project roots: locating, creating and dismantling `.stax` metadata directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{create_config, ConfigFile, ProjectConfig, CONFIG_FILE_NAME};
use crate::error::{Result, StaxError};
use crate::paths::{base_name, canonical_path, current_dir};

/// Name of the metadata directory that marks a project root.
pub const META_DIR_NAME: &str = ".stax";

/// Permission bits for a newly created metadata directory (before umask).
#[cfg(unix)]
const META_DIR_MODE: u32 = 0o755;

/// Name used when the project root has no usable base name (the filesystem root).
const FALLBACK_PROJECT_NAME: &str = "project";

/// A directory containing a `.stax` metadata directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Open the project rooted exactly at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        if !is_project_root(root) {
            return Err(StaxError::NotFound {
                what: "project metadata directory",
                path: root.join(META_DIR_NAME),
            });
        }
        let root = canonical_path(root)
            .map_err(|error| StaxError::from_io("project root", root, error))?;
        Ok(Self { root })
    }

    /// Canonical absolute path of the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(META_DIR_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.meta_dir().join(CONFIG_FILE_NAME)
    }

    pub fn config(&self) -> ConfigFile {
        ConfigFile::at(self.config_path())
    }
}

/// Optional attributes for [`init_project`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Project name. `None` uses the root directory's base name; `Some("")` is rejected.
    pub name: Option<String>,
    pub author: Option<String>,
    pub desc: Option<String>,
}

/// True iff `path/.stax` exists and is a directory. `path` is used as given.
pub fn is_project_root(path: &Path) -> bool {
    path.join(META_DIR_NAME).is_dir()
}

/// Find the nearest project root at or above `start`.
///
/// Returns `Ok(None)` when no ancestor qualifies. Fails only if `start` itself
/// cannot be canonicalized.
pub fn find_enclosing_project(start: &Path) -> Result<Option<Project>> {
    let start = canonical_path(start)
        .map_err(|error| StaxError::from_io("search start directory", start, error))?;

    let mut candidate = start.as_path();
    loop {
        debug!(candidate = %candidate.display(), "checking for project root");
        if is_project_root(candidate) {
            return Ok(Some(Project { root: candidate.to_path_buf() }));
        }
        match candidate.parent() {
            Some(parent) => candidate = parent,
            None => return Ok(None),
        }
    }
}

/// [`find_enclosing_project`] starting at the current working directory.
pub fn find_enclosing_project_from_cwd() -> Result<Option<Project>> {
    let cwd = current_dir()
        .map_err(|error| StaxError::from_io("current directory", Path::new("."), error))?;
    find_enclosing_project(&cwd)
}

/// Turn `root` into a project: create `root/.stax` and its configuration document.
///
/// The check is exact: a directory nested inside another project may still be
/// initialized as its own project.
pub fn init_project(root: &Path, options: InitOptions) -> Result<Project> {
    init_with(root, options, create_config)
}

fn init_with<C>(root: &Path, options: InitOptions, create: C) -> Result<Project>
where
    C: FnOnce(&Path, &ProjectConfig) -> Result<ConfigFile>,
{
    let meta_dir = root.join(META_DIR_NAME);
    if meta_dir.is_file() {
        return Err(StaxError::MalformedMetadata {
            path: meta_dir,
            reason: "expected a directory but found a file".into(),
        });
    }
    if meta_dir.is_dir() {
        return Err(StaxError::AlreadyExists { what: "project", path: root.to_path_buf() });
    }
    if options.name.as_deref() == Some("") {
        return Err(StaxError::InvalidArgument("project name must not be empty".into()));
    }

    // Topmost directory this call creates; removing it undoes a failed init.
    let created_top = root
        .ancestors()
        .filter(|dir| !dir.as_os_str().is_empty())
        .take_while(|dir| !dir.exists())
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| meta_dir.clone());

    create_meta_dir(&meta_dir)?;

    let created = canonical_path(root)
        .map_err(|error| StaxError::from_io("project root", root, error))
        .and_then(|root| {
            let name = options
                .name
                .or_else(|| base_name(&root))
                .unwrap_or_else(|| FALLBACK_PROJECT_NAME.to_string());
            let config = ProjectConfig::template(
                Uuid::new_v4(),
                name,
                Local::now().date_naive(),
                options.author,
                options.desc,
            );
            let project = Project { root };
            create(&project.config_path(), &config)?;
            Ok((project, config))
        });

    match created {
        Ok((project, config)) => {
            info!(
                root = %project.root.display(),
                name = %config.name,
                uuid = %config.uuid,
                "project initialized"
            );
            Ok(project)
        }
        Err(error) => {
            if let Err(cleanup) = fs::remove_dir_all(&created_top) {
                warn!(path = %created_top.display(), error = %cleanup, "failed to roll back project directory");
            }
            Err(error)
        }
    }
}

/// Remove `root/.stax` and everything inside it. Irreversible.
pub fn dismantle_project(root: &Path) -> Result<()> {
    let meta_dir = root.join(META_DIR_NAME);
    if !meta_dir.is_dir() {
        return Err(StaxError::NotFound { what: "project metadata directory", path: meta_dir });
    }

    fs::remove_dir_all(&meta_dir)
        .map_err(|error| StaxError::from_io("project metadata directory", &meta_dir, error))?;
    info!(root = %root.display(), "project dismantled");
    Ok(())
}

fn create_meta_dir(meta_dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(META_DIR_MODE);
    }
    builder
        .create(meta_dir)
        .map_err(|error| StaxError::from_io("project metadata directory", meta_dir, error))
}
