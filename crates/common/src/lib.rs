// stax-common: project metadata lifecycle shared by the stax CLI.

pub mod config;
pub mod error;
pub mod paths;
pub mod project;

pub use config::{ConfigFile, ModuleRecord, ProjectConfig};
pub use error::{ErrorKind, Result, StaxError};
pub use project::{InitOptions, Project};
