// Consistent exit codes for the stax CLI.
//
//   0 = success
//   1 = general error
//   2 = usage/argument error
//   3 = project, configuration or path not found
//   4 = project or configuration already exists
//   5 = malformed project metadata or configuration data
//   6 = invalid argument value

use std::process;

use stax_common::{ErrorKind, StaxError};

/// Named exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    NotFound = 3,
    AlreadyExists = 4,
    Malformed = 5,
    InvalidArgument = 6,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(stax_err) = cause.downcast_ref::<StaxError>() {
                return Self::from_kind(stax_err.kind());
            }
            if cause.downcast_ref::<clap::Error>().is_some() {
                return Self::Usage;
            }
        }
        Self::Error
    }

    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::AlreadyExists => Self::AlreadyExists,
            ErrorKind::MalformedMetadata | ErrorKind::MalformedData => Self::Malformed,
            ErrorKind::InvalidArgument => Self::InvalidArgument,
            ErrorKind::Io => Self::Error,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}
