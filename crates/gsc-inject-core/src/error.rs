use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

use crate::project::ENTRY_FILE;
use crate::target::BackendKind;

/// Failure reported by a console transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("Unexpected response from target: {0}")]
    UnexpectedResponse(String),

    #[error("No process attached")]
    NotAttached,

    #[error("{0}")]
    Unavailable(String),
}

/// Failure reported by the external compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Compiler could not be started: {0}")]
    Unavailable(String),

    #[error("Compilation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Project directory {} does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("No {} found in project directory {}", ENTRY_FILE, .root.display())]
    MissingEntry { root: PathBuf },

    #[error("Failed to scan {}: {message}", .path.display())]
    Scan { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bad syntax at line {line} in {}: {message}.", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Compiler(#[from] CompileError),

    #[error("Compiler produced no output for {destination}")]
    Empty { destination: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to connect to target via {backend}")]
    ConnectFailed { backend: BackendKind },

    #[error("Connected via {backend} but failed to attach to the game process")]
    AttachFailed { backend: BackendKind },

    #[error("{backend} transport error: {source}")]
    Transport {
        backend: BackendKind,
        #[source]
        source: TransportError,
    },
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Failed to overwrite script pointer at {address:#010x}: {source}")]
    PointerWrite {
        address: u32,
        #[source]
        source: TransportError,
    },

    #[error("Failed to write {len} bytes at {address:#010x}: {source}")]
    BufferWrite {
        address: u32,
        len: usize,
        #[source]
        source: TransportError,
    },
}

/// Any error that terminates a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

/// Error taxonomy used for reporting and exit codes.
///
/// Settings errors have no category: they are always recovered by
/// regenerating defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorCategory {
    Usage,
    Validation,
    Build,
    Connectivity,
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Assembly(AssemblyError::NotADirectory(_) | AssemblyError::MissingEntry { .. }) => {
                ErrorCategory::Usage
            }
            Self::Assembly(_) => ErrorCategory::Validation,
            Self::Build(_) => ErrorCategory::Build,
            Self::Session(_) | Self::Deploy(_) => ErrorCategory::Connectivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_usage() {
        let err = PipelineError::from(AssemblyError::MissingEntry {
            root: PathBuf::from("project"),
        });
        assert_eq!(err.category(), ErrorCategory::Usage);
        assert!(err.to_string().contains("main.gsc"));
    }

    #[test]
    fn test_category_validation() {
        let err = PipelineError::from(AssemblyError::Syntax {
            path: PathBuf::from("project/main.gsc"),
            line: 4,
            message: "unexpected '}'".to_string(),
        });
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            err.to_string(),
            format!(
                "Bad syntax at line 4 in {}: unexpected '}}'.",
                PathBuf::from("project/main.gsc").display()
            )
        );
    }

    #[test]
    fn test_category_build_and_connectivity() {
        let build = PipelineError::from(BuildError::Empty {
            destination: "maps/mp/gametypes/_clientids.gsc".to_string(),
        });
        assert_eq!(build.category(), ErrorCategory::Build);

        let session = PipelineError::from(SessionError::AttachFailed {
            backend: BackendKind::ControlConsole,
        });
        assert_eq!(session.category(), ErrorCategory::Connectivity);

        let deploy = PipelineError::from(DeployError::PointerWrite {
            address: 0x1000,
            source: TransportError::NotAttached,
        });
        assert_eq!(deploy.category(), ErrorCategory::Connectivity);
        assert_eq!(ErrorCategory::Connectivity.to_string(), "connectivity");
    }
}
