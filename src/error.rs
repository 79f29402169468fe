use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which stream a redirection directive targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Output,
    Error,
}

impl Stream {
    fn as_str(self) -> &'static str {
        match self {
            Stream::Output => "output",
            Stream::Error => "error",
        }
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a resolved program could not be launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("command not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
}

/// Every failure the interpreter reports. None of them end the session.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Parsing error: {0}")]
    Parse(&'static str),

    #[error("Syntax error: Missing file for {0} redirection")]
    MissingRedirectFile(Stream),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{name}: {source}")]
    Launch {
        name: String,
        #[source]
        source: LaunchError,
    },

    #[error("Error running command: {0}")]
    Spawn(#[source] io::Error),

    #[error("cd: {path}: {}", describe_io(.source))]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}: not found")]
    TypeNotFound(String),

    #[error("type: missing argument")]
    MissingArgument,

    #[error("{}: {}", .path.display(), describe_io(.source))]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// Classifies a failure to start a program.
    pub fn launch(name: &str, e: io::Error) -> Self {
        let source = match e.kind() {
            io::ErrorKind::NotFound => LaunchError::NotFound,
            io::ErrorKind::PermissionDenied => LaunchError::PermissionDenied,
            _ => return ShellError::Spawn(e),
        };
        ShellError::Launch {
            name: name.to_string(),
            source,
        }
    }
}

/// Renders an io error the way shells word it.
pub fn describe_io(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        io::ErrorKind::NotADirectory => "Not a directory".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::IsADirectory => "Is a directory".to_string(),
        _ => e.to_string(),
    }
}
