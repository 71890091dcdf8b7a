use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors surfaced by dotsync operations.
///
/// Every variant maps onto one operator-facing kind name (see [`Error::kind`]),
/// which the binary prints as `!! <kind>: <message>`.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration, or a malformed persisted config file.
    #[error("{0}")]
    Configuration(String),

    /// The requested file name is not tracked by the repository directory.
    #[error("no stored file matches the name '{0}'")]
    NotFound(String),

    /// Repository names without a local counterpart.
    #[error("could not find local file(s) matching: {}", quote_all(.missing))]
    Consistency { missing: Vec<String> },

    /// A pull before pushing brought in upstream changes.
    #[error(
        "aborting overwrite of the repository's dot files because 'git pull' changed them \
         (repeat the command if the overwrite is still wanted)\n{summary}"
    )]
    RemoteDiverged { summary: String },

    /// The underlying git invocation failed.
    #[error("'git {command}' failed: {detail}")]
    VcsOperation { command: String, detail: String },

    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The stable kind name used when rendering the error to the operator.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "ConfigurationError",
            Error::NotFound(_) => "NotFoundError",
            Error::Consistency { .. } => "ConsistencyError",
            Error::RemoteDiverged { .. } => "RemoteDivergedError",
            Error::VcsOperation { .. } => "VcsOperationError",
            Error::Io { .. } => "IoError",
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
