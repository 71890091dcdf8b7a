pub use error::{Error, Result};

/// Command-line definition of the `dotsync` binary.
pub mod args;
/// The `config`, `local` and `repo` commands.
pub mod commands;
/// Persisted key/value configuration.
pub mod config;
/// Remote safety policy: pull gates, commits and pushes.
pub mod coordinator;
pub mod error;
/// Line-ending policy and byte-level normalization.
pub mod lineending;
/// Matching repository files against the local dot file directory.
pub mod resolver;
/// Directional copy of tracked files.
pub mod sync;
pub mod utils;
/// Version control capability and its git implementation.
pub mod vcs;
pub mod workspace;
