use std::path::{Path, PathBuf};

/// Name of the persisted configuration file inside the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dotsync.ron";
/// Name of the repository working copy inside the working directory.
pub const DEFAULT_REPO_DIR: &str = "DotFiles";

/// The two locations every command works against: the persisted config file
/// and the repository working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub config_file: PathBuf,
    pub repo_dir: PathBuf,
}

impl Workspace {
    pub fn new(config_file: impl Into<PathBuf>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            repo_dir: repo_dir.into(),
        }
    }

    /// Workspace with the default file names below `root`.
    pub fn in_dir(root: &Path) -> Self {
        Self::new(root.join(DEFAULT_CONFIG_FILE), root.join(DEFAULT_REPO_DIR))
    }
}
