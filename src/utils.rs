use crate::error::{Error, Result};
use ron::{extensions::Extensions, ser::PrettyConfig};
use std::path::{Path, PathBuf};

/// A trait for fixing user supplied paths before they are used.
///
/// A leading `~` is replaced with the home directory of the current user and
/// relative paths are anchored at `base`.
///
/// # Examples
///
/// ```rust
/// use dotsync_rs::utils::FixPath;
/// use std::path::Path;
///
/// let path = "nested/dots".fix_path(Path::new("/work")).unwrap();
/// assert_eq!(path, Path::new("/work/nested/dots"));
///
/// let path = "/etc/dots".fix_path(Path::new("/work")).unwrap();
/// assert_eq!(path, Path::new("/etc/dots"));
/// ```
pub trait FixPath {
    /// Expand `~` and make the path absolute relative to `base`.
    fn fix_path(&self, base: &Path) -> Result<PathBuf>;
}

impl FixPath for Path {
    fn fix_path(&self, base: &Path) -> Result<PathBuf> {
        let expanded = match self.strip_prefix("~") {
            Ok(rest) => home::home_dir()
                .ok_or_else(|| Error::config("failed to get the home directory"))?
                .join(rest),
            Err(_) => self.to_path_buf(),
        };

        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(base.join(expanded))
        }
    }
}

impl FixPath for str {
    fn fix_path(&self, base: &Path) -> Result<PathBuf> {
        Path::new(self).fix_path(base)
    }
}

impl FixPath for PathBuf {
    fn fix_path(&self, base: &Path) -> Result<PathBuf> {
        self.as_path().fix_path(base)
    }
}

/// Resolve `path` into the canonical absolute directory it names.
///
/// Fails with a configuration error when the path does not exist or is not a
/// directory.
pub fn canonical_dir(path: &Path, what: &str) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::config(format!(
            "{what} '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(Error::config(format!(
            "{what} '{}' is not a directory",
            path.display()
        )));
    }

    path.canonicalize()
        .map_err(|source| Error::io("resolve", path, source))
}

/// Get a pretty printer configuration for the persisted RON config.
pub fn get_ron_formatter() -> PrettyConfig {
    PrettyConfig::new()
        .depth_limit(2)
        .extensions(Extensions::IMPLICIT_SOME)
}
