use crate::{
    error::{Error, Result},
    utils::canonical_dir,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Version control metadata entry that is never a sync target.
const VCS_METADATA: &str = ".git";

/// A dot file present by name in both the repository and the local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub name: String,
    pub local: PathBuf,
    pub repo: PathBuf,
}

/// Returns the regular files directly inside `dir`, keyed by file name.
///
/// Directories, symlinks and other special files are skipped, as is the
/// `.git` entry.
pub fn list_regular_files<P>(dir: P) -> Result<BTreeMap<String, PathBuf>>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory walk failed"));
            Error::io("list directory", dir, source)
        })?;

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping entry with a non UTF-8 name");
            continue;
        };
        if name == VCS_METADATA {
            continue;
        }
        if !entry.file_type().is_file() {
            debug!(path = %entry.path().display(), "skipping non-regular entry");
            continue;
        }

        files.insert(name.to_string(), entry.into_path());
    }

    Ok(files)
}

/// Match the files of `repo_dir` against `local_dir` by name.
///
/// The repository side decides which names are tracked; an optional
/// `file_name` narrows that set to one name. Every tracked name must also be
/// present as a regular file in `local_dir`.
pub fn resolve(
    repo_dir: &Path,
    local_dir: &Path,
    file_name: Option<&str>,
) -> Result<Vec<TrackedFile>> {
    let repo_dir = canonical_dir(repo_dir, "Repository location")?;
    let local_dir = canonical_dir(local_dir, "Local location")?;

    let mut repo_files = list_regular_files(&repo_dir)?;
    if repo_files.is_empty() {
        return Err(Error::config(format!(
            "no files found in the repository '{}' to sync",
            repo_dir.display()
        )));
    }

    if let Some(file_name) = file_name {
        let path = repo_files
            .remove(file_name)
            .ok_or_else(|| Error::NotFound(file_name.to_string()))?;
        repo_files = BTreeMap::from([(file_name.to_string(), path)]);
    }

    let wanted: BTreeSet<&str> = repo_files.keys().map(String::as_str).collect();
    let mut local_files = list_regular_files(&local_dir)?;
    local_files.retain(|name, _| wanted.contains(name.as_str()));

    let missing: Vec<String> = repo_files
        .keys()
        .filter(|name| !local_files.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Error::Consistency { missing });
    }

    let tracked: Vec<TrackedFile> = repo_files
        .into_iter()
        .filter_map(|(name, repo)| {
            let local = local_files.remove(&name)?;
            Some(TrackedFile { name, local, repo })
        })
        .collect();

    debug!(count = tracked.len(), "resolved tracked files");
    Ok(tracked)
}
