use crate::{
    error::{Error, Result},
    lineending::{normalize, LineEnding},
    resolver::TrackedFile,
};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Which side of a [`TrackedFile`] receives the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    /// Repository content is copied verbatim into the local directory.
    ToLocal,
    /// Local content is normalized and copied into the repository.
    ToRepo,
}

impl SyncDirection {
    fn endpoints<'a>(&self, file: &'a TrackedFile) -> (&'a Path, &'a Path) {
        match self {
            SyncDirection::ToLocal => (&file.repo, &file.local),
            SyncDirection::ToRepo => (&file.local, &file.repo),
        }
    }
}

/// What happened to one destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Unchanged,
    Overwritten,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Unchanged => write!(f, "no changes"),
            SyncOutcome::Overwritten => write!(f, "overwritten"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub destination: PathBuf,
    pub outcome: SyncOutcome,
}

#[derive(Debug)]
struct PlannedFile {
    name: String,
    destination: PathBuf,
    /// New destination content, `None` when it already matches.
    content: Option<Vec<u8>>,
}

/// Every decision of a directional sync, computed before anything is written.
#[derive(Debug)]
pub struct SyncPlan {
    files: Vec<PlannedFile>,
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::io("read", path, source))
}

impl SyncPlan {
    /// Read both sides of every file and decide which destinations change.
    ///
    /// `policy` is only applied when writing into the repository. Any read
    /// failure aborts here, before a single destination is touched.
    pub fn new(
        files: &[TrackedFile],
        direction: SyncDirection,
        policy: LineEnding,
    ) -> Result<Self> {
        let policy = match direction {
            SyncDirection::ToLocal => LineEnding::None,
            SyncDirection::ToRepo => policy,
        };

        let mut planned = Vec::with_capacity(files.len());
        for file in files {
            let (source, destination) = direction.endpoints(file);

            let source_bytes = read_bytes(source)?;
            let wanted = normalize(&source_bytes, policy);
            let current = read_bytes(destination)?;

            let content = (*wanted != *current).then(|| wanted.into_owned());
            debug!(
                name = %file.name,
                ?direction,
                changed = content.is_some(),
                "planned file"
            );

            planned.push(PlannedFile {
                name: file.name.clone(),
                destination: destination.to_path_buf(),
                content,
            });
        }

        Ok(Self { files: planned })
    }

    /// Write every changed destination, in name order.
    ///
    /// A write failure stops the loop; files written before it keep their new
    /// content.
    pub fn apply(self) -> Result<Vec<FileReport>> {
        let mut reports = Vec::with_capacity(self.files.len());

        for file in self.files {
            let outcome = match file.content {
                Some(content) => {
                    fs::write(&file.destination, content)
                        .map_err(|source| Error::io("write", &file.destination, source))?;
                    SyncOutcome::Overwritten
                }
                None => SyncOutcome::Unchanged,
            };

            reports.push(FileReport {
                name: file.name,
                destination: file.destination,
                outcome,
            });
        }

        Ok(reports)
    }
}

/// Overwrite local files with the repository versions.
pub fn sync_to_local(files: &[TrackedFile]) -> Result<Vec<FileReport>> {
    SyncPlan::new(files, SyncDirection::ToLocal, LineEnding::None)?.apply()
}

/// Overwrite repository files with the normalized local versions.
pub fn sync_to_repo(files: &[TrackedFile], policy: LineEnding) -> Result<Vec<FileReport>> {
    SyncPlan::new(files, SyncDirection::ToRepo, policy)?.apply()
}
