use crate::{
    error::{Error, Result},
    vcs::{PullOutcome, Vcs},
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Prefix of every commit created by dotsync.
pub const COMMIT_PREFIX: &str = "[dotsync] Updating dot files: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { message: String, files: Vec<String> },
    NoChanges,
}

/// Owns the remote safety policy around a [`Vcs`] client.
#[derive(Debug)]
pub struct Coordinator<V> {
    vcs: V,
}

impl<V: Vcs> Coordinator<V> {
    pub fn new(vcs: V) -> Self {
        Self { vcs }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn into_inner(self) -> V {
        self.vcs
    }

    /// Pull before overwriting repository files.
    ///
    /// If the pull changed anything the repository files may hold upstream
    /// edits, so the caller must stop before writing and let the operator
    /// re-run.
    pub fn check_remote_before_push(&mut self) -> Result<()> {
        match self.vcs.pull()? {
            PullOutcome::UpToDate => Ok(()),
            PullOutcome::Updated { summary } => {
                info!("remote changed, refusing to overwrite repository files");
                Err(Error::RemoteDiverged { summary })
            }
        }
    }

    /// Pull before refreshing local files. Never aborts.
    pub fn check_remote_before_pull(&mut self) -> Result<PullOutcome> {
        self.vcs.pull()
    }

    /// Commit the modified tracked files, or report that there is nothing to
    /// commit. Untracked files are never added.
    pub fn commit_changes(&mut self) -> Result<CommitOutcome> {
        let modified = self.vcs.list_modified_tracked()?;

        let files: Vec<String> = modified
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if files.is_empty() {
            debug!("no modified tracked files");
            return Ok(CommitOutcome::NoChanges);
        }

        let message = commit_message(&files);
        self.vcs.stage_modified()?;
        self.vcs.commit(&message)?;
        debug!(%message, "committed");

        Ok(CommitOutcome::Committed { message, files })
    }

    pub fn push_changes(&mut self) -> Result<()> {
        self.vcs.push()
    }
}

fn commit_message(files: &[String]) -> String {
    let names = files
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{COMMIT_PREFIX}{names}")
}
