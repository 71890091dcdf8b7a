use crate::error::{Error, Result};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

/// Result of updating the repository working copy from its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// The working copy already matched the remote.
    UpToDate,
    /// New commits were brought in; `summary` is what the client reported.
    Updated { summary: String },
}

/// The version control operations dotsync needs from the repository working
/// copy.
///
/// Paths returned by [`Vcs::list_modified_tracked`] are relative to the
/// working copy root.
pub trait Vcs {
    fn pull(&mut self) -> Result<PullOutcome>;
    fn push(&mut self) -> Result<()>;
    fn list_modified_tracked(&mut self) -> Result<Vec<PathBuf>>;
    /// Stage every modified tracked file; untracked files are never added.
    fn stage_modified(&mut self) -> Result<()>;
    fn commit(&mut self, message: &str) -> Result<()>;
}

/// [`Vcs`] backed by the `git` command line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    work_tree: PathBuf,
}

impl GitCli {
    /// Open the git working copy at `work_tree`.
    pub fn open(work_tree: impl Into<PathBuf>) -> Result<Self> {
        let work_tree = work_tree.into();
        if !work_tree.is_dir() {
            return Err(Error::config(format!(
                "Repository location '{}' does not exist or is not a directory",
                work_tree.display()
            )));
        }

        let git = Self { work_tree };
        if git.is_work_tree_root() {
            Ok(git)
        } else {
            Err(Error::config(format!(
                "Repository location '{}' is not a git repository",
                git.work_tree.display()
            )))
        }
    }

    /// The directory must be the root of its own work tree, not a plain
    /// directory nested inside some other repository.
    fn is_work_tree_root(&self) -> bool {
        let Ok(toplevel) = self.run(["rev-parse", "--show-toplevel"]) else {
            return false;
        };

        match (
            Path::new(&toplevel).canonicalize(),
            self.work_tree.canonicalize(),
        ) {
            (Ok(toplevel), Ok(work_tree)) => toplevel == work_tree,
            _ => false,
        }
    }

    fn head(&self) -> Result<Option<String>> {
        // an unborn branch has no HEAD yet
        match self.run(["rev-parse", "--verify", "--quiet", "HEAD"]) {
            Ok(oid) => Ok(Some(oid)),
            Err(Error::VcsOperation { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Run git inside the working copy and return its trimmed stdout.
    fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let command = args
            .iter()
            .map(|arg| arg.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(work_tree = %self.work_tree.display(), %command, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.work_tree)
            .args(&args)
            .output()
            .map_err(|e| Error::VcsOperation {
                command: command.clone(),
                detail: format!("failed to spawn git: {e}"),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match (stderr.trim(), stdout.trim()) {
                ("", "") => format!("exited with {}", output.status),
                ("", stdout) => stdout.to_string(),
                (stderr, _) => stderr.to_string(),
            };
            return Err(Error::VcsOperation { command, detail });
        }

        Ok(stdout.trim_end().to_string())
    }
}

impl Vcs for GitCli {
    fn pull(&mut self) -> Result<PullOutcome> {
        let before = self.head()?;
        let summary = self.run(["pull"])?;
        let after = self.head()?;

        if before == after {
            Ok(PullOutcome::UpToDate)
        } else {
            Ok(PullOutcome::Updated { summary })
        }
    }

    fn push(&mut self) -> Result<()> {
        self.run(["push"]).map(drop)
    }

    fn list_modified_tracked(&mut self) -> Result<Vec<PathBuf>> {
        // -z keeps git from quoting names with special or non-ASCII bytes
        let listing = self.run(["ls-files", "-z", "--modified"])?;
        Ok(listing
            .split('\0')
            .filter(|name| !name.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn stage_modified(&mut self) -> Result<()> {
        self.run(["add", "--update"]).map(drop)
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.run(["commit", "--quiet", "-m", message]).map(drop)
    }
}
