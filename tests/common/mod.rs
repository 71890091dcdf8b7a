//! Shared fixtures: a dot file workspace on disk and an in-memory [`Vcs`].

#![allow(dead_code)]

use dotsync_rs::{
    config::{ConfigStore, Configuration},
    lineending::LineEnding,
    vcs::{PullOutcome, Vcs},
    workspace::Workspace,
    Error, Result,
};
use std::{
    collections::{BTreeMap, VecDeque},
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// In-memory stand-in for the git working copy.
///
/// Tracked content is snapshotted from the repository directory when the fake
/// is created and again on every commit, so "modified" means the file on disk
/// differs from the last snapshot.
#[derive(Debug)]
pub struct FakeVcs {
    work_tree: PathBuf,
    committed: BTreeMap<PathBuf, Vec<u8>>,
    staged: bool,
    /// Outcomes handed out by successive pulls; `UpToDate` once drained.
    pub pulls: VecDeque<PullOutcome>,
    /// Files written into the work tree by the next `Updated` pull.
    pub incoming: Vec<(String, Vec<u8>)>,
    pub pull_count: usize,
    pub commits: Vec<String>,
    pub push_count: usize,
    pub fail_push: bool,
}

impl FakeVcs {
    pub fn new(work_tree: &Path) -> Self {
        let mut fake = Self {
            work_tree: work_tree.to_path_buf(),
            committed: BTreeMap::new(),
            staged: false,
            pulls: VecDeque::new(),
            incoming: Vec::new(),
            pull_count: 0,
            commits: Vec::new(),
            push_count: 0,
            fail_push: false,
        };
        fake.snapshot();
        fake
    }

    fn snapshot(&mut self) {
        self.committed = fs::read_dir(&self.work_tree)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| {
                let relative = PathBuf::from(entry.file_name());
                (relative, fs::read(entry.path()).unwrap())
            })
            .collect();
    }
}

impl Vcs for FakeVcs {
    fn pull(&mut self) -> Result<PullOutcome> {
        self.pull_count += 1;
        let outcome = self.pulls.pop_front().unwrap_or(PullOutcome::UpToDate);
        if matches!(outcome, PullOutcome::Updated { .. }) {
            for (name, content) in self.incoming.drain(..) {
                fs::write(self.work_tree.join(&name), &content).unwrap();
                self.committed.insert(PathBuf::from(name), content);
            }
        }
        Ok(outcome)
    }

    fn push(&mut self) -> Result<()> {
        if self.fail_push {
            return Err(Error::VcsOperation {
                command: "push".into(),
                detail: "fatal: unable to access remote".into(),
            });
        }
        self.push_count += 1;
        Ok(())
    }

    fn list_modified_tracked(&mut self) -> Result<Vec<PathBuf>> {
        Ok(self
            .committed
            .iter()
            .filter(|(path, content)| {
                fs::read(self.work_tree.join(path))
                    .map(|current| &current != *content)
                    .unwrap_or(true)
            })
            .map(|(path, _)| path.clone())
            .collect())
    }

    fn stage_modified(&mut self) -> Result<()> {
        self.staged = true;
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        assert!(self.staged, "commit without staging");
        self.staged = false;
        self.commits.push(message.to_string());
        self.snapshot();
        Ok(())
    }
}

/// A temporary root holding the config file, the repository working copy and
/// the local dot file directory.
pub struct DotFixture {
    pub root: TempDir,
    pub workspace: Workspace,
    pub local: PathBuf,
}

impl DotFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::in_dir(root.path());
        let local = root.path().join("home");
        fs::create_dir(&workspace.repo_dir).unwrap();
        fs::create_dir(&local).unwrap();

        Self {
            root,
            workspace,
            local,
        }
    }

    /// Point the config at the local directory with the given policy.
    pub fn configure(&self, policy: LineEnding) {
        let mut config = Configuration::new();
        config.set_location(&self.local).unwrap();
        config.set_line_ending(policy);
        ConfigStore::new(&self.workspace.config_file)
            .save(&config)
            .unwrap();
    }

    pub fn write_repo(&self, name: &str, content: &[u8]) {
        fs::write(self.workspace.repo_dir.join(name), content).unwrap();
    }

    pub fn write_local(&self, name: &str, content: &[u8]) {
        fs::write(self.local.join(name), content).unwrap();
    }

    pub fn read_repo(&self, name: &str) -> Vec<u8> {
        fs::read(self.workspace.repo_dir.join(name)).unwrap()
    }

    pub fn read_local(&self, name: &str) -> Vec<u8> {
        fs::read(self.local.join(name)).unwrap()
    }

    pub fn vcs(&self) -> FakeVcs {
        FakeVcs::new(&self.workspace.repo_dir)
    }
}
