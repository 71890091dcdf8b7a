//! The three dotsync commands, wired from the building blocks and printing
//! progress for the operator.

use crate::{
    config::{ConfigStore, Configuration, LINE_ENDING_KEY, LOCATION_KEY},
    coordinator::{CommitOutcome, Coordinator},
    error::Result,
    lineending::LineEnding,
    resolver::resolve,
    sync::{sync_to_local, sync_to_repo, FileReport},
    vcs::{PullOutcome, Vcs},
    workspace::Workspace,
};
use std::{io::Write, path::Path};

/// One `config` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    List,
    Location(String),
    LineEnding(LineEnding),
}

/// Result of a `repo` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRun {
    pub reports: Vec<FileReport>,
    /// Set only when pushing was requested.
    pub commit: Option<CommitOutcome>,
}

fn progress(message: &str) {
    print!("{message} ... ");
    // progress output is best effort
    let _ = std::io::stdout().flush();
}

/// Apply a config action; relative locations are resolved against `cwd`.
pub fn run_config(
    workspace: &Workspace,
    action: ConfigAction,
    cwd: &Path,
) -> Result<Configuration> {
    let store = ConfigStore::new(&workspace.config_file);
    let mut config = store.load()?;

    match action {
        ConfigAction::List => {
            print!("{config}");
            return Ok(config);
        }
        ConfigAction::Location(location) => config.set(LOCATION_KEY, &location, cwd)?,
        ConfigAction::LineEnding(ending) => config.set(LINE_ENDING_KEY, ending.as_str(), cwd)?,
    }

    store.save(&config)?;
    Ok(config)
}

/// Bring local dot files up to date with the repository.
///
/// With `pull`, the working copy is first updated from its remote; whatever
/// changed is reported and the sync goes on with the fresh content.
pub fn run_local<V: Vcs>(
    workspace: &Workspace,
    coordinator: &mut Coordinator<V>,
    file_name: Option<&str>,
    pull: bool,
) -> Result<Vec<FileReport>> {
    let config = ConfigStore::new(&workspace.config_file).load()?;
    let location = config.location()?;

    if pull {
        match coordinator.check_remote_before_pull()? {
            PullOutcome::UpToDate => println!(" - Repo is up to date"),
            PullOutcome::Updated { summary } => println!("{summary}"),
        }
    }

    let files = resolve(&workspace.repo_dir, &location, file_name)?;
    let reports = sync_to_local(&files)?;
    for report in &reports {
        println!(
            " - Updating local's '{}' with repository version ... {}",
            report.name, report.outcome
        );
    }

    Ok(reports)
}

/// Bring repository files up to date with the local dot files.
///
/// With `push`, the remote is checked first and the run aborts before any
/// repository write if it moved; afterwards the changes are committed and
/// pushed, skipping the push when there was nothing to commit.
pub fn run_repo<V: Vcs>(
    workspace: &Workspace,
    coordinator: &mut Coordinator<V>,
    file_name: Option<&str>,
    push: bool,
) -> Result<RepoRun> {
    let config = ConfigStore::new(&workspace.config_file).load()?;
    let location = config.location()?;
    let policy = config.line_ending()?;
    let files = resolve(&workspace.repo_dir, &location, file_name)?;

    if push {
        progress(" - Checking remote in case of changes");
        if let Err(e) = coordinator.check_remote_before_push() {
            println!();
            return Err(e);
        }
        println!("done");
    }

    let reports = sync_to_repo(&files, policy)?;
    for report in &reports {
        println!(
            " - Updating repo's '{}' from local version ... {}",
            report.name, report.outcome
        );
    }

    if !push {
        return Ok(RepoRun {
            reports,
            commit: None,
        });
    }

    progress(" - Committing changes");
    let commit = coordinator.commit_changes()?;
    match &commit {
        CommitOutcome::Committed { .. } => {
            println!("done");
            progress(" - Pushing to remote");
            coordinator.push_changes()?;
            println!("done");
        }
        CommitOutcome::NoChanges => println!("No changes to commit"),
    }

    Ok(RepoRun {
        reports,
        commit: Some(commit),
    })
}
