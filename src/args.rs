use crate::{commands::ConfigAction, lineending::LineEnding};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dotsync")]
#[command(author = "Garrett Hansen")]
#[command(version, about, long_about = None)]
#[command(override_usage = "dotsync [--version] [--help] <command> [<args>]")]
pub struct Args {
    /// The path of the config file (default: current_dir/dotsync.ron)
    #[arg(long = "cpath", global = true, value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// The repository working copy (default: current_dir/DotFiles)
    #[arg(long = "rpath", global = true, value_name = "PATH")]
    pub repo_path: Option<PathBuf>,

    /// Print debug logging to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: SubCommandArgs,
}

#[derive(Subcommand, Debug)]
pub enum SubCommandArgs {
    /// Update local dot files to match the corresponding files in the repository
    #[command(override_usage = "dotsync local [--fileName FILENAME] [--pull]")]
    Local {
        /// Only synchronize the dot file of the specified name
        #[arg(long = "fileName", value_name = "FILENAME")]
        file_name: Option<String>,

        /// Pull changes from the remote before synchronizing
        #[arg(long)]
        pull: bool,
    },

    /// Update repository files to match the corresponding local dot files
    #[command(override_usage = "dotsync repo [--fileName FILENAME] [--push]")]
    Repo {
        /// Only synchronize the dot file of the specified name
        #[arg(long = "fileName", value_name = "FILENAME")]
        file_name: Option<String>,

        /// Commit and push changes to the remote after synchronizing
        #[arg(long)]
        push: bool,
    },

    /// Set or display the configuration of dotsync
    #[command(
        override_usage = "dotsync config [--list] [--location PATH] [--lineEnding ENDING]"
    )]
    Config(ConfigArgs),
}

#[derive(ClapArgs, Debug)]
#[group(required = true, multiple = false)]
pub struct ConfigArgs {
    /// Display the current configuration
    #[arg(long)]
    pub list: bool,

    /// Set the local dot file directory path to synchronize
    #[arg(long, value_name = "PATH")]
    pub location: Option<String>,

    /// Set the line ending repository files are normalized with
    #[arg(long = "lineEnding", value_name = "ENDING", value_enum)]
    pub line_ending: Option<LineEnding>,
}

impl ConfigArgs {
    pub fn action(self) -> ConfigAction {
        match (self.location, self.line_ending) {
            (Some(location), _) => ConfigAction::Location(location),
            (None, Some(ending)) => ConfigAction::LineEnding(ending),
            (None, None) => ConfigAction::List,
        }
    }
}
