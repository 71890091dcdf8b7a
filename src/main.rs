use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use dotsync_rs::{
    args::{Args, SubCommandArgs},
    commands::{run_config, run_local, run_repo},
    coordinator::Coordinator,
    utils::FixPath,
    vcs::GitCli,
    workspace::{Workspace, DEFAULT_CONFIG_FILE, DEFAULT_REPO_DIR},
};
use std::{env, ffi::OsString, path::Path, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// Usage of the subcommand named on the command line, or of the whole tool.
fn usage_for(argv: &[OsString]) -> String {
    let mut cmd = Args::command();
    let subcommand = argv
        .iter()
        .skip(1)
        .filter_map(|arg| arg.to_str())
        .find(|arg| cmd.find_subcommand(arg).is_some())
        .map(str::to_owned);

    let usage = match subcommand {
        Some(name) => cmd
            .find_subcommand_mut(&name)
            .map(|sub| sub.render_usage().to_string()),
        None => None,
    };
    usage.unwrap_or_else(|| cmd.render_usage().to_string())
}

fn parse_args() -> Result<Args, ExitCode> {
    let argv: Vec<OsString> = env::args_os().collect();
    if argv.len() <= 1 {
        let _ = Args::command().print_help();
        return Err(ExitCode::from(1));
    }

    Args::try_parse_from(&argv).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            let rendered = err.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            eprintln!("{}", usage_for(&argv));
            eprintln!("!! ERROR {message}");
            ExitCode::from(2)
        }
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("DOTSYNC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn workspace(args: &Args, cwd: &Path) -> Result<Workspace> {
    let config_file = match &args.config_path {
        Some(path) => path.fix_path(cwd)?,
        None => cwd.join(DEFAULT_CONFIG_FILE),
    };
    let repo_dir = match &args.repo_path {
        Some(path) => path.fix_path(cwd)?,
        None => cwd.join(DEFAULT_REPO_DIR),
    };

    Ok(Workspace::new(config_file, repo_dir))
}

fn run(args: Args) -> Result<()> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let workspace = workspace(&args, &cwd)?;
    tracing::debug!(?workspace, "starting");

    match args.command {
        SubCommandArgs::Config(config) => {
            run_config(&workspace, config.action(), &cwd)?;
        }
        SubCommandArgs::Local { file_name, pull } => {
            let mut coordinator = Coordinator::new(GitCli::open(&workspace.repo_dir)?);
            run_local(&workspace, &mut coordinator, file_name.as_deref(), pull)?;
        }
        SubCommandArgs::Repo { file_name, push } => {
            let mut coordinator = Coordinator::new(GitCli::open(&workspace.repo_dir)?);
            run_repo(&workspace, &mut coordinator, file_name.as_deref(), push)?;
        }
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<dotsync_rs::Error>())
    {
        Some(typed) => eprintln!("!! {}: {typed}", typed.kind()),
        None => eprintln!("!! Error: {err:#}"),
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
