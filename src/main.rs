#![forbid(unsafe_code)]
#![deny(warnings, clippy::all, clippy::pedantic)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use git_timewarp::{
    DefaultGitRunner, FixedPrompter, GitRunner, Prompter, RewriteStrategy, StdinPrompter,
    StripOutcome, StripSelection, Warp, WarpOptions, WarpReport, check_hour, check_hour_range,
    commit_count,
    output::{ProgressObserver, TabStyle, format_tab, to_json},
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Tab,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about = "Rewrite the commit times of a git repository.")]
struct Cli {
    /// Print debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// git executable to invoke
    #[arg(long, global = true, default_value = "git")]
    git: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Give every commit a random time of day between two hours
    Randomize {
        /// Repository to rewrite
        repo: PathBuf,

        /// Earliest hour (0-23)
        #[arg(long, default_value_t = 0)]
        earliest: u32,

        /// Latest hour (0-23), inclusive
        #[arg(long, default_value_t = 23)]
        latest: u32,

        /// Seed for reproducible times
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Set every commit to the same hour, with minutes and seconds at zero
    Standardize {
        /// Repository to rewrite
        repo: PathBuf,

        /// Hour to use (0-23)
        #[arg(long, default_value_t = 0)]
        hour: u32,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Zero the selected time components of every commit
    Strip {
        /// Repository to rewrite
        repo: PathBuf,

        /// Zero the hour
        #[arg(long)]
        hours: bool,

        /// Zero the minute
        #[arg(long)]
        minutes: bool,

        /// Zero the second
        #[arg(long)]
        seconds: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Show the new times without rewriting anything
    #[arg(long)]
    dry_run: bool,

    /// Rewrite all commits in one history pass instead of one pass per commit
    #[arg(long)]
    single_pass: bool,

    /// Output format: text (default), tab or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Table style to use with --output tab
    #[arg(long, value_enum, default_value_t = TabStyle::Rounded)]
    tab_style: TabStyle,
}

impl CommonArgs {
    fn options(&self, repo: &Path) -> WarpOptions {
        WarpOptions {
            repo: repo.to_path_buf(),
            strategy: if self.single_pass {
                RewriteStrategy::SinglePass
            } else {
                RewriteStrategy::PerCommit
            },
            dry_run: self.dry_run,
        }
    }

    fn prompter(&self) -> Box<dyn Prompter> {
        if self.yes || self.dry_run {
            Box::new(FixedPrompter(true))
        } else {
            Box::new(StdinPrompter)
        }
    }

    fn observer(&self) -> ProgressObserver {
        ProgressObserver::new(self.output == OutputFormat::Text)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let git = DefaultGitRunner::new(&cli.git);
    match run(cli.command, &git) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(command: Command, git: &dyn GitRunner) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Randomize {
            repo,
            earliest,
            latest,
            seed,
            common,
        } => {
            let (earliest, latest) = check_hour_range(earliest, latest)?;
            let question = format!(
                "Randomize every commit in {} to a time between {earliest:02}:00:00 and {latest:02}:59:59?",
                repo.display()
            );
            if !common.prompter().confirm(&question)? {
                println!("Aborted.");
                return Ok(());
            }
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            let report = Warp::new(git, common.options(&repo)).randomize(
                &mut rng,
                earliest,
                latest,
                &mut common.observer(),
            )?;
            print_report(&report, &common)
        }
        Command::Standardize { repo, hour, common } => {
            let hour = check_hour(hour)?;
            let count = commit_count(git, &repo)?;
            let question = format!(
                "Set {count} commits in {} to {hour:02}:00:00?",
                repo.display()
            );
            if !common.prompter().confirm(&question)? {
                println!("Aborted.");
                return Ok(());
            }
            let report =
                Warp::new(git, common.options(&repo)).standardize(hour, &mut common.observer())?;
            print_report(&report, &common)
        }
        Command::Strip {
            repo,
            hours,
            minutes,
            seconds,
            common,
        } => {
            let selection = StripSelection {
                hours,
                minutes,
                seconds,
            };
            match Warp::new(git, common.options(&repo)).strip(selection, &mut common.observer())? {
                StripOutcome::NothingSelected => {
                    println!("Nothing selected to strip.");
                    Ok(())
                }
                StripOutcome::Warped(report) => print_report(&report, &common),
            }
        }
    }
}

fn print_report(report: &WarpReport, common: &CommonArgs) -> Result<(), Box<dyn Error>> {
    match common.output {
        OutputFormat::Text => {
            let verb = if report.dry_run { "Would warp" } else { "Warped" };
            println!(
                "{verb} {} commits in {}.",
                report.changes.len(),
                report.repo.display()
            );
        }
        OutputFormat::Tab => println!("{}", format_tab(report, common.tab_style)),
        OutputFormat::Json => println!("{}", to_json(report)?),
    }
    Ok(())
}
