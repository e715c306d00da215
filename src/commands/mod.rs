//! Command-line front end.

mod progress;

pub use progress::{Progress, TrackedTransport};

use crate::config::Config;
use crate::engine::{Engine, PageContext};
use crate::facts::IssueRef;
use crate::reports::{generate_console, generate_json};
use crate::transport::GitHubClient;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use core::time::Duration;
use log::LevelFilter;
use std::env;
use std::ffi::OsString;
use std::io::{IsTerminal, Write, stderr, stdout};
use std::path::PathBuf;
use std::sync::Arc;

/// Log target for the command line
const LOG_TARGET: &str = "cli";

const SPINNER_DELAY: Duration = Duration::from_millis(400);

/// Where the command writes, and how it ends the process.
pub trait Host {
    fn output(&mut self) -> impl Write;
    fn error(&mut self) -> impl Write;
    fn exit(&mut self, code: i32);
}

/// Contribution signals for a GitHub issue: who is working on it, how hard it looks, and how
/// alive it is.
#[derive(Debug, Parser)]
#[command(name = "issue-signals", version, about)]
pub struct Args {
    /// Issue to evaluate, as `owner/repo#123` or an issue URL
    pub issue: IssueRef,

    /// GitHub token; requests are unauthenticated when absent
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file [default: ./issue-signals.toml if present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the evaluation as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse `args`, evaluate the issue, and print the report.
///
/// Exits through `host` with code 2 for usage errors and 1 for any other failure.
pub async fn run<H, I, T>(host: &mut H, args: I)
where
    H: Host,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let code = e.exit_code();
            if e.use_stderr() {
                let _ = write!(host.error(), "{}", e.render());
            } else {
                let _ = write!(host.output(), "{}", e.render());
            }
            host.exit(code);
            return;
        }
    };

    init_logging(args.verbose);

    if let Err(e) = evaluate(host, args).await {
        let _ = writeln!(host.error(), "error: {e:#}");
        host.exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Ignored when a logger is already installed, as happens across tests.
    let _ = env_logger::Builder::new().filter_level(level).parse_default_env().try_init();
}

async fn evaluate<H: Host>(host: &mut H, args: Args) -> Result<()> {
    let search_dir = env::current_dir().context("determining the current directory")?;
    let config = Config::load(&search_dir, args.config.as_deref())?;

    let client = GitHubClient::new(args.token, config.user_agent.clone()).context("creating the GitHub client")?;
    if !client.is_authenticated() {
        log::info!(target: LOG_TARGET, "no GitHub token given, using unauthenticated requests");
    }

    let progress = Progress::new(SPINNER_DELAY, stderr().is_terminal());
    let transport = Arc::new(TrackedTransport::new(client, progress.clone()));
    let engine = Engine::from_config(transport, &config)?;

    let evaluation = engine.evaluate(&args.issue, &PageContext::default()).await;
    progress.finish_and_clear();

    let (completed, _) = progress.counts();
    log::info!(target: LOG_TARGET, "{completed} GitHub requests made");

    let mut out = host.output();
    if args.json {
        generate_json(&evaluation, &mut out)?;
    } else {
        let use_colors = !args.no_color && stdout().is_terminal();
        generate_console(&evaluation, &mut out, use_colors)?;
    }

    Ok(())
}
