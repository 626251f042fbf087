#![forbid(unsafe_code)]

//! banner-tools — Banner API command-line client.
//!
//! CLI entry point: parses arguments, loads the API context, dispatches
//! subcommands, renders output.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use banner_tools::client::BannerClient;
use banner_tools::config::ApiContext;
use banner_tools::model::{Resolution, RosterQuery, TermSelector};
use banner_tools::resolver::{parse_banner_ids, resolve_all};

/// A Banner CLI tool to get data from the Banner API.
///
/// Requires BANNER_TOOLS_API_KEY and BANNER_TOOLS_API_URL in the environment.
#[derive(Parser, Debug)]
#[command(name = "banner-tools", version, about, long_about = None)]
struct Cli {
    /// Show per-request progress.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show everything including raw response bodies.
    #[arg(long, global = true)]
    trace: bool,

    /// Output as JSON for machine consumption.
    #[arg(long, global = true)]
    json: bool,

    /// Per-request timeout in seconds. Unset means wait indefinitely.
    #[arg(
        long,
        global = true,
        env = "BANNER_TOOLS_TIMEOUT",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Fetch Duck IDs for any number of Banner IDs.
    #[command(name = "duckid")]
    DuckId {
        /// Comma-separated Banner IDs, e.g. `951000001,951000002`.
        #[arg(value_name = "BANNER_IDS")]
        banner_ids: String,
    },

    /// Get the roster for a class registration number and term code.
    Roster {
        /// Academic term code.
        term_code: String,
        /// Course registration number.
        crn: String,
    },

    /// Show the current or next term.
    Term {
        /// Get the next term.
        #[arg(long)]
        next: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: clap_complete::Shell,
    },
}

/// Initialize the tracing subscriber based on CLI flags.
///
/// Priority: `--trace` > `--verbose` > `RUST_LOG` env var > default (warn).
fn init_tracing(cli: &Cli) {
    let filter = if cli.trace {
        EnvFilter::new("banner_tools=trace")
    } else if cli.verbose {
        EnvFilter::new("banner_tools=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(&cli);

    if let Command::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "banner-tools", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let ctx = match ApiContext::from_env() {
        Ok(ctx) => ctx.with_timeout(cli.timeout.map(Duration::from_secs)),
        Err(err) => {
            println!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, ctx: ApiContext) -> anyhow::Result<()> {
    match &cli.command {
        Command::DuckId { banner_ids } => duck_ids(ctx, banner_ids, cli.json).await,
        Command::Roster { term_code, crn } => {
            roster(&RosterQuery::new(term_code, crn), cli.json)
        }
        Command::Term { next } => term(TermSelector::from_next_flag(*next), cli.json),
        Command::Completions { .. } => Ok(()),
    }
}

async fn duck_ids(ctx: ApiContext, input: &str, json: bool) -> anyhow::Result<()> {
    let banner_ids = parse_banner_ids(input);
    if json {
        print_json_line(&serde_json::json!({ "banner_ids": &banner_ids }))?;
    } else {
        println!("Banner IDs: [{}]", banner_ids.join(" "));
    }

    let client = BannerClient::new(ctx)?;
    debug!(context = ?client.context(), "api context loaded");

    resolve_all(Arc::new(client), banner_ids, |resolution| {
        if json {
            // Emitting must not fail the batch; a closed stdout drops lines.
            let _ = print_json_line(&resolution.to_json());
        } else {
            print_resolution(&resolution);
        }
    })
    .await;
    Ok(())
}

fn print_resolution(resolution: &Resolution) {
    match &resolution.outcome {
        Ok(duck_id) => println!("{duck_id}"),
        Err(err) => println!(
            "{} {}: {}",
            "failed to get duckid from bannerid".red(),
            resolution.banner_id,
            err.render_chain()
        ),
    }
}

fn roster(query: &RosterQuery, json: bool) -> anyhow::Result<()> {
    if json {
        print_json_line(&serde_json::to_value(query)?)
    } else {
        println!("Roster - Term Code: {}, CRN: {}", query.term_code, query.crn);
        Ok(())
    }
}

fn term(selector: TermSelector, json: bool) -> anyhow::Result<()> {
    if json {
        print_json_line(&serde_json::json!({ "term": selector }))
    } else {
        println!("Term: {}", selector.as_str());
        Ok(())
    }
}

fn print_json_line(value: &serde_json::Value) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
