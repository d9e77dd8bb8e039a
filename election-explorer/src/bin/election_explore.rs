//! Election explorer CLI
//!
//! Explore every delivery order of a simulated leader election and report what
//! was found.
//!
//! # Example
//!
//! ```bash
//! # Five leaders, two volunteers, default bounds
//! election-explore
//!
//! # Three eager leaders, shallow search, report written as JSON
//! election-explore -l 3 --eager --depth-limit 30 --report-json report.json
//!
//! # Parameters from a file, with the depth limit overridden
//! election-explore --config explore.toml --depth-limit 60
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use election_explorer::report::summary_table;
use election_explorer::{explore_election, ExploreError, ExplorerParams};
use election_sim::{ElectionParams, VotingRule};

/// Election explorer
///
/// Delivers the messages of a simulated election in every possible order and
/// counts safe majorities, loops, failures and safety violations. Exits with a
/// non-zero status if a safety violation was found.
#[derive(Parser, Debug)]
#[command(name = "election-explore")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with explorer parameters. Flags override its values
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of leaders
    #[arg(short = 'l', long)]
    leaders: Option<usize>,

    /// Number of volunteers
    #[arg(short = 'v', long)]
    volunteers: Option<usize>,

    /// Vote for the best volunteer seen so far instead of waiting for all of them
    #[arg(long)]
    eager: bool,

    /// Maximum number of messages delivered along one path
    #[arg(short = 'd', long)]
    depth_limit: Option<usize>,

    /// Depth at which limit hits are classified as loops or failures
    #[arg(long, conflicts_with = "no_loop_horizon")]
    loop_horizon: Option<usize>,

    /// Never classify limit hits
    #[arg(long)]
    no_loop_horizon: bool,

    /// Solution and violation paths kept for the report
    #[arg(long)]
    max_recorded_paths: Option<usize>,

    /// Message applications between progress lines, 0 to disable
    #[arg(long)]
    progress_interval: Option<u64>,

    /// Write the full report as JSON to this file
    #[arg(long)]
    report_json: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Explore(#[from] ExploreError),
}

impl Args {
    fn params(&self) -> Result<ExplorerParams, CliError> {
        let mut params = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
                ExplorerParams::from_toml_str(&raw)?
            }
            None => ExplorerParams::default(),
        };

        let election = params.election();
        let voting_rule = if self.eager {
            VotingRule::Eager
        } else {
            election.voting_rule()
        };
        let election = ElectionParams::new(
            self.leaders.unwrap_or(election.leader_count()),
            self.volunteers.unwrap_or(election.volunteer_count()),
        )
        .with_voting_rule(voting_rule);
        params = params.with_election(election);

        if let Some(depth_limit) = self.depth_limit {
            params = params.with_depth_limit(depth_limit);
        }
        if self.no_loop_horizon {
            params = params.with_loop_horizon(None);
        } else if let Some(loop_horizon) = self.loop_horizon {
            params = params.with_loop_horizon(Some(loop_horizon));
        }
        if let Some(max_recorded_paths) = self.max_recorded_paths {
            params = params.with_max_recorded_paths(max_recorded_paths);
        }
        if let Some(progress_interval) = self.progress_interval {
            params = params.with_progress_interval(progress_interval);
        }
        Ok(params)
    }
}

fn run(args: &Args) -> Result<bool, CliError> {
    let params = args.params()?;
    info!(
        leaders = params.election().leader_count(),
        volunteers = params.election().volunteer_count(),
        voting_rule = ?params.election().voting_rule(),
        depth_limit = params.depth_limit(),
        loop_horizon = ?params.loop_horizon(),
        "Starting exploration"
    );

    let report = explore_election(&params)?;

    println!("\n=== Exploration Complete ===");
    println!("Distinct states: {}", report.distinct_states);
    print!("{}", summary_table(&report.summary));
    for recorded in &report.violations {
        println!("\n=== Safety violation @ depth {} ===", recorded.depth);
        for directed in &recorded.path {
            println!("{}", directed);
        }
    }

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "report written");
    }

    Ok(report.summary.violations == 0)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,election_explorer=info,election_explore=info")),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("{}", err);
            ExitCode::from(2)
        }
    }
}
