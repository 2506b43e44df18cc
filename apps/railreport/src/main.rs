use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use railreport_api::TestRailClient;
use railreport_config::{Credentials, DEFAULT_CONFIG_PATH, load_config};
use railreport_ingest_cucumber::CucumberIngestor;
use railreport_ports::{Ingestor, replay};
use railreport_reporter::{Project, TestRailReporter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const BRANCH_ENV: &str = "BRANCH_NAME";
const LOG_ENV: &str = "RAILREPORT_LOG";

#[derive(Parser, Debug)]
#[command(name = "railreport", version)]
#[command(about = "Push BDD scenario results to TestRail test runs.", long_about = None)]
struct Cli {
    /// Path to the TestRail configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report a Cucumber JSON results file to TestRail.
    Report {
        /// Cucumber JSON report written by the test runner.
        #[arg(long)]
        results: PathBuf,
        /// Branch under test (or set BRANCH_NAME).
        #[arg(long)]
        branch: Option<String>,
        /// Version string attached to every result.
        #[arg(long)]
        result_version: Option<String>,
        /// Don't list case ids whose result could not be recorded.
        #[arg(long)]
        hide_failed_cases: bool,
    },

    /// Validate the configuration and show the run each project would use.
    CheckConfig {
        /// Branch to render run names for (or set BRANCH_NAME).
        #[arg(long)]
        branch: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Report {
            results,
            branch,
            result_version,
            hide_failed_cases,
        } => {
            let branch = branch
                .or_else(|| std::env::var(BRANCH_ENV).ok())
                .filter(|b| !b.trim().is_empty());
            let Some(branch) = branch else {
                bail!("no branch name given; pass --branch or set {BRANCH_ENV}");
            };

            let config = load_config(&cli.config)?;
            let credentials = Credentials::from_env()?;
            let client = TestRailClient::from_config(&config, credentials)
                .context("set up TestRail client")?;

            let mut reporter = TestRailReporter::new(branch, &config, client)?
                .with_show_failed_cases(!hide_failed_cases);
            if let Some(version) = result_version {
                reporter = reporter.with_version(version);
            }

            let features = CucumberIngestor::new(results).ingest()?;
            tracing::info!(features = features.len(), branch = reporter.branch(), "reporting");
            let report = replay(&mut reporter, &features)?;
            println!("{report}");
        }

        Command::CheckConfig { branch } => {
            let branch = branch.or_else(|| std::env::var(BRANCH_ENV).ok());
            let config = load_config(&cli.config)?;

            println!("{}: {}", cli.config.display(), config.base_url);
            for project_config in &config.projects {
                let project = Project::new(project_config.clone())?;
                match &branch {
                    Some(branch) => {
                        let verdict = if project.allows_branch(branch) {
                            "allowed"
                        } else {
                            "not allowed"
                        };
                        println!(
                            "- project {} suite {}: run {:?} ({verdict})",
                            project.id(),
                            project.suite_id(),
                            project.test_run_name(branch)
                        );
                    }
                    None => println!(
                        "- project {} suite {}: run {:?} on branches matching {:?}",
                        project.id(),
                        project.suite_id(),
                        project_config.name,
                        project_config.allowed_branch_pattern
                    ),
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
