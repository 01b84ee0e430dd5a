/*!

This is the command line interface for running the `happa` smoke checks against a cluster.

!*/

mod checks;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use smoke_checks::{KubeCluster, Report, Selection, Settings, Suite};
use std::path::PathBuf;

/// Check that a cluster is reachable and that `happa` is ready.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to the kubeconfig file. Also can be passed with the KUBECONFIG environment variable.
    #[clap(long = "kubeconfig")]
    kubeconfig: Option<PathBuf>,
    /// Output the report in JSON format.
    #[clap(long = "json")]
    json: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Run every check.
    Run(checks::Checks),
    /// Check that the cluster API lists at least one node.
    Api,
    /// Check that the deployments under test have ready replicas.
    Pods(checks::Checks),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    match run(args).await {
        Ok(report) if report.passed() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<Report> {
    // `api` has no tunables, so it never reads the `HAPPA_SMOKE_*` settings.
    let (settings, selection) = match &args.command {
        Command::Run(checks) => (checks_settings(checks)?, Selection::All),
        Command::Api => (Settings::default(), Selection::ApiWorking),
        Command::Pods(checks) => (checks_settings(checks)?, Selection::PodsAvailable),
    };

    let cluster = match &args.kubeconfig {
        Some(path) => KubeCluster::from_kubeconfig_path(path)
            .await
            .context(format!("Unable to create client from path '{:?}'", path))?,
        None => KubeCluster::try_default()
            .await
            .context("Unable to create default client")?,
    };

    let report = Suite::from(&settings).run(&cluster, selection).await;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Could not create string from report.")?
        );
    } else {
        println!("{}", report);
    }
    Ok(report)
}

/// Settings from the environment with the command line flags applied on top.
fn checks_settings(checks: &checks::Checks) -> Result<Settings> {
    let mut settings = Settings::from_env().context("Unable to read settings")?;
    checks.apply(&mut settings);
    Ok(settings)
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate and the checks.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("smoke_checks"), level)
                .init();
        }
    }
}
