//! FinOps Guardian CLI
//!
//! A command-line tool for spotting cost spikes, hunting zombie
//! instances and reviewing right-sizing advice from a Guardian server.

mod client;
mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{billing, hygiene, report};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const MAX_GENERATED_DAYS: i64 = 3650;

/// FinOps Guardian CLI
#[derive(Parser)]
#[command(name = "fg")]
#[command(author, version, about = "CLI for FinOps Guardian", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via FG_API_URL env var)
    #[arg(long, env = "FG_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect cost spikes in simulated billing data
    Analyze {
        /// Number of days to simulate (10-60)
        #[arg(long, short)]
        days: Option<u32>,

        /// Cost injected on the last day
        #[arg(long, short)]
        spike: Option<f64>,
    },

    /// Find running instances that are idle and untagged
    Zombies,

    /// Show right-sizing recommendations
    Rightsize,

    /// Ask the AI for a root cause of the latest spike
    Explain {
        /// Number of days to simulate (10-60)
        #[arg(long, short)]
        days: Option<u32>,

        /// Cost injected on the last day
        #[arg(long, short)]
        spike: Option<f64>,
    },

    /// Simulate stopping every zombie instance
    Remediate {
        /// Start a fresh remediation session
        #[arg(long)]
        reset: bool,
    },

    /// Run the full analysis and print a dashboard report
    Report {
        /// Number of days to simulate (10-60)
        #[arg(long, short)]
        days: Option<u32>,

        /// Cost injected on the last day
        #[arg(long, short)]
        spike: Option<f64>,
    },

    /// Write mock billing data to a CSV file
    Generate {
        /// Number of days to generate (1-3650)
        #[arg(
            long,
            short,
            default_value = "20",
            value_parser = clap::value_parser!(u32).range(1..=MAX_GENERATED_DAYS)
        )]
        days: u32,

        /// Cost injected on the last day
        #[arg(long, short, default_value = "500")]
        spike: f64,

        /// Output file path
        #[arg(long, short, default_value = "cloud_bills.csv")]
        output: PathBuf,
    },
}

/// Flag or env var first, then the saved config, then localhost
fn resolve_api_url(flag: Option<String>, config: &config::Config) -> String {
    flag.or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Local generation never talks to the server
    if let Commands::Generate { days, spike, output } = &cli.command {
        return report::generate(*days, *spike, output);
    }

    let saved = config::Config::load()?;
    let api_url = resolve_api_url(cli.api_url, &saved);
    if cli.verbose {
        output::print_info(&format!("Using API at {}", api_url));
    }

    // Initialize client
    let client = client::ApiClient::new(&api_url)?;

    // Execute command
    match cli.command {
        Commands::Analyze { days, spike } => {
            billing::analyze(&client, days, spike, cli.format).await?;
        }
        Commands::Zombies => {
            hygiene::zombies(&client, cli.format).await?;
        }
        Commands::Rightsize => {
            hygiene::rightsize(&client, cli.format).await?;
        }
        Commands::Explain { days, spike } => {
            billing::explain(&client, days, spike, cli.format).await?;
        }
        Commands::Remediate { reset } => {
            hygiene::remediate(&client, reset, cli.format).await?;
        }
        Commands::Report { days, spike } => {
            report::report(&client, days, spike, cli.format).await?;
        }
        Commands::Generate { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_url_precedence() {
        let saved = config::Config {
            api_url: Some("http://saved:8080".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_api_url(Some("http://flag:9000".to_string()), &saved),
            "http://flag:9000"
        );
        assert_eq!(resolve_api_url(None, &saved), "http://saved:8080");
        assert_eq!(
            resolve_api_url(None, &config::Config::default()),
            DEFAULT_API_URL
        );
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::parse_from(["fg", "analyze", "--days", "20", "--spike", "750"]);
        match cli.command {
            Commands::Analyze { days, spike } => {
                assert_eq!(days, Some(20));
                assert_eq!(spike, Some(750.0));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::parse_from(["fg", "generate"]);
        match cli.command {
            Commands::Generate { days, spike, output } => {
                assert_eq!(days, 20);
                assert_eq!(spike, 500.0);
                assert_eq!(output, PathBuf::from("cloud_bills.csv"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_days_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["fg", "generate", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["fg", "generate", "--days", "200000000"]).is_err());
        assert!(Cli::try_parse_from(["fg", "generate", "--days", "3650"]).is_ok());
    }
}
