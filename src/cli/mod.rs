//! CLI command implementations

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::fetcher::FetchConfig;
use crate::query::QueryExecutor;

pub mod emit;
pub mod error;
pub mod fetch;
pub mod reference;

pub use emit::{OutputFormat, OutputOptions};
pub use error::CliError;
pub use fetch::{FaoArgs, IndicatorArgs, SelectionArgs, UnhcrArgs};
pub use reference::CatalogArgs;

/// Statistical indicators for Sudan and neighboring countries
#[derive(Parser, Debug)]
#[command(name = "sudan-stats", version, about)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds (default: 90)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported providers
    Providers,

    /// List supported countries
    Countries,

    /// Check country codes against the supported list
    Validate {
        /// ISO2 or ISO3 codes
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// World Bank indicator observations
    Worldbank(IndicatorArgs),

    /// WHO Global Health Observatory observations
    Who(IndicatorArgs),

    /// FAOSTAT observations
    Fao(FaoArgs),

    /// UNHCR population statistics
    Unhcr(UnhcrArgs),

    /// ILOSTAT observations
    Ilo(IndicatorArgs),

    /// World Bank indicator catalog
    WbIndicators(CatalogArgs),

    /// WHO indicator catalog
    WhoIndicators(CatalogArgs),

    /// Search indicators across World Bank and WHO
    Search {
        /// Text to look for in indicator codes and names
        query: String,
    },
}

impl Cli {
    /// Output settings from the global flags
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            format: self.format,
            path: self.output.clone(),
        }
    }

    /// Transport settings from the global flags
    pub fn fetch_config(&self) -> FetchConfig {
        match self.timeout {
            Some(secs) => FetchConfig::default().with_request_timeout(Duration::from_secs(secs)),
            None => FetchConfig::default(),
        }
    }

    /// Run the selected command against `cache`
    ///
    /// The HTTP client is only built for commands that go to the network.
    pub async fn execute(&self, cache: Arc<ResponseCache>) -> Result<(), CliError> {
        let output = self.output_options();
        if !self.command.needs_network() {
            return self.execute_offline(&output);
        }

        let executor = QueryExecutor::with_config(&self.fetch_config(), cache)?;

        match &self.command {
            Commands::Worldbank(args) => fetch::worldbank(&executor, args, &output).await,
            Commands::Who(args) => fetch::who(&executor, args, &output).await,
            Commands::Fao(args) => fetch::fao(&executor, args, &output).await,
            Commands::Unhcr(args) => fetch::unhcr(&executor, args, &output).await,
            Commands::Ilo(args) => fetch::ilo(&executor, args, &output).await,
            Commands::WbIndicators(args) => reference::wb_indicators(&executor, args, &output).await,
            Commands::WhoIndicators(args) => {
                reference::who_indicators(&executor, args, &output).await
            }
            Commands::Search { query } => reference::search(&executor, query, &output).await,
            Commands::Providers | Commands::Countries | Commands::Validate { .. } => {
                self.execute_offline(&output)
            }
        }
    }

    // Registry-backed commands
    fn execute_offline(&self, output: &OutputOptions) -> Result<(), CliError> {
        match &self.command {
            Commands::Providers => reference::providers(output),
            Commands::Countries => reference::countries(output),
            Commands::Validate { codes } => reference::validate(codes),
            _ => Ok(()),
        }
    }
}

impl Commands {
    /// True for commands that query a provider over HTTP
    pub fn needs_network(&self) -> bool {
        !matches!(
            self,
            Commands::Providers | Commands::Countries | Commands::Validate { .. }
        )
    }
}
