//! Mosaic CLI
//!
//! Command-line interface for running reconciliations and inspecting master
//! records without going through the HTTP server.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use anyhow::{Context, bail};
use application::{CompanyService, CompanyStorePort};
use clap::{Parser, Subcommand};
use domain::{Company, Domain};
use infrastructure::{
    AffinityCrmAdapter, AppConfig, DatabaseConfig, HarmonicSourcingAdapter, RemoteConfigLoader,
    SqliteCompanyStore, TelemetryConfig, create_pool, init_telemetry,
};
use tracing::debug;

/// Mosaic CLI
#[derive(Debug, Parser)]
#[command(name = "mosaic-cli")]
#[command(author, version, about = "Mosaic company reconciliation CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile a company across Harmonic and Affinity and print the result
    Details {
        /// Domain or URL of the company
        domain: String,
    },

    /// Print the current master record for a domain
    Lookup {
        /// Domain or URL of the company
        domain: String,
    },

    /// Print the normalized form of a domain or URL
    Normalize {
        input: String,
    },

    /// Download a JSON config document from Cloud Storage
    ///
    /// `CONFIG_BUCKET` and `CONFIG_OBJECT_NAME` take precedence over the flags.
    RemoteConfig {
        #[arg(long)]
        bucket: Option<String>,

        #[arg(long)]
        object: Option<String>,

        /// Object generation to fetch instead of the latest
        #[arg(long)]
        version: Option<i64>,

        /// OAuth access token for the storage API
        #[arg(long, env = "GCS_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Check server health
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(&TelemetryConfig {
        log_filter: log_filter_from_verbosity(cli.verbose).to_string(),
        ..TelemetryConfig::default()
    })?;

    match cli.command {
        Commands::Details { domain } => {
            let config = AppConfig::load().context("failed to load configuration")?;
            let details = reconcile(&config, &domain).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        },

        Commands::Lookup { domain } => {
            let config = AppConfig::load().context("failed to load configuration")?;
            match lookup(&config.database, &domain).await? {
                Some(company) => println!("{}", serde_json::to_string_pretty(&company)?),
                None => bail!("no current company for {domain}"),
            }
        },

        Commands::Normalize { input } => {
            println!("{}", Domain::parse(&input)?);
        },

        Commands::RemoteConfig {
            bucket,
            object,
            version,
            token,
        } => {
            let location =
                RemoteConfigLoader::resolve(bucket.as_deref(), object.as_deref(), version)?;
            let document = RemoteConfigLoader::new(token)?.fetch(&location).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        },

        Commands::Health { url } => {
            let resp = reqwest::Client::new()
                .get(endpoint_url(&url, "/health"))
                .send()
                .await
                .context("server unreachable")?;
            if !resp.status().is_success() {
                bail!("unhealthy: HTTP {}", resp.status());
            }
            println!("Healthy");
        },
    }

    Ok(())
}

async fn reconcile(
    config: &AppConfig,
    domain: &str,
) -> anyhow::Result<application::CompanyDetails> {
    let Some(pipeline) = config.crm.as_ref() else {
        bail!("CRM pipeline ids are not configured (MOSAIC__CRM__LP_LIST_ID, ...)");
    };

    let crm = AffinityCrmAdapter::new(&config.affinity.to_affinity_config())?;
    let sourcing = HarmonicSourcingAdapter::new(&config.harmonic.to_harmonic_config())?;
    let service = CompanyService::new(Arc::new(crm), Arc::new(sourcing));

    Ok(service
        .reconcile_with_timeout(domain, pipeline, config.reconciliation_timeout())
        .await?)
}

/// Master lookup straight against the store, no upstream credentials needed
async fn lookup(database: &DatabaseConfig, domain: &str) -> anyhow::Result<Option<Company>> {
    let domain = Domain::parse(domain)?;
    let pool = create_pool(database).context("failed to open database")?;
    let store = SqliteCompanyStore::new(Arc::new(pool));

    debug!(domain = %domain, "Looking up master record");
    Ok(store.find_current_by_primary_domain(&domain).await?)
}
