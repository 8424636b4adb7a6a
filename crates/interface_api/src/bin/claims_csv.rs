//! Claim Process - CSV import tool
//!
//! Imports a CSV file of dental claims into the configured storage and prints
//! the top providers by net fee.
//!
//! ```bash
//! claims-csv claims.csv --limit 5
//! DATABASE_URL=postgres://localhost/claims claims-csv claims.csv --skip-invalid
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use domain_claims::csv_import::read_csv_submission;
use domain_claims::{BatchMode, ClaimError, ClaimProcessor, ClaimRepository, ProviderLimit};
use infra_db::{create_pool, run_migrations, DatabaseConfig, InMemoryClaimRepository, PostgresClaimRepository};
use interface_api::config::{ApiConfig, StorageBackend};
use interface_api::telemetry::init_tracing;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Storage {
    Postgres,
    Memory,
}

/// Import dental claims from CSV and rank providers.
#[derive(Parser, Debug)]
#[command(name = "claims-csv", version, about)]
struct Cli {
    /// CSV file with a header row
    file: PathBuf,

    /// Number of top providers to print (1-10)
    #[arg(long, short = 'n', default_value_t = 10)]
    limit: usize,

    /// Store valid rows and report invalid ones instead of rejecting the file
    #[arg(long)]
    skip_invalid: bool,

    /// Override the configured storage backend
    #[arg(long, value_enum)]
    storage: Option<Storage>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ApiConfig::from_env().context("failed to load configuration")?;
    if let Some(storage) = cli.storage {
        config.storage = match storage {
            Storage::Postgres => StorageBackend::Postgres,
            Storage::Memory => StorageBackend::Memory,
        };
    }
    if let Some(url) = cli.database_url.clone() {
        config.database_url = url;
    }

    init_tracing(&config.log_level, config.log_format);

    let limit = ProviderLimit::new(cli.limit)?;
    let repository = open_repository(&config).await?;
    let processor = ClaimProcessor::new(repository);

    let file = File::open(&cli.file)
        .with_context(|| format!("failed to open {}", cli.file.display()))?;
    let records = read_csv_submission(BufReader::new(file))?;

    let mode = if cli.skip_invalid { BatchMode::Skip } else { BatchMode::Reject };
    let outcome = match processor.process(records, mode).await {
        Ok(outcome) => outcome,
        Err(ClaimError::Validation(rejections)) => {
            for rejection in &rejections {
                for error in &rejection.errors {
                    eprintln!("{}: {}", rejection.record, error);
                }
            }
            bail!("{} row(s) failed validation; nothing was imported", rejections.len());
        }
        Err(e) => return Err(e.into()),
    };

    for rejection in &outcome.rejected {
        for error in &rejection.errors {
            eprintln!("skipped {}: {}", rejection.record, error);
        }
    }
    println!("Imported {} claim(s) from {}", outcome.accepted.len(), cli.file.display());

    let totals = processor.top_providers(limit).await?;
    println!();
    println!("{:<4} {:<12} {:>14}", "#", "Provider NPI", "Net fee");
    for (rank, total) in totals.iter().enumerate() {
        println!("{:<4} {:<12} {:>14}", rank + 1, total.provider_npi, total.total_net_fee.to_string());
    }

    Ok(())
}

async fn open_repository(config: &ApiConfig) -> anyhow::Result<Arc<dyn ClaimRepository>> {
    match config.storage {
        StorageBackend::Memory => Ok(Arc::new(InMemoryClaimRepository::new())),
        StorageBackend::Postgres => {
            let pool = create_pool(DatabaseConfig::new(&config.database_url).max_connections(2).min_connections(1))
                .await
                .context("failed to connect to database")?;
            run_migrations(&pool).await.context("failed to migrate database")?;
            Ok(Arc::new(PostgresClaimRepository::new(pool)))
        }
    }
}
