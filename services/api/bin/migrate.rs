//! Applies the embedded database migrations and exits.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wisby_core::database::{Database, DatabaseKind};

#[derive(Parser, Debug)]
#[command(version, about = "Run Wisby database migrations")]
struct MigrateArgs {
    /// Connection string; defaults to DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    /// `neon` or `postgres`; defaults to DB_TYPE, then `neon`
    #[arg(long)]
    db_type: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    let args = MigrateArgs::parse();
    let database_url = match args.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
    };
    let kind = match args.db_type.or_else(|| std::env::var("DB_TYPE").ok()) {
        Some(value) => value.parse::<DatabaseKind>()?,
        None => DatabaseKind::default(),
    };

    let db = Database::connect(&database_url, kind).context("Failed to build database handle")?;
    info!(database = %kind, "Running migrations...");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed.");
    Ok(())
}
