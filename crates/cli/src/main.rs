//! `library` binary entry point.

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, CliError, Config, OutputOptions};
use library_store::PostgresLibraryStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration, .env first
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // 2. Initialize tracing on stderr so stdout stays clean for output
    let (text_layer, json_layer) = if config.log_json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(text_layer)
        .with(json_layer)
        .init();

    // 3. Parse arguments; clap exits on usage errors
    let cli = Cli::parse();

    match run(&config, &cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(config: &Config, cli: &Cli) -> Result<(), CliError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .map_err(CliError::Connection)?;
    tracing::info!("connected to database");

    let store = PostgresLibraryStore::new(pool);
    let result = serve(&store, config, cli).await;

    store.close().await;
    tracing::info!("database connection closed");
    result
}

async fn serve(store: &PostgresLibraryStore, config: &Config, cli: &Cli) -> Result<(), CliError> {
    store.run_migrations().await?;
    cli::populate_if_empty(store, config.seed_count).await?;

    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    cli::execute(
        store,
        cli.action(),
        OutputOptions::from(cli),
        &mut stdout.lock(),
        &mut stdin.lock(),
    )
    .await
}
