use clap::Parser;
use sea_orm::Database;

use warden_api::config::AppConfig;
use warden_api::seeder::{SeedContext, run_all, seeders};
use warden_api::state::AppState;
use warden_core::tracing::init_tracing;

/// Populate roles, permissions and the optional admin account.
#[derive(Parser)]
#[command(name = "seed")]
struct Cli {
    /// Run only the seeder with this name.
    #[arg(long)]
    only: Option<String>,
    /// Print the seeders in execution order and exit.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.list {
        for seeder in seeders() {
            println!("{}\t{}", seeder.priority(), seeder.name());
        }
        return Ok(());
    }

    let config = AppConfig::from_env();
    let db = Database::connect(&config.database_url).await?;
    let state = AppState::new(db, config);

    run_all(&SeedContext::from_state(&state), cli.only.as_deref()).await
}
