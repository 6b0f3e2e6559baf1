//! Operator entry point for the demo-data bootstrap routines.
//!
//! Usage: `seed [admin|events|members|all]` (defaults to `all`).

use chrono::Utc;
use tracing::Level;

use server::config::AppConfig;
use server::{database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let routine = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());

    let config = AppConfig::load()?;
    let db = database::init_db(&config.database.url).await?;

    let now = Utc::now();
    let mut rng = rand::rng();

    match routine.as_str() {
        "admin" => {
            seed::seed_admin_and_flagship(&db, now).await?;
        }
        "events" => {
            seed::seed_events(&db, now).await?;
        }
        "members" => {
            seed::seed_demo_members(&db, &mut rng, now).await?;
        }
        "all" => {
            seed::seed_admin_and_flagship(&db, now).await?;
            seed::seed_events(&db, now).await?;
            seed::seed_demo_members(&db, &mut rng, now).await?;
        }
        other => {
            anyhow::bail!("unknown routine '{other}' (expected admin, events, members, or all)")
        }
    }

    Ok(())
}
