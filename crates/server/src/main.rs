mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use config::Config;
use database::{
    db::create_connection,
    notify::{LogNotifier, Mailer},
    services::allocation::SlotAllocator,
};
use log::info;
use migration::{Migrator, MigratorTrait};
use state::AppState;
use std::{error::Error, sync::Arc};
use utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::from_env()?;
    let db = create_connection(&config.database_url, config.max_connections).await?;
    Migrator::up(&db, None).await?;

    if config.admin_token.is_none() {
        info!("ADMIN_TOKEN is not set, admin endpoints are disabled");
    }

    let mailer = Mailer::spawn(Arc::new(LogNotifier));
    let allocator = SlotAllocator::new(db, mailer, config.table_policy);
    let app = routes::router(AppState::new(allocator, config.admin_token));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(
        "Running axum on http://{} (table policy: {})",
        config.bind_addr, config.table_policy
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
