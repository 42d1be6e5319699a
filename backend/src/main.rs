//! Ownerbot entry-point: loads settings, wires the directory store, seeds it
//! and serves the chat webhook.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ownerbot::config::OwnerbotSettings;
use ownerbot::domain::OwnerBot;
use ownerbot::domain::ports::DirectoryStore;
use ownerbot::inbound::http::health::HealthState;
use ownerbot::inbound::http::state::HttpState;
use ownerbot::outbound::kv::{InMemoryDirectoryStore, RedisDirectoryStore, RedisStoreConfig};
use ownerbot::seeding::seed_store;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = OwnerbotSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let store = build_store(&settings).await?;
    let token = settings.token();
    let outcome = seed_store(
        store.as_ref(),
        settings.seed_file(),
        token.as_deref().map(String::as_str),
    )
    .await
    .map_err(std::io::Error::other)?;
    info!(
        services_seeded = ?outcome.services_seeded,
        token_seeded = outcome.token_seeded,
        "store ready"
    );

    let health_state = web::Data::new(HealthState::new(Arc::clone(&store)));
    let mut bot = OwnerBot::new(store);
    if let Some(token) = token {
        bot = bot.with_token(token);
    }

    let config = ServerConfig::new(bind_addr);
    info!(bind_addr = %config.bind_addr(), "starting server");
    let server = create_server(health_state, HttpState::new(Arc::new(bot)), config)?;
    server.await
}

async fn build_store(settings: &OwnerbotSettings) -> std::io::Result<Arc<dyn DirectoryStore>> {
    match settings.redis_url() {
        Some(url) => {
            let store = RedisDirectoryStore::connect(RedisStoreConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            info!("using redis directory store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("OWNERBOT_REDIS_URL not set; directory is kept in memory only");
            Ok(Arc::new(InMemoryDirectoryStore::new()))
        }
    }
}
