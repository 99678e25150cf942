use crate::availability::AvailabilityService;
use crate::config::{Config, StorageBackend};
use crate::error::{other_error, ScheduleResult};
use crate::store::{AvailabilityStore, InMemoryStore, RedisStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Pick the store for the configured backend.
///
/// An unreachable Redis is an error; the in-memory store is only used when
/// configured explicitly.
pub async fn connect_store(config: &Config) -> ScheduleResult<Arc<dyn AvailabilityStore>> {
    if config.storage_backend == StorageBackend::Memory {
        info!("Using in-memory store");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    match connect_redis(&config.redis_url).await {
        Ok(store) => {
            info!("Connected to Redis successfully");
            Ok(Arc::new(store))
        }
        Err(e) => {
            error!("Failed to connect to Redis: {}", e);
            Err(e)
        }
    }
}

async fn connect_redis(redis_url: &str) -> ScheduleResult<RedisStore> {
    let store = RedisStore::new(redis_url)?;
    store.ping().await?;
    Ok(store)
}

/// Build the availability service from config
pub async fn build_service(config: &Config) -> miette::Result<AvailabilityService> {
    let tz = config.tz()?;
    let store = connect_store(config).await?;
    info!("Scheduling in timezone {}", tz);
    Ok(AvailabilityService::new(store, tz))
}
