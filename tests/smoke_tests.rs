use std::sync::Arc;
use tutor_schedule::availability::AvailabilityService;
use tutor_schedule::config::{Config, StorageBackend};
use tutor_schedule::store::InMemoryStore;

/// Smoke test to verify that the default config resolves a timezone
#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.timezone, "Asia/Tehran");
    assert_eq!(config.port, 3000);
    assert_eq!(config.storage_backend, StorageBackend::Redis);
    assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Tehran);
}

/// Smoke test for building a service over an empty store
#[tokio::test]
async fn test_service_over_empty_store() {
    let store = Arc::new(InMemoryStore::new());
    store.add_teacher("t1").await;
    let service = AvailabilityService::new(store, chrono_tz::UTC);

    assert!(service.recurring_slots("t1").await.unwrap().is_empty());
    assert_eq!(service.timezone(), chrono_tz::UTC);
}
