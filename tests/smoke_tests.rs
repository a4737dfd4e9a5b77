use raidcal::components::raid_helper::RaidHelperHandle;
use raidcal::config::Config;
use raidcal::error::Error;
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Config {
    Config {
        access_token: "test_token".to_string(),
        server_ids: vec!["111".to_string(), "222".to_string()],
        timezone: "Europe/Prague".to_string(),
        api_base_url: "https://raid-helper.dev/api/events/".to_string(),
        api_timeout_secs: 10,
    }
}

/// Smoke test to verify that the config can be constructed and validated
#[tokio::test]
async fn test_config_loads() {
    let config = test_config();

    assert_eq!(config.server_ids.len(), 2);
    assert_eq!(config.timezone, "Europe/Prague");
    assert!(config.ensure_ready().is_ok());
}

/// An empty server-id list is a fatal configuration error
#[tokio::test]
async fn test_empty_server_list_is_rejected() {
    let config = Config {
        server_ids: Vec::new(),
        ..test_config()
    };

    let err = config.ensure_ready().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

/// An empty access token is a fatal configuration error
#[tokio::test]
async fn test_empty_access_token_is_rejected() {
    let config = Config {
        access_token: "   ".to_string(),
        ..test_config()
    };

    let err = config.ensure_ready().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

/// A blank entry in the server list is a fatal configuration error
#[tokio::test]
async fn test_blank_server_id_is_rejected() {
    let config = Config {
        server_ids: vec!["111".to_string(), "".to_string()],
        ..test_config()
    };

    assert!(config.ensure_ready().is_err());
}

/// Configuration problems surface from the actor before any network call
#[tokio::test]
async fn test_fetch_with_empty_config_fails_fast() {
    let config = Arc::new(RwLock::new(Config {
        server_ids: Vec::new(),
        ..test_config()
    }));

    let handle = RaidHelperHandle::new(Arc::clone(&config));
    let err = handle.fetch_schedule().await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    handle.shutdown().await.unwrap();
}

/// Test shared config access through Arc and RwLock
#[tokio::test]
async fn test_config_shared_access() {
    let config = Arc::new(RwLock::new(test_config()));

    let token = {
        let config_guard = config.read().await;
        config_guard.access_token.clone()
    };

    assert_eq!(token, "test_token");
}

/// Test for component initialization order using real ComponentManager and mock components
#[tokio::test]
async fn test_component_initialization_order() {
    use async_trait::async_trait;
    use raidcal::components::{Component, ComponentManager};
    use raidcal::error::AppResult;
    use std::sync::{Arc, Mutex};

    // We'll create a global initialization counter to track the order
    static INIT_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    // Create an initialization recorder to store component init order
    let order_recorder = Arc::new(Mutex::new(Vec::<(String, usize)>::new()));

    struct MockClientComponent {
        order_recorder: Arc<Mutex<Vec<(String, usize)>>>,
    }

    struct MockScheduleComponent {
        order_recorder: Arc<Mutex<Vec<(String, usize)>>>,
    }

    #[async_trait]
    impl Component for MockClientComponent {
        fn name(&self) -> &'static str {
            "client"
        }

        async fn init(&self, _config: Arc<RwLock<Config>>) -> AppResult<()> {
            let order = INIT_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.order_recorder
                .lock()
                .unwrap()
                .push((self.name().to_string(), order));
            Ok(())
        }

        async fn shutdown(&self) -> AppResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[async_trait]
    impl Component for MockScheduleComponent {
        fn name(&self) -> &'static str {
            "schedule"
        }

        async fn init(&self, _config: Arc<RwLock<Config>>) -> AppResult<()> {
            let order = INIT_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.order_recorder
                .lock()
                .unwrap()
                .push((self.name().to_string(), order));
            Ok(())
        }

        async fn shutdown(&self) -> AppResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let config = Arc::new(RwLock::new(test_config()));
    let mut manager = ComponentManager::new(Arc::clone(&config));

    manager.register(MockClientComponent {
        order_recorder: Arc::clone(&order_recorder),
    });
    manager.register(MockScheduleComponent {
        order_recorder: Arc::clone(&order_recorder),
    });

    manager.init_all(Arc::clone(&config)).await.unwrap();

    let recorded = order_recorder.lock().unwrap().clone();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].0, "client");
    assert_eq!(recorded[1].0, "schedule");
    assert!(recorded[0].1 < recorded[1].1);

    manager.shutdown_all().await.unwrap();
}
