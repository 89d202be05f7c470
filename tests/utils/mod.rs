pub mod mocks;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::MockSessionClient;

use watchsync::{CoordinatorConfig, LocalActionBus, SessionCoordinator};

/// A coordinator wired to a recording mock client, ready for one test.
#[allow(dead_code)]
pub struct TestSession {
    pub client: Arc<MockSessionClient>,
    pub bus: LocalActionBus,
    pub coordinator: Arc<SessionCoordinator>,
}

#[allow(dead_code)]
impl TestSession {
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    pub fn with_timeout(network_timeout: Duration) -> Self {
        Self::with_config(CoordinatorConfig { network_timeout })
    }

    fn with_config(config: CoordinatorConfig) -> Self {
        let client = Arc::new(MockSessionClient::new());
        let bus = LocalActionBus::default();
        let coordinator = SessionCoordinator::with_config(client.clone(), bus.clone(), config);
        Self {
            client,
            bus,
            coordinator,
        }
    }

    /// Join "abc" and drop the calls recorded on the way in
    pub async fn join(&self) {
        self.coordinator.join_room("abc").await.unwrap();
        self.client.clear_calls().await;
    }
}

/// Poll `condition` until it holds or the deadline passes.
#[allow(dead_code)]
pub async fn wait_for<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if condition().await {
            return;
        }
        assert!(Instant::now() < deadline, "condition not met within 2s");
        sleep(Duration::from_millis(10)).await;
    }
}
