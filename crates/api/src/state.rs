use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tradeoff_db::store::{DecisionStore, StoreError, StoreResult};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record store, constructed once at startup.
    pub store: Arc<dyn DecisionStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Await a store call, bounded by the configured store timeout.
    ///
    /// ```ignore
    /// let project = state.call("find_project", state.store.find_project(id)).await?;
    /// ```
    pub async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        let limit = Duration::from_secs(self.config.store_timeout_secs);
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
