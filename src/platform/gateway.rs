//! Retrying access to the Data API

use crate::error::PulseError;
use crate::platform::client::DataApiClient;
use crate::platform::retry::RetryExecutor;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// A [`DataApiClient`] paired with the [`RetryExecutor`] that guards it.
///
/// Every remote call made by the resolver and the fetcher goes through
/// [`ApiGateway::call`]; a transport failure rebuilds the shared client
/// before the next attempt.
#[derive(Clone)]
pub struct ApiGateway {
    api: Arc<DataApiClient>,
    retry: RetryExecutor,
}

impl ApiGateway {
    pub fn new(api: Arc<DataApiClient>, retry: RetryExecutor) -> Self {
        Self { api, retry }
    }

    pub fn api(&self) -> &DataApiClient {
        &self.api
    }

    pub fn retry(&self) -> &RetryExecutor {
        &self.retry
    }

    /// Run `func` under the retry policy
    pub async fn call<F, Fut, T>(&self, operation: &str, func: F) -> Result<T, PulseError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PulseError>>,
    {
        let api = self.api.as_ref();
        self.retry
            .execute_with_reconnect(operation, func, move || async move {
                if let Err(e) = api.rebuild().await {
                    warn!("Could not rebuild HTTP client: {}", e);
                }
            })
            .await
    }
}
