use crate::crm::CustomerSource;
use crate::error::{AppError, AppResult};
use crate::model::Customer;
use futures_util::stream::BoxStream;
use futures_util::{stream, TryStreamExt};
use std::time::Duration;
use tracing::debug;

/// HTTP client for the customer service list endpoint.
///
/// The underlying `reqwest::Client` is pooled and shared across concurrent
/// pipelines; cloning it is cheap.
pub struct CustomerHttpClient {
    client: reqwest::Client,
    url: String,
}

impl CustomerHttpClient {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(client, url)
    }

    /// Reuse an already-built client (shared with the proxy route).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn fetch(client: reqwest::Client, url: String) -> AppResult<Vec<Customer>> {
        debug!(url = %url, "fetching customer list");

        let response = client.get(&url).send().await.map_err(AppError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "customer service returned {}",
                status
            )));
        }

        let customers = response
            .json::<Vec<Customer>>()
            .await
            .map_err(|e| AppError::upstream(format!("invalid customer payload: {}", e)))?;
        Ok(customers)
    }
}

impl CustomerSource for CustomerHttpClient {
    fn customers(&self) -> BoxStream<'static, AppResult<Customer>> {
        let client = self.client.clone();
        let url = self.url.clone();

        // The list call is deferred until the stream is first polled; the
        // decoded records then drain in backend order.
        Box::pin(
            stream::once(Self::fetch(client, url))
                .map_ok(|customers| stream::iter(customers.into_iter().map(Ok)))
                .try_flatten(),
        )
    }
}
