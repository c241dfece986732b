//! HTTP client for table actions

use serde::de::DeserializeOwned;
use shared::TableId;
use shared::response::{StartResponse, StopResponse};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the start/stop table actions
#[derive(Debug, Clone)]
pub struct ActionClient {
    client: reqwest::Client,
    base_url: String,
}

impl ActionClient {
    /// Create a new action client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issue a start action for a table
    pub async fn start_table(
        &self,
        table_id: TableId,
        customer_name: &str,
    ) -> ClientResult<StartResponse> {
        let url = format!("{}/table/{}/start", self.base_url, table_id);
        let response = self
            .client
            .post(&url)
            .form(&[("customer_name", customer_name)])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Issue a stop action for a table
    pub async fn stop_table(&self, table_id: TableId) -> ClientResult<StopResponse> {
        let url = format!("{}/table/{}/stop", self.base_url, table_id);
        let response = self.client.post(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Rejected(format!("HTTP {}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
