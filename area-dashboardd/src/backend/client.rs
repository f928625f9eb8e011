use async_trait::async_trait;
use shared::types::AreaRecord;
use crate::backend::AreaSource;
use crate::error::{DashboardError, Result};

/// Reads the area list from the backend's `GET /areas` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAreaSource {
    client: reqwest::Client,
    url: String,
}

impl HttpAreaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AreaSource for HttpAreaSource {
    async fn fetch_areas(&self) -> Result<Vec<AreaRecord>> {
        let network = |source| DashboardError::Network {
            url: self.url.clone(),
            source,
        };

        let response = self.client.get(&self.url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(network)?;

        serde_json::from_slice(&body).map_err(|source| DashboardError::Malformed {
            url: self.url.clone(),
            source,
        })
    }
}
