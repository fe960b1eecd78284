//! Shared HTTP plumbing for the backend API.
//!
//! The backend URL comes from the settings service on every call, so a
//! URL change takes effect without rebuilding the gateways.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use aptaview_core::error::{AptaError, Result};
use aptaview_infrastructure::SettingsService;

/// One backend connection: a reqwest client plus the settings that
/// name its base URL.
pub struct Backend {
    client: Client,
    settings: Arc<SettingsService>,
}

impl Backend {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Builds an absolute URL under the backend's `/api` root.
    pub async fn api_url(&self, path: &str) -> Result<String> {
        let base = self.settings.backend_url().await?;
        Ok(format!("{}/api/{}", base.trim_end_matches('/'), path))
    }

    /// Maps a non-2xx response to an API error carrying the body text.
    pub async fn succeed(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AptaError::api(status.as_u16(), message));
        }
        Ok(response)
    }

    /// Decodes a JSON body after the status check.
    pub async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let url = response.url().clone();
        self.succeed(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AptaError::http(format!("cannot parse response from {url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn api_url_joins_without_double_slashes() {
        let dir = TempDir::new().unwrap();
        let settings = Arc::new(SettingsService::new(dir.path().join("settings.toml")));
        settings.set_backend_url("http://lab:9000/").await.unwrap();

        let backend = Backend::new(settings);
        assert_eq!(
            backend.api_url("experiments").await.unwrap(),
            "http://lab:9000/api/experiments"
        );
    }

    #[tokio::test]
    async fn api_url_tracks_settings_changes() {
        let dir = TempDir::new().unwrap();
        let settings = Arc::new(SettingsService::new(dir.path().join("settings.toml")));
        let backend = Backend::new(settings.clone());

        assert_eq!(
            backend.api_url("predictions/mfe").await.unwrap(),
            "http://localhost:8080/api/predictions/mfe"
        );

        settings.set_backend_url("http://lab:9000").await.unwrap();
        assert_eq!(
            backend.api_url("predictions/mfe").await.unwrap(),
            "http://lab:9000/api/predictions/mfe"
        );
    }
}
