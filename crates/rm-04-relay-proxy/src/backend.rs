//! HTTP adapter for the [`BackendForwarder`] port.

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::ProxyError;
use crate::ports::outbound::BackendForwarder;

/// Forwards relay payloads to a proxied backend over HTTP POST.
pub struct HttpBackend {
    client: Client,
    url: String,
}

impl HttpBackend {
    /// A forwarder targeting `url`.
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    /// The backend URL this forwarder targets.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BackendForwarder for HttpBackend {
    async fn forward(&self, payload: &[u8]) -> Result<Vec<u8>, ProxyError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|err| ProxyError::Backend(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Backend(format!(
                "backend returned status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ProxyError::Backend(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}
