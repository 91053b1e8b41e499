//! Pushing generated rules to a rule-management endpoint.

use mix_mixer::DestinationMap;
use reqwest::{StatusCode, Url};
use tracing::info;

use crate::error::{RegistryError, RegistryResult};

/// Default address of the rule-management server.
pub const DEFAULT_BIND_ADDRESS: &str = "http://127.0.0.1:8080";

/// Path, relative to the base address, accepting rule uploads.
pub const RULES_API_PATH: &str = "api/v1/rules";

/// Client uploading rules and alerts artifacts.
#[derive(Debug, Clone)]
pub struct PushClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl PushClient {
    /// Create a client for the server at `base_address`.
    pub fn new(base_address: &str) -> RegistryResult<Self> {
        let mut endpoint = Url::parse(base_address).map_err(|e| RegistryError::InvalidUrl {
            url: base_address.to_string(),
            message: e.to_string(),
        })?;
        let path = format!("{}/{}", endpoint.path().trim_end_matches('/'), RULES_API_PATH);
        endpoint.set_path(&path);

        Ok(Self {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload one artifact. Anything but `200 OK` is an error carrying the body.
    pub async fn push(&self, content: &[u8]) -> RegistryResult<()> {
        let resp = self
            .client
            .put(self.endpoint.clone())
            .body(content.to_vec())
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await?;
            return Err(RegistryError::Push {
                status: status.as_u16(),
                body,
            });
        }

        info!("PUT rules to {} OK", self.endpoint);
        Ok(())
    }

    /// Upload every artifact of a rules/alerts map, stopping at the first failure.
    pub async fn push_all(&self, rules_alerts: &DestinationMap) -> RegistryResult<()> {
        for (destination, content) in rules_alerts.iter() {
            info!("Pushing {}", destination);
            self.push(content.as_bytes()).await?;
        }
        Ok(())
    }
}
