//! Remote mixin catalog.
//!
//! The catalog lists installable mixins by name together with the repository
//! URL and the subdirectory holding the mixin. A reference given by the user
//! is either an absolute URL, used as is, or a catalog name.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};

/// Catalog published by the monitoring-mixins project.
pub const DEFAULT_CATALOG_URL: &str = "https://monitoring.mixins.dev/mixins.json";

/// One installable mixin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub subdir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CatalogEntry {
    /// Repository URL joined with the mixin subdirectory.
    pub fn source_url(&self) -> RegistryResult<String> {
        let mut url = Url::parse(&self.url).map_err(|e| RegistryError::InvalidUrl {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        let path = join_path(url.path(), &self.subdir);
        url.set_path(&path);
        Ok(url.to_string())
    }
}

/// Catalogs are published either as a bare array or wrapped in `{"mixins": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<CatalogEntry>),
    Wrapped { mixins: Vec<CatalogEntry> },
}

/// Decoded catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(bytes: &[u8]) -> RegistryResult<Self> {
        let document: CatalogDocument =
            serde_json::from_slice(bytes).map_err(RegistryError::CatalogDecode)?;
        let entries = match document {
            CatalogDocument::List(entries) => entries,
            CatalogDocument::Wrapped { mixins } => mixins,
        };
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Resolve a user reference to the URL of the mixin source.
    pub fn resolve(&self, reference: &str) -> RegistryResult<String> {
        if is_absolute_url(reference) {
            debug!("Using {} as mixin URL", reference);
            return Ok(reference.to_string());
        }

        let entry = self
            .find(reference)
            .ok_or_else(|| RegistryError::NotFound(reference.to_string()))?;
        let url = entry.source_url()?;
        debug!("Resolved mixin {} to {}", reference, url);
        Ok(url)
    }
}

/// HTTP client for the catalog endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    url: String,
    client: reqwest::Client,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

impl CatalogClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and decode the catalog.
    pub async fn fetch(&self) -> RegistryResult<Catalog> {
        info!("Fetching mixin catalog from {}", self.url);
        let fetch_error = |source| RegistryError::CatalogFetch {
            url: self.url.clone(),
            source,
        };

        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(fetch_error)?
            .bytes()
            .await
            .map_err(fetch_error)?;

        let catalog = Catalog::from_json(&body)?;
        debug!("Catalog lists {} mixin(s)", catalog.entries().len());
        Ok(catalog)
    }

    /// Fetch the catalog and resolve `reference` against it.
    pub async fn resolve(&self, reference: &str) -> RegistryResult<String> {
        self.fetch().await?.resolve(reference)
    }
}

fn is_absolute_url(reference: &str) -> bool {
    Url::parse(reference).is_ok()
}

/// Join URL path segments, collapsing duplicate separators.
fn join_path(base: &str, subdir: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(subdir.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    format!("/{}", segments.join("/"))
}
