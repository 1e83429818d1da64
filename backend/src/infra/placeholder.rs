use crate::core::models::{Album, Photo};
use crate::core::source::{PhotoSource, SourceError};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

// ── Client ───────────────────────────────────────────────────────

/// JSONPlaceholder photo API.  Build it outside the async runtime:
/// reqwest::blocking::Client spawns its own Tokio runtime internally.
pub struct PlaceholderClient {
    client: Client,
    base_url: String,
}

impl PlaceholderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}/{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Api(format!("GET {url} returned {status}")));
        }

        resp.json().map_err(|e| SourceError::Parse(e.to_string()))
    }
}

impl PhotoSource for PlaceholderClient {
    fn name(&self) -> &str {
        "JSONPlaceholder"
    }

    fn fetch_photos(&self) -> Result<Vec<Photo>, SourceError> {
        self.get_json("photos")
    }

    fn fetch_albums(&self) -> Result<Vec<Album>, SourceError> {
        self.get_json("albums")
    }
}
