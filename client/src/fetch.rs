use serde::de::DeserializeOwned;
use serde_json::Value;

use wayfarer_shared::FetchError;
use wayfarer_shared::config::{CONFIG_URL, ViewerConfig};
use wayfarer_shared::geography::FeatureCollection;

/// GET a JSON document.
async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }

    resp.json::<T>()
        .await
        .map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Optional deployment overrides. Missing or broken config falls back to defaults.
pub async fn fetch_config() -> ViewerConfig {
    let config = fetch_json::<Value>(CONFIG_URL).await.and_then(|raw| {
        ViewerConfig::from_value(raw).map_err(|e| FetchError::Malformed(e.to_string()))
    });
    match config {
        Ok(config) => config,
        Err(e) => {
            tracing::info!(error = %e, url = CONFIG_URL, "using default configuration");
            ViewerConfig::default()
        }
    }
}

/// Default visit data used on first run.
pub async fn fetch_bootstrap(url: &str) -> Result<Value, FetchError> {
    fetch_json::<Value>(url).await
}

/// World geography: place ids, names and outlines.
pub async fn fetch_geography(url: &str) -> Result<FeatureCollection, FetchError> {
    fetch_json::<FeatureCollection>(url).await
}
