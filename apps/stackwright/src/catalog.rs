//! # Remote Catalog
//!
//! The palette is fetched once at startup from a JSON endpoint returning an
//! array of `{name, category, icon}` objects. Any failure falls back to the
//! built-in catalog.

use crate::remote::{RemoteError, check_status, http_client};
use stackwright_core::{Technology, fallback_catalog};
use std::time::Duration;

/// Timeout used when the config does not set one.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch the palette, or the built-in one when `url` is unset or the fetch
/// fails.
pub async fn fetch_catalog(url: Option<&str>, timeout: Duration) -> Vec<Technology> {
    let Some(url) = url else {
        return fallback_catalog();
    };
    match try_fetch_catalog(url, timeout).await {
        Ok(catalog) => {
            tracing::info!(url, count = catalog.len(), "Loaded remote catalog");
            catalog
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Remote catalog unavailable, using built-in catalog");
            fallback_catalog()
        }
    }
}

async fn try_fetch_catalog(url: &str, timeout: Duration) -> Result<Vec<Technology>, RemoteError> {
    let http = http_client(timeout)?;
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| RemoteError::ConnectionFailed(format!("{url}: {e}")))?;
    let catalog: Vec<Technology> = check_status(resp)
        .await?
        .json()
        .await
        .map_err(|e| RemoteError::ParseError(e.to_string()))?;
    if catalog.is_empty() {
        return Err(RemoteError::ParseError("catalog is empty".to_string()));
    }
    Ok(catalog)
}
