/// Resource fetching
///
/// A `Fetcher` retrieves album resources by their album-relative URI.
/// It holds no navigation state: every call is independent and completes
/// exactly once, with either the body or a `FetchError`. Whether a failure
/// is fatal is decided by the caller (see `PhotoRequest::fatal`).
///
/// Back ends:
/// - `dir.rs` - an album tree on the local filesystem
/// - `http.rs` - an album tree served over HTTP(S)

pub mod dir;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::nav::{Completion, Request};

pub use dir::DirFetcher;
pub use http::HttpFetcher;

/// Why a resource could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server (or directory) answered, but not with success
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid resource URI `{0}`")]
    BadUri(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid JSON: {0}")]
    Json(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the raw body of a resource
    async fn fetch_bytes(&self, uri: &str) -> Result<Vec<u8>, FetchError>;

    /// Retrieve and parse a JSON resource
    async fn fetch_json(&self, uri: &str) -> Result<Value, FetchError> {
        let body = self.fetch_bytes(uri).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Json(e.to_string()))
    }
}

/// Pick a back end for an album source: http(s) URLs go over the network,
/// anything else is a directory.
pub fn for_source(source: &str) -> Result<Arc<dyn Fetcher>, FetchError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Arc::new(HttpFetcher::new(source)?))
    } else {
        Ok(Arc::new(DirFetcher::new(source)))
    }
}

/// Run one request from the navigation controller and wrap the outcome
/// as the completion to feed back into it.
pub async fn resolve(fetcher: Arc<dyn Fetcher>, request: Request) -> Completion {
    match request {
        Request::Album(request) => {
            debug!("Fetching album descriptor {}", request.uri);
            let result = fetcher.fetch_json(&request.uri).await;
            Completion::Album { request, result }
        }
        Request::Photo(request) => {
            debug!("Fetching photo descriptor {} (fatal: {})", request.uri, request.fatal);
            let result = fetcher.fetch_json(&request.uri).await;
            Completion::Photo { request, result }
        }
        Request::Preload(uri) => {
            let result = fetcher.fetch_bytes(&uri).await;
            Completion::Preload { uri, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Static(&'static [u8]);

    #[async_trait]
    impl Fetcher for Static {
        async fn fetch_bytes(&self, _uri: &str) -> Result<Vec<u8>, FetchError> {
            Ok(self.0.to_vec())
        }
    }

    #[tokio::test]
    async fn test_fetch_json_parses_body() {
        let value = Static(br#"{"title": "Trip"}"#).fetch_json("trip.json").await.unwrap();
        assert_eq!(value["title"], "Trip");
    }

    #[tokio::test]
    async fn test_fetch_json_reports_parse_failure() {
        let result = Static(b"{not json").fetch_json("trip.json").await;
        assert!(matches!(result, Err(FetchError::Json(_))));
    }

    #[test]
    fn test_for_source_rejects_bad_url() {
        assert!(for_source("https://exa mple.com/").is_err());
        assert!(for_source("./albums").is_ok());
    }
}
