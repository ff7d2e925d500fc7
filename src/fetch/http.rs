/// HTTP back end
///
/// Resolves album-relative URIs against a base URL and GETs them.
/// Non-2xx answers become `FetchError::Status`; no timeout is imposed.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{FetchError, Fetcher};

pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base` (a trailing `/` is implied)
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let mut base =
            Url::parse(base).map_err(|e| FetchError::BadUri(format!("{}: {}", base, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// Absolute URL of an album-relative URI
    pub fn url_for(&self, uri: &str) -> Result<Url, FetchError> {
        self.base
            .join(uri)
            .map_err(|e| FetchError::BadUri(format!("{}: {}", uri, e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, uri: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(uri)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_gets_trailing_slash() {
        let fetcher = HttpFetcher::new("https://photos.example.com/albums").unwrap();
        assert_eq!(
            fetcher.url_for("trip.json").unwrap().as_str(),
            "https://photos.example.com/albums/trip.json"
        );
    }

    #[test]
    fn test_nested_and_encoded_uris() {
        let fetcher = HttpFetcher::new("https://photos.example.com/").unwrap();
        assert_eq!(
            fetcher.url_for("2014/meta/IMG%201.json").unwrap().as_str(),
            "https://photos.example.com/2014/meta/IMG%201.json"
        );
    }
}
