/// Directory back end
///
/// Serves an album tree from the local filesystem. URIs are percent-decoded
/// (descriptors store encoded paths) and must stay inside the root.
/// A missing file answers like a web server would: status 404.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use tracing::debug;

use super::{FetchError, Fetcher};

pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an album-relative URI to a path under the root
    pub fn path_for(&self, uri: &str) -> Result<PathBuf, FetchError> {
        let decoded = percent_decode_str(uri)
            .decode_utf8()
            .map_err(|_| FetchError::BadUri(uri.to_string()))?;
        let relative = Path::new(decoded.as_ref());

        // Only plain names and `.` are allowed; no escaping the album tree
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined || decoded.is_empty() {
            return Err(FetchError::BadUri(uri.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch_bytes(&self, uri: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.path_for(uri)?;
        debug!("Reading {}", path.display());

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::Status(404),
            ErrorKind::PermissionDenied => FetchError::Status(403),
            _ => FetchError::Transport(format!("{}: {}", path.display(), e)),
        })
    }
}
