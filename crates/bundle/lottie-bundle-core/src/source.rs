//! Animation sources and the fetch seam.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assets::extension;
use crate::error::BundleError;

/// What the player was asked to load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Url(String),
    Document(serde_json::Value),
}

impl Source {
    pub fn locator(&self) -> Option<&str> {
        match self {
            Self::Url(u) => Some(u),
            Self::Document(_) => None,
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::Url(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::Url(s)
    }
}

impl From<serde_json::Value> for Source {
    fn from(v: serde_json::Value) -> Self {
        Self::Document(v)
    }
}

/// Parsing path chosen from the locator's file extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain Lottie JSON.
    Json,
    /// Zipped dotLottie bundle.
    Bundle,
    /// Extension not recognised; the body decides.
    Unknown,
}

/// Path portion of a locator: no query string, no fragment.
pub fn locator_path(locator: &str) -> &str {
    let end = locator.find(['?', '#']).unwrap_or(locator.len());
    &locator[..end]
}

impl SourceKind {
    pub fn from_locator(locator: &str) -> Self {
        match extension(locator_path(locator)).map(str::to_ascii_lowercase) {
            None => Self::Json,
            Some(ext) => match ext.as_str() {
                "json" => Self::Json,
                "lottie" | "zip" => Self::Bundle,
                _ => Self::Unknown,
            },
        }
    }
}

/// File name of a locator without directories or extension.
pub fn file_stem(locator: &str) -> Option<&str> {
    let path = locator_path(locator).trim_end_matches('/');
    let file = path.rsplit('/').next().filter(|f| !f.is_empty())?;
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => Some(stem),
        _ => Some(file),
    }
}

/// Transport-level response handed to the resolver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            status_text: "OK".into(),
            body,
        }
    }

    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Vec::new(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into a transport error.
    pub fn error_for_status(self) -> Result<Self, BundleError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BundleError::Transport {
                status: self.status,
                status_text: self.status_text,
            })
        }
    }
}

/// Fetches raw bytes for a locator. Hosts supply the transport.
pub trait Fetch {
    fn fetch(&mut self, locator: &str) -> Result<FetchResponse, BundleError>;
}

/// Serves locators from the local filesystem, relative to `root`.
/// Missing files answer 404 like an HTTP server would.
#[derive(Clone, Debug, Default)]
pub struct LocalFetcher {
    pub root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetch for LocalFetcher {
    fn fetch(&mut self, locator: &str) -> Result<FetchResponse, BundleError> {
        let rel = locator_path(locator).trim_start_matches("file://");
        let path = self.root.join(rel.trim_start_matches('/'));
        match std::fs::read(&path) {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(FetchResponse::status(404, "Not Found"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Blocking HTTP transport.
#[cfg(feature = "http")]
#[derive(Clone, Debug, Default)]
pub struct UreqFetcher;

#[cfg(feature = "http")]
impl Fetch for UreqFetcher {
    fn fetch(&mut self, locator: &str) -> Result<FetchResponse, BundleError> {
        use std::io::Read;

        let response = match ureq::get(locator).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                return Ok(FetchResponse::status(status, r.status_text()));
            }
            Err(e) => {
                return Err(BundleError::Io {
                    reason: e.to_string(),
                })
            }
        };
        let status = response.status();
        let status_text = response.status_text().to_string();
        let mut body = Vec::new();
        response.into_reader().read_to_end(&mut body)?;
        Ok(FetchResponse {
            status,
            status_text,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension() {
        assert_eq!(SourceKind::from_locator("https://x.io/a.json"), SourceKind::Json);
        assert_eq!(SourceKind::from_locator("https://x.io/a.LOTTIE"), SourceKind::Bundle);
        assert_eq!(SourceKind::from_locator("/a.lottie?v=2#top"), SourceKind::Bundle);
        assert_eq!(SourceKind::from_locator("https://x.io/anim"), SourceKind::Json);
        assert_eq!(SourceKind::from_locator("https://x.io/anim.bin"), SourceKind::Unknown);
    }

    #[test]
    fn stem_of_locator() {
        assert_eq!(file_stem("https://x.io/path/cat.lottie?x=1"), Some("cat"));
        assert_eq!(file_stem("cat"), Some("cat"));
        assert_eq!(file_stem("/dir/"), Some("dir"));
        assert_eq!(file_stem(""), None);
    }

    #[test]
    fn non_success_becomes_transport_error() {
        let err = FetchResponse::status(503, "Service Unavailable")
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), 503);
    }
}
