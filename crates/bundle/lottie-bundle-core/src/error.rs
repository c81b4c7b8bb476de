//! Error types for bundle resolution

/// Failures raised while fetching, extracting or parsing an animation source.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BundleError {
    /// The transport answered with a non-success status
    #[error("{status_text} (status {status})")]
    Transport { status: u16, status_text: String },

    /// `manifest.json` is missing, or has no `animations` list
    #[error("Manifest not found")]
    ManifestNotFound,

    /// The manifest lists no animations
    #[error("No animations listed in manifest")]
    NoAnimations,

    /// A manifest entry has no matching `animations/<id>.json`
    #[error("Animation '{id}' listed in manifest but missing from bundle")]
    MissingAnimation { id: String },

    /// The archive could not be opened or read
    #[error("Archive error: {reason}")]
    Archive { reason: String },

    /// JSON payload failed to parse
    #[error("Invalid JSON: {reason}")]
    Json { reason: String },

    /// Local IO failure
    #[error("IO error: {reason}")]
    Io { reason: String },

    /// The source kind could not be determined
    #[error("Unsupported source: {locator}")]
    UnsupportedSource { locator: String },
}

impl BundleError {
    /// Status code reported alongside the error message.
    ///
    /// Transport failures keep the status they were given; malformed content
    /// maps to 400 and everything else to 500.
    #[inline]
    pub fn status(&self) -> u16 {
        match self {
            Self::Transport { status, .. } => *status,
            Self::ManifestNotFound
            | Self::NoAnimations
            | Self::MissingAnimation { .. }
            | Self::Json { .. }
            | Self::Archive { .. } => 400,
            Self::Io { .. } | Self::UnsupportedSource { .. } => 500,
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } | Self::Io { .. } => "transport",
            Self::ManifestNotFound | Self::NoAnimations | Self::MissingAnimation { .. } => {
                "manifest"
            }
            Self::Archive { .. } => "archive",
            Self::Json { .. } => "content",
            Self::UnsupportedSource { .. } => "source",
        }
    }
}

impl From<std::io::Error> for BundleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for BundleError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive {
            reason: err.to_string(),
        }
    }
}
