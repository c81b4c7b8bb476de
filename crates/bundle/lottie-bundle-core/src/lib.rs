//! Lottie Bundle Core (host-agnostic)
//!
//! Turns an animation source into Lottie documents ready for a rendering
//! engine. Plain `.json` documents are parsed directly; `.lottie` archives
//! are unzipped, their manifest read, and every image/audio asset inlined as
//! a base64 data URI.

pub mod archive;
pub mod assets;
pub mod document;
pub mod error;
pub mod manifest;
pub mod resolve;
pub mod source;

pub use assets::{classify, inline_assets, mime_from_ext, AssetKind, InlineReport};
pub use document::AnimationDocument;
pub use error::BundleError;
pub use manifest::{Direction, LoopSetting, Manifest, ManifestAnimation, PlayMode};
pub use resolve::{read_bundle, resolve_bytes, resolve_document, resolve_response, resolve_source, Bundle};
pub use source::{file_stem, Fetch, FetchResponse, LocalFetcher, Source, SourceKind};

#[cfg(feature = "http")]
pub use source::UreqFetcher;
