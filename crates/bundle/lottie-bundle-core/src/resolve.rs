//! Source → [`Bundle`] resolution.

use log::debug;
use serde::Serialize;

use crate::archive::{animation_entry, looks_like_zip, BundleArchive, MANIFEST_ENTRY};
use crate::assets::{inline_assets, InlineReport};
use crate::document::AnimationDocument;
use crate::error::BundleError;
use crate::manifest::Manifest;
use crate::source::{Fetch, FetchResponse, Source, SourceKind};

/// Animation documents ready for the rendering engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bundle {
    pub animations: Vec<AnimationDocument>,
    /// Present only for dotLottie archives.
    pub manifest: Option<Manifest>,
    pub is_dot_lottie: bool,
    /// Per-animation inlining outcome, parallel to `animations`.
    #[serde(skip)]
    pub inline_reports: Vec<InlineReport>,
}

impl Bundle {
    /// A plain document, with no manifest.
    pub fn single(doc: AnimationDocument) -> Self {
        Self {
            animations: vec![doc],
            manifest: None,
            is_dot_lottie: false,
            inline_reports: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

/// Wrap an in-memory document.
pub fn resolve_document(value: serde_json::Value) -> Bundle {
    Bundle::single(AnimationDocument::new(value))
}

/// Extract a dotLottie archive: read the manifest, parse every listed
/// animation and inline its media. All assets are resolved before returning.
pub fn read_bundle(bytes: &[u8]) -> Result<Bundle, BundleError> {
    let mut archive = BundleArchive::open(bytes)?;

    let manifest_bytes = archive
        .read(MANIFEST_ENTRY)?
        .ok_or(BundleError::ManifestNotFound)?;
    let manifest = Manifest::parse(&manifest_bytes)?;

    let mut animations = Vec::with_capacity(manifest.animations.len());
    let mut inline_reports = Vec::with_capacity(manifest.animations.len());
    for id in manifest.ids() {
        let raw = archive
            .read(&animation_entry(id))?
            .ok_or_else(|| BundleError::MissingAnimation { id: id.to_string() })?;
        let mut doc = AnimationDocument::from_slice(&raw)?;
        let report = inline_assets(&mut doc, &mut archive)?;
        debug!(
            "bundle animation '{id}': {} inlined, {} embedded, {} missing",
            report.inlined.len(),
            report.already_embedded.len(),
            report.missing.len()
        );
        animations.push(doc);
        inline_reports.push(report);
    }

    Ok(Bundle {
        animations,
        manifest: Some(manifest),
        is_dot_lottie: true,
        inline_reports,
    })
}

/// Parse a fetched body. The locator extension picks the path; unknown
/// extensions are decided by the zip signature.
pub fn resolve_bytes(locator: &str, body: &[u8]) -> Result<Bundle, BundleError> {
    let kind = match SourceKind::from_locator(locator) {
        SourceKind::Unknown if looks_like_zip(body) => SourceKind::Bundle,
        SourceKind::Unknown => SourceKind::Json,
        k => k,
    };
    debug!("resolving '{locator}' as {kind:?} ({} bytes)", body.len());
    match kind {
        SourceKind::Bundle => read_bundle(body),
        _ => Ok(Bundle::single(AnimationDocument::from_slice(body)?)),
    }
}

/// Check the transport status, then parse the body.
pub fn resolve_response(locator: &str, response: FetchResponse) -> Result<Bundle, BundleError> {
    let response = response.error_for_status()?;
    resolve_bytes(locator, &response.body)
}

/// Resolve any source, fetching URLs through `fetch`.
pub fn resolve_source(source: &Source, fetch: &mut dyn Fetch) -> Result<Bundle, BundleError> {
    match source {
        Source::Document(value) => Ok(resolve_document(value.clone())),
        Source::Url(locator) => {
            let response = fetch.fetch(locator)?;
            resolve_response(locator, response)
        }
    }
}
