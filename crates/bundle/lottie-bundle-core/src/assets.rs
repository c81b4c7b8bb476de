//! Asset classification and data-URI inlining.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::archive::{BundleArchive, AUDIO_DIR, IMAGES_DIR};
use crate::document::AnimationDocument;
use crate::error::BundleError;

/// Media kind of an asset entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    /// Archive directory holding media of this kind.
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Image => IMAGES_DIR,
            Self::Audio => AUDIO_DIR,
        }
    }
}

/// Classify an asset by the fields it carries.
///
/// Images carry dimensions (`w`, `h`) and a path; precompositions also carry
/// dimensions but list `layers`, so those are excluded. Audio has a path and
/// playback/location fields (`e` or `u`) but no dimensions. Anything else,
/// including entries with only one of `w`/`h`, is not media.
pub fn classify(asset: &Map<String, Value>) -> Option<AssetKind> {
    let has = |k: &str| asset.contains_key(k);
    if !has("p") || has("layers") {
        return None;
    }
    match (has("w"), has("h")) {
        (true, true) if !has("xt") => Some(AssetKind::Image),
        (false, false) if has("e") || has("u") => Some(AssetKind::Audio),
        _ => None,
    }
}

/// MIME type for a file extension (case-insensitive).
pub fn mime_from_ext(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "svg" | "svg+xml" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "mp3" | "mpeg" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" | "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

/// Extension of the last path segment, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

pub fn is_data_uri(p: &str) -> bool {
    p.starts_with("data:")
}

pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// Outcome of inlining one document's assets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineReport {
    /// Ids of assets rewritten to data URIs by this pass.
    pub inlined: Vec<String>,
    /// Ids of media assets already carrying a data URI.
    pub already_embedded: Vec<String>,
    /// Ids of media assets with no matching archive entry.
    pub missing: Vec<String>,
}

fn asset_id(asset: &Map<String, Value>) -> String {
    asset
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Archive entry names to try for an asset, most specific first.
fn candidate_entries(kind: AssetKind, asset: &Map<String, Value>, p: &str) -> Vec<String> {
    let mut names = vec![format!("{}/{}", kind.dir(), p)];
    if let Some(u) = asset.get("u").and_then(Value::as_str) {
        let joined = format!("{}{}", u, p);
        let joined = joined.trim_start_matches('/').to_string();
        if !names.contains(&joined) {
            names.push(joined);
        }
    }
    names
}

/// Replace every image/audio reference in `doc` with an inline data URI read
/// from `archive`. Each asset is rewritten at most once: entries already
/// holding a data URI are left alone.
pub fn inline_assets(
    doc: &mut AnimationDocument,
    archive: &mut BundleArchive<'_>,
) -> Result<InlineReport, BundleError> {
    let mut report = InlineReport::default();

    for asset in doc.assets_mut() {
        let Some(kind) = classify(asset) else {
            continue;
        };
        let id = asset_id(asset);
        let Some(p) = asset.get("p").and_then(Value::as_str).map(str::to_owned) else {
            continue;
        };
        if is_data_uri(&p) {
            report.already_embedded.push(id);
            continue;
        }

        let mut bytes = None;
        for name in candidate_entries(kind, asset, &p) {
            if let Some(b) = archive.read(&name)? {
                bytes = Some(b);
                break;
            }
        }
        let Some(bytes) = bytes else {
            warn!("asset '{id}' ({kind:?}) references '{p}' which is not in the bundle");
            report.missing.push(id);
            continue;
        };

        let mime = extension(&p).map(mime_from_ext).unwrap_or(match kind {
            AssetKind::Image => "image/png",
            AssetKind::Audio => "audio/mpeg",
        });
        asset.insert("p".into(), Value::String(to_data_uri(mime, &bytes)));
        asset.insert("u".into(), Value::String(String::new()));
        asset.insert("e".into(), Value::from(1));
        debug!("inlined asset '{id}' ({} bytes, {mime})", bytes.len());
        report.inlined.push(id);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn image_has_dimensions() {
        let a = obj(json!({ "id": "img_0", "w": 10, "h": 10, "u": "/images/", "p": "img_0.png", "e": 0 }));
        assert_eq!(classify(&a), Some(AssetKind::Image));
    }

    #[test]
    fn audio_has_playback_fields_only() {
        let a = obj(json!({ "id": "aud_0", "u": "/audio/", "p": "aud_0.mp3", "e": 0 }));
        assert_eq!(classify(&a), Some(AssetKind::Audio));
    }

    #[test]
    fn precomp_and_partial_dimensions_are_not_media() {
        let precomp = obj(json!({ "id": "comp_0", "w": 10, "h": 10, "p": "x", "layers": [] }));
        assert_eq!(classify(&precomp), None);
        let half = obj(json!({ "id": "odd", "w": 10, "p": "x.png", "e": 0 }));
        assert_eq!(classify(&half), None);
        let bare = obj(json!({ "id": "bare", "p": "x.png" }));
        assert_eq!(classify(&bare), None);
    }

    #[test]
    fn mime_lookup_is_case_insensitive() {
        assert_eq!(mime_from_ext("PNG"), "image/png");
        assert_eq!(mime_from_ext("jpeg"), "image/jpeg");
        assert_eq!(mime_from_ext("mp3"), "audio/mpeg");
        assert_eq!(mime_from_ext("xyz"), "application/octet-stream");
    }

    #[test]
    fn extension_ignores_directories() {
        assert_eq!(extension("images/img_0.png"), Some("png"));
        assert_eq!(extension("some.dir/file"), None);
        assert_eq!(extension(".hidden"), None);
    }

    #[test]
    fn data_uri_encoding() {
        assert_eq!(to_data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }
}
