use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Directory holding all fixture files; usable as a `LocalFetcher` root.
pub fn root() -> PathBuf {
    fixtures_root()
}

pub mod animations {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.animations.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        super::load_json(rel)
    }

    /// Fixture as an untyped JSON document.
    pub fn document(name: &str) -> Result<serde_json::Value> {
        load(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        Ok(resolve_path(rel))
    }

    /// Locator relative to [`super::root`].
    pub fn locator(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        Ok(rel.clone())
    }
}

/// Small binary payloads standing in for embedded media.
pub mod media {
    /// 1x1 transparent PNG.
    pub const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    /// ID3 header followed by padding; enough to exercise the audio path.
    pub const MP3_STUB: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00padding";
}

/// In-memory dotLottie archive builder.
#[derive(Default)]
pub struct BundleBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest listing `ids` with no playback hints.
    pub fn manifest_for(self, ids: &[&str]) -> Self {
        let animations: Vec<_> = ids.iter().map(|id| serde_json::json!({ "id": id })).collect();
        self.manifest(serde_json::json!({
            "version": "1.0",
            "generator": "lottie-test-fixtures",
            "animations": animations,
        }))
    }

    pub fn manifest(self, manifest: serde_json::Value) -> Self {
        self.entry("manifest.json", manifest.to_string().into_bytes())
    }

    pub fn animation(self, id: &str, doc: &serde_json::Value) -> Self {
        self.entry(&format!("animations/{id}.json"), doc.to_string().into_bytes())
    }

    pub fn image(self, file: &str, bytes: &[u8]) -> Self {
        self.entry(&format!("images/{file}"), bytes.to_vec())
    }

    pub fn audio(self, file: &str, bytes: &[u8]) -> Self {
        self.entry(&format!("audio/{file}"), bytes.to_vec())
    }

    pub fn entry(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.entries.push((name.to_string(), bytes));
        self
    }

    pub fn build(self) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &self.entries {
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            zip.start_file(name.as_str(), options)
                .with_context(|| format!("start entry {name}"))?;
            zip.write_all(bytes)?;
        }
        Ok(zip.finish().context("finish archive")?.into_inner())
    }
}

/// `bouncing-ball` packed as a dotLottie archive together with its image
/// and audio media.
pub fn bouncing_ball_bundle() -> Result<Vec<u8>> {
    let doc = animations::document("bouncing-ball")?;
    BundleBuilder::new()
        .manifest_for(&["bouncing-ball"])
        .animation("bouncing-ball", &doc)
        .image("ball.png", media::PNG_1X1)
        .audio("bounce.mp3", media::MP3_STUB)
        .build()
}

/// Two-animation archive: `bouncing-ball` then `spinner`.
pub fn multi_bundle(manifest: serde_json::Value) -> Result<Vec<u8>> {
    BundleBuilder::new()
        .manifest(manifest)
        .animation("bouncing-ball", &animations::document("bouncing-ball")?)
        .animation("spinner", &animations::document("spinner")?)
        .image("ball.png", media::PNG_1X1)
        .audio("bounce.mp3", media::MP3_STUB)
        .build()
}
