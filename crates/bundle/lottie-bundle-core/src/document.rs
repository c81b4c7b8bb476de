//! Opaque Lottie animation document.
//!
//! The document is forwarded untouched to the rendering engine; only the few
//! top-level fields needed for playback control and asset inlining are read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BundleError;

/// Top-level keys every conforming Lottie document carries.
pub const REQUIRED_FIELDS: [&str; 7] = ["v", "ip", "op", "layers", "fr", "w", "h"];

/// A parsed Lottie document. Serializes back to the exact JSON it was built from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationDocument(Value);

impl AnimationDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a document from JSON text, tolerating a leading UTF-8 BOM.
    pub fn from_json_str(s: &str) -> Result<Self, BundleError> {
        let trimmed = s.trim_start_matches('\u{feff}');
        Ok(Self(serde_json::from_str(trimmed)?))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, BundleError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        Ok(Self(serde_json::from_slice(bytes)?))
    }

    /// True when all [`REQUIRED_FIELDS`] are present at the top level.
    pub fn is_lottie(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Required fields absent from this document.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self.0.as_object() {
            Some(map) => REQUIRED_FIELDS
                .iter()
                .copied()
                .filter(|k| !map.contains_key(*k))
                .collect(),
            None => REQUIRED_FIELDS.to_vec(),
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn in_point(&self) -> f32 {
        self.number("ip").unwrap_or(0.0) as f32
    }

    pub fn out_point(&self) -> f32 {
        self.number("op").unwrap_or(0.0) as f32
    }

    pub fn frame_rate(&self) -> f32 {
        self.number("fr").unwrap_or(0.0) as f32
    }

    /// Number of frames between in and out point.
    pub fn total_frames(&self) -> f32 {
        (self.out_point() - self.in_point()).max(0.0)
    }

    pub fn width(&self) -> u32 {
        self.number("w").unwrap_or(0.0) as u32
    }

    pub fn height(&self) -> u32 {
        self.number("h").unwrap_or(0.0) as u32
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("nm").and_then(Value::as_str)
    }

    /// Duration in seconds at the document frame rate.
    pub fn duration_secs(&self) -> f32 {
        let fr = self.frame_rate();
        if fr <= 0.0 {
            0.0
        } else {
            self.total_frames() / fr
        }
    }

    pub fn assets(&self) -> &[Value] {
        self.0
            .get("assets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable view of the asset objects; non-object entries are skipped.
    pub fn assets_mut(&mut self) -> impl Iterator<Item = &mut Map<String, Value>> {
        self.0
            .get_mut("assets")
            .and_then(Value::as_array_mut)
            .into_iter()
            .flat_map(|arr| arr.iter_mut())
            .filter_map(Value::as_object_mut)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for AnimationDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
