//! dotLottie `manifest.json`.

use serde::{Deserialize, Serialize};

use crate::error::BundleError;

/// Playback direction. Serialized as the engine's numeric `1` / `-1`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Backward),
            other => Err(format!("invalid direction {other}, expected 1 or -1")),
        }
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> i8 {
        d.as_i8()
    }
}

/// Loop behaviour: plain restart, or bounce back and forth.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Normal,
    Bounce,
}

impl PlayMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bounce => "bounce",
        }
    }
}

/// `loop` in a manifest entry is either a flag or a repeat count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoopSetting {
    Enabled(bool),
    Count(u32),
}

impl LoopSetting {
    pub fn is_looping(&self) -> bool {
        match self {
            Self::Enabled(b) => *b,
            Self::Count(n) => *n > 0,
        }
    }

    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Count(n) if *n > 0 => Some(*n),
            _ => None,
        }
    }
}

/// One animation listed in the manifest, with optional playback hints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAnimation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<LoopSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<PlayMode>,
    /// Delay in milliseconds between loops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermission: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

/// Bundle manifest. Only `animations` is required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub animations: Vec<ManifestAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_animation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

impl Manifest {
    /// Parse and validate manifest JSON.
    ///
    /// A manifest without an `animations` key is treated as absent; an empty
    /// list is rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self, BundleError> {
        let raw: serde_json::Value = serde_json::from_slice(bytes)?;
        if raw.get("animations").is_none() {
            return Err(BundleError::ManifestNotFound);
        }
        let manifest: Manifest = serde_json::from_value(raw)?;
        if manifest.animations.is_empty() {
            return Err(BundleError::NoAnimations);
        }
        Ok(manifest)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(|a| a.id.as_str())
    }

    /// Index of `activeAnimationId`, if it names a listed animation.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_animation_id.as_deref()?;
        self.animations.iter().position(|a| a.id == active)
    }
}
