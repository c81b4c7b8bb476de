//! Seek targets: an absolute frame or a percentage of the animation.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeekTarget {
    Frame(f32),
    Percent(f32),
}

impl SeekTarget {
    /// Parse `"<digits>"` or `"<digits>%"`. Anything else yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let (digits, percent) = match input.strip_suffix('%') {
            Some(rest) => (rest, true),
            None => (input, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: f32 = digits.parse().ok()?;
        Some(if percent {
            Self::Percent(value)
        } else {
            Self::Frame(value)
        })
    }

    /// Frame this target points at in an animation of `total_frames`.
    pub fn frame(&self, total_frames: f32) -> f32 {
        match *self {
            Self::Frame(f) => f,
            Self::Percent(p) => (total_frames * p / 100.0).round(),
        }
    }
}

impl From<f32> for SeekTarget {
    fn from(frame: f32) -> Self {
        Self::Frame(frame)
    }
}
