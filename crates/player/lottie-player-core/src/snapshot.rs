use serde::{Deserialize, Serialize};

pub const SVG_MIME: &str = "image/svg+xml";

/// Serialized frame offered to the host for download.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub file_name: String,
    pub mime_type: String,
    pub data: String,
}

impl Snapshot {
    pub fn svg(stem: &str, frame: f32, data: String) -> Self {
        Self {
            file_name: file_name(stem, frame),
            mime_type: SVG_MIME.to_string(),
            data,
        }
    }
}

/// `<stem>-<frame:03>.svg`, with the frame rounded to a whole number.
pub fn file_name(stem: &str, frame: f32) -> String {
    let frame = frame.max(0.0).round() as u32;
    format!("{stem}-{frame:03}.svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_zero_padded() {
        assert_eq!(file_name("ball", 7.4), "ball-007.svg");
        assert_eq!(file_name("ball", 1234.0), "ball-1234.svg");
        assert_eq!(file_name("ball", -2.0), "ball-000.svg");
    }
}
