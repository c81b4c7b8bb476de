//! Read-only view over a dotLottie zip archive held in memory.

use std::io::{Cursor, Read};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::BundleError;

pub const MANIFEST_ENTRY: &str = "manifest.json";
pub const ANIMATIONS_DIR: &str = "animations";
pub const IMAGES_DIR: &str = "images";
pub const AUDIO_DIR: &str = "audio";

/// Largest entry that will be inflated. Declared sizes come from the archive
/// itself and are not trusted.
pub const MAX_ENTRY_BYTES: u64 = 256 * 1024 * 1024;

/// Local file header signature shared by every zip archive.
pub const ZIP_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

pub fn looks_like_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZIP_SIGNATURE)
}

pub struct BundleArchive<'a> {
    zip: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> BundleArchive<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self, BundleError> {
        let zip = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { zip })
    }

    /// Decompress an entry. `Ok(None)` when the archive has no such entry.
    pub fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>, BundleError> {
        let mut file = match self.zip.by_name(name) {
            Ok(f) => f,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let declared = file.size();
        if declared > MAX_ENTRY_BYTES {
            return Err(oversized(name, declared));
        }
        let mut buf = Vec::new();
        (&mut file).take(MAX_ENTRY_BYTES + 1).read_to_end(&mut buf)?;
        if buf.len() as u64 > MAX_ENTRY_BYTES {
            return Err(oversized(name, buf.len() as u64));
        }
        Ok(Some(buf))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names()
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.is_empty()
    }
}

fn oversized(name: &str, size: u64) -> BundleError {
    BundleError::Archive {
        reason: format!("entry {name} is {size} bytes, over the {MAX_ENTRY_BYTES} byte limit"),
    }
}

pub fn animation_entry(id: &str) -> String {
    format!("{ANIMATIONS_DIR}/{id}.json")
}
