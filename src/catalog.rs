use crate::constants::DEFAULT_STAMP_SIZE;
use crate::decode;
use crate::error::{Result, StampError};
use image::RgbaImage;
use std::collections::HashMap;
use tracing::warn;

/// Source of encoded stamp artwork, keyed by edge length.
///
/// Implementations hand out raw encoded bytes; decoding happens in
/// [`load_stamp`]. Lookups must be safe from multiple threads at once.
pub trait AssetCatalog: Sync {
    /// Raw encoded bytes for the stamp with the given edge length, or
    /// `None` when the catalog has no entry for it.
    fn get(&self, size_tag: u32) -> Option<&[u8]>;
}

/// Conventional file name for a stamp asset of the given edge length.
pub fn stamp_asset_name(size_tag: u32) -> String {
    format!("stamp-{size_tag}.png")
}

static STAMP_16: &[u8] = include_bytes!("../resources/stamp-16.png");
static STAMP_32: &[u8] = include_bytes!("../resources/stamp-32.png");
static STAMP_64: &[u8] = include_bytes!("../resources/stamp-64.png");
static STAMP_128: &[u8] = include_bytes!("../resources/stamp-128.png");
static STAMP_256: &[u8] = include_bytes!("../resources/stamp-256.png");

static EMBEDDED_STAMPS: [(u32, &[u8]); 5] = [
    (16, STAMP_16),
    (32, STAMP_32),
    (64, STAMP_64),
    (128, STAMP_128),
    (256, STAMP_256),
];

/// The stamp artwork compiled into the binary, one PNG per catalog size.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl EmbeddedCatalog {
    pub fn new() -> Self {
        EmbeddedCatalog
    }

    /// All packaged entries as `(size_tag, bytes)` pairs, smallest first.
    pub fn entries(&self) -> &'static [(u32, &'static [u8])] {
        &EMBEDDED_STAMPS
    }
}

impl AssetCatalog for EmbeddedCatalog {
    fn get(&self, size_tag: u32) -> Option<&[u8]> {
        EMBEDDED_STAMPS
            .iter()
            .find(|(tag, _)| *tag == size_tag)
            .map(|(_, bytes)| *bytes)
    }
}

/// In-memory catalog backed by a map, mainly for tests and custom artwork.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: HashMap<u32, Vec<u8>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, size_tag: u32, bytes: Vec<u8>) {
        self.entries.insert(size_tag, bytes);
    }
}

impl AssetCatalog for MemoryCatalog {
    fn get(&self, size_tag: u32) -> Option<&[u8]> {
        self.entries.get(&size_tag).map(Vec::as_slice)
    }
}

/// Fetch and decode the stamp for a size tag.
///
/// A missing entry is not fatal: retrieval falls back to the default
/// 16px stamp so a catalog gap degrades the watermark instead of failing
/// the whole transform. A catalog that lacks even the default entry, or
/// an entry that does not decode, is a hard error.
pub fn load_stamp(catalog: &dyn AssetCatalog, size_tag: u32) -> Result<RgbaImage> {
    let bytes = match catalog.get(size_tag) {
        Some(bytes) => bytes,
        None => {
            warn!(
                size_tag,
                fallback = DEFAULT_STAMP_SIZE,
                "stamp asset missing from catalog, using default size"
            );
            catalog.get(DEFAULT_STAMP_SIZE).ok_or_else(|| {
                StampError::AssetCatalog(format!(
                    "default stamp asset {} missing from catalog",
                    stamp_asset_name(DEFAULT_STAMP_SIZE)
                ))
            })?
        }
    };

    let (stamp, _) = decode::decode_image(bytes)?;
    Ok(stamp.to_rgba8())
}
