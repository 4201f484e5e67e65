use crate::constants::PNG_OPTIMIZE_PRESET;
use crate::error::{Result, StampError};
use image::{ImageFormat, RgbaImage};
use oxipng::Options;
use std::io::Cursor;
use tracing::debug;

/// Serialize a canvas to PNG bytes.
///
/// Output is always PNG no matter what container the source arrived in,
/// and the encoding is deterministic: the same canvas yields the same
/// bytes on every call.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| StampError::Encode(e.to_string()))?;
    let bytes = buf.into_inner();
    debug!(bytes = bytes.len(), "encoded canvas to png");
    Ok(bytes)
}

/// Recompress an encoded PNG with oxipng. Lossless; worth the extra
/// latency when the artifact is stored long-term.
pub fn optimize_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let options = Options::from_preset(PNG_OPTIMIZE_PRESET);
    let optimized = oxipng::optimize_from_memory(bytes, &options)
        .map_err(|e| StampError::PngOptimization(e.to_string()))?;
    debug!(
        before = bytes.len(),
        after = optimized.len(),
        "optimized png"
    );
    Ok(optimized)
}
