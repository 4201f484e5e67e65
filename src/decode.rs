use crate::constants::MAX_PIXEL_COUNT;
use crate::error::{Result, StampError};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use tracing::debug;

/// Decode an image from raw bytes, detecting the format from the leading
/// bytes rather than trusting any file name.
///
/// The header is probed for dimensions before the full pixel data is
/// decoded, so oversized images are rejected without allocating for them.
///
/// # Arguments
/// * `bytes` - Raw encoded image data (JPEG, PNG, WebP, GIF, BMP, TIFF)
///
/// # Returns
/// * `Result<(DynamicImage, &'static str)>` - Decoded image and format name
pub fn decode_image(bytes: &[u8]) -> Result<(DynamicImage, &'static str)> {
    if bytes.is_empty() {
        return Err(StampError::EmptyInput);
    }

    let format = image::guess_format(bytes)
        .map_err(|_| StampError::UnsupportedFormat("unrecognized image signature".to_string()))?;

    let (width, height) = probe_dimensions(bytes)?;
    check_pixel_limit(width, height)?;

    let source = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| StampError::Decode(e.to_string()))?;

    let name = format_name(format);
    debug!(format = name, width, height, "decoded source image");
    Ok((source, name))
}

/// Read image dimensions from the header without decoding pixel data.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(StampError::Io)?
        .into_dimensions()
        .map_err(|e| StampError::Decode(e.to_string()))
}

pub fn check_pixel_limit(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(StampError::Decode(format!(
            "image has degenerate dimensions {width}x{height}"
        )));
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXEL_COUNT {
        return Err(StampError::ImageTooLarge(pixels, MAX_PIXEL_COUNT));
    }
    Ok(())
}

pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        _ => "unknown",
    }
}
