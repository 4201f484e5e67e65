use crate::catalog::{self, AssetCatalog};
use crate::composite;
use crate::constants::MAX_FILE_SIZE;
use crate::decode;
use crate::encode;
use crate::error::{Result, StampError};
use crate::sizing;
use image::GenericImageView;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct StampOptions {
    pub optimize: bool,
    pub size_override: Option<u32>,
}

impl StampOptions {
    pub fn new(optimize: bool, size_override: Option<u32>) -> Result<Self> {
        if let Some(size) = size_override {
            if !sizing::is_catalog_size(size) {
                return Err(StampError::InvalidStampSize(size));
            }
        }

        Ok(Self {
            optimize,
            size_override,
        })
    }
}

/// Run the full watermark transform on encoded image bytes.
///
/// Pipeline: decode the source, pick a stamp size from its dimensions
/// (unless overridden), fetch and decode the stamp artwork, alpha-blend
/// it into the bottom-right corner, and encode the canvas as PNG.
///
/// # Arguments
/// * `bytes` - Encoded source image (format detected from leading bytes)
/// * `catalog` - Stamp artwork source, looked up by edge length
/// * `options` - Optimization flag and optional fixed stamp size
///
/// # Returns
/// * `Ok(Vec<u8>)` - Encoded PNG bytes carrying the watermark
/// * `Err(StampError)` - If decoding, asset retrieval, or encoding fails
pub fn stamp_image(
    bytes: &[u8],
    catalog: &dyn AssetCatalog,
    options: &StampOptions,
) -> Result<Vec<u8>> {
    let (source, format) = decode::decode_image(bytes)?;

    let (width, height) = source.dimensions();
    let size_tag = options
        .size_override
        .unwrap_or_else(|| sizing::select_stamp_size(width, height));
    debug!(format, width, height, size_tag, "selected stamp size");

    let stamp = catalog::load_stamp(catalog, size_tag)?;
    let canvas = composite::composite(&source, &stamp);

    let encoded = encode::encode_png(&canvas)?;
    if options.optimize {
        encode::optimize_png(&encoded)
    } else {
        Ok(encoded)
    }
}

/// Validates that a file exists at the given path.
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(StampError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Read source bytes from disk, refusing files over the size cap.
pub fn load_source_bytes(input_path: &Path) -> Result<(Vec<u8>, u64)> {
    validate_file_exists(input_path)?;

    let canonical_path = input_path
        .canonicalize()
        .map_err(|_| StampError::FileNotFound(input_path.to_path_buf()))?;

    // Check size before reading so a giant file never reaches memory.
    let file_size = fs::metadata(&canonical_path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(StampError::FileTooLarge(file_size, MAX_FILE_SIZE));
    }

    let bytes = fs::read(&canonical_path)?;
    Ok((bytes, file_size))
}

pub fn write_output(output_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|_| StampError::DirectoryCreationFailed(parent.to_path_buf()))?;
        }
    }
    fs::write(output_path, bytes)?;
    Ok(())
}

/// File-to-file workflow: load -> stamp -> save.
///
/// # Returns
/// * `Ok((original_size, stamped_size))` - Byte sizes before and after
/// * `Err(StampError)` - If any stage fails
pub fn stamp_file_pipeline(
    input_path: &Path,
    output_path: &Path,
    catalog: &dyn AssetCatalog,
    options: &StampOptions,
) -> Result<(u64, u64)> {
    let (bytes, original_size) = load_source_bytes(input_path)?;
    let stamped = stamp_image(&bytes, catalog, options)?;
    write_output(output_path, &stamped)?;
    Ok((original_size, stamped.len() as u64))
}

pub fn stamp_file(
    input: PathBuf,
    output: PathBuf,
    catalog: &dyn AssetCatalog,
    options: StampOptions,
) -> Result<()> {
    println!("🖋️  Stamping image: {:?}", input);
    println!("📁 Output: {:?}", output);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Loading image...");

    let (bytes, original_size) = load_source_bytes(&input)?;
    let (width, height) = decode::probe_dimensions(&bytes)?;
    pb.finish_with_message("✅ Image loaded");

    let size_tag = options
        .size_override
        .unwrap_or_else(|| sizing::select_stamp_size(width, height));
    println!(
        "📊 Source: {} bytes ({}x{})",
        original_size, width, height
    );
    println!("🏷️  Stamp size: {}px", size_tag);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Applying watermark...");

    let stamped = stamp_image(&bytes, catalog, &options)?;
    write_output(&output, &stamped)?;
    pb.finish_with_message("✅ Watermark applied");

    println!("📈 Output size: {} bytes (png)", stamped.len());
    println!("✅ Stamped image written to {:?}", output);

    Ok(())
}
