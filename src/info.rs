use crate::catalog::AssetCatalog;
use crate::constants::DEFAULT_STAMP_SIZE;
use crate::decode;
use crate::error::Result;
use crate::sizing;
use crate::stamp;
use image::GenericImageView;
use std::path::Path;

/// Print what the stamper would do with an image, without writing
/// anything: detected format, dimensions, and the stamp that selection
/// would pick for it.
pub fn get_image_info(input_path: &Path, catalog: &dyn AssetCatalog) -> Result<()> {
    println!("📊 Analyzing image: {:?}", input_path);

    let (bytes, file_size) = stamp::load_source_bytes(input_path)?;
    let (img, format) = decode::decode_image(&bytes)?;
    let (width, height) = img.dimensions();

    println!("📋 Basic Information:");
    println!("  📁 File: {:?}", input_path);
    println!("  📏 Dimensions: {}x{} pixels", width, height);
    println!("  📦 File size: {} bytes", file_size);
    println!("  🎨 Color type: {:?}", img.color());
    println!("  🎭 Image format: {}", format);

    let size_kb = file_size as f64 / 1024.0;
    let size_mb = size_kb / 1024.0;
    if size_mb >= 1.0 {
        println!("  📊 Size: {:.2} MB ({:.2} KB)", size_mb, size_kb);
    } else {
        println!("  📊 Size: {:.2} KB", size_kb);
    }

    let total_pixels = u64::from(width) * u64::from(height);
    let aspect_ratio = f64::from(width) / f64::from(height);
    println!("  🔢 Total pixels: {}", total_pixels);
    println!("  📐 Aspect ratio: {:.2}:1", aspect_ratio);

    let size_tag = sizing::select_stamp_size(width, height);
    let anchor_x = i64::from(width) - i64::from(size_tag);
    let anchor_y = i64::from(height) - i64::from(size_tag);

    println!("\n🖋️  Stamp Selection:");
    println!("  🏷️  Selected stamp size: {}px", size_tag);
    if catalog.get(size_tag).is_some() {
        println!("  ✅ Catalog carries this size");
    } else {
        println!(
            "  ⚠️  Catalog is missing this size, default {}px would be used",
            DEFAULT_STAMP_SIZE
        );
    }
    println!("  📍 Stamp anchor (top-left): ({}, {})", anchor_x, anchor_y);
    if anchor_x < 0 || anchor_y < 0 {
        println!("  ⚠️  Stamp is larger than the image and would be cropped");
    }

    Ok(())
}
