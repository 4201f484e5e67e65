use crate::catalog::AssetCatalog;
use crate::constants::{
    LARGE_IMAGE_THRESHOLD_MIB, MAX_BATCH_FILES, MAX_BATCH_MEMORY_MIB, MAX_CONCURRENT_LARGE_IMAGES,
    MIN_AVAILABLE_MEMORY_MIB, TRANSFORM_PREFIX,
};
use crate::error::{Result, StampError};
use crate::stamp::{stamp_file_pipeline, StampOptions};
use glob::glob;
use image::ImageReader;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};
use tracing::debug;
use walkdir::WalkDir;

/// Estimates peak memory for stamping one image without decoding it.
///
/// The decoded source and the composite canvas are the two big
/// allocations, each `width * height * 4` bytes. Dimensions come from
/// the file header; when the header is unreadable the estimate falls
/// back to a multiple of the file size.
fn estimate_stamp_memory_usage(file_path: &Path) -> Result<f64> {
    const MIB: f64 = 1024.0 * 1024.0;

    let metadata = fs::metadata(file_path)?;
    let file_size_mib = metadata.len() as f64 / MIB;

    let header_dims = ImageReader::open(file_path)
        .ok()
        .and_then(|reader| reader.with_guessed_format().ok())
        .and_then(|reader| reader.into_dimensions().ok());

    let estimate = match header_dims {
        Some((width, height)) => {
            let raster_mib = f64::from(width) * f64::from(height) * 4.0 / MIB;
            raster_mib * 2.0 + file_size_mib
        }
        None => file_size_mib * 4.0,
    };
    Ok(estimate)
}

/// Validates batch limits before any pixel work starts.
///
/// # Returns
/// * `Ok((total_memory_mib, large_image_count))` - Estimated usage and count of large images
/// * `Err(StampError)` - If file count or memory limits would be exceeded
fn validate_batch_limits(image_files: &[PathBuf]) -> Result<(f64, usize)> {
    if image_files.len() > MAX_BATCH_FILES {
        return Err(StampError::BatchFileLimitExceeded(
            image_files.len(),
            MAX_BATCH_FILES,
        ));
    }

    let mut total_memory_mib = 0.0;
    let mut large_image_count = 0;

    for file_path in image_files {
        let memory_estimate = estimate_stamp_memory_usage(file_path)?;
        total_memory_mib += memory_estimate;

        if memory_estimate > LARGE_IMAGE_THRESHOLD_MIB {
            large_image_count += 1;
        }
    }

    let total_memory_mib_u64 = total_memory_mib.ceil() as u64;
    if total_memory_mib_u64 > MAX_BATCH_MEMORY_MIB {
        return Err(StampError::BatchMemoryLimitExceeded(
            total_memory_mib_u64,
            MAX_BATCH_MEMORY_MIB,
        ));
    }

    // sysinfo 0.30+ returns bytes. Convert to MiB.
    let mut sys =
        System::new_with_specifics(RefreshKind::new().with_memory(MemoryRefreshKind::new()));
    sys.refresh_memory();
    let available_mem_mib = sys.available_memory() / (1024 * 1024);
    let required_with_buffer = total_memory_mib_u64 + MIN_AVAILABLE_MEMORY_MIB;
    if required_with_buffer > available_mem_mib {
        return Err(StampError::InsufficientMemory(
            total_memory_mib_u64,
            available_mem_mib,
        ));
    }

    Ok((total_memory_mib, large_image_count))
}

/// Pick a thread count the batch can afford: bounded by cores, by the
/// large-image cap, and by how many average-sized files fit in the
/// memory that is actually free.
fn derive_parallelism(
    total_files: usize,
    estimated_memory_mib: f64,
    large_image_count: usize,
) -> usize {
    let baseline = num_cpus::get().min(total_files).max(1);
    let large_cap = if large_image_count >= MAX_CONCURRENT_LARGE_IMAGES {
        MAX_CONCURRENT_LARGE_IMAGES
    } else {
        baseline
    };

    let mut sys =
        System::new_with_specifics(RefreshKind::new().with_memory(MemoryRefreshKind::new()));
    sys.refresh_memory();
    let available_mem_mib = sys.available_memory() / (1024 * 1024);
    let avg_per_file_mib = ((estimated_memory_mib / total_files as f64).ceil() as u64).max(1);
    let mem_cap = ((available_mem_mib.saturating_sub(MIN_AVAILABLE_MEMORY_MIB)) / avg_per_file_mib)
        .clamp(1, baseline as u64) as usize;

    large_cap.min(mem_cap)
}

pub fn batch_stamp_images(
    input: String,
    output: PathBuf,
    options: StampOptions,
    recursive: bool,
    catalog: &dyn AssetCatalog,
) -> Result<()> {
    println!("🚀 Starting batch stamping...");
    println!("📁 Input: {}", input);
    println!("📁 Output: {:?}", output);

    let start_time = Instant::now();

    let image_files = collect_image_files(&input, recursive)?;
    let total_files = image_files.len();

    if total_files == 0 {
        println!("⚠️  No image files found in the input path");
        return Ok(());
    }

    println!("📊 Found {} image files to process", total_files);

    println!("🔍 Validating batch memory requirements...");
    let (estimated_memory_mib, large_image_count) = validate_batch_limits(&image_files)?;

    println!("📊 Batch validation complete:");
    println!("  📁 Total files: {}", total_files);
    println!("  💾 Estimated memory usage: {:.1} MiB", estimated_memory_mib);
    println!(
        "  📏 Large images (>{}MiB): {}",
        LARGE_IMAGE_THRESHOLD_MIB, large_image_count
    );

    let max_parallelism = derive_parallelism(total_files, estimated_memory_mib, large_image_count);
    println!(
        "⚙️  Using {} parallel threads for processing",
        max_parallelism
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_parallelism)
        .build()
        .expect("Failed to build Rayon thread pool");

    fs::create_dir_all(&output)
        .map_err(|_| StampError::DirectoryCreationFailed(output.clone()))?;

    let main_progress = ProgressBar::new(total_files as u64);
    main_progress.set_style(ProgressStyle::default_bar());

    let processed_count = Arc::new(AtomicUsize::new(0));
    let total_size_before = Arc::new(AtomicU64::new(0));
    let total_size_after = Arc::new(AtomicU64::new(0));

    let results: Vec<Result<()>> = pool.install(|| {
        image_files
            .into_par_iter()
            .map(|input_path| {
                let progress = main_progress.clone();
                let processed_count = processed_count.clone();
                let total_size_before = total_size_before.clone();
                let total_size_after = total_size_after.clone();

                match process_single_image(&input_path, &output, catalog, &options) {
                    Ok((before_size, after_size)) => {
                        total_size_before.fetch_add(before_size, Ordering::Relaxed);
                        total_size_after.fetch_add(after_size, Ordering::Relaxed);
                        processed_count.fetch_add(1, Ordering::Relaxed);
                        progress.inc(1);
                        Ok(())
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to process {:?}: {}", input_path, e);
                        progress.inc(1);
                        Err(e)
                    }
                }
            })
            .collect()
    });

    main_progress.finish_with_message("✅ Batch stamping complete");

    let total_before = total_size_before.load(Ordering::Relaxed);
    let total_after = total_size_after.load(Ordering::Relaxed);
    let elapsed_time = start_time.elapsed();
    let processed = processed_count.load(Ordering::Relaxed);

    println!("\n📊 Batch Stamping Summary:");
    println!("  📁 Total files processed: {}", processed);
    println!("  📊 Total source size: {} bytes", total_before);
    println!("  📊 Total stamped size: {} bytes", total_after);
    println!("  ⏱️  Total time: {:?}", elapsed_time);
    println!(
        "  ⚡ Average speed: {:.2} files/second",
        processed as f64 / elapsed_time.as_secs_f64()
    );

    let failed_count = results.iter().filter(|r| r.is_err()).count();
    if failed_count > 0 {
        println!("  ⚠️  Failed files: {}", failed_count);
    }

    Ok(())
}

pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    let input_path = Path::new(input);
    let canonical_input = if input_path.exists() {
        input_path
            .canonicalize()
            .map_err(|_| StampError::NoImageFilesFound(input.to_string()))?
    } else {
        input_path.to_path_buf()
    };

    if canonical_input.exists() && canonical_input.is_file() {
        image_files.push(canonical_input);
    } else if canonical_input.exists() && canonical_input.is_dir() {
        let walker = if recursive {
            WalkDir::new(&canonical_input).into_iter()
        } else {
            WalkDir::new(&canonical_input).max_depth(1).into_iter()
        };

        for entry in walker.filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.')) {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && is_image_file(path) && !is_stamped_artifact(path) {
                if let Ok(canonical_path) = path.canonicalize() {
                    image_files.push(canonical_path);
                }
            }
        }
    } else if let Ok(glob_pattern) = glob(input) {
        for entry in glob_pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) && !is_stamped_artifact(&entry) {
                if let Ok(canonical_path) = entry.canonicalize() {
                    image_files.push(canonical_path);
                }
            }
        }
    } else {
        return Err(StampError::NoImageFilesFound(input.to_string()));
    }

    debug!(count = image_files.len(), input, "collected image files");
    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            matches!(
                ext.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tiff" | "gif"
            )
        })
        .unwrap_or(false)
}

/// Whether a file name marks output this pipeline already produced.
/// Re-running a batch over its own output directory must not stamp
/// artifacts a second time.
pub fn is_stamped_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.contains(TRANSFORM_PREFIX))
        .unwrap_or(false)
}

fn process_single_image(
    input_path: &Path,
    output_dir: &Path,
    catalog: &dyn AssetCatalog,
    options: &StampOptions,
) -> Result<(u64, u64)> {
    let output_path = generate_output_path(input_path, output_dir)?;
    stamp_file_pipeline(input_path, &output_path, catalog, options)
}

/// Output file name for a stamped image: the transform prefix plus the
/// full source file name. The name keeps the source extension even
/// though the bytes are always PNG, matching how transformed objects
/// are keyed in a store.
pub fn generate_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = input_path
        .file_name()
        .ok_or_else(|| StampError::UnsupportedFormat("Invalid file name".to_string()))?;

    let output_filename = format!("{}{}", TRANSFORM_PREFIX, file_name.to_string_lossy());
    Ok(output_dir.join(output_filename))
}
