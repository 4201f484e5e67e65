pub const STAMP_SIZES: [u32; 5] = [16, 32, 64, 128, 256];
pub const DEFAULT_STAMP_SIZE: u32 = 16;

pub const MIN_SELECTED_STAMP_SIZE: u32 = 32;
pub const MAX_SELECTED_STAMP_SIZE: u32 = 256;
pub const MAX_EDGE_EXPONENT: u32 = 8;

pub const TRANSFORM_PREFIX: &str = "xformed_";

pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_PIXEL_COUNT: u64 = 64_000_000;

pub const PNG_OPTIMIZE_PRESET: u8 = 2;

pub const MAX_BATCH_FILES: usize = 10_000;
pub const MAX_BATCH_MEMORY_MIB: u64 = 8_192;
pub const MIN_AVAILABLE_MEMORY_MIB: u64 = 512;
pub const LARGE_IMAGE_THRESHOLD_MIB: f64 = 256.0;
pub const MAX_CONCURRENT_LARGE_IMAGES: usize = 2;

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
