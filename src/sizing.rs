use crate::constants::{
    MAX_EDGE_EXPONENT, MAX_SELECTED_STAMP_SIZE, MIN_SELECTED_STAMP_SIZE, STAMP_SIZES,
};

/// Pick the stamp edge length for a source image of the given dimensions.
///
/// The choice follows the longer edge: one step below its power-of-two
/// magnitude, clamped into the 32..=256 range. A 4096x2048 photo gets the
/// 256px stamp, a 50x50 thumbnail the 32px one. Selection is monotonic,
/// larger sources never get a smaller stamp.
pub fn select_stamp_size(width: u32, height: u32) -> u32 {
    let max_edge = width.max(height).max(1);
    let edge_log = i64::from(max_edge.ilog2()) - 1;
    let exponent = edge_log.clamp(0, i64::from(MAX_EDGE_EXPONENT)) as u32;
    (1u32 << exponent).clamp(MIN_SELECTED_STAMP_SIZE, MAX_SELECTED_STAMP_SIZE)
}

/// Whether a size tag names an edge length the packaged catalog is
/// expected to carry.
pub fn is_catalog_size(size_tag: u32) -> bool {
    STAMP_SIZES.contains(&size_tag)
}
