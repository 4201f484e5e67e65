use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

/// Composite a stamp into the bottom-right corner of a source image.
///
/// The source is copied verbatim onto a fresh RGBA canvas of the same
/// bounds, then the stamp is alpha-blended over the rectangle whose
/// bottom-right corner coincides with the canvas's bottom-right corner.
/// A stamp wider or taller than the canvas is cropped to the overlap.
pub fn composite(source: &DynamicImage, stamp: &RgbaImage) -> RgbaImage {
    let mut canvas = source.to_rgba8();
    let origin_x = i64::from(canvas.width()) - i64::from(stamp.width());
    let origin_y = i64::from(canvas.height()) - i64::from(stamp.height());
    debug!(
        canvas_width = canvas.width(),
        canvas_height = canvas.height(),
        stamp_width = stamp.width(),
        stamp_height = stamp.height(),
        origin_x,
        origin_y,
        "drawing stamp"
    );
    draw_over(&mut canvas, stamp, origin_x, origin_y);
    canvas
}

/// Alpha-blend `stamp` onto `target` with its top-left corner at
/// `(origin_x, origin_y)`. The origin may lie outside the target; only
/// the intersection of the two rectangles is touched.
pub fn draw_over(target: &mut RgbaImage, stamp: &RgbaImage, origin_x: i64, origin_y: i64) {
    let x_start = origin_x.max(0);
    let y_start = origin_y.max(0);
    let x_end = (origin_x + i64::from(stamp.width())).min(i64::from(target.width()));
    let y_end = (origin_y + i64::from(stamp.height())).min(i64::from(target.height()));

    if x_start >= x_end || y_start >= y_end {
        debug!(origin_x, origin_y, "stamp rectangle does not intersect target");
        return;
    }

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let sx = (tx - origin_x) as u32;
            let sy = (ty - origin_y) as u32;
            let background = *target.get_pixel(tx as u32, ty as u32);
            let foreground = *stamp.get_pixel(sx, sy);
            target.put_pixel(tx as u32, ty as u32, blend_over(background, foreground));
        }
    }
}

/// Standard "over" operator: the foreground's alpha decides how much of
/// the background shows through.
fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = f32::from(foreground[3]) / 255.0;
    let bg_alpha = f32::from(background[3]) / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |fg: u8, bg: u8| -> u8 {
        let fg = f32::from(fg) / 255.0;
        let bg = f32::from(bg) / 255.0;
        let out = (fg * fg_alpha + bg * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(foreground[0], background[0]),
        channel(foreground[1], background[1]),
        channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
