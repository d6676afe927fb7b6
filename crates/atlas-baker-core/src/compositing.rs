use image::RgbaImage;

/// Copy `src` unscaled onto `canvas` with its top-left at (dx, dy).
/// Pixels that would land outside the canvas are dropped.
///
/// Not idempotent in intent: the build draws each canonical image exactly
/// once, so the one-pixel border reserved around it stays blank.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(xx, yy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}
