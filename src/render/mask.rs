use crate::render::backend::Bitmap;

/// Clear the corners of `bitmap` outside a rounded rectangle of `radius_px`.
///
/// Coverage is antialiased over one pixel. Pixels are premultiplied, so all four channels are
/// scaled by coverage. The radius is clamped to half the shorter side.
pub fn round_corners(bitmap: &mut Bitmap, radius_px: f64) {
    let (w, h) = (f64::from(bitmap.width), f64::from(bitmap.height));
    let r = radius_px.min(w / 2.0).min(h / 2.0);
    if !r.is_finite() || r <= 0.0 {
        return;
    }
    let span = r.ceil() as u32;
    let width = bitmap.width as usize;

    for y in 0..bitmap.height {
        let in_band = y < span || y >= bitmap.height.saturating_sub(span);
        if !in_band {
            continue;
        }
        for x in 0..bitmap.width {
            let coverage = corner_coverage(f64::from(x) + 0.5, f64::from(y) + 0.5, w, h, r);
            if coverage >= 1.0 {
                continue;
            }
            let i = (y as usize * width + x as usize) * 4;
            for c in &mut bitmap.data[i..i + 4] {
                *c = (f64::from(*c) * coverage).round() as u8;
            }
        }
    }
}

/// Coverage of the pixel centred at `(px, py)` by the rounded rectangle `(0, 0, w, h)`.
fn corner_coverage(px: f64, py: f64, w: f64, h: f64, r: f64) -> f64 {
    let cx = if px < r {
        r
    } else if px > w - r {
        w - r
    } else {
        return 1.0;
    };
    let cy = if py < r {
        r
    } else if py > h - r {
        h - r
    } else {
        return 1.0;
    };
    let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
    (r - dist + 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
