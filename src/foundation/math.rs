/// Absolute tolerance used when comparing accumulated floating point fractions.
pub(crate) const FRACTION_EPS: f64 = 1e-9;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Convert premultiplied RGBA8 pixels to straight alpha in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Degrees measured clockwise from 12 o'clock to kurbo radians (y down, 0 at 3 o'clock).
pub(crate) fn clock_deg_to_screen_rad(deg: f64) -> f64 {
    (deg - 90.0).to_radians()
}

/// Degrees measured clockwise from 12 o'clock to math-convention radians (y up, CCW).
pub(crate) fn clock_deg_to_math_rad(deg: f64) -> f64 {
    (90.0 - deg).to_radians()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
