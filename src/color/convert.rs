//! 8-bit color space conversions
//!
//! Converts between blue-green-red pixels and the YCrCb, HSV, and Lab
//! encodings in the integer conventions the pretrained classifiers were
//! trained against: hue in [0, 180), saturation and value in [0, 255],
//! lightness rescaled to [0, 255] with a and b offset by +128, chroma
//! channels offset by +128. These conventions are a frozen contract;
//! perceptual color types for display come from the `palette` crate
//! instead (see [`bgr_to_srgb`] and [`bgr_hex`]).

use palette::Srgb;

/// Convert a BGR pixel to YCrCb (full-range, 8-bit offsets).
pub fn bgr_to_ycrcb(bgr: [u8; 3]) -> [u8; 3] {
    let b = bgr[0] as f32;
    let g = bgr[1] as f32;
    let r = bgr[2] as f32;

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;

    [clamp_u8(y), clamp_u8(cr), clamp_u8(cb)]
}

/// Convert a YCrCb pixel back to BGR.
pub fn ycrcb_to_bgr(ycrcb: [u8; 3]) -> [u8; 3] {
    let y = ycrcb[0] as f32;
    let cr = ycrcb[1] as f32 - 128.0;
    let cb = ycrcb[2] as f32 - 128.0;

    let r = y + 1.403 * cr;
    let g = y - 0.714 * cr - 0.344 * cb;
    let b = y + 1.773 * cb;

    [clamp_u8(b), clamp_u8(g), clamp_u8(r)]
}

/// Convert a BGR pixel to 8-bit HSV with hue halved into [0, 180).
pub fn bgr_to_hsv(bgr: [u8; 3]) -> [u8; 3] {
    let b = bgr[0] as f32;
    let g = bgr[1] as f32;
    let r = bgr[2] as f32;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    let mut h8 = (h / 2.0).round() as i32;
    if h8 >= 180 {
        h8 -= 180;
    }

    [h8 as u8, clamp_u8(s), clamp_u8(v)]
}

/// Convert an 8-bit HSV pixel (hue in [0, 180)) back to BGR.
pub fn hsv_to_bgr(hsv: [u8; 3]) -> [u8; 3] {
    let h = hsv[0] as f32 * 2.0;
    let s = hsv[1] as f32 / 255.0;
    let v = hsv[2] as f32 / 255.0;

    let c = v * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [
        clamp_u8((b + m) * 255.0),
        clamp_u8((g + m) * 255.0),
        clamp_u8((r + m) * 255.0),
    ]
}

/// Convert a BGR pixel to 8-bit CIE Lab under D65.
///
/// Channels are rescaled to the 8-bit layout: L in [0, 255] (L* scaled by
/// 255/100), a and b offset by +128.
pub fn bgr_to_lab(bgr: [u8; 3]) -> [u8; 3] {
    let b = bgr[0] as f32 / 255.0;
    let g = bgr[1] as f32 / 255.0;
    let r = bgr[2] as f32 / 255.0;

    // sRGB primaries, D65 white point
    let x = 0.412453 * r + 0.357580 * g + 0.180423 * b;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = 0.019334 * r + 0.119193 * g + 0.950227 * b;

    let xn = x / 0.950456;
    let zn = z / 1.088754;

    let l = if y > 0.008856 {
        116.0 * y.cbrt() - 16.0
    } else {
        903.3 * y
    };
    let a = 500.0 * (lab_f(xn) - lab_f(y)) + 128.0;
    let bb = 200.0 * (lab_f(y) - lab_f(zn)) + 128.0;

    [clamp_u8(l * 255.0 / 100.0), clamp_u8(a), clamp_u8(bb)]
}

fn lab_f(t: f32) -> f32 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Display-space color for a BGR pixel.
pub fn bgr_to_srgb(bgr: [u8; 3]) -> Srgb {
    Srgb::new(
        bgr[2] as f32 / 255.0,
        bgr[1] as f32 / 255.0,
        bgr[0] as f32 / 255.0,
    )
}

/// Hexadecimal color string for a BGR pixel (e.g., "#FF0000").
pub fn bgr_hex(bgr: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", bgr[2], bgr[1], bgr[0])
}
