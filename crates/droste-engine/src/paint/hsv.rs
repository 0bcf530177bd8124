//! RGB <-> HSV conversion for the hue/saturation cycling tools.
//!
//! All three HSV components are in `[0, 1]`; hue wraps.

/// Converts 8-bit RGB to `(hue, saturation, value)`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let rf = r as f32 / 255.0;
    let gf = g as f32 / 255.0;
    let bf = b as f32 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    if delta == 0.0 {
        return (0.0, s, v);
    }

    let sector = if max == rf {
        ((gf - bf) / delta).rem_euclid(6.0)
    } else if max == gf {
        (bf - rf) / delta + 2.0
    } else {
        (rf - gf) / delta + 4.0
    };

    (sector / 6.0, s, v)
}

/// Converts `(hue, saturation, value)` to 8-bit RGB, rounding each channel.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    if s <= 0.0 {
        let c = to_u8(v);
        return (c, c, c);
    }

    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    (to_u8(r), to_u8(g), to_u8(b))
}

#[inline]
fn to_u8(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    // ── rgb_to_hsv ────────────────────────────────────────────────────────

    #[test]
    fn primaries() {
        let (h, s, v) = rgb_to_hsv(255, 0, 0);
        assert!(close(h, 0.0) && close(s, 1.0) && close(v, 1.0));

        let (h, _, _) = rgb_to_hsv(0, 255, 0);
        assert!(close(h, 1.0 / 3.0));

        let (h, _, _) = rgb_to_hsv(0, 0, 255);
        assert!(close(h, 2.0 / 3.0));
    }

    #[test]
    fn magenta_hue_is_positive() {
        let (h, _, _) = rgb_to_hsv(255, 0, 255);
        assert!(close(h, 5.0 / 6.0));
    }

    #[test]
    fn grey_has_no_saturation() {
        let (h, s, v) = rgb_to_hsv(128, 128, 128);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!(close(v, 128.0 / 255.0));
    }

    #[test]
    fn black_is_all_zero() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0.0, 0.0, 0.0));
    }

    // ── hsv_to_rgb ────────────────────────────────────────────────────────

    #[test]
    fn round_trips_default_screen_tint() {
        let (h, s, v) = rgb_to_hsv(66, 135, 245);
        assert_eq!(hsv_to_rgb(h, s, v), (66, 135, 245));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(-0.5, 1.0, 1.0), hsv_to_rgb(0.5, 1.0, 1.0));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.5), (128, 128, 128));
    }
}
