//! Color values and the blends used between phenology phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Rgb::new(value[0], value[1], value[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// How a species blends between two phase colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    /// Hue/lightness/saturation blend along the shortest hue path
    Hsl,
    /// Per-channel linear blend, truncated to integers
    Rgb,
}

impl BlendMode {
    pub fn interp(self, from: Rgb, to: Rgb, progress: f64) -> Rgb {
        match self {
            BlendMode::Hsl => interp_hsl(from, to, progress),
            BlendMode::Rgb => interp_rgb(from, to, progress),
        }
    }
}

/// Fraction of the way `value` is from `start` to `end`, clamped to [0, 1].
///
/// A zero-width window is a step: 1 at or past `start`, 0 before it.
pub fn calc_progress(value: f64, start: f64, end: f64) -> f64 {
    if start == end {
        return if value >= start { 1.0 } else { 0.0 };
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

/// Convert RGB components in [0, 1] to (hue, lightness, saturation), all in [0, 1].
pub fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let sumc = maxc + minc;
    let rangec = maxc - minc;
    let l = sumc / 2.0;
    if rangec == 0.0 {
        return (0.0, l, 0.0);
    }
    let s = if l <= 0.5 {
        rangec / sumc
    } else {
        rangec / (2.0 - maxc - minc)
    };
    let rc = (maxc - r) / rangec;
    let gc = (maxc - g) / rangec;
    let bc = (maxc - b) / rangec;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

/// Inverse of [`rgb_to_hls`].
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Blend in hue/lightness/saturation space, taking the shorter way around the hue circle.
///
/// Progress at or below 0 returns `from` and at or above 1 returns `to`.
pub fn interp_hsl(from: Rgb, to: Rgb, progress: f64) -> Rgb {
    if progress.is_nan() || progress <= 0.0 {
        return from;
    }
    if progress >= 1.0 {
        return to;
    }
    let (mut h1, l1, s1) = rgb_to_hls(
        from.r as f64 / 255.0,
        from.g as f64 / 255.0,
        from.b as f64 / 255.0,
    );
    let (mut h2, l2, s2) = rgb_to_hls(to.r as f64 / 255.0, to.g as f64 / 255.0, to.b as f64 / 255.0);
    if (h1 - h2).abs() > 0.5 {
        if h1 > h2 {
            h2 += 1.0;
        } else {
            h1 += 1.0;
        }
    }
    let h = (h1 + (h2 - h1) * progress).rem_euclid(1.0);
    let l = l1 + (l2 - l1) * progress;
    let s = s1 + (s2 - s1) * progress;
    let (r, g, b) = hls_to_rgb(h, l, s);
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Per-channel linear blend, truncating toward zero.
pub fn interp_rgb(from: Rgb, to: Rgb, progress: f64) -> Rgb {
    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let channel = |a: u8, b: u8| -> u8 {
        let a = a as f64;
        let b = b as f64;
        (a + (b - a) * t).clamp(0.0, 255.0) as u8
    };
    Rgb::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb = Rgb::new(34, 139, 34);
    const RED: Rgb = Rgb::new(220, 20, 60);
    const GOLD: Rgb = Rgb::new(240, 190, 40);

    #[test]
    fn test_hsl_endpoints_are_exact() {
        assert_eq!(interp_hsl(GREEN, RED, 0.0), GREEN);
        assert_eq!(interp_hsl(GREEN, RED, 1.0), RED);
        assert_eq!(interp_hsl(GREEN, RED, -0.5), GREEN);
        assert_eq!(interp_hsl(GREEN, RED, 7.0), RED);
    }

    #[test]
    fn test_hls_round_trip() {
        for color in [GREEN, RED, GOLD, Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)] {
            let (h, l, s) = rgb_to_hls(
                color.r as f64 / 255.0,
                color.g as f64 / 255.0,
                color.b as f64 / 255.0,
            );
            let (r, g, b) = hls_to_rgb(h, l, s);
            assert_eq!(Rgb::new(to_channel(r), to_channel(g), to_channel(b)), color);
        }
    }

    #[test]
    fn test_green_to_red_passes_through_warm_hues() {
        // A flat blend of green and crimson goes muddy; the hue path goes through yellow.
        let mid = interp_hsl(GREEN, RED, 0.5);
        assert!(mid.r > mid.b && mid.g > mid.b, "{mid}");
    }

    #[test]
    fn test_hue_takes_short_way_around() {
        // Crimson (hue ~0.97) to orange (hue ~0.05) should not sweep through green or blue.
        let orange = Rgb::new(255, 69, 0);
        let mid = interp_hsl(RED, orange, 0.5);
        assert!(mid.r > 200 && mid.g < 60, "{mid}");
    }

    #[test]
    fn test_grey_blends_keep_lightness() {
        let mid = interp_hsl(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), 0.5);
        assert_eq!(mid, Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_rgb_blend_truncates() {
        assert_eq!(
            interp_rgb(Rgb::new(0, 0, 0), Rgb::new(100, 100, 100), 0.5),
            Rgb::new(50, 50, 50)
        );
        assert_eq!(interp_rgb(GREEN, RED, 0.0), GREEN);
        assert_eq!(interp_rgb(GREEN, RED, 1.0), RED);
        // 34 + 26 * 0.48 = 46.48
        assert_eq!(interp_rgb(GREEN, RED, 0.48).b, 46);
    }

    #[test]
    fn test_calc_progress() {
        assert_eq!(calc_progress(150.0, 100.0, 200.0), 0.5);
        assert_eq!(calc_progress(50.0, 100.0, 200.0), 0.0);
        assert_eq!(calc_progress(250.0, 100.0, 200.0), 1.0);
        assert_eq!(calc_progress(100.0, 100.0, 100.0), 1.0);
        assert_eq!(calc_progress(99.0, 100.0, 100.0), 0.0);
    }

    #[test]
    fn test_hex_format() {
        assert_eq!(RED.to_hex(), "#dc143c");
    }
}
