//! Colour conversions used at the engine's input and output edges.
//!
//! Per-pixel helpers work on plain arrays; image-level helpers wrap them with
//! [`Image::map`]. HSV and CIE conversions go through `palette` without
//! clamping so HDR values survive.
//!
//! Conventions: RGB is linear sRGB (Rec. 709 primaries, D65) unless a gamma
//! is given explicitly; HSV hue is normalized to `[0, 1)`; xyY is stored as
//! `[x, y, Y]`.

use palette::convert::FromColorUnclamped;
use palette::{Hsv, LinSrgb, Srgb, Xyz, Yxy};

use crate::error::TexelError;
use crate::image::{Image, Image3f, Image4b, Image4f};

/// Default display gamma for LDR encodings.
pub const DEFAULT_GAMMA: f32 = 2.2;

// ---------------------------------------------------------------------------
// Per-pixel conversions
// ---------------------------------------------------------------------------

/// Float to byte by scaling with 256 and truncating, so `[0, 1)` maps onto
/// 256 equal-width bins.
pub fn float_to_byte(c: [f32; 4]) -> [u8; 4] {
    c.map(|v| (v * 256.0).clamp(0.0, 255.0) as u8)
}

/// Byte to float in `[0, 1]`.
pub fn byte_to_float(c: [u8; 4]) -> [f32; 4] {
    c.map(|v| v as f32 / 255.0)
}

/// Decode a gamma-encoded colour.
pub fn gamma_to_linear(rgb: [f32; 3], gamma: f32) -> [f32; 3] {
    rgb.map(|v| v.powf(gamma))
}

/// Encode a linear colour with a power curve.
pub fn linear_to_gamma(rgb: [f32; 3], gamma: f32) -> [f32; 3] {
    rgb.map(|v| v.powf(1.0 / gamma))
}

/// Approximate luminance as the channel mean.
pub fn luminance(rgb: [f32; 3]) -> f32 {
    (rgb[0] + rgb[1] + rgb[2]) / 3.0
}

/// RGB to HSV with hue in `[0, 1)`.
pub fn rgb_to_hsv(rgb: [f32; 3]) -> [f32; 3] {
    let hsv: Hsv = Hsv::from_color_unclamped(Srgb::new(rgb[0], rgb[1], rgb[2]));
    [hsv.hue.into_positive_degrees() / 360.0, hsv.saturation, hsv.value]
}

/// HSV (hue in `[0, 1)`) to RGB.
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [f32; 3] {
    let hsv: Hsv = Hsv::new(hsv[0] * 360.0, hsv[1], hsv[2]);
    let rgb = Srgb::from_color_unclamped(hsv);
    [rgb.red, rgb.green, rgb.blue]
}

/// CIE XYZ to `[x, y, Y]`.
pub fn xyz_to_xyy(xyz: [f32; 3]) -> [f32; 3] {
    let yxy: Yxy = Yxy::from_color_unclamped(Xyz::new(xyz[0], xyz[1], xyz[2]));
    [yxy.x, yxy.y, yxy.luma]
}

/// `[x, y, Y]` to CIE XYZ.
pub fn xyy_to_xyz(xyy: [f32; 3]) -> [f32; 3] {
    let xyz: Xyz = Xyz::from_color_unclamped(Yxy::new(xyy[0], xyy[1], xyy[2]));
    [xyz.x, xyz.y, xyz.z]
}

/// CIE XYZ to linear sRGB. Out-of-gamut results are kept.
pub fn xyz_to_rgb(xyz: [f32; 3]) -> [f32; 3] {
    let xyz: Xyz = Xyz::new(xyz[0], xyz[1], xyz[2]);
    let rgb = LinSrgb::from_color_unclamped(xyz);
    [rgb.red, rgb.green, rgb.blue]
}

/// Linear sRGB to CIE XYZ.
pub fn rgb_to_xyz(rgb: [f32; 3]) -> [f32; 3] {
    let xyz: Xyz = Xyz::from_color_unclamped(LinSrgb::new(rgb[0], rgb[1], rgb[2]));
    [xyz.x, xyz.y, xyz.z]
}

/// Fitted ACES filmic curve (Narkowicz 2015), output in `[0, 1]`.
pub fn filmic_tonemap(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|v| {
        let x = v.max(0.0) * 0.6;
        ((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14)).clamp(0.0, 1.0)
    })
}

// ---------------------------------------------------------------------------
// Image conversions
// ---------------------------------------------------------------------------

/// A single channel selector for [`extract_channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
    /// Channel mean of RGB.
    Luminance,
}

/// Convert a byte image to float.
pub fn image_to_float(img: &Image4b) -> Image4f {
    img.map(byte_to_float)
}

/// Convert a float image to bytes.
pub fn image_to_byte(img: &Image4f) -> Image4b {
    img.map(float_to_byte)
}

/// Decode a gamma-encoded image; alpha is left untouched.
pub fn gamma_to_linear_image(img: &Image4f, gamma: f32) -> Image4f {
    img.map(|[r, g, b, a]| {
        let [r, g, b] = gamma_to_linear([r, g, b], gamma);
        [r, g, b, a]
    })
}

/// Gamma-encode a linear image; alpha is left untouched.
pub fn linear_to_gamma_image(img: &Image4f, gamma: f32) -> Image4f {
    img.map(|[r, g, b, a]| {
        let [r, g, b] = linear_to_gamma([r, g, b], gamma);
        [r, g, b, a]
    })
}

/// Add an opaque alpha channel.
pub fn rgb_to_rgba(img: &Image3f) -> Image4f {
    img.map(|[r, g, b]| [r, g, b, 1.0])
}

/// Drop the alpha channel.
pub fn rgba_to_rgb(img: &Image4f) -> Image3f {
    img.map(|[r, g, b, _]| [r, g, b])
}

/// Pull one channel out as a flat row-major buffer.
pub fn extract_channel(img: &Image4f, channel: Channel) -> Vec<f32> {
    img.pixels()
        .iter()
        .map(|&[r, g, b, a]| match channel {
            Channel::Red => r,
            Channel::Green => g,
            Channel::Blue => b,
            Channel::Alpha => a,
            Channel::Luminance => luminance([r, g, b]),
        })
        .collect()
}

/// Expand a single-channel buffer to opaque gray RGBA.
pub fn luminance_to_rgba(width: u32, height: u32, lum: &[f32]) -> Result<Image4f, TexelError> {
    let pixels = lum.iter().map(|&l| [l, l, l, 1.0]).collect();
    Image::from_pixels(width, height, pixels)
}

/// Scale colour by `2^exposure`.
pub fn expose_image(img: &Image4f, exposure: f32) -> Image4f {
    let scale = exposure.exp2();
    img.map(|[r, g, b, a]| [r * scale, g * scale, b * scale, a])
}

/// Apply the filmic curve to every pixel.
pub fn filmic_tonemap_image(img: &Image4f) -> Image4f {
    img.map(|[r, g, b, a]| {
        let [r, g, b] = filmic_tonemap([r, g, b]);
        [r, g, b, a]
    })
}

/// HDR to display: exposure, optional filmic curve, then gamma encoding.
pub fn tonemap_image(img: &Image4f, exposure: f32, gamma: f32, filmic: bool) -> Image4f {
    let scale = exposure.exp2();
    img.map(|[r, g, b, a]| {
        let rgb = [r * scale, g * scale, b * scale];
        let rgb = if filmic { filmic_tonemap(rgb) } else { rgb.map(|v| v.max(0.0)) };
        let [r, g, b] = linear_to_gamma(rgb, gamma);
        [r, g, b, a]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_close3(actual: [f32; 3], expected: [f32; 3], tol: f32) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() <= tol,
                "channel {i}: got {actual:?}, expected {expected:?}"
            );
        }
    }

    #[test]
    fn test_float_to_byte_bins() {
        assert_eq!(float_to_byte([0.0, 0.5, 1.0, -1.0]), [0, 128, 255, 0]);
        assert_eq!(float_to_byte([0.999, 2.0, 0.25, 0.1]), [255, 255, 64, 25]);
    }

    #[test]
    fn test_byte_to_float_endpoints() {
        assert_eq!(byte_to_float([0, 255, 0, 255]), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_gamma_roundtrip() {
        let rgb = [0.2, 0.5, 0.9];
        let back = linear_to_gamma(gamma_to_linear(rgb, 2.2), 2.2);
        assert_close3(back, rgb, EPSILON);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_close3(rgb_to_hsv([1.0, 0.0, 0.0]), [0.0, 1.0, 1.0], EPSILON);
        assert_close3(rgb_to_hsv([0.0, 1.0, 0.0]), [1.0 / 3.0, 1.0, 1.0], EPSILON);
        assert_close3(hsv_to_rgb([2.0 / 3.0, 1.0, 0.5]), [0.0, 0.0, 0.5], EPSILON);
    }

    #[test]
    fn test_hsv_roundtrip() {
        let rgb = [0.8, 0.4, 0.2];
        assert_close3(hsv_to_rgb(rgb_to_hsv(rgb)), rgb, EPSILON);
    }

    #[test]
    fn test_hsv_keeps_hdr_values() {
        let hsv = rgb_to_hsv([2.0, 1.0, 0.5]);
        assert_close3(hsv, [20.0 / 360.0, 0.75, 2.0], EPSILON);
        assert_close3(hsv_to_rgb(hsv), [2.0, 1.0, 0.5], EPSILON);
        assert_close3(hsv_to_rgb([0.0, 0.5, 3.0]), [3.0, 1.5, 1.5], EPSILON);
    }

    #[test]
    fn test_white_maps_to_d65() {
        let xyz = rgb_to_xyz([1.0, 1.0, 1.0]);
        assert_close3(xyz, [0.9505, 1.0, 1.089], 2e-3);
        let xyy = xyz_to_xyy(xyz);
        assert!((xyy[0] - 0.3127).abs() < 1e-3 && (xyy[1] - 0.3290).abs() < 1e-3);
    }

    #[test]
    fn test_xyz_roundtrips_keep_hdr() {
        let rgb = [4.0, 2.5, 0.75];
        assert_close3(xyz_to_rgb(rgb_to_xyz(rgb)), rgb, 1e-3);
        let xyz = [0.4, 0.35, 0.2];
        assert_close3(xyy_to_xyz(xyz_to_xyy(xyz)), xyz, EPSILON);
    }

    #[test]
    fn test_filmic_is_bounded_and_monotonic() {
        let mut prev = -1.0;
        for i in 0..200 {
            let v = filmic_tonemap([i as f32 * 0.25; 3])[0];
            assert!((0.0..=1.0).contains(&v));
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_extract_channel() {
        let img = Image::new(2, 1, [0.3, 0.6, 0.9, 0.5]).unwrap();
        assert_eq!(extract_channel(&img, Channel::Alpha), vec![0.5, 0.5]);
        let lum = extract_channel(&img, Channel::Luminance);
        assert!((lum[0] - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_luminance_to_rgba_checks_length() {
        assert!(luminance_to_rgba(2, 2, &[0.5; 3]).is_err());
        let img = luminance_to_rgba(2, 1, &[0.25, 0.75]).unwrap();
        assert_eq!(img.at(1, 0), [0.75, 0.75, 0.75, 1.0]);
    }

    #[test]
    fn test_tonemap_exposure_doubles_before_gamma() {
        let img = Image::new(1, 1, [0.25, 0.25, 0.25, 1.0]).unwrap();
        let out = tonemap_image(&img, 1.0, 1.0, false);
        assert_eq!(out.at(0, 0), [0.5, 0.5, 0.5, 1.0]);
    }
}
