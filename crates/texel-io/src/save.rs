//! Image saving.
//!
//! The output format follows the file extension. Float images written to an
//! HDR extension keep their linear values; everything else is gamma-encoded
//! and quantized to 8 bits first.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb32FImage, RgbaImage};
use texel_core::color::{
    DEFAULT_GAMMA, byte_to_float, float_to_byte, gamma_to_linear, linear_to_gamma, rgb_to_rgba,
};
use texel_core::{Image3f, Image4b, Image4f};

use crate::error::IoError;
use crate::load::is_hdr_filename;

/// Save an 8-bit image. An HDR extension stores the pixels decoded with
/// gamma 2.2.
pub fn save_image4b(path: impl AsRef<Path>, img: &Image4b) -> Result<(), IoError> {
    let path = path.as_ref();
    if is_hdr_filename(path) {
        tracing::warn!("saving 8-bit image to float format {}", path.display());
        let linear = img.map(|px| {
            let [r, g, b, a] = byte_to_float(px);
            let [r, g, b] = gamma_to_linear([r, g, b], DEFAULT_GAMMA);
            [r, g, b, a]
        });
        return write_float(path, &linear);
    }
    write_bytes(path, img)
}

/// Save a float image. HDR extensions keep linear values; LDR formats are
/// encoded with `ldr_gamma` and quantized.
pub fn save_image4f(
    path: impl AsRef<Path>,
    img: &Image4f,
    ldr_gamma: f32,
) -> Result<(), IoError> {
    let path = path.as_ref();
    if is_hdr_filename(path) {
        return write_float(path, img);
    }
    let bytes = img.map(|[r, g, b, a]| {
        let [r, g, b] = linear_to_gamma([r, g, b], ldr_gamma);
        float_to_byte([r, g, b, a])
    });
    write_bytes(path, &bytes)
}

/// Save an RGB float image as opaque RGBA.
pub fn save_image3f(
    path: impl AsRef<Path>,
    img: &Image3f,
    ldr_gamma: f32,
) -> Result<(), IoError> {
    save_image4f(path, &rgb_to_rgba(img), ldr_gamma)
}

fn format_of(path: &Path) -> Result<ImageFormat, IoError> {
    ImageFormat::from_path(path)
        .map_err(|_| IoError::Unsupported(format!("no image format for {}", path.display())))
}

fn write_bytes(path: &Path, img: &Image4b) -> Result<(), IoError> {
    let format = format_of(path)?;
    let buf = RgbaImage::from_raw(img.width(), img.height(), img.as_bytes().to_vec())
        .ok_or_else(|| IoError::Unsupported("pixel buffer does not match its size".into()))?;
    let dynamic = DynamicImage::ImageRgba8(buf);
    if format == ImageFormat::Jpeg {
        tracing::warn!("dropping alpha for {}", path.display());
        DynamicImage::ImageRgb8(dynamic.to_rgb8()).save_with_format(path, format)?;
    } else {
        dynamic.save_with_format(path, format)?;
    }
    tracing::info!("saved {} ({}x{}, 8-bit)", path.display(), img.width(), img.height());
    Ok(())
}

fn write_float(path: &Path, img: &Image4f) -> Result<(), IoError> {
    let format = format_of(path)?;
    let (width, height) = (img.width(), img.height());
    let dynamic = if format == ImageFormat::Hdr {
        // Radiance HDR has no alpha channel.
        let rgb: Vec<f32> = img.pixels().iter().flat_map(|p| [p[0], p[1], p[2]]).collect();
        let buf = Rgb32FImage::from_raw(width, height, rgb)
            .ok_or_else(|| IoError::Unsupported("pixel buffer does not match its size".into()))?;
        DynamicImage::ImageRgb32F(buf)
    } else {
        let rgba = img.as_channels::<f32>().to_vec();
        let buf = ImageBuffer::from_raw(width, height, rgba)
            .ok_or_else(|| IoError::Unsupported("pixel buffer does not match its size".into()))?;
        DynamicImage::ImageRgba32F(buf)
    };
    dynamic.save_with_format(path, format)?;
    tracing::info!("saved {} ({}x{}, float)", path.display(), width, height);
    Ok(())
}
