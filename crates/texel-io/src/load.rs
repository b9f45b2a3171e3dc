//! Image loading.
//!
//! Float-typed files (Radiance HDR, OpenEXR) decode straight to linear
//! floats. 8-bit files are normalized and, for float output, decoded with
//! `ldr_gamma`.

use std::path::Path;

use image::{ColorType, DynamicImage};
use texel_core::color::{
    DEFAULT_GAMMA, byte_to_float, float_to_byte, gamma_to_linear, linear_to_gamma,
};
use texel_core::{Image, Image4b, Image4f};

use crate::error::IoError;

/// True for file names whose extension marks a float format (`.hdr`, `.exr`).
pub fn is_hdr_filename(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hdr") || ext.eq_ignore_ascii_case("exr"))
}

/// Load an image as linear RGBA floats. 8-bit sources are decoded with
/// `ldr_gamma`; pass 1 to keep their encoded values.
pub fn load_image4f(path: impl AsRef<Path>, ldr_gamma: f32) -> Result<Image4f, IoError> {
    let path = path.as_ref();
    let img = image::open(path)?;
    tracing::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    to_image4f(img, ldr_gamma)
}

/// Load an image as 8-bit RGBA. Float sources are gamma-encoded with 2.2
/// and quantized.
pub fn load_image4b(path: impl AsRef<Path>) -> Result<Image4b, IoError> {
    let path = path.as_ref();
    let img = image::open(path)?;
    tracing::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    to_image4b(img)
}

/// [`load_image4f`] from an encoded in-memory buffer.
pub fn load_image4f_from_memory(bytes: &[u8], ldr_gamma: f32) -> Result<Image4f, IoError> {
    let img = image::load_from_memory(bytes)?;
    tracing::info!("decoded {} bytes ({}x{})", bytes.len(), img.width(), img.height());
    to_image4f(img, ldr_gamma)
}

/// [`load_image4b`] from an encoded in-memory buffer.
pub fn load_image4b_from_memory(bytes: &[u8]) -> Result<Image4b, IoError> {
    let img = image::load_from_memory(bytes)?;
    tracing::info!("decoded {} bytes ({}x{})", bytes.len(), img.width(), img.height());
    to_image4b(img)
}

fn is_float(color: ColorType) -> bool {
    matches!(color, ColorType::Rgb32F | ColorType::Rgba32F)
}

fn to_image4f(img: DynamicImage, ldr_gamma: f32) -> Result<Image4f, IoError> {
    if is_float(img.color()) {
        let rgba = img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        return Ok(Image::from_pixels(width, height, pixels)?);
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = byte_to_float(p.0);
            let [r, g, b] = gamma_to_linear([r, g, b], ldr_gamma);
            [r, g, b, a]
        })
        .collect();
    Ok(Image::from_pixels(width, height, pixels)?)
}

fn to_image4b(img: DynamicImage) -> Result<Image4b, IoError> {
    if is_float(img.color()) {
        tracing::warn!("quantizing float image to 8 bits with gamma {}", DEFAULT_GAMMA);
        let rgba = img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                let [r, g, b] = linear_to_gamma([r, g, b], DEFAULT_GAMMA);
                float_to_byte([r, g, b, a])
            })
            .collect();
        return Ok(Image::from_pixels(width, height, pixels)?);
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba.pixels().map(|p| p.0).collect();
    Ok(Image::from_pixels(width, height, pixels)?)
}
