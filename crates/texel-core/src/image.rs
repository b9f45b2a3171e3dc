//! Image buffers shared by every stage of the synthesis pipeline.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TexelError, check_dimensions};

/// Storage type of a pixel channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit unsigned integer, normalized to [0, 1].
    U8,
    /// 32-bit floating point.
    F32,
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "8-bit"),
            Self::F32 => write!(f, "32-bit float"),
        }
    }
}

/// A fixed-arity pixel that can be widened to RGBA f32 for filtering.
///
/// Byte channels map to `[0, 1]` by dividing by 255 and are written back
/// rounded and clamped to `[0, 255]`. Three-channel pixels read as opaque.
pub trait Pixel: bytemuck::Pod + Send + Sync + PartialEq + fmt::Debug {
    /// Number of channels (3 or 4).
    const CHANNELS: usize;
    /// Whether the last channel is alpha.
    const HAS_ALPHA: bool = Self::CHANNELS == 4;
    /// Channel storage type.
    const DEPTH: BitDepth;

    /// Widen to normalized RGBA.
    fn to_rgba(self) -> [f32; 4];

    /// Narrow from normalized RGBA, dropping alpha for three-channel pixels.
    fn from_rgba(rgba: [f32; 4]) -> Self;
}

impl Pixel for [f32; 3] {
    const CHANNELS: usize = 3;
    const DEPTH: BitDepth = BitDepth::F32;

    fn to_rgba(self) -> [f32; 4] {
        [self[0], self[1], self[2], 1.0]
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        [rgba[0], rgba[1], rgba[2]]
    }
}

impl Pixel for [f32; 4] {
    const CHANNELS: usize = 4;
    const DEPTH: BitDepth = BitDepth::F32;

    fn to_rgba(self) -> [f32; 4] {
        self
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        rgba
    }
}

impl Pixel for [u8; 3] {
    const CHANNELS: usize = 3;
    const DEPTH: BitDepth = BitDepth::U8;

    fn to_rgba(self) -> [f32; 4] {
        [unorm(self[0]), unorm(self[1]), unorm(self[2]), 1.0]
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        [quantize(rgba[0]), quantize(rgba[1]), quantize(rgba[2])]
    }
}

impl Pixel for [u8; 4] {
    const CHANNELS: usize = 4;
    const DEPTH: BitDepth = BitDepth::U8;

    fn to_rgba(self) -> [f32; 4] {
        self.map(unorm)
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        rgba.map(quantize)
    }
}

#[inline]
fn unorm(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Row-major image buffer.
///
/// Invariant: both dimensions are non-zero and `pixels.len() == width * height`.
/// Every constructor checks this, so a live `Image` is always fully populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

/// RGB float image.
pub type Image3f = Image<[f32; 3]>;
/// RGBA float image.
pub type Image4f = Image<[f32; 4]>;
/// RGB byte image.
pub type Image3b = Image<[u8; 3]>;
/// RGBA byte image.
pub type Image4b = Image<[u8; 4]>;

impl<P: Pixel> Image<P> {
    /// Create an image filled with a single value.
    pub fn new(width: u32, height: u32, fill: P) -> Result<Self, TexelError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        })
    }

    /// Wrap an existing pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<P>) -> Result<Self, TexelError> {
        check_dimensions(width, height)?;
        check_buffer(width, height, pixels.len())?;
        Ok(Self { width, height, pixels })
    }

    /// Evaluate `f(x, y)` for every pixel, rows distributed across the rayon pool.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self, TexelError>
    where
        F: Fn(u32, u32) -> P + Sync,
    {
        check_dimensions(width, height)?;
        let mut pixels = vec![P::zeroed(); width as usize * height as usize];
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = f(x as u32, y as u32);
                }
            });
        Ok(Self { width, height, pixels })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// Mutable row-major pixel data. The length cannot change through this view.
    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Give up the buffer.
    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like slice indexing.
    pub fn at(&self, x: u32, y: u32) -> P {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, value: P) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize] = value;
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[P]> + '_ {
        self.pixels.chunks_exact(self.width as usize)
    }

    /// Apply a per-pixel function, producing a new image of the same size.
    pub fn map<Q, F>(&self, f: F) -> Image<Q>
    where
        Q: Pixel,
        F: Fn(P) -> Q + Sync + Send,
    {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.par_iter().map(|&p| f(p)).collect(),
        }
    }

    /// Raw channel bytes in native endianness, for handing to a codec.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Raw channel values, flattened.
    pub fn as_channels<T: bytemuck::Pod>(&self) -> &[T] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Precondition shared by every raw-buffer entry point.
pub(crate) fn check_buffer(width: u32, height: u32, actual: usize) -> Result<(), TexelError> {
    let expected = width as usize * height as usize;
    if actual != expected {
        return Err(TexelError::BufferLength { width, height, expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_rejects_length_mismatch() {
        let err = Image::from_pixels(2, 2, vec![[0.0f32; 3]; 3]).unwrap_err();
        assert_eq!(
            err,
            TexelError::BufferLength { width: 2, height: 2, expected: 4, actual: 3 }
        );
    }

    #[test]
    fn test_from_fn_visits_every_coordinate() {
        let img = Image::from_fn(5, 3, |x, y| [x as f32, y as f32, 0.0]).unwrap();
        assert_eq!(img.pixels().len(), 15);
        assert_eq!(img.at(4, 2), [4.0, 2.0, 0.0]);
        assert_eq!(img.at(0, 1), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        assert!(Image::new(0, 4, [0u8; 4]).is_err());
        assert!(Image::from_fn(4, 0, |_, _| [0u8; 4]).is_err());
    }

    #[test]
    fn test_byte_pixel_roundtrip_is_exact() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            let px = [v, v, v, v];
            assert_eq!(<[u8; 4]>::from_rgba(px.to_rgba()), px);
        }
    }

    #[test]
    fn test_byte_write_back_clamps() {
        let px = <[u8; 3]>::from_rgba([-0.5, 0.5, 3.0, 1.0]);
        assert_eq!(px, [0, 128, 255]);
    }

    #[test]
    fn test_as_bytes_covers_all_channels() {
        let img = Image::new(3, 2, [1.0f32, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(img.as_bytes().len(), 3 * 2 * 4 * 4);
        assert_eq!(img.as_channels::<f32>()[4..8], [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rows_yield_height_slices() {
        let img = Image::from_fn(4, 3, |x, _| [x as u8, 0, 0]).unwrap();
        let rows: Vec<_> = img.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][3], [3, 0, 0]);
    }
}
