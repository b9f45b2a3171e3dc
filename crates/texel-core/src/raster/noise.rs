//! Grayscale noise textures.
//!
//! Pixel `(x, y)` samples at `(x/w · scale, y/h · scale, 0.5)` and the signed
//! result is shown as `0.5 + 0.5v`. With `wrap`, the lattice period equals
//! `scale`, so the texture tiles seamlessly in both directions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::TexelError;
use crate::image::{Image, Image3f};
use crate::noise::{Fractal, FractalKind, FractalParams, Period, noise};

/// Depth of the sampled slice along z.
const SLICE_Z: f32 = 0.5;

/// Noise texture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseImageParams {
    /// Lattice cells across the image, `> 0`. Default: 1.
    pub scale: f32,
    /// Make the texture tile. Needs power-of-two image sizes and a
    /// power-of-two integer `scale` of at most 256. Default: `false`.
    pub wrap: bool,
    /// Octave settings; ignored by [`make_noise_image`].
    #[serde(flatten)]
    pub fractal: FractalParams,
}

impl NoiseImageParams {
    /// One lattice cell across the image, no tiling, default octaves.
    pub const DEFAULT: Self = Self {
        scale: 1.0,
        wrap: false,
        fractal: FractalParams::DEFAULT,
    };

    /// Validate scale and size, returning the lattice period to use.
    fn period(&self, width: u32, height: u32) -> Result<Option<Period>, TexelError> {
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(TexelError::InvalidArgument("noise scale must be positive"));
        }
        if !self.wrap {
            return Ok(None);
        }
        if !width.is_power_of_two() || !height.is_power_of_two() {
            return Err(TexelError::InvalidArgument(
                "wrapping noise needs power-of-two image dimensions",
            ));
        }
        let scale = self.scale as u32;
        if scale as f32 != self.scale {
            return Err(TexelError::InvalidArgument(
                "wrapping noise needs an integer scale",
            ));
        }
        Period::new(scale, scale, Period::MAX).map(Some)
    }
}

impl Default for NoiseImageParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Single-octave gradient noise.
pub fn make_noise_image(
    width: u32,
    height: u32,
    params: &NoiseImageParams,
) -> Result<Image3f, TexelError> {
    let period = params.period(width, height)?;
    tracing::debug!(
        "noise image {}x{}, scale {}, wrap {}",
        width,
        height,
        params.scale,
        params.wrap
    );
    render(width, height, params.scale, |p| noise(p, period))
}

/// Fractal Brownian motion.
pub fn make_fbm_image(
    width: u32,
    height: u32,
    params: &NoiseImageParams,
) -> Result<Image3f, TexelError> {
    make_fractal_image(width, height, params, FractalKind::Fbm)
}

/// Ridged multifractal.
pub fn make_ridge_image(
    width: u32,
    height: u32,
    params: &NoiseImageParams,
) -> Result<Image3f, TexelError> {
    make_fractal_image(width, height, params, FractalKind::Ridged)
}

/// Turbulence.
pub fn make_turbulence_image(
    width: u32,
    height: u32,
    params: &NoiseImageParams,
) -> Result<Image3f, TexelError> {
    make_fractal_image(width, height, params, FractalKind::Turbulence)
}

fn make_fractal_image(
    width: u32,
    height: u32,
    params: &NoiseImageParams,
    kind: FractalKind,
) -> Result<Image3f, TexelError> {
    let period = params.period(width, height)?;
    let fractal = Fractal::new(params.fractal, period)?;
    tracing::debug!(
        "{:?} image {}x{}, scale {}, {} octaves, wrap {}",
        kind,
        width,
        height,
        params.scale,
        params.fractal.octaves,
        params.wrap
    );
    render(width, height, params.scale, |p| fractal.sample(kind, p))
}

fn render<F>(width: u32, height: u32, scale: f32, field: F) -> Result<Image3f, TexelError>
where
    F: Fn(Vec3) -> f32 + Sync,
{
    let (w, h) = (width as f32, height as f32);
    Image::from_fn(width, height, |x, y| {
        let p = Vec3::new(x as f32 / w * scale, y as f32 / h * scale, SLICE_Z);
        [(0.5 + 0.5 * field(p)).clamp(0.0, 1.0); 3]
    })
}
