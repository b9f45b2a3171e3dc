//! Test-card patterns: grids, checkers, ramps and UV maps.
//!
//! Tile patterns work on integer pixel coordinates, so a `tile`-pixel cell
//! always covers exactly `tile × tile` pixels starting at the origin.

use serde::{Deserialize, Serialize};

use crate::color::{gamma_to_linear, hsv_to_rgb, linear_to_gamma};
use crate::error::TexelError;
use crate::image::{Image, Image3f};

/// Exponent of the outer bands in [`make_gammaramp_image`].
const RAMP_GAMMA: f32 = 2.2;

/// Two-colour tile pattern parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    /// Tile edge in pixels, `>= 1`. Default: 8.
    pub tile: u32,
    /// First colour (grid lines, even checker cells). Default: 0.5 gray.
    pub color0: [f32; 3],
    /// Second colour. Default: 0.8 gray.
    pub color1: [f32; 3],
}

impl PatternParams {
    /// Tile 8, mid and light gray.
    pub const DEFAULT: Self = Self {
        tile: 8,
        color0: [0.5; 3],
        color1: [0.8; 3],
    };
}

impl Default for PatternParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Horizontal ramp parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampParams {
    /// Colour at the left edge. Default: black.
    pub color0: [f32; 3],
    /// Colour approached at the right edge. Default: white.
    pub color1: [f32; 3],
    /// Blend in gamma-encoded space instead of linear. Default: `false`.
    pub srgb: bool,
}

impl Default for RampParams {
    fn default() -> Self {
        Self { color0: [0.0; 3], color1: [1.0; 3], srgb: false }
    }
}

/// UV grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvGridParams {
    /// Tile edge in pixels, `>= 1`. Default: 8.
    pub tile: u32,
    /// Hue per tile column; grayscale otherwise. Default: `true`.
    pub colored: bool,
}

impl Default for UvGridParams {
    fn default() -> Self {
        Self { tile: 8, colored: true }
    }
}

fn check_tile(tile: u32) -> Result<(), TexelError> {
    if tile == 0 {
        return Err(TexelError::InvalidArgument("tile size must be at least 1"));
    }
    Ok(())
}

/// True on the first and last pixel row/column of every tile.
#[inline]
fn on_border(x: u32, y: u32, tile: u32) -> bool {
    let (tx, ty) = (x % tile, y % tile);
    tx == 0 || ty == 0 || tx == tile - 1 || ty == tile - 1
}

#[inline]
fn even_cell(x: u32, y: u32, tile: u32) -> bool {
    (x / tile + y / tile) % 2 == 0
}

#[inline]
fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    std::array::from_fn(|c| a[c] + (b[c] - a[c]) * t)
}

/// Tile-border lines in `color0` over `color1`.
pub fn make_grid_image(
    width: u32,
    height: u32,
    params: &PatternParams,
) -> Result<Image3f, TexelError> {
    check_tile(params.tile)?;
    tracing::debug!("grid image {}x{}, tile {}", width, height, params.tile);
    let PatternParams { tile, color0, color1 } = *params;
    Image::from_fn(width, height, |x, y| if on_border(x, y, tile) { color0 } else { color1 })
}

/// Checkerboard: cells with an even `x/tile + y/tile` take `color0`.
pub fn make_checker_image(
    width: u32,
    height: u32,
    params: &PatternParams,
) -> Result<Image3f, TexelError> {
    check_tile(params.tile)?;
    tracing::debug!("checker image {}x{}, tile {}", width, height, params.tile);
    let PatternParams { tile, color0, color1 } = *params;
    Image::from_fn(width, height, |x, y| if even_cell(x, y, tile) { color0 } else { color1 })
}

/// Height field with a round bump in even checker cells and a dimple in odd
/// ones, on a 0.5 gray base.
pub fn make_bumpdimple_image(width: u32, height: u32, tile: u32) -> Result<Image3f, TexelError> {
    check_tile(tile)?;
    tracing::debug!("bump/dimple image {}x{}, tile {}", width, height, tile);
    let half = tile as f32 / 2.0;
    Image::from_fn(width, height, |x, y| {
        let dx = (x % tile) as f32 - half;
        let dy = (y % tile) as f32 - half;
        // Normalized so the cell's inscribed circle has radius 1.
        let r = (dx * dx + dy * dy).sqrt() / half;
        let mut h = 0.5;
        if r < 0.5 {
            let bump = 0.5 - r;
            h += if even_cell(x, y, tile) { bump } else { -bump };
        }
        [h; 3]
    })
}

/// Horizontal ramp from `color0` at `x = 0` towards `color1`.
pub fn make_ramp_image(
    width: u32,
    height: u32,
    params: &RampParams,
) -> Result<Image3f, TexelError> {
    tracing::debug!("ramp image {}x{}, srgb {}", width, height, params.srgb);
    let RampParams { color0, color1, srgb } = *params;
    let enc0 = linear_to_gamma(color0, RAMP_GAMMA);
    let enc1 = linear_to_gamma(color1, RAMP_GAMMA);
    Image::from_fn(width, height, |x, _| {
        let u = x as f32 / width as f32;
        if srgb {
            gamma_to_linear(mix(enc0, enc1, u), RAMP_GAMMA)
        } else {
            mix(color0, color1, u)
        }
    })
}

/// Vertical 0→1 ramp in three bands: `u^2.2`, linear, `u^(1/2.2)`.
pub fn make_gammaramp_image(width: u32, height: u32) -> Result<Image3f, TexelError> {
    tracing::debug!("gamma ramp image {}x{}", width, height);
    let denom = height.saturating_sub(1).max(1) as f32;
    Image::from_fn(width, height, |x, y| {
        let u = y as f32 / denom;
        let v = if x < width / 3 {
            u.powf(RAMP_GAMMA)
        } else if x < width * 2 / 3 {
            u
        } else {
            u.powf(1.0 / RAMP_GAMMA)
        };
        [v; 3]
    })
}

/// Texture coordinates as colour: u in red, v in green, both reaching 1 at
/// the last pixel.
pub fn make_uvramp_image(width: u32, height: u32) -> Result<Image3f, TexelError> {
    tracing::debug!("uv ramp image {}x{}", width, height);
    let du = width.saturating_sub(1).max(1) as f32;
    let dv = height.saturating_sub(1).max(1) as f32;
    Image::from_fn(width, height, |x, y| [x as f32 / du, y as f32 / dv, 0.0])
}

/// UV calibration grid: hue per tile column, saturation alternating by tile
/// parity, dark lines on tile borders and lighter lines on half-tile borders.
pub fn make_uvgrid_image(
    width: u32,
    height: u32,
    params: &UvGridParams,
) -> Result<Image3f, TexelError> {
    check_tile(params.tile)?;
    tracing::debug!("uv grid image {}x{}, tile {}", width, height, params.tile);
    let UvGridParams { tile, colored } = *params;
    let half = (tile / 2).max(1);
    let columns = width.div_ceil(tile) as f32;
    Image::from_fn(width, height, |x, y| {
        let hue = (x / tile) as f32 / columns;
        let saturation = match (colored, even_cell(x, y, tile)) {
            (false, _) => 0.0,
            (true, true) => 0.8,
            (true, false) => 0.4,
        };
        let value = if on_border(x, y, tile) {
            0.5
        } else if on_border(x, y, half) {
            0.8
        } else {
            1.0
        };
        hsv_to_rgb([hue, saturation, value])
    })
}
