//! Separable image resampling with selectable kernels and edge policies.
//!
//! A resize builds one [`WeightTable`] per axis, then runs a horizontal pass
//! into a `dst_w × src_h` intermediate and a vertical pass into the output.
//! Both passes split their output by rows across the rayon pool; the tables
//! are shared read-only.
//!
//! Straight-alpha input is premultiplied before filtering and divided back
//! afterwards so colour from transparent pixels does not bleed into opaque
//! neighbours.

pub mod edge;
pub mod kernel;
pub mod table;

pub use edge::Edge;
pub use kernel::Filter;
pub use table::{Tap, WeightTable};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{TexelError, check_dimensions};
use crate::image::{Image, Pixel, check_buffer};

/// Alpha below this is treated as fully transparent when un-premultiplying.
const MIN_ALPHA: f32 = 1e-6;

/// Resize options, resolved once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Reconstruction kernel. Default: [`Filter::Triangle`].
    pub filter: Filter,
    /// Out-of-range policy. Default: [`Edge::Clamp`].
    pub edge: Edge,
    /// Whether colour channels are already multiplied by alpha. Default: `false`.
    pub premultiplied_alpha: bool,
}

impl ResizeConfig {
    /// Triangle filter, clamped edges, straight alpha.
    pub const DEFAULT: Self = Self {
        filter: Filter::Triangle,
        edge: Edge::Clamp,
        premultiplied_alpha: false,
    };

    /// Same config with a different filter.
    pub const fn with_filter(self, filter: Filter) -> Self {
        Self { filter, ..self }
    }

    /// Same config with a different edge policy.
    pub const fn with_edge(self, edge: Edge) -> Self {
        Self { edge, ..self }
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Resize an image to `width × height`.
pub fn resize<P: Pixel>(
    src: &Image<P>,
    width: u32,
    height: u32,
    config: &ResizeConfig,
) -> Result<Image<P>, TexelError> {
    let pixels = resize_pixels(src.width(), src.height(), src.pixels(), width, height, config)?;
    Image::from_pixels(width, height, pixels)
}

/// Resize a raw row-major buffer of `src_width × src_height` pixels.
///
/// Fails with [`TexelError::InvalidDimensions`] for a zero-sized source or
/// destination, and with [`TexelError::BufferLength`] when `src` disagrees
/// with the stated source size.
pub fn resize_pixels<P: Pixel>(
    src_width: u32,
    src_height: u32,
    src: &[P],
    dst_width: u32,
    dst_height: u32,
    config: &ResizeConfig,
) -> Result<Vec<P>, TexelError> {
    check_dimensions(dst_width, dst_height)?;
    check_dimensions(src_width, src_height)?;
    check_buffer(src_width, src_height, src.len())?;

    tracing::debug!(
        "resize {}x{} -> {}x{} ({} filter, {:?} edge, {})",
        src_width,
        src_height,
        dst_width,
        dst_height,
        config.filter.label(),
        config.edge,
        P::DEPTH
    );

    let (sw, sh) = (src_width as usize, src_height as usize);
    let (dw, dh) = (dst_width as usize, dst_height as usize);
    let straight_alpha = P::HAS_ALPHA && !config.premultiplied_alpha;

    let columns = WeightTable::new(sw, dw, config.filter, config.edge);
    let rows = WeightTable::new(sh, dh, config.filter, config.edge);

    let widened: Vec<[f32; 4]> = src
        .par_iter()
        .map(|&p| {
            let rgba = p.to_rgba();
            if straight_alpha { premultiply(rgba) } else { rgba }
        })
        .collect();

    // Horizontal pass: dst_w × src_h.
    let mut horizontal = vec![[0.0_f32; 4]; dw * sh];
    horizontal
        .par_chunks_mut(dw)
        .zip(widened.par_chunks(sw))
        .for_each(|(out_row, in_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                for tap in columns.taps(x) {
                    madd(out, in_row[tap.index], tap.weight);
                }
            }
        });

    // Vertical pass: dst_w × dst_h.
    let mut dst = vec![P::zeroed(); dw * dh];
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, out_row)| {
        let mut acc = vec![[0.0_f32; 4]; dw];
        for tap in rows.taps(y) {
            let in_row = &horizontal[tap.index * dw..(tap.index + 1) * dw];
            for (a, &px) in acc.iter_mut().zip(in_row) {
                madd(a, px, tap.weight);
            }
        }
        for (out, rgba) in out_row.iter_mut().zip(acc) {
            let rgba = if straight_alpha { unpremultiply(rgba) } else { rgba };
            *out = P::from_rgba(rgba);
        }
    });

    Ok(dst)
}

#[inline]
fn madd(acc: &mut [f32; 4], px: [f32; 4], w: f32) {
    for c in 0..4 {
        acc[c] += px[c] * w;
    }
}

#[inline]
fn premultiply([r, g, b, a]: [f32; 4]) -> [f32; 4] {
    [r * a, g * a, b * a, a]
}

#[inline]
fn unpremultiply([r, g, b, a]: [f32; 4]) -> [f32; 4] {
    if a.abs() < MIN_ALPHA {
        return [0.0, 0.0, 0.0, a];
    }
    let inv = 1.0 / a;
    [r * inv, g * inv, b * inv, a]
}
