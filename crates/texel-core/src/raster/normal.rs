//! Bump to tangent-space normal map conversion.

use glam::Vec3;

use crate::color::luminance;
use crate::error::TexelError;
use crate::image::{Image, Image3f};

/// Convert a height field to a tangent-space normal map.
///
/// Heights are the channel mean of each pixel. Slopes use forward
/// differences that wrap at the borders, so a tiling bump map yields a tiling
/// normal map. The normal is encoded as `n · 0.5 + 0.5` with green flipped.
pub fn bump_to_normal_map(bump: &Image3f, scale: f32) -> Result<Image3f, TexelError> {
    if !scale.is_finite() {
        return Err(TexelError::InvalidArgument("bump scale must be finite"));
    }
    let (width, height) = (bump.width(), bump.height());
    tracing::debug!("normal map {}x{}, scale {}", width, height, scale);

    let dx = 1.0 / width as f32;
    let dy = 1.0 / height as f32;
    Image::from_fn(width, height, |x, y| {
        let h00 = luminance(bump.at(x, y));
        let h10 = luminance(bump.at((x + 1) % width, y));
        let h01 = luminance(bump.at(x, (y + 1) % height));
        let mut n = Vec3::new(scale * (h00 - h10) / dx, scale * (h00 - h01) / dy, 1.0).normalize();
        n.y = -n.y;
        (n * 0.5 + Vec3::splat(0.5)).to_array()
    })
}
