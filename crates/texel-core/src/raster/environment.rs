//! Equirectangular environment maps.
//!
//! Row `y` maps to zenith angle `θ = π(y + 0.5)/h` and column `x` to azimuth
//! `φ = 2π(x + 0.5)/w`, matching the direction convention of [`crate::sky`].

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{TexelError, check_range};
use crate::image::{Image, Image3f};
use crate::sky::{SkyModel, SkyParams};

/// Parameters for [`make_lights_image`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsParams {
    /// Emitted radiance of every light. Default: white.
    pub emission: [f32; 3],
    /// Number of lights evenly spaced in azimuth, `>= 1`. Default: 4.
    pub count: u32,
    /// Zenith angle of the light centres in radians, `[0, π]`. Default: π/4.
    pub angle: f32,
    /// Azimuthal extent of each light in radians, `> 0`. Default: π/16.
    pub width: f32,
    /// Polar extent of each light in radians, `> 0`. Default: π/16.
    pub height: f32,
}

impl LightsParams {
    /// Four white lights at 45° elevation, π/16 wide and tall.
    pub const DEFAULT: Self = Self {
        emission: [1.0; 3],
        count: 4,
        angle: FRAC_PI_4,
        width: PI / 16.0,
        height: PI / 16.0,
    };

    fn validate(&self) -> Result<(), TexelError> {
        if self.count == 0 {
            return Err(TexelError::InvalidArgument("light count must be at least 1"));
        }
        check_range("angle", self.angle, 0.0, PI)?;
        check_range("width", self.width, f32::MIN_POSITIVE, TAU)?;
        check_range("height", self.height, f32::MIN_POSITIVE, PI)?;
        Ok(())
    }
}

impl Default for LightsParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[inline]
fn angles(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    let theta = PI * (y as f32 + 0.5) / height as f32;
    let phi = TAU * (x as f32 + 0.5) / width as f32;
    (theta, phi)
}

/// Sky and sun radiance over the full sphere.
pub fn make_sunsky_image(
    width: u32,
    height: u32,
    params: &SkyParams,
) -> Result<Image3f, TexelError> {
    let sky = SkyModel::new(params)?;
    tracing::debug!("sunsky image {}x{}", width, height);
    Image::from_fn(width, height, |x, y| {
        let (theta, phi) = angles(x, y, width, height);
        sky.radiance_at(theta, phi)
    })
}

/// Black environment with rectangular area lights in one elevation band.
///
/// Light `l` is centred at azimuth `2π(l + 0.5)/count`.
pub fn make_lights_image(
    width: u32,
    height: u32,
    params: &LightsParams,
) -> Result<Image3f, TexelError> {
    params.validate()?;
    tracing::debug!("lights image {}x{}, {} lights", width, height, params.count);
    let half_width = params.width / 2.0;
    let half_height = params.height / 2.0;
    let centres: Vec<f32> = (0..params.count)
        .map(|l| TAU * (l as f32 + 0.5) / params.count as f32)
        .collect();
    Image::from_fn(width, height, |x, y| {
        let (theta, phi) = angles(x, y, width, height);
        if (theta - params.angle).abs() >= half_height {
            return [0.0; 3];
        }
        let lit = centres.iter().any(|&c| {
            // Shortest azimuthal distance, wrapping at 2π.
            let d = (phi - c).rem_euclid(TAU);
            d.min(TAU - d) < half_width
        });
        if lit { params.emission } else { [0.0; 3] }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sunsky_upper_rows_are_sky_lower_rows_ground() {
        let params = SkyParams::DEFAULT;
        let img = make_sunsky_image(16, 8, &params).unwrap();
        let ground = SkyModel::new(&params).unwrap().ground_radiance();
        assert_eq!(img.at(3, 7), ground);
        assert_eq!(img.at(11, 4), ground);
        assert_ne!(img.at(3, 0), ground);
        assert!(img.pixels().iter().flatten().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_sunsky_rejects_invalid_sky() {
        let params = SkyParams { turbidity: 20.0, ..SkyParams::DEFAULT };
        assert!(make_sunsky_image(8, 4, &params).is_err());
    }

    #[test]
    fn test_lights_band_and_spacing() {
        let img = make_lights_image(64, 32, &LightsParams::DEFAULT).unwrap();
        // Row 7 sits at θ = 0.736, inside the band around π/4.
        let row: Vec<bool> = (0..64).map(|x| img.at(x, 7) == [1.0; 3]).collect();
        // Centres at φ = π/4, 3π/4, ... straddle columns 7-8, 23-24, 39-40, 55-56.
        for centre in [8, 24, 40, 56] {
            assert!(row[centre], "column {centre} unlit");
        }
        assert!(!row[0] && !row[16] && !row[32] && !row[48]);
        assert_eq!(row.iter().filter(|&&lit| lit).count(), 4 * 2);
        // Outside the band everything is black.
        assert!((0..64).all(|x| img.at(x, 0) == [0.0; 3] && img.at(x, 20) == [0.0; 3]));
    }

    #[test]
    fn test_lights_reject_zero_count() {
        let params = LightsParams { count: 0, ..LightsParams::DEFAULT };
        assert!(make_lights_image(8, 8, &params).unwrap_err().is_invalid_argument());
        let params = LightsParams { width: 0.0, ..LightsParams::DEFAULT };
        assert!(make_lights_image(8, 8, &params).is_err());
    }
}
