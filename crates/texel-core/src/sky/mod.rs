//! Analytic daylight: Preetham sky dome, limb-darkened sun disk, and a
//! diffuse ground below the horizon.
//!
//! Directions use a y-up frame, `dir = (sinθ cosφ, cosθ, sinθ sinφ)` with θ
//! measured from the zenith. The sun sits at azimuth φ = π/2.
//!
//! Radiance is returned as linear sRGB in renderer units: photometric values
//! in cd/m² scaled by [`RADIANCE_SCALE`].
//!
//! # Algorithm
//! 1. Zenith luminance and chromaticity from turbidity and sun angle
//! 2. Perez distribution ratio `F(θ, γ) / F(0, θs)` per channel (Y, x, y)
//! 3. xyY to XYZ to linear sRGB, unclamped
//! 4. Inside the sun disk, add transmitted sun radiance with limb darkening
//! 5. Below the horizon, return `albedo · E / π` with `E` integrated once

mod preetham;

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::{xyy_to_xyz, xyz_to_rgb};
use crate::error::{TexelError, check_range};
use preetham::{Perez, perez, perez_coefficients, zenith};

/// cd/m² to renderer radiance units.
pub const RADIANCE_SCALE: f32 = 1e-4;

/// Angular radius of the sun in radians at `sun_size == 1`.
pub const SUN_ANGULAR_RADIUS: f32 = 4.675e-3;

/// Extraterrestrial solar luminance in cd/m².
const SUN_LUMINANCE: f32 = 1.6e9;

/// Linear limb-darkening coefficient `u` in `1 - u(1 - μ)`.
const LIMB_DARKENING: f32 = 0.6;

/// Wavelengths (μm) used for the red, green and blue transmittance.
const WAVELENGTHS: [f32; 3] = [0.680, 0.550, 0.440];

/// Ångström wavelength exponent for aerosol extinction.
const AEROSOL_ALPHA: f32 = 1.3;

/// Quadrature resolution for the horizontal sky irradiance.
const IRRADIANCE_THETA_STEPS: usize = 32;
const IRRADIANCE_PHI_STEPS: usize = 64;

/// Sky model inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyParams {
    /// Sun zenith angle in radians, `[0, π/2]`. Default: π/4.
    pub sun_theta: f32,
    /// Atmospheric turbidity, `[1.7, 10]`. Default: 3.
    pub turbidity: f32,
    /// Add the direct sun disk. Default: `false`.
    pub has_sun: bool,
    /// Ground reflectance per channel, `[0, 1]`. Default: 0.7.
    pub ground_albedo: [f32; 3],
    /// Multiplier on the sun's angular radius, `> 0`. Default: 1.
    pub sun_size: f32,
}

impl SkyParams {
    /// Mid-morning sun, clear sky, no disk.
    pub const DEFAULT: Self = Self {
        sun_theta: FRAC_PI_4,
        turbidity: 3.0,
        has_sun: false,
        ground_albedo: [0.7; 3],
        sun_size: 1.0,
    };

    /// Reject values outside the model's physical range. Nothing is clamped.
    pub fn validate(&self) -> Result<(), TexelError> {
        check_range("turbidity", self.turbidity, 1.7, 10.0)?;
        check_range("sun_theta", self.sun_theta, 0.0, FRAC_PI_2)?;
        for albedo in self.ground_albedo {
            check_range("ground_albedo", albedo, 0.0, 1.0)?;
        }
        if !(self.sun_size > 0.0 && self.sun_size.is_finite()) {
            return Err(TexelError::InvalidArgument("sun size must be positive"));
        }
        Ok(())
    }
}

impl Default for SkyParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A sky with everything that depends only on [`SkyParams`] precomputed.
///
/// Immutable after construction, so one model can be sampled from every
/// rasterizer thread.
#[derive(Debug, Clone)]
pub struct SkyModel {
    params: SkyParams,
    sun_dir: Vec3,
    sun_radius: f32,
    /// Zenith `[Y, x, y]`, Y in cd/m².
    zenith: [f32; 3],
    perez: [Perez; 3],
    /// `F(0, θs)` per channel.
    perez_norm: [f32; 3],
    /// Transmitted sun radiance at the disk centre, zero without a sun.
    sun_radiance: [f32; 3],
    ground: [f32; 3],
}

impl SkyModel {
    /// Validate `params` and precompute the model.
    pub fn new(params: &SkyParams) -> Result<Self, TexelError> {
        params.validate()?;

        let theta_s = params.sun_theta;
        let coeffs = perez_coefficients(params.turbidity);
        let perez_norm = coeffs.map(|c| perez(&c, 1.0, theta_s));
        let sun_radius = SUN_ANGULAR_RADIUS * params.sun_size;

        let mut model = Self {
            params: *params,
            sun_dir: direction(theta_s, FRAC_PI_2),
            sun_radius,
            zenith: zenith(params.turbidity, theta_s),
            perez: coeffs,
            perez_norm,
            sun_radiance: [0.0; 3],
            ground: [0.0; 3],
        };

        let mut irradiance = model.sky_irradiance();
        if params.has_sun {
            model.sun_radiance = transmitted_sun(params.turbidity, theta_s);
            // Disk-averaged limb darkening is 1 - u/3.
            let solid_angle = PI * sun_radius * sun_radius;
            let disk = solid_angle * (1.0 - LIMB_DARKENING / 3.0) * theta_s.cos();
            for c in 0..3 {
                irradiance[c] += model.sun_radiance[c] * disk;
            }
        }
        for c in 0..3 {
            model.ground[c] = params.ground_albedo[c] * irradiance[c] / PI;
        }

        tracing::debug!(
            "sky model: sun θ {:.3}, turbidity {:.2}, sun {}, zenith Y {:.1} cd/m²",
            theta_s,
            params.turbidity,
            params.has_sun,
            model.zenith[0]
        );
        Ok(model)
    }

    /// Parameters this model was built from.
    pub fn params(&self) -> &SkyParams {
        &self.params
    }

    /// Unit vector towards the sun.
    pub fn sun_direction(&self) -> Vec3 {
        self.sun_dir
    }

    /// Radiance reflected by the ground, returned for every direction below
    /// the horizon.
    pub fn ground_radiance(&self) -> [f32; 3] {
        self.ground
    }

    /// Radiance arriving from `dir`. `dir` need not be normalized; a zero
    /// vector is treated as the horizon.
    pub fn radiance(&self, dir: Vec3) -> [f32; 3] {
        let dir = dir.normalize_or_zero();
        if dir.y <= 0.0 {
            return self.ground;
        }

        let gamma = dir.dot(self.sun_dir).clamp(-1.0, 1.0).acos();
        let mut rgb = self.sky(dir.y, gamma);
        if self.params.has_sun && gamma < self.sun_radius {
            let r = gamma / self.sun_radius;
            let mu = (1.0 - r * r).sqrt();
            let limb = 1.0 - LIMB_DARKENING * (1.0 - mu);
            for c in 0..3 {
                rgb[c] += self.sun_radiance[c] * limb;
            }
        }
        rgb
    }

    /// Radiance for view zenith angle `theta` and azimuth `phi`.
    pub fn radiance_at(&self, theta: f32, phi: f32) -> [f32; 3] {
        self.radiance(direction(theta, phi))
    }

    /// Sky dome only: no sun disk, no ground.
    fn sky(&self, cos_theta: f32, gamma: f32) -> [f32; 3] {
        let [lum, x, y]: [f32; 3] = std::array::from_fn(|c| {
            self.zenith[c] * perez(&self.perez[c], cos_theta, gamma) / self.perez_norm[c]
        });
        xyz_to_rgb(xyy_to_xyz([x, y, lum])).map(|v| (v * RADIANCE_SCALE).max(0.0))
    }

    /// Horizontal irradiance from the sky dome, by midpoint quadrature.
    fn sky_irradiance(&self) -> [f32; 3] {
        let d_theta = FRAC_PI_2 / IRRADIANCE_THETA_STEPS as f32;
        let d_phi = TAU / IRRADIANCE_PHI_STEPS as f32;
        let mut sum = [0.0_f32; 3];
        for i in 0..IRRADIANCE_THETA_STEPS {
            let theta = (i as f32 + 0.5) * d_theta;
            let weight = theta.cos() * theta.sin() * d_theta * d_phi;
            for j in 0..IRRADIANCE_PHI_STEPS {
                let dir = direction(theta, (j as f32 + 0.5) * d_phi);
                let gamma = dir.dot(self.sun_dir).clamp(-1.0, 1.0).acos();
                let rgb = self.sky(dir.y, gamma);
                for c in 0..3 {
                    sum[c] += rgb[c] * weight;
                }
            }
        }
        sum
    }
}

/// One-shot radiance query. Builds a [`SkyModel`] per call; prefer the model
/// when sampling many directions.
pub fn sky_radiance(
    view_theta: f32,
    view_phi: f32,
    params: &SkyParams,
) -> Result<[f32; 3], TexelError> {
    Ok(SkyModel::new(params)?.radiance_at(view_theta, view_phi))
}

/// Unit direction for zenith angle `theta` and azimuth `phi`.
pub fn direction(theta: f32, phi: f32) -> Vec3 {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p)
}

/// Sun radiance at the ground: extraterrestrial luminance attenuated by
/// Rayleigh and aerosol extinction along the relative optical mass.
fn transmitted_sun(turbidity: f32, theta_s: f32) -> [f32; 3] {
    // Kasten's relative air mass, finite at the horizon.
    let mass = 1.0 / (theta_s.cos() + 0.15 * (93.885 - theta_s.to_degrees()).powf(-1.253));
    let beta = 0.04608 * turbidity - 0.04586;
    WAVELENGTHS.map(|lambda| {
        let rayleigh = (-0.008735 * lambda.powf(-4.08) * mass).exp();
        let aerosol = (-beta * lambda.powf(-AEROSOL_ALPHA) * mass).exp();
        SUN_LUMINANCE * RADIANCE_SCALE * rayleigh * aerosol
    })
}
