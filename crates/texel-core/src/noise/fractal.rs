//! Multi-octave fractal fields built on [`noise_seeded`].
//!
//! Octave `k` samples noise at frequency `lacunarity^k` with amplitude
//! `gain^k` and hash seed `k`, so octaves are decorrelated. The three
//! fields differ only in the per-octave transform:
//!
//! ```text
//! fbm:        Σ a_k · n_k
//! turbulence: Σ a_k · |n_k|
//! ridged:     Σ a_k · prev · r_k,  r_k = max(offset - |n_k|, 0)²,  prev = clamp(r_{k-1}, 0, 1)
//! ```
//!
//! With [`FractalParams::normalize`] every field is rescaled to `[-1, 1]`,
//! the same signed range as the underlying noise.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::perlin::{Period, noise_seeded};
use crate::error::TexelError;

/// Octave accumulation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    /// Fractal Brownian motion.
    Fbm,
    /// Ridged multifractal.
    Ridged,
    /// Sum of absolute octaves.
    Turbulence,
}

/// Octave parameters shared by all fractal fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    /// Frequency multiplier per octave, `> 1`. Default: 2.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave, in `(0, 1)`. Default: 0.5.
    pub gain: f32,
    /// Number of octaves, `>= 1`. Default: 6.
    pub octaves: u32,
    /// Ridge offset, `> 0`. Only used by [`FractalKind::Ridged`]. Default: 1.
    pub offset: f32,
    /// Rescale the sum to `[-1, 1]`. Default: `true`.
    pub normalize: bool,
}

impl FractalParams {
    /// Six octaves, lacunarity 2, gain 0.5, offset 1, normalized.
    pub const DEFAULT: Self = Self {
        lacunarity: 2.0,
        gain: 0.5,
        octaves: 6,
        offset: 1.0,
        normalize: true,
    };

    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<(), TexelError> {
        if self.octaves == 0 {
            return Err(TexelError::InvalidArgument("octave count must be at least 1"));
        }
        if !(self.lacunarity > 1.0 && self.lacunarity.is_finite()) {
            return Err(TexelError::InvalidArgument("lacunarity must be greater than 1"));
        }
        if !(self.gain > 0.0 && self.gain < 1.0) {
            return Err(TexelError::InvalidArgument("gain must lie in (0, 1)"));
        }
        if !(self.offset > 0.0 && self.offset.is_finite()) {
            return Err(TexelError::InvalidArgument("ridge offset must be positive"));
        }
        Ok(())
    }
}

impl Default for FractalParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A validated fractal field, cheap to sample from many threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fractal {
    params: FractalParams,
    period: Option<Period>,
    /// Integer lacunarity, used to grow the period per octave.
    period_step: u32,
    amplitude_sum: f32,
}

impl Fractal {
    /// Validate `params` and, for a periodic field, require an integer
    /// power-of-two lacunarity so every octave tiles with the base period.
    pub fn new(params: FractalParams, period: Option<Period>) -> Result<Self, TexelError> {
        params.validate()?;

        let period_step = if period.is_some() {
            let lac = params.lacunarity;
            if lac.fract() != 0.0 || lac > Period::MAX as f32 || !(lac as u32).is_power_of_two() {
                return Err(TexelError::InvalidArgument(
                    "periodic fractal noise needs a power-of-two integer lacunarity",
                ));
            }
            lac as u32
        } else {
            1
        };

        let amplitude_sum = (0..params.octaves)
            .scan(1.0_f32, |amp, _| {
                let a = *amp;
                *amp *= params.gain;
                Some(a)
            })
            .sum();

        Ok(Self { params, period, period_step, amplitude_sum })
    }

    /// Parameters this field was built from.
    pub fn params(&self) -> &FractalParams {
        &self.params
    }

    /// Sample the field of the given kind.
    pub fn sample(&self, kind: FractalKind, p: Vec3) -> f32 {
        match kind {
            FractalKind::Fbm => self.fbm(p),
            FractalKind::Ridged => self.ridged(p),
            FractalKind::Turbulence => self.turbulence(p),
        }
    }

    /// Fractal Brownian motion.
    pub fn fbm(&self, p: Vec3) -> f32 {
        let sum = self.accumulate(p, |n, amp, _| n * amp);
        if self.params.normalize {
            (sum / self.amplitude_sum).clamp(-1.0, 1.0)
        } else {
            sum
        }
    }

    /// Turbulence: octaves folded by absolute value.
    pub fn turbulence(&self, p: Vec3) -> f32 {
        let sum = self.accumulate(p, |n, amp, _| n.abs() * amp);
        if self.params.normalize {
            signed((sum / self.amplitude_sum).min(1.0))
        } else {
            sum
        }
    }

    /// Ridged multifractal.
    pub fn ridged(&self, p: Vec3) -> f32 {
        let offset = self.params.offset;
        let sum = self.accumulate(p, |n, amp, prev| {
            let r = (offset - n.abs()).max(0.0);
            let r = r * r;
            let weighted = r * amp * *prev;
            *prev = r.clamp(0.0, 1.0);
            weighted
        });
        if self.params.normalize {
            signed((sum / (self.amplitude_sum * offset * offset)).min(1.0))
        } else {
            sum
        }
    }

    /// Run the octave loop. `term(noise, amplitude, &mut state)` returns the
    /// contribution of one octave; `state` starts at 1 and is carried across
    /// octaves.
    fn accumulate<F>(&self, p: Vec3, mut term: F) -> f32
    where
        F: FnMut(f32, f32, &mut f32) -> f32,
    {
        let mut sum = 0.0_f32;
        let mut frequency = 1.0_f32;
        let mut amplitude = 1.0_f32;
        let mut state = 1.0_f32;
        let mut period = self.period;
        for k in 0..self.params.octaves {
            let n = noise_seeded(p * frequency, period, k as u8);
            sum += term(n, amplitude, &mut state);
            frequency *= self.params.lacunarity;
            amplitude *= self.params.gain;
            period = period.map(|per| per.scaled(self.period_step));
        }
        sum
    }
}

#[inline]
fn signed(unit: f32) -> f32 {
    unit * 2.0 - 1.0
}
