//! Reconstruction kernels for separable resampling.
//!
//! Every kernel is even (`w(t) == w(-t)`) and exactly zero outside
//! [`Filter::radius`]. The cubic family shares the Mitchell–Netravali
//! two-parameter polynomial:
//!
//! ```text
//! |t| < 1:      ((12 - 9B - 6C)|t|³ + (-18 + 12B + 6C)|t|² + (6 - 2B)) / 6
//! 1 <= |t| < 2: ((-B - 6C)|t|³ + (6B + 30C)|t|² + (-12B - 48C)|t| + (8B + 24C)) / 6
//! ```
//!
//! | kernel       | B   | C   |
//! |--------------|-----|-----|
//! | cubic spline | 1   | 0   |
//! | Catmull-Rom  | 0   | 1/2 |
//! | Mitchell     | 1/3 | 1/3 |

use serde::{Deserialize, Serialize};

/// Filter kernel used to derive resampling weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Nearest-area box, radius 0.5.
    Box,
    /// Linear tent, radius 1. Default for both up- and down-sampling.
    #[default]
    Triangle,
    /// Cubic B-spline (B=1, C=0), radius 2. Smooth, slightly blurry.
    CubicSpline,
    /// Catmull-Rom (B=0, C=1/2), radius 2. Interpolating, sharp.
    CatmullRom,
    /// Mitchell-Netravali (B=C=1/3), radius 2.
    Mitchell,
}

impl Filter {
    /// Support radius in source pixels at unit scale.
    pub const fn radius(self) -> f32 {
        match self {
            Self::Box => 0.5,
            Self::Triangle => 1.0,
            Self::CubicSpline | Self::CatmullRom | Self::Mitchell => 2.0,
        }
    }

    /// Kernel weight at offset `t` from the sample center.
    pub fn weight(self, t: f32) -> f32 {
        let x = t.abs();
        match self {
            Self::Box => {
                if x < 0.5 {
                    1.0
                } else if x == 0.5 {
                    // Split the boundary so the kernel stays even.
                    0.5
                } else {
                    0.0
                }
            }
            Self::Triangle => (1.0 - x).max(0.0),
            Self::CubicSpline => bc_cubic(x, 1.0, 0.0),
            Self::CatmullRom => bc_cubic(x, 0.0, 0.5),
            Self::Mitchell => bc_cubic(x, 1.0 / 3.0, 1.0 / 3.0),
        }
    }

    /// Human-readable label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Triangle => "triangle",
            Self::CubicSpline => "cubic spline",
            Self::CatmullRom => "Catmull-Rom",
            Self::Mitchell => "Mitchell",
        }
    }
}

/// Mitchell–Netravali piecewise cubic evaluated at `x = |t|`.
fn bc_cubic(x: f32, b: f32, c: f32) -> f32 {
    let x2 = x * x;
    let x3 = x2 * x;
    if x < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * x3 + (-18.0 + 12.0 * b + 6.0 * c) * x2 + (6.0 - 2.0 * b))
            / 6.0
    } else if x < 2.0 {
        ((-b - 6.0 * c) * x3 + (6.0 * b + 30.0 * c) * x2 + (-12.0 * b - 48.0 * c) * x
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}
