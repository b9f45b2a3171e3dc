//! Coherent noise: gradient noise core and fractal octave synthesis.
//!
//! Every function here returns signed values in `[-1, 1]` (fractal fields
//! when normalized). Image generators map that range to `[0, 1]` themselves.

pub mod fractal;
pub mod perlin;

pub use fractal::{Fractal, FractalKind, FractalParams};
pub use perlin::{Period, noise, noise_seeded};
