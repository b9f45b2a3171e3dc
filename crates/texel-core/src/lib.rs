//! Texel Core: procedural image synthesis.
//!
//! Image buffers, separable resampling, gradient and fractal noise, an
//! analytic sun-sky model, and the generators that rasterize them. Pure CPU
//! code with no IO; file codecs live in `texel-io`.

pub mod color;
pub mod error;
pub mod image;
pub mod noise;
pub mod raster;
pub mod recipe;
pub mod resample;
pub mod sky;

// Re-exports for convenience.
pub use error::TexelError;
pub use image::{BitDepth, Image, Image3b, Image3f, Image4b, Image4f, Pixel};
pub use noise::{Fractal, FractalKind, FractalParams, Period};
pub use recipe::{Generator, ImageRecipe};
pub use resample::{Edge, Filter, ResizeConfig, resize, resize_pixels};
pub use sky::{SkyModel, SkyParams, sky_radiance};
