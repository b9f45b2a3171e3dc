//! Image generators.
//!
//! Each generator validates its parameters and then evaluates a pure
//! per-pixel function through [`Image::from_fn`](crate::image::Image::from_fn),
//! which spreads rows across the rayon pool. Zero-sized requests fail with
//! [`TexelError::InvalidDimensions`](crate::TexelError::InvalidDimensions).

pub mod environment;
pub mod noise;
pub mod normal;
pub mod pattern;

pub use environment::{LightsParams, make_lights_image, make_sunsky_image};
pub use noise::{
    NoiseImageParams, make_fbm_image, make_noise_image, make_ridge_image, make_turbulence_image,
};
pub use normal::bump_to_normal_map;
pub use pattern::{
    PatternParams, RampParams, UvGridParams, make_bumpdimple_image, make_checker_image,
    make_gammaramp_image, make_grid_image, make_ramp_image, make_uvgrid_image, make_uvramp_image,
};
