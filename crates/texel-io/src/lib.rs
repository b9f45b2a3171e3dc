//! Texel IO: file codecs for `texel-core` image buffers.
//!
//! Decoding and encoding are delegated to the `image` crate. This crate only
//! decides between the float (HDR) and 8-bit (LDR) paths and applies the
//! gamma and byte conversions between them.

pub mod error;
pub mod load;
pub mod save;

pub use error::IoError;
pub use load::{
    is_hdr_filename, load_image4b, load_image4b_from_memory, load_image4f,
    load_image4f_from_memory,
};
pub use save::{save_image3f, save_image4b, save_image4f};
