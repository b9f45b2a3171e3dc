use texel_core::TexelError;

/// Errors raised while reading or writing image files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Texel(#[from] TexelError),
    #[error("unsupported: {0}")]
    Unsupported(String),
}
