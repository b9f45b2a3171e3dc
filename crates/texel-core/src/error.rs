/// Errors raised by the synthesis engine.
///
/// Every variant is an input-validation failure reported before any pixel is
/// computed. Numerically degenerate situations (near-zero alpha, vanishing
/// filter weight sums) are handled in place and never surface here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TexelError {
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("buffer holds {actual} pixels, expected {expected} for {width}x{height}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl TexelError {
    /// True for errors caused by a bad parameter value, as opposed to a
    /// buffer that disagrees with its stated dimensions.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::BufferLength { .. })
    }
}

/// Reject zero-sized images.
pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<(), TexelError> {
    if width == 0 || height == 0 {
        return Err(TexelError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Reject `value` outside the closed range `[min, max]`. NaN is always rejected.
pub(crate) fn check_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), TexelError> {
    if !(min..=max).contains(&value) {
        return Err(TexelError::OutOfRange { name, value, min, max });
    }
    Ok(())
}
