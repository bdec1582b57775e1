use thiserror::Error;

/// Errors the scan pipeline can surface to the caller.
///
/// A frame in which no symbol is found is *not* an error; that case is
/// reported as [`crate::models::ScanOutcome::NotFound`]. The only failure
/// mode here is a frame that violates the pipeline's preconditions.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The input cannot be interpreted as a raster image (e.g. zero-sized).
    /// No stage is attempted.
    #[error("invalid input image: {0}")]
    InvalidImage(String),
}
