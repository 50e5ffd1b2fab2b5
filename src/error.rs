//! Error types for softshadow
//!
//! The fallible surface of this crate is small: creating a drawing surface
//! and guarding pixel-buffer allocations. Rendering itself never fails —
//! degenerate geometry and zero-sized shadows are valid "nothing to paint"
//! states, not errors.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations.

use thiserror::Error;

/// Result type alias for softshadow operations
///
/// # Examples
///
/// ```
/// use softshadow::Result;
///
/// fn make_surface() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for softshadow
#[derive(Error, Debug, Clone)]
pub enum Error {
  /// Canvas creation failed
  #[error("Failed to create canvas: {width}x{height}")]
  CanvasCreationFailed { width: u32, height: u32 },

  /// Invalid paint parameters
  #[error("Invalid paint parameters: {message}")]
  InvalidParameters { message: String },
}
