//! Shadow style parameters

use crate::color::Rgba;
use crate::geometry::IntPoint;

/// Style of a single drop or inner shadow
///
/// A plain value type: a [`crate::ShadowStack`] is constructed from an
/// ordered list of these and mutates them through its per-index setters.
///
/// # Examples
///
/// ```
/// use softshadow::{IntPoint, Rgba, ShadowSpec};
///
/// let spec = ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 10)
///     .with_offset(IntPoint::new(5, 5))
///     .with_spread(2);
/// assert!(!spec.inner);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSpec {
  /// Flat shadow color; the blurred mask modulates only its alpha
  pub color: Rgba,
  /// Blur extent in logical units (non-negative)
  pub radius: i32,
  /// Placement offset in logical units, applied at composite time
  pub offset: IntPoint,
  /// Expands (drop) or contracts (inner) the outline before blurring
  pub spread: i32,
  /// Render inside the shape, clipped to its outline
  pub inner: bool,
}

impl ShadowSpec {
  /// Creates a drop-shadow spec with the given color and blur radius
  pub fn new(color: Rgba, radius: i32) -> Self {
    Self {
      color,
      radius: radius.max(0),
      offset: IntPoint::ZERO,
      spread: 0,
      inner: false,
    }
  }

  /// Sets the placement offset
  pub fn with_offset(mut self, offset: IntPoint) -> Self {
    self.offset = offset;
    self
  }

  /// Sets the spread
  pub fn with_spread(mut self, spread: i32) -> Self {
    self.spread = spread;
    self
  }

  /// Marks the shadow as an inner shadow
  pub fn inner(mut self) -> Self {
    self.inner = true;
    self
  }
}

impl Default for ShadowSpec {
  fn default() -> Self {
    Self::new(Rgba::TRANSPARENT, 1)
  }
}
