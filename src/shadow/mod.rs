//! Cached shadow rendering
//!
//! # Architecture
//!
//! Rendering a soft shadow means filling a path, blurring it, tinting it,
//! and blitting the result — and all but the blit are wasted work when the
//! shape and style haven't changed since the last frame. This module caches
//! at two levels:
//!
//! - `SingleShadowRenderer` holds one shadow's blurred single-channel
//!   mask, position-independent (path at the local origin).
//! - `CompositeCache` holds the merged, colored ARGB image of every shadow
//!   in the stack.
//!
//! [`ShadowStack`] ties them together with two dirty flags: geometry,
//!  scale, or stroke changes re-render the masks; color, opacity, or offset
//! changes only rebuild the composite; a pure translation does neither.
//!
//! [`DropShadow`] and [`InnerShadow`] are the convenience entry points for
//! the two common cases.

pub(crate) mod composite;
pub mod params;
pub(crate) mod single;
pub mod stack;
pub mod stroke;

pub use params::ShadowSpec;
pub use stack::{CacheStats, ShadowStack};
pub use stroke::StrokeStyle;

use std::ops::{Deref, DerefMut};

/// A stack of shadows rendered around a shape's outline
///
/// Thin wrapper over [`ShadowStack`]; derefs to it for rendering and
/// styling.
///
/// # Examples
///
/// ```
/// use softshadow::{Canvas, DropShadow, IntPoint, Rgba, ShadowSpec};
/// use tiny_skia::{PathBuilder, Rect};
///
/// let mut canvas = Canvas::new(100, 100, Rgba::WHITE)?;
/// let path = PathBuilder::from_rect(Rect::from_xywh(20.0, 20.0, 40.0, 40.0).unwrap());
/// let mut shadow =
///     DropShadow::with(ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 6).with_offset(IntPoint::new(2, 2)));
/// shadow.render(&mut canvas, &path, false);
/// # Ok::<(), softshadow::Error>(())
/// ```
pub struct DropShadow(ShadowStack);

impl DropShadow {
  /// Creates a drop-shadow stack from an ordered spec list
  pub fn new(specs: impl IntoIterator<Item = ShadowSpec>) -> Self {
    Self(ShadowStack::new(specs))
  }

  /// Creates a single-shadow stack
  pub fn with(spec: ShadowSpec) -> Self {
    Self::new([spec])
  }
}

impl Deref for DropShadow {
  type Target = ShadowStack;

  fn deref(&self) -> &ShadowStack {
    &self.0
  }
}

impl DerefMut for DropShadow {
  fn deref_mut(&mut self) -> &mut ShadowStack {
    &mut self.0
  }
}

/// A stack of shadows rendered inside a shape, clipped to its outline
///
/// Every spec is forced to `inner`; otherwise identical to [`DropShadow`].
pub struct InnerShadow(ShadowStack);

impl InnerShadow {
  /// Creates an inner-shadow stack from an ordered spec list
  pub fn new(specs: impl IntoIterator<Item = ShadowSpec>) -> Self {
    Self(ShadowStack::new_inner(specs))
  }

  /// Creates a single-shadow stack
  pub fn with(spec: ShadowSpec) -> Self {
    Self::new([spec])
  }
}

impl Deref for InnerShadow {
  type Target = ShadowStack;

  fn deref(&self) -> &ShadowStack {
    &self.0
  }
}

impl DerefMut for InnerShadow {
  fn deref_mut(&mut self) -> &mut ShadowStack {
    &mut self.0
  }
}
