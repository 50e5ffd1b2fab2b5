//! Cached single-channel rendering of one shadow
//!
//! Each shadow owns one blurred coverage mask, rendered as small as
//! possible and always with the path at the local origin. The mask never
//! encodes the shadow's offset — placement happens at composite time — so
//! moving or recoloring a shape reuses the mask untouched.

use crate::geometry::{approx_eq, IntPoint, IntRect};
use crate::paint::blur;
use crate::paint::pixmap::new_mask;
use crate::shadow::params::ShadowSpec;
use crate::Rgba;
use tiny_skia::{FillRule, Mask, Path, Rect, Transform};

/// Rounds path bounds out to the device pixel grid at `scale`.
fn scale_round_out(bounds: Rect, scale: f32) -> IntRect {
  IntRect::from_ltrb(
    (bounds.left() * scale).floor() as i32,
    (bounds.top() * scale).floor() as i32,
    (bounds.right() * scale).ceil() as i32,
    (bounds.bottom() * scale).ceil() as i32,
  )
}

/// Scales `path` so its bounds grow by `spread` logical units per side.
///
/// Returns `None` when the path or the adjusted bounds are degenerate.
fn spread_path(path: &Path, spread: f32) -> Option<Path> {
  let bounds = path.bounds();
  if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
    return None;
  }
  let new_width = bounds.width() + spread * 2.0;
  let new_height = bounds.height() + spread * 2.0;
  if new_width <= 0.0 || new_height <= 0.0 {
    return None;
  }
  let ts = Transform::from_translate(-bounds.left(), -bounds.top())
    .post_scale(new_width / bounds.width(), new_height / bounds.height())
    .post_translate(bounds.left() - spread, bounds.top() - spread);
  path.clone().transform(ts)
}

/// One shadow's parameters plus its cached, position-independent mask
pub(crate) struct SingleShadowRenderer {
  pub(crate) params: ShadowSpec,
  mask: Option<Mask>,
  scaled_shadow_bounds: IntRect,
  scaled_path_bounds: IntRect,
  scaled_radius: i32,
  scaled_spread: i32,
  // Stored separately so placement can change without touching the mask.
  scaled_offset: IntPoint,
  mask_dirty: bool,
}

impl SingleShadowRenderer {
  pub(crate) fn new(params: ShadowSpec) -> Self {
    Self {
      params,
      mask: None,
      scaled_shadow_bounds: IntRect::EMPTY,
      scaled_path_bounds: IntRect::EMPTY,
      scaled_radius: 0,
      scaled_spread: 0,
      scaled_offset: IntPoint::ZERO,
      mask_dirty: false,
    }
  }

  /// Shadow bounds with the current offset applied at read time only
  pub(crate) fn scaled_bounds(&self) -> IntRect {
    self.scaled_shadow_bounds.translated(self.scaled_offset)
  }

  pub(crate) fn scaled_path_bounds(&self) -> IntRect {
    self.scaled_path_bounds
  }

  pub(crate) fn mask(&self) -> Option<&Mask> {
    self.mask.as_ref()
  }

  pub(crate) fn mask_dirty(&self) -> bool {
    self.mask_dirty
  }

  pub(crate) fn set_mask_dirty(&mut self) {
    self.mask_dirty = true;
  }

  // ========================================================================
  // Compare-and-set parameter updates
  //
  // Each returns whether anything changed, so the owning stack can fold the
  // result into its dirty flags. Radius and spread change blur geometry
  // (mask recompute); color, opacity, and offset only affect compositing.
  // ========================================================================

  pub(crate) fn update_radius(&mut self, radius: i32) -> bool {
    let radius = radius.max(0);
    if radius == self.params.radius {
      return false;
    }
    self.params.radius = radius;
    true
  }

  pub(crate) fn update_spread(&mut self, spread: i32) -> bool {
    if spread == self.params.spread {
      return false;
    }
    self.params.spread = spread;
    true
  }

  pub(crate) fn update_color(&mut self, color: Rgba) -> bool {
    if color == self.params.color {
      return false;
    }
    self.params.color = color;
    true
  }

  pub(crate) fn update_opacity(&mut self, opacity: f32) -> bool {
    if approx_eq(opacity, self.params.color.a) {
      return false;
    }
    self.params.color = self.params.color.with_alpha(opacity);
    true
  }

  /// Updates the logical offset, eagerly deriving the device-space offset
  pub(crate) fn update_offset(&mut self, offset: IntPoint, scale: f32) -> bool {
    if offset == self.params.offset {
      return false;
    }
    self.params.offset = offset;
    self.scaled_offset = offset.scaled_round(scale);
    true
  }

  /// Recomputes device-space radius, spread, offset, and shadow bounds
  ///
  /// Inner shadows expand path bounds by `radius - spread` per side (spread
  /// shrinks the effective interior); drop shadows by `radius + spread`
  /// (spread grows the outline before blurring). Non-integral scales pad by
  /// one pixel per side so anti-aliased mask edges survive the blur.
  fn compute_scaled_bounds(&mut self, scale: f32) {
    self.scaled_radius = (self.params.radius as f32 * scale).round() as i32;
    self.scaled_spread = (self.params.spread as f32 * scale).round() as i32;
    self.scaled_offset = self.params.offset.scaled_round(scale);

    let expand = if self.params.inner {
      self.scaled_radius - self.scaled_spread
    } else {
      self.scaled_radius + self.scaled_spread
    };
    self.scaled_shadow_bounds = self.scaled_path_bounds.expanded(expand, expand);

    if !approx_eq(scale - scale.floor(), 0.0) {
      self.scaled_shadow_bounds = self.scaled_shadow_bounds.expanded(1, 1);
    }
  }

  /// Renders the blurred coverage mask for `path` at `scale`
  ///
  /// This is the expensive step the cache exists to avoid repeating. The
  /// path must be origin-agnostic (bounds anchored at 0,0). Bounds are
  /// always recomputed together with the mask, never independently.
  pub(crate) fn render(&mut self, path: &Path, scale: f32, stroked: bool) {
    debug_assert!(scale > 0.0);
    self.mask_dirty = false;
    self.scaled_path_bounds = scale_round_out(path.bounds(), scale);
    self.compute_scaled_bounds(scale);
    self.mask = self.render_mask(path, scale, stroked);
  }

  fn render_mask(&self, path: &Path, scale: f32, stroked: bool) -> Option<Mask> {
    // Zero-radius and collapsed-bounds shadows are valid and paint nothing.
    if self.scaled_radius < 1 || self.scaled_shadow_bounds.is_empty() {
      return None;
    }

    // Spread scales the path itself, at 1x; it will be upscaled below.
    // Spread is not applied to stroked outlines.
    let spread = self.params.spread;
    let spread_adjusted;
    let shadow_path = if !stroked && spread != 0 {
      let signed = if self.params.inner { -spread } else { spread };
      spread_adjusted = spread_path(path, signed as f32)?;
      &spread_adjusted
    } else {
      path
    };

    let bounds = self.scaled_shadow_bounds;
    let mut mask = new_mask(bounds.width as u32, bounds.height as u32)?;

    // Rasterize into mask-local space: device coordinates shifted so the
    // (negative) shadow-bounds origin lands at 0,0.
    let ts = Transform::from_scale(scale, scale)
      .post_translate(-(bounds.x as f32), -(bounds.y as f32));
    mask.fill_path(shadow_path, FillRule::Winding, true, ts);

    // An inner shadow is a drop shadow cast by the inverted path: the
    // region outside the outline, blurred inward.
    if self.params.inner {
      for coverage in mask.data_mut() {
        *coverage = 255 - *coverage;
      }
    }

    blur::single_channel(&mut mask, self.scaled_radius as u32);
    Some(mask)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tiny_skia::PathBuilder;

  fn square(size: f32) -> Path {
    PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, size, size).unwrap())
  }

  fn spec(radius: i32) -> ShadowSpec {
    ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), radius)
  }

  #[test]
  fn update_returns_changed_flag() {
    let mut renderer = SingleShadowRenderer::new(spec(10));
    assert!(!renderer.update_radius(10));
    assert!(renderer.update_radius(12));
    assert!(!renderer.update_spread(0));
    assert!(renderer.update_spread(3));
    assert!(!renderer.update_opacity(0.5));
    assert!(renderer.update_opacity(0.25));
    assert!(!renderer.update_offset(IntPoint::ZERO, 1.0));
    assert!(renderer.update_offset(IntPoint::new(2, 0), 1.0));
  }

  #[test]
  fn offset_applies_at_read_time() {
    let mut renderer = SingleShadowRenderer::new(spec(5));
    renderer.render(&square(20.0), 1.0, false);
    let unmoved = renderer.scaled_bounds();

    assert!(renderer.update_offset(IntPoint::new(3, -2), 1.0));
    assert_eq!(
      renderer.scaled_bounds(),
      unmoved.translated(IntPoint::new(3, -2))
    );
    // The mask itself is untouched by an offset change.
    assert!(renderer.mask().is_some());
  }

  #[test]
  fn drop_shadow_bounds_expand_by_radius_plus_spread() {
    let mut renderer = SingleShadowRenderer::new(spec(10).with_spread(2));
    renderer.render(&square(100.0), 1.0, false);
    assert_eq!(renderer.scaled_path_bounds(), IntRect::new(0, 0, 100, 100));
    assert_eq!(renderer.scaled_bounds(), IntRect::new(-12, -12, 124, 124));
    let mask = renderer.mask().unwrap();
    assert_eq!(mask.width(), 124);
    assert_eq!(mask.height(), 124);
  }

  #[test]
  fn inner_shadow_bounds_expand_by_radius_minus_spread() {
    let mut renderer = SingleShadowRenderer::new(spec(10).with_spread(2).inner());
    renderer.render(&square(100.0), 1.0, false);
    assert_eq!(renderer.scaled_bounds(), IntRect::new(-8, -8, 116, 116));
  }

  #[test]
  fn fractional_scale_pads_bounds() {
    let mut renderer = SingleShadowRenderer::new(spec(10));
    renderer.render(&square(100.0), 1.5, false);
    // 100 * 1.5 = 150 path pixels, + 15 radius per side, + 1 sub-pixel pad.
    assert_eq!(renderer.scaled_bounds(), IntRect::new(-16, -16, 182, 182));
  }

  #[test]
  fn zero_radius_renders_no_mask() {
    let mut renderer = SingleShadowRenderer::new(spec(0));
    renderer.render(&square(50.0), 1.0, false);
    assert!(renderer.mask().is_none());
  }

  #[test]
  fn inner_mask_is_strong_at_edges_weak_in_center() {
    let mut renderer = SingleShadowRenderer::new(spec(4).inner());
    renderer.render(&square(64.0), 1.0, false);
    let mask = renderer.mask().unwrap();
    let w = mask.width() as usize;
    let center = mask.data()[(mask.height() as usize / 2) * w + w / 2];
    let edge = mask.data()[(mask.height() as usize / 2) * w + 4];
    assert!(edge > center, "edge={edge} center={center}");
    assert_eq!(center, 0, "deep interior of a large shape stays clear");
  }

  #[test]
  fn identical_renders_are_pixel_identical() {
    let mut a = SingleShadowRenderer::new(spec(6).with_spread(1));
    let mut b = SingleShadowRenderer::new(spec(6).with_spread(1));
    a.render(&square(40.0), 2.0, false);
    b.render(&square(40.0), 2.0, false);
    assert_eq!(a.mask().unwrap().data(), b.mask().unwrap().data());
  }
}
