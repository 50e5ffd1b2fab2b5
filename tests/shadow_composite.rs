//! Pixel-level compositing properties, exercised through the public API:
//! clipping, inner-shadow edge coverage, paint order, interior exclusion,
//! and stroked outlines.

use softshadow::{Canvas, DropShadow, InnerShadow, IntPoint, Rgba, ShadowSpec, StrokeStyle};
use tiny_skia::{Path, PathBuilder, Rect};

fn square_at(x: f32, y: f32, size: f32) -> Path {
  PathBuilder::from_rect(Rect::from_xywh(x, y, size, size).unwrap())
}

fn transparent_canvas() -> Canvas {
  Canvas::new(300, 300, Rgba::TRANSPARENT).unwrap()
}

fn alpha_at(canvas: &Canvas, x: u32, y: u32) -> u8 {
  canvas.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
}

#[test]
fn drop_shadow_paints_outside_the_outline() {
  let mut canvas = transparent_canvas();
  let mut shadow = DropShadow::with(ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 8));
  shadow.render(&mut canvas, &square_at(100.0, 100.0, 60.0), false);

  // Just outside the left edge, within blur reach.
  assert!(alpha_at(&canvas, 95, 130) > 0);
  // Under the shape (the caller's fill would cover this).
  assert!(alpha_at(&canvas, 130, 130) > 0);
  // Far outside blur reach.
  assert_eq!(alpha_at(&canvas, 80, 130), 0);
}

#[test]
fn inner_shadow_stays_inside_the_outline() {
  let mut canvas = transparent_canvas();
  let mut shadow = InnerShadow::with(ShadowSpec::new(Rgba::BLACK, 8));
  shadow.render(&mut canvas, &square_at(100.0, 100.0, 60.0), false);

  // Inside, near the edge: strong shadow.
  assert!(alpha_at(&canvas, 102, 130) > 0);
  // Outside the outline: clipped away entirely.
  assert_eq!(alpha_at(&canvas, 98, 130), 0);
  // Deep interior, beyond blur reach: clear.
  assert_eq!(alpha_at(&canvas, 130, 130), 0);
}

#[test]
fn offset_inner_shadow_has_no_interior_gap() {
  // Offset magnitude (15) exceeds radius + spread (5): the cached mask no
  // longer covers the far side of the shape, and the edge fill must close
  // the gap with solid shadow color.
  let mut canvas = transparent_canvas();
  let mut shadow = InnerShadow::with(
    ShadowSpec::new(Rgba::rgb(10, 20, 30), 5).with_offset(IntPoint::new(15, 0)),
  );
  shadow.render(&mut canvas, &square_at(100.0, 100.0, 40.0), false);

  // The whole band the mask cannot reach is solid shadow color.
  for x in 100..110 {
    let pixel = canvas.pixmap().pixel(x, 120).unwrap();
    assert_eq!(pixel.alpha(), 255, "gap at x={x}");
    assert_eq!(pixel.red(), 10);
    assert_eq!(pixel.green(), 20);
    assert_eq!(pixel.blue(), 30);
  }
  // Still clipped to the outline.
  assert_eq!(alpha_at(&canvas, 99, 120), 0);
  // Center of the shape: radius away from every edge band, clear.
  assert_eq!(alpha_at(&canvas, 120, 120), 0);
}

#[test]
fn later_shadows_composite_on_top() {
  let mut canvas = transparent_canvas();
  let mut shadow = DropShadow::new([
    ShadowSpec::new(Rgba::rgb(255, 0, 0), 4),
    ShadowSpec::new(Rgba::rgb(0, 0, 255), 4),
  ]);
  shadow.render(&mut canvas, &square_at(100.0, 100.0, 50.0), false);

  let center = canvas.pixmap().pixel(125, 125).unwrap();
  assert_eq!(center.blue(), 255);
  assert_eq!(center.red(), 0);
}

#[test]
fn interior_exclusion_skips_pixels_under_the_shape() {
  let path = square_at(50.0, 50.0, 60.0);

  let mut plain = transparent_canvas();
  let mut shadow = DropShadow::with(ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 6));
  shadow.render(&mut plain, &path, false);
  assert!(alpha_at(&plain, 80, 80) > 0);

  let mut excluded = transparent_canvas();
  let mut shadow = DropShadow::with(ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 6));
  shadow.set_optimize_clip_bounds(true);
  shadow.render(&mut excluded, &path, false);

  // Interior masked out, surrounding halo untouched.
  assert_eq!(alpha_at(&excluded, 80, 80), 0);
  assert_eq!(alpha_at(&excluded, 47, 80), alpha_at(&plain, 47, 80));
  assert!(alpha_at(&excluded, 47, 80) > 0);
}

#[test]
fn stroked_outline_casts_a_ring_shadow() {
  let mut canvas = transparent_canvas();
  let mut shadow = DropShadow::with(ShadowSpec::new(Rgba::BLACK, 5));
  let path = square_at(100.0, 100.0, 50.0);

  shadow.render_stroked(&mut canvas, &path, &StrokeStyle::new(4.0), false);

  // Shadow just outside the stroked edge.
  assert!(alpha_at(&canvas, 96, 125) > 0);
  // On the stroke body itself.
  assert!(alpha_at(&canvas, 100, 125) > 0);
  // The hole of the ring is beyond blur reach of either stroke edge.
  assert_eq!(alpha_at(&canvas, 125, 125), 0);

  // A repeated stroked render is a pure cache hit.
  let cached = shadow.stats();
  shadow.render_stroked(&mut canvas, &path, &StrokeStyle::new(4.0), false);
  assert_eq!(shadow.stats(), cached);
}

#[test]
fn device_scale_doubles_composite_resolution() {
  let path = square_at(20.0, 20.0, 50.0);

  let mut canvas = Canvas::with_pixel_scale(150, 150, 2.0, Rgba::TRANSPARENT).unwrap();
  let mut shadow = DropShadow::with(ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 10));
  shadow.render(&mut canvas, &path, false);

  let bounds = shadow.composite_bounds();
  assert_eq!(bounds.width, 140);
  assert_eq!(bounds.height, 140);

  // Device pixel (40, 90): logical (20, 45), the shape's left edge —
  // covered by shadow at full device resolution.
  assert!(alpha_at(&canvas, 40, 90) > 0);
}
