//! The shadow stack: cache invalidation and render driving
//!
//! A `ShadowStack` owns an ordered, fixed-size collection of shadows plus
//! the cached ARGB composite of all of them. Every render call runs the
//! same decision ladder:
//!
//! 1. Resolve the device scale (1.0 in low-quality mode).
//! 2. Normalize the path: stroke if requested, then strip the bounding-box
//!    origin. The origin-agnostic path is the cache key.
//! 3. Compare against the cached geometry: a changed shape or scale
//!    re-renders every mask; a moved shape only updates the stored origin;
//!    an unchanged shape refreshes at most the masks whose blur parameters
//!    were touched.
//! 4. Rebuild the composite if any style or mask changed.
//! 5. Blit the composite, mapped from device resolution back to logical
//!    units.
//!
//! Separating "shape changed" from "shape moved" is the point: pure
//! translation, the common case under animation, never re-blurs.

use crate::geometry::{approx_eq, IntPoint, IntRect, Point};
use crate::paint::canvas::Canvas;
use crate::shadow::composite::CompositeCache;
use crate::shadow::params::ShadowSpec;
use crate::shadow::single::SingleShadowRenderer;
use crate::shadow::stroke::StrokeStyle;
use crate::Rgba;
use tiny_skia::{Path, Rect, Transform};

/// Counters for cache observability
///
/// Exposed so callers (and tests) can verify that redraws hit the cache:
/// an idempotent redraw advances neither counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
  /// Number of single-shadow mask renders (the expensive blurs)
  pub mask_renders: u64,
  /// Number of full composite rebuilds
  pub composites: u64,
}

/// An ordered stack of cached drop/inner shadows for one shape
///
/// Constructed once per logical shadowed shape with a fixed shadow list;
/// styles are mutated through the per-index setters, geometry arrives with
/// each [`ShadowStack::render`] call. Confine an instance to one rendering
/// thread.
///
/// # Examples
///
/// ```
/// use softshadow::{Canvas, Rgba, ShadowSpec, ShadowStack};
/// use tiny_skia::{PathBuilder, Rect};
///
/// let mut canvas = Canvas::new(200, 200, Rgba::WHITE)?;
/// let path = PathBuilder::from_rect(Rect::from_xywh(50.0, 50.0, 80.0, 80.0).unwrap());
/// let mut stack = ShadowStack::new([ShadowSpec::new(Rgba::BLACK.with_alpha(0.5), 8)]);
///
/// stack.render(&mut canvas, &path, false); // blurs and composites
/// stack.render(&mut canvas, &path, false); // pure cache hit
/// assert_eq!(stack.stats().mask_renders, 1);
/// # Ok::<(), softshadow::Error>(())
/// ```
pub struct ShadowStack {
  renderers: Box<[SingleShadowRenderer]>,

  // Cached geometry. The stored path is origin-agnostic; any offset the
  // incoming path had is kept separately in `path_origin`.
  last_path: Option<Path>,
  last_path_scaled: Option<Path>,
  last_scale: f32,
  path_origin: Point,

  composite: CompositeCache,

  stroked: bool,
  stroke_style: Option<StrokeStyle>,

  needs_recalculate: bool,
  needs_recomposite: bool,
  optimize_clip_bounds: bool,

  stats: CacheStats,
}

impl ShadowStack {
  /// Creates a stack from an ordered list of shadow specs
  ///
  /// Order is paint order: later shadows are painted on top.
  ///
  /// # Panics
  ///
  /// Panics if `specs` is empty; a stack without shadows is a programming
  /// error, not a runtime condition.
  pub fn new(specs: impl IntoIterator<Item = ShadowSpec>) -> Self {
    Self::build(specs, false)
  }

  /// Creates a stack forcing every shadow to render as an inner shadow
  pub fn new_inner(specs: impl IntoIterator<Item = ShadowSpec>) -> Self {
    Self::build(specs, true)
  }

  fn build(specs: impl IntoIterator<Item = ShadowSpec>, force_inner: bool) -> Self {
    let renderers: Box<[SingleShadowRenderer]> = specs
      .into_iter()
      .map(|mut spec| {
        if force_inner {
          spec.inner = true;
        }
        SingleShadowRenderer::new(spec)
      })
      .collect();
    assert!(
      !renderers.is_empty(),
      "a ShadowStack needs at least one shadow spec"
    );

    Self {
      renderers,
      last_path: None,
      last_path_scaled: None,
      last_scale: 1.0,
      path_origin: Point::ZERO,
      composite: CompositeCache::new(),
      stroked: false,
      stroke_style: None,
      needs_recalculate: true,
      needs_recomposite: true,
      optimize_clip_bounds: false,
      stats: CacheStats::default(),
    }
  }

  /// Renders the shadows for `path` onto `canvas`
  ///
  /// With `low_quality` the blur runs at 1x regardless of the canvas's
  /// physical pixel scale.
  pub fn render(&mut self, canvas: &mut Canvas, path: &Path, low_quality: bool) {
    let scale = if low_quality { 1.0 } else { canvas.pixel_scale() };

    // Painting on a different monitor (or toggling quality) breaks the
    // cache: blur geometry depends on the pixel grid.
    if !approx_eq(self.last_scale, scale) {
      self.needs_recalculate = true;
      self.last_scale = scale;
    }

    // Stroking changes bounds, so it happens before the origin is stripped
    // and compared against the cache.
    let incoming = if self.stroked {
      match self
        .stroke_style
        .as_ref()
        .and_then(|style| style.stroke_path(path, scale))
      {
        Some(stroked) => stroked,
        None => return,
      }
    } else {
      path.clone()
    };

    // Strip the origin. Translating a shape around the UI changes only
    // this origin, never the cache key.
    let bounds = incoming.bounds();
    let origin = Point::new(bounds.left(), bounds.top());
    let Some(origin_agnostic) =
      incoming.transform(Transform::from_translate(-origin.x, -origin.y))
    else {
      return;
    };

    if self.needs_recalculate || self.last_path.as_ref() != Some(&origin_agnostic) {
      self.last_path_scaled = origin_agnostic
        .clone()
        .transform(Transform::from_scale(scale, scale));
      self.last_path = Some(origin_agnostic);
      self.path_origin = origin;
      self.recalculate_blurs(scale);
    } else {
      if origin != self.path_origin {
        // Same shape, new coordinates: reposition the cached shadows.
        self.path_origin = origin;
      }
      self.rerender_dirty_masks(scale);
    }

    if self.needs_recomposite {
      self.recomposite();
    }

    self.draw_composite(canvas, scale);
  }

  /// Renders the shadows for the stroked outline of `path`
  ///
  /// A changed stroke style invalidates the whole geometry cache, exactly
  /// like a changed path.
  pub fn render_stroked(
    &mut self,
    canvas: &mut Canvas,
    path: &Path,
    style: &StrokeStyle,
    low_quality: bool,
  ) {
    self.stroked = true;
    if self.stroke_style.as_ref() != Some(style) {
      self.stroke_style = Some(style.clone());
      self.needs_recalculate = true;
    }
    self.render(canvas, path, low_quality);
  }

  // ========================================================================
  // Per-index style setters
  //
  // An out-of-range index is a silent no-op: "no such slot for this
  // configuration" is a normal state, not an error. Radius and spread
  // dirty the target shadow's mask; color, opacity, and offset only
  // schedule a recomposite.
  // ========================================================================

  /// Sets the blur radius of shadow `index`
  pub fn set_radius(&mut self, index: usize, radius: i32) {
    if let Some(renderer) = self.renderers.get_mut(index) {
      if renderer.update_radius(radius) {
        renderer.set_mask_dirty();
      }
    }
  }

  /// Sets the spread of shadow `index`
  pub fn set_spread(&mut self, index: usize, spread: i32) {
    if let Some(renderer) = self.renderers.get_mut(index) {
      if renderer.update_spread(spread) {
        renderer.set_mask_dirty();
      }
    }
  }

  /// Sets the offset of shadow `index`
  pub fn set_offset(&mut self, index: usize, offset: IntPoint) {
    let scale = self.last_scale;
    if let Some(renderer) = self.renderers.get_mut(index) {
      if renderer.update_offset(offset, scale) {
        self.needs_recomposite = true;
      }
    }
  }

  /// Sets the color of shadow `index`
  pub fn set_color(&mut self, index: usize, color: Rgba) {
    if let Some(renderer) = self.renderers.get_mut(index) {
      if renderer.update_color(color) {
        self.needs_recomposite = true;
      }
    }
  }

  /// Sets the opacity of shadow `index`, keeping its color
  pub fn set_opacity(&mut self, index: usize, opacity: f32) {
    if let Some(renderer) = self.renderers.get_mut(index) {
      if renderer.update_opacity(opacity) {
        self.needs_recomposite = true;
      }
    }
  }

  /// Skips painting beneath the shape's interior during the final blit
  ///
  /// Only valid when the caller guarantees the interior is painted
  /// separately (an opaque fill over the shadow, say).
  pub fn set_optimize_clip_bounds(&mut self, optimize: bool) {
    self.optimize_clip_bounds = optimize;
  }

  /// Cache observability counters
  pub fn stats(&self) -> CacheStats {
    self.stats
  }

  /// Device-space bounds of the current composite; empty before the first
  /// render or when every shadow is degenerate
  pub fn composite_bounds(&self) -> IntRect {
    self.composite.bounds()
  }

  // ========================================================================
  // Internals
  // ========================================================================

  /// Re-renders every shadow mask against the cached origin-agnostic path.
  fn recalculate_blurs(&mut self, scale: f32) {
    let Some(path) = self.last_path.as_ref() else {
      return;
    };
    log::trace!(
      "re-rendering {} shadow mask(s) at scale {scale}",
      self.renderers.len()
    );
    for renderer in self.renderers.iter_mut() {
      renderer.render(path, scale, self.stroked);
      self.stats.mask_renders += 1;
    }
    self.needs_recalculate = false;
    self.needs_recomposite = true;
  }

  /// Re-renders only the masks whose radius or spread changed.
  fn rerender_dirty_masks(&mut self, scale: f32) {
    let Some(path) = self.last_path.as_ref() else {
      return;
    };
    for renderer in self.renderers.iter_mut() {
      if renderer.mask_dirty() {
        renderer.render(path, scale, self.stroked);
        self.stats.mask_renders += 1;
        self.needs_recomposite = true;
      }
    }
  }

  fn recomposite(&mut self) {
    self.composite
      .rebuild(&self.renderers, self.last_path_scaled.as_ref());
    self.needs_recomposite = false;
    self.stats.composites += 1;
    log::trace!("rebuilt shadow composite {}", self.composite.bounds());
  }

  /// Blits the cached composite onto the canvas.
  fn draw_composite(&self, canvas: &mut Canvas, scale: f32) {
    // Default constructions, all-degenerate stacks: nothing to paint.
    let Some(image) = self.composite.image() else {
      return;
    };

    canvas.save();

    if self.optimize_clip_bounds {
      if let Some(path) = self.last_path.as_ref() {
        let bounds = path.bounds();
        if let Some(interior) = Rect::from_xywh(
          self.path_origin.x,
          self.path_origin.y,
          bounds.width(),
          bounds.height(),
        ) {
          canvas.exclude_clip_rect(interior);
        }
      }
    }

    // The composite already carries each shadow's color and opacity.
    canvas.set_opacity(1.0);

    // The composite was rendered at device resolution; mapping it back to
    // logical units places it 1:1 on the pixel grid.
    let position = self.composite.position().to_point() + self.path_origin.scaled(scale);
    let transform =
      Transform::from_translate(position.x, position.y).post_scale(1.0 / scale, 1.0 / scale);
    canvas.draw_pixmap(image.as_ref(), transform);

    canvas.restore();
  }
}
