//! Canvas wrapper for the tiny-skia 2D graphics library
//!
//! The drawing surface shadows are rendered onto. It wraps a tiny-skia
//! `Pixmap` and maintains a stack of graphics states (transform, opacity,
//! clip mask), plus the physical pixel scale of the surface so callers can
//! render device-resolution content on high-density displays.
//!
//! Drawing coordinates are logical units; the canvas's base transform maps
//! them onto the device pixel grid.
//!
//! # Example
//!
//! ```rust,ignore
//! use softshadow::{Canvas, Rgba};
//!
//! // A 200x150 logical surface backed by a 400x300 pixel buffer.
//! let mut canvas = Canvas::with_pixel_scale(200, 150, 2.0, Rgba::WHITE)?;
//! assert_eq!(canvas.pixel_scale(), 2.0);
//! ```

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::paint::pixmap::new_mask;
use tiny_skia::{
  BlendMode, FillRule, FilterQuality, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
  PixmapRef, Rect, Transform,
};

/// Graphics state for the canvas
///
/// States can be stacked with [`Canvas::save`]/[`Canvas::restore`] so a
/// caller can temporarily adjust the clip or opacity.
#[derive(Debug, Clone)]
struct CanvasState {
  /// Current transform from logical units to device pixels
  transform: Transform,
  /// Current opacity (0.0 to 1.0)
  opacity: f32,
  /// Clip mask in device pixels, if any
  clip_mask: Option<Mask>,
}

impl CanvasState {
  fn new(transform: Transform) -> Self {
    Self {
      transform,
      opacity: 1.0,
      clip_mask: None,
    }
  }

  /// Creates a paint with the current state applied
  fn create_paint(&self, color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    let alpha = color.a * self.opacity;
    paint.set_color_rgba8(
      color.r,
      color.g,
      color.b,
      (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    );
    paint.anti_alias = true;
    paint.blend_mode = BlendMode::SourceOver;
    paint
  }
}

/// A CPU drawing surface with a graphics state stack
///
/// Not thread-safe; create one canvas per rendering thread.
pub struct Canvas {
  /// The underlying pixel buffer, at device resolution
  pixmap: Pixmap,
  /// Ratio of device pixels to logical units
  pixel_scale: f32,
  /// Stack of saved graphics states
  state_stack: Vec<CanvasState>,
  /// Current graphics state
  current_state: CanvasState,
}

impl Canvas {
  /// Creates a canvas whose logical units coincide with device pixels
  ///
  /// # Errors
  ///
  /// Returns [`Error::CanvasCreationFailed`] when either dimension is zero
  /// or the buffer cannot be allocated.
  pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
    Self::with_pixel_scale(width, height, 1.0, background)
  }

  /// Creates a canvas of `width`x`height` logical units backed by a pixel
  /// buffer `scale` times larger
  ///
  /// `scale` is the surface's physical pixel scale (2.0 on a typical
  /// high-density display).
  pub fn with_pixel_scale(width: u32, height: u32, scale: f32, background: Rgba) -> Result<Self> {
    if scale <= 0.0 || !scale.is_finite() {
      return Err(Error::InvalidParameters {
        message: format!("pixel scale must be positive and finite, got {scale}"),
      });
    }
    let device_width = (width as f32 * scale).ceil() as u32;
    let device_height = (height as f32 * scale).ceil() as u32;
    let pixmap = Pixmap::new(device_width, device_height).ok_or(Error::CanvasCreationFailed {
      width: device_width,
      height: device_height,
    })?;

    let mut canvas = Self {
      pixmap,
      pixel_scale: scale,
      state_stack: Vec::new(),
      current_state: CanvasState::new(Transform::from_scale(scale, scale)),
    };
    canvas.clear(background);
    Ok(canvas)
  }

  /// Width of the underlying buffer in device pixels
  #[inline]
  pub fn width(&self) -> u32 {
    self.pixmap.width()
  }

  /// Height of the underlying buffer in device pixels
  #[inline]
  pub fn height(&self) -> u32 {
    self.pixmap.height()
  }

  /// The surface's physical pixel scale
  #[inline]
  pub fn pixel_scale(&self) -> f32 {
    self.pixel_scale
  }

  /// Fills the whole buffer with `color`, ignoring state
  pub fn clear(&mut self, color: Rgba) {
    let skia_color = tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.alpha_u8());
    self.pixmap.fill(skia_color);
  }

  /// Returns a reference to the underlying pixmap
  #[inline]
  pub fn pixmap(&self) -> &Pixmap {
    &self.pixmap
  }

  /// Returns a mutable reference to the underlying pixmap
  #[inline]
  pub fn pixmap_mut(&mut self) -> &mut Pixmap {
    &mut self.pixmap
  }

  /// Consumes the canvas and returns the underlying pixmap
  pub fn into_pixmap(self) -> Pixmap {
    self.pixmap
  }

  // ========================================================================
  // State management
  // ========================================================================

  /// Saves the current graphics state to the stack
  pub fn save(&mut self) {
    self.state_stack.push(self.current_state.clone());
  }

  /// Restores the previously saved graphics state
  ///
  /// Does nothing if the stack is empty.
  pub fn restore(&mut self) {
    if let Some(state) = self.state_stack.pop() {
      self.current_state = state;
    }
  }

  /// Returns the current state stack depth
  #[inline]
  pub fn state_depth(&self) -> usize {
    self.state_stack.len()
  }

  /// Sets the current opacity (0.0 to 1.0)
  pub fn set_opacity(&mut self, opacity: f32) {
    self.current_state.opacity = opacity.clamp(0.0, 1.0);
  }

  /// Returns the current opacity
  #[inline]
  pub fn opacity(&self) -> f32 {
    self.current_state.opacity
  }

  /// Removes a logical-space rectangle from the clip region
  ///
  /// Pixels inside `rect` will not be painted by subsequent draws until the
  /// state is restored. Used to skip painting beneath content the caller
  /// repaints anyway.
  pub fn exclude_clip_rect(&mut self, rect: Rect) {
    let Some(mut excluded) = new_mask(self.pixmap.width(), self.pixmap.height()) else {
      return;
    };
    let path = PathBuilder::from_rect(rect);
    excluded.fill_path(&path, FillRule::Winding, true, self.current_state.transform);
    for coverage in excluded.data_mut() {
      *coverage = 255 - *coverage;
    }
    match &mut self.current_state.clip_mask {
      Some(existing) => intersect_masks(existing, &excluded),
      None => self.current_state.clip_mask = Some(excluded),
    }
  }

  // ========================================================================
  // Drawing
  // ========================================================================

  /// Fills a path (in logical units) with a solid color
  pub fn fill_path(&mut self, path: &Path, color: Rgba) {
    let paint = self.current_state.create_paint(color);
    self.pixmap.fill_path(
      path,
      &paint,
      FillRule::Winding,
      self.current_state.transform,
      self.current_state.clip_mask.as_ref(),
    );
  }

  /// Fills a rectangle (in logical units) with a solid color
  pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
    let paint = self.current_state.create_paint(color);
    self.pixmap.fill_rect(
      rect,
      &paint,
      self.current_state.transform,
      self.current_state.clip_mask.as_ref(),
    );
  }

  /// Blits an image through `transform` (logical units), honoring the
  /// current state's transform, opacity, and clip
  pub fn draw_pixmap(&mut self, image: PixmapRef<'_>, transform: Transform) {
    let paint = PixmapPaint {
      opacity: self.current_state.opacity,
      blend_mode: BlendMode::SourceOver,
      quality: FilterQuality::Nearest,
    };
    let transform = transform.post_concat(self.current_state.transform);
    self.pixmap.draw_pixmap(
      0,
      0,
      image,
      &paint,
      transform,
      self.current_state.clip_mask.as_ref(),
    );
  }
}

/// Per-pixel multiply of two coverage masks of identical dimensions.
fn intersect_masks(dst: &mut Mask, src: &Mask) {
  for (d, s) in dst.data_mut().iter_mut().zip(src.data()) {
    *d = ((*d as u16 * *s as u16) / 255) as u8;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pixel_alpha(canvas: &Canvas, x: u32, y: u32) -> u8 {
    canvas.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
  }

  #[test]
  fn rejects_degenerate_construction() {
    assert!(Canvas::new(0, 10, Rgba::TRANSPARENT).is_err());
    assert!(Canvas::with_pixel_scale(10, 10, 0.0, Rgba::TRANSPARENT).is_err());
    assert!(Canvas::with_pixel_scale(10, 10, f32::NAN, Rgba::TRANSPARENT).is_err());
  }

  #[test]
  fn pixel_scale_sizes_buffer() {
    let canvas = Canvas::with_pixel_scale(100, 50, 2.0, Rgba::TRANSPARENT).unwrap();
    assert_eq!(canvas.width(), 200);
    assert_eq!(canvas.height(), 100);
    assert_eq!(canvas.pixel_scale(), 2.0);
  }

  #[test]
  fn save_restore_round_trips_state() {
    let mut canvas = Canvas::new(10, 10, Rgba::TRANSPARENT).unwrap();
    canvas.save();
    canvas.set_opacity(0.25);
    assert_eq!(canvas.opacity(), 0.25);
    canvas.restore();
    assert_eq!(canvas.opacity(), 1.0);
    assert_eq!(canvas.state_depth(), 0);
  }

  #[test]
  fn logical_units_map_to_device_pixels() {
    let mut canvas = Canvas::with_pixel_scale(10, 10, 2.0, Rgba::TRANSPARENT).unwrap();
    canvas.fill_rect(Rect::from_xywh(1.0, 1.0, 1.0, 1.0).unwrap(), Rgba::BLACK);
    // The 1x1 logical rect covers device pixels (2,2)-(3,3).
    assert_eq!(pixel_alpha(&canvas, 2, 2), 255);
    assert_eq!(pixel_alpha(&canvas, 3, 3), 255);
    assert_eq!(pixel_alpha(&canvas, 1, 1), 0);
    assert_eq!(pixel_alpha(&canvas, 4, 4), 0);
  }

  #[test]
  fn fill_path_respects_opacity() {
    let mut canvas = Canvas::new(20, 20, Rgba::TRANSPARENT).unwrap();
    let path = PathBuilder::from_rect(Rect::from_xywh(4.0, 4.0, 12.0, 12.0).unwrap());
    canvas.set_opacity(0.5);
    canvas.fill_path(&path, Rgba::BLACK);

    let pixmap = canvas.into_pixmap();
    assert_eq!(pixmap.pixel(10, 10).unwrap().alpha(), 128);
    assert_eq!(pixmap.pixel(1, 1).unwrap().alpha(), 0);
  }

  #[test]
  fn exclude_clip_rect_masks_out_interior() {
    let mut canvas = Canvas::new(10, 10, Rgba::TRANSPARENT).unwrap();
    canvas.save();
    canvas.exclude_clip_rect(Rect::from_xywh(2.0, 2.0, 6.0, 6.0).unwrap());
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap(), Rgba::BLACK);
    canvas.restore();

    assert_eq!(pixel_alpha(&canvas, 0, 0), 255);
    assert_eq!(pixel_alpha(&canvas, 5, 5), 0, "excluded region must stay unpainted");

    // After restore the exclusion is gone.
    canvas.fill_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap(), Rgba::BLACK);
    assert_eq!(pixel_alpha(&canvas, 5, 5), 255);
  }
}
