//! Multi-shadow ARGB compositing
//!
//! Merges every shadow's single-channel mask into one colored image, ready
//! to be blitted in a single draw. Rebuilt whenever any shadow's color,
//! opacity, or offset changes, or after the masks themselves were
//! re-rendered; never touched for a pure translation of the shape.

use crate::geometry::{IntPoint, IntRect};
use crate::paint::pixmap::{new_mask, new_pixmap};
use crate::shadow::single::SingleShadowRenderer;
use crate::Rgba;
use tiny_skia::{
  FillRule, Mask, Paint, Path, Pixmap, PixmapPaint, PremultipliedColorU8, Rect, Transform,
};

/// The cached composite image plus its placement
pub(crate) struct CompositeCache {
  image: Option<Pixmap>,
  bounds: IntRect,
}

impl CompositeCache {
  pub(crate) fn new() -> Self {
    Self {
      image: None,
      bounds: IntRect::EMPTY,
    }
  }

  pub(crate) fn image(&self) -> Option<&Pixmap> {
    self.image.as_ref()
  }

  /// Device-space bounds of the composite, relative to the path at 0,0
  pub(crate) fn bounds(&self) -> IntRect {
    self.bounds
  }

  /// Top-left corner of the composite in device space
  pub(crate) fn position(&self) -> IntPoint {
    self.bounds.origin()
  }

  /// Rebuilds the composite from the shadows' current masks and colors
  ///
  /// `scaled_path` is the origin-agnostic path at device scale; inner
  /// shadows clip to it. Shadows are painted in list order, later entries
  /// on top.
  pub(crate) fn rebuild(&mut self, shadows: &[SingleShadowRenderer], scaled_path: Option<&Path>) {
    // The minimal canvas: union of path bounds (inner shadows paint only
    // inside the shape) and offset shadow bounds (drop shadows).
    let mut bounds = IntRect::EMPTY;
    for shadow in shadows {
      bounds = bounds.union(if shadow.params.inner {
        shadow.scaled_path_bounds()
      } else {
        shadow.scaled_bounds()
      });
    }
    self.bounds = bounds;
    self.image = None;

    // Degenerate shadows composite to nothing; drawing later is a no-op.
    if bounds.is_empty() {
      return;
    }
    let Some(mut image) = new_pixmap(bounds.width as u32, bounds.height as u32) else {
      return;
    };
    let origin = bounds.origin();

    for shadow in shadows {
      let Some(mask) = shadow.mask() else {
        continue;
      };

      let clip = if shadow.params.inner {
        // Clip to the path outline so nothing paints outside the shape.
        // For stroked outlines this clips to the stroke body, which is
        // wrong for inner shadows on strokes; known limitation.
        let Some(path) = scaled_path else {
          continue;
        };
        match path_clip_mask(path, bounds) {
          Some(clip) => Some(clip),
          None => continue,
        }
      } else {
        None
      };

      if shadow.params.inner {
        fill_edge_bands(&mut image, shadow, origin, clip.as_ref());
      }

      let Some(tinted) = tint_mask(mask, shadow.params.color) else {
        continue;
      };
      let offset_from_composite = shadow.scaled_bounds().origin() - origin;
      image.draw_pixmap(
        offset_from_composite.x,
        offset_from_composite.y,
        tinted.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        clip.as_ref(),
      );
    }

    self.image = Some(image);
  }
}

/// Coverage mask of the scaled path, in composite-local space.
fn path_clip_mask(path: &Path, bounds: IntRect) -> Option<Mask> {
  let mut mask = new_mask(bounds.width as u32, bounds.height as u32)?;
  let ts = Transform::from_translate(-(bounds.x as f32), -(bounds.y as f32));
  mask.fill_path(path, FillRule::Winding, true, ts);
  Some(mask)
}

/// Fills the bands of the path interior an offset inner-shadow mask cannot
/// reach.
///
/// A mask whose offset magnitude exceeds radius + spread no longer covers
/// the whole path interior. The uncovered region decomposes into up to four
/// rectangles between the path bounds and the mask bounds; they are filled
/// with the solid shadow color so the far side of the shape never shows an
/// unintended transparent gap.
///
/// ```text
///      stl┌──────────┐
///         │          │
///   ptl┌──┼──┐       │
///      │  │  │       │
///      └──┼──┘pbr    │
///         │          │
///         └──────────┘sbr
/// ```
fn fill_edge_bands(
  image: &mut Pixmap,
  shadow: &SingleShadowRenderer,
  origin: IntPoint,
  clip: Option<&Mask>,
) {
  let path_bounds = shadow.scaled_path_bounds().translated(IntPoint::ZERO - origin);
  let mask_bounds = shadow.scaled_bounds().translated(IntPoint::ZERO - origin);

  let (ptl, pbr) = (path_bounds.origin(), IntPoint::new(path_bounds.right(), path_bounds.bottom()));
  let (stl, sbr) = (mask_bounds.origin(), IntPoint::new(mask_bounds.right(), mask_bounds.bottom()));

  let bands = [
    IntRect::from_ltrb(ptl.x, ptl.y, pbr.x, stl.y), // top
    IntRect::from_ltrb(ptl.x, ptl.y, stl.x, pbr.y), // left
    IntRect::from_ltrb(ptl.x, sbr.y, pbr.x, pbr.y), // bottom
    IntRect::from_ltrb(sbr.x, ptl.y, pbr.x, pbr.y), // right
  ];

  let color = shadow.params.color;
  let mut paint = Paint::default();
  paint.set_color_rgba8(color.r, color.g, color.b, color.alpha_u8());
  paint.anti_alias = false;

  for band in bands {
    if band.is_empty() {
      continue;
    }
    let Some(rect) = Rect::from_xywh(
      band.x as f32,
      band.y as f32,
      band.width as f32,
      band.height as f32,
    ) else {
      continue;
    };
    image.fill_rect(rect, &paint, Transform::identity(), clip);
  }
}

/// Expands a coverage mask into an ARGB image filled with `color`
///
/// The mask acts as a pure alpha stencil: intensity modulates alpha only,
/// the color is flat. Coverage-to-pixel conversion goes through a 256-entry
/// premultiplied LUT.
fn tint_mask(mask: &Mask, color: Rgba) -> Option<Pixmap> {
  let mut image = new_pixmap(mask.width(), mask.height())?;

  let color_alpha = color.alpha_u8() as u32;
  let mut lut = [PremultipliedColorU8::TRANSPARENT; 256];
  for (coverage, slot) in lut.iter_mut().enumerate() {
    let a = (coverage as u32 * color_alpha + 127) / 255;
    let r = (color.r as u32 * a + 127) / 255;
    let g = (color.g as u32 * a + 127) / 255;
    let b = (color.b as u32 * a + 127) / 255;
    *slot = PremultipliedColorU8::from_rgba(r as u8, g as u8, b as u8, a as u8)
      .unwrap_or(PremultipliedColorU8::TRANSPARENT);
  }

  for (pixel, &coverage) in image.pixels_mut().iter_mut().zip(mask.data()) {
    *pixel = lut[coverage as usize];
  }
  Some(image)
}
