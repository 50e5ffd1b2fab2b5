//! Stroke styling for stroked-outline shadows

use tiny_skia::{LineCap, LineJoin, Path, PathStroker, Stroke, StrokeDash};

/// Stroke style for [`crate::ShadowStack::render_stroked`]
///
/// A crate-local value type so stroke changes can be detected by plain
/// comparison; converted to a `tiny_skia::Stroke` at stroking time.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
  /// Stroke thickness in logical units
  pub width: f32,
  /// Miter limit for [`LineJoin::Miter`] joins
  pub miter_limit: f32,
  /// End-cap shape
  pub line_cap: LineCap,
  /// Corner join shape
  pub line_join: LineJoin,
  /// Dash pattern (interval lengths, phase offset), if any
  pub dash: Option<(Vec<f32>, f32)>,
}

impl StrokeStyle {
  /// Creates a solid stroke of the given width with default caps and joins
  pub fn new(width: f32) -> Self {
    Self {
      width,
      ..Self::default()
    }
  }

  fn to_stroke(&self) -> Stroke {
    Stroke {
      width: self.width,
      miter_limit: self.miter_limit,
      line_cap: self.line_cap,
      line_join: self.line_join,
      dash: self
        .dash
        .as_ref()
        .and_then(|(array, offset)| StrokeDash::new(array.clone(), *offset)),
    }
  }

  /// Computes the stroked outline of `path`
  ///
  /// `scale` is the device scale the outline will be rasterized at; it only
  /// raises the flattening accuracy, the result stays in logical units.
  /// Returns `None` for degenerate paths or stroke widths.
  pub(crate) fn stroke_path(&self, path: &Path, scale: f32) -> Option<Path> {
    let mut stroker = PathStroker::new();
    stroker.stroke(path, &self.to_stroke(), scale.max(1.0))
  }
}

impl Default for StrokeStyle {
  fn default() -> Self {
    let defaults = Stroke::default();
    Self {
      width: defaults.width,
      miter_limit: defaults.miter_limit,
      line_cap: defaults.line_cap,
      line_join: defaults.line_join,
      dash: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tiny_skia::{PathBuilder, Rect};

  #[test]
  fn stroking_grows_bounds() {
    let path = PathBuilder::from_rect(Rect::from_xywh(10.0, 10.0, 20.0, 20.0).unwrap());
    let stroked = StrokeStyle::new(4.0).stroke_path(&path, 1.0).unwrap();
    let bounds = stroked.bounds();
    assert!(bounds.left() < 10.0);
    assert!(bounds.right() > 30.0);
  }

  #[test]
  fn styles_compare_by_value() {
    let a = StrokeStyle::new(2.0);
    let b = StrokeStyle::new(2.0);
    assert_eq!(a, b);
    let c = StrokeStyle {
      dash: Some((vec![4.0, 2.0], 0.0)),
      ..StrokeStyle::new(2.0)
    };
    assert_ne!(a, c);
  }
}
