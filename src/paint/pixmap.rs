//! Guarded pixel-buffer allocation
//!
//! Shadow bounds are derived from caller-supplied paths, radii, and spreads,
//! so a hostile or buggy combination can request an enormous buffer. All
//! mask and composite allocations go through these helpers, which reject
//! zero-sized and oversized buffers instead of aborting the process on OOM.

use crate::error::Error;
use tiny_skia::{Mask, Pixmap};

const BYTES_PER_PIXEL: u64 = 4;
/// Upper bound on a single buffer allocation.
pub(crate) const MAX_BUFFER_BYTES: u64 = 512 * 1024 * 1024;

fn guard_dimensions(width: u32, height: u32, bytes_per_pixel: u64) -> Result<(), Error> {
  if width == 0 || height == 0 {
    return Err(Error::InvalidParameters {
      message: format!("buffer size is zero ({width}x{height})"),
    });
  }

  let bytes = (width as u64 * height as u64)
    .checked_mul(bytes_per_pixel)
    .ok_or(Error::InvalidParameters {
      message: format!("buffer byte size overflow ({width}x{height})"),
    })?;
  if bytes > MAX_BUFFER_BYTES {
    return Err(Error::InvalidParameters {
      message: format!(
        "buffer {width}x{height} would allocate {bytes} bytes (limit {MAX_BUFFER_BYTES})"
      ),
    });
  }

  Ok(())
}

/// Allocates a transparent ARGB pixmap, or `None` for degenerate or
/// oversized dimensions.
pub(crate) fn new_pixmap(width: u32, height: u32) -> Option<Pixmap> {
  guard_dimensions(width, height, BYTES_PER_PIXEL).ok()?;
  Pixmap::new(width, height)
}

/// Allocates a cleared single-channel coverage mask, or `None` for
/// degenerate or oversized dimensions.
pub(crate) fn new_mask(width: u32, height: u32) -> Option<Mask> {
  guard_dimensions(width, height, 1).ok()?;
  Mask::new(width, height)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_zero_dimensions() {
    assert!(new_pixmap(0, 10).is_none());
    assert!(new_pixmap(10, 0).is_none());
    assert!(new_mask(0, 1).is_none());
  }

  #[test]
  fn rejects_overflow_and_limit() {
    assert!(new_pixmap(u32::MAX, u32::MAX).is_none());

    let too_wide = (MAX_BUFFER_BYTES / BYTES_PER_PIXEL + 1) as u32;
    assert!(new_pixmap(too_wide, 1).is_none());
  }

  #[test]
  fn allocates_small_buffers() {
    let pixmap = new_pixmap(4, 4).expect("small pixmap");
    assert_eq!(pixmap.width(), 4);
    assert_eq!(pixmap.height(), 4);

    let mask = new_mask(4, 4).expect("small mask");
    assert_eq!(mask.width(), 4);
    assert!(mask.data().iter().all(|&b| b == 0));
  }
}
