//! Single-channel stack blur
//!
//! Blurs the coverage mask a shadow is built from. Stack blur is a fast
//! approximation of a Gaussian: a triangular-weighted sliding window run
//! once horizontally and once vertically, with edge pixels extended past
//! the borders.
//!
//! The implementation is fully deterministic — identical input buffers and
//! radii produce byte-identical output — which the shadow cache relies on
//! when it reuses a mask across frames.

use tiny_skia::Mask;

/// Radii above this are clamped so the triangular window sum fits in `u32`.
const MAX_RADIUS: u32 = 2048;

/// Blurs `mask` in place by `radius` device pixels.
///
/// A radius of zero leaves the mask untouched.
pub fn single_channel(mask: &mut Mask, radius: u32) {
  let width = mask.width() as usize;
  let height = mask.height() as usize;
  let radius = radius.min(MAX_RADIUS) as usize;
  if radius == 0 || width == 0 || height == 0 {
    return;
  }

  let data = mask.data_mut();
  // Horizontal pass: one lane per row, adjacent pixels 1 apart.
  blur_axis(data, height, width, width, 1, radius);
  // Vertical pass: one lane per column, adjacent pixels a row apart.
  blur_axis(data, width, height, 1, width, radius);
}

/// Runs the stack blur over `lanes` independent lanes of `len` pixels.
///
/// `lane_stride` is the distance between lane starts, `step` the distance
/// between adjacent pixels within a lane. Writing lags reading by
/// `radius + 1` pixels, so the pass is safe in place.
fn blur_axis(
  data: &mut [u8],
  lanes: usize,
  len: usize,
  lane_stride: usize,
  step: usize,
  radius: usize,
) {
  let div = radius * 2 + 1;
  let weight = ((radius + 1) * (radius + 1)) as u32;
  let last = len - 1;
  let mut stack = vec![0u8; div];

  for lane in 0..lanes {
    let base = lane * lane_stride;

    let mut sum: u32 = 0;
    let mut sum_in: u32 = 0;
    let mut sum_out: u32 = 0;

    // Prime the window with the first pixel extended past the left edge.
    let first = data[base] as u32;
    for i in 0..=radius {
      stack[i] = first as u8;
      sum += first * (i as u32 + 1);
      sum_out += first;
    }
    for i in 1..=radius {
      let pix = data[base + i.min(last) * step] as u32;
      stack[i + radius] = pix as u8;
      sum += pix * (radius - i + 1) as u32;
      sum_in += pix;
    }

    let mut stack_ptr = radius;
    for x in 0..len {
      data[base + x * step] = (sum / weight) as u8;

      sum -= sum_out;
      let mut stack_start = stack_ptr + div - radius;
      if stack_start >= div {
        stack_start -= div;
      }
      sum_out -= stack[stack_start] as u32;

      let pix = data[base + (x + radius + 1).min(last) * step] as u32;
      stack[stack_start] = pix as u8;
      sum_in += pix;
      sum += sum_in;

      stack_ptr += 1;
      if stack_ptr >= div {
        stack_ptr = 0;
      }
      let pix = stack[stack_ptr] as u32;
      sum_out += pix;
      sum_in -= pix;
    }
  }
}
