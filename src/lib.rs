//! Cached soft drop and inner shadows for 2D vector paths
//!
//! Blurring a path is the expensive part of drawing a soft shadow; UI code
//! redraws the same shapes every frame. This crate caches each shadow's
//! blurred mask and the merged multi-shadow composite, and on every render
//! call performs only the minimum recomputation the actual change demands:
//!
//! - unchanged shape and style: one composite blit
//! - translated shape: blit at the new position (masks are
//!   position-independent)
//! - changed color/opacity/offset: recomposite from the cached masks
//! - changed geometry, device scale, stroke, radius, or spread: re-blur
//!
//! Rasterization is CPU-side via [tiny-skia](https://docs.rs/tiny-skia);
//! see [`shadow`] for the cache architecture and [`paint`] for the pixel
//! plumbing.

pub mod color;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod shadow;

pub use color::Rgba;
pub use error::{Error, Result};
pub use geometry::{IntPoint, IntRect, Point};
pub use paint::Canvas;
pub use shadow::{CacheStats, DropShadow, InnerShadow, ShadowSpec, ShadowStack, StrokeStyle};
