//! Integer and float geometry primitives
//!
//! Shadow masks and composites live on the device pixel grid, so their
//! bounds are integer rectangles; path origins are float points in logical
//! units. The coordinate system has its origin at the top-left corner:
//! positive X extends to the right, positive Y extends downward.

use std::fmt;
use std::ops::{Add, Sub};

/// Shared tolerance for floating-point change detection (scale, opacity).
///
/// Every epsilon comparison in the crate goes through [`approx_eq`] with
/// this constant so that float noise never triggers a spurious recompute.
pub(crate) const EPSILON: f32 = 1e-4;

/// Returns true when `a` and `b` differ by no more than [`EPSILON`].
pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
  (a - b).abs() <= EPSILON
}

/// A 2D point in logical (unscaled) units
///
/// # Examples
///
/// ```
/// use softshadow::Point;
///
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.scaled(2.0), Point::new(20.0, 40.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
  /// X coordinate (horizontal position, increases to the right)
  pub x: f32,
  /// Y coordinate (vertical position, increases downward)
  pub y: f32,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

  /// Creates a new point at the given coordinates
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  /// Multiplies both coordinates by `factor`
  pub fn scaled(self, factor: f32) -> Self {
    Self {
      x: self.x * factor,
      y: self.y * factor,
    }
  }
}

impl Add for Point {
  type Output = Point;

  fn add(self, other: Point) -> Point {
    Point::new(self.x + other.x, self.y + other.y)
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A 2D point on the integer device pixel grid
///
/// # Examples
///
/// ```
/// use softshadow::IntPoint;
///
/// let offset = IntPoint::new(5, 5);
/// assert_eq!(offset.scaled_round(1.5), IntPoint::new(8, 8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntPoint {
  /// X coordinate in device pixels
  pub x: i32,
  /// Y coordinate in device pixels
  pub y: i32,
}

impl IntPoint {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0, y: 0 };

  /// Creates a new point at the given coordinates
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Scales both coordinates by `factor` and rounds to the nearest pixel
  pub fn scaled_round(self, factor: f32) -> Self {
    Self {
      x: (self.x as f32 * factor).round() as i32,
      y: (self.y as f32 * factor).round() as i32,
    }
  }

  /// Converts to a float [`Point`]
  pub fn to_point(self) -> Point {
    Point::new(self.x as f32, self.y as f32)
  }
}

impl Add for IntPoint {
  type Output = IntPoint;

  fn add(self, other: IntPoint) -> IntPoint {
    IntPoint::new(self.x + other.x, self.y + other.y)
  }
}

impl Sub for IntPoint {
  type Output = IntPoint;

  fn sub(self, other: IntPoint) -> IntPoint {
    IntPoint::new(self.x - other.x, self.y - other.y)
  }
}

impl fmt::Display for IntPoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// An axis-aligned rectangle on the integer device pixel grid
///
/// An empty rectangle (zero or negative extent) acts as the identity for
/// [`IntRect::union`], so bounds can be accumulated starting from
/// [`IntRect::EMPTY`].
///
/// # Examples
///
/// ```
/// use softshadow::IntRect;
///
/// let a = IntRect::new(0, 0, 10, 10);
/// let b = IntRect::new(5, 5, 10, 10);
/// assert_eq!(a.union(b), IntRect::new(0, 0, 15, 15));
/// assert_eq!(IntRect::EMPTY.union(a), a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRect {
  /// X coordinate of the left edge
  pub x: i32,
  /// Y coordinate of the top edge
  pub y: i32,
  /// Width in pixels
  pub width: i32,
  /// Height in pixels
  pub height: i32,
}

impl IntRect {
  /// The empty rectangle at the origin
  pub const EMPTY: Self = Self {
    x: 0,
    y: 0,
    width: 0,
    height: 0,
  };

  /// Creates a rectangle from its top-left corner and extent
  pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Creates a rectangle from its edges; inverted edges yield an empty rect
  pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
    Self {
      x: left,
      y: top,
      width: (right - left).max(0),
      height: (bottom - top).max(0),
    }
  }

  /// Returns true when the rectangle has no area
  pub fn is_empty(self) -> bool {
    self.width <= 0 || self.height <= 0
  }

  /// X coordinate of the left edge
  pub fn left(self) -> i32 {
    self.x
  }

  /// Y coordinate of the top edge
  pub fn top(self) -> i32 {
    self.y
  }

  /// X coordinate of the right edge (exclusive)
  pub fn right(self) -> i32 {
    self.x + self.width
  }

  /// Y coordinate of the bottom edge (exclusive)
  pub fn bottom(self) -> i32 {
    self.y + self.height
  }

  /// The top-left corner
  pub fn origin(self) -> IntPoint {
    IntPoint::new(self.x, self.y)
  }

  /// Smallest rectangle containing both `self` and `other`
  ///
  /// An empty rectangle contributes nothing, regardless of its position.
  pub fn union(self, other: IntRect) -> IntRect {
    if self.is_empty() {
      return other;
    }
    if other.is_empty() {
      return self;
    }
    IntRect::from_ltrb(
      self.left().min(other.left()),
      self.top().min(other.top()),
      self.right().max(other.right()),
      self.bottom().max(other.bottom()),
    )
  }

  /// Grows (or, with negative deltas, shrinks) the rectangle on every side
  pub fn expanded(self, dx: i32, dy: i32) -> IntRect {
    IntRect::new(
      self.x - dx,
      self.y - dy,
      self.width + dx * 2,
      self.height + dy * 2,
    )
  }

  /// Moves the rectangle by the given delta
  pub fn translated(self, delta: IntPoint) -> IntRect {
    IntRect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
  }
}

impl fmt::Display for IntRect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "({}, {}) {}x{}",
      self.x, self.y, self.width, self.height
    )
  }
}
