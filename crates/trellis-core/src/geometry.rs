//! Geometric primitives for diagram layout.
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner and Y grows downward. Node positions
//! stored in the graph model are the top-left corners of their boxes.

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Width and height of a box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size grown by the given insets
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns the same size with width and height exchanged
    pub fn transpose(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// A rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Expands the bounds outward by the given insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Returns `true` if `other` lies entirely within these bounds.
    ///
    /// Edges may touch; a small tolerance absorbs `f32` rounding.
    pub fn contains(&self, other: &Self) -> bool {
        const EPSILON: f32 = 0.01;
        other.min_x >= self.min_x - EPSILON
            && other.min_y >= self.min_y - EPSILON
            && other.max_x <= self.max_x + EPSILON
            && other.max_y <= self.max_y + EPSILON
    }

    /// Returns `true` if the interiors of both bounds overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Spacing around a box with potentially different values per side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns a new Insets with the specified top value
    pub fn with_top(self, top: f32) -> Self {
        Self { top, ..self }
    }

    /// Returns the top-left offset these insets apply to content
    pub fn origin(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}
