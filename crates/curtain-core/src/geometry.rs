#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.

/// Visible drawing area in CSS pixels, origin at top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport. Negative or non-finite extents collapse to zero.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Whether nothing can be drawn.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Check if a point lies within `[0, width) x [0, height)`.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    /// Wrap a point onto the viewport torus.
    ///
    /// Leaving one edge re-enters at the opposite edge; a point exactly on the
    /// right or bottom edge maps to zero. An empty viewport pins to the origin.
    #[inline]
    pub fn wrap(&self, p: Point) -> Point {
        if self.is_empty() {
            return Point::ORIGIN;
        }
        Point {
            x: wrap_axis(p.x, self.width),
            y: wrap_axis(p.y, self.height),
        }
    }
}

#[inline]
fn wrap_axis(v: f32, extent: f32) -> f32 {
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if w >= extent { 0.0 } else { w }
}

/// A position in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance, for comparisons without the square root.
    #[inline]
    pub fn distance_squared(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Translate by a velocity applied for one frame.
    #[inline]
    pub fn offset(&self, v: Velocity) -> Point {
        Point {
            x: self.x + v.dx,
            y: self.y + v.dy,
        }
    }
}

/// Displacement per frame in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    /// Create a velocity.
    #[inline]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}
