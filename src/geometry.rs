//! Fundamental planar geometric types for bridge modelling.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Position in the plane of the bridge measured in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the span, positive to the right.
    pub x: f64,
    /// Elevation, positive upward.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Return this point moved by a displacement.
    #[must_use]
    pub fn displaced(self, by: Displacement) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// Return this point raised by `dy`.
    #[must_use]
    pub fn raised(self, dy: f64) -> Self {
        Self::new(self.x, self.y + dy)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Translation vector describing joint displacement in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Displacement component along the span.
    pub x: f64,
    /// Vertical displacement component.
    pub y: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Weighted blend `(1 - t) * self + t * other`.
    #[must_use]
    pub fn lerp(self, other: Displacement, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new(s * self.x + t * other.x, s * self.y + t * other.y)
    }
}

impl From<Vector2<f64>> for Displacement {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Displacement> for Vector2<f64> {
    fn from(value: Displacement) -> Self {
        value.to_vector()
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use trussbridge::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Displacement`] instances.
///
/// # Examples
/// ```
/// use trussbridge::displacement;
///
/// let delta = displacement(0.001, 0.0);
/// assert_eq!(delta.x, 0.001);
/// ```
#[must_use]
pub const fn displacement(x: f64, y: f64) -> Displacement {
    Displacement::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_to_vector_roundtrip() {
        let origin = Point::new(1.0, 2.0);
        let vector: Vector2<f64> = origin.into();
        assert_eq!(vector, Vector2::new(1.0, 2.0));
        assert_eq!(Point::from(vector), origin);
    }

    #[test]
    fn displaced_point_adds_components() {
        let moved = point(4.0, 0.0).displaced(displacement(0.5, -0.25));
        assert_eq!(moved, point(4.5, -0.25));
        assert_eq!(moved.raised(0.25), point(4.5, 0.0));
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((point(0.0, 0.0).distance(point(3.0, 4.0)) - 5.0).abs() < 1.0e-12);
    }

    #[test]
    fn lerp_endpoints() {
        let a = displacement(1.0, 2.0);
        let b = displacement(-1.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), displacement(0.0, 1.0));
    }
}
