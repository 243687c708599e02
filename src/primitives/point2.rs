//! 2D point type with the transform kit used by the entity layer.

use super::Vec2;
use num_traits::Float;
use std::ops::{Add, Sub};

/// A 2D point in Cartesian coordinates.
///
/// Generic over floating-point types (`f32` or `f64`). Points support the
/// full transform kit (rotation about an origin, point and axis reflection,
/// grid snapping) so higher layers can delegate per-vertex work here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Point2<F> {
    /// Creates a new point.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// Creates the origin point.
    #[inline]
    pub fn origin() -> Self {
        Self {
            x: F::zero(),
            y: F::zero(),
        }
    }

    /// Returns the squared distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> F {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Returns the distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> F {
        self.distance_squared(other).sqrt()
    }

    /// Returns the midpoint between this point and another.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        let half = F::from(0.5).unwrap();
        Self {
            x: (self.x + other.x) * half,
            y: (self.y + other.y) * half,
        }
    }

    /// Linearly interpolates toward `other`.
    ///
    /// When `t = 0`, returns `self`. When `t = 1`, returns `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: F) -> Self {
        self + (other - self) * t
    }

    /// Returns `true` if the two points are within `eps` of each other.
    #[inline]
    pub fn approx_eq(self, other: Self, eps: F) -> bool {
        self.distance_squared(other) <= eps * eps
    }

    /// Returns this point offset by a vector.
    #[inline]
    pub fn translated(self, offset: Vec2<F>) -> Self {
        self + offset
    }

    /// Returns this point rotated by `angle` radians about `origin`.
    #[inline]
    pub fn rotated_about(self, origin: Self, angle: F) -> Self {
        origin + (self - origin).rotated(angle)
    }

    /// Returns this point scaled by `factor` about `origin`.
    #[inline]
    pub fn scaled_about(self, origin: Self, factor: F) -> Self {
        origin + (self - origin) * factor
    }

    /// Returns this point reflected through `origin` (point reflection).
    #[inline]
    pub fn reflected_point(self, origin: Self) -> Self {
        origin - (self - origin)
    }

    /// Returns this point mirrored across the line through `a` and `b`.
    ///
    /// A degenerate axis (`a == b`) degrades to point reflection about `a`.
    pub fn reflected_axis(self, a: Self, b: Self) -> Self {
        let v = self - a;
        match (b - a).normalize() {
            Some(dir) => {
                let two = F::one() + F::one();
                a + dir * (v.dot(dir) * two) - v
            }
            None => self.reflected_point(a),
        }
    }

    /// Returns this point with both coordinates rounded to the nearest
    /// multiple of `step`.
    #[inline]
    pub fn snapped(self, step: F) -> Self {
        debug_assert!(step > F::zero());
        Self {
            x: (self.x / step).round() * step,
            y: (self.y / step).round() * step,
        }
    }
}

impl<F: Float> Add<Vec2<F>> for Point2<F> {
    type Output = Self;

    #[inline]
    fn add(self, offset: Vec2<F>) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }
}

impl<F: Float> Sub<Vec2<F>> for Point2<F> {
    type Output = Self;

    #[inline]
    fn sub(self, offset: Vec2<F>) -> Self {
        Self {
            x: self.x - offset.x,
            y: self.y - offset.y,
        }
    }
}

impl<F: Float> Sub for Point2<F> {
    type Output = Vec2<F>;

    #[inline]
    fn sub(self, other: Self) -> Vec2<F> {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_distance() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn test_midpoint() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 20.0);
        let m = a.midpoint(b);
        assert_eq!(m.x, 5.0);
        assert_eq!(m.y, 10.0);
    }

    #[test]
    fn test_rotated_about() {
        let p: Point2<f64> = Point2::new(2.0, 1.0);
        let r = p.rotated_about(Point2::new(1.0, 1.0), FRAC_PI_2);
        assert_relative_eq!(r.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(r.y, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_scaled_about() {
        let p: Point2<f64> = Point2::new(3.0, 1.0);
        let s = p.scaled_about(Point2::new(1.0, 1.0), 2.0);
        assert_eq!(s.x, 5.0);
        assert_eq!(s.y, 1.0);
    }

    #[test]
    fn test_reflected_point() {
        let p: Point2<f64> = Point2::new(2.0, 3.0);
        let r = p.reflected_point(Point2::new(1.0, 1.0));
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, -1.0);
    }

    #[test]
    fn test_reflected_axis() {
        // Mirror across the x-axis
        let p: Point2<f64> = Point2::new(3.0, 2.0);
        let r = p.reflected_axis(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert_relative_eq!(r.x, 3.0, epsilon = 1e-10);
        assert_relative_eq!(r.y, -2.0, epsilon = 1e-10);

        // Mirror across the diagonal y = x swaps coordinates
        let d = p.reflected_axis(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        assert_relative_eq!(d.x, 2.0, epsilon = 1e-10);
        assert_relative_eq!(d.y, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_reflected_axis_degenerate() {
        let p: Point2<f64> = Point2::new(2.0, 3.0);
        let a = Point2::new(1.0, 1.0);
        assert_eq!(p.reflected_axis(a, a), p.reflected_point(a));
    }

    #[test]
    fn test_snapped() {
        let p: Point2<f64> = Point2::new(0.3, 0.7);
        let s = p.snapped(0.5);
        assert_eq!(s.x, 0.5);
        assert_eq!(s.y, 0.5);

        let q: Point2<f64> = Point2::new(1.2, 1.8);
        let sq = q.snapped(0.5);
        assert_eq!(sq.x, 1.0);
        assert_eq!(sq.y, 2.0);
    }

    #[test]
    fn test_approx_eq() {
        let a: Point2<f64> = Point2::new(1.0, 1.0);
        let b = Point2::new(1.0 + 1e-12, 1.0);
        assert!(a.approx_eq(b, 1e-9));
        assert!(!a.approx_eq(Point2::new(1.1, 1.0), 1e-9));
    }
}
