//! Circular arc segment in bulge form.
//!
//! An arc is stored as its two endpoints plus a bulge factor, the CAD
//! interchange convention: bulge = tan(sweep / 4). Positive bulge sweeps
//! counter-clockwise around the center from start to end, negative bulge
//! clockwise. A bulge of 1 is a semicircle. Zero bulge would be a straight
//! span and is a contract violation; use [`Segment2`](super::Segment2) for
//! those.

use super::{Point2, Segment2, Vec2};
use crate::bounds::Aabb2;
use num_traits::Float;

/// A 2D circular arc defined by endpoints and a bulge factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
    /// tan(sweep / 4); sign gives the arc's orientation.
    pub bulge: F,
}

impl<F: Float> Arc2<F> {
    /// Creates a new arc.
    ///
    /// Debug-asserts that the bulge is nonzero and the endpoints are
    /// distinct (a zero-chord or zero-bulge arc has no defined circle).
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>, bulge: F) -> Self {
        debug_assert!(bulge != F::zero(), "zero-bulge arc; use Segment2");
        debug_assert!(start != end, "zero-chord arc has no defined circle");
        Self { start, end, bulge }
    }

    /// Returns the signed sweep angle in radians (positive = counter-clockwise).
    #[inline]
    pub fn sweep_angle(&self) -> F {
        let four = F::from(4.0).unwrap();
        four * self.bulge.atan()
    }

    /// Returns the radius of the arc's supporting circle.
    pub fn radius(&self) -> F {
        let two = F::one() + F::one();
        let four = two + two;
        let chord = self.start.distance(self.end);
        let sagitta = (self.bulge * chord / two).abs();
        (chord * chord / four + sagitta * sagitta) / (two * sagitta)
    }

    /// Returns the center of the arc's supporting circle.
    ///
    /// For a counter-clockwise arc the center lies to the left of the
    /// chord direction; the offset turns negative for major arcs (the
    /// center crosses to the far side of the chord).
    pub fn center(&self) -> Point2<F> {
        let two = F::one() + F::one();
        let chord_vec = self.end - self.start;
        let chord = chord_vec.magnitude();
        let sagitta = (self.bulge * chord / two).abs();
        let apothem = self.radius() - sagitta;

        let left = chord_vec.perpendicular() / chord;
        let mid = self.start.midpoint(self.end);

        if self.bulge > F::zero() {
            mid + left * apothem
        } else {
            mid - left * apothem
        }
    }

    /// Returns the arc length.
    #[inline]
    pub fn arc_length(&self) -> F {
        self.radius() * self.sweep_angle().abs()
    }

    /// Returns the circle angle of the start point.
    pub fn start_angle(&self) -> F {
        let c = self.center();
        (self.start.y - c.y).atan2(self.start.x - c.x)
    }

    /// Returns the point at parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: F) -> Point2<F> {
        let c = self.center();
        let r = self.radius();
        let angle = self.start_angle() + t * self.sweep_angle();
        Point2::new(c.x + r * angle.cos(), c.y + r * angle.sin())
    }

    /// Returns the point halfway along the arc (the bulge apex).
    #[inline]
    pub fn midpoint_on_arc(&self) -> Point2<F> {
        self.point_at(F::from(0.5).unwrap())
    }

    /// Returns the reversed arc (same curve, opposite direction).
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            bulge: -self.bulge,
        }
    }

    /// Returns `true` if the given circle angle lies within the swept range.
    ///
    /// `slack` widens the range at both ends (an angular tolerance).
    fn contains_angle(&self, angle: F, slack: F) -> bool {
        let sweep = self.sweep_angle();
        let delta = if sweep >= F::zero() {
            norm_two_pi(angle - self.start_angle())
        } else {
            norm_two_pi(self.start_angle() - angle)
        };
        delta <= sweep.abs() + slack || delta >= two_pi::<F>() - slack
    }

    /// Returns the tight axis-aligned bounding box of the arc.
    ///
    /// Covers both endpoints plus any axis-extreme point of the supporting
    /// circle that lies on the arc.
    pub fn bounds(&self) -> Aabb2<F> {
        let mut aabb = Aabb2::from_corners(self.start, self.end);
        let c = self.center();
        let r = self.radius();
        let half_pi = F::from(std::f64::consts::FRAC_PI_2).unwrap();

        for quadrant in 0..4 {
            let angle = half_pi * F::from(quadrant).unwrap();
            if self.contains_angle(angle, F::zero()) {
                let extreme = Point2::new(c.x + r * angle.cos(), c.y + r * angle.sin());
                aabb = aabb.expand_to_include(extreme);
            }
        }
        aabb
    }

    /// Computes the closest point on the arc to the given point.
    pub fn closest_point(&self, p: Point2<F>) -> Point2<F> {
        let c = self.center();
        let v = p - c;
        if v.magnitude() <= F::epsilon() {
            return self.start;
        }

        let angle = v.y.atan2(v.x);
        if self.contains_angle(angle, F::zero()) {
            return c + (v / v.magnitude()) * self.radius();
        }

        if p.distance_squared(self.start) <= p.distance_squared(self.end) {
            self.start
        } else {
            self.end
        }
    }

    /// Computes the distance from a point to this arc.
    #[inline]
    pub fn distance_to_point(&self, p: Point2<F>) -> F {
        p.distance(self.closest_point(p))
    }

    /// Computes the crossing points between this arc and a segment.
    ///
    /// Intersects the segment with the supporting circle, then filters to
    /// the swept angular range.
    pub fn crossings_with_segment(&self, seg: Segment2<F>, eps: F) -> Vec<Point2<F>> {
        let c = self.center();
        let r = self.radius();
        let slack = angular_slack(eps, r);

        circle_segment_intersections(c, r, seg, eps)
            .into_iter()
            .filter(|p| {
                let angle = (p.y - c.y).atan2(p.x - c.x);
                self.contains_angle(angle, slack)
            })
            .collect()
    }

    /// Computes the crossing points between two arcs.
    ///
    /// Intersects the two supporting circles, then filters to both swept
    /// ranges. Arcs on the same supporting circle report no crossings (an
    /// overlap run has no isolated crossing points).
    pub fn crossings_with_arc(&self, other: &Arc2<F>, eps: F) -> Vec<Point2<F>> {
        let c1 = self.center();
        let r1 = self.radius();
        let c2 = other.center();
        let r2 = other.radius();

        let slack1 = angular_slack(eps, r1);
        let slack2 = angular_slack(eps, r2);

        circle_circle_intersections(c1, r1, c2, r2, eps)
            .into_iter()
            .filter(|p| {
                let a1 = (p.y - c1.y).atan2(p.x - c1.x);
                let a2 = (p.y - c2.y).atan2(p.x - c2.x);
                self.contains_angle(a1, slack1) && other.contains_angle(a2, slack2)
            })
            .collect()
    }

    /// Returns the parameter in [0, 1] of a point lying on the arc.
    ///
    /// `None` if the point is farther than `eps` from the arc.
    pub fn param_at_point(&self, p: Point2<F>, eps: F) -> Option<F> {
        if self.distance_to_point(p) > eps {
            return None;
        }

        let c = self.center();
        let angle = (p.y - c.y).atan2(p.x - c.x);
        let sweep = self.sweep_angle();
        let mut delta = if sweep >= F::zero() {
            norm_two_pi(angle - self.start_angle())
        } else {
            norm_two_pi(self.start_angle() - angle)
        };

        // Angle noise at the start can wrap the delta to just under 2*pi
        let slack = angular_slack(eps, self.radius());
        if delta > sweep.abs() {
            delta = if delta >= two_pi::<F>() - slack {
                F::zero()
            } else {
                sweep.abs()
            };
        }

        Some((delta / sweep.abs()).max(F::zero()).min(F::one()))
    }

    /// Returns the sub-arc between parameters `t0 < t1`.
    pub fn sub_arc(&self, t0: F, t1: F) -> Arc2<F> {
        let four = F::from(4.0).unwrap();
        let sweep = self.sweep_angle() * (t1 - t0);
        Arc2::new(self.point_at(t0), self.point_at(t1), (sweep / four).tan())
    }

    /// Converts the arc to a polyline.
    ///
    /// The number of segments is chosen so the sagitta (deviation from the
    /// true arc) stays below `tolerance`.
    pub fn to_polyline(&self, tolerance: F) -> Vec<Point2<F>> {
        let n = self.segments_for_tolerance(tolerance);
        let step = F::one() / F::from(n).unwrap();

        let mut points = Vec::with_capacity(n + 1);
        points.push(self.start);
        for i in 1..n {
            points.push(self.point_at(step * F::from(i).unwrap()));
        }
        points.push(self.end);
        points
    }

    /// Calculates the number of segments needed for a given sagitta tolerance.
    fn segments_for_tolerance(&self, tolerance: F) -> usize {
        let one = F::one();
        let two = one + one;
        let radius = self.radius();
        let sweep = self.sweep_angle().abs();

        if tolerance >= radius {
            return 1;
        }

        // Maximum angle per segment: theta = 2 * acos(1 - tolerance / radius)
        let ratio = (one - tolerance / radius).max(-one).min(one);
        let max_angle = two * ratio.acos();
        if max_angle <= F::epsilon() {
            return 1;
        }

        let n = (sweep / max_angle).ceil();
        n.to_usize().unwrap_or(1).max(1)
    }

    /// Returns this arc translated by a vector.
    #[inline]
    pub fn translated(&self, offset: Vec2<F>) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            bulge: self.bulge,
        }
    }

    /// Returns this arc rotated by `angle` radians about `origin`.
    #[inline]
    pub fn rotated_about(&self, origin: Point2<F>, angle: F) -> Self {
        Self {
            start: self.start.rotated_about(origin, angle),
            end: self.end.rotated_about(origin, angle),
            bulge: self.bulge,
        }
    }

    /// Returns this arc scaled by a positive `factor` about `origin`.
    #[inline]
    pub fn scaled_about(&self, origin: Point2<F>, factor: F) -> Self {
        debug_assert!(factor > F::zero());
        Self {
            start: self.start.scaled_about(origin, factor),
            end: self.end.scaled_about(origin, factor),
            bulge: self.bulge,
        }
    }

    /// Returns this arc reflected through `origin`.
    ///
    /// Point reflection is a half-turn rotation, so the bulge is unchanged.
    #[inline]
    pub fn reflected_point(&self, origin: Point2<F>) -> Self {
        Self {
            start: self.start.reflected_point(origin),
            end: self.end.reflected_point(origin),
            bulge: self.bulge,
        }
    }

    /// Returns this arc mirrored across the line through `a` and `b`.
    ///
    /// Mirroring reverses orientation, so the bulge negates.
    #[inline]
    pub fn reflected_axis(&self, a: Point2<F>, b: Point2<F>) -> Self {
        Self {
            start: self.start.reflected_axis(a, b),
            end: self.end.reflected_axis(a, b),
            bulge: -self.bulge,
        }
    }

    /// Returns this arc with both endpoints snapped to a grid.
    #[inline]
    pub fn snapped(&self, step: F) -> Self {
        Self {
            start: self.start.snapped(step),
            end: self.end.snapped(step),
            bulge: self.bulge,
        }
    }
}

#[inline]
fn two_pi<F: Float>() -> F {
    F::from(2.0 * std::f64::consts::PI).unwrap()
}

/// Normalizes an angle into [0, 2*pi).
fn norm_two_pi<F: Float>(angle: F) -> F {
    let tp = two_pi::<F>();
    let mut a = angle % tp;
    if a < F::zero() {
        a = a + tp;
    }
    a
}

/// Angular tolerance equivalent to a positional tolerance at radius `r`.
#[inline]
fn angular_slack<F: Float>(eps: F, radius: F) -> F {
    if radius > F::epsilon() {
        eps / radius
    } else {
        eps
    }
}

/// Intersects a circle with a segment.
///
/// Solves the quadratic for the segment's parameter and keeps roots within
/// [0, 1] (widened by a parameter tolerance derived from `eps`).
pub(crate) fn circle_segment_intersections<F: Float>(
    center: Point2<F>,
    radius: F,
    seg: Segment2<F>,
    eps: F,
) -> Vec<Point2<F>> {
    let d = seg.direction();
    let f = seg.start - center;

    let a = d.dot(d);
    if a <= F::epsilon() {
        return Vec::new();
    }
    let two = F::one() + F::one();
    let b = two * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let four = two + two;
    let disc = b * b - four * a * c;
    if disc < F::zero() {
        return Vec::new();
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (two * a);
    let t2 = (-b + sqrt_disc) / (two * a);

    let t_eps = eps / a.sqrt();
    let lo = -t_eps;
    let hi = F::one() + t_eps;

    let mut out = Vec::new();
    if t1 >= lo && t1 <= hi {
        out.push(seg.point_at(t1.max(F::zero()).min(F::one())));
    }
    // Tangent contact yields one point, not two coincident ones
    if sqrt_disc > eps && t2 >= lo && t2 <= hi {
        out.push(seg.point_at(t2.max(F::zero()).min(F::one())));
    }
    out
}

/// Intersects two circles.
///
/// Concentric or identical circles return no points.
pub(crate) fn circle_circle_intersections<F: Float>(
    c1: Point2<F>,
    r1: F,
    c2: Point2<F>,
    r2: F,
    eps: F,
) -> Vec<Point2<F>> {
    let between = c2 - c1;
    let d = between.magnitude();

    if d <= eps {
        return Vec::new(); // Concentric
    }
    if d > r1 + r2 + eps {
        return Vec::new(); // Too far apart
    }
    if d < (r1 - r2).abs() - eps {
        return Vec::new(); // One inside the other
    }

    let two = F::one() + F::one();
    let a = (r1 * r1 - r2 * r2 + d * d) / (two * d);
    let h_sq = r1 * r1 - a * a;

    let dir = between / d;
    let base = c1 + dir * a;

    if h_sq <= eps * eps {
        return vec![base]; // Tangent
    }

    let h = h_sq.sqrt();
    let off = dir.perpendicular() * h;
    vec![base + off, base - off]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Counter-clockwise upper semicircle of radius 1 around (1, 0).
    fn upper_semi() -> Arc2<f64> {
        Arc2::new(Point2::new(2.0, 0.0), Point2::new(0.0, 0.0), 1.0)
    }

    #[test]
    fn test_semicircle_center_radius() {
        let arc = upper_semi();
        assert_relative_eq!(arc.radius(), 1.0, epsilon = 1e-10);
        let c = arc.center();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(arc.sweep_angle(), std::f64::consts::PI, epsilon = 1e-10);
        // CCW from (2,0): the apex is above the chord
        let apex = arc.midpoint_on_arc();
        assert_relative_eq!(apex.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(apex.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_quarter_arc_apex() {
        // Quarter circle around the origin: bulge = tan(pi/8)
        let bulge = (std::f64::consts::PI / 8.0).tan();
        let arc: Arc2<f64> = Arc2::new(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), bulge);
        let c = arc.center();
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(arc.radius(), 1.0, epsilon = 1e-10);

        let apex = arc.midpoint_on_arc();
        let s = std::f64::consts::FRAC_PI_4.cos();
        assert_relative_eq!(apex.x, s, epsilon = 1e-10);
        assert_relative_eq!(apex.y, s, epsilon = 1e-10);
    }

    #[test]
    fn test_point_at_endpoints() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 0.5);
        let p0 = arc.point_at(0.0);
        let p1 = arc.point_at(1.0);
        assert_relative_eq!(p0.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(p0.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(p1.x, 2.0, epsilon = 1e-10);
        assert_relative_eq!(p1.y, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_reversed_same_curve() {
        let arc = upper_semi();
        let rev = arc.reversed();
        assert_eq!(rev.start, arc.end);
        assert_eq!(rev.bulge, -1.0);
        let c1 = arc.center();
        let c2 = rev.center();
        assert_relative_eq!(c1.x, c2.x, epsilon = 1e-10);
        assert_relative_eq!(c1.y, c2.y, epsilon = 1e-10);
        // Apex is shared
        let a1 = arc.midpoint_on_arc();
        let a2 = rev.midpoint_on_arc();
        assert_relative_eq!(a1.x, a2.x, epsilon = 1e-10);
        assert_relative_eq!(a1.y, a2.y, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds_semicircle() {
        let b = upper_semi().bounds();
        assert_relative_eq!(b.min.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(b.min.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(b.max.x, 2.0, epsilon = 1e-10);
        assert_relative_eq!(b.max.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_closest_point_and_distance() {
        let arc = upper_semi();
        // Point above the apex projects onto the apex
        let p = Point2::new(1.0, 3.0);
        let closest = arc.closest_point(p);
        assert_relative_eq!(closest.x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(closest.y, 1.0, epsilon = 1e-10);
        assert_relative_eq!(arc.distance_to_point(p), 2.0, epsilon = 1e-10);

        // Point outside the sweep clamps to the nearer endpoint
        let q = Point2::new(-0.5, -0.5);
        let cq = arc.closest_point(q);
        assert_relative_eq!(cq.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(cq.y, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_crossings_with_segment() {
        // Vertical line through the apex of the upper semicircle
        let arc = upper_semi();
        let seg = Segment2::from_coords(1.0, -2.0, 1.0, 2.0);
        let pts = arc.crossings_with_segment(seg, 1e-9);
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(pts[0].y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_crossings_with_segment_outside_sweep() {
        // A line above the chord misses the lower semicircle
        let lower: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0);
        let seg = Segment2::from_coords(1.0, 0.5, 1.0, 2.0);
        assert!(lower.crossings_with_segment(seg, 1e-9).is_empty());
    }

    #[test]
    fn test_crossings_with_arc() {
        // Two upper unit semicircles with centers one apart: their circles
        // meet at (0.5, +-sqrt(3)/2); only the upper point is on both arcs
        let a: Arc2<f64> = Arc2::new(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), 1.0);
        let b: Arc2<f64> = Arc2::new(Point2::new(2.0, 0.0), Point2::new(0.0, 0.0), 1.0);
        let pts = a.crossings_with_arc(&b, 1e-9);
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 0.5, epsilon = 1e-9);
        assert_relative_eq!(pts[0].y, (0.75_f64).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_concentric_arcs_no_crossing() {
        let a = upper_semi();
        let b = a.reversed();
        assert!(a.crossings_with_arc(&b, 1e-9).is_empty());
    }

    #[test]
    fn test_to_polyline() {
        let arc = upper_semi();
        let poly = arc.to_polyline(0.01);
        assert!(poly.len() > 4);
        assert_eq!(poly[0], arc.start);
        assert_eq!(*poly.last().unwrap(), arc.end);

        let c = arc.center();
        for p in &poly {
            assert_relative_eq!(p.distance(c), 1.0, epsilon = 0.02);
        }
    }

    #[test]
    fn test_mirror_negates_bulge() {
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 0.5);
        let m = arc.reflected_axis(Point2::origin(), Point2::new(1.0, 0.0));
        assert_eq!(m.bulge, -0.5);

        // Point reflection is a rotation; orientation survives
        let r = arc.reflected_point(Point2::new(1.0, 1.0));
        assert_eq!(r.bulge, 0.5);
    }

    #[test]
    fn test_major_arc_center() {
        // Bulge > 1 (major arc): the center crosses to the apex side of
        // the chord. A counter-clockwise arc from (0,0) to (2,0) sweeps
        // below the chord, so both center and apex have negative y.
        let arc: Arc2<f64> = Arc2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 2.0);
        let c = arc.center();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-10);
        assert!(c.y < 0.0);
        // Both endpoints are on the circle
        assert_relative_eq!(c.distance(arc.start), arc.radius(), epsilon = 1e-10);
        assert_relative_eq!(c.distance(arc.end), arc.radius(), epsilon = 1e-10);
        // The apex is on the opposite side of the chord from the center
        assert!(arc.midpoint_on_arc().y < c.y);
    }
}
