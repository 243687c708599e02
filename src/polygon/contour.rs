//! Closed vertex ring with implicit closure.

use crate::bounds::Aabb2;
use crate::error::GeometryError;
use crate::primitives::{Point2, Segment2, Vec2};
use num_traits::Float;

/// A closed boundary represented as a vertex ring.
///
/// The last vertex connects implicitly back to the first. Construction
/// normalizes the winding to counter-clockwise; a contour's role (outer
/// boundary or hole) is carried by its position in a
/// [`HoledPolygon`](super::HoledPolygon), not by its winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour<F> {
    points: Vec<Point2<F>>,
}

impl<F: Float> Contour<F> {
    /// Creates a contour, normalizing the winding to counter-clockwise.
    ///
    /// Accepts any vertex list; use [`Contour::try_new`] to reject
    /// degenerate rings.
    pub fn new(points: Vec<Point2<F>>) -> Self {
        let mut contour = Self { points };
        if contour.signed_area() < F::zero() {
            contour.points.reverse();
        }
        contour
    }

    /// Creates a contour, rejecting rings that cannot enclose area.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::TooFewVertices`] for fewer than 3 vertices
    /// - [`GeometryError::ZeroArea`] when the enclosed area is at or
    ///   below `eps`
    pub fn try_new(points: Vec<Point2<F>>, eps: F) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewVertices);
        }
        let contour = Self::new(points);
        if contour.area() <= eps {
            return Err(GeometryError::ZeroArea);
        }
        Ok(contour)
    }

    /// Returns the vertices of the ring.
    #[inline]
    pub fn points(&self) -> &[Point2<F>] {
        &self.points
    }

    /// Returns the number of edges (equal to the number of vertices).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the ring has too few vertices to enclose area.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Returns the signed area via the shoelace formula.
    ///
    /// Positive for counter-clockwise winding.
    pub fn signed_area(&self) -> F {
        if self.points.len() < 3 {
            return F::zero();
        }

        let mut area = F::zero();
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area = area + self.points[i].x * self.points[j].y;
            area = area - self.points[j].x * self.points[i].y;
        }
        area / F::from(2.0).unwrap()
    }

    /// Returns the absolute enclosed area.
    #[inline]
    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    /// Tests if a point is inside the ring using ray casting.
    ///
    /// Points on the boundary may report either way; use
    /// [`Contour::on_boundary`] to detect them.
    pub fn contains(&self, point: Point2<F>) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.points[i];
            let vj = self.points[j];

            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Returns `true` if the point lies within `eps` of any edge.
    pub fn on_boundary(&self, point: Point2<F>, eps: F) -> bool {
        let eps_sq = eps * eps;
        self.edges()
            .any(|e| e.distance_squared_to_point(point) <= eps_sq)
    }

    /// Iterates over the ring's edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Segment2<F>> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment2::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Returns the bounding box, or `None` for an empty ring.
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        Aabb2::from_points(self.points.iter().copied())
    }

    /// Applies a mapping to every vertex.
    ///
    /// Orientation-reversing maps leave the winding inverted; callers that
    /// mirror a ring re-normalize afterward (see `reflect_axis`).
    pub fn map_points(&mut self, mut f: impl FnMut(Point2<F>) -> Point2<F>) {
        for p in &mut self.points {
            *p = f(*p);
        }
    }

    /// Translates every vertex.
    pub fn translate(&mut self, offset: Vec2<F>) {
        self.map_points(|p| p.translated(offset));
    }

    /// Rotates every vertex about `origin`.
    pub fn rotate(&mut self, origin: Point2<F>, angle: F) {
        self.map_points(|p| p.rotated_about(origin, angle));
    }

    /// Scales every vertex about `origin` by a positive factor.
    pub fn scale(&mut self, origin: Point2<F>, factor: F) {
        debug_assert!(factor > F::zero());
        self.map_points(|p| p.scaled_about(origin, factor));
    }

    /// Reflects every vertex through `origin` (orientation preserving).
    pub fn reflect_point(&mut self, origin: Point2<F>) {
        self.map_points(|p| p.reflected_point(origin));
    }

    /// Mirrors every vertex across the line through `a` and `b`,
    /// restoring counter-clockwise winding afterward.
    pub fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        self.map_points(|p| p.reflected_axis(a, b));
        self.points.reverse();
    }

    /// Snaps every vertex to a grid.
    pub fn snap_to_grid(&mut self, step: F) {
        self.map_points(|p| p.snapped(step));
    }

    /// Computes the distance from a point to the nearest edge.
    ///
    /// Returns infinity for an empty ring.
    pub fn distance_to_point(&self, p: Point2<F>) -> F {
        let mut best = F::infinity();
        for e in self.edges() {
            let d = e.distance_squared_to_point(p);
            if d < best {
                best = d;
            }
        }
        best.sqrt()
    }

    /// Returns the closest boundary point to `p`, or `None` for an empty ring.
    pub fn closest_point(&self, p: Point2<F>) -> Option<Point2<F>> {
        let mut best: Option<(F, Point2<F>)> = None;
        for e in self.edges() {
            let (c, _) = e.closest_point(p);
            let d = p.distance_squared(c);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, c));
            }
        }
        best.map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Contour<f64> {
        Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_area() {
        assert_relative_eq!(unit_square().area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_new_normalizes_winding() {
        // Clockwise input ends up counter-clockwise
        let c = Contour::new(vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        assert!(c.signed_area() > 0.0);
    }

    #[test]
    fn test_try_new_rejects_degenerate() {
        let too_few = Contour::try_new(vec![Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0)], 1e-9);
        assert_eq!(too_few.unwrap_err(), GeometryError::TooFewVertices);

        let flat = Contour::try_new(
            vec![
                Point2::new(0.0_f64, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
            ],
            1e-9,
        );
        assert_eq!(flat.unwrap_err(), GeometryError::ZeroArea);
    }

    #[test]
    fn test_contains() {
        let sq = unit_square();
        assert!(sq.contains(Point2::new(0.5, 0.5)));
        assert!(!sq.contains(Point2::new(1.5, 0.5)));
        assert!(!sq.contains(Point2::new(0.5, -0.5)));
    }

    #[test]
    fn test_on_boundary() {
        let sq = unit_square();
        assert!(sq.on_boundary(Point2::new(0.5, 0.0), 1e-9));
        assert!(sq.on_boundary(Point2::new(1.0, 0.5), 1e-9));
        assert!(!sq.on_boundary(Point2::new(0.5, 0.5), 1e-9));
    }

    #[test]
    fn test_edges_close_the_ring() {
        let sq = unit_square();
        let edges: Vec<_> = sq.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].end, sq.points()[0]);
    }

    #[test]
    fn test_reflect_axis_keeps_ccw() {
        let mut sq = unit_square();
        sq.reflect_axis(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0));
        assert!(sq.signed_area() > 0.0);
        assert_relative_eq!(sq.area(), 1.0, epsilon = 1e-12);
        assert!(sq.contains(Point2::new(-0.5, 0.5)));
    }

    #[test]
    fn test_rotate_preserves_area() {
        let mut sq = unit_square();
        sq.rotate(Point2::new(0.5, 0.5), 1.0);
        assert_relative_eq!(sq.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_and_closest() {
        let sq = unit_square();
        assert_relative_eq!(sq.distance_to_point(Point2::new(2.0, 0.5)), 1.0, epsilon = 1e-12);
        let c = sq.closest_point(Point2::new(2.0, 0.5)).unwrap();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.5, epsilon = 1e-12);
    }
}
