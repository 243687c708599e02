//! Polygon with holes.

use super::Contour;
use crate::bounds::Aabb2;
use crate::primitives::{Point2, Segment2, Vec2};
use num_traits::Float;

/// A polygonal region: one outer boundary plus zero or more holes.
///
/// Each hole is expected to lie inside the outer boundary and be disjoint
/// from the other holes. The type does not police this; the unification
/// engine maintains it for the polygons it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct HoledPolygon<F> {
    outer: Contour<F>,
    holes: Vec<Contour<F>>,
}

impl<F: Float> HoledPolygon<F> {
    /// Creates a polygon with no holes.
    #[inline]
    pub fn new(outer: Contour<F>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    #[inline]
    pub fn with_holes(outer: Contour<F>, holes: Vec<Contour<F>>) -> Self {
        Self { outer, holes }
    }

    /// Returns the outer boundary.
    #[inline]
    pub fn outer(&self) -> &Contour<F> {
        &self.outer
    }

    /// Returns the holes.
    #[inline]
    pub fn holes(&self) -> &[Contour<F>] {
        &self.holes
    }

    /// Attaches a hole.
    #[inline]
    pub fn add_hole(&mut self, hole: Contour<F>) {
        self.holes.push(hole);
    }

    /// Returns the total number of boundary edges (outer plus holes).
    ///
    /// This is the complexity metric the progressive unifier thresholds on.
    pub fn edge_count(&self) -> usize {
        self.outer.edge_count() + self.holes.iter().map(Contour::edge_count).sum::<usize>()
    }

    /// Returns the enclosed area (outer area minus hole areas).
    pub fn area(&self) -> F {
        let holes: F = self
            .holes
            .iter()
            .fold(F::zero(), |acc, h| acc + h.area());
        self.outer.area() - holes
    }

    /// Tests if a point is inside the region (inside the outer boundary
    /// and outside every hole).
    pub fn region_contains(&self, p: Point2<F>) -> bool {
        self.outer.contains(p) && !self.holes.iter().any(|h| h.contains(p))
    }

    /// Returns `true` if the point lies within `eps` of any boundary.
    pub fn on_boundary(&self, p: Point2<F>, eps: F) -> bool {
        self.outer.on_boundary(p, eps) || self.holes.iter().any(|h| h.on_boundary(p, eps))
    }

    /// Iterates over every boundary edge, outer ring first.
    pub fn boundary_edges(&self) -> impl Iterator<Item = Segment2<F>> + '_ {
        self.outer
            .edges()
            .chain(self.holes.iter().flat_map(|h| h.edges()))
    }

    /// Returns the bounding box of the outer boundary.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        self.outer.bounds()
    }

    /// Computes the distance from a point to the nearest boundary edge.
    pub fn distance_to_point(&self, p: Point2<F>) -> F {
        let mut best = self.outer.distance_to_point(p);
        for h in &self.holes {
            let d = h.distance_to_point(p);
            if d < best {
                best = d;
            }
        }
        best
    }

    /// Returns the closest boundary point to `p`.
    pub fn closest_point(&self, p: Point2<F>) -> Option<Point2<F>> {
        let mut best: Option<(F, Point2<F>)> = None;
        for ring in std::iter::once(&self.outer).chain(self.holes.iter()) {
            if let Some(c) = ring.closest_point(p) {
                let d = p.distance_squared(c);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, c));
                }
            }
        }
        best.map(|(_, c)| c)
    }

    /// Applies a mapping to every vertex of every ring.
    pub fn map_points(&mut self, mut f: impl FnMut(Point2<F>) -> Point2<F>) {
        self.outer.map_points(&mut f);
        for h in &mut self.holes {
            h.map_points(&mut f);
        }
    }

    /// Translates the polygon.
    pub fn translate(&mut self, offset: Vec2<F>) {
        self.outer.translate(offset);
        for h in &mut self.holes {
            h.translate(offset);
        }
    }

    /// Rotates the polygon about `origin`.
    pub fn rotate(&mut self, origin: Point2<F>, angle: F) {
        self.outer.rotate(origin, angle);
        for h in &mut self.holes {
            h.rotate(origin, angle);
        }
    }

    /// Scales the polygon about `origin` by a positive factor.
    pub fn scale(&mut self, origin: Point2<F>, factor: F) {
        self.outer.scale(origin, factor);
        for h in &mut self.holes {
            h.scale(origin, factor);
        }
    }

    /// Reflects the polygon through `origin`.
    pub fn reflect_point(&mut self, origin: Point2<F>) {
        self.outer.reflect_point(origin);
        for h in &mut self.holes {
            h.reflect_point(origin);
        }
    }

    /// Mirrors the polygon across the line through `a` and `b`.
    pub fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        self.outer.reflect_axis(a, b);
        for h in &mut self.holes {
            h.reflect_axis(a, b);
        }
    }

    /// Snaps every vertex to a grid.
    pub fn snap_to_grid(&mut self, step: F) {
        self.outer.snap_to_grid(step);
        for h in &mut self.holes {
            h.snap_to_grid(step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Contour<f64> {
        Contour::new(vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    fn frame() -> HoledPolygon<f64> {
        HoledPolygon::with_holes(square(0.0, 0.0, 4.0), vec![square(1.0, 1.0, 2.0)])
    }

    #[test]
    fn test_area_subtracts_holes() {
        assert_relative_eq!(frame().area(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_edge_count_sums_rings() {
        assert_eq!(frame().edge_count(), 8);
    }

    #[test]
    fn test_region_contains() {
        let f = frame();
        assert!(f.region_contains(Point2::new(0.5, 0.5))); // In the frame
        assert!(!f.region_contains(Point2::new(2.0, 2.0))); // In the hole
        assert!(!f.region_contains(Point2::new(5.0, 5.0))); // Outside
    }

    #[test]
    fn test_boundary_edges_covers_holes() {
        assert_eq!(frame().boundary_edges().count(), 8);
    }

    #[test]
    fn test_distance_uses_nearest_ring() {
        let f = frame();
        // The hole boundary is closer than the outer one
        assert_relative_eq!(
            f.distance_to_point(Point2::new(2.0, 2.0)),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_translate_moves_holes() {
        let mut f = frame();
        f.translate(Vec2::new(10.0, 0.0));
        assert!(f.region_contains(Point2::new(10.5, 0.5)));
        assert!(!f.region_contains(Point2::new(12.0, 2.0)));
        assert_relative_eq!(f.area(), 12.0, epsilon = 1e-12);
    }
}
