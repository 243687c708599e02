//! Geometric entities: the closed sum type and the capability trait.
//!
//! Every concrete shape and every set container is an [`Entity`] variant,
//! so sets nest (a set can own sets). Downcasting is pattern matching or
//! the `as_*`/`into_*` accessors; there is no open-ended dynamic casting.

use crate::bounds::Aabb2;
use crate::polygon::HoledPolygon;
use crate::primitives::{Arc2, Point2, Segment2, Vec2};
use crate::set::{EntitySet, LineSet, PolygonSet, StrandSet};
use crate::tolerance::{segments_intersect, SegmentIntersection};
use num_traits::Float;

/// Tag identifying the dynamic variant of an [`Entity`].
///
/// The tag is derived from the variant, never stored, so it cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Point,
    Segment,
    Arc,
    Polygon,
    Set,
    Lines,
    Strands,
    Polygons,
}

/// The capability interface every entity implements.
///
/// Transforms mutate in place; queries borrow. Set containers apply
/// transforms member-wise and fold queries over their members.
pub trait Geometric<F: Float> {
    /// Moves the entity by an offset.
    fn translate(&mut self, offset: Vec2<F>);

    /// Rotates the entity about `origin` by `angle` radians.
    fn rotate(&mut self, origin: Point2<F>, angle: F);

    /// Scales the entity about `origin` by a positive factor.
    fn scale(&mut self, origin: Point2<F>, factor: F);

    /// Reflects the entity through a point.
    fn reflect_point(&mut self, origin: Point2<F>);

    /// Mirrors the entity across the line through `a` and `b`.
    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>);

    /// Snaps the entity's defining coordinates to a grid.
    fn snap_to_grid(&mut self, step: F);

    /// Returns the distance from `p` to the entity.
    fn distance_to_point(&self, p: Point2<F>) -> F;

    /// Returns the closest point on the entity to `p`, or `None` for an
    /// empty container.
    fn project(&self, p: Point2<F>) -> Option<Point2<F>>;

    /// Returns the entity's bounding box, or `None` for an empty container.
    fn bounds(&self) -> Option<Aabb2<F>>;
}

/// A geometric entity: one concrete shape or one owning set.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity<F> {
    Point(Point2<F>),
    Segment(Segment2<F>),
    Arc(Arc2<F>),
    Polygon(HoledPolygon<F>),
    Set(EntitySet<F>),
    Lines(LineSet<F>),
    Strands(StrandSet<F>),
    Polygons(PolygonSet<F>),
}

impl<F: Float> Entity<F> {
    /// Returns the variant tag.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Point(_) => EntityKind::Point,
            Entity::Segment(_) => EntityKind::Segment,
            Entity::Arc(_) => EntityKind::Arc,
            Entity::Polygon(_) => EntityKind::Polygon,
            Entity::Set(_) => EntityKind::Set,
            Entity::Lines(_) => EntityKind::Lines,
            Entity::Strands(_) => EntityKind::Strands,
            Entity::Polygons(_) => EntityKind::Polygons,
        }
    }

    /// Returns `true` for the line-like variants (segment, arc).
    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, Entity::Segment(_) | Entity::Arc(_))
    }

    /// Returns the start and end points of a line-like entity.
    ///
    /// `None` for every other variant.
    pub fn endpoints(&self) -> Option<(Point2<F>, Point2<F>)> {
        match self {
            Entity::Segment(s) => Some((s.start, s.end)),
            Entity::Arc(a) => Some((a.start, a.end)),
            _ => None,
        }
    }

    /// Reverses a line-like entity in place.
    ///
    /// # Panics
    ///
    /// Panics on non-line variants; reversing a shape with no direction is
    /// a caller bug.
    pub fn reverse_line(&mut self) {
        match self {
            Entity::Segment(s) => *s = s.reversed(),
            Entity::Arc(a) => *a = a.reversed(),
            other => panic!("reverse_line on non-line entity {:?}", other.kind()),
        }
    }

    /// Computes the exact crossing points between two line-like entities.
    ///
    /// A collinear overlap run is sampled at its two endpoints.
    ///
    /// # Panics
    ///
    /// Panics if either entity is not line-like.
    pub fn crossings(&self, other: &Entity<F>, eps: F) -> Vec<Point2<F>> {
        match (self, other) {
            (Entity::Segment(s1), Entity::Segment(s2)) => {
                match segments_intersect(*s1, *s2, eps) {
                    SegmentIntersection::None => Vec::new(),
                    SegmentIntersection::Point { point, .. } => vec![point],
                    SegmentIntersection::Overlapping { start, end } => vec![start, end],
                }
            }
            (Entity::Segment(s), Entity::Arc(a)) | (Entity::Arc(a), Entity::Segment(s)) => {
                a.crossings_with_segment(*s, eps)
            }
            (Entity::Arc(a1), Entity::Arc(a2)) => a1.crossings_with_arc(a2, eps),
            (a, b) => panic!(
                "crossings requires line entities, got {:?} and {:?}",
                a.kind(),
                b.kind()
            ),
        }
    }

    /// Borrows the polygon payload, if this is a polygon.
    pub fn as_polygon(&self) -> Option<&HoledPolygon<F>> {
        match self {
            Entity::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Mutably borrows the polygon payload, if this is a polygon.
    pub fn as_polygon_mut(&mut self) -> Option<&mut HoledPolygon<F>> {
        match self {
            Entity::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Unwraps into the polygon payload, if this is a polygon.
    pub fn into_polygon(self) -> Option<HoledPolygon<F>> {
        match self {
            Entity::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Borrows the line-set payload, if this is a line set.
    pub fn as_lines(&self) -> Option<&LineSet<F>> {
        match self {
            Entity::Lines(l) => Some(l),
            _ => None,
        }
    }

    /// Mutably borrows the line-set payload, if this is a line set.
    pub fn as_lines_mut(&mut self) -> Option<&mut LineSet<F>> {
        match self {
            Entity::Lines(l) => Some(l),
            _ => None,
        }
    }

    /// Unwraps into the line-set payload, if this is a line set.
    pub fn into_lines(self) -> Option<LineSet<F>> {
        match self {
            Entity::Lines(l) => Some(l),
            _ => None,
        }
    }

    /// Borrows the segment payload, if this is a straight segment.
    pub fn as_segment(&self) -> Option<&Segment2<F>> {
        match self {
            Entity::Segment(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the arc payload, if this is an arc.
    pub fn as_arc(&self) -> Option<&Arc2<F>> {
        match self {
            Entity::Arc(a) => Some(a),
            _ => None,
        }
    }
}

impl<F: Float> Geometric<F> for Point2<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        *self = self.translated(offset);
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        *self = self.rotated_about(origin, angle);
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        *self = self.scaled_about(origin, factor);
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        *self = self.reflected_point(origin);
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        *self = self.reflected_axis(a, b);
    }

    fn snap_to_grid(&mut self, step: F) {
        *self = self.snapped(step);
    }

    fn distance_to_point(&self, p: Point2<F>) -> F {
        self.distance(p)
    }

    fn project(&self, _p: Point2<F>) -> Option<Point2<F>> {
        Some(*self)
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        Some(Aabb2::from_point(*self))
    }
}

impl<F: Float> Geometric<F> for Segment2<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        *self = self.translated(offset);
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        *self = self.rotated_about(origin, angle);
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        *self = self.scaled_about(origin, factor);
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        *self = self.reflected_point(origin);
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        *self = self.reflected_axis(a, b);
    }

    fn snap_to_grid(&mut self, step: F) {
        *self = self.snapped(step);
    }

    fn distance_to_point(&self, p: Point2<F>) -> F {
        Segment2::distance_to_point(*self, p)
    }

    fn project(&self, p: Point2<F>) -> Option<Point2<F>> {
        Some(self.closest_point(p).0)
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        Some(Segment2::bounds(*self))
    }
}

impl<F: Float> Geometric<F> for Arc2<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        *self = self.translated(offset);
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        *self = self.rotated_about(origin, angle);
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        *self = self.scaled_about(origin, factor);
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        *self = self.reflected_point(origin);
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        *self = self.reflected_axis(a, b);
    }

    fn snap_to_grid(&mut self, step: F) {
        *self = self.snapped(step);
    }

    fn distance_to_point(&self, p: Point2<F>) -> F {
        Arc2::distance_to_point(self, p)
    }

    fn project(&self, p: Point2<F>) -> Option<Point2<F>> {
        Some(self.closest_point(p))
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        Some(Arc2::bounds(self))
    }
}

impl<F: Float> Geometric<F> for HoledPolygon<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        HoledPolygon::translate(self, offset);
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        HoledPolygon::rotate(self, origin, angle);
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        HoledPolygon::scale(self, origin, factor);
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        HoledPolygon::reflect_point(self, origin);
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        HoledPolygon::reflect_axis(self, a, b);
    }

    fn snap_to_grid(&mut self, step: F) {
        HoledPolygon::snap_to_grid(self, step);
    }

    fn distance_to_point(&self, p: Point2<F>) -> F {
        HoledPolygon::distance_to_point(self, p)
    }

    fn project(&self, p: Point2<F>) -> Option<Point2<F>> {
        self.closest_point(p)
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        HoledPolygon::bounds(self)
    }
}

impl<F: Float> Geometric<F> for Entity<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        match self {
            Entity::Point(p) => p.translate(offset),
            Entity::Segment(s) => s.translate(offset),
            Entity::Arc(a) => a.translate(offset),
            Entity::Polygon(p) => p.translate(offset),
            Entity::Set(s) => s.translate(offset),
            Entity::Lines(l) => l.translate(offset),
            Entity::Strands(s) => s.translate(offset),
            Entity::Polygons(p) => p.translate(offset),
        }
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        match self {
            Entity::Point(p) => p.rotate(origin, angle),
            Entity::Segment(s) => s.rotate(origin, angle),
            Entity::Arc(a) => a.rotate(origin, angle),
            Entity::Polygon(p) => p.rotate(origin, angle),
            Entity::Set(s) => s.rotate(origin, angle),
            Entity::Lines(l) => l.rotate(origin, angle),
            Entity::Strands(s) => s.rotate(origin, angle),
            Entity::Polygons(p) => p.rotate(origin, angle),
        }
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        match self {
            Entity::Point(p) => p.scale(origin, factor),
            Entity::Segment(s) => s.scale(origin, factor),
            Entity::Arc(a) => a.scale(origin, factor),
            Entity::Polygon(p) => p.scale(origin, factor),
            Entity::Set(s) => s.scale(origin, factor),
            Entity::Lines(l) => l.scale(origin, factor),
            Entity::Strands(s) => s.scale(origin, factor),
            Entity::Polygons(p) => p.scale(origin, factor),
        }
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        match self {
            Entity::Point(p) => Geometric::reflect_point(p, origin),
            Entity::Segment(s) => Geometric::reflect_point(s, origin),
            Entity::Arc(a) => Geometric::reflect_point(a, origin),
            Entity::Polygon(p) => Geometric::reflect_point(p, origin),
            Entity::Set(s) => Geometric::reflect_point(s, origin),
            Entity::Lines(l) => Geometric::reflect_point(l, origin),
            Entity::Strands(s) => Geometric::reflect_point(s, origin),
            Entity::Polygons(p) => Geometric::reflect_point(p, origin),
        }
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        match self {
            Entity::Point(p) => Geometric::reflect_axis(p, a, b),
            Entity::Segment(s) => Geometric::reflect_axis(s, a, b),
            Entity::Arc(arc) => Geometric::reflect_axis(arc, a, b),
            Entity::Polygon(p) => Geometric::reflect_axis(p, a, b),
            Entity::Set(s) => Geometric::reflect_axis(s, a, b),
            Entity::Lines(l) => Geometric::reflect_axis(l, a, b),
            Entity::Strands(s) => Geometric::reflect_axis(s, a, b),
            Entity::Polygons(p) => Geometric::reflect_axis(p, a, b),
        }
    }

    fn snap_to_grid(&mut self, step: F) {
        match self {
            Entity::Point(p) => Geometric::snap_to_grid(p, step),
            Entity::Segment(s) => Geometric::snap_to_grid(s, step),
            Entity::Arc(a) => Geometric::snap_to_grid(a, step),
            Entity::Polygon(p) => Geometric::snap_to_grid(p, step),
            Entity::Set(s) => Geometric::snap_to_grid(s, step),
            Entity::Lines(l) => Geometric::snap_to_grid(l, step),
            Entity::Strands(s) => Geometric::snap_to_grid(s, step),
            Entity::Polygons(p) => Geometric::snap_to_grid(p, step),
        }
    }

    fn distance_to_point(&self, p: Point2<F>) -> F {
        match self {
            Entity::Point(pt) => pt.distance_to_point(p),
            Entity::Segment(s) => Geometric::distance_to_point(s, p),
            Entity::Arc(a) => Geometric::distance_to_point(a, p),
            Entity::Polygon(poly) => Geometric::distance_to_point(poly, p),
            Entity::Set(s) => s.distance_to_point(p),
            Entity::Lines(l) => l.distance_to_point(p),
            Entity::Strands(s) => s.distance_to_point(p),
            Entity::Polygons(poly) => poly.distance_to_point(p),
        }
    }

    fn project(&self, p: Point2<F>) -> Option<Point2<F>> {
        match self {
            Entity::Point(pt) => Geometric::project(pt, p),
            Entity::Segment(s) => Geometric::project(s, p),
            Entity::Arc(a) => Geometric::project(a, p),
            Entity::Polygon(poly) => Geometric::project(poly, p),
            Entity::Set(s) => s.project(p),
            Entity::Lines(l) => l.project(p),
            Entity::Strands(s) => s.project(p),
            Entity::Polygons(poly) => poly.project(p),
        }
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        match self {
            Entity::Point(pt) => Geometric::bounds(pt),
            Entity::Segment(s) => Geometric::bounds(s),
            Entity::Arc(a) => Geometric::bounds(a),
            Entity::Polygon(poly) => Geometric::bounds(poly),
            Entity::Set(s) => s.bounds(),
            Entity::Lines(l) => l.bounds(),
            Entity::Strands(s) => s.bounds(),
            Entity::Polygons(poly) => poly.bounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kind_reporting() {
        let p: Entity<f64> = Entity::Point(Point2::new(0.0, 0.0));
        let s: Entity<f64> = Entity::Segment(Segment2::from_coords(0.0, 0.0, 1.0, 0.0));
        let set: Entity<f64> = Entity::Set(EntitySet::new());
        assert_eq!(p.kind(), EntityKind::Point);
        assert_eq!(s.kind(), EntityKind::Segment);
        assert_eq!(set.kind(), EntityKind::Set);
    }

    #[test]
    fn test_endpoints_only_for_lines() {
        let s: Entity<f64> = Entity::Segment(Segment2::from_coords(1.0, 2.0, 3.0, 4.0));
        let (start, end) = s.endpoints().unwrap();
        assert_eq!(start.x, 1.0);
        assert_eq!(end.y, 4.0);

        let p: Entity<f64> = Entity::Point(Point2::new(0.0, 0.0));
        assert!(p.endpoints().is_none());
    }

    #[test]
    fn test_reverse_line() {
        let mut s: Entity<f64> = Entity::Segment(Segment2::from_coords(0.0, 0.0, 1.0, 0.0));
        s.reverse_line();
        let (start, _) = s.endpoints().unwrap();
        assert_eq!(start.x, 1.0);

        let mut a: Entity<f64> =
            Entity::Arc(Arc2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0));
        a.reverse_line();
        assert_eq!(a.as_arc().unwrap().bulge, -1.0);
    }

    #[test]
    #[should_panic]
    fn test_reverse_line_on_point_panics() {
        let mut p: Entity<f64> = Entity::Point(Point2::new(0.0, 0.0));
        p.reverse_line();
    }

    #[test]
    fn test_crossings_segment_segment() {
        let s1: Entity<f64> = Entity::Segment(Segment2::from_coords(0.0, 0.0, 2.0, 2.0));
        let s2: Entity<f64> = Entity::Segment(Segment2::from_coords(0.0, 2.0, 2.0, 0.0));
        let pts = s1.crossings(&s2, 1e-9);
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].x, 1.0, epsilon = 1e-10);
        assert_relative_eq!(pts[0].y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_crossings_overlap_sampled_at_endpoints() {
        let s1: Entity<f64> = Entity::Segment(Segment2::from_coords(0.0, 0.0, 10.0, 0.0));
        let s2: Entity<f64> = Entity::Segment(Segment2::from_coords(5.0, 0.0, 15.0, 0.0));
        let pts = s1.crossings(&s2, 1e-9);
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_crossings_segment_arc() {
        let arc: Entity<f64> =
            Entity::Arc(Arc2::new(Point2::new(2.0, 0.0), Point2::new(0.0, 0.0), 1.0));
        let seg: Entity<f64> = Entity::Segment(Segment2::from_coords(1.0, -2.0, 1.0, 2.0));
        let pts = arc.crossings(&seg, 1e-9);
        assert_eq!(pts.len(), 1);
        assert_relative_eq!(pts[0].y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_geometric_dispatch() {
        let mut e: Entity<f64> = Entity::Segment(Segment2::from_coords(0.0, 0.0, 1.0, 0.0));
        e.translate(Vec2::new(0.0, 2.0));
        let b = e.bounds().unwrap();
        assert_eq!(b.min.y, 2.0);
        assert_relative_eq!(e.distance_to_point(Point2::new(0.5, 0.0)), 2.0, epsilon = 1e-10);
        let proj = e.project(Point2::new(0.5, 0.0)).unwrap();
        assert_relative_eq!(proj.y, 2.0, epsilon = 1e-10);
    }
}
