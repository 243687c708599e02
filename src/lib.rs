//! figura - A 2D computational-geometry kernel.
//!
//! Typed geometric entities (points, segments, arcs, holed polygons) and
//! owning set containers that operate on them in bulk: sweep-based
//! intersection detection, endpoint chain assembly, and boolean
//! unification of polygon collections.

pub mod bounds;
pub mod entity;
pub mod error;
pub mod polygon;
pub mod primitives;
pub mod set;
pub mod tolerance;

pub use bounds::Aabb2;
pub use entity::{Entity, EntityKind, Geometric};
pub use error::GeometryError;
pub use polygon::{unite, Contour, HoledPolygon};
pub use primitives::{Arc2, Point2, Segment2, Vec2};
pub use set::{Crossing, DegeneracyMode, EntitySet, LineSet, PolygonSet, StrandSet};
pub use tolerance::{
    orient2d, point_on_segment, segments_intersect, Orientation, SegmentIntersection,
};
