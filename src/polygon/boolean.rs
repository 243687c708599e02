//! Pairwise boolean union of holed polygons.
//!
//! The union is computed by edge classification rather than vertex
//! collection: both boundaries are split at their mutual crossings, each
//! piece is kept exactly when one side of it lies inside the combined
//! region, and the surviving pieces are chained back into rings. The
//! side-probe classification is what lets coincident boundary runs (shared
//! edges, T-junctions) fall out cleanly: a shared run with region on both
//! sides is interior and drops, a shared run with region on one side is
//! boundary and survives once.

use super::{Contour, HoledPolygon};
use crate::entity::Entity;
use crate::primitives::{Point2, Segment2};
use crate::set::{LineSet, StrandSet};
use crate::tolerance::{point_on_segment, segments_intersect, SegmentIntersection};
use num_traits::Float;

/// Computes the union of two holed polygons.
///
/// Returns:
/// - an empty vector when the regions do not merge (disjoint bounding
///   boxes, disjoint regions, or contact at isolated points only); this
///   is the "no union" outcome;
/// - a single polygon covering both regions when they do merge.
///
/// The union of two connected overlapping regions is itself connected, so
/// a merge can never produce two pieces; callers that require the merged
/// result may treat more than one returned polygon as a broken invariant.
///
/// `eps` is the coincidence tolerance: boundary features closer than this
/// are treated as touching, and slivers thinner than this fold away.
pub fn unite<F: Float>(a: &HoledPolygon<F>, b: &HoledPolygon<F>, eps: F) -> Vec<HoledPolygon<F>> {
    let (ra, rb) = match (a.bounds(), b.bounds()) {
        (Some(ra), Some(rb)) => (ra, rb),
        _ => return Vec::new(),
    };
    if !ra.intersects(rb) {
        return Vec::new();
    }

    let edges_a: Vec<Segment2<F>> = a.boundary_edges().collect();
    let edges_b: Vec<Segment2<F>> = b.boundary_edges().collect();

    let (pieces_a, contact_a) = split_against(&edges_a, &edges_b, eps);
    let (pieces_b, contact_b) = split_against(&edges_b, &edges_a, eps);

    if !contact_a && !contact_b {
        return unite_without_contact(a, b);
    }

    // Probe just off each piece's midpoint on both sides; a piece is on
    // the union boundary iff exactly one probe lands inside the region.
    let probe = eps + eps;
    let mut kept: Vec<Segment2<F>> = Vec::new();
    for piece in pieces_a {
        if let Some(oriented) = classify_piece(piece, a, b, probe) {
            kept.push(oriented);
        }
    }
    let from_a = kept.len();
    for piece in pieces_b {
        if let Some(oriented) = classify_piece(piece, a, b, probe) {
            if !is_duplicate(oriented, &kept[..from_a], probe) {
                kept.push(oriented);
            }
        }
    }

    if kept.is_empty() {
        return Vec::new();
    }

    // Chain the surviving pieces into closed rings.
    let mut strands = StrandSet::new();
    for piece in kept {
        let mut chain = LineSet::new();
        chain.add(Entity::Segment(piece));
        strands.add_chain(chain);
    }
    strands.merge_joining(probe);

    let mut rings: Vec<Contour<F>> = Vec::new();
    for chain in strands.into_chains() {
        if !chain.is_closed(false, probe) {
            continue; // Dangling remnant of a sub-tolerance feature
        }
        let points: Vec<Point2<F>> = chain
            .iter()
            .map(|e| e.endpoints().expect("chained pieces are segments").0)
            .collect();
        // A ring pinched at a repeated vertex (regions touching at a
        // point) separates into its simple loops.
        for loop_points in split_pinched(points, probe) {
            if let Ok(ring) = Contour::try_new(loop_points, eps) {
                rings.push(ring);
            }
        }
    }

    assemble(rings, eps)
}

/// Splits a vertex ring at repeated vertices into simple loops.
fn split_pinched<F: Float>(points: Vec<Point2<F>>, eps: F) -> Vec<Vec<Point2<F>>> {
    let mut loops = Vec::new();
    let mut work: Vec<Point2<F>> = Vec::with_capacity(points.len());

    for p in points {
        if let Some(k) = work.iter().position(|q| q.approx_eq(p, eps)) {
            // Everything since the first visit of this vertex closes a loop
            loops.push(work.split_off(k));
            work.push(p);
        } else {
            work.push(p);
        }
    }
    if !work.is_empty() {
        loops.push(work);
    }
    loops
}

/// Union when the boundaries never touch: containment or disjointness.
fn unite_without_contact<F: Float>(
    a: &HoledPolygon<F>,
    b: &HoledPolygon<F>,
) -> Vec<HoledPolygon<F>> {
    if let Some(&v) = b.outer().points().first() {
        if a.region_contains(v) {
            return vec![absorb_contained(a, b)];
        }
    }
    if let Some(&v) = a.outer().points().first() {
        if b.region_contains(v) {
            return vec![absorb_contained(b, a)];
        }
    }
    Vec::new()
}

/// Builds the union of `outer_poly` and a polygon wholly inside its solid
/// region: the outer polygon, minus any of its holes the inner one covers.
fn absorb_contained<F: Float>(
    outer_poly: &HoledPolygon<F>,
    inner: &HoledPolygon<F>,
) -> HoledPolygon<F> {
    let holes = outer_poly
        .holes()
        .iter()
        .filter(|h| {
            h.points()
                .first()
                .map_or(true, |&v| !inner.region_contains(v))
        })
        .cloned()
        .collect();
    HoledPolygon::with_holes(outer_poly.outer().clone(), holes)
}

/// Splits every edge at its crossings with the other boundary.
///
/// Returns the pieces and whether any boundary contact was found.
fn split_against<F: Float>(
    edges: &[Segment2<F>],
    against: &[Segment2<F>],
    eps: F,
) -> (Vec<Segment2<F>>, bool) {
    let mut pieces = Vec::new();
    let mut contact = false;

    for &e in edges {
        let e_bounds = e.bounds();
        let mut ts: Vec<F> = vec![F::zero(), F::one()];

        for &g in against {
            if !e_bounds.intersects(g.bounds()) {
                continue;
            }
            match segments_intersect(e, g, eps) {
                SegmentIntersection::Point { t1, .. } => {
                    contact = true;
                    ts.push(t1);
                }
                SegmentIntersection::Overlapping { start, end } => {
                    contact = true;
                    ts.push(e.closest_point(start).1);
                    ts.push(e.closest_point(end).1);
                }
                SegmentIntersection::None => {}
            }
        }

        ts.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

        let len = e.length();
        let min_dt = if len > F::zero() { eps / len } else { F::zero() };

        let mut last = ts[0];
        for &t in &ts[1..] {
            if t - last > min_dt {
                let piece = Segment2::new(e.point_at(last), e.point_at(t));
                if !piece.is_degenerate(eps) {
                    pieces.push(piece);
                }
                last = t;
            }
        }
    }

    (pieces, contact)
}

/// Decides whether a piece lies on the union boundary, and orients it so
/// the region is on its left.
fn classify_piece<F: Float>(
    piece: Segment2<F>,
    a: &HoledPolygon<F>,
    b: &HoledPolygon<F>,
    probe: F,
) -> Option<Segment2<F>> {
    let dir = piece.direction().normalize()?;
    let left = dir.perpendicular();
    let m = piece.midpoint();

    let p_left = m + left * probe;
    let p_right = m - left * probe;

    let in_left = a.region_contains(p_left) || b.region_contains(p_left);
    let in_right = a.region_contains(p_right) || b.region_contains(p_right);

    match (in_left, in_right) {
        (true, false) => Some(piece),
        (false, true) => Some(piece.reversed()),
        _ => None, // Interior (both) or exterior (neither)
    }
}

/// Tests whether `piece` re-traces boundary already kept from the other
/// polygon (a shared run). Covers either direction of the split: the new
/// piece contained in a kept one, or a kept piece contained in the new one.
fn is_duplicate<F: Float>(piece: Segment2<F>, kept: &[Segment2<F>], tol: F) -> bool {
    kept.iter().any(|&k| covers(k, piece, tol) || covers(piece, k, tol))
}

/// Returns `true` if both endpoints of `inner` lie on `outer`.
fn covers<F: Float>(outer: Segment2<F>, inner: Segment2<F>, tol: F) -> bool {
    point_on_segment(inner.start, outer, tol) && point_on_segment(inner.end, outer, tol)
}

/// Nests the traced rings into one outer boundary plus holes.
///
/// More than one outermost ring means the inputs never merged into a
/// single region; that is the no-union outcome.
fn assemble<F: Float>(rings: Vec<Contour<F>>, eps: F) -> Vec<HoledPolygon<F>> {
    if rings.is_empty() {
        return Vec::new();
    }

    let mut outer_indices = Vec::new();
    for i in 0..rings.len() {
        let nested = (0..rings.len()).any(|j| j != i && ring_inside(&rings[i], &rings[j], eps));
        if !nested {
            outer_indices.push(i);
        }
    }

    if outer_indices.len() != 1 {
        return Vec::new();
    }

    let outer_idx = outer_indices[0];
    let mut outer = None;
    let mut holes = Vec::new();
    for (i, ring) in rings.into_iter().enumerate() {
        if i == outer_idx {
            outer = Some(ring);
        } else {
            holes.push(ring);
        }
    }

    vec![HoledPolygon::with_holes(
        outer.expect("outer ring selected above"),
        holes,
    )]
}

/// Tests whether ring `inner` lies inside ring `outer`.
///
/// Uses the first vertex of `inner` that is not on `outer`'s boundary;
/// rings sharing every tested vertex are treated as not nested.
fn ring_inside<F: Float>(inner: &Contour<F>, outer: &Contour<F>, eps: F) -> bool {
    for &v in inner.points() {
        if !outer.on_boundary(v, eps) {
            return outer.contains(v);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> HoledPolygon<f64> {
        HoledPolygon::new(Contour::new(vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ]))
    }

    const EPS: f64 = 1e-9;

    #[test]
    fn test_disjoint_is_no_union() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 0.0, 1.0);
        assert!(unite(&a, &b, EPS).is_empty());
    }

    #[test]
    fn test_x_offset_squares() {
        // Squares offset by half a side: one ring, T-junction vertices
        // retained, so 8 edges
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.0, 1.0);
        let result = unite(&a, &b, EPS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 0);
        assert_eq!(result[0].edge_count(), 8);
        assert_relative_eq!(result[0].area(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_diagonal_offset_squares() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        let result = unite(&a, &b, EPS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].edge_count(), 8);
        assert_relative_eq!(result[0].area(), 1.75, epsilon = 1e-9);
    }

    #[test]
    fn test_shared_edge_squares_make_hexagon() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        let result = unite(&a, &b, EPS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].edge_count(), 6);
        assert_relative_eq!(result[0].area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_corner_touch_is_no_union() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 1.0, 1.0);
        assert!(unite(&a, &b, EPS).is_empty());
    }

    #[test]
    fn test_contained_absorbs() {
        let a = square(0.0, 0.0, 4.0);
        let b = square(1.0, 1.0, 1.0);
        let result = unite(&a, &b, EPS);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 16.0, epsilon = 1e-9);

        // Symmetric order
        let result = unite(&b, &a, EPS);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identical_squares() {
        let a = square(0.0, 0.0, 1.0);
        let result = unite(&a, &a.clone(), EPS);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inside_hole_is_no_union() {
        let frame = HoledPolygon::with_holes(
            Contour::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 4.0),
                Point2::new(0.0, 4.0),
            ]),
            vec![Contour::new(vec![
                Point2::new(1.0, 1.0),
                Point2::new(3.0, 1.0),
                Point2::new(3.0, 3.0),
                Point2::new(1.0, 3.0),
            ])],
        );
        let inner = square(1.5, 1.5, 1.0);
        assert!(unite(&frame, &inner, EPS).is_empty());
    }

    #[test]
    fn test_contained_fills_covered_hole() {
        // The inner polygon sits in the solid region and swallows a hole
        let frame = HoledPolygon::with_holes(
            Contour::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(6.0, 0.0),
                Point2::new(6.0, 6.0),
                Point2::new(0.0, 6.0),
            ]),
            vec![Contour::new(vec![
                Point2::new(2.0, 2.0),
                Point2::new(3.0, 2.0),
                Point2::new(3.0, 3.0),
                Point2::new(2.0, 3.0),
            ])],
        );
        let cover = square(1.0, 1.0, 4.0);
        let result = unite(&frame, &cover, EPS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 0);
        assert_relative_eq!(result[0].area(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overlap_cuts_into_hole() {
        // A bar crossing the frame's hole shrinks the hole region
        let frame = HoledPolygon::with_holes(
            Contour::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(6.0, 0.0),
                Point2::new(6.0, 6.0),
                Point2::new(0.0, 6.0),
            ]),
            vec![Contour::new(vec![
                Point2::new(2.0, 2.0),
                Point2::new(4.0, 2.0),
                Point2::new(4.0, 4.0),
                Point2::new(2.0, 4.0),
            ])],
        );
        // Horizontal bar through the middle of the hole
        let bar = HoledPolygon::new(Contour::new(vec![
            Point2::new(1.0, 2.5),
            Point2::new(5.0, 2.5),
            Point2::new(5.0, 3.5),
            Point2::new(1.0, 3.5),
        ]));
        let result = unite(&frame, &bar, EPS);
        assert_eq!(result.len(), 1);
        // The hole splits into two smaller holes above and below the bar
        assert_eq!(result[0].holes().len(), 2);
        // Frame area 32 + bar portion inside the hole (2 wide x 1 tall)
        assert_relative_eq!(result[0].area(), 34.0, epsilon = 1e-9);
    }

    #[test]
    fn test_two_c_shapes_enclose_a_pocket() {
        // A U shape and a cap: the union encloses a new hole that neither
        // input had
        let u = HoledPolygon::new(Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ]));
        let cap = HoledPolygon::new(Contour::new(vec![
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(1.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(3.0, 4.0),
            Point2::new(0.0, 4.0),
        ]));
        let result = unite(&u, &cap, EPS);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        // Pocket is the 1x2 slot between the arms, sealed by the cap
        assert_relative_eq!(result[0].holes()[0].area(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(result[0].area(), 10.0, epsilon = 1e-9);
    }
}
