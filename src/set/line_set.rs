//! Line-entity chains and the sweep intersection detector.

use super::EntitySet;
use crate::bounds::Aabb2;
use crate::entity::{Entity, Geometric};
use crate::primitives::{Point2, Segment2, Vec2};
use num_traits::Float;

/// A crossing found between two members of one or two line sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing<F> {
    /// The crossing point.
    pub point: Point2<F>,
    /// Index of the first member (in `self` for cross-set sweeps).
    pub first: usize,
    /// Index of the second member (in `other` for cross-set sweeps).
    pub second: usize,
}

/// An [`EntitySet`] restricted by convention to line-like entities,
/// forming an open or closed chain.
///
/// Adds endpoint and closure queries, the four-case endpoint join, member
/// subdivision, and the sweep-based intersection detector.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSet<F> {
    set: EntitySet<F>,
}

impl<F: Float> LineSet<F> {
    /// Creates an empty chain.
    #[inline]
    pub fn new() -> Self {
        Self {
            set: EntitySet::new(),
        }
    }

    /// Creates a chain from straight segments.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = Segment2<F>>,
    {
        let mut chain = Self::new();
        for s in segments {
            chain.add(Entity::Segment(s));
        }
        chain
    }

    /// Appends a line-like entity.
    ///
    /// Debug-asserts the entity has endpoints; the restriction is by
    /// convention, not storage.
    #[inline]
    pub fn add(&mut self, entity: Entity<F>) {
        debug_assert!(entity.endpoints().is_some(), "LineSet holds line entities");
        self.set.add(entity);
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if the chain has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Borrows the member at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> &Entity<F> {
        self.set.get(index)
    }

    /// Iterates over the members in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity<F>> {
        self.set.iter()
    }

    /// Borrows the underlying entity set.
    #[inline]
    pub fn entities(&self) -> &EntitySet<F> {
        &self.set
    }

    /// Unwraps into the underlying entity set.
    #[inline]
    pub fn into_entities(self) -> EntitySet<F> {
        self.set
    }

    /// Returns the start point of the first member.
    pub fn first_start(&self) -> Option<Point2<F>> {
        self.set.iter().next().and_then(|e| e.endpoints()).map(|(s, _)| s)
    }

    /// Returns the end point of the last member.
    pub fn last_end(&self) -> Option<Point2<F>> {
        if self.set.is_empty() {
            return None;
        }
        self.set
            .get(self.set.len() - 1)
            .endpoints()
            .map(|(_, e)| e)
    }

    /// Tests whether the chain is closed.
    ///
    /// - `ends_only = true`: the first member's start meets the last
    ///   member's end.
    /// - `ends_only = false`: every member's end meets the next member's
    ///   start, cyclically.
    ///
    /// An empty chain is closed in neither sense.
    pub fn is_closed(&self, ends_only: bool, eps: F) -> bool {
        let n = self.set.len();
        if n == 0 {
            return false;
        }

        if ends_only {
            return match (self.first_start(), self.last_end()) {
                (Some(s), Some(e)) => s.approx_eq(e, eps),
                _ => false,
            };
        }

        for i in 0..n {
            let (_, end) = self.set.get(i).endpoints().expect("line entity");
            let (next_start, _) = self.set.get((i + 1) % n).endpoints().expect("line entity");
            if !end.approx_eq(next_start, eps) {
                return false;
            }
        }
        true
    }

    /// Reverses the chain: member order flips and each member's own
    /// direction flips with it.
    pub fn reverse_direction(&mut self) {
        self.set.reverse();
        for e in self.set.iter_mut() {
            e.reverse_line();
        }
    }

    /// Attempts to attach `other` to this chain at a shared endpoint.
    ///
    /// The four endpoint pairings (start/start, start/end, end/start,
    /// end/end) are tried, reorienting chains as needed; on success
    /// `other` is drained into `self` and `true` is returned. On `false`
    /// neither chain is touched.
    ///
    /// # Panics
    ///
    /// Panics if either chain is already closed (ends-only sense); a
    /// closed chain cannot be extended.
    pub fn try_join(&mut self, other: &mut LineSet<F>, eps: F) -> bool {
        assert!(
            !self.is_closed(true, eps) && !other.is_closed(true, eps),
            "cannot join closed chains"
        );

        let (ss, se) = match (self.first_start(), self.last_end()) {
            (Some(s), Some(e)) => (s, e),
            _ => return false,
        };
        let (os, oe) = match (other.first_start(), other.last_end()) {
            (Some(s), Some(e)) => (s, e),
            _ => return false,
        };

        if se.approx_eq(os, eps) {
            // self end -> other start: append as-is
            other.set.drain_into(&mut self.set);
        } else if se.approx_eq(oe, eps) {
            // self end -> other end: flip other, then append
            other.reverse_direction();
            other.set.drain_into(&mut self.set);
        } else if ss.approx_eq(oe, eps) {
            // other end -> self start: prepend as-is
            self.prepend(other);
        } else if ss.approx_eq(os, eps) {
            // other start -> self start: flip other, then prepend
            other.reverse_direction();
            self.prepend(other);
        } else {
            return false;
        }
        true
    }

    /// Moves `other`'s members in front of this chain's members.
    fn prepend(&mut self, other: &mut LineSet<F>) {
        let mut tmp = EntitySet::new();
        other.set.drain_into(&mut tmp);
        self.set.drain_into(&mut tmp);
        tmp.drain_into(&mut self.set);
    }

    /// Subdivides the member at `index` at the given on-entity points.
    ///
    /// Points farther than `eps` from the member, or coinciding with its
    /// endpoints, are ignored. The member is replaced in place by its
    /// pieces, in chain order.
    ///
    /// # Panics
    ///
    /// Panics if the member is not line-like.
    pub fn split_member(&mut self, index: usize, points: &[Point2<F>], eps: F) {
        let entity = self.set.extract_at(index);

        let mut params: Vec<F> = Vec::new();
        match &entity {
            Entity::Segment(s) => {
                let len = s.length();
                let t_eps = if len > F::zero() { eps / len } else { F::zero() };
                for &p in points {
                    let (closest, t) = s.closest_point(p);
                    if closest.approx_eq(p, eps) && t > t_eps && t < F::one() - t_eps {
                        params.push(t);
                    }
                }
            }
            Entity::Arc(a) => {
                let len = a.arc_length();
                let t_eps = if len > F::zero() { eps / len } else { F::zero() };
                for &p in points {
                    if let Some(t) = a.param_at_point(p, eps) {
                        if t > t_eps && t < F::one() - t_eps {
                            params.push(t);
                        }
                    }
                }
            }
            other => panic!("split_member on non-line entity {:?}", other.kind()),
        }

        if params.is_empty() {
            self.set.insert_at(index, entity);
            return;
        }

        params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        params.push(F::one());

        let mut pieces: Vec<Entity<F>> = Vec::with_capacity(params.len());
        let mut last = F::zero();
        for &t in &params {
            if t - last <= F::epsilon() {
                continue;
            }
            let piece = match &entity {
                Entity::Segment(s) => Entity::Segment(Segment2::new(s.point_at(last), s.point_at(t))),
                Entity::Arc(a) => Entity::Arc(a.sub_arc(last, t)),
                _ => unreachable!(),
            };
            pieces.push(piece);
            last = t;
        }

        for (k, piece) in pieces.into_iter().enumerate() {
            self.set.insert_at(index + k, piece);
        }
    }

    /// Finds every crossing between members of this set.
    ///
    /// Members are swept left to right by bounding-rectangle `min.x`; a
    /// candidate pair is handed to the exact crossing test only when the
    /// rectangles overlap. Results carry the two member indices with
    /// `first < second`.
    pub fn intersections_within(&self, eps: F) -> Vec<Crossing<F>> {
        let members: Vec<(&Entity<F>, u8, usize)> = self
            .set
            .iter()
            .enumerate()
            .map(|(i, e)| (e, 0, i))
            .collect();
        sweep(members, false, eps, false)
    }

    /// Returns `true` as soon as any two members cross.
    pub fn has_crossing(&self, eps: F) -> bool {
        let members: Vec<(&Entity<F>, u8, usize)> = self
            .set
            .iter()
            .enumerate()
            .map(|(i, e)| (e, 0, i))
            .collect();
        !sweep(members, false, eps, true).is_empty()
    }

    /// Finds every crossing between a member of `self` and a member of
    /// `other`.
    ///
    /// One sweep runs over the union of both sets; same-set pairs are
    /// skipped. The optional clip rectangles discard members that cannot
    /// be relevant before the sort. `first` indexes into `self`, `second`
    /// into `other`.
    pub fn intersections_between(
        &self,
        other: &LineSet<F>,
        clip_self: Option<Aabb2<F>>,
        clip_other: Option<Aabb2<F>>,
        eps: F,
    ) -> Vec<Crossing<F>> {
        let mut members: Vec<(&Entity<F>, u8, usize)> = Vec::new();

        for (i, e) in self.set.iter().enumerate() {
            let rect = e.bounds().expect("line entities always have bounds");
            if clip_self.map_or(true, |clip| clip.intersects(rect)) {
                members.push((e, 0, i));
            }
        }
        for (i, e) in other.set.iter().enumerate() {
            let rect = e.bounds().expect("line entities always have bounds");
            if clip_other.map_or(true, |clip| clip.intersects(rect)) {
                members.push((e, 1, i));
            }
        }

        sweep(members, true, eps, false)
    }
}

impl<F: Float> Default for LineSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Geometric<F> for LineSet<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        self.set.translate(offset);
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        self.set.rotate(origin, angle);
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        self.set.scale(origin, factor);
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        self.set.reflect_point(origin);
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        self.set.reflect_axis(a, b);
    }

    fn snap_to_grid(&mut self, step: F) {
        self.set.snap_to_grid(step);
    }

    fn distance_to_point(&self, p: Point2<F>) -> F {
        self.set.distance_to_point(p)
    }

    fn project(&self, p: Point2<F>) -> Option<Point2<F>> {
        self.set.project(p)
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        self.set.bounds()
    }
}

/// The shared sweep over pre-tagged members.
///
/// Entries are sorted by bounding-rectangle `min.x`. For an anchor `j`,
/// only entries whose rectangle starts before `j`'s right edge can
/// overlap it; by the sortedness of `min.x`, the forward scan stops at the
/// first entry past that window. Full rectangle overlap (the other axis
/// included) is checked before the exact crossing test runs.
fn sweep<F: Float>(
    members: Vec<(&Entity<F>, u8, usize)>,
    cross_origin_only: bool,
    eps: F,
    stop_at_first: bool,
) -> Vec<Crossing<F>> {
    let mut entries: Vec<(Aabb2<F>, &Entity<F>, u8, usize)> = members
        .into_iter()
        .map(|(e, origin, index)| {
            (
                e.bounds().expect("line entities always have bounds"),
                e,
                origin,
                index,
            )
        })
        .collect();

    entries.sort_by(|a, b| {
        a.0.min
            .x
            .partial_cmp(&b.0.min.x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = Vec::new();
    for j in 0..entries.len() {
        let (rect_j, ent_j, origin_j, idx_j) = entries[j];
        for entry in entries.iter().skip(j + 1) {
            let (rect_r, ent_r, origin_r, idx_r) = *entry;
            if rect_r.min.x > rect_j.max.x {
                break; // Everything further starts past j's right edge
            }
            if cross_origin_only && origin_j == origin_r {
                continue;
            }
            if !rect_j.intersects(rect_r) {
                continue;
            }

            for point in ent_j.crossings(ent_r, eps) {
                let (first, second) = if cross_origin_only {
                    if origin_j == 0 {
                        (idx_j, idx_r)
                    } else {
                        (idx_r, idx_j)
                    }
                } else if idx_j < idx_r {
                    (idx_j, idx_r)
                } else {
                    (idx_r, idx_j)
                };
                out.push(Crossing {
                    point,
                    first,
                    second,
                });
                if stop_at_first {
                    return out;
                }
            }
        }
    }
    out
}
