//! Polygon unification engine.
//!
//! Merges a collection of possibly-overlapping holed polygons into a
//! minimal set of disjoint polygons, built entirely on the pairwise
//! [`unite`] primitive. Two strategies: a quadratic pairwise reduction
//! and a threshold-scheduled progressive algorithm that keeps small
//! polygons merging among themselves before they are allowed to grow.

use super::EntitySet;
use crate::bounds::Aabb2;
use crate::entity::{Entity, Geometric};
use crate::polygon::{unite, Contour, HoledPolygon};
use crate::primitives::{Point2, Vec2};
use num_traits::Float;
use tracing::debug;

/// Numerical-robustness policy for degenerate configurations (shared
/// edges and vertices between input polygons).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegeneracyMode<F> {
    /// Jitter every coordinate by up to `amplitude` once up front, so no
    /// exact coincidence survives. Deterministic for a given seed.
    RandomPerturbation { seed: u64, amplitude: F },
    /// No pre-pass; the union primitive's tolerance machinery resolves
    /// coincidence per call.
    DynamicGrid,
    /// Snap every coordinate to a grid of the given step once up front.
    PreDefinedGrid { step: F },
    /// No-op; trusts the caller's prior snap.
    PreSnapped,
}

/// An [`EntitySet`] restricted by convention to holed polygons, with the
/// unification algorithms.
///
/// After a completed unification the members are pairwise
/// interior-disjoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSet<F> {
    set: EntitySet<F>,
}

impl<F: Float> PolygonSet<F> {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self {
            set: EntitySet::new(),
        }
    }

    /// Appends a polygon without attempting any union.
    #[inline]
    pub fn add(&mut self, polygon: HoledPolygon<F>) {
        self.set.add(Entity::Polygon(polygon));
    }

    /// Returns the number of polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if the set holds no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Borrows the polygon at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the member is not a polygon; polygon sets hold polygons
    /// by convention.
    pub fn polygon(&self, index: usize) -> &HoledPolygon<F> {
        self.set
            .get(index)
            .as_polygon()
            .expect("PolygonSet holds polygons")
    }

    /// Iterates over the polygons.
    pub fn iter_polygons(&self) -> impl Iterator<Item = &HoledPolygon<F>> {
        self.set
            .iter()
            .map(|e| e.as_polygon().expect("PolygonSet holds polygons"))
    }

    /// Unwraps into the owned polygons.
    pub fn into_polygons(mut self) -> Vec<HoledPolygon<F>> {
        let mut out = Vec::with_capacity(self.set.len());
        while let Some(e) = self.set.extract_last() {
            out.push(e.into_polygon().expect("PolygonSet holds polygons"));
        }
        out.reverse();
        out
    }

    /// Returns the total enclosed area over all members.
    pub fn total_area(&self) -> F {
        self.iter_polygons()
            .fold(F::zero(), |acc, p| acc + p.area())
    }

    /// Applies a degeneracy pre-pass and returns the mode subsequent
    /// calls should use (a grid snap downgrades to [`DegeneracyMode::PreSnapped`]
    /// so the work is not repeated).
    pub fn apply_degeneracy(&mut self, mode: DegeneracyMode<F>) -> DegeneracyMode<F> {
        match mode {
            DegeneracyMode::RandomPerturbation { seed, amplitude } => {
                let mut state = seed | 1;
                for e in self.set.iter_mut() {
                    let poly = e.as_polygon_mut().expect("PolygonSet holds polygons");
                    poly.map_points(|p| {
                        let jx = next_unit::<F>(&mut state) * amplitude;
                        let jy = next_unit::<F>(&mut state) * amplitude;
                        Point2::new(p.x + jx, p.y + jy)
                    });
                }
                DegeneracyMode::DynamicGrid
            }
            DegeneracyMode::PreDefinedGrid { step } => {
                for e in self.set.iter_mut() {
                    e.snap_to_grid(step);
                }
                DegeneracyMode::PreSnapped
            }
            DegeneracyMode::DynamicGrid => DegeneracyMode::DynamicGrid,
            DegeneracyMode::PreSnapped => DegeneracyMode::PreSnapped,
        }
    }

    /// Quadratic pairwise reduction.
    ///
    /// Pops the last polygon, scans the remaining members for a union
    /// partner, replaces the partner with the merged polygon on success
    /// (so the merge stays poppable), stashes the popped polygon in a
    /// side set otherwise. When the pops drain, the side set is the
    /// result and is moved back in.
    pub fn unify_basic(&mut self, eps: F) {
        let before = self.set.len();
        let mut rest = EntitySet::new();

        while let Some(e) = self.set.extract_last() {
            let popped = e.into_polygon().expect("PolygonSet holds polygons");

            let mut merged = None;
            for i in 0..self.set.len() {
                let member = self.set.get(i).as_polygon().expect("PolygonSet holds polygons");
                if let Some(m) = union_one(member, &popped, eps) {
                    merged = Some((i, m));
                    break;
                }
            }

            match merged {
                Some((i, m)) => self.set.replace_at(i, Entity::Polygon(m)),
                None => rest.add(Entity::Polygon(popped)),
            }
        }

        rest.drain_into(&mut self.set);
        debug!(before, after = self.set.len(), "basic unification");
    }

    /// Tries to absorb `candidate` into the set.
    ///
    /// Every member is popped and tested against the candidate; on a
    /// union the candidate becomes the merged polygon and the scan
    /// restarts against all members (a merge can change overlap
    /// relationships with polygons already scanned). Members that fail to
    /// union are stashed and restored afterward.
    ///
    /// Returns `Ok(())` when the candidate was absorbed (the merged
    /// polygon is now a member); `Err` hands the untouched candidate
    /// back.
    pub fn add_if_unify(&mut self, candidate: HoledPolygon<F>, eps: F) -> Result<(), HoledPolygon<F>> {
        let mut stash = EntitySet::new();
        let mut cand = candidate;
        let mut absorbed = false;

        loop {
            let mut merged = None;
            while let Some(e) = self.set.extract_last() {
                let member = e.into_polygon().expect("PolygonSet holds polygons");
                match union_one(&member, &cand, eps) {
                    Some(m) => {
                        merged = Some(m);
                        break;
                    }
                    None => stash.add(Entity::Polygon(member)),
                }
            }

            match merged {
                Some(m) => {
                    cand = m;
                    absorbed = true;
                    // Restart: restore the stash so every member faces the
                    // larger candidate again
                    stash.drain_into(&mut self.set);
                }
                None => break,
            }
        }

        stash.drain_into(&mut self.set);
        if absorbed {
            self.set.add(Entity::Polygon(cand));
            Ok(())
        } else {
            Err(cand)
        }
    }

    /// Absorbs `candidate` if possible, appends it unchanged otherwise.
    pub fn add_and_unify(&mut self, candidate: HoledPolygon<F>, eps: F) {
        if let Err(cand) = self.add_if_unify(candidate, eps) {
            self.add(cand);
        }
    }

    /// Drains `other`, absorbing or appending each polygon in turn.
    pub fn add_and_unify_set(&mut self, other: &mut PolygonSet<F>, eps: F) {
        let mut pending = EntitySet::new();
        other.set.drain_into(&mut pending);
        // Keep other's original order: pending pops from the back
        pending.reverse();
        while let Some(e) = pending.extract_last() {
            let poly = e.into_polygon().expect("PolygonSet holds polygons");
            self.add_and_unify(poly, eps);
        }
    }

    /// Threshold-scheduled unification.
    ///
    /// Unioning many small polygons into one already-large accumulation
    /// is far more expensive than first merging small polygons among
    /// themselves, so merged polygons whose edge count outgrows the
    /// current threshold are held aside and re-admitted only once the
    /// threshold (tripled each round) catches up with them.
    pub fn unify_progressive(&mut self, mode: DegeneracyMode<F>, eps: F) {
        let before = self.set.len();
        let _ = self.apply_degeneracy(mode);

        let mut threshold = self
            .iter_polygons()
            .map(HoledPolygon::edge_count)
            .min()
            .unwrap_or(0);
        if threshold == 0 {
            threshold = 10; // Guarantees forward progress on empty minima
        }

        let mut size_held = EntitySet::new();
        let mut possible = EntitySet::new();
        let mut no_union = EntitySet::new();
        let mut round = 0usize;

        loop {
            round += 1;
            threshold *= 3;

            // Re-admit deferred candidates and any size-held polygon the
            // grown threshold now covers
            possible.drain_into(&mut self.set);
            let mut i = 0;
            while i < size_held.len() {
                let count = size_held
                    .get(i)
                    .as_polygon()
                    .expect("PolygonSet holds polygons")
                    .edge_count();
                if count <= threshold {
                    let e = size_held.extract_at(i);
                    self.set.add(e);
                } else {
                    i += 1;
                }
            }

            while let Some(e) = self.set.extract_last() {
                let mut cand = e.into_polygon().expect("PolygonSet holds polygons");

                let mut promoted = false;
                loop {
                    let mut found = None;
                    for i in 0..self.set.len() {
                        let member = self
                            .set
                            .get(i)
                            .as_polygon()
                            .expect("PolygonSet holds polygons");
                        if let Some(m) = union_one(member, &cand, eps) {
                            found = Some((i, m));
                            break;
                        }
                    }

                    match found {
                        Some((i, m)) => {
                            self.set.delete_at(i);
                            if m.edge_count() > threshold {
                                // Too complex to keep re-testing this round
                                size_held.add(Entity::Polygon(m));
                                promoted = true;
                                break;
                            }
                            cand = m;
                        }
                        None => break,
                    }
                }

                if !promoted {
                    if overlaps_any_rect(&cand, &size_held) {
                        possible.add(Entity::Polygon(cand));
                    } else {
                        no_union.add(Entity::Polygon(cand));
                    }
                }
            }

            debug!(
                round,
                threshold,
                held = size_held.len(),
                deferred = possible.len(),
                settled = no_union.len(),
                "progressive unification round"
            );

            if size_held.is_empty() {
                break;
            }
        }

        debug_assert!(possible.is_empty());
        possible.drain_into(&mut self.set);
        no_union.drain_into(&mut self.set);
        debug!(before, after = self.set.len(), "progressive unification");
    }

    /// Attaches candidate holes to the members whose outer boundary
    /// contains them.
    ///
    /// Members are scanned from the end of the set backward; the first
    /// whose outer ring contains the candidate's first point receives it.
    /// Degenerate candidates are discarded; a candidate no member
    /// contains defaults to the first member.
    ///
    /// # Panics
    ///
    /// Panics when a non-degenerate candidate is supplied and the set is
    /// empty (there is no member to default to).
    pub fn add_known_holes(&mut self, candidates: Vec<Contour<F>>) {
        for hole in candidates {
            if hole.is_degenerate() {
                continue;
            }
            let first_point = hole.points()[0];

            let mut target = 0;
            for i in (0..self.set.len()).rev() {
                let member = self
                    .set
                    .get(i)
                    .as_polygon()
                    .expect("PolygonSet holds polygons");
                if member.outer().contains(first_point) {
                    target = i;
                    break;
                }
            }

            self.set
                .get_mut(target)
                .as_polygon_mut()
                .expect("PolygonSet holds polygons")
                .add_hole(hole);
        }
    }
}

impl<F: Float> Default for PolygonSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Geometric<F> for PolygonSet<F> {
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

/// The engine's view of the union primitive: zero results or one.
///
/// # Panics
///
/// Panics if the primitive hands back more than one polygon; for
/// connected inputs that cannot legitimately happen, so it indicates a
/// collaborator bug.
fn union_one<F: Float>(
    a: &HoledPolygon<F>,
    b: &HoledPolygon<F>,
    eps: F,
) -> Option<HoledPolygon<F>> {
    let mut pieces = unite(a, b, eps);
    match pieces.len() {
        0 => None,
        1 => pieces.pop(),
        n => panic!("pairwise union produced {n} pieces for connected inputs"),
    }
}

/// Tests whether the polygon's bounding rectangle overlaps any member of
/// `held`.
fn overlaps_any_rect<F: Float>(poly: &HoledPolygon<F>, held: &EntitySet<F>) -> bool {
    let rect = match poly.bounds() {
        Some(r) => r,
        None => return false,
    };
    held.iter().any(|e| {
        e.bounds().map_or(false, |r| r.intersects(rect))
    })
}

/// Signed unit pseudo-random step (xorshift), in [-1, 1].
fn next_unit<F: Float>(state: &mut u64) -> F {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    let unit = *state as f64 / u64::MAX as f64;
    F::from(unit * 2.0 - 1.0).unwrap()
}
