//! Chain assembly over sets of line chains.

use super::{EntitySet, LineSet};
use crate::bounds::Aabb2;
use crate::entity::{Entity, Geometric};
use crate::primitives::{Point2, Vec2};
use num_traits::Float;
use tracing::debug;

/// A set of line chains (strands), open or closed.
///
/// The joining operations assemble connected components over endpoint
/// equality by repeated local matching: well-formed input has at most two
/// chain-ends meeting at any point, so local matching finds every join a
/// global search would.
#[derive(Debug, Clone, PartialEq)]
pub struct StrandSet<F> {
    set: EntitySet<F>,
}

impl<F: Float> StrandSet<F> {
    /// Creates an empty strand set.
    #[inline]
    pub fn new() -> Self {
        Self {
            set: EntitySet::new(),
        }
    }

    /// Adds a chain.
    #[inline]
    pub fn add_chain(&mut self, chain: LineSet<F>) {
        self.set.add(Entity::Lines(chain));
    }

    /// Returns the number of chains.
    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if the set holds no chains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Borrows the chain at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the member is not a chain; strand sets hold chains by
    /// convention.
    pub fn chain(&self, index: usize) -> &LineSet<F> {
        self.set
            .get(index)
            .as_lines()
            .expect("StrandSet holds line chains")
    }

    /// Iterates over the chains.
    pub fn iter_chains(&self) -> impl Iterator<Item = &LineSet<F>> {
        self.set
            .iter()
            .map(|e| e.as_lines().expect("StrandSet holds line chains"))
    }

    /// Unwraps into the owned chains.
    pub fn into_chains(mut self) -> Vec<LineSet<F>> {
        let mut chains = Vec::with_capacity(self.set.len());
        // Preserve original order: extract_last pops from the back
        while let Some(e) = self.set.extract_last() {
            chains.push(e.into_lines().expect("StrandSet holds line chains"));
        }
        chains.reverse();
        chains
    }

    /// Joins open chains that share endpoints into longer chains or
    /// closed loops.
    ///
    /// Repeatedly pops a chain; while it is open, the remaining chains are
    /// scanned for one that joins, the match is absorbed (consuming it),
    /// and the scan restarts because the popped chain's endpoints changed.
    /// Chains that match nothing move to a result set; the strand set is
    /// reconstituted from the result set once the pop loop drains.
    pub fn merge_joining(&mut self, eps: F) {
        let before = self.set.len();
        let mut result = EntitySet::new();

        while let Some(popped) = self.set.extract_last() {
            let mut chain = popped.into_lines().expect("StrandSet holds line chains");

            while !chain.is_closed(true, eps) {
                let mut joined = None;
                for i in 0..self.set.len() {
                    let candidate = self
                        .set
                        .get_mut(i)
                        .as_lines_mut()
                        .expect("StrandSet holds line chains");
                    if candidate.is_closed(true, eps) {
                        continue;
                    }
                    if chain.try_join(candidate, eps) {
                        joined = Some(i);
                        break;
                    }
                }
                match joined {
                    Some(i) => self.set.delete_at(i), // Emptied by the join
                    None => break,
                }
            }

            result.add(Entity::Lines(chain));
        }

        result.drain_into(&mut self.set);
        debug!(before, after = self.set.len(), "merged joining chains");
    }

    /// Pulls chains out of `other` that join a chain in `self`, repeating
    /// until nothing more matches. Non-matching chains stay in `other`.
    pub fn add_joining(&mut self, other: &mut StrandSet<F>, eps: F) {
        loop {
            let mut moved = false;

            'scan: for o in 0..other.set.len() {
                if other.chain(o).is_closed(true, eps) {
                    continue;
                }
                for s in 0..self.set.len() {
                    if self.chain(s).is_closed(true, eps) {
                        continue;
                    }
                    let target = self
                        .set
                        .get_mut(s)
                        .as_lines_mut()
                        .expect("StrandSet holds line chains");
                    let candidate = other
                        .set
                        .get_mut(o)
                        .as_lines_mut()
                        .expect("StrandSet holds line chains");
                    if target.try_join(candidate, eps) {
                        other.set.delete_at(o); // Emptied by the join
                        moved = true;
                        break 'scan;
                    }
                }
            }

            if !moved {
                break;
            }
        }
    }

    /// Moves closed chains from `other` into `self`; open chains stay.
    ///
    /// `ends_only` selects the closure sense (see [`LineSet::is_closed`]).
    pub fn add_closed(&mut self, other: &mut StrandSet<F>, ends_only: bool, eps: F) {
        let mut o = 0;
        while o < other.set.len() {
            if other.chain(o).is_closed(ends_only, eps) {
                let chain = other.set.extract_at(o);
                self.set.add(chain);
            } else {
                o += 1;
            }
        }
    }
}

impl<F: Float> Default for StrandSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Geometric<F> for StrandSet<F> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Segment2;

    const EPS: f64 = 1e-9;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2<f64> {
        Segment2::from_coords(x1, y1, x2, y2)
    }

    fn single(s: Segment2<f64>) -> LineSet<f64> {
        LineSet::from_segments(vec![s])
    }

    /// The four edges of the unit square with corners at (0,0) and (1,1).
    fn square_edges() -> Vec<Segment2<f64>> {
        vec![
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 1.0, 1.0),
            seg(1.0, 1.0, 0.0, 1.0),
            seg(0.0, 1.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_merge_joining_reconstructs_square() {
        let mut strands = StrandSet::new();
        for e in square_edges() {
            strands.add_chain(single(e));
        }
        strands.merge_joining(EPS);
        assert_eq!(strands.len(), 1);
        assert!(strands.chain(0).is_closed(false, EPS));
        assert_eq!(strands.chain(0).len(), 4);
    }

    #[test]
    fn test_merge_joining_order_independent() {
        // Permuted and arbitrarily reversed edges still close the loop
        let orders: [[usize; 4]; 3] = [[2, 0, 3, 1], [3, 2, 1, 0], [1, 3, 0, 2]];
        for (k, order) in orders.iter().enumerate() {
            let edges = square_edges();
            let mut strands = StrandSet::new();
            for (n, &i) in order.iter().enumerate() {
                let e = if (n + k) % 2 == 0 {
                    edges[i].reversed()
                } else {
                    edges[i]
                };
                strands.add_chain(single(e));
            }
            strands.merge_joining(EPS);
            assert_eq!(strands.len(), 1, "order {order:?}");
            assert!(strands.chain(0).is_closed(false, EPS), "order {order:?}");
        }
    }

    #[test]
    fn test_merge_joining_two_components() {
        let mut strands = StrandSet::new();
        for e in square_edges() {
            strands.add_chain(single(e));
        }
        // A second square far away
        for e in square_edges() {
            strands.add_chain(single(e.translated(Vec2::new(10.0, 0.0))));
        }
        strands.merge_joining(EPS);
        assert_eq!(strands.len(), 2);
        for chain in strands.iter_chains() {
            assert!(chain.is_closed(false, EPS));
        }
    }

    #[test]
    fn test_merge_joining_leaves_open_polyline_open() {
        let mut strands = StrandSet::new();
        strands.add_chain(single(seg(0.0, 0.0, 1.0, 0.0)));
        strands.add_chain(single(seg(1.0, 0.0, 2.0, 0.0)));
        strands.add_chain(single(seg(5.0, 5.0, 6.0, 5.0)));
        strands.merge_joining(EPS);
        assert_eq!(strands.len(), 2);
        let lengths: Vec<usize> = strands.iter_chains().map(LineSet::len).collect();
        assert!(lengths.contains(&2));
        assert!(lengths.contains(&1));
    }

    #[test]
    fn test_add_joining_pulls_matches_only() {
        let mut target = StrandSet::new();
        target.add_chain(single(seg(0.0, 0.0, 1.0, 0.0)));

        let mut pool = StrandSet::new();
        pool.add_chain(single(seg(1.0, 0.0, 2.0, 0.0))); // Joins
        pool.add_chain(single(seg(2.0, 0.0, 3.0, 0.0))); // Joins transitively
        pool.add_chain(single(seg(9.0, 9.0, 8.0, 9.0))); // Stays

        target.add_joining(&mut pool, EPS);
        assert_eq!(target.len(), 1);
        assert_eq!(target.chain(0).len(), 3);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_add_closed_moves_closed_chains() {
        let mut closed_chains = StrandSet::new();
        let mut pool = StrandSet::new();
        pool.add_chain(LineSet::from_segments(square_edges()));
        pool.add_chain(single(seg(0.0, 0.0, 1.0, 0.0)));

        closed_chains.add_closed(&mut pool, false, EPS);
        assert_eq!(closed_chains.len(), 1);
        assert_eq!(pool.len(), 1);
        assert!(closed_chains.chain(0).is_closed(false, EPS));
    }

    #[test]
    fn test_into_chains_preserves_order() {
        let mut strands = StrandSet::new();
        strands.add_chain(single(seg(0.0, 0.0, 1.0, 0.0)));
        strands.add_chain(single(seg(5.0, 0.0, 6.0, 0.0)));
        let chains = strands.into_chains();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].first_start().unwrap().x, 0.0);
        assert_eq!(chains[1].first_start().unwrap().x, 5.0);
    }
}
