//! Ordered, exclusively-owning entity container.

use crate::bounds::Aabb2;
use crate::entity::{Entity, Geometric};
use crate::primitives::{Point2, Vec2};
use num_traits::Float;

/// An ordered sequence of exclusively-owned entities.
///
/// Insertion order is part of the contract: it is iterated, reversed, and
/// used as a stack by the algorithms built on top. Ownership moves in and
/// out as `Entity` values, so transfer of responsibility is checked by the
/// compiler rather than by convention.
///
/// Any index at or past `len()` is a caller bug and panics; recoverable
/// "not found" outcomes are expressed as `Option` returns instead.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySet<F> {
    items: Vec<Entity<F>>,
}

impl<F: Float> EntitySet<F> {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the number of owned entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set owns nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends an entity; the set becomes its sole owner.
    #[inline]
    pub fn add(&mut self, entity: Entity<F>) {
        self.items.push(entity);
    }

    /// Borrows the entity at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> &Entity<F> {
        &self.items[index]
    }

    /// Mutably borrows the entity at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut Entity<F> {
        &mut self.items[index]
    }

    /// Destroys the entity at `index`, shifting later entries down.
    #[inline]
    pub fn delete_at(&mut self, index: usize) {
        self.items.remove(index);
    }

    /// Destroys the last entity.
    ///
    /// # Panics
    ///
    /// Panics on an empty set.
    #[inline]
    pub fn delete_last(&mut self) {
        self.items.pop().expect("delete_last on empty set");
    }

    /// Removes the entity at `index` and hands ownership to the caller.
    #[inline]
    pub fn extract_at(&mut self, index: usize) -> Entity<F> {
        self.items.remove(index)
    }

    /// Removes and returns the last entity, or `None` when empty.
    ///
    /// This is the pop primitive of every drain loop.
    #[inline]
    pub fn extract_last(&mut self) -> Option<Entity<F>> {
        self.items.pop()
    }

    /// Destroys the occupant of `index` and installs `entity` in its place.
    #[inline]
    pub fn replace_at(&mut self, index: usize, entity: Entity<F>) {
        self.items[index] = entity;
    }

    /// Installs `entity` at `index` and returns the previous occupant.
    #[inline]
    pub fn swap_at(&mut self, index: usize, entity: Entity<F>) -> Entity<F> {
        std::mem::replace(&mut self.items[index], entity)
    }

    /// Inserts an entity at `index`, shifting `[index..]` up by one.
    ///
    /// `index == len()` appends.
    #[inline]
    pub fn insert_at(&mut self, index: usize, entity: Entity<F>) {
        self.items.insert(index, entity);
    }

    /// Moves every owned entity into `other`, preserving relative order.
    ///
    /// `self` is left empty. This is the bulk ownership-transfer primitive
    /// used to reshuffle working sets without copying.
    #[inline]
    pub fn drain_into(&mut self, other: &mut EntitySet<F>) {
        other.items.append(&mut self.items);
    }

    /// Reverses the stored order in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    /// Drops every owned entity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates over the owned entities in order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity<F>> {
        self.items.iter()
    }

    /// Mutably iterates over the owned entities in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity<F>> {
        self.items.iter_mut()
    }

    /// Stable-sorts members by their distance to `point`.
    ///
    /// Each member's distance is computed once. Ties keep their existing
    /// order; a descending sort reverses the ascending result.
    pub fn sort_by_distance(&mut self, point: Point2<F>, ascending: bool) {
        let mut keyed: Vec<(F, Entity<F>)> = self
            .items
            .drain(..)
            .map(|e| (e.distance_to_point(point), e))
            .collect();

        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        if !ascending {
            keyed.reverse();
        }

        self.items.extend(keyed.into_iter().map(|(_, e)| e));
    }
}

impl<F: Float> Default for EntitySet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Geometric<F> for EntitySet<F> {
    fn translate(&mut self, offset: Vec2<F>) {
        for e in &mut self.items {
            e.translate(offset);
        }
    }

    fn rotate(&mut self, origin: Point2<F>, angle: F) {
        for e in &mut self.items {
            e.rotate(origin, angle);
        }
    }

    fn scale(&mut self, origin: Point2<F>, factor: F) {
        for e in &mut self.items {
            e.scale(origin, factor);
        }
    }

    fn reflect_point(&mut self, origin: Point2<F>) {
        for e in &mut self.items {
            e.reflect_point(origin);
        }
    }

    fn reflect_axis(&mut self, a: Point2<F>, b: Point2<F>) {
        for e in &mut self.items {
            e.reflect_axis(a, b);
        }
    }

    fn snap_to_grid(&mut self, step: F) {
        for e in &mut self.items {
            e.snap_to_grid(step);
        }
    }

    /// Minimum distance over members; an exact zero short-circuits, since
    /// no member can beat it. Empty sets report infinity.
    fn distance_to_point(&self, p: Point2<F>) -> F {
        let mut best = F::infinity();
        for e in &self.items {
            let d = e.distance_to_point(p);
            if d <= F::zero() {
                return F::zero();
            }
            if d < best {
                best = d;
            }
        }
        best
    }

    fn project(&self, p: Point2<F>) -> Option<Point2<F>> {
        let mut best: Option<(F, Point2<F>)> = None;
        for e in &self.items {
            if let Some(c) = e.project(p) {
                let d = p.distance_squared(c);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, c));
                }
            }
        }
        best.map(|(_, c)| c)
    }

    fn bounds(&self) -> Option<Aabb2<F>> {
        let mut acc: Option<Aabb2<F>> = None;
        for e in &self.items {
            if let Some(b) = e.bounds() {
                acc = Some(match acc {
                    Some(a) => a.union(b),
                    None => b,
                });
            }
        }
        acc
    }
}
