//! Per-table uniqueness tracking.
//!
//! A [`UniquenessTracker`] remembers which key tuples a generator already
//! assigned in the current batch. [`CombinationPicker`] serves tables whose
//! key is drawn from the product of parent pools; parent keys are distinct,
//! so distinct positions give distinct key tuples. Parent pools themselves
//! are never modified.

use std::collections::HashSet;
use std::hash::Hash;

use rand::Rng;

use nesprisa_core::TableName;

use crate::errors::GenerationError;

/// Set of key tuples already assigned within one generator call.
#[derive(Debug, Clone)]
pub struct UniquenessTracker<K> {
    seen: HashSet<K>,
}

impl<K: Eq + Hash> Default for UniquenessTracker<K> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> UniquenessTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }

    /// Marks `key` as used; returns `false` when it was already taken.
    pub fn insert(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Calls `make` until it yields a key not seen before, up to `max_attempts`.
    ///
    /// Fails with [`GenerationError::Exhaustion`] when every attempt collides.
    pub fn claim_with<F>(
        &mut self,
        table: TableName,
        requested: usize,
        max_attempts: u32,
        mut make: F,
    ) -> Result<K, GenerationError>
    where
        F: FnMut() -> K,
    {
        for _ in 0..max_attempts.max(1) {
            let key = make();
            if self.insert(key.clone()) {
                return Ok(key);
            }
        }
        Err(GenerationError::Exhaustion {
            table,
            requested,
            available: self.len(),
        })
    }
}

/// Draws distinct positions from the Cartesian product of two parent pools.
///
/// A position `(row, column)` indexes the left and right pool. The product is
/// never built: positions are drawn as flat indices and rejected when already
/// taken. Only when a request covers more than half of what is left are the
/// free indices listed and shuffled.
#[derive(Debug, Clone)]
pub struct CombinationPicker {
    table: TableName,
    columns: usize,
    size: usize,
    taken: HashSet<usize>,
}

impl CombinationPicker {
    /// Picker over a single pool of `len` distinct keys.
    pub fn single(table: TableName, len: usize) -> Self {
        Self::product(table, len, 1)
    }

    /// Picker over `rows x columns` pairs.
    pub fn product(table: TableName, rows: usize, columns: usize) -> Self {
        Self {
            table,
            columns,
            size: rows.saturating_mul(columns),
            taken: HashSet::new(),
        }
    }

    /// Number of positions not yet drawn.
    pub fn available(&self) -> usize {
        self.size - self.taken.len()
    }

    /// Fails up front when fewer than `requested` positions remain.
    pub fn ensure_available(&self, requested: usize) -> Result<(), GenerationError> {
        if requested > self.available() {
            return Err(GenerationError::Exhaustion {
                table: self.table,
                requested,
                available: self.available(),
            });
        }
        Ok(())
    }

    /// Uniformly draws `count` distinct positions, failing before any draw if too few remain.
    pub fn draw_many<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<(usize, usize)>, GenerationError> {
        self.ensure_available(count)?;
        let indices = if count.saturating_mul(2) > self.available() {
            self.draw_dense(count, rng)
        } else {
            self.draw_sparse(count, rng)
        };
        Ok(indices
            .into_iter()
            .map(|index| (index / self.columns, index % self.columns))
            .collect())
    }

    fn draw_sparse<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<usize> {
        let mut drawn = Vec::with_capacity(count);
        while drawn.len() < count {
            let index = rng.random_range(0..self.size);
            if self.taken.insert(index) {
                drawn.push(index);
            }
        }
        drawn
    }

    fn draw_dense<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<usize> {
        let mut free: Vec<usize> = (0..self.size)
            .filter(|index| !self.taken.contains(index))
            .collect();
        for slot in 0..count {
            let pick = rng.random_range(slot..free.len());
            free.swap(slot, pick);
        }
        free.truncate(count);
        self.taken.extend(free.iter().copied());
        free
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn picker_never_repeats_and_then_exhausts() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut picker = CombinationPicker::product(TableName::Receta, 2, 2);
        assert_eq!(picker.available(), 4);

        let first = picker.draw_many(1, &mut rng).unwrap();
        let rest = picker.draw_many(3, &mut rng).unwrap();
        let drawn: HashSet<(usize, usize)> = first.into_iter().chain(rest).collect();
        assert_eq!(drawn.len(), 4);
        assert!(drawn.iter().all(|&(row, column)| row < 2 && column < 2));

        let err = picker.draw_many(1, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Exhaustion {
                requested: 1,
                available: 0,
                ..
            }
        ));
    }

    #[test]
    fn sparse_draws_from_a_large_product() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut picker = CombinationPicker::product(TableName::Receta, 50_000, 50_000);
        let drawn = picker.draw_many(10, &mut rng).unwrap();
        let distinct: HashSet<(usize, usize)> = drawn.iter().copied().collect();
        assert_eq!(distinct.len(), 10);
        assert!(
            drawn
                .iter()
                .all(|&(row, column)| row < 50_000 && column < 50_000)
        );
        assert_eq!(picker.available(), 50_000 * 50_000 - 10);
    }

    #[test]
    fn single_pool_exhaustion_is_checked_before_drawing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut picker = CombinationPicker::single(TableName::VariedadEspecial, 2);
        assert!(picker.draw_many(3, &mut rng).is_err());
        assert_eq!(picker.available(), 2);
        let drawn = picker.draw_many(2, &mut rng).unwrap();
        assert!(drawn.iter().all(|&(_, column)| column == 0));
    }

    #[test]
    fn claim_with_gives_up_after_attempt_budget() {
        let mut tracker = UniquenessTracker::new();
        assert_eq!(
            tracker
                .claim_with(TableName::Pais, 2, 5, || "same".to_string())
                .unwrap(),
            "same"
        );
        let err = tracker
            .claim_with(TableName::Pais, 2, 5, || "same".to_string())
            .unwrap_err();
        assert!(matches!(err, GenerationError::Exhaustion { available: 1, .. }));
    }
}
