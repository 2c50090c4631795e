//! Memoization of weight products.
//!
//! The vanishing tests multiply the same small weights by the same wedge
//! weights over and over; [`MemoProduct`] keeps every answer keyed by
//! `(alpha, beta, rank)` so each product is computed once per oracle.
//!
//! # Invariants
//! - A cached value is exactly what the inner oracle returned for its key.
//! - Errors are not cached.

use super::WeightProduct;
use crate::entry::ComplexEntry;
use crate::weight::{Weight, WeightError};
use std::cell::RefCell;
use std::collections::HashMap;

type ProductKey = (Weight, Weight, usize);

/// Hit/miss counters of a [`MemoProduct`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoStats {
    /// Products served from the cache.
    pub hits: u64,
    /// Products forwarded to the inner oracle.
    pub misses: u64,
}

/// Caching wrapper around any [`WeightProduct`] oracle.
///
/// Uses interior mutability, so it is shared by `&` reference and is not `Sync`.
#[derive(Debug, Default)]
pub struct MemoProduct<P> {
    inner: P,
    table: RefCell<HashMap<ProductKey, ComplexEntry>>,
    stats: RefCell<MemoStats>,
}

impl<P: WeightProduct> MemoProduct<P> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            table: RefCell::new(HashMap::new()),
            stats: RefCell::new(MemoStats::default()),
        }
    }

    /// The wrapped oracle.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached products.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> MemoStats {
        *self.stats.borrow()
    }

    /// Drops every cached product and resets the counters.
    pub fn clear(&self) {
        self.table.borrow_mut().clear();
        *self.stats.borrow_mut() = MemoStats::default();
    }
}

impl<P: WeightProduct> WeightProduct for MemoProduct<P> {
    fn product(
        &self,
        alpha: &Weight,
        beta: &Weight,
        rank: usize,
    ) -> Result<ComplexEntry, WeightError> {
        let key = (alpha.clone(), beta.clone(), rank);
        if let Some(hit) = self.table.borrow().get(&key) {
            self.stats.borrow_mut().hits += 1;
            return Ok(hit.clone());
        }
        let value = self.inner.product(alpha, beta, rank)?;
        self.stats.borrow_mut().misses += 1;
        self.table.borrow_mut().insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::LittlewoodRichardson;
    use std::cell::Cell;

    /// Returns `alpha` unchanged and counts its calls.
    #[derive(Default)]
    struct CountingOracle {
        calls: Cell<usize>,
    }

    impl WeightProduct for CountingOracle {
        fn product(
            &self,
            alpha: &Weight,
            _beta: &Weight,
            rank: usize,
        ) -> Result<ComplexEntry, WeightError> {
            self.calls.set(self.calls.get() + 1);
            Ok(ComplexEntry::singleton(alpha.pad_to(rank)?, 1))
        }
    }

    fn w(entries: &[i64]) -> Weight {
        Weight::new(entries.to_vec()).unwrap()
    }

    #[test]
    fn repeated_products_hit_the_cache() {
        let memo = MemoProduct::new(CountingOracle::default());
        let a = w(&[1, 0, 0]);
        let b = w(&[0, 0, -1]);
        let first = memo.product(&a, &b, 3).unwrap();
        let second = memo.product(&a, &b, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(memo.inner().calls.get(), 1);
        assert_eq!(memo.stats(), MemoStats { hits: 1, misses: 1 });

        // Rank is part of the key.
        memo.product(&a, &b, 4).unwrap();
        assert_eq!(memo.inner().calls.get(), 2);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let memo = MemoProduct::new(CountingOracle::default());
        let long = w(&[1, 0, 0, 0]);
        assert!(memo.product(&long, &long, 3).is_err());
        assert!(memo.product(&long, &long, 3).is_err());
        assert_eq!(memo.inner().calls.get(), 2);
        assert!(memo.is_empty());
    }

    #[test]
    fn agrees_with_the_wrapped_oracle() {
        let memo = MemoProduct::new(LittlewoodRichardson);
        let a = w(&[2, 1, 0]);
        let direct = LittlewoodRichardson.product(&a, &a, 3).unwrap();
        assert_eq!(memo.product(&a, &a, 3).unwrap(), direct);
        assert_eq!(memo.product(&a, &a, 3).unwrap(), direct);
        memo.clear();
        assert!(memo.is_empty());
        assert_eq!(memo.stats(), MemoStats::default());
    }
}
