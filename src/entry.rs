//! Graded pieces of a complex: finite formal sums of bundles `U^w`.
//!
//! A [`ComplexEntry`] is the class `Σ m_w · U^w` of a direct sum of
//! irreducible bundles sitting in one cohomological degree. Tensor products
//! are computed summand by summand through an injected [`WeightProduct`]
//! oracle and extended bilinearly.
//!
//! # Invariants
//! - No stored multiplicity is zero.
//! - Entries are values: every operation returns a new entry.

use crate::config::IsotropicGrassmannian;
use crate::product::WeightProduct;
use crate::vanishing::vanishing_odd_grass;
use crate::weight::{Weight, WeightError};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// Signed multiplicity of a summand.
pub type Multiplicity = i64;

/// A formal sum `Σ m_w · U^w` with integer multiplicities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplexEntry {
    summands: BTreeMap<Weight, Multiplicity>,
}

/// Adds `mult` to the coefficient of `weight`, dropping it if the result is zero.
pub(crate) fn accumulate(
    summands: &mut BTreeMap<Weight, Multiplicity>,
    weight: Weight,
    mult: Multiplicity,
) {
    if mult == 0 {
        return;
    }
    match summands.entry(weight) {
        Entry::Occupied(mut occupied) => {
            *occupied.get_mut() += mult;
            if *occupied.get() == 0 {
                occupied.remove();
            }
        }
        Entry::Vacant(vacant) => {
            vacant.insert(mult);
        }
    }
}

impl ComplexEntry {
    /// The empty entry (the zero object).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry `mult · U^weight`.
    pub fn singleton(weight: Weight, mult: Multiplicity) -> Self {
        std::iter::once((weight, mult)).collect()
    }

    /// Returns `true` if there are no summands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.summands.is_empty()
    }

    /// Number of distinct weights.
    #[inline]
    pub fn len(&self) -> usize {
        self.summands.len()
    }

    /// Multiplicity of `weight`; absent weights have multiplicity zero.
    pub fn multiplicity(&self, weight: &Weight) -> Multiplicity {
        self.summands.get(weight).copied().unwrap_or(0)
    }

    /// Summands in ascending weight order.
    pub fn iter(&self) -> impl Iterator<Item = (&Weight, Multiplicity)> {
        self.summands.iter().map(|(w, &m)| (w, m))
    }

    /// Weights with nonzero multiplicity, ascending.
    pub fn weights(&self) -> impl Iterator<Item = &Weight> {
        self.summands.keys()
    }

    /// Multiplicity-wise sum; cancelling terms disappear.
    pub fn add(&self, other: &ComplexEntry) -> ComplexEntry {
        let mut summands = self.summands.clone();
        for (weight, &mult) in &other.summands {
            accumulate(&mut summands, weight.clone(), mult);
        }
        Self { summands }
    }

    /// Multiplies every multiplicity by `factor`.
    pub fn scale(&self, factor: Multiplicity) -> ComplexEntry {
        self.iter().map(|(w, m)| (w.clone(), m * factor)).collect()
    }

    /// Tensor product, extended bilinearly from the oracle's product of weights.
    ///
    /// Each pair is multiplied at the rank of the left weight; the oracle
    /// rejects a right weight it cannot pad to that rank.
    pub fn tensor<P>(&self, other: &ComplexEntry, oracle: &P) -> Result<ComplexEntry, WeightError>
    where
        P: WeightProduct + ?Sized,
    {
        let mut summands = BTreeMap::new();
        for (w1, &m1) in &self.summands {
            for (w2, &m2) in &other.summands {
                let product = oracle.product(w1, w2, w1.rank())?;
                for (p, m) in product.iter() {
                    accumulate(&mut summands, p.clone(), m * m1 * m2);
                }
            }
        }
        Ok(Self { summands })
    }

    /// Dual entry: every weight `w` becomes `-reverse(w)`, multiplicities unchanged.
    pub fn dual(&self) -> ComplexEntry {
        self.iter().map(|(w, m)| (w.dual(), m)).collect()
    }

    /// Keeps the summands whose cohomology on `IGr(k, 2n+1)` does not vanish.
    pub fn non_vanish_terms<P>(
        &self,
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<ComplexEntry, WeightError>
    where
        P: WeightProduct + ?Sized,
    {
        let mut summands = BTreeMap::new();
        for (weight, &mult) in &self.summands {
            if !vanishing_odd_grass(weight, oracle, grass)?.vanishes() {
                summands.insert(weight.clone(), mult);
            }
        }
        Ok(Self { summands })
    }
}

impl FromIterator<(Weight, Multiplicity)> for ComplexEntry {
    /// Collects summands, merging repeated weights and dropping zeros.
    fn from_iter<I: IntoIterator<Item = (Weight, Multiplicity)>>(iter: I) -> Self {
        let mut summands = BTreeMap::new();
        for (weight, mult) in iter {
            accumulate(&mut summands, weight, mult);
        }
        Self { summands }
    }
}

impl<'a> std::ops::Add<&'a ComplexEntry> for &'a ComplexEntry {
    type Output = ComplexEntry;

    fn add(self, rhs: &'a ComplexEntry) -> ComplexEntry {
        ComplexEntry::add(self, rhs)
    }
}

impl fmt::Display for ComplexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        for (i, (weight, mult)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} * U^{}", mult, weight)?;
        }
        Ok(())
    }
}
