//! Two resolutions of one object, as produced by a stupid truncation.
//!
//! Truncating an exact complex gives an object `T` with a right resolution
//! (the kept tail) and a left resolution (the rest). Derived tensor products
//! with `T` can be computed from either side, so a product of two truncated
//! complexes has four spectral-sequence presentations; the one with the
//! smallest surviving amplitude is the sharpest bound on the non-acyclic part.
//!
//! # Invariants
//! - `right` and `left` represent the same object. Nothing checks this; it
//!   holds whenever the truncated complex was exact.

use super::{Complex, ComplexError};
use crate::config::IsotropicGrassmannian;
use crate::entry::ComplexEntry;
use crate::product::WeightProduct;
use crate::weight::Weight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Which resolutions are paired in a cross tensor product.
///
/// The declaration order is the tie-break order of [`TruncatedComplex::shortest_tor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TorPairing {
    /// `self.left ⊗ other.left`
    LeftLeft,
    /// `self.left ⊗ other.right`
    LeftRight,
    /// `self.right ⊗ other.left`
    RightLeft,
    /// `self.right ⊗ other.right`
    RightRight,
}

impl TorPairing {
    /// All pairings in tie-break order.
    pub const ALL: [TorPairing; 4] = [
        TorPairing::LeftLeft,
        TorPairing::LeftRight,
        TorPairing::RightLeft,
        TorPairing::RightRight,
    ];
}

/// The non-acyclic part of one cross product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorCandidate {
    /// Resolutions that were multiplied.
    pub pairing: TorPairing,
    /// Surviving terms of the product.
    pub cohomology: Complex,
}

/// An object given by a right and a left resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruncatedComplex {
    right: Complex,
    left: Complex,
}

impl TruncatedComplex {
    /// Pairs a right and a left resolution.
    pub fn new(right: Complex, left: Complex) -> Self {
        Self { right, left }
    }

    /// The degenerate pair `(C, C)` for a single bundle `U^weight` in degree 0.
    pub fn of_weight(weight: Weight) -> Self {
        let c = Complex::concentrated(0, ComplexEntry::singleton(weight, 1));
        Self::new(c.clone(), c)
    }

    /// The right resolution, starting in degree 0.
    pub fn right(&self) -> &Complex {
        &self.right
    }

    /// The left resolution, in negative degrees.
    pub fn left(&self) -> &Complex {
        &self.left
    }

    /// Consumes the pair, returning `(right, left)`.
    pub fn into_parts(self) -> (Complex, Complex) {
        (self.right, self.left)
    }

    /// Dual object: both resolutions are dualized and swap sides.
    pub fn dual(&self) -> TruncatedComplex {
        Self::new(self.left.dual(), self.right.dual())
    }

    /// Side-wise cone.
    pub fn cone(&self, other: &TruncatedComplex) -> TruncatedComplex {
        Self::new(self.right.cone(&other.right), self.left.cone(&other.left))
    }

    fn side(&self, right: bool) -> &Complex {
        if right {
            &self.right
        } else {
            &self.left
        }
    }

    /// One cross product, filtered to its nonvanishing terms.
    pub fn tor_candidate<P>(
        &self,
        other: &TruncatedComplex,
        pairing: TorPairing,
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<TorCandidate, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        let (mine, theirs) = match pairing {
            TorPairing::LeftLeft => (false, false),
            TorPairing::LeftRight => (false, true),
            TorPairing::RightLeft => (true, false),
            TorPairing::RightRight => (true, true),
        };
        let product = self.side(mine).tensor(other.side(theirs), oracle)?;
        Ok(TorCandidate {
            pairing,
            cohomology: product.non_vanish_terms(oracle, grass)?,
        })
    }

    /// The four cross products in tie-break order.
    pub fn tor_candidates<P>(
        &self,
        other: &TruncatedComplex,
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<Vec<TorCandidate>, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        TorPairing::ALL
            .iter()
            .map(|&pairing| self.tor_candidate(other, pairing, oracle, grass))
            .collect()
    }

    /// The cross product whose nonvanishing part has the smallest amplitude.
    ///
    /// Ties go to the first pairing in [`TorPairing::ALL`] order.
    pub fn shortest_tor_candidate<P>(
        &self,
        other: &TruncatedComplex,
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<TorCandidate, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        let mut best = self.tor_candidate(other, TorPairing::LeftLeft, oracle, grass)?;
        for &pairing in &TorPairing::ALL[1..] {
            let candidate = self.tor_candidate(other, pairing, oracle, grass)?;
            if candidate.cohomology.amplitude() < best.cohomology.amplitude() {
                best = candidate;
            }
        }
        Ok(best)
    }

    /// Nonvanishing part of the shortest of the four derived tensor products.
    pub fn shortest_tor<P>(
        &self,
        other: &TruncatedComplex,
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<Complex, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        Ok(self.shortest_tor_candidate(other, oracle, grass)?.cohomology)
    }

    /// Weights `w` for which `U^w` is not certified independent from this object,
    /// mapped to the residual cohomology that blocked the certificate.
    ///
    /// A weight passes when `dual(U^w) ⊗ self` has shortest surviving
    /// amplitude 0. Passing is sufficient for independence; failing is not a
    /// proof of dependence.
    pub fn independence_defects<P>(
        &self,
        weights: &[Weight],
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<BTreeMap<Weight, Complex>, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        let mut defects = BTreeMap::new();
        for weight in weights {
            let weight = weight.pad_to(grass.k())?;
            let probe = Self::of_weight(weight.clone()).dual();
            let best = probe.shortest_tor_candidate(self, oracle, grass)?;
            if best.cohomology.amplitude() != 0 {
                debug!(
                    weight = %weight,
                    pairing = ?best.pairing,
                    amplitude = best.cohomology.amplitude(),
                    "weight not certified independent"
                );
                defects.insert(weight, best.cohomology);
            }
        }
        Ok(defects)
    }

    /// Returns `true` if every weight passes the independence certificate.
    pub fn is_indep<P>(
        &self,
        weights: &[Weight],
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<bool, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        Ok(self.independence_defects(weights, oracle, grass)?.is_empty())
    }
}

impl fmt::Display for TruncatedComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Right:\n{}\nLeft:\n{}", self.right, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{LittlewoodRichardson, MemoProduct};

    fn w(entries: &[i64]) -> Weight {
        Weight::new(entries.to_vec()).unwrap()
    }

    fn single(entries: &[i64], mult: i64) -> ComplexEntry {
        ComplexEntry::singleton(w(entries), mult)
    }

    /// The kernel of the last map of the staircase of `U^(1,0,0)` on `Gr(3, 9)`.
    fn truncated_staircase() -> TruncatedComplex {
        Complex::staircase(&w(&[1, 0, 0]), 3, 9)
            .unwrap()
            .stupid_truncation(1)
            .unwrap()
    }

    #[test]
    fn dual_swaps_sides() {
        let t = TruncatedComplex::new(
            Complex::concentrated(0, single(&[1, 0, 0], 1)),
            Complex::concentrated(-1, single(&[0, 0, 0], 2)),
        );
        let d = t.dual();
        assert_eq!(d.right(), &Complex::concentrated(1, single(&[0, 0, 0], 2)));
        assert_eq!(d.left(), &Complex::concentrated(0, single(&[0, 0, -1], 1)));
        assert_eq!(d.dual(), t);
    }

    #[test]
    fn cone_is_sidewise() {
        let a = TruncatedComplex::of_weight(w(&[1, 0, 0]));
        let b = TruncatedComplex::of_weight(w(&[0, 0, 0]));
        let c = a.cone(&b);
        assert_eq!(c.right(), &a.right().cone(b.right()));
        assert_eq!(c.left(), &a.left().cone(b.left()));
    }

    #[test]
    fn independence_on_igr_3_9() {
        let grass = IsotropicGrassmannian::new(3, 4).unwrap();
        let oracle = MemoProduct::new(LittlewoodRichardson);
        let t = truncated_staircase();

        assert!(t.is_indep(&[w(&[1, 1, 0])], &oracle, &grass).unwrap());

        let defects = t
            .independence_defects(
                &[w(&[0, 0, 0]), w(&[1, 0, 0]), w(&[1, 1, 0])],
                &oracle,
                &grass,
            )
            .unwrap();
        assert_eq!(defects.len(), 2);
        assert_eq!(
            defects[&w(&[0, 0, 0])],
            Complex::concentrated(-1, single(&[0, 0, 0], 9))
        );
        assert_eq!(
            defects[&w(&[1, 0, 0])],
            Complex::concentrated(-7, single(&[-1, -1, -7], 1))
        );
    }

    /// Left × right is strictly shorter than left × left here, so it wins.
    #[test]
    fn shortest_tor_prefers_smaller_amplitude() {
        let grass = IsotropicGrassmannian::new(3, 4).unwrap();
        let oracle = LittlewoodRichardson;
        let probe = TruncatedComplex::of_weight(w(&[0, 0, -1])).dual();
        let t = truncated_staircase();

        let amplitudes: Vec<i64> = probe
            .tor_candidates(&t, &oracle, &grass)
            .unwrap()
            .iter()
            .map(|c| c.cohomology.amplitude())
            .collect();
        assert_eq!(amplitudes, vec![7, 1, 7, 1]);

        let best = probe.shortest_tor_candidate(&t, &oracle, &grass).unwrap();
        assert_eq!(best.pairing, TorPairing::LeftRight);
        let expected: ComplexEntry = [(w(&[1, 1, 0]), 1), (w(&[2, 0, 0]), 1)].into_iter().collect();
        assert_eq!(best.cohomology, Complex::concentrated(0, expected));
    }

    /// All four presentations have amplitude 1; the first one is kept.
    #[test]
    fn shortest_tor_ties_go_to_left_left() {
        let grass = IsotropicGrassmannian::new(3, 4).unwrap();
        let oracle = LittlewoodRichardson;
        let probe = TruncatedComplex::of_weight(w(&[0, 0, 0])).dual();
        let best = probe
            .shortest_tor_candidate(&truncated_staircase(), &oracle, &grass)
            .unwrap();
        assert_eq!(best.pairing, TorPairing::LeftLeft);
        assert_eq!(
            probe.shortest_tor(&truncated_staircase(), &oracle, &grass).unwrap(),
            best.cohomology
        );
    }

    #[test]
    fn display_has_both_sides() {
        let t = TruncatedComplex::of_weight(w(&[1, 0, 0]));
        assert_eq!(
            t.to_string(),
            "Right:\n0 -> [0] 1 * U^(1, 0, 0) -> 0\nLeft:\n0 -> [0] 1 * U^(1, 0, 0) -> 0"
        );
    }
}
