//! Bounded graded objects: complexes of bundle sums, without differentials.
//!
//! A [`Complex`] maps integer degrees to [`ComplexEntry`] values. Only the
//! terms are recorded; the differentials of the resolutions this crate works
//! with are determined by the terms up to isomorphism, and every test applied
//! to a complex (amplitude, surviving cohomology) only reads the terms.
//!
//! The main source of complexes is [`Complex::staircase`], the staircase
//! resolution of a rank-3 bundle on `Gr(3, m)`; [`Complex::stupid_truncation`]
//! cuts such an exact complex into the two resolutions of a
//! [`TruncatedComplex`].
//!
//! # Invariants
//! - No stored entry is empty: a degree that is absent is the zero entry.
//! - Every operation returns a new complex.
//!
//! # Citations
//! - Fonarev, "Minimal Lefschetz decompositions of the derived categories for Grassmannians",
//!   Izv. Math. (2013) – staircase complexes
//! - Kuznetsov, "Exceptional collections on isotropic Grassmannians", J. Eur. Math. Soc. (2016)

pub mod truncated;

pub use truncated::{TorPairing, TruncatedComplex};

use crate::config::IsotropicGrassmannian;
use crate::entry::{ComplexEntry, Multiplicity};
use crate::product::WeightProduct;
use crate::weight::{Weight, WeightError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error type for complex construction and manipulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplexError {
    /// A weight failed validation or the product oracle rejected it.
    #[error("weight error: {0}")]
    Weight(#[from] WeightError),
    /// The staircase construction only exists for rank 3.
    #[error("staircase complexes are only implemented for k = 3, got k = {k}")]
    Unsupported {
        /// Requested rank.
        k: usize,
    },
    /// The weight is too spread out for a staircase on `Gr(k, m)`.
    #[error("staircase needs weight[0] - weight[last] <= m - k, got {spread} > {bound}")]
    StaircaseOutOfRange {
        /// `weight[0] - weight[last]`.
        spread: i64,
        /// `m - k`.
        bound: i64,
    },
    /// A truncation was requested on the zero complex.
    #[error("cannot truncate a complex without nonzero entries")]
    EmptyComplex,
    /// A binomial multiplicity of the staircase does not fit in an `i64`.
    #[error("staircase multiplicities on Gr(k, {m}) overflow i64")]
    MultiplicityOverflow {
        /// Dimension of the ambient space.
        m: usize,
    },
}

/// A bounded complex `⊕_d E_d[−d]` recorded by its terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Complex {
    degrees: BTreeMap<i64, ComplexEntry>,
}

/// Adds `entry` into `degree`, dropping the degree if it cancels out.
fn accumulate(degrees: &mut BTreeMap<i64, ComplexEntry>, degree: i64, entry: &ComplexEntry) {
    if entry.is_empty() {
        return;
    }
    let sum = match degrees.get(&degree) {
        Some(existing) => existing.add(entry),
        None => entry.clone(),
    };
    if sum.is_empty() {
        degrees.remove(&degree);
    } else {
        degrees.insert(degree, sum);
    }
}

/// Binomial coefficient `C(n, r)`, zero outside `0 <= r <= n`; `None` if it overflows.
fn binomial(n: i64, r: i64) -> Option<Multiplicity> {
    if r < 0 || r > n {
        return Some(0);
    }
    let r = r.min(n - r);
    // acc = C(n, j) at step j, so the division is exact.
    (0..r).try_fold(1i64, |acc, j| {
        let next = i128::from(acc) * i128::from(n - j) / i128::from(j + 1);
        i64::try_from(next).ok()
    })
}

impl Complex {
    /// The zero complex.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The complex with `entry` in `degree` and zero elsewhere.
    pub fn concentrated(degree: i64, entry: ComplexEntry) -> Self {
        std::iter::once((degree, entry)).collect()
    }

    /// Returns `true` if every degree holds the zero entry.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Entry in `degree`; `None` stands for the zero entry.
    pub fn get(&self, degree: i64) -> Option<&ComplexEntry> {
        self.degrees.get(&degree)
    }

    /// Nonzero degrees with their entries, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &ComplexEntry)> {
        self.degrees.iter().map(|(&d, e)| (d, e))
    }

    /// Smallest degree holding a nonzero entry.
    pub fn min_degree(&self) -> Option<i64> {
        self.degrees.keys().next().copied()
    }

    /// Largest degree holding a nonzero entry.
    pub fn max_degree(&self) -> Option<i64> {
        self.degrees.keys().next_back().copied()
    }

    /// Degree-wise sum.
    pub fn add(&self, other: &Complex) -> Complex {
        let mut degrees = self.degrees.clone();
        for (&degree, entry) in &other.degrees {
            accumulate(&mut degrees, degree, entry);
        }
        Self { degrees }
    }

    /// Tensor product: `result[d] = Σ_{i+j=d} self[i] ⊗ other[j]`.
    pub fn tensor<P>(&self, other: &Complex, oracle: &P) -> Result<Complex, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        let mut degrees = BTreeMap::new();
        for (&i, left) in &self.degrees {
            for (&j, right) in &other.degrees {
                accumulate(&mut degrees, i + j, &left.tensor(right, oracle)?);
            }
        }
        Ok(Self { degrees })
    }

    /// Moves every entry from degree `d` to degree `d + t`.
    pub fn shift(&self, t: i64) -> Complex {
        Self {
            degrees: self.degrees.iter().map(|(&d, e)| (d + t, e.clone())).collect(),
        }
    }

    /// Naive amplitude: `max - min + 1` over nonzero degrees, or 0 for the zero complex.
    ///
    /// This bounds the cohomological amplitude from above and equals it only
    /// when the value is 0 or 1.
    pub fn amplitude(&self) -> i64 {
        match (self.min_degree(), self.max_degree()) {
            (Some(lo), Some(hi)) => hi - lo + 1,
            _ => 0,
        }
    }

    /// Keeps, degree by degree, the summands with nonvanishing cohomology on `grass`.
    pub fn non_vanish_terms<P>(
        &self,
        oracle: &P,
        grass: &IsotropicGrassmannian,
    ) -> Result<Complex, ComplexError>
    where
        P: WeightProduct + ?Sized,
    {
        let mut degrees = BTreeMap::new();
        for (&degree, entry) in &self.degrees {
            accumulate(&mut degrees, degree, &entry.non_vanish_terms(oracle, grass)?);
        }
        Ok(Self { degrees })
    }

    /// Splits the complex `cut` positions from its right end.
    ///
    /// With `m` the largest nonzero degree, degrees `> m - cut` form the right
    /// resolution and degrees `<= m - cut` the left one; both are re-indexed by
    /// `-(m - cut + 1)`, so the right part starts in degree 0.
    ///
    /// The input is trusted to be exact; only emptiness is checked.
    pub fn stupid_truncation(&self, cut: i64) -> Result<TruncatedComplex, ComplexError> {
        let m = self.max_degree().ok_or(ComplexError::EmptyComplex)?;
        let offset = m - cut + 1;
        let (right, left): (BTreeMap<_, _>, BTreeMap<_, _>) = self
            .degrees
            .iter()
            .map(|(&d, e)| (d - offset, e.clone()))
            .partition(|&(d, _)| d >= 0);
        Ok(TruncatedComplex::new(
            Self { degrees: right },
            Self { degrees: left },
        ))
    }

    /// Dual complex: degree `d` becomes `-d`, entries are dualized.
    pub fn dual(&self) -> Complex {
        Self {
            degrees: self.degrees.iter().map(|(&d, e)| (-d, e.dual())).collect(),
        }
    }

    /// Cone: `self + other[1]`.
    pub fn cone(&self, other: &Complex) -> Complex {
        self.add(&other.shift(1))
    }

    /// The staircase complex of a rank-3 weight on `Gr(k, m)`.
    ///
    /// For `i` in `0..m+2-k` the term in degree `m+1-k-i` is a single bundle:
    /// - `(w0-i, w1, w2)` with multiplicity `C(m, i)` while `w0-i >= w1`,
    /// - `(w1-1, w0-i, w2)` with multiplicity `C(m, i+1)` while `w0-i >= w2`,
    /// - `(w1-1, w2-1, w0-i)` with multiplicity `C(m, i+2)` afterwards.
    ///
    /// # Errors
    /// - [`ComplexError::Unsupported`] unless `k == 3`.
    /// - [`ComplexError::StaircaseOutOfRange`] if `w0 - w2 > m - k`.
    /// - [`ComplexError::Weight`] if `weight` cannot be padded to rank 3.
    /// - [`ComplexError::MultiplicityOverflow`] if a multiplicity exceeds `i64`.
    pub fn staircase(weight: &Weight, k: usize, m: usize) -> Result<Complex, ComplexError> {
        if k != 3 {
            return Err(ComplexError::Unsupported { k });
        }
        let weight = weight.pad_to(k)?;
        let (w0, w1, w2) = match *weight.as_slice() {
            [w0, w1, w2] => (w0, w1, w2),
            _ => return Err(WeightError::RankMismatch { expected: k, actual: weight.rank() }.into()),
        };
        let dimension = m;
        let (k, m) = (k as i64, m as i64);
        let spread = w0 - w2;
        if spread > m - k {
            return Err(ComplexError::StaircaseOutOfRange { spread, bound: m - k });
        }

        let mut degrees = BTreeMap::new();
        for i in 0..m + 2 - k {
            let head = w0 - i;
            let (entries, mult) = if head >= w1 {
                ([head, w1, w2], binomial(m, i))
            } else if head >= w2 {
                ([w1 - 1, head, w2], binomial(m, i + 1))
            } else {
                ([w1 - 1, w2 - 1, head], binomial(m, i + 2))
            };
            let mult = mult.ok_or(ComplexError::MultiplicityOverflow { m: dimension })?;
            let entry = ComplexEntry::singleton(Weight::new(entries)?, mult);
            accumulate(&mut degrees, m + 1 - k - i, &entry);
        }
        Ok(Self { degrees })
    }
}

impl FromIterator<(i64, ComplexEntry)> for Complex {
    /// Collects entries, summing repeated degrees and dropping zero entries.
    fn from_iter<I: IntoIterator<Item = (i64, ComplexEntry)>>(iter: I) -> Self {
        let mut degrees = BTreeMap::new();
        for (degree, entry) in iter {
            accumulate(&mut degrees, degree, &entry);
        }
        Self { degrees }
    }
}

impl<'a> std::ops::Add<&'a Complex> for &'a Complex {
    type Output = Complex;

    fn add(self, rhs: &'a Complex) -> Complex {
        Complex::add(self, rhs)
    }
}

impl fmt::Display for Complex {
    /// `0 -> [d] E_d ->\n[d+1] E_{d+1} -> 0` over every degree between the
    /// extreme nonzero ones, or `0` for the zero complex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = match (self.min_degree(), self.max_degree()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return write!(f, "0"),
        };
        let zero = ComplexEntry::new();
        write!(f, "0 -> ")?;
        for degree in lo..=hi {
            if degree > lo {
                writeln!(f, " ->")?;
            }
            write!(f, "[{}] {}", degree, self.get(degree).unwrap_or(&zero))?;
        }
        write!(f, " -> 0")
    }
}
