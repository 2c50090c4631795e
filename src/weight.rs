//! Dominant weights labelling irreducible bundles on Grassmannians.
//!
//! A weight of rank `r` is a non-increasing tuple of `r` integers. The bundle
//! `U^w` is obtained by applying the Schur functor of `w` to the tautological
//! bundle; negative entries are allowed and correspond to twists by powers of
//! the determinant.
//!
//! # Citations
//! - Fulton & Harris, "Representation Theory: A First Course", Lecture 15 (1991) – dominant weights of GL(r)
//! - Weyman, "Cohomology of Vector Bundles and Syzygies", Chapter 4 (2003) – Schur functors of tautological bundles

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for weight construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightError {
    /// Entries are not non-increasing (after padding with zeros).
    #[error("a weight should be non-increasing, got {entries:?}")]
    NotDominant {
        /// The offending entries, padded.
        entries: Vec<i64>,
    },
    /// The weight has more entries than the requested rank.
    #[error("cannot pad a weight of length {len} to rank {rank}")]
    TooLong {
        /// Number of entries supplied.
        len: usize,
        /// Requested rank.
        rank: usize,
    },
    /// Two weights that must share a rank do not.
    #[error("rank mismatch: expected {expected}, got {actual}")]
    RankMismatch {
        /// Rank the operation was asked for.
        expected: usize,
        /// Rank actually observed.
        actual: usize,
    },
}

/// A dominant weight: a non-increasing tuple of integers.
///
/// # Invariant
/// - `entries[i] >= entries[i + 1]` for every `i`.
///
/// Ordering is lexicographic on the entries, which gives every map keyed by
/// weights a deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Weight(Vec<i64>);

impl Weight {
    /// Creates a weight from its entries, rejecting increasing steps.
    pub fn new(entries: impl Into<Vec<i64>>) -> Result<Self, WeightError> {
        let entries = entries.into();
        if entries.windows(2).any(|pair| pair[0] < pair[1]) {
            return Err(WeightError::NotDominant { entries });
        }
        Ok(Self(entries))
    }

    /// Pads `entries` with trailing zeros up to `rank`, then validates.
    ///
    /// Fails with [`WeightError::TooLong`] if there are more than `rank` entries.
    pub fn padded(entries: &[i64], rank: usize) -> Result<Self, WeightError> {
        if entries.len() > rank {
            return Err(WeightError::TooLong {
                len: entries.len(),
                rank,
            });
        }
        let mut padded = Vec::with_capacity(rank);
        padded.extend_from_slice(entries);
        padded.resize(rank, 0);
        Self::new(padded)
    }

    /// The trivial weight `(0, …, 0)` of the given rank.
    pub fn zero(rank: usize) -> Self {
        Self(vec![0; rank])
    }

    /// Weight of the `i`-th exterior power of the dual tautological line:
    /// `rank - i` zeros followed by `i` copies of `-1`.
    ///
    /// `i` is clamped to `rank`.
    pub fn wedge(rank: usize, i: usize) -> Self {
        let i = i.min(rank);
        let mut entries = vec![0; rank - i];
        entries.resize(rank, -1);
        Self(entries)
    }

    /// Re-pads this weight to `rank` and validates again.
    pub fn pad_to(&self, rank: usize) -> Result<Self, WeightError> {
        Self::padded(&self.0, rank)
    }

    /// Number of entries.
    #[inline]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Entries as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// First (largest) entry, if any.
    #[inline]
    pub fn first(&self) -> Option<i64> {
        self.0.first().copied()
    }

    /// Last (smallest) entry, if any.
    #[inline]
    pub fn last(&self) -> Option<i64> {
        self.0.last().copied()
    }

    /// Returns `true` if every entry is zero.
    pub fn is_trivial(&self) -> bool {
        self.0.iter().all(|&x| x == 0)
    }

    /// Dual weight `-reverse(w)`. An involution.
    pub fn dual(&self) -> Self {
        Self(self.0.iter().rev().map(|&x| -x).collect())
    }

    /// Twist by the `l`-th power of the determinant: adds `l` to every entry.
    pub fn twist(&self, l: i64) -> Self {
        Self(self.0.iter().map(|&x| x + l).collect())
    }
}

impl TryFrom<Vec<i64>> for Weight {
    type Error = WeightError;

    fn try_from(entries: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Weight> for Vec<i64> {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, ")")
    }
}
