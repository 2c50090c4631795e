//! Parameters fixing the ambient variety and the closure budget.
//!
//! `IGr(k, 2n+1)` is the odd isotropic Grassmannian of `k`-dimensional subspaces
//! of a `(2n+1)`-dimensional space isotropic for a skew form of maximal rank,
//! so `1 <= k <= n+1`.
//!
//! # Citations
//! - Mihai, "Odd symplectic flag manifolds", Transformation Groups (2007)
//! - Kuznetsov, "Exceptional collections on isotropic Grassmannians", J. Eur. Math. Soc. (2016)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default iteration budget of the fullness closure.
pub const DEFAULT_MAX_ITER: usize = 20;

/// Error type for invalid parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `k` must satisfy `1 <= k <= n+1`.
    #[error("IGr({k}, 2*{n}+1) is not a valid isotropic Grassmannian (need 1 <= k <= n+1)")]
    InvalidGrassmannian {
        /// Dimension of the isotropic subspaces.
        k: usize,
        /// Half of the even part of the ambient dimension.
        n: usize,
    },
}

/// The odd isotropic Grassmannian `IGr(k, 2n+1)`.
///
/// # Invariant
/// - `1 <= k <= n+1`, checked by [`IsotropicGrassmannian::new`] and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrassmannian")]
pub struct IsotropicGrassmannian {
    k: usize,
    n: usize,
}

#[derive(Deserialize)]
struct RawGrassmannian {
    k: usize,
    n: usize,
}

impl TryFrom<RawGrassmannian> for IsotropicGrassmannian {
    type Error = ConfigError;

    fn try_from(raw: RawGrassmannian) -> Result<Self, Self::Error> {
        Self::new(raw.k, raw.n)
    }
}

impl IsotropicGrassmannian {
    /// Validates and creates `IGr(k, 2n+1)`.
    pub fn new(k: usize, n: usize) -> Result<Self, ConfigError> {
        if k == 0 || k > n + 1 {
            return Err(ConfigError::InvalidGrassmannian { k, n });
        }
        Ok(Self { k, n })
    }

    /// Rank of the tautological bundle.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// The `n` in `2n+1`.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Dimension `2n+1` of the ambient vector space.
    #[inline]
    pub fn ambient_dimension(&self) -> usize {
        2 * self.n + 1
    }

    /// Fano index `2n+1-k`; twists of Lefschetz collections range over `0..=fano_index`.
    #[inline]
    pub fn fano_index(&self) -> i64 {
        (2 * self.n + 1 - self.k) as i64
    }

    /// `2n+2-k`, the exclusive bound of the staircase propagation ranges.
    #[inline]
    pub fn staircase_bound(&self) -> i64 {
        self.fano_index() + 1
    }

    /// `n+2-k`, the first column where symplectic relations apply.
    #[inline]
    pub fn wedge_start(&self) -> i64 {
        (self.n + 2 - self.k) as i64
    }
}

/// Settings of the fullness closure engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullnessConfig {
    /// Maximum number of rounds before the closure reports "inconclusive".
    #[serde(default = "FullnessConfig::default_max_iter")]
    pub max_iter: usize,
}

impl FullnessConfig {
    fn default_max_iter() -> usize {
        DEFAULT_MAX_ITER
    }

    /// Config with an explicit iteration budget.
    pub fn with_max_iter(max_iter: usize) -> Self {
        Self { max_iter }
    }
}

impl Default for FullnessConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}
