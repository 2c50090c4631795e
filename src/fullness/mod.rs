//! Fullness closure: can a set of twisted bundles generate the whole
//! Lefschetz window?
//!
//! Rank-3 bundles `U^(w1,w2,w3)` are recorded in reduced form
//! `U^(w1-w2, 0, w3-w2)(w2)`, i.e. a [`ReducedWeight`] `(a, -b)` together with
//! a twist. A [`TwistSet`] maps reduced weights to the twists known to be
//! generated. Starting from a basis, the engine alternates two deduction rules
//! (see [`rules`]) until the generated set equals the target
//!
//! ```text
//! T = { U^(i,0,-j)(t) : i, j >= 0, i + j <= w, 0 <= t <= w },   w = 2n+1-k,
//! ```
//!
//! or the round budget runs out. Running out is an inconclusive answer, not an
//! error.
//!
//! # Determinism
//! - Weights are visited in the order they were first recorded: the basis
//!   order, then the order in which the rules touched them. Visiting order
//!   matters because a staircase pass reads its own additions.
//! - A pass only visits the weights known when it started.
//! - The loop has no stagnation check: a round that adds nothing is followed
//!   by another round until the budget is spent.
//!
//! # Citations
//! - Kuznetsov, "Exceptional collections on isotropic Grassmannians", J. Eur. Math. Soc. (2016)
//! - Fonarev, "Minimal Lefschetz decompositions of the derived categories for Grassmannians",
//!   Izv. Math. (2013)

pub mod rules;

use crate::config::{ConfigError, FullnessConfig, IsotropicGrassmannian};
use crate::weight::{Weight, WeightError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Error type for the closure engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FullnessError {
    /// The Grassmannian parameters are invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The closure is only defined for rank-3 bundles.
    #[error("fullness closure needs k = 3 and rank-3 weights, got rank {rank}")]
    UnsupportedRank {
        /// Offending rank.
        rank: usize,
    },
    /// A basis weight failed validation.
    #[error("weight error: {0}")]
    Weight(#[from] WeightError),
}

/// A rank-3 weight with its middle entry normalized to zero: `(a, 0, c)` is stored as `(a, c)`.
///
/// Ordered lexicographically by `(first, second)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReducedWeight {
    /// `w1 - w2 >= 0`.
    pub first: i64,
    /// `w3 - w2 <= 0`.
    pub second: i64,
}

impl ReducedWeight {
    /// The reduced weight `(first, second)`, standing for `U^(first, 0, second)`.
    #[inline]
    pub const fn new(first: i64, second: i64) -> Self {
        Self { first, second }
    }

    /// Splits a rank-3 weight into its reduced form and its twist `w2`.
    pub fn from_weight(weight: &Weight) -> Result<(Self, i64), FullnessError> {
        match *weight.as_slice() {
            [w1, w2, w3] => Ok((Self::new(w1 - w2, w3 - w2), w2)),
            _ => Err(FullnessError::UnsupportedRank {
                rank: weight.rank(),
            }),
        }
    }

    /// The rank-3 weight `(first + t, t, second + t)`.
    pub fn to_weight(&self, twist: i64) -> Result<Weight, WeightError> {
        Weight::new([self.first + twist, twist, self.second + twist])
    }

    /// Column `first - second`; the wedge rule works column by column.
    #[inline]
    pub fn column(&self) -> i64 {
        self.first - self.second
    }
}

impl fmt::Display for ReducedWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Twists known to be generated, per reduced weight.
///
/// Weights are kept in the order they were first recorded, starting with the
/// basis order. A weight can be known without any twist: the staircase rule
/// records every weight it inspects, and later passes visit all known weights
/// in recording order.
///
/// # Invariants
/// - A weight that is absent has no twists.
/// - Equality compares configurations: recording order and weights without
///   twists are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwistSet {
    twists: IndexMap<ReducedWeight, BTreeSet<i64>>,
}

impl TwistSet {
    /// The empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduces every basis weight and records its twist, in basis order.
    pub fn from_basis(basis: &[Weight]) -> Result<Self, FullnessError> {
        let mut set = Self::new();
        for weight in basis {
            let (reduced, twist) = ReducedWeight::from_weight(weight)?;
            set.insert(reduced, twist);
        }
        Ok(set)
    }

    /// The target configuration of `grass`: every `(i, -j)` with `i + j <= w`
    /// at every twist `0..=w`, where `w` is the Fano index.
    pub fn target(grass: &IsotropicGrassmannian) -> Self {
        let w = grass.fano_index();
        let mut set = Self::new();
        for i in 0..=w {
            for j in 0..=w - i {
                set.extend(ReducedWeight::new(i, -j), 0..=w);
            }
        }
        set
    }

    /// Twists of `weight`; `None` means the weight was never recorded.
    pub fn get(&self, weight: &ReducedWeight) -> Option<&BTreeSet<i64>> {
        self.twists.get(weight)
    }

    /// Returns `true` if `weight(twist)` is known.
    pub fn contains(&self, weight: &ReducedWeight, twist: i64) -> bool {
        self.twists.get(weight).is_some_and(|set| set.contains(&twist))
    }

    /// Returns `true` if `weight` has been recorded, with or without twists.
    pub fn is_known(&self, weight: &ReducedWeight) -> bool {
        self.twists.contains_key(weight)
    }

    /// Records `weight` without adding a twist. Known weights keep their position.
    pub fn record(&mut self, weight: ReducedWeight) {
        self.twists.entry(weight).or_default();
    }

    /// Records `weight(twist)`; returns `true` if it was new.
    pub fn insert(&mut self, weight: ReducedWeight, twist: i64) -> bool {
        self.twists.entry(weight).or_default().insert(twist)
    }

    /// Records `weight`, then `weight(t)` for every `t` in `twists`; returns
    /// how many pairs were new.
    pub fn extend<I>(&mut self, weight: ReducedWeight, twists: I) -> usize
    where
        I: IntoIterator<Item = i64>,
    {
        let set = self.twists.entry(weight).or_default();
        twists.into_iter().filter(|&t| set.insert(t)).count()
    }

    /// Known weights in recording order, including those without twists.
    pub fn weights(&self) -> impl Iterator<Item = &ReducedWeight> {
        self.twists.keys()
    }

    /// Known weights with their twists, in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&ReducedWeight, &BTreeSet<i64>)> {
        self.twists.iter()
    }

    /// Total number of (weight, twist) pairs.
    pub fn pair_count(&self) -> usize {
        self.twists.values().map(BTreeSet::len).sum()
    }

    /// Returns `true` if every pair of `other` is also in `self`.
    pub fn is_superset(&self, other: &TwistSet) -> bool {
        other
            .twists
            .iter()
            .all(|(weight, set)| set.iter().all(|&t| self.contains(weight, t)))
    }

    /// Expands the configuration back to rank-3 weights, in recording order then by twist.
    pub fn to_weights(&self) -> Result<Vec<Weight>, WeightError> {
        self.twists
            .iter()
            .flat_map(|(weight, set)| set.iter().map(move |&t| weight.to_weight(t)))
            .collect()
    }
}

impl PartialEq for TwistSet {
    fn eq(&self, other: &Self) -> bool {
        self.pair_count() == other.pair_count() && self.is_superset(other)
    }
}

impl Eq for TwistSet {}

/// Statistics of one closure round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Zero-based round index.
    pub round: usize,
    /// Generated pairs when the round started.
    pub pairs_before: usize,
    /// Pairs added by the staircase rule.
    pub staircase_gains: usize,
    /// Pairs added by the wedge rule.
    pub wedge_gains: usize,
}

/// Result of a closure run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureOutcome {
    /// Whether the target was reached within the budget.
    pub full: bool,
    /// Round at which the target was observed, or the budget if it never was.
    pub rounds: usize,
    /// The generated configuration when the run stopped.
    pub generated: TwistSet,
    /// One report per executed round.
    pub history: Vec<RoundReport>,
}

/// Fixed-point iteration of the staircase and wedge rules on one Grassmannian.
#[derive(Debug, Clone)]
pub struct FullnessEngine {
    grass: IsotropicGrassmannian,
    config: FullnessConfig,
    target: TwistSet,
}

impl FullnessEngine {
    /// Creates an engine for `grass`.
    ///
    /// # Errors
    /// [`FullnessError::UnsupportedRank`] unless `grass.k() == 3`.
    pub fn new(grass: IsotropicGrassmannian, config: FullnessConfig) -> Result<Self, FullnessError> {
        if grass.k() != 3 {
            return Err(FullnessError::UnsupportedRank { rank: grass.k() });
        }
        Ok(Self {
            grass,
            config,
            target: TwistSet::target(&grass),
        })
    }

    /// The Grassmannian the closure runs on.
    pub fn grassmannian(&self) -> &IsotropicGrassmannian {
        &self.grass
    }

    /// Round budget and other settings.
    pub fn config(&self) -> &FullnessConfig {
        &self.config
    }

    /// The configuration the closure tries to reach.
    pub fn target(&self) -> &TwistSet {
        &self.target
    }

    /// Applies one staircase pass followed by one wedge pass.
    pub fn step(&self, generated: &TwistSet, round: usize) -> (TwistSet, RoundReport) {
        let pairs_before = generated.pair_count();
        let after_staircase = rules::apply_staircase(generated, &self.grass);
        let pairs_staircase = after_staircase.pair_count();
        let after_wedge = rules::apply_wedge(&after_staircase, &self.grass);
        let report = RoundReport {
            round,
            pairs_before,
            staircase_gains: pairs_staircase - pairs_before,
            wedge_gains: after_wedge.pair_count() - pairs_staircase,
        };
        debug!(
            round,
            pairs = pairs_before,
            staircase_gains = report.staircase_gains,
            wedge_gains = report.wedge_gains,
            "closure round"
        );
        (after_wedge, report)
    }

    /// Runs the closure from `basis`.
    pub fn run(&self, basis: &[Weight]) -> Result<ClosureOutcome, FullnessError> {
        let mut generated = TwistSet::from_basis(basis)?;
        let mut history = Vec::new();
        for round in 0..self.config.max_iter {
            if generated == self.target {
                info!(round, "closure reached the target");
                return Ok(ClosureOutcome {
                    full: true,
                    rounds: round,
                    generated,
                    history,
                });
            }
            let (next, report) = self.step(&generated, round);
            generated = next;
            history.push(report);
        }
        info!(
            max_iter = self.config.max_iter,
            pairs = generated.pair_count(),
            target_pairs = self.target.pair_count(),
            "closure budget exhausted"
        );
        Ok(ClosureOutcome {
            full: false,
            rounds: self.config.max_iter,
            generated,
            history,
        })
    }
}

/// Returns `true` if `basis` generates the target of `IGr(k, 2n+1)` within `max_iter` rounds.
pub fn fullness_test(basis: &[Weight], k: usize, n: usize, max_iter: usize) -> Result<bool, FullnessError> {
    let grass = IsotropicGrassmannian::new(k, n)?;
    let engine = FullnessEngine::new(grass, FullnessConfig::with_max_iter(max_iter))?;
    Ok(engine.run(basis)?.full)
}
