//! Derived-category computations on odd isotropic Grassmannians `IGr(k, 2n+1)`.
//!
//! This crate provides:
//! - Graded complexes of bundle sums `Σ m_w · U^w` with tensor products,
//!   duality, cones and stupid truncations ([`entry`], [`complex`]).
//! - A cohomology-vanishing oracle built from the Koszul resolution of
//!   `IGr(k, 2n+1) ⊂ Gr(k, 2n+2)` and Borel–Weil–Bott, with Ext groups and
//!   Lefschetz exceptionality checks on top ([`vanishing`]).
//! - A closure engine deciding whether a set of twisted bundles generates
//!   the full Lefschetz window through staircase complexes and symplectic
//!   relations ([`fullness`]).
//!
//! Tensor products of irreducible bundles go through the [`WeightProduct`]
//! trait. The built-in [`LittlewoodRichardson`] oracle implements the
//! Littlewood–Richardson rule; [`MemoProduct`] caches any oracle.
//!
//! # Mathematical Foundations
//!
//! Bundles are indexed by dominant weights of GL(k) applied to the
//! tautological bundle `U`. A bundle is acyclic on `IGr(k, 2n+1)` when all
//! terms of `U^w ⊗ Λ^• U` are acyclic on the even Grassmannian; Ext groups
//! are cohomology of `U^{w*} ⊗ U^v`. Both tests certify vanishing but never
//! prove non-vanishing.
//!
//! # References
//!
//! - Kuznetsov, A. "Exceptional collections on isotropic Grassmannians" (2016)
//! - Fonarev, A. "Minimal Lefschetz decompositions of the derived categories for Grassmannians" (2013)
//! - Mihai, I. "Odd symplectic flag manifolds" (2007)
//! - Weyman, J. "Cohomology of Vector Bundles and Syzygies" (2003)
//!
//! # Example
//!
//! ```
//! use grassmannian_derived::prelude::*;
//!
//! let grass = IsotropicGrassmannian::new(3, 4).unwrap();
//! let oracle = MemoProduct::new(LittlewoodRichardson);
//!
//! let trivial = Weight::zero(3);
//! assert!(is_lefschetz_excep(&trivial, &oracle, &grass).unwrap());
//!
//! let staircase = Complex::staircase(&Weight::new([1, 0, 0]).unwrap(), 3, 9).unwrap();
//! let kernel = staircase.stupid_truncation(1).unwrap();
//! let probe = [Weight::new([1, 1, 0]).unwrap()];
//! assert!(kernel.is_indep(&probe, &oracle, &grass).unwrap());
//!
//! assert!(!fullness_test(&[trivial], 3, 4, 20).unwrap());
//! ```

pub mod complex;
pub mod config;
pub mod entry;
pub mod fullness;
pub mod product;
pub mod vanishing;
pub mod weight;

pub use complex::{Complex, ComplexError, TorPairing, TruncatedComplex};
pub use config::{ConfigError, FullnessConfig, IsotropicGrassmannian, DEFAULT_MAX_ITER};
pub use entry::{ComplexEntry, Multiplicity};
pub use fullness::{
    fullness_test, ClosureOutcome, FullnessEngine, FullnessError, ReducedWeight, RoundReport,
    TwistSet,
};
pub use product::{LittlewoodRichardson, MemoProduct, WeightProduct};
pub use vanishing::{BasisDefect, ExtVerdict, OddGrassVerdict};
pub use weight::{Weight, WeightError};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::complex::truncated::TorCandidate;
    pub use crate::complex::{Complex, ComplexError, TorPairing, TruncatedComplex};
    pub use crate::config::{ConfigError, FullnessConfig, IsotropicGrassmannian, DEFAULT_MAX_ITER};
    pub use crate::entry::{ComplexEntry, Multiplicity};
    pub use crate::fullness::{
        fullness_test, ClosureOutcome, FullnessEngine, FullnessError, ReducedWeight, RoundReport,
        TwistSet,
    };
    pub use crate::product::{LittlewoodRichardson, MemoProduct, WeightProduct};
    pub use crate::vanishing::{
        ext_odd_grass, is_lefschetz_basis, is_lefschetz_excep, lefschetz_basis_defect,
        lefschetz_indep, nonvanishing, vanishing_even_grass, vanishing_odd_grass, BasisDefect,
        ExtVerdict, OddGrassVerdict,
    };
    pub use crate::weight::{Weight, WeightError};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use serde::Serialize;

    fn w(entries: &[i64]) -> Weight {
        Weight::new(entries.to_vec()).unwrap()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    /// A short Lefschetz basis of `IGr(3, 9)` is not full by itself; the
    /// first four columns of the window at every twist are.
    #[test]
    fn lefschetz_basis_and_fullness() {
        init_tracing();
        let grass = IsotropicGrassmannian::new(3, 4).unwrap();
        let oracle = MemoProduct::new(LittlewoodRichardson);

        let basis = [w(&[0, 0, 0]), w(&[1, 0, 0]), w(&[1, 1, 0])];
        assert!(is_lefschetz_basis(&basis, &oracle, &grass).unwrap());
        assert!(oracle.stats().hits > 0);

        let engine = FullnessEngine::new(grass, FullnessConfig::default()).unwrap();
        let outcome = engine.run(&basis).unwrap();
        assert!(!outcome.full);
        assert!(outcome.generated.is_superset(&TwistSet::from_basis(&basis).unwrap()));

        let mut window = Vec::new();
        for reduced in engine.target().weights().filter(|r| r.column() <= 3) {
            for t in 0..=grass.fano_index() {
                window.push(reduced.to_weight(t).unwrap());
            }
        }
        let outcome = engine.run(&window).unwrap();
        assert!(outcome.full);
        assert_eq!(outcome.rounds, 5);
        let gains: usize = outcome
            .history
            .iter()
            .map(|r| r.staircase_gains + r.wedge_gains)
            .sum();
        assert_eq!(outcome.history[0].pairs_before + gains, engine.target().pair_count());
    }

    /// Staircase, truncation, duality and independence in one pass.
    #[test]
    fn truncated_staircase_scenario() {
        init_tracing();
        let grass = IsotropicGrassmannian::new(3, 4).unwrap();
        let oracle = MemoProduct::new(LittlewoodRichardson);
        let staircase = Complex::staircase(&w(&[1, 0, 0]), 3, 9).unwrap();
        assert_eq!(staircase.amplitude(), 8);

        let kernel = staircase.stupid_truncation(1).unwrap();
        assert_eq!(kernel.dual().dual(), kernel);

        let defects = kernel
            .independence_defects(&[w(&[0, 0, -1]), w(&[1, 1, 0])], &oracle, &grass)
            .unwrap();
        assert_eq!(defects.len(), 1);
        let residual = &defects[&w(&[0, 0, -1])];
        assert_eq!(residual.amplitude(), 1);
        assert_eq!(residual.to_string(), "0 -> [0] 1 * U^(1, 1, 0) + 1 * U^(2, 0, 0) -> 0");
    }

    /// Tensoring with the trivial bundle and shifting back and forth are identities.
    #[test]
    fn complex_identities() {
        let oracle = LittlewoodRichardson;
        let staircase = Complex::staircase(&w(&[2]), 3, 5).unwrap();
        let one = Complex::concentrated(0, ComplexEntry::singleton(Weight::zero(3), 1));
        assert_eq!(staircase.tensor(&one, &oracle).unwrap(), staircase);
        assert_eq!(staircase.shift(3).shift(-3), staircase);
        assert_eq!(staircase.cone(&Complex::new()), staircase);
    }

    #[derive(Serialize)]
    struct RawParameters {
        k: usize,
        n: usize,
    }

    #[derive(Serialize)]
    struct NoSettings {}

    /// Validation also runs when parameters are deserialized.
    #[test]
    fn configuration_through_cbor() {
        let grass = IsotropicGrassmannian::new(3, 4).unwrap();
        let bytes = serde_cbor::to_vec(&grass).unwrap();
        let decoded: IsotropicGrassmannian = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(decoded, grass);

        let bytes = serde_cbor::to_vec(&RawParameters { k: 0, n: 4 }).unwrap();
        assert!(serde_cbor::from_slice::<IsotropicGrassmannian>(&bytes).is_err());

        let bytes = serde_cbor::to_vec(&NoSettings {}).unwrap();
        let config: FullnessConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(config, FullnessConfig::default());

        let bytes = serde_cbor::to_vec(&vec![0i64, 1, 0]).unwrap();
        assert!(serde_cbor::from_slice::<Weight>(&bytes).is_err());
    }

    #[test]
    fn closure_outcome_round_trips() {
        let outcome = FullnessEngine::new(
            IsotropicGrassmannian::new(3, 4).unwrap(),
            FullnessConfig::with_max_iter(2),
        )
        .unwrap()
        .run(&[w(&[0, 0, 0]), w(&[2, 1, 0])])
        .unwrap();
        let bytes = serde_cbor::to_vec(&outcome).unwrap();
        let decoded: ClosureOutcome = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(decoded, outcome);
        assert_eq!(decoded.history.len(), 2);
    }

    /// Errors from lower layers keep their cause.
    #[test]
    fn error_conversions() {
        let err: ComplexError = WeightError::TooLong { len: 4, rank: 3 }.into();
        assert_eq!(err.to_string(), "weight error: cannot pad a weight of length 4 to rank 3");
        let err: FullnessError = ConfigError::InvalidGrassmannian { k: 7, n: 2 }.into();
        assert!(err.to_string().starts_with("configuration error: IGr(7, 2*2+1)"));
        assert!(matches!(
            fullness_test(&[w(&[1, 0])], 3, 4, 1),
            Err(FullnessError::UnsupportedRank { rank: 2 })
        ));
    }
}
