//! The weight-product oracle: decomposing `U^α ⊗ U^β` into irreducibles.
//!
//! Every algebraic operation of the crate that multiplies bundles goes through
//! the [`WeightProduct`] trait, so the complex algebra, the vanishing tests and
//! the independence checks can run against the built-in
//! [`LittlewoodRichardson`] rule or against a hand-written table in tests.
//!
//! # Citations
//! - Littlewood & Richardson, "Group characters and algebra", Phil. Trans. R. Soc. A (1934)
//! - Macdonald, "Symmetric Functions and Hall Polynomials", Chapter I.9 (1995)

pub mod lr;
pub mod memo;

pub use lr::LittlewoodRichardson;
pub use memo::MemoProduct;

use crate::entry::ComplexEntry;
use crate::weight::{Weight, WeightError};

/// Tensor-product decomposition of rank-`rank` weights.
///
/// # Contract
/// - Both weights are padded with zeros to `rank` and validated; a weight that
///   is longer than `rank` or not dominant is an error.
/// - Negative entries are handled by the oracle itself.
/// - Returned multiplicities are positive; the result may be empty.
pub trait WeightProduct {
    /// Returns the formal sum of irreducible summands of `U^alpha ⊗ U^beta`.
    fn product(&self, alpha: &Weight, beta: &Weight, rank: usize)
        -> Result<ComplexEntry, WeightError>;
}

impl<T: WeightProduct + ?Sized> WeightProduct for &T {
    fn product(
        &self,
        alpha: &Weight,
        beta: &Weight,
        rank: usize,
    ) -> Result<ComplexEntry, WeightError> {
        (**self).product(alpha, beta, rank)
    }
}

impl<T: WeightProduct + ?Sized> WeightProduct for Box<T> {
    fn product(
        &self,
        alpha: &Weight,
        beta: &Weight,
        rank: usize,
    ) -> Result<ComplexEntry, WeightError> {
        (**self).product(alpha, beta, rank)
    }
}
