//! Cohomology vanishing on odd isotropic Grassmannians.
//!
//! `IGr(k, 2n+1)` sits in the even Grassmannian `Gr(k, 2n+2)` as the zero
//! locus of a section of `U^*`, so the Koszul complex with terms
//! `Λ^i U = U^(0,…,0,-1,…,-1)` resolves its structure sheaf. A bundle `U^w`
//! on `IGr(k, 2n+1)` is acyclic when every summand of every
//! `U^w ⊗ Λ^i U` is acyclic on `Gr(k, 2n+2)`, which the Borel–Weil–Bott
//! theorem decides from the weight alone.
//!
//! The tests here are one-sided: "vanishes" is a certificate, "does not
//! vanish" only means the spectral sequence has a term that survives to the
//! first page.
//!
//! # Citations
//! - Bott, "Homogeneous vector bundles", Ann. of Math. (1957)
//! - Weyman, "Cohomology of Vector Bundles and Syzygies", Chapter 4 (2003)
//! - Kuznetsov, "Exceptional collections on isotropic Grassmannians", J. Eur. Math. Soc. (2016)

use crate::config::IsotropicGrassmannian;
use crate::entry::ComplexEntry;
use crate::product::WeightProduct;
use crate::weight::{Weight, WeightError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use tracing::info;

/// Borel–Weil–Bott test on the even Grassmannian with `n` tautological slots.
///
/// `weight` is padded with zeros to length `n` (without re-checking
/// dominance) and `ρ = (n, n-1, …, 1)` is added. The bundle is acyclic if the
/// result has a zero entry or two entries of equal absolute value.
///
/// # Errors
/// [`WeightError::TooLong`] if `weight` has more than `n` entries.
pub fn vanishing_even_grass(weight: &Weight, n: usize) -> Result<bool, WeightError> {
    let entries = weight.as_slice();
    if entries.len() > n {
        return Err(WeightError::TooLong {
            len: entries.len(),
            rank: n,
        });
    }
    let shifted = (0..n).map(|i| entries.get(i).copied().unwrap_or(0) + (n - i) as i64);
    let mut seen = HashSet::with_capacity(n);
    for value in shifted {
        if value == 0 || !seen.insert(value.abs()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Outcome of [`vanishing_odd_grass`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddGrassVerdict {
    /// For each Koszul degree `i`, the summands of `U^w ⊗ Λ^i U` that are not
    /// acyclic on the even Grassmannian. Degrees without survivors are absent.
    pub nonvanishing: BTreeMap<usize, BTreeSet<Weight>>,
}

impl OddGrassVerdict {
    /// Returns `true` if no Koszul term survives, i.e. `U^w` is acyclic.
    pub fn vanishes(&self) -> bool {
        self.nonvanishing.is_empty()
    }
}

/// Koszul spectral-sequence test for `U^weight` on `grass`.
pub fn vanishing_odd_grass<P>(
    weight: &Weight,
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<OddGrassVerdict, WeightError>
where
    P: WeightProduct + ?Sized,
{
    let k = grass.k();
    let weight = weight.pad_to(k)?;
    let mut verdict = OddGrassVerdict::default();
    for i in 0..=k {
        let wedge = Weight::wedge(k, i);
        for summand in oracle.product(&weight, &wedge, k)?.weights() {
            if !vanishing_even_grass(summand, grass.n() + 1)? {
                verdict
                    .nonvanishing
                    .entry(i)
                    .or_default()
                    .insert(summand.clone());
            }
        }
    }
    Ok(verdict)
}

/// Negation of [`vanishing_odd_grass`]: `true` if `U^weight` may have cohomology.
pub fn nonvanishing<P>(
    weight: &Weight,
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<bool, WeightError>
where
    P: WeightProduct + ?Sized,
{
    Ok(!vanishing_odd_grass(weight, oracle, grass)?.vanishes())
}

/// Outcome of [`ext_odd_grass`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtVerdict {
    /// Summands of `U^{α*} ⊗ U^β` that are not certified acyclic.
    pub nonvanishing: ComplexEntry,
}

impl ExtVerdict {
    /// Returns `true` if `Ext^•(U^α, U^β) = 0` is certified.
    pub fn vanishes(&self) -> bool {
        self.nonvanishing.is_empty()
    }
}

/// `Ext^•(U^alpha, U^beta)` as the cohomology of `U^{dual(alpha)} ⊗ U^beta`.
pub fn ext_odd_grass<P>(
    alpha: &Weight,
    beta: &Weight,
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<ExtVerdict, WeightError>
where
    P: WeightProduct + ?Sized,
{
    let k = grass.k();
    let alpha = alpha.pad_to(k)?;
    let beta = beta.pad_to(k)?;
    let product = oracle.product(&alpha.dual(), &beta, k)?;
    Ok(ExtVerdict {
        nonvanishing: product.non_vanish_terms(oracle, grass)?,
    })
}

/// Twists `l` in `0..=2n+1-k` with `Ext^•(U^alpha(l), U^beta) = 0`, ascending.
pub fn lefschetz_indep<P>(
    alpha: &Weight,
    beta: &Weight,
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<Vec<i64>, WeightError>
where
    P: WeightProduct + ?Sized,
{
    let alpha = alpha.pad_to(grass.k())?;
    let mut twists = Vec::new();
    for l in 0..=grass.fano_index() {
        if ext_odd_grass(&alpha.twist(l), beta, oracle, grass)?.vanishes() {
            twists.push(l);
        }
    }
    Ok(twists)
}

/// `U^alpha` is Lefschetz exceptional: `Ext^•(U^alpha(l), U^alpha)` vanishes
/// for `l = 1..=2n+1-k` and is the ground field for `l = 0`.
pub fn is_lefschetz_excep<P>(
    alpha: &Weight,
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<bool, WeightError>
where
    P: WeightProduct + ?Sized,
{
    let expected: Vec<i64> = (1..=grass.fano_index()).collect();
    if lefschetz_indep(alpha, alpha, oracle, grass)? != expected {
        return Ok(false);
    }
    let ext = ext_odd_grass(alpha, alpha, oracle, grass)?;
    Ok(ext.nonvanishing == ComplexEntry::singleton(Weight::zero(grass.k()), 1))
}

/// First reason a sequence fails to be a Lefschetz basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisDefect {
    /// An element is not Lefschetz exceptional.
    NotExceptional {
        /// The offending element.
        weight: Weight,
    },
    /// `Ext^•(U^later(l), U^earlier)` survives for some twist `l`.
    NotIndependent {
        /// The element appearing later in the sequence.
        later: Weight,
        /// The element appearing earlier in the sequence.
        earlier: Weight,
        /// Twists for which the Ext group does vanish.
        vanishing_twists: Vec<i64>,
    },
}

impl fmt::Display for BasisDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisDefect::NotExceptional { weight } => write!(f, "not exceptional: {}", weight),
            BasisDefect::NotIndependent {
                later,
                earlier,
                vanishing_twists,
            } => write!(
                f,
                "Ext({}(l), {}) vanishes only for l in {:?}",
                later, earlier, vanishing_twists
            ),
        }
    }
}

/// Scans `sequence` in order and returns the first failing element or pair.
///
/// Element `i` is checked for exceptionality before it is paired with the
/// elements after it.
pub fn lefschetz_basis_defect<P>(
    sequence: &[Weight],
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<Option<BasisDefect>, WeightError>
where
    P: WeightProduct + ?Sized,
{
    let full: Vec<i64> = (0..=grass.fano_index()).collect();
    for (index, earlier) in sequence.iter().enumerate() {
        if !is_lefschetz_excep(earlier, oracle, grass)? {
            return Ok(Some(BasisDefect::NotExceptional {
                weight: earlier.clone(),
            }));
        }
        for later in &sequence[index + 1..] {
            let vanishing_twists = lefschetz_indep(later, earlier, oracle, grass)?;
            if vanishing_twists != full {
                return Ok(Some(BasisDefect::NotIndependent {
                    later: later.clone(),
                    earlier: earlier.clone(),
                    vanishing_twists,
                }));
            }
        }
    }
    Ok(None)
}

/// Returns `true` if `sequence` is a Lefschetz exceptional collection on `grass`.
pub fn is_lefschetz_basis<P>(
    sequence: &[Weight],
    oracle: &P,
    grass: &IsotropicGrassmannian,
) -> Result<bool, WeightError>
where
    P: WeightProduct + ?Sized,
{
    match lefschetz_basis_defect(sequence, oracle, grass)? {
        Some(defect) => {
            info!(k = grass.k(), n = grass.n(), %defect, "not a Lefschetz basis");
            Ok(false)
        }
        None => Ok(true),
    }
}
