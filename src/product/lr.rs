//! Littlewood–Richardson rule for GL(rank).
//!
//! `s_λ · s_μ = Σ c^ν_{λμ} s_ν`, where `c^ν_{λμ}` counts LR tableaux of skew
//! shape `ν/λ` and content `μ`: semistandard fillings whose reverse reading
//! word is a lattice word. Shapes with more than `rank` rows are dropped, which
//! is exactly the restriction from symmetric functions to GL(rank).
//!
//! The tableaux are built label by label. Label `r` is added as a horizontal
//! strip of `μ_r` boxes; the lattice condition on the reading word reduces to
//! the row-wise bound
//!
//! ```text
//! #{r+1 in rows ≤ i} ≤ #{r in rows < i}     for every row i,
//! ```
//!
//! which is checked while the strip is placed.
//!
//! # Citations
//! - Fulton, "Young Tableaux", Chapter 5 (1997)
//! - Macdonald, "Symmetric Functions and Hall Polynomials", Chapter I.9 (1995)

use super::WeightProduct;
use crate::entry::ComplexEntry;
use crate::weight::{Weight, WeightError};
use std::collections::BTreeMap;

/// The built-in weight-product oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LittlewoodRichardson;

impl WeightProduct for LittlewoodRichardson {
    fn product(
        &self,
        alpha: &Weight,
        beta: &Weight,
        rank: usize,
    ) -> Result<ComplexEntry, WeightError> {
        let alpha = alpha.pad_to(rank)?;
        let beta = beta.pad_to(rank)?;
        // Shift both weights to partitions, multiply, shift back.
        let shift_alpha = alpha.last().unwrap_or(0);
        let shift_beta = beta.last().unwrap_or(0);
        let lambda: Vec<i64> = alpha.as_slice().iter().map(|x| x - shift_alpha).collect();
        let mu: Vec<i64> = beta.as_slice().iter().map(|x| x - shift_beta).collect();

        let mut result = ComplexEntry::new();
        for (nu, coefficient) in lr_coefficients(&lambda, &mu, rank) {
            let entries: Vec<i64> = nu.iter().map(|x| x + shift_alpha + shift_beta).collect();
            result = result.add(&ComplexEntry::singleton(Weight::new(entries)?, coefficient));
        }
        Ok(result)
    }
}

/// Coefficients `c^ν_{λμ}` for partitions with at most `rank` rows.
///
/// `lambda` and `mu` must be partitions of length `rank`.
pub fn lr_coefficients(lambda: &[i64], mu: &[i64], rank: usize) -> BTreeMap<Vec<i64>, i64> {
    let content: Vec<i64> = mu.iter().copied().take_while(|&m| m > 0).collect();
    let mut filler = TableauFiller {
        content: &content,
        rank,
        found: BTreeMap::new(),
    };
    let mut strips = Vec::with_capacity(content.len());
    filler.fill_label(0, lambda, &mut strips);
    filler.found
}

struct TableauFiller<'a> {
    content: &'a [i64],
    rank: usize,
    found: BTreeMap<Vec<i64>, i64>,
}

impl TableauFiller<'_> {
    /// Places every label from `label` onwards on top of `shape`.
    ///
    /// `strips[r][i]` is the number of boxes labelled `r` in row `i`.
    fn fill_label(&mut self, label: usize, shape: &[i64], strips: &mut Vec<Vec<i64>>) {
        if label == self.content.len() {
            *self.found.entry(shape.to_vec()).or_insert(0) += 1;
            return;
        }
        let mut added = vec![0; self.rank];
        self.place_row(label, 0, self.content[label], 0, 0, shape, &mut added, strips);
    }

    /// Chooses how many boxes of `label` go into `row` and recurses downwards.
    ///
    /// `placed` counts boxes of `label` in rows above `row`; `above` counts boxes
    /// of `label - 1` in rows above `row`.
    #[allow(clippy::too_many_arguments)]
    fn place_row(
        &mut self,
        label: usize,
        row: usize,
        remaining: i64,
        placed: i64,
        above: i64,
        shape: &[i64],
        added: &mut [i64],
        strips: &mut Vec<Vec<i64>>,
    ) {
        if row == self.rank {
            if remaining == 0 {
                let next: Vec<i64> = shape.iter().zip(added.iter()).map(|(s, a)| s + a).collect();
                strips.push(added.to_vec());
                self.fill_label(label + 1, &next, strips);
                strips.pop();
            }
            return;
        }
        // Horizontal strip: no two boxes of one label in the same column.
        let mut cap = if row == 0 {
            remaining
        } else {
            remaining.min(shape[row - 1] - shape[row])
        };
        let previous_here = if label == 0 {
            0
        } else {
            cap = cap.min(above - placed);
            strips[label - 1][row]
        };
        for count in 0..=cap.max(-1) {
            added[row] = count;
            self.place_row(
                label,
                row + 1,
                remaining - count,
                placed + count,
                above + previous_here,
                shape,
                added,
                strips,
            );
        }
        added[row] = 0;
    }
}
