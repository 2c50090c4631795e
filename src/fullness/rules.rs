//! The two deduction rules of the fullness closure.
//!
//! **Staircase rule.** For a reduced weight `t = (a, -b)` the staircase
//! complex of `U^(a,0,-b)` on `IGr(3, 2n+1)`, with its last term removed, is a
//! list of obligations `(weight, relative twist)`:
//!
//! ```text
//! (a-i, -b)    twist 0        for i in 0..=a
//! (i, i+1-b)   twist -i-1     for i in 0..b
//! (b, -i)      twist -b-1     for i in 0..=c,   c = 2n-k-a-b
//! ```
//!
//! Offsets `τ` are tried in `0..=2n+2-k`. If every obligation shifted by `τ`
//! is already generated, the complex yields `(j, -b)(τ)` and `(b, -j)(τ-1-b)`
//! for `j` in `0..2n+2-k-b`.
//!
//! **Wedge rule.** For a column `i >= n+2-k`, a weight in column `i` gains every
//! twist shared by all other known weights in columns `<= i` (symplectic
//! relations between wedge powers).
//!
//! Both rules only ever add twists. Every weight a rule inspects is recorded,
//! even when it gains nothing, and becomes visible to the next pass.

use super::{ReducedWeight, TwistSet};
use crate::config::IsotropicGrassmannian;
use std::collections::BTreeSet;

/// Obligations of the truncated staircase complex of `t`, in recording order.
pub fn staircase_obligations(t: ReducedWeight, grass: &IsotropicGrassmannian) -> TwistSet {
    let a = t.first;
    let b = -t.second;
    let c = 2 * grass.n() as i64 - grass.k() as i64 - a - b;
    let mut obligations = TwistSet::new();
    for i in 0..=a {
        obligations.insert(ReducedWeight::new(a - i, -b), 0);
    }
    for i in 0..b {
        obligations.insert(ReducedWeight::new(i, i + 1 - b), -i - 1);
    }
    for i in 0..=c {
        obligations.insert(ReducedWeight::new(b, -i), -b - 1);
    }
    obligations
}

/// Offsets `τ` in `0..=max_offset` such that every obligation shifted by `τ` is generated.
pub fn evolvable_twists(generated: &TwistSet, obligations: &TwistSet, max_offset: i64) -> Vec<i64> {
    (0..=max_offset)
        .filter(|&tau| {
            obligations
                .iter()
                .all(|(weight, twists)| twists.iter().all(|&j| generated.contains(weight, j + tau)))
        })
        .collect()
}

/// One pass of the staircase rule over the weights known in `generated`.
///
/// Later weights see the twists added for earlier ones. Obligations and both
/// propagation families are recorded whether or not anything is admissible.
pub fn apply_staircase(generated: &TwistSet, grass: &IsotropicGrassmannian) -> TwistSet {
    let bound = grass.staircase_bound();
    let mut added = generated.clone();
    for &t in generated.weights() {
        let obligations = staircase_obligations(t, grass);
        for &weight in obligations.weights() {
            added.record(weight);
        }
        let admissible = evolvable_twists(&added, &obligations, bound);
        let b = -t.second;
        for j in 0..bound - b {
            added.extend(ReducedWeight::new(j, -b), admissible.iter().copied());
        }
        let shifted: Vec<i64> = admissible
            .iter()
            .map(|tau| tau - 1 - b)
            .filter(|&x| x >= 0)
            .collect();
        for j in 0..bound - b {
            added.extend(ReducedWeight::new(b, -j), shifted.iter().copied());
        }
    }
    added
}

/// One pass of the wedge rule over the weights known in `generated`.
///
/// Intersections are taken in `generated`, so gains within the pass do not
/// feed each other. A known weight without twists empties every intersection
/// it takes part in.
pub fn apply_wedge(generated: &TwistSet, grass: &IsotropicGrassmannian) -> TwistSet {
    let fano = grass.fano_index();
    let mut added = generated.clone();
    for column in grass.wedge_start()..=fano {
        for t in generated.weights().filter(|t| t.column() == column) {
            let mut common: BTreeSet<i64> = (0..=fano).collect();
            let others = generated
                .iter()
                .filter(|(s, _)| s.column() <= column && *s != t);
            for (_, twists) in others {
                common.retain(|x| twists.contains(x));
                if common.is_empty() {
                    break;
                }
            }
            added.extend(*t, common);
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn igr_3_9() -> IsotropicGrassmannian {
        IsotropicGrassmannian::new(3, 4).unwrap()
    }

    fn rw(first: i64, second: i64) -> ReducedWeight {
        ReducedWeight::new(first, second)
    }

    fn twist_set(entries: &[((i64, i64), &[i64])]) -> TwistSet {
        let mut set = TwistSet::new();
        for &((a, b), twists) in entries {
            set.extend(rw(a, b), twists.iter().copied());
        }
        set
    }

    #[test]
    fn obligations_of_trivial_weight() {
        let expected = twist_set(&[
            ((0, 0), &[-1, 0]),
            ((0, -1), &[-1]),
            ((0, -2), &[-1]),
            ((0, -3), &[-1]),
            ((0, -4), &[-1]),
            ((0, -5), &[-1]),
        ]);
        assert_eq!(staircase_obligations(rw(0, 0), &igr_3_9()), expected);
    }

    /// All three ranges contribute; `(1, -1)` is hit twice with different twists.
    #[test]
    fn obligations_of_mixed_weight() {
        let expected = twist_set(&[
            ((2, -1), &[0]),
            ((1, -1), &[-2, 0]),
            ((0, -1), &[0]),
            ((0, 0), &[-1]),
            ((1, 0), &[-2]),
            ((1, -2), &[-2]),
        ]);
        assert_eq!(staircase_obligations(rw(2, -1), &igr_3_9()), expected);
    }

    #[test]
    fn evolvable_needs_every_obligation() {
        let obligations = twist_set(&[((0, 0), &[-1, 0])]);
        let generated = twist_set(&[((0, 0), &[0, 1, 2, 5])]);
        assert_eq!(evolvable_twists(&generated, &obligations, 6), vec![1, 2]);
        assert!(evolvable_twists(&TwistSet::new(), &obligations, 6).is_empty());
    }

    #[test]
    fn obligations_keep_range_order() {
        let order: Vec<ReducedWeight> = staircase_obligations(rw(2, -1), &igr_3_9())
            .weights()
            .copied()
            .collect();
        assert_eq!(
            order,
            vec![rw(2, -1), rw(1, -1), rw(0, -1), rw(0, 0), rw(1, 0), rw(1, -2)]
        );
    }

    /// Nothing is admissible, but every inspected weight is recorded: obligations
    /// first, then the `(j, 0)` family, then the `(0, -j)` family.
    #[test]
    fn lonely_trivial_weight_records_what_it_inspects() {
        let grass = igr_3_9();
        let generated = twist_set(&[((0, 0), &[0])]);
        let after = apply_staircase(&generated, &grass);
        assert_eq!(after, generated);
        let recorded: Vec<ReducedWeight> = after.weights().copied().collect();
        assert_eq!(
            recorded,
            vec![
                rw(0, 0),
                rw(0, -1),
                rw(0, -2),
                rw(0, -3),
                rw(0, -4),
                rw(0, -5),
                rw(1, 0),
                rw(2, 0),
                rw(3, 0),
                rw(4, 0),
                rw(5, 0),
                rw(6, 0),
                rw(0, -6),
            ]
        );
        assert_eq!(apply_wedge(&after, &grass), after);
    }

    #[test]
    fn target_is_closed_under_both_rules() {
        let grass = igr_3_9();
        let target = TwistSet::target(&grass);
        assert_eq!(apply_staircase(&target, &grass), target);
        assert_eq!(apply_wedge(&target, &grass), target);
    }

    /// Everything in columns `<= 3` except `(3, 0)`, which is known without twists:
    /// the wedge rule fills the gap.
    #[test]
    fn wedge_fills_a_known_column_member() {
        let grass = igr_3_9();
        let target = TwistSet::target(&grass);
        let mut generated = TwistSet::new();
        for weight in target.weights().filter(|w| w.column() <= 3 && **w != rw(3, 0)) {
            generated.extend(*weight, 0..=6);
        }
        assert_eq!(apply_wedge(&generated, &grass), generated);

        generated.record(rw(3, 0));
        let after = apply_wedge(&generated, &grass);
        assert_eq!(after.get(&rw(3, 0)), Some(&(0..=6).collect()));
        assert_eq!(after.pair_count(), generated.pair_count() + 7);
    }

    /// A known weight without twists blocks the intersections of its column and above.
    #[test]
    fn bare_weight_blocks_the_wedge() {
        let grass = igr_3_9();
        let mut generated = twist_set(&[((0, 0), &[0, 1]), ((3, 0), &[])]);
        generated.record(rw(0, -1));
        assert_eq!(apply_wedge(&generated, &grass), generated);

        let generated = twist_set(&[((0, 0), &[0, 1]), ((3, 0), &[])]);
        let after = apply_wedge(&generated, &grass);
        assert_eq!(after.get(&rw(3, 0)), Some(&BTreeSet::from([0, 1])));
    }
}
