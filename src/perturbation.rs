//! Randomized perturbation used by the ILS to escape local optima.

use crate::solution::Solution;
use crate::validator;
use log::trace;
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Reassigns a random share of the assignments to other feasible warehouses.
#[derive(Debug, Clone)]
pub struct Perturbation {
    /// Probability of a uniformly random target instead of the cheapest one
    pub random_choice_probability: f64,
}

impl Perturbation {
    pub fn new(random_choice_probability: f64) -> Self {
        Perturbation {
            random_choice_probability,
        }
    }

    /// Perturb a solution in place and return the number of reassigned
    /// assignments.
    ///
    /// `strength` is the share of `(store, warehouse, quantity)` triples to
    /// disrupt, rounded half to even; at least one triple is always tried. A triple without any
    /// feasible alternative warehouse is left where it is.
    pub fn perturb<R: Rng + ?Sized>(
        &self,
        solution: &mut Solution,
        strength: f64,
        rng: &mut R,
    ) -> usize {
        let triples = solution.triples();
        if triples.is_empty() {
            return 0;
        }

        let count = ((strength * triples.len() as f64).round_ties_even() as usize)
            .clamp(1, triples.len());
        let mut reassigned = 0;

        for i in index::sample(rng, triples.len(), count).into_vec() {
            let (store, from, quantity) = triples[i];

            // An earlier reassignment may have merged quantity into this pair.
            let quantity = quantity.min(solution.quantity(store, from));
            if quantity == 0 {
                continue;
            }

            let alternatives = Self::feasible_alternatives(solution, store, from, quantity);
            if alternatives.is_empty() {
                trace!(
                    "No alternative for store {} at warehouse {}, keeping it",
                    store,
                    from
                );
                continue;
            }

            let target = if rng.gen::<f64>() < self.random_choice_probability {
                alternatives.choose(rng).copied()
            } else {
                let problem = solution.problem();
                alternatives
                    .iter()
                    .copied()
                    .min_by_key(|&w| (problem.unit_cost(store, w), w))
            };

            if let Some(to) = target {
                trace!(
                    "Perturb store {}: {} units {} -> {}",
                    store,
                    quantity,
                    from,
                    to
                );
                solution.transfer(store, from, to, quantity);
                reassigned += 1;
            }
        }

        validator::debug_assert_valid(solution);
        reassigned
    }

    /// Warehouses other than `from` that can take `quantity` units of `store`.
    pub fn feasible_alternatives(
        solution: &Solution,
        store: usize,
        from: usize,
        quantity: u64,
    ) -> Vec<usize> {
        solution
            .problem()
            .warehouse_ids()
            .filter(|&w| w != from && solution.can_host(store, w, quantity))
            .collect()
    }
}
