//! Swap neighborhood: exchange the warehouses of two stores.

use crate::solution::Solution;
use itertools::Itertools;
use log::trace;

use super::utils::swap_delta;
use super::LocalSearch;

/// An improving exchange found by the swap neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    /// `(store, warehouse, quantity)` of the first assignment
    pub first: (usize, usize, u64),
    /// `(store, warehouse, quantity)` of the second assignment
    pub second: (usize, usize, u64),
    /// Change in total cost
    pub delta: i64,
}

impl LocalSearch {
    /// Implement the Swap neighborhood.
    ///
    /// Applies the first improving exchange found over all compatible store
    /// pairs and returns whether one was applied.
    pub fn swap_neighborhood(&self, solution: &mut Solution) -> bool {
        match Self::find_swap(solution) {
            Some(swap) => {
                trace!(
                    "Swap store {} (w{}) with store {} (w{}), delta {}",
                    swap.first.0,
                    swap.first.1,
                    swap.second.0,
                    swap.second.1,
                    swap.delta
                );
                Self::apply_swap(solution, &swap);
                true
            }
            None => false,
        }
    }

    /// Find the first improving swap in store-pair and assignment order.
    pub fn find_swap(solution: &Solution) -> Option<SwapMove> {
        let problem = solution.problem();

        for (s1, s2) in problem.store_ids().tuple_combinations() {
            if problem.are_incompatible(s1, s2) {
                continue;
            }

            for a1 in solution.assignments_of(s1) {
                for a2 in solution.assignments_of(s2) {
                    if a1.warehouse == a2.warehouse {
                        continue;
                    }

                    let first = (s1, a1.warehouse, a1.quantity);
                    let second = (s2, a2.warehouse, a2.quantity);
                    if !Self::is_swap_feasible(solution, first, second) {
                        continue;
                    }

                    let delta = swap_delta(solution, first, second);
                    if delta < 0 {
                        return Some(SwapMove {
                            first,
                            second,
                            delta,
                        });
                    }
                }
            }
        }

        None
    }

    /// Each warehouse must absorb the other store's quantity after the
    /// original one leaves, and neither store may join an incompatible one.
    fn is_swap_feasible(
        solution: &Solution,
        (s1, w1, q1): (usize, usize, u64),
        (s2, w2, q2): (usize, usize, u64),
    ) -> bool {
        solution.state(w1).remaining + q1 as i64 >= q2 as i64
            && solution.state(w2).remaining + q2 as i64 >= q1 as i64
            && !solution.has_conflict(s1, w2)
            && !solution.has_conflict(s2, w1)
    }

    /// Apply a swap; every store keeps its own quantity.
    fn apply_swap(solution: &mut Solution, swap: &SwapMove) {
        let (s1, w1, q1) = swap.first;
        let (s2, w2, q2) = swap.second;

        solution.remove_quantity(s1, w1, q1);
        solution.remove_quantity(s2, w2, q2);
        solution.add_quantity(s1, w2, q1);
        solution.add_quantity(s2, w1, q2);
    }
}
