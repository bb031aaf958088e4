//! Relocate neighborhood: move one assignment to a cheaper warehouse.

use crate::solution::Solution;
use log::trace;
use std::sync::Arc;

use super::utils::relocate_delta;
use super::LocalSearch;

impl LocalSearch {
    /// Implement the Relocate neighborhood.
    ///
    /// Stores are visited in id order. For each assignment of a store the
    /// other warehouses are scanned in id order and the first one that fits,
    /// hosts no incompatible store, has a strictly lower unit cost and lowers
    /// the total cost takes the quantity. At most one move is made per store.
    pub fn relocate_neighborhood(&self, solution: &mut Solution) -> bool {
        let problem = Arc::clone(solution.problem());
        let mut improvement = false;

        for store in problem.store_ids() {
            let assignments = solution.assignments_of(store).to_vec();

            for assignment in assignments {
                if let Some(to) = Self::find_relocation(
                    solution,
                    store,
                    assignment.warehouse,
                    assignment.quantity,
                ) {
                    trace!(
                        "Relocate store {}: {} units {} -> {}",
                        store,
                        assignment.quantity,
                        assignment.warehouse,
                        to
                    );
                    solution.transfer(store, assignment.warehouse, to, assignment.quantity);
                    improvement = true;
                    break;
                }
            }
        }

        improvement
    }

    /// Find the first warehouse that improves on `from` for this assignment.
    fn find_relocation(
        solution: &Solution,
        store: usize,
        from: usize,
        quantity: u64,
    ) -> Option<usize> {
        let problem = solution.problem();
        let current_unit_cost = problem.unit_cost(store, from);

        problem.warehouse_ids().find(|&to| {
            to != from
                && problem.unit_cost(store, to) < current_unit_cost
                && solution.can_host(store, to, quantity)
                && relocate_delta(solution, store, from, to, quantity) < 0
        })
    }
}
