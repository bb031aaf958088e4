//! Greedy constructive heuristic producing the initial solution.

use crate::config::StoreOrder;
use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::solution::Solution;
use crate::validator;
use itertools::Itertools;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;
use std::sync::Arc;

/// Builds a feasible initial assignment store by store.
pub struct Construction {
    pub store_order: StoreOrder,
}

impl Construction {
    pub fn new(store_order: StoreOrder) -> Self {
        Construction { store_order }
    }

    /// Build an initial solution.
    ///
    /// Each store is served from its ranked warehouse list first and then
    /// from any warehouse that still fits. Fails with
    /// [`Error::InfeasibleInstance`] when a store's demand cannot be covered.
    pub fn build<R: Rng + ?Sized>(&self, problem: &Arc<Problem>, rng: &mut R) -> Result<Solution> {
        let mut solution = Solution::new(Arc::clone(problem));

        for store in self.store_sequence(problem, rng) {
            let demand = problem.store(store).demand;
            let mut remaining = demand;

            for warehouse in Self::ranked_warehouses(&solution, store) {
                if remaining == 0 {
                    break;
                }
                remaining -= Self::allocate(&mut solution, store, warehouse, remaining);
            }

            if remaining > 0 {
                debug!(
                    "Store {}: {} units left after ranked pass, running fallback",
                    store, remaining
                );
                for warehouse in problem.warehouse_ids() {
                    if remaining == 0 {
                        break;
                    }
                    remaining -= Self::allocate(&mut solution, store, warehouse, remaining);
                }
            }

            if remaining > 0 {
                return Err(Error::InfeasibleInstance {
                    store,
                    unmet: remaining,
                });
            }
        }

        debug!(
            "Constructed initial solution with cost {} using {} warehouses",
            solution.cost(),
            solution.used_count()
        );
        validator::debug_assert_valid(&solution);

        Ok(solution)
    }

    /// Order in which stores are placed.
    fn store_sequence<R: Rng + ?Sized>(&self, problem: &Problem, rng: &mut R) -> Vec<usize> {
        match self.store_order {
            StoreOrder::MostConstrained => problem
                .store_ids()
                .sorted_by_key(|&s| Reverse(problem.incompatible_with(s).len()))
                .collect(),
            StoreOrder::Shuffled => {
                let mut stores: Vec<usize> = problem.store_ids().collect();
                stores.shuffle(rng);
                stores
            }
        }
    }

    /// Rank warehouses for serving all of a store's demand.
    ///
    /// Key: full supply cost plus the fixed cost if the warehouse is still
    /// empty, then the unit cost, then the warehouse id.
    pub fn ranked_warehouses(solution: &Solution, store: usize) -> Vec<usize> {
        let problem = solution.problem();
        let store_data = problem.store(store);

        problem
            .warehouse_ids()
            .sorted_by_key(|&w| {
                let unit_cost = store_data.unit_cost(w);
                let opening = if solution.state(w).is_used() {
                    0
                } else {
                    problem.warehouse(w).fixed_cost
                };
                (unit_cost * store_data.demand + opening, unit_cost, w)
            })
            .collect()
    }

    /// Allocate as much of `remaining` as the warehouse allows; returns the
    /// allocated quantity.
    fn allocate(solution: &mut Solution, store: usize, warehouse: usize, remaining: u64) -> u64 {
        let free = solution.state(warehouse).remaining;
        if free <= 0 || solution.has_conflict(store, warehouse) {
            return 0;
        }

        let quantity = remaining.min(free as u64);
        solution.add_quantity(store, warehouse, quantity);
        trace!("Store {} -> warehouse {}: {} units", store, warehouse, quantity);
        quantity
    }
}
