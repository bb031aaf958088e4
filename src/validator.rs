//! Independent feasibility check of a solution.
//!
//! Everything is recomputed from the assignments and the problem instance;
//! the warehouse states of the solution are only compared against the
//! recomputed values, never trusted.

use crate::solution::Solution;
use std::collections::BTreeSet;
use thiserror::Error;

/// The first broken invariant found in a solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("store {store} demand not met (required: {required}, got: {assigned})")]
    DemandMismatch {
        store: usize,
        required: u64,
        assigned: u64,
    },

    #[error("store {store} has a zero quantity assignment to warehouse {warehouse}")]
    ZeroQuantity { store: usize, warehouse: usize },

    #[error("store {store} references unknown warehouse {warehouse}")]
    UnknownWarehouse { store: usize, warehouse: usize },

    #[error("warehouse {warehouse} over capacity (capacity: {capacity}, used: {used})")]
    CapacityExceeded {
        warehouse: usize,
        capacity: u64,
        used: u64,
    },

    #[error("incompatible stores {first} and {second} both assigned to warehouse {warehouse}")]
    IncompatibleStores {
        warehouse: usize,
        first: usize,
        second: usize,
    },

    #[error("warehouse {warehouse} bookkeeping does not match its assignments")]
    StateMismatch { warehouse: usize },

    #[error("used/unused warehouse sets do not match the assignments")]
    UsageMismatch,
}

/// Validate a solution against the problem it was built for.
pub fn validate(solution: &Solution) -> Result<(), Violation> {
    let problem = solution.problem();
    let warehouse_count = problem.warehouse_count();

    let mut load = vec![0u64; warehouse_count];
    let mut stores_at: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); warehouse_count];

    for store in problem.store_ids() {
        let mut assigned = 0;
        for a in solution.assignments_of(store) {
            if a.warehouse < 1 || a.warehouse > warehouse_count {
                return Err(Violation::UnknownWarehouse {
                    store,
                    warehouse: a.warehouse,
                });
            }
            if a.quantity == 0 {
                return Err(Violation::ZeroQuantity {
                    store,
                    warehouse: a.warehouse,
                });
            }
            assigned += a.quantity;
            load[a.warehouse - 1] += a.quantity;
            stores_at[a.warehouse - 1].insert(store);
        }

        let required = problem.store(store).demand;
        if assigned != required {
            return Err(Violation::DemandMismatch {
                store,
                required,
                assigned,
            });
        }
    }

    for warehouse in problem.warehouse_ids() {
        let capacity = problem.warehouse(warehouse).capacity;
        let used = load[warehouse - 1];
        if used > capacity {
            return Err(Violation::CapacityExceeded {
                warehouse,
                capacity,
                used,
            });
        }

        let stores = &stores_at[warehouse - 1];
        for &first in stores {
            if let Some(&second) = problem
                .incompatible_with(first)
                .iter()
                .filter(|&&s| stores.contains(&s))
                .min()
            {
                return Err(Violation::IncompatibleStores {
                    warehouse,
                    first,
                    second,
                });
            }
        }

        let state = solution.state(warehouse);
        if state.remaining != capacity as i64 - used as i64 || &state.assigned_stores != stores {
            return Err(Violation::StateMismatch { warehouse });
        }
    }

    let used: BTreeSet<usize> = problem
        .warehouse_ids()
        .filter(|&w| !stores_at[w - 1].is_empty())
        .collect();
    let unused: BTreeSet<usize> = problem
        .warehouse_ids()
        .filter(|w| !used.contains(w))
        .collect();
    if solution.used_warehouses != used || solution.unused_warehouses != unused {
        return Err(Violation::UsageMismatch);
    }

    Ok(())
}

/// Check if a solution is feasible.
pub fn is_valid(solution: &Solution) -> bool {
    validate(solution).is_ok()
}

/// Panic in debug builds if an operator left the solution inconsistent.
#[inline]
pub fn debug_assert_valid(solution: &Solution) {
    if cfg!(debug_assertions) {
        if let Err(violation) = validate(solution) {
            panic!("solution invariant violated: {}", violation);
        }
    }
}
