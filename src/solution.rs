//! Solution representation for the warehouse location problem.

use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A positive quantity of a store's demand routed through a warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub warehouse: usize,
    pub quantity: u64,
}

impl Assignment {
    pub fn new(warehouse: usize, quantity: u64) -> Self {
        Assignment {
            warehouse,
            quantity,
        }
    }
}

/// Mutable bookkeeping for a single warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseState {
    /// Capacity minus the quantity currently routed through the warehouse
    pub remaining: i64,
    /// Stores with a positive quantity at this warehouse
    pub assigned_stores: BTreeSet<usize>,
}

impl WarehouseState {
    /// Create the state of an empty warehouse.
    pub fn new(capacity: u64) -> Self {
        WarehouseState {
            remaining: capacity as i64,
            assigned_stores: BTreeSet::new(),
        }
    }

    /// Check if at least one store is served by this warehouse.
    pub fn is_used(&self) -> bool {
        !self.assigned_stores.is_empty()
    }

    /// Check if the warehouse can absorb `quantity` more units.
    pub fn has_room_for(&self, quantity: u64) -> bool {
        self.remaining >= quantity as i64
    }
}

/// Represents a complete (or partial, during construction) solution.
///
/// A solution owns its assignments and warehouse states and shares the
/// read-only problem instance. Cloning gives an independent copy.
#[derive(Clone)]
pub struct Solution {
    problem: Arc<Problem>,
    /// Assignments per store, indexed by store id - 1
    pub assignments: Vec<Vec<Assignment>>,
    /// Warehouse states, indexed by warehouse id - 1
    pub warehouse_states: Vec<WarehouseState>,
    pub used_warehouses: BTreeSet<usize>,
    pub unused_warehouses: BTreeSet<usize>,
}

impl Solution {
    /// Create an empty solution where every warehouse is unused.
    pub fn new(problem: Arc<Problem>) -> Self {
        let warehouse_states = problem
            .warehouses
            .iter()
            .map(|w| WarehouseState::new(w.capacity))
            .collect();

        Solution {
            assignments: vec![Vec::new(); problem.store_count()],
            warehouse_states,
            used_warehouses: BTreeSet::new(),
            unused_warehouses: problem.warehouse_ids().collect(),
            problem,
        }
    }

    /// Build a solution from `(store, warehouse, quantity)` triples.
    ///
    /// No feasibility checks are made; use the validator to certify the result.
    pub fn from_triples(problem: Arc<Problem>, triples: &[(usize, usize, u64)]) -> Self {
        let mut solution = Solution::new(problem);
        for &(store, warehouse, quantity) in triples {
            if quantity > 0 {
                solution.add_quantity(store, warehouse, quantity);
            }
        }
        solution
    }

    /// The problem instance this solution belongs to.
    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    /// The assignments of a store.
    pub fn assignments_of(&self, store: usize) -> &[Assignment] {
        &self.assignments[store - 1]
    }

    /// The bookkeeping state of a warehouse.
    pub fn state(&self, warehouse: usize) -> &WarehouseState {
        &self.warehouse_states[warehouse - 1]
    }

    /// Quantity of `store` served by `warehouse`.
    pub fn quantity(&self, store: usize, warehouse: usize) -> u64 {
        self.assignments[store - 1]
            .iter()
            .find(|a| a.warehouse == warehouse)
            .map_or(0, |a| a.quantity)
    }

    /// Total quantity currently assigned to a store.
    pub fn assigned_quantity(&self, store: usize) -> u64 {
        self.assignments[store - 1].iter().map(|a| a.quantity).sum()
    }

    /// Check if `store` is incompatible with any store served by `warehouse`.
    pub fn has_conflict(&self, store: usize, warehouse: usize) -> bool {
        let incompatible = self.problem.incompatible_with(store);
        if incompatible.is_empty() {
            return false;
        }
        self.warehouse_states[warehouse - 1]
            .assigned_stores
            .iter()
            .any(|s| incompatible.contains(s))
    }

    /// Check if `warehouse` can take `quantity` units of `store` without
    /// breaking capacity or incompatibility constraints.
    pub fn can_host(&self, store: usize, warehouse: usize, quantity: u64) -> bool {
        self.warehouse_states[warehouse - 1].has_room_for(quantity)
            && !self.has_conflict(store, warehouse)
    }

    /// Route `quantity` more units of `store` through `warehouse`.
    ///
    /// Merges into an existing pair for the same warehouse and keeps the
    /// warehouse state and the used/unused partition in sync.
    pub fn add_quantity(&mut self, store: usize, warehouse: usize, quantity: u64) {
        debug_assert!(quantity > 0, "assignments must carry a positive quantity");

        let assignments = &mut self.assignments[store - 1];
        match assignments.iter_mut().find(|a| a.warehouse == warehouse) {
            Some(existing) => existing.quantity += quantity,
            None => assignments.push(Assignment::new(warehouse, quantity)),
        }

        let state = &mut self.warehouse_states[warehouse - 1];
        state.remaining -= quantity as i64;
        state.assigned_stores.insert(store);

        if self.unused_warehouses.remove(&warehouse) {
            self.used_warehouses.insert(warehouse);
        }
    }

    /// Withdraw `quantity` units of `store` from `warehouse`.
    ///
    /// Drops the pair when its quantity reaches zero and releases the
    /// warehouse when no store is left on it.
    pub fn remove_quantity(&mut self, store: usize, warehouse: usize, quantity: u64) {
        let assignments = &mut self.assignments[store - 1];
        let Some(pos) = assignments.iter().position(|a| a.warehouse == warehouse) else {
            debug_assert!(false, "store {} is not served by warehouse {}", store, warehouse);
            return;
        };

        debug_assert!(assignments[pos].quantity >= quantity);
        let removed = quantity.min(assignments[pos].quantity);
        assignments[pos].quantity -= removed;
        let emptied = assignments[pos].quantity == 0;
        if emptied {
            assignments.remove(pos);
        }

        let state = &mut self.warehouse_states[warehouse - 1];
        state.remaining += removed as i64;
        if emptied {
            state.assigned_stores.remove(&store);
            if state.assigned_stores.is_empty() {
                self.used_warehouses.remove(&warehouse);
                self.unused_warehouses.insert(warehouse);
            }
        }
    }

    /// Move `quantity` units of `store` from one warehouse to another.
    pub fn transfer(&mut self, store: usize, from: usize, to: usize, quantity: u64) {
        self.remove_quantity(store, from, quantity);
        self.add_quantity(store, to, quantity);
    }

    /// Sum of the fixed costs of all used warehouses.
    pub fn fixed_cost(&self) -> u64 {
        self.used_warehouses
            .iter()
            .map(|&w| self.problem.warehouse(w).fixed_cost)
            .sum()
    }

    /// Sum of `quantity × unit cost` over all assignments.
    pub fn supply_cost(&self) -> u64 {
        self.assignments
            .iter()
            .enumerate()
            .flat_map(|(i, assignments)| {
                let store = self.problem.store(i + 1);
                assignments
                    .iter()
                    .map(move |a| a.quantity * store.unit_cost(a.warehouse))
            })
            .sum()
    }

    /// Total cost: fixed costs of used warehouses plus supply costs.
    pub fn cost(&self) -> u64 {
        self.fixed_cost() + self.supply_cost()
    }

    /// Flatten the solution into `(store, warehouse, quantity)` triples,
    /// ordered by store id.
    pub fn triples(&self) -> Vec<(usize, usize, u64)> {
        self.assignments
            .iter()
            .enumerate()
            .flat_map(|(i, assignments)| {
                assignments
                    .iter()
                    .map(move |a| (i + 1, a.warehouse, a.quantity))
            })
            .collect()
    }

    /// Number of warehouses currently in use.
    pub fn used_count(&self) -> usize {
        self.used_warehouses.len()
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.problem, &other.problem)
            && self.assignments == other.assignments
            && self.warehouse_states == other.warehouse_states
            && self.used_warehouses == other.used_warehouses
            && self.unused_warehouses == other.unused_warehouses
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Cost: {}", self.cost())?;
        writeln!(f, "  Fixed Cost: {}", self.fixed_cost())?;
        writeln!(f, "  Supply Cost: {}", self.supply_cost())?;
        writeln!(f, "  Used Warehouses: {:?}", self.used_warehouses)?;

        for (i, assignments) in self.assignments.iter().enumerate() {
            write!(f, "  Store {}:", i + 1)?;
            for a in assignments {
                write!(f, " ({}, {})", a.warehouse, a.quantity)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
