//! Cost delta helpers shared by the neighborhoods.

use crate::solution::Solution;

/// Fixed cost incurred if `warehouse` is opened by the move.
pub fn opening_cost(solution: &Solution, warehouse: usize) -> i64 {
    if solution.state(warehouse).is_used() {
        0
    } else {
        solution.problem().warehouse(warehouse).fixed_cost as i64
    }
}

/// Fixed cost saved if `store` leaving `warehouse` empties it.
///
/// Assumes the store withdraws its whole quantity from the warehouse.
pub fn closing_saving(solution: &Solution, store: usize, warehouse: usize) -> i64 {
    let state = solution.state(warehouse);
    if state.assigned_stores.len() == 1 && state.assigned_stores.contains(&store) {
        solution.problem().warehouse(warehouse).fixed_cost as i64
    } else {
        0
    }
}

/// Total cost change of moving `quantity` units of `store` from `from` to `to`.
pub fn relocate_delta(
    solution: &Solution,
    store: usize,
    from: usize,
    to: usize,
    quantity: u64,
) -> i64 {
    let problem = solution.problem();
    let q = quantity as i64;
    let supply_delta =
        q * problem.unit_cost(store, to) as i64 - q * problem.unit_cost(store, from) as i64;

    let closing = if solution.quantity(store, from) == quantity {
        closing_saving(solution, store, from)
    } else {
        0
    };

    supply_delta + opening_cost(solution, to) - closing
}

/// Total cost change of exchanging the warehouses of two assignments: `s1`
/// moves `q1` units from `w1` to `w2`, `s2` moves `q2` units from `w2` to `w1`.
///
/// Both warehouses stay in use, so only supply costs change.
pub fn swap_delta(
    solution: &Solution,
    (s1, w1, q1): (usize, usize, u64),
    (s2, w2, q2): (usize, usize, u64),
) -> i64 {
    let problem = solution.problem();
    let current = q1 * problem.unit_cost(s1, w1) + q2 * problem.unit_cost(s2, w2);
    let new = q1 * problem.unit_cost(s1, w2) + q2 * problem.unit_cost(s2, w1);
    new as i64 - current as i64
}
