//! Unit tests for the relocate and swap neighborhoods and the local search loop.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use warehouse_ils::config::{Config, StoreOrder};
use warehouse_ils::construction::Construction;
use warehouse_ils::local_search::{LocalSearch, Termination};
use warehouse_ils::problem::{Problem, Store, Warehouse};
use warehouse_ils::solution::{Assignment, Solution};
use warehouse_ils::validator;

fn local_search() -> LocalSearch {
    LocalSearch::from_config(&Config::default())
}

fn problem(
    warehouses: Vec<Warehouse>,
    stores: Vec<Store>,
    pairs: &[(usize, usize)],
) -> Arc<Problem> {
    Arc::new(Problem::new("TestProblem".to_string(), warehouses, stores, pairs).unwrap())
}

/// Creates a moderate instance where the greedy start leaves room for improvement.
fn create_moderate_problem() -> Arc<Problem> {
    let warehouses: Vec<Warehouse> = (1..=6)
        .map(|w| Warehouse::new(w, 30, 40 + 15 * w as u64))
        .collect();
    let stores: Vec<Store> = (1..=15)
        .map(|s| {
            let costs = (1..=6).map(|w| ((s * 7 + w * 11) % 13 + 1) as u64).collect();
            Store::new(s, (s % 4 + 2) as u64, costs)
        })
        .collect();

    problem(warehouses, stores, &[(1, 2), (3, 4), (5, 6), (1, 7), (8, 9)])
}

fn construct(problem: &Arc<Problem>) -> Solution {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    Construction::new(StoreOrder::MostConstrained)
        .build(problem, &mut rng)
        .unwrap()
}

#[test]
fn test_relocate_to_cheaper_warehouse() {
    let problem = problem(
        vec![Warehouse::new(1, 10, 10), Warehouse::new(2, 10, 10)],
        vec![Store::new(1, 5, vec![5, 3])],
        &[],
    );
    let mut solution = Solution::from_triples(problem, &[(1, 1, 5)]);
    assert_eq!(solution.cost(), 35);

    let improved = local_search().relocate_neighborhood(&mut solution);

    assert!(improved);
    assert_eq!(solution.assignments_of(1), &[Assignment::new(2, 5)]);
    assert_eq!(solution.cost(), 25);
    assert!(solution.unused_warehouses.contains(&1));
    assert!(solution.used_warehouses.contains(&2));
    assert!(validator::is_valid(&solution));
}

#[test]
fn test_relocate_respects_opening_cost() {
    // Saving 2 per unit on 5 units does not pay for opening warehouse 2
    let problem = problem(
        vec![Warehouse::new(1, 20, 10), Warehouse::new(2, 20, 100)],
        vec![Store::new(1, 5, vec![5, 3]), Store::new(2, 5, vec![1, 9])],
        &[],
    );
    let mut solution = Solution::from_triples(problem, &[(1, 1, 5), (2, 1, 5)]);
    let before = solution.clone();

    assert!(!local_search().relocate_neighborhood(&mut solution));
    assert_eq!(solution, before);
}

#[test]
fn test_relocate_respects_incompatibility_and_capacity() {
    let problem = problem(
        vec![
            Warehouse::new(1, 10, 0),
            Warehouse::new(2, 10, 0),
            Warehouse::new(3, 4, 0),
        ],
        vec![Store::new(1, 5, vec![5, 1, 1]), Store::new(2, 5, vec![9, 1, 9])],
        &[(1, 2)],
    );
    let mut solution = Solution::from_triples(problem, &[(1, 1, 5), (2, 2, 5)]);

    // Warehouse 2 hosts an incompatible store, warehouse 3 is too small
    let improved = local_search().relocate_neighborhood(&mut solution);

    assert!(!improved);
    assert_eq!(solution.assignments_of(1), &[Assignment::new(1, 5)]);
}

#[test]
fn test_relocate_never_increases_cost() {
    let problem = create_moderate_problem();
    let mut solution = construct(&problem);
    let ls = local_search();

    for _ in 0..10 {
        let before = solution.cost();
        let improved = ls.relocate_neighborhood(&mut solution);
        let after = solution.cost();

        assert!(after <= before);
        if improved {
            assert!(after < before);
        }
        assert!(validator::is_valid(&solution));
    }
}

#[test]
fn test_swap_exchanges_warehouses() {
    // Both warehouses are full, so only an exchange can help
    let problem = problem(
        vec![Warehouse::new(1, 5, 10), Warehouse::new(2, 5, 10)],
        vec![Store::new(1, 5, vec![4, 1]), Store::new(2, 5, vec![1, 4])],
        &[],
    );
    let mut solution = Solution::from_triples(problem, &[(1, 1, 5), (2, 2, 5)]);
    let ls = local_search();
    assert_eq!(solution.cost(), 60);
    assert!(!ls.relocate_neighborhood(&mut solution.clone()));

    let swap = LocalSearch::find_swap(&solution).unwrap();
    assert_eq!(swap.first, (1, 1, 5));
    assert_eq!(swap.second, (2, 2, 5));
    assert_eq!(swap.delta, -30);

    assert!(ls.swap_neighborhood(&mut solution));
    assert_eq!(solution.cost(), 30);
    assert_eq!(solution.assignments_of(1), &[Assignment::new(2, 5)]);
    assert_eq!(solution.assignments_of(2), &[Assignment::new(1, 5)]);
    assert!(validator::is_valid(&solution));

    // Exactly one improving swap existed
    assert!(!ls.swap_neighborhood(&mut solution));
}

#[test]
fn test_swap_keeps_demand_with_unequal_quantities() {
    let problem = problem(
        vec![Warehouse::new(1, 5, 0), Warehouse::new(2, 5, 0)],
        vec![Store::new(1, 3, vec![4, 1]), Store::new(2, 5, vec![1, 4])],
        &[],
    );
    let mut solution = Solution::from_triples(problem, &[(1, 1, 3), (2, 2, 5)]);
    assert_eq!(solution.cost(), 32);

    assert!(local_search().swap_neighborhood(&mut solution));

    assert_eq!(solution.assignments_of(1), &[Assignment::new(2, 3)]);
    assert_eq!(solution.assignments_of(2), &[Assignment::new(1, 5)]);
    assert_eq!(solution.cost(), 8);
    assert_eq!(solution.state(1).remaining, 0);
    assert_eq!(solution.state(2).remaining, 2);
    assert!(validator::is_valid(&solution));
}

#[test]
fn test_swap_skips_incompatible_stores() {
    let problem = problem(
        vec![Warehouse::new(1, 5, 10), Warehouse::new(2, 5, 10)],
        vec![Store::new(1, 5, vec![4, 1]), Store::new(2, 5, vec![1, 4])],
        &[(1, 2)],
    );
    let mut solution = Solution::from_triples(problem, &[(1, 1, 5), (2, 2, 5)]);

    assert!(LocalSearch::find_swap(&solution).is_none());
    assert!(!local_search().swap_neighborhood(&mut solution));
}

#[test]
fn test_swap_checks_third_party_incompatibility() {
    // Store 3 shares warehouse 2 with store 2 and conflicts with store 1
    let problem = problem(
        vec![Warehouse::new(1, 5, 0), Warehouse::new(2, 10, 0)],
        vec![
            Store::new(1, 5, vec![4, 1]),
            Store::new(2, 5, vec![1, 4]),
            Store::new(3, 5, vec![9, 1]),
        ],
        &[(1, 3)],
    );
    let solution = Solution::from_triples(problem, &[(1, 1, 5), (2, 2, 5), (3, 2, 5)]);

    assert!(LocalSearch::find_swap(&solution).is_none());
}

#[test]
fn test_swap_never_increases_cost() {
    let problem = create_moderate_problem();
    let mut solution = construct(&problem);
    let ls = local_search();

    for _ in 0..10 {
        let before = solution.cost();
        ls.swap_neighborhood(&mut solution);
        assert!(solution.cost() <= before);
        assert!(validator::is_valid(&solution));
    }
}

#[test]
fn test_local_search_improves_and_converges() {
    let problem = create_moderate_problem();
    let mut solution = construct(&problem);
    let initial_cost = solution.cost();

    let ls = LocalSearch::new(3, 10_000, 3);
    let outcome = ls.run(&mut solution);

    assert_eq!(outcome.cost, solution.cost());
    assert!(outcome.cost <= initial_cost);
    assert_eq!(outcome.improved, outcome.cost < initial_cost);
    assert_eq!(outcome.termination, Termination::Converged);
    assert!(validator::is_valid(&solution));
}

#[test]
fn test_local_search_is_idempotent_after_convergence() {
    let problem = create_moderate_problem();
    let mut solution = construct(&problem);
    let ls = LocalSearch::new(3, 10_000, 3);
    ls.run(&mut solution);

    let converged = solution.clone();
    let outcome = ls.run(&mut solution);

    assert!(!outcome.improved);
    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.termination, Termination::Converged);
    assert_eq!(solution, converged);
}

#[test]
fn test_local_search_round_limit() {
    let problem = create_moderate_problem();
    let mut solution = construct(&problem);

    let outcome = LocalSearch::new(1, 0, 3).run(&mut solution);

    assert_eq!(outcome.rounds, 0);
    assert_eq!(outcome.termination, Termination::RoundLimit);
    assert!(!outcome.improved);
}

#[test]
fn test_every_round_improves_until_convergence() {
    // A single tolerated non-improving round would stop on stagnation
    let problem = create_moderate_problem();
    let mut solution = construct(&problem);
    let initial_cost = solution.cost();

    let outcome = LocalSearch::new(1, 10_000, 1).run(&mut solution);

    assert_eq!(outcome.termination, Termination::Converged);
    assert_eq!(outcome.cost, solution.cost());
    assert!(outcome.rounds == 1 || outcome.cost < initial_cost);
    assert!(validator::is_valid(&solution));
}
