//! Unit tests for the problem model and the `.dzn` instance parser.

use warehouse_ils::problem::{Problem, Store, Warehouse};
use warehouse_ils::Error;

const SMALL_INSTANCE: &str = "
% small test instance
Warehouses = 3;
Stores = 2;
Capacity = [10, 20, 15];
FixedCost = [100, 50, 80];
Goods = [5, 7];
SupplyCost = [| 1, 2, 3
              | 4, 5, 6 |];
Incompatibilities = 1;
IncompatiblePairs = [| 1, 2 |];
";

/// Creates a simple problem with two warehouses and three stores.
fn create_test_problem() -> Problem {
    let warehouses = vec![Warehouse::new(1, 10, 100), Warehouse::new(2, 15, 50)];
    let stores = vec![
        Store::new(1, 4, vec![2, 3]),
        Store::new(2, 6, vec![1, 5]),
        Store::new(3, 5, vec![4, 4]),
    ];

    Problem::new("TestProblem".to_string(), warehouses, stores, &[(1, 3)]).unwrap()
}

#[test]
fn test_problem_accessors() {
    let problem = create_test_problem();

    assert_eq!(problem.warehouse_count(), 2);
    assert_eq!(problem.store_count(), 3);
    assert_eq!(problem.warehouse(2).fixed_cost, 50);
    assert_eq!(problem.store(2).demand, 6);
    assert_eq!(problem.unit_cost(1, 2), 3);
    assert_eq!(problem.unit_cost(2, 1), 1);
    assert_eq!(problem.total_demand(), 15);
    assert_eq!(problem.total_capacity(), 25);
    assert_eq!(problem.warehouse_ids().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(problem.store_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_incompatibilities_are_symmetric() {
    let problem = create_test_problem();

    assert!(problem.are_incompatible(1, 3));
    assert!(problem.are_incompatible(3, 1));
    assert!(!problem.are_incompatible(1, 2));
    assert!(problem.incompatible_with(2).is_empty());
    assert_eq!(problem.incompatible_pair_count(), 1);
}

#[test]
fn test_duplicate_pairs_are_merged() {
    let warehouses = vec![Warehouse::new(1, 10, 0)];
    let stores = vec![Store::new(1, 1, vec![1]), Store::new(2, 1, vec![1])];

    let problem =
        Problem::new("Dup".to_string(), warehouses, stores, &[(1, 2), (2, 1)]).unwrap();

    assert_eq!(problem.incompatible_with(1).len(), 1);
    assert_eq!(problem.incompatible_pair_count(), 1);
}

#[test]
fn test_invalid_instances_are_rejected() {
    let warehouses = vec![Warehouse::new(1, 10, 0), Warehouse::new(2, 10, 0)];

    // Cost vector of the wrong length
    let stores = vec![Store::new(1, 3, vec![1])];
    let result = Problem::new("Bad".to_string(), warehouses.clone(), stores, &[]);
    assert!(matches!(result, Err(Error::InvalidInstance(_))));

    // Zero demand
    let stores = vec![Store::new(1, 0, vec![1, 1])];
    let result = Problem::new("Bad".to_string(), warehouses.clone(), stores, &[]);
    assert!(matches!(result, Err(Error::InvalidInstance(_))));

    // Pair with an unknown store
    let stores = vec![Store::new(1, 3, vec![1, 1])];
    let result = Problem::new("Bad".to_string(), warehouses.clone(), stores, &[(1, 2)]);
    assert!(matches!(result, Err(Error::InvalidInstance(_))));

    // Non-dense ids
    let stores = vec![Store::new(2, 3, vec![1, 1])];
    let result = Problem::new("Bad".to_string(), warehouses, stores, &[]);
    assert!(matches!(result, Err(Error::InvalidInstance(_))));
}

#[test]
fn test_capacity_must_fit_remaining_counter() {
    let stores = vec![Store::new(1, 3, vec![1])];

    let largest = vec![Warehouse::new(1, i64::MAX as u64, 0)];
    assert!(Problem::new("Large".to_string(), largest, stores.clone(), &[]).is_ok());

    let too_large = vec![Warehouse::new(1, i64::MAX as u64 + 1, 0)];
    let result = Problem::new("Huge".to_string(), too_large, stores, &[]);
    assert!(matches!(result, Err(Error::InvalidInstance(_))));
}

#[test]
fn test_parse_dzn() {
    let problem = Problem::from_dzn_str("small".to_string(), SMALL_INSTANCE).unwrap();

    assert_eq!(problem.name, "small");
    assert_eq!(problem.warehouse_count(), 3);
    assert_eq!(problem.store_count(), 2);

    assert_eq!(problem.warehouse(1), &Warehouse::new(1, 10, 100));
    assert_eq!(problem.warehouse(3), &Warehouse::new(3, 15, 80));

    assert_eq!(problem.store(1).demand, 5);
    assert_eq!(problem.store(2).supply_costs, vec![4, 5, 6]);

    assert!(problem.are_incompatible(2, 1));
}

#[test]
fn test_parse_dzn_without_incompatibilities() {
    let content = "
Warehouses = 1;
Stores = 1;
Capacity = [5];
FixedCost = [7];
Goods = [3];
SupplyCost = [| 2 |];
Incompatibilities = 0;
IncompatiblePairs = [];
";
    let problem = Problem::from_dzn_str("empty".to_string(), content).unwrap();

    assert_eq!(problem.incompatible_pair_count(), 0);
    assert_eq!(problem.unit_cost(1, 1), 2);
}

#[test]
fn test_parse_dzn_count_mismatch() {
    let content = SMALL_INSTANCE.replace("Goods = [5, 7];", "Goods = [5];");
    let result = Problem::from_dzn_str("bad".to_string(), &content);
    assert!(matches!(result, Err(Error::Parse(_))));

    let content = SMALL_INSTANCE.replace("Incompatibilities = 1;", "Incompatibilities = 2;");
    let result = Problem::from_dzn_str("bad".to_string(), &content);
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_parse_dzn_missing_and_malformed() {
    let content = SMALL_INSTANCE.replace("Capacity = [10, 20, 15];", "");
    let result = Problem::from_dzn_str("bad".to_string(), &content);
    assert!(matches!(result, Err(Error::Parse(_))));

    let content = SMALL_INSTANCE.replace("[10, 20, 15]", "[10, x, 15]");
    let result = Problem::from_dzn_str("bad".to_string(), &content);
    assert!(matches!(result, Err(Error::Parse(_))));

    let content = SMALL_INSTANCE.replace("[| 1, 2 |]", "[| 1, 9 |]");
    let result = Problem::from_dzn_str("bad".to_string(), &content);
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join("warehouse_ils_problem_test.dzn");
    std::fs::write(&path, SMALL_INSTANCE).unwrap();

    let problem = Problem::from_file(&path).unwrap();
    assert_eq!(problem.name, "warehouse_ils_problem_test");
    assert_eq!(problem.store_count(), 2);

    std::fs::remove_file(&path).unwrap();

    let missing = Problem::from_file(&path);
    assert!(matches!(missing, Err(Error::Io(_))));
}
