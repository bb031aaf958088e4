//! Problem definition and data structures for the warehouse location problem.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// A warehouse that can be opened to supply stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: usize,
    pub capacity: u64,
    pub fixed_cost: u64,
}

impl Warehouse {
    /// Create a new warehouse.
    pub fn new(id: usize, capacity: u64, fixed_cost: u64) -> Self {
        Warehouse {
            id,
            capacity,
            fixed_cost,
        }
    }
}

/// A store with a demand and a unit supply cost per warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: usize,
    pub demand: u64,
    /// Cost of shipping one unit, indexed by warehouse id - 1
    pub supply_costs: Vec<u64>,
}

impl Store {
    /// Create a new store.
    pub fn new(id: usize, demand: u64, supply_costs: Vec<u64>) -> Self {
        Store {
            id,
            demand,
            supply_costs,
        }
    }

    /// Unit cost of supplying this store from the given warehouse.
    #[inline]
    pub fn unit_cost(&self, warehouse: usize) -> u64 {
        self.supply_costs[warehouse - 1]
    }
}

/// Represents a warehouse location problem instance.
///
/// Ids of warehouses and stores are dense and start at 1. The incompatibility
/// relation is symmetric by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    pub warehouses: Vec<Warehouse>,
    pub stores: Vec<Store>,
    incompatibilities: Vec<HashSet<usize>>,
}

impl Problem {
    /// Create a new problem, checking ids, capacities and cost vectors and
    /// symmetrising the incompatible pairs.
    pub fn new(
        name: String,
        warehouses: Vec<Warehouse>,
        stores: Vec<Store>,
        incompatible_pairs: &[(usize, usize)],
    ) -> Result<Self> {
        for (i, warehouse) in warehouses.iter().enumerate() {
            if warehouse.id != i + 1 {
                return Err(Error::InvalidInstance(format!(
                    "warehouse at position {} has id {}, expected {}",
                    i,
                    warehouse.id,
                    i + 1
                )));
            }
            if warehouse.capacity > i64::MAX as u64 {
                return Err(Error::InvalidInstance(format!(
                    "warehouse {} capacity {} exceeds {}",
                    warehouse.id,
                    warehouse.capacity,
                    i64::MAX
                )));
            }
        }

        for (i, store) in stores.iter().enumerate() {
            if store.id != i + 1 {
                return Err(Error::InvalidInstance(format!(
                    "store at position {} has id {}, expected {}",
                    i,
                    store.id,
                    i + 1
                )));
            }
            if store.demand == 0 {
                return Err(Error::InvalidInstance(format!(
                    "store {} has zero demand",
                    store.id
                )));
            }
            if store.supply_costs.len() != warehouses.len() {
                return Err(Error::InvalidInstance(format!(
                    "store {} has {} supply costs, expected {}",
                    store.id,
                    store.supply_costs.len(),
                    warehouses.len()
                )));
            }
        }

        let mut incompatibilities = vec![HashSet::new(); stores.len()];
        for &(a, b) in incompatible_pairs {
            let in_range = |s: usize| s >= 1 && s <= stores.len();
            if !in_range(a) || !in_range(b) {
                return Err(Error::InvalidInstance(format!(
                    "incompatible pair ({}, {}) references an unknown store",
                    a, b
                )));
            }
            if a == b {
                return Err(Error::InvalidInstance(format!(
                    "store {} cannot be incompatible with itself",
                    a
                )));
            }
            incompatibilities[a - 1].insert(b);
            incompatibilities[b - 1].insert(a);
        }

        Ok(Problem {
            name,
            warehouses,
            stores,
            incompatibilities,
        })
    }

    /// Get a warehouse by id.
    #[inline]
    pub fn warehouse(&self, id: usize) -> &Warehouse {
        &self.warehouses[id - 1]
    }

    /// Get a store by id.
    #[inline]
    pub fn store(&self, id: usize) -> &Store {
        &self.stores[id - 1]
    }

    /// Unit cost of supplying `store` from `warehouse`.
    #[inline]
    pub fn unit_cost(&self, store: usize, warehouse: usize) -> u64 {
        self.store(store).unit_cost(warehouse)
    }

    /// Stores that may never share a warehouse with `store`.
    #[inline]
    pub fn incompatible_with(&self, store: usize) -> &HashSet<usize> {
        &self.incompatibilities[store - 1]
    }

    /// Check whether two stores are incompatible.
    pub fn are_incompatible(&self, a: usize, b: usize) -> bool {
        self.incompatibilities[a - 1].contains(&b)
    }

    pub fn warehouse_count(&self) -> usize {
        self.warehouses.len()
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// All warehouse ids in ascending order.
    pub fn warehouse_ids(&self) -> RangeInclusive<usize> {
        1..=self.warehouses.len()
    }

    /// All store ids in ascending order.
    pub fn store_ids(&self) -> RangeInclusive<usize> {
        1..=self.stores.len()
    }

    /// Number of incompatible pairs in the instance.
    pub fn incompatible_pair_count(&self) -> usize {
        self.incompatibilities.iter().map(HashSet::len).sum::<usize>() / 2
    }

    pub fn total_demand(&self) -> u64 {
        self.stores.iter().map(|s| s.demand).sum()
    }

    pub fn total_capacity(&self) -> u64 {
        self.warehouses.iter().map(|w| w.capacity).sum()
    }

    /// Load a problem from a `.dzn` instance file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_dzn_str(name, &content)
    }

    /// Parse a problem from the contents of a `.dzn` instance file.
    ///
    /// Expected declarations: `Warehouses`, `Stores`, `Capacity`, `FixedCost`,
    /// `Goods`, `SupplyCost` (one `|`-separated row per store),
    /// `Incompatibilities` and `IncompatiblePairs`.
    pub fn from_dzn_str(name: String, content: &str) -> Result<Self> {
        let declarations = parse_declarations(content)?;

        let num_warehouses = scalar(&declarations, "Warehouses")?;
        let num_stores = scalar(&declarations, "Stores")?;

        let capacity = array(&declarations, "Capacity")?;
        let fixed_cost = array(&declarations, "FixedCost")?;
        let goods = array(&declarations, "Goods")?;

        expect_len("Capacity", capacity.len(), num_warehouses)?;
        expect_len("FixedCost", fixed_cost.len(), num_warehouses)?;
        expect_len("Goods", goods.len(), num_stores)?;

        let supply_costs = matrix(&declarations, "SupplyCost")?;
        expect_len("SupplyCost rows", supply_costs.len(), num_stores)?;
        for row in &supply_costs {
            expect_len("SupplyCost row", row.len(), num_warehouses)?;
        }

        let num_incompatibilities = scalar(&declarations, "Incompatibilities")?;
        let pair_rows = matrix(&declarations, "IncompatiblePairs")?;
        let mut pairs = Vec::with_capacity(pair_rows.len());
        for row in pair_rows {
            if row.len() != 2 {
                return Err(Error::Parse(format!(
                    "incompatible pair must have two entries, got {}",
                    row.len()
                )));
            }
            let (a, b) = (row[0] as usize, row[1] as usize);
            if a < 1 || a > num_stores || b < 1 || b > num_stores {
                return Err(Error::Parse(format!(
                    "invalid store id in incompatible pair: {}, {}",
                    a, b
                )));
            }
            pairs.push((a, b));
        }
        expect_len("IncompatiblePairs", pairs.len(), num_incompatibilities)?;

        let warehouses = capacity
            .iter()
            .zip(&fixed_cost)
            .enumerate()
            .map(|(i, (&cap, &cost))| Warehouse::new(i + 1, cap, cost))
            .collect();

        let stores = goods
            .iter()
            .zip(supply_costs)
            .enumerate()
            .map(|(i, (&demand, costs))| Store::new(i + 1, demand, costs))
            .collect();

        Problem::new(name, warehouses, stores, &pairs)
    }
}

/// Split `.dzn` content into `name = value` declarations, dropping `%` comments.
fn parse_declarations(content: &str) -> Result<HashMap<String, String>> {
    let stripped: String = content
        .lines()
        .map(|line| match line.find('%') {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut declarations = HashMap::new();
    for statement in stripped.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        let (key, value) = statement
            .split_once('=')
            .ok_or_else(|| Error::Parse(format!("malformed declaration: {}", statement)))?;
        declarations.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(declarations)
}

fn lookup<'a>(declarations: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    declarations
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::Parse(format!("{} not found", key)))
}

fn parse_number(token: &str, key: &str) -> Result<u64> {
    token
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Parse(format!("{}: invalid number '{}'", key, token.trim())))
}

fn scalar(declarations: &HashMap<String, String>, key: &str) -> Result<usize> {
    parse_number(lookup(declarations, key)?, key).map(|n| n as usize)
}

fn brackets<'a>(value: &'a str, key: &str) -> Result<&'a str> {
    value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| Error::Parse(format!("{} array is malformed", key)))
}

fn array(declarations: &HashMap<String, String>, key: &str) -> Result<Vec<u64>> {
    let inner = brackets(lookup(declarations, key)?, key)?;
    inner
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| parse_number(t, key))
        .collect()
}

fn matrix(declarations: &HashMap<String, String>, key: &str) -> Result<Vec<Vec<u64>>> {
    let inner = brackets(lookup(declarations, key)?, key)?;
    inner
        .split('|')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .map(|row| {
            row.split(',')
                .filter(|t| !t.trim().is_empty())
                .map(|t| parse_number(t, key))
                .collect()
        })
        .collect()
}

fn expect_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::Parse(format!(
            "expected {} {} values, got {}",
            expected, what, actual
        )));
    }
    Ok(())
}
