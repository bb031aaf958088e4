//! # Warehouse ILS
//!
//! Iterated Local Search for the capacitated warehouse location problem with
//! store incompatibilities: every store's demand is split over warehouses so
//! that fixed opening costs plus per-unit supply costs are minimized, without
//! exceeding warehouse capacities and without two incompatible stores sharing
//! a warehouse.
//!
//! The search builds a greedy initial solution, improves it with the relocate
//! and swap neighborhoods, and then alternates randomized perturbation with
//! local search, accepting only improving candidates.

pub mod config;
pub mod construction;
pub mod error;
pub mod ils;
pub mod local_search;
pub mod perturbation;
pub mod problem;
pub mod solution;
pub mod utils;
pub mod validator;

use crate::config::Config;
use crate::construction::Construction;
use crate::error::Result;
use crate::ils::{IlsResult, IteratedLocalSearch};
use crate::problem::Problem;
use crate::solution::Solution;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use crate::error::Error;

/// The main algorithm structure: construction, then ILS, then certification
/// of the best solution.
pub struct WarehouseIls {
    pub problem: Arc<Problem>,
    pub config: Config,
    pub initial_solution: Option<Solution>,
    pub run_time: Duration,
}

impl WarehouseIls {
    /// Create a new solver for the given problem and configuration.
    pub fn new(problem: Problem, config: Config) -> Self {
        WarehouseIls::with_shared_problem(Arc::new(problem), config)
    }

    /// Create a solver for a problem that is already shared.
    pub fn with_shared_problem(problem: Arc<Problem>, config: Config) -> Self {
        WarehouseIls {
            problem,
            config,
            initial_solution: None,
            run_time: Duration::from_secs(0),
        }
    }

    /// Run the full pipeline with the configured seed.
    pub fn run(&mut self) -> Result<IlsResult> {
        let start_time = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        info!(
            "Solving {}: {} warehouses, {} stores, {} incompatible pairs",
            self.problem.name,
            self.problem.warehouse_count(),
            self.problem.store_count(),
            self.problem.incompatible_pair_count()
        );

        let initial =
            Construction::new(self.config.store_order).build(&self.problem, &mut rng)?;
        validator::validate(&initial)?;
        self.initial_solution = Some(initial.clone());

        let mut ils = IteratedLocalSearch::new(self.config.clone());
        let result = ils.run(initial, &mut rng);
        validator::validate(&result.best)?;

        self.run_time = start_time.elapsed();
        info!(
            "Solved {} in {}: cost {} -> {}",
            self.problem.name,
            utils::format_duration(self.run_time),
            result.initial_cost,
            result.best_cost
        );

        Ok(result)
    }
}
