//! Configuration parameters for the warehouse ILS solver.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Order in which the constructive heuristic places stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreOrder {
    /// Stores with the most incompatibilities first
    MostConstrained,
    /// Seeded random order
    Shuffled,
}

/// Configuration settings for construction, local search and ILS.
///
/// Fields missing from a serialized configuration take their default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for the random generator used by construction and perturbation
    pub seed: u64,
    /// Store processing order of the constructive heuristic
    pub store_order: StoreOrder,
    /// Maximum number of ILS iterations
    pub max_iterations: u32,
    /// Perturbation strength at the start of the search
    pub initial_strength: f64,
    /// Lower bound of the adaptive perturbation strength
    pub min_strength: f64,
    /// Upper bound of the adaptive perturbation strength
    pub max_strength: f64,
    /// Relative change applied to the strength on adaptation
    pub strength_step: f64,
    /// Non-improving iterations tolerated before the strength grows
    pub stagnation_threshold: u32,
    /// Probability of picking a random rather than the cheapest alternative
    /// warehouse during perturbation
    pub random_choice_probability: f64,
    /// Consecutive applications of one operator within a local search round
    pub operator_attempts: u32,
    /// Maximum number of local search rounds
    pub max_local_search_rounds: u32,
    /// Consecutive non-improving rounds after which local search stops
    pub max_rounds_without_improvement: u32,
    /// Optional time limit for the ILS loop
    pub time_limit: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: 42,
            store_order: StoreOrder::MostConstrained,
            max_iterations: 1000,
            initial_strength: 0.2,
            min_strength: 0.1,
            max_strength: 0.5,
            strength_step: 0.1,
            stagnation_threshold: 5,
            random_choice_probability: 0.7,
            operator_attempts: 3,
            max_local_search_rounds: 100,
            max_rounds_without_improvement: 3,
            time_limit: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the store order of the constructive heuristic.
    pub fn with_store_order(mut self, order: StoreOrder) -> Self {
        self.store_order = order;
        self
    }

    /// Set the maximum number of ILS iterations.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the initial perturbation strength.
    pub fn with_initial_strength(mut self, strength: f64) -> Self {
        self.initial_strength = strength;
        self
    }

    /// Set the bounds of the adaptive perturbation strength.
    pub fn with_strength_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_strength = min;
        self.max_strength = max;
        self
    }

    /// Set the number of operator applications per local search round.
    pub fn with_operator_attempts(mut self, attempts: u32) -> Self {
        self.operator_attempts = attempts;
        self
    }

    /// Set the maximum number of local search rounds.
    pub fn with_max_local_search_rounds(mut self, rounds: u32) -> Self {
        self.max_local_search_rounds = rounds;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Number of consecutive non-improving ILS iterations after which the
    /// search stops early.
    pub fn stagnation_limit(&self) -> u32 {
        (self.max_iterations / 4).max(1)
    }
}
