//! Iterated Local Search driver.

use crate::config::Config;
use crate::local_search::LocalSearch;
use crate::perturbation::Perturbation;
use crate::solution::Solution;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Why the ILS loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IlsTermination {
    MaxIterations,
    /// Too many consecutive iterations without an accepted candidate
    Stagnation,
    TimeLimit,
}

/// Costs and strength recorded after one ILS iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: u32,
    /// Cost of the perturbed and locally optimized candidate
    pub candidate_cost: u64,
    pub current_cost: u64,
    pub best_cost: u64,
    /// Strength used for this iteration's perturbation
    pub strength: f64,
    pub accepted: bool,
}

/// Outcome of an ILS run.
#[derive(Debug, Clone)]
pub struct IlsResult {
    pub best: Solution,
    pub best_cost: u64,
    /// Cost of the starting solution before the first local search
    pub initial_cost: u64,
    pub trace: Vec<IterationRecord>,
    pub iterations: u32,
    pub final_strength: f64,
    pub termination: IlsTermination,
}

impl IlsResult {
    /// Candidate cost of every iteration, in order.
    pub fn cost_trace(&self) -> Vec<u64> {
        self.trace.iter().map(|r| r.candidate_cost).collect()
    }

    /// Best cost after every iteration, in order.
    pub fn best_cost_trace(&self) -> Vec<u64> {
        self.trace.iter().map(|r| r.best_cost).collect()
    }
}

/// Alternates perturbation and local search with better-only acceptance and
/// an adaptive perturbation strength.
pub struct IteratedLocalSearch {
    pub config: Config,
    pub local_search: LocalSearch,
    pub perturbation: Perturbation,
    pub strength: f64,
    pub iterations_without_improvement: u32,
}

impl IteratedLocalSearch {
    /// Create a new ILS instance for the given configuration.
    pub fn new(config: Config) -> Self {
        IteratedLocalSearch {
            local_search: LocalSearch::from_config(&config),
            perturbation: Perturbation::new(config.random_choice_probability),
            strength: config.initial_strength,
            iterations_without_improvement: 0,
            config,
        }
    }

    /// Run the ILS from a feasible starting solution.
    pub fn run<R: Rng + ?Sized>(&mut self, initial: Solution, rng: &mut R) -> IlsResult {
        let start_time = Instant::now();
        let initial_cost = initial.cost();

        let mut current = initial;
        let mut current_cost = self.local_search.run(&mut current).cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        info!(
            "ILS start: initial cost {}, after local search {}",
            initial_cost, current_cost
        );

        self.strength = self.config.initial_strength;
        self.iterations_without_improvement = 0;

        let mut trace = Vec::new();
        let mut iterations = 0;

        let termination = loop {
            if let Some(reason) = self.should_terminate(iterations, start_time) {
                break reason;
            }
            iterations += 1;

            let strength = self.strength;
            let mut candidate = current.clone();
            self.perturbation.perturb(&mut candidate, strength, rng);
            let candidate_cost = self.local_search.run(&mut candidate).cost;

            let accepted = candidate_cost < current_cost;
            if accepted {
                current = candidate;
                current_cost = candidate_cost;
                self.iterations_without_improvement = 0;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    info!("Iteration {}: new best cost {}", iterations, best_cost);
                }
            } else {
                self.iterations_without_improvement += 1;
            }

            self.adapt_strength(accepted);
            debug!(
                "Iteration {}: candidate {}, current {}, best {} (strength {:.3})",
                iterations, candidate_cost, current_cost, best_cost, strength
            );

            trace.push(IterationRecord {
                iteration: iterations,
                candidate_cost,
                current_cost,
                best_cost,
                strength,
                accepted,
            });
        };

        info!(
            "ILS finished after {} iterations ({:?}): best cost {}",
            iterations, termination, best_cost
        );

        IlsResult {
            best,
            best_cost,
            initial_cost,
            trace,
            iterations,
            final_strength: self.strength,
            termination,
        }
    }

    /// Grow the strength while stagnating, shrink it after an improvement.
    pub fn adapt_strength(&mut self, improved: bool) {
        let previous = self.strength;

        if improved {
            self.strength =
                (self.strength * (1.0 - self.config.strength_step)).max(self.config.min_strength);
        } else if self.iterations_without_improvement > self.config.stagnation_threshold {
            self.strength =
                (self.strength * (1.0 + self.config.strength_step)).min(self.config.max_strength);
        }

        if self.strength != previous {
            debug!(
                "Perturbation strength {:.3} -> {:.3}",
                previous, self.strength
            );
        }
    }

    /// Check if the termination criteria are met.
    fn should_terminate(&self, iterations: u32, start_time: Instant) -> Option<IlsTermination> {
        if iterations >= self.config.max_iterations {
            return Some(IlsTermination::MaxIterations);
        }

        if self.iterations_without_improvement >= self.config.stagnation_limit() {
            return Some(IlsTermination::Stagnation);
        }

        if let Some(time_limit) = self.config.time_limit {
            if start_time.elapsed() >= time_limit {
                return Some(IlsTermination::TimeLimit);
            }
        }

        None
    }
}
