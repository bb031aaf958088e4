//! Local search operators and the convergence loop.

pub mod relocate;
pub mod swap;
pub mod utils;

use crate::config::Config;
use crate::solution::Solution;
use crate::validator;
use log::trace;

pub use self::swap::SwapMove;

/// The neighborhoods explored by the local search, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    Relocate,
    Swap,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 2] = [Neighborhood::Relocate, Neighborhood::Swap];
}

/// Why a local search run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A full round found no applicable move
    Converged,
    /// The round budget was exhausted
    RoundLimit,
    /// Too many consecutive rounds without a cost reduction; a guard that
    /// only triggers if a neighborhood applies a non-improving move
    Stagnation,
}

/// Result of a local search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSearchOutcome {
    pub cost: u64,
    pub improved: bool,
    pub rounds: u32,
    pub termination: Termination,
}

/// Manages the local search phase of the ILS.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    /// Consecutive applications of one neighborhood per round
    pub operator_attempts: u32,
    pub max_rounds: u32,
    pub max_rounds_without_improvement: u32,
}

impl LocalSearch {
    /// Create a new local search instance.
    pub fn new(
        operator_attempts: u32,
        max_rounds: u32,
        max_rounds_without_improvement: u32,
    ) -> Self {
        LocalSearch {
            operator_attempts,
            max_rounds,
            max_rounds_without_improvement,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        LocalSearch::new(
            config.operator_attempts,
            config.max_local_search_rounds,
            config.max_rounds_without_improvement,
        )
    }

    /// Run local search to improve a solution until it converges or a
    /// budget runs out.
    ///
    /// The neighborhoods only apply moves with a negative cost delta, so every
    /// applied move lowers the total cost. The cost check after each move is a
    /// guard: debug builds restore the solution from a snapshot when it
    /// fails, release builds keep the move and skip the snapshot. Stagnation
    /// can therefore only end a run if an operator breaks that contract.
    pub fn run(&self, solution: &mut Solution) -> LocalSearchOutcome {
        let initial_cost = solution.cost();
        let mut cost = initial_cost;
        let mut rounds = 0;
        let mut rounds_without_improvement = 0;

        let termination = loop {
            if rounds >= self.max_rounds {
                break Termination::RoundLimit;
            }
            rounds += 1;

            let round_start_cost = cost;
            let mut applied = false;

            for neighborhood in Neighborhood::ALL {
                for _ in 0..self.operator_attempts {
                    #[cfg(debug_assertions)]
                    let snapshot = solution.clone();
                    if !self.apply(neighborhood, solution) {
                        break;
                    }
                    applied = true;

                    let new_cost = solution.cost();
                    if new_cost < cost {
                        cost = new_cost;
                        continue;
                    }

                    trace!("{:?} did not lower the cost", neighborhood);
                    #[cfg(debug_assertions)]
                    {
                        *solution = snapshot;
                    }
                    #[cfg(not(debug_assertions))]
                    {
                        cost = new_cost;
                    }
                    break;
                }
            }

            if !applied {
                break Termination::Converged;
            }

            if cost < round_start_cost {
                rounds_without_improvement = 0;
            } else {
                rounds_without_improvement += 1;
                if rounds_without_improvement >= self.max_rounds_without_improvement {
                    break Termination::Stagnation;
                }
            }
        };

        validator::debug_assert_valid(solution);

        LocalSearchOutcome {
            cost,
            improved: cost < initial_cost,
            rounds,
            termination,
        }
    }

    /// Apply one neighborhood once.
    pub fn apply(&self, neighborhood: Neighborhood, solution: &mut Solution) -> bool {
        match neighborhood {
            Neighborhood::Relocate => self.relocate_neighborhood(solution),
            Neighborhood::Swap => self.swap_neighborhood(solution),
        }
    }
}
