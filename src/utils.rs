//! Utility functions and structures for reporting and writing solutions.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ils::{IlsResult, IlsTermination};
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Format a solution as `{(store, warehouse, quantity), ...}`.
pub fn format_triples(solution: &Solution) -> String {
    let triples: Vec<String> = solution
        .triples()
        .into_iter()
        .map(|(s, w, q)| format!("({}, {}, {})", s, w, q))
        .collect();

    format!("{{{}}}", triples.join(", "))
}

/// Save a solution to a file in triple format.
pub fn save_solution<P: AsRef<Path>>(solution: &Solution, path: P) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", format_triples(solution))?;
    Ok(())
}

/// Statistics about a finished search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub instance: String,
    pub iterations: u32,
    pub runtime: Duration,
    pub initial_cost: u64,
    pub best_cost: u64,
    pub used_warehouses: usize,
    pub final_strength: f64,
    pub termination: IlsTermination,
}

impl SearchStatistics {
    /// Collect statistics from an ILS result.
    pub fn from_result(instance: &str, result: &IlsResult, runtime: Duration) -> Self {
        SearchStatistics {
            instance: instance.to_string(),
            iterations: result.iterations,
            runtime,
            initial_cost: result.initial_cost,
            best_cost: result.best_cost,
            used_warehouses: result.best.used_count(),
            final_strength: result.final_strength,
            termination: result.termination,
        }
    }

    /// Relative improvement of the best cost over the initial cost, in percent.
    pub fn improvement_percent(&self) -> f64 {
        if self.initial_cost == 0 {
            return 0.0;
        }
        (self.initial_cost - self.best_cost.min(self.initial_cost)) as f64 * 100.0
            / self.initial_cost as f64
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics ({}):
- Iterations: {}
- Runtime: {}
- Initial Cost: {}
- Best Cost: {}
- Improvement: {:.2}%
- Used Warehouses: {}
- Final Strength: {:.3}
- Termination: {:?}",
            self.instance,
            self.iterations,
            format_duration(self.runtime),
            self.initial_cost,
            self.best_cost,
            self.improvement_percent(),
            self.used_warehouses,
            self.final_strength,
            self.termination
        )
    }
}
