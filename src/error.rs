//! Error types for the warehouse location solver.

use crate::validator::Violation;
use std::io;
use thiserror::Error;

/// Errors surfaced by the solver and its instance I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// Some store's demand could not be covered by the constructive heuristic,
    /// neither by its ranked candidates nor by the fallback pass.
    #[error("instance is infeasible: store {store} has {unmet} units of unmet demand")]
    InfeasibleInstance { store: usize, unmet: u64 },

    /// The instance model itself is inconsistent (ids, vector lengths, pairs).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// The instance file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A produced solution failed certification by the validator.
    #[error("solution failed validation: {0}")]
    InvalidSolution(#[from] Violation),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
