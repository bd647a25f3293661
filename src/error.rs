//! Error taxonomy for the simulation engine.
//!
//! Configuration errors abort a run before any tick executes. Invariant
//! violations abort a run at the tick boundary that produced them. Numerical
//! clipping and exhaustion are not errors at all -- see `analysis::diagnostics`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid scenario parameter: {0}")]
    InvalidConfig(String),

    #[error("invariant violated at year {year} in phase {phase}: {message}")]
    InvariantViolation {
        year: u32,
        phase: &'static str,
        message: String,
    },
}

pub type SimResult<T> = Result<T, SimError>;
