//! Centralized clipping/diagnostic recording (§4.1 step 8, §7).
//!
//! Numerical clipping is a normal business outcome, never an error. Every
//! site that clips a flux or stock to keep an invariant routes through here
//! instead of scattering ad-hoc `if` guards, so the diagnostics log gives a
//! complete picture of how often and where clipping happened.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub year: u32,
    pub phase: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct FluxGuard {
    current_year: u32,
    diagnostics: Vec<Diagnostic>,
}

impl FluxGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_year(&mut self, year: u32) {
        self.current_year = year;
    }

    pub fn record(&mut self, phase: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(year = self.current_year, phase, %message, "flux guard clip");
        self.diagnostics.push(Diagnostic {
            year: self.current_year,
            phase: phase.to_string(),
            message,
        });
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
