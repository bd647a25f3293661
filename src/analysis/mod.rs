pub mod diagnostics;
pub mod metrics_calculation;
pub mod reporting;
pub mod snapshot;

pub use diagnostics::RunDiagnostics;
pub use snapshot::AnnualSnapshot;
