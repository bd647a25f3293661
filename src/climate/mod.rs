pub mod carbon_cycle;

pub use carbon_cycle::{CarbonCycle, CarbonCycleDelta, CarbonCycleState};
