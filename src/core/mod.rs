pub mod shocks;
pub mod simulation;

pub use shocks::ShockSchedule;
pub use simulation::{Simulation, SimulationOutput};
