pub mod const_funcs;
pub mod constants;
pub mod scenario;

pub use scenario::ScenarioConfig;
