pub mod country;
pub mod pool;

pub use country::{Country, CountryTier, Region};
pub use pool::CountryPool;
