mod elements;
mod error;
mod observer;
mod oracle;
pub mod sun;
mod tle_loader;

pub use elements::ElementSummary;
pub use error::PredictError;
pub use observer::Observer;
pub use oracle::SatelliteOracle;
pub use tle_loader::{parse_tle_sets, SatelliteInfo, TleEntry, TleLoader};
