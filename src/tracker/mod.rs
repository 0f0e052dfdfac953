mod error;
mod parsing;
mod tracker;

pub use error::TrackerError;
pub use tracker::{RunCommand, Tracker, TrackerMode, TrackerStatus};
