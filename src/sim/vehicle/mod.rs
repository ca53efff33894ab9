mod particle;
mod race_progress;
mod telemetry;
#[allow(clippy::module_inception)]
mod vehicle;

pub use particle::*;
pub use race_progress::*;
pub use telemetry::*;
pub use vehicle::*;
