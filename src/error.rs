use std::fmt;

/// Rejected vehicle construction. Nothing past construction returns this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleError {
    /// The particle cloud has no particles.
    EmptyParticleSet,
    /// A reference position is NaN or infinite.
    NonFiniteParticle { index: usize },
    /// The race needs at least one lap.
    InvalidMaxLaps,
}

impl fmt::Display for VehicleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyParticleSet => write!(f, "vehicle particle set is empty"),
            Self::NonFiniteParticle { index } => {
                write!(f, "vehicle particle {index} has a non-finite position")
            }
            Self::InvalidMaxLaps => write!(f, "race must have at least one lap"),
        }
    }
}

impl std::error::Error for VehicleError {}

/// Rejected static world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackError {
    /// Checkpoint ids must form `0..N` with no gaps.
    NonContiguousCheckpoints { expected: u32, found: u32 },
    DuplicateCheckpoint { id: u32 },
    /// Grid cell size must be finite and positive.
    InvalidCellSize(f32),
    /// Height samples do not form a grid of at least 2x2 with the given row width.
    MalformedHeightField { columns: usize, samples: usize },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonContiguousCheckpoints { expected, found } => write!(
                f,
                "checkpoint ids are not contiguous: expected {expected}, found {found}"
            ),
            Self::DuplicateCheckpoint { id } => write!(f, "checkpoint id {id} appears twice"),
            Self::InvalidCellSize(size) => write!(f, "invalid grid cell size {size}"),
            Self::MalformedHeightField { columns, samples } => write!(
                f,
                "{samples} height samples cannot form a grid {columns} columns wide"
            ),
        }
    }
}

impl std::error::Error for TrackError {}
