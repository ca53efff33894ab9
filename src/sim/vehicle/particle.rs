use glam::Vec3A;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vec3A,
    /// Candidate position for the current tick, corrected by the solver before commit.
    pub predicted: Vec3A,
    pub velocity: Vec3A,
    /// Rest position in the body frame. Never changes after construction.
    pub reference: Vec3A,
}

impl Particle {
    #[must_use]
    pub const fn new(position: Vec3A, reference: Vec3A) -> Self {
        Self {
            position,
            predicted: position,
            velocity: Vec3A::ZERO,
            reference,
        }
    }
}
