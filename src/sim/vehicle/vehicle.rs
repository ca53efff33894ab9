use glam::{Mat3A, Vec2, Vec3A};

use crate::{
    VehicleError,
    consts::{drivetrain, epsilon},
    sim::{Gear, GearBox, Particle, RaceConfig, RaceProgress},
};

/// A deformable car: a fixed cloud of particles plus the scalar state derived from it.
///
/// The body frame has `+y` forward, `+x` to the right and `+z` up. `yaw` is measured
/// counter-clockwise from world `+y`.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub(crate) particles: Vec<Particle>,
    /// Mean of the reference positions, in the body frame.
    pub(crate) rest_com: Vec3A,
    pub(crate) com: Vec3A,
    pub(crate) yaw: f32,
    /// Pitch accumulated from the front-to-rear particle vector.
    pub(crate) flip_angle: f32,
    /// Yaw rate (rad/s) requested by the steering model on the last tick.
    pub(crate) angular_velocity: f32,
    pub(crate) gearbox: GearBox,
    /// Gauge-clamped engine speed from the last tick.
    pub(crate) engine_rpm: f32,
    pub(crate) race: RaceProgress,
    /// Sum of squared ground-plane distances of the reference particles from `rest_com`.
    pub(crate) radius_sq_sum: f32,
    pub(crate) front_idx: usize,
    pub(crate) rear_idx: usize,
    /// Last non-zero heading of travel, used when a push direction degenerates.
    pub(crate) prev_heading: Vec3A,
}

impl Vehicle {
    /// Places the rest shape `reference` (body frame) so its mean lands on `position`,
    /// turned by `yaw`.
    pub fn new(
        reference: &[Vec3A],
        position: Vec3A,
        yaw: f32,
        race: RaceConfig,
    ) -> Result<Self, VehicleError> {
        if reference.is_empty() {
            return Err(VehicleError::EmptyParticleSet);
        }
        if let Some(index) = reference.iter().position(|p| !p.is_finite()) {
            return Err(VehicleError::NonFiniteParticle { index });
        }
        if !position.is_finite() || !yaw.is_finite() {
            return Err(VehicleError::NonFiniteParticle { index: 0 });
        }
        let race = RaceProgress::new(race.max_laps)?;

        let rest_com = reference.iter().copied().sum::<Vec3A>() / reference.len() as f32;
        let rot = Mat3A::from_rotation_z(yaw);
        let particles = reference
            .iter()
            .map(|&r| Particle::new(position + rot * (r - rest_com), r))
            .collect();

        let radius_sq_sum = reference
            .iter()
            .map(|&r| (r - rest_com).truncate().length_squared())
            .sum::<f32>()
            .max(epsilon::DIRECTION);

        let mut front_idx = 0;
        let mut rear_idx = 0;
        for (i, r) in reference.iter().enumerate() {
            if r.y > reference[front_idx].y {
                front_idx = i;
            }
            if r.y < reference[rear_idx].y {
                rear_idx = i;
            }
        }

        Ok(Self {
            particles,
            rest_com,
            com: position,
            yaw,
            flip_angle: 0.0,
            angular_velocity: 0.0,
            gearbox: GearBox::default(),
            engine_rpm: drivetrain::IDLE_RPM,
            race,
            radius_sq_sum,
            front_idx,
            rear_idx,
            prev_heading: heading_from_yaw(yaw),
        })
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mean of the committed particle positions.
    #[must_use]
    pub const fn center_of_mass(&self) -> Vec3A {
        self.com
    }

    #[must_use]
    pub const fn rest_center_of_mass(&self) -> Vec3A {
        self.rest_com
    }

    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub const fn flip_angle(&self) -> f32 {
        self.flip_angle
    }

    #[must_use]
    pub const fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Unit forward direction in the ground plane.
    #[must_use]
    pub fn heading(&self) -> Vec3A {
        heading_from_yaw(self.yaw)
    }

    #[must_use]
    pub const fn gear(&self) -> Gear {
        self.gearbox.gear()
    }

    pub fn set_gear(&mut self, gear: Gear) {
        self.gearbox = GearBox::new(gear);
    }

    /// Engine speed from the last tick, clamped to the gauge range.
    #[must_use]
    pub const fn engine_rpm(&self) -> f32 {
        self.engine_rpm
    }

    #[must_use]
    pub const fn race(&self) -> &RaceProgress {
        &self.race
    }

    pub fn race_mut(&mut self) -> &mut RaceProgress {
        &mut self.race
    }

    #[must_use]
    pub fn mean_velocity(&self) -> Vec3A {
        self.particles.iter().map(|p| p.velocity).sum::<Vec3A>() / self.particles.len() as f32
    }

    /// Gives every particle the same velocity.
    pub fn set_velocity(&mut self, velocity: Vec3A) {
        for p in &mut self.particles {
            p.velocity = velocity;
        }
    }

    /// Overwrites committed positions, e.g. to start from a deformed shape.
    /// Extra positions are ignored; missing ones leave particles where they are.
    pub fn set_positions(&mut self, positions: &[Vec3A]) {
        for (p, &pos) in self.particles.iter_mut().zip(positions) {
            p.position = pos;
            p.predicted = pos;
        }
        self.com = mean_position(&self.particles);
    }

    #[must_use]
    pub(crate) fn tracking_vector(&self, predicted: bool) -> Vec3A {
        let (front, rear) = (&self.particles[self.front_idx], &self.particles[self.rear_idx]);
        if predicted {
            front.predicted - rear.predicted
        } else {
            front.position - rear.position
        }
    }

    /// Body-frame heading and right vectors in the ground plane.
    #[must_use]
    pub(crate) fn ground_axes(&self) -> (Vec2, Vec2) {
        let h = self.heading().truncate();
        (h, Vec2::new(h.y, -h.x))
    }
}

#[must_use]
pub(crate) fn heading_from_yaw(yaw: f32) -> Vec3A {
    let (sin, cos) = yaw.sin_cos();
    Vec3A::new(-sin, cos, 0.0)
}

#[must_use]
pub(crate) fn mean_position(particles: &[Particle]) -> Vec3A {
    particles.iter().map(|p| p.position).sum::<Vec3A>() / particles.len().max(1) as f32
}
