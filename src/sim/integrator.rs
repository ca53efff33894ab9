use glam::Vec3A;
use std::f32::consts::FRAC_PI_2;

use crate::{
    consts::{GRAVITY_Z, chassis, epsilon},
    sim::Vehicle,
};

/// Per-tick inputs to [`integrate`], all in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratorInput {
    /// Drivetrain acceleration shared by every particle.
    pub accel: Vec3A,
    /// Counter-clockwise yaw the cloud should turn through this tick.
    pub delta_yaw: f32,
    /// Unit forward direction in the ground plane.
    pub heading: Vec3A,
    pub mean_velocity: Vec3A,
    pub friction: f32,
    pub dt: f32,
}

/// `1` when moving along the heading, up to `11` when sliding sideways.
#[must_use]
pub fn lateral_damping_scale(heading: Vec3A, mean_velocity: Vec3A) -> f32 {
    let alignment = if mean_velocity.length() > epsilon::MEAN_SPEED {
        heading.dot(mean_velocity.normalize()).clamp(-1.0, 1.0)
    } else {
        1.0
    };
    1.0 + 10.0 * (alignment * FRAC_PI_2).cos()
}

/// Explicit Euler step from committed positions to predicted ones.
///
/// Besides the shared acceleration and gravity, each particle gets a tangential term that
/// steers its velocity around the center of mass toward `delta_yaw / dt`, weighted by how
/// the chassis inertia compares to the particle cloud's spread.
pub fn integrate(vehicle: &mut Vehicle, input: &IntegratorInput) {
    let dt = input.dt;
    if dt <= 0.0 {
        return;
    }

    let count = vehicle.particles.len() as f32;
    let inertia_per_mass = chassis::YAW_INERTIA / chassis::MASS;
    let spread = vehicle.radius_sq_sum / count;
    let rot_gain = (inertia_per_mass / spread).clamp(0.0, 1.0);
    let yaw_rate = input.delta_yaw / dt;

    let damping = (dt * input.friction * lateral_damping_scale(input.heading, input.mean_velocity))
        .clamp(0.0, 1.0);
    let gravity = Vec3A::new(0.0, 0.0, GRAVITY_Z);
    let com = vehicle.com;
    let mean_velocity = input.mean_velocity;

    for p in &mut vehicle.particles {
        let offset = (p.position - com).truncate();
        let r = offset.length().max(epsilon::DIRECTION);
        let tangent = Vec3A::new(-offset.y / r, offset.x / r, 0.0);

        let current = (p.velocity - mean_velocity).dot(tangent);
        let rot = tangent * (rot_gain * (yaw_rate * r - current) / dt);

        p.velocity = p.velocity * (1.0 - damping) + dt * (input.accel + gravity + rot);
        p.predicted = p.position + dt * p.velocity;
    }
}
