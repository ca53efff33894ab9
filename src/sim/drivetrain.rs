//! Simplified engine, gearbox and tyre forces.
//!
//! Everything here works in the vehicle's local frame: `x` is longitudinal (forward
//! positive), `y` lateral (right positive), `z` up.

use glam::{Vec2, Vec3A};
use std::f32::consts::PI;

use crate::{
    consts::{GRAVITY, chassis, curves, drivetrain},
    sim::{AccelMode, DriveCommand, Gear},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrivetrainInput {
    /// `(longitudinal, lateral)` velocity in m/s.
    pub local_velocity: Vec2,
    pub gear: Gear,
    /// Prescaled steering angle in radians, positive to the right.
    pub steer: f32,
    pub command: DriveCommand,
    /// Road slope in radians, positive when the road descends ahead.
    pub slope: f32,
    pub dt: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrivetrainOutput {
    /// Net force divided by mass, in the local frame.
    pub accel: Vec3A,
    /// Counter-clockwise yaw change over `dt`.
    pub delta_yaw: f32,
    /// Engine speed before the display clamp.
    pub engine_rpm: f32,
}

/// Engine speed from road speed through the given gear.
#[must_use]
pub fn engine_rpm(speed: f32, gear: Gear) -> f32 {
    speed.abs() * 60.0 * gear.ratio() * drivetrain::FINAL_DRIVE_RATIO
        / (2.0 * PI * drivetrain::WHEEL_RADIUS)
}

/// Engine torque in Nm. Floors at the curve's first value and cuts to zero past the redline.
#[must_use]
pub fn engine_torque(rpm: f32) -> f32 {
    if rpm > drivetrain::REDLINE_RPM {
        0.0
    } else {
        curves::ENGINE_TORQUE.get_output(rpm)
    }
}

/// Clamped engine speed for gauges.
#[must_use]
pub fn display_rpm(rpm: f32) -> f32 {
    if rpm.is_finite() {
        rpm.clamp(drivetrain::IDLE_RPM, drivetrain::DISPLAY_MAX_RPM)
    } else {
        drivetrain::IDLE_RPM
    }
}

/// Sums drag, rolling resistance, slope gravity, the selected longitudinal force and the
/// bicycle-model centripetal force.
#[must_use]
pub fn drive_force(input: &DrivetrainInput) -> DrivetrainOutput {
    let v = input.local_velocity;
    let v_long = v.x;
    let steer = input
        .steer
        .clamp(-drivetrain::MAX_STEER, drivetrain::MAX_STEER);

    let rpm = engine_rpm(v.length(), input.gear);
    let wheel_torque =
        engine_torque(rpm) * input.gear.ratio() * drivetrain::FINAL_DRIVE_RATIO;

    let drag = -drivetrain::DRAG * v * v.abs();
    let rolling = -drivetrain::ROLLING_RESISTANCE * v;

    let mg = chassis::MASS * GRAVITY;
    let slope_force = Vec3A::new(
        mg * input.slope.sin(),
        0.0,
        -mg * input.slope.cos() * drivetrain::SLOPE_NORMAL_SCALE,
    );

    let DriveCommand { mode, coefficient } = input.command;
    let opposing = if v_long.abs() < drivetrain::REVERSE_ENGAGE_SPEED {
        0.0
    } else {
        -v_long.signum()
    };
    let mode_force = match mode {
        AccelMode::Coast => Vec2::ZERO,
        AccelMode::Accelerate => {
            let (sin, cos) = steer.sin_cos();
            Vec2::new(cos, sin) * (wheel_torque / drivetrain::WHEEL_RADIUS * coefficient)
        }
        AccelMode::Brake => Vec2::new(opposing * drivetrain::BRAKE_FORCE * coefficient, 0.0),
        AccelMode::HardBrake => {
            Vec2::new(opposing * drivetrain::HARD_BRAKE_FORCE * coefficient, 0.0)
        }
        AccelMode::Reverse => Vec2::new(-drivetrain::BRAKE_FORCE * coefficient, 0.0),
    };

    // Signed speed so reversing steers the other way.
    let k = chassis::MASS * steer.tan() * v_long / chassis::WHEELBASE;
    let centripetal = Vec2::new(-v.y, v_long) * k;

    let planar = drag + rolling + mode_force + centripetal;
    let force = slope_force + Vec3A::new(planar.x, planar.y, 0.0);

    let yaw_rate = -steer.tan() / chassis::WHEELBASE * v_long;

    DrivetrainOutput {
        accel: force / chassis::MASS,
        delta_yaw: yaw_rate * input.dt,
        engine_rpm: rpm,
    }
}
