//! Physical constants. Units are SI: meters, seconds, kilograms, newtons.

pub const GRAVITY: f32 = 9.81;
pub const GRAVITY_Z: f32 = -GRAVITY;
pub const AIR_DENSITY: f32 = 1.225;

pub mod chassis {
    /// kg
    pub const MASS: f32 = 1500.0;
    /// m²
    pub const FRONTAL_AREA: f32 = 2.5;
    pub const WHEELBASE: f32 = 3.0;
    pub const WIDTH: f32 = 1.65;
    /// Yaw moment of inertia of a `WHEELBASE` x `WIDTH` plate.
    pub const YAW_INERTIA: f32 = MASS * (WHEELBASE * WHEELBASE + WIDTH * WIDTH) / 12.0;
    /// The mean particle velocity is scaled by this before it feeds the force model,
    /// and the resulting acceleration is divided by it.
    pub const VELOCITY_AMORT: f32 = 1.5;
}

pub mod drivetrain {
    use crate::consts::{AIR_DENSITY, chassis};

    /// 16 inch wheel
    pub const WHEEL_RADIUS: f32 = 0.2032;
    pub const FINAL_DRIVE_RATIO: f32 = 3.5;
    /// Gears 1 to 4. Neutral and reverse use the first gear's ratio.
    pub const GEAR_RATIOS: [f32; 4] = [3.36, 2.09, 1.48, 1.12];

    pub const DRAG_COEF: f32 = 0.3;
    /// kg/m
    pub const DRAG: f32 = 0.5 * DRAG_COEF * AIR_DENSITY * chassis::FRONTAL_AREA;
    /// kg/s
    pub const ROLLING_RESISTANCE: f32 = 176.6;
    /// N
    pub const BRAKE_FORCE: f32 = 5000.0;
    pub const HARD_BRAKE_FORCE: f32 = BRAKE_FORCE * 5.0;
    /// Fraction of the normal force kept on the vertical axis of the slope term.
    pub const SLOPE_NORMAL_SCALE: f32 = 0.001;

    /// Analog steering is divided by this before any trigonometry.
    pub const STEER_PRESCALE: f32 = 10.0;
    /// Steering is clamped to this many radians after prescaling.
    pub const MAX_STEER: f32 = 0.5;

    pub const IDLE_RPM: f32 = 800.0;
    /// Above this the engine is cut.
    pub const REDLINE_RPM: f32 = 7000.0;
    pub const DISPLAY_MAX_RPM: f32 = 7200.0;

    /// Longitudinal speed (m/s) that counts as "rolling backward" for the gearbox.
    pub const REVERSE_ENGAGE_SPEED: f32 = 0.01;
}

pub mod curves {
    use crate::sim::LinearPieceCurve;

    /// Engine torque (Nm) by engine speed (rpm).
    pub const ENGINE_TORQUE: LinearPieceCurve<14> = LinearPieceCurve::new([
        (800.0, 80.0),
        (1000.0, 120.0),
        (1500.0, 180.0),
        (2000.0, 250.0),
        (2500.0, 300.0),
        (3000.0, 340.0),
        (3500.0, 360.0),
        (4000.0, 370.0),
        (4500.0, 375.0),
        (5000.0, 370.0),
        (5500.0, 360.0),
        (6000.0, 340.0),
        (6500.0, 310.0),
        (7000.0, 270.0),
    ]);
}

pub mod collision {
    /// Inner world bounds sit this far inside the terrain's extent.
    pub const WORLD_BOUNDARY_MARGIN: f32 = 2.0;
    pub const POLE_RADIUS: f32 = 0.8;
    pub const REBOUND_BASE: f32 = 5.5;
    pub const REBOUND_PER_SPEED: f32 = 0.5;
    /// Floor of the per-correction magnitude cap.
    pub const MIN_CORRECTION_CAP: f32 = 0.2;
    pub const CORRECTION_CAP_PER_DISPLACEMENT: f32 = 0.5;
    pub const MAX_EXTRA_MARGIN: f32 = 0.5;
    /// Added to an entity's radius for the clip-space visibility test.
    pub const VISIBILITY_MARGIN: f32 = 1.0;
}

pub mod epsilon {
    pub const DIRECTION: f32 = 1e-6;
    pub const MEAN_SPEED: f32 = 1e-4;
    pub const MIN_TIME_STEP: f32 = 1e-6;
}
