use glam::{Vec2, Vec3A};
use log::warn;
use std::f32::consts::{PI, TAU};

use crate::{
    consts::{chassis, collision, drivetrain, epsilon},
    sim::{
        AccelMode, DriveIntent, DrivetrainInput, GridQuery, InputSnapshot, IntegratorInput, Resolver,
        SimulationParameters, Terrain, Track, Vehicle, VehicleFrame, VehicleTelemetry,
        display_rpm, drive_force, integrate, mean_position, shape_match,
    },
};

/// Distance ahead of the center of mass at which the road slope is sampled.
const SLOPE_PROBE_DISTANCE: f32 = 1.0;

/// Owns one vehicle and the world it drives in, and advances them together.
pub struct Simulation {
    params: SimulationParameters,
    vehicle: Vehicle,
    track: Track,
    terrain: Box<dyn Terrain + Send>,
    time: f32,
    tick_count: u64,
    query: GridQuery,
    touched_gates: Vec<u32>,
}

impl Simulation {
    #[must_use]
    pub fn new(
        vehicle: Vehicle,
        track: Track,
        terrain: impl Terrain + Send + 'static,
        params: SimulationParameters,
    ) -> Self {
        Self {
            params,
            vehicle,
            track,
            terrain: Box::new(terrain),
            time: 0.0,
            tick_count: 0,
            query: GridQuery::default(),
            touched_gates: Vec::new(),
        }
    }

    #[must_use]
    pub const fn params(&self) -> &SimulationParameters {
        &self.params
    }

    #[must_use]
    pub const fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }

    #[must_use]
    pub const fn track(&self) -> &Track {
        &self.track
    }

    #[must_use]
    pub fn terrain(&self) -> &dyn Terrain {
        self.terrain.as_ref()
    }

    /// Simulated seconds since construction.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn telemetry(&self) -> VehicleTelemetry {
        VehicleTelemetry::from_vehicle(&self.vehicle)
    }

    pub fn copy_frame(&self, frame: &mut VehicleFrame) {
        frame.copy_from(&self.vehicle, self.time, self.tick_count);
    }

    /// Advances one tick of [`SimulationParameters::time_step`].
    pub fn step(&mut self, input: &InputSnapshot) {
        self.step_dt(self.params.time_step, input);
    }

    /// Advances one tick of `dt` seconds, clamped to the maximum time step.
    /// Ticks shorter than a microsecond are skipped.
    pub fn step_dt(&mut self, dt: f32, input: &InputSnapshot) {
        let clamped = self.params.clamp_dt(dt);
        if clamped < dt {
            warn!("Clamping time step {dt:.4}s to {clamped:.4}s");
        }
        if clamped <= epsilon::MIN_TIME_STEP {
            return;
        }
        let dt = clamped;
        let input = input.clamp();

        let (steer, intent, pedal) = read_controls(&input);
        self.vehicle.gearbox.shift(input.shift);

        let mean_velocity = self.vehicle.mean_velocity();
        let (heading_2d, right_2d) = self.vehicle.ground_axes();
        let heading: Vec3A = heading_2d.extend(0.0).into();
        let velocity_2d = mean_velocity.truncate();
        let v_long = velocity_2d.dot(heading_2d);

        let command = self.vehicle.gearbox.update(intent, v_long, pedal);
        let slope = self.terrain.slope_along(
            self.vehicle.com.truncate(),
            heading_2d,
            SLOPE_PROBE_DISTANCE,
        );

        let local_velocity =
            Vec2::new(v_long, velocity_2d.dot(right_2d)) * chassis::VELOCITY_AMORT;
        let drive = drive_force(&DrivetrainInput {
            local_velocity,
            gear: self.vehicle.gear(),
            steer,
            command,
            slope,
            dt,
        });
        self.vehicle.engine_rpm = display_rpm(drive.engine_rpm);
        self.vehicle.angular_velocity = drive.delta_yaw / dt;

        let planar = heading_2d * drive.accel.x + right_2d * drive.accel.y;
        let accel = Vec3A::new(planar.x, planar.y, drive.accel.z) / chassis::VELOCITY_AMORT;

        let moving_forward = mean_velocity.dot(heading) > -0.01;
        let travel = if moving_forward { heading } else { -heading };

        integrate(
            &mut self.vehicle,
            &IntegratorInput {
                accel,
                delta_yaw: drive.delta_yaw,
                heading,
                mean_velocity,
                friction: self.params.friction,
                dt,
            },
        );

        let tracking_before = self.vehicle.tracking_vector(false);
        // Gate poles push against the drivetrain's pull.
        let pole_push = match command.mode {
            AccelMode::Accelerate => Some(-heading),
            AccelMode::Reverse => Some(heading),
            AccelMode::Coast | AccelMode::Brake | AccelMode::HardBrake => None,
        };

        self.solve_constraints(accel.length() * dt, mean_velocity.length(), pole_push);
        self.commit(dt, tracking_before, travel);
    }

    fn solve_constraints(&mut self, displacement: f32, speed: f32, pole_push: Option<Vec3A>) {
        let fallback = -self.vehicle.prev_heading;
        let resolver = Resolver {
            track: &self.track,
            terrain: self.terrain.as_ref(),
            bounds: self
                .terrain
                .bounds()
                .inset(self.track.config().boundary_margin),
            radius: self.params.collision_radius,
            margin: displacement.min(collision::MAX_EXTRA_MARGIN),
            displacement,
            rebound: collision::REBOUND_BASE + collision::REBOUND_PER_SPEED * speed,
            pole_push,
            fallback,
        };

        let steps = self.params.collision_steps.max(1);
        let interval = self.params.shape_matching_interval.max(1);
        self.touched_gates.clear();

        for k in 0..steps {
            if k % interval == 0 || k + 1 == steps {
                shape_match(
                    &mut self.vehicle.particles,
                    self.vehicle.rest_com,
                    self.params.shape_matching_stiffness,
                );
            }
            resolver.clamp_to_world(&mut self.vehicle.particles);
            resolver.resolve_contacts(
                &mut self.vehicle.particles,
                &mut self.query,
                &mut self.touched_gates,
            );
        }

        self.update_checkpoints();
    }

    fn update_checkpoints(&mut self) {
        let Some(last_id) = self.track.checkpoint_count().checked_sub(1) else {
            return;
        };
        for &id in &self.touched_gates {
            if self.vehicle.race.advance(id, last_id, self.time) {
                self.track.advance_tracked(id);
            }
        }
    }

    fn commit(&mut self, dt: f32, tracking_before: Vec3A, travel: Vec3A) {
        for p in &mut self.vehicle.particles {
            p.velocity = (p.predicted - p.position) / dt;
            p.position = p.predicted;
        }
        self.vehicle.com = mean_position(&self.vehicle.particles);

        let tracking_after = self.vehicle.tracking_vector(false);
        if tracking_before.truncate().length() > epsilon::DIRECTION
            && tracking_after.truncate().length() > epsilon::DIRECTION
        {
            let yaw_before = tracking_before.y.atan2(tracking_before.x);
            let yaw_after = tracking_after.y.atan2(tracking_after.x);
            self.vehicle.yaw = wrap_angle(self.vehicle.yaw + wrap_angle(yaw_after - yaw_before));

            let pitch = |v: Vec3A| v.z.atan2(v.truncate().length());
            self.vehicle.flip_angle += wrap_angle(pitch(tracking_after) - pitch(tracking_before));
        }

        if travel.length_squared() > epsilon::DIRECTION {
            self.vehicle.prev_heading = travel;
        }

        self.time += dt;
        self.tick_count += 1;
    }
}

// Prescaled steering (positive right), drive intent, and the pedal behind that intent.
fn read_controls(input: &InputSnapshot) -> (f32, DriveIntent, f32) {
    let steer = if input.steer_dir != 0 {
        f32::from(input.steer_dir)
    } else {
        -input.steering
    } / drivetrain::STEER_PRESCALE;

    let (intent, pedal) = match input.drive_dir {
        1 => (DriveIntent::Forward, 1.0),
        -1 => (DriveIntent::Backward, 1.0),
        _ if input.brake > 0.5 => (DriveIntent::Backward, input.brake),
        _ if input.accelerator > 0.5 => (DriveIntent::Forward, input.accelerator),
        _ => (DriveIntent::None, 0.0),
    };

    (steer, intent, pedal)
}

/// Wraps to `[-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    (angle + PI).rem_euclid(TAU) - PI
}
