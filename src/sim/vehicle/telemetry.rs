use glam::Vec3A;
use std::fmt;

use crate::sim::{Gear, Vehicle};

/// Gauge values for the HUD.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VehicleTelemetry {
    /// m/s
    pub speed: f32,
    pub speed_kmh: f32,
    pub rpm: f32,
    pub gear: Gear,
    pub lap: u32,
    pub checkpoint: u32,
    pub finished: bool,
}

impl VehicleTelemetry {
    #[must_use]
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        let speed = vehicle.mean_velocity().length();
        let race = vehicle.race();
        Self {
            speed,
            speed_kmh: speed * 3.6,
            rpm: vehicle.engine_rpm(),
            gear: vehicle.gear(),
            lap: race.lap(),
            checkpoint: race.checkpoint(),
            finished: race.is_finished(),
        }
    }
}

impl fmt::Display for VehicleTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} km/h | {:.0} rpm | gear {} | lap {} | checkpoint {}",
            self.speed_kmh, self.rpm, self.gear, self.lap, self.checkpoint
        )?;
        if self.finished {
            write!(f, " | finished")?;
        }
        Ok(())
    }
}

/// Everything the renderer needs to draw the car, copied out after a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleFrame {
    pub positions: Vec<Vec3A>,
    pub center_of_mass: Vec3A,
    pub yaw: f32,
    pub flip_angle: f32,
    pub telemetry: VehicleTelemetry,
    /// Simulated seconds at the end of the tick.
    pub time: f32,
    pub tick_count: u64,
}

impl VehicleFrame {
    /// Overwrites `self` from `vehicle`, reusing the position buffer.
    pub fn copy_from(&mut self, vehicle: &Vehicle, time: f32, tick_count: u64) {
        self.positions.clear();
        self.positions
            .extend(vehicle.particles().iter().map(|p| p.position));
        self.center_of_mass = vehicle.center_of_mass();
        self.yaw = vehicle.yaw();
        self.flip_angle = vehicle.flip_angle();
        self.telemetry = VehicleTelemetry::from_vehicle(vehicle);
        self.time = time;
        self.tick_count = tick_count;
    }
}
