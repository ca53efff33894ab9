use crate::consts::collision;

/// Tuning for the per-tick solver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Radius of every vehicle particle.
    pub collision_radius: f32,
    pub friction: f32,
    /// Resolver sub-iterations per tick.
    pub collision_steps: u32,
    /// Seconds advanced by [`Simulation::step`](crate::Simulation::step).
    pub time_step: f32,
    /// Any `dt` handed to the solver is clamped to this.
    pub max_time_step: f32,
    /// Shape matching runs on every sub-iteration that is a multiple of this, and on the last one.
    pub shape_matching_interval: u32,
    /// Fraction of the way each particle moves toward its rigid target per pass.
    pub shape_matching_stiffness: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SimulationParameters {
    pub const DEFAULT: Self = Self {
        collision_radius: 0.03,
        friction: 0.10,
        collision_steps: 10,
        time_step: 0.005,
        max_time_step: 0.2,
        shape_matching_interval: 200,
        shape_matching_stiffness: 0.5,
    };

    /// `dt` limited to `(0, max_time_step]`. Non-finite input becomes `0`.
    #[must_use]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_time_step)
        } else {
            0.0
        }
    }
}

/// Static world settings.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackConfig {
    pub grid_cell_size: f32,
    /// Particles are kept this far inside the terrain's extent.
    pub boundary_margin: f32,
    pub pole_radius: f32,
    /// Range of the renderer's visibility query.
    pub render_distance: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TrackConfig {
    pub const DEFAULT: Self = Self {
        grid_cell_size: 20.0,
        boundary_margin: collision::WORLD_BOUNDARY_MARGIN,
        pole_radius: collision::POLE_RADIUS,
        render_distance: 150.0,
    };
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaceConfig {
    pub max_laps: u32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RaceConfig {
    pub const DEFAULT: Self = Self { max_laps: 3 };
}
