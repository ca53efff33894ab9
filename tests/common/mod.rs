#![allow(dead_code)]

mod input_seq;

pub use input_seq::*;

use glam::{Vec2, Vec3A};
use joltsim::{
    FlatTerrain, RaceConfig, SimulationParameters, Simulation, StaticEntity, Track, TrackConfig,
    Vehicle, WorldBounds, shared::Aabb,
};

pub const WORLD_HALF_EXTENT: f32 = 100.0;

pub fn flat_world() -> FlatTerrain {
    FlatTerrain::new(
        0.0,
        WorldBounds::new(
            -WORLD_HALF_EXTENT,
            WORLD_HALF_EXTENT,
            -WORLD_HALF_EXTENT,
            WORLD_HALF_EXTENT,
        ),
    )
}

/// 3 x 5 x 2 particles, 0.5 m apart: 1 m wide, 2 m long, 0.5 m tall, nose toward +y.
pub fn car_lattice() -> Vec<Vec3A> {
    let mut points = Vec::new();
    for x in [-0.5, 0.0, 0.5] {
        for y in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            for z in [0.0, 0.5] {
                points.push(Vec3A::new(x, y, z));
            }
        }
    }
    points
}

/// A lattice car resting on the ground with its center at `(x, y)`.
pub fn vehicle_at(x: f32, y: f32, yaw: f32) -> Vehicle {
    Vehicle::new(&car_lattice(), Vec3A::new(x, y, 0.25), yaw, RaceConfig::DEFAULT).unwrap()
}

/// Thin gate across the `x` axis at `x`, poles at `y = ±3.5`.
pub fn gate_at(id: u32, x: f32) -> StaticEntity {
    StaticEntity::checkpoint_gate(
        id,
        Vec3A::new(x, 0.0, 0.0),
        Vec2::new(0.5, 4.0),
        3.0,
        0.0,
        0.5,
    )
}

pub fn obstacle(min: Vec3A, max: Vec3A) -> StaticEntity {
    StaticEntity::obstacle(Aabb::new(min, max))
}

pub fn make_sim(vehicle: Vehicle, entities: Vec<StaticEntity>) -> Simulation {
    let track = Track::new(entities, TrackConfig::DEFAULT).unwrap();
    Simulation::new(vehicle, track, flat_world(), SimulationParameters::DEFAULT)
}

pub fn run(sim: &mut Simulation, seq: &InputSeq, ticks: u64) {
    for _ in 0..ticks {
        let input = seq.get_input_at_tick(sim.tick_count());
        sim.step(&input);
    }
}
