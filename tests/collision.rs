mod common;

use common::*;
use glam::{Vec2, Vec3A};
use joltsim::{
    InputSnapshot, Simulation, SimulationParameters, StaticEntity, Track, TrackConfig,
    correction_cap, limit_correction, shared::Aabb,
};
use std::f32::consts::FRAC_PI_2;

#[test]
fn correction_never_exceeds_cap() {
    fastrand::seed(0);
    for _ in 0..10_000 {
        let scale = 10f32.powf(fastrand::f32() * 8.0 - 4.0);
        let correction = Vec3A::new(
            fastrand::f32() * 2.0 - 1.0,
            fastrand::f32() * 2.0 - 1.0,
            fastrand::f32() * 2.0 - 1.0,
        ) * scale;
        let displacement = fastrand::f32() * 10.0;

        let limited = limit_correction(correction, displacement);
        let cap = correction_cap(displacement);
        assert!(cap >= 0.2);
        assert!(limited.length() <= cap * (1.0 + 1e-6));

        if correction.length() <= cap {
            assert_eq!(limited, correction);
        } else {
            // Halving keeps the direction
            assert!(limited.dot(correction) > 0.0);
            assert!(limited.length() > cap * 0.5 * (1.0 - 1e-6));
        }
    }
}

#[test]
fn non_finite_corrections_are_dropped() {
    assert_eq!(limit_correction(Vec3A::new(f32::NAN, 0.0, 0.0), 1.0), Vec3A::ZERO);
    assert_eq!(limit_correction(Vec3A::splat(f32::INFINITY), 1.0), Vec3A::ZERO);
    assert_eq!(correction_cap(f32::NAN), 0.2);
    assert_eq!(correction_cap(3.0), 1.5);
}

fn min_distance_to(aabb: &Aabb, positions: impl Iterator<Item = Vec3A>) -> f32 {
    positions
        .map(|p| aabb.distance_to_point(p))
        .fold(f32::INFINITY, f32::min)
}

#[test]
fn vehicle_does_not_tunnel_into_obstacle() {
    let obstacle_box = Aabb::new(Vec3A::new(9.0, -1.0, 0.0), Vec3A::new(11.0, 1.0, 2.0));
    // Heading +x at 5 m/s, coasting
    let mut vehicle = vehicle_at(0.0, 0.0, -FRAC_PI_2);
    vehicle.set_velocity(Vec3A::new(5.0, 0.0, 0.0));
    let mut sim = make_sim(vehicle, vec![StaticEntity::obstacle(obstacle_box)]);

    let radius = SimulationParameters::DEFAULT.collision_radius;
    let mut closest = f32::INFINITY;
    for tick in 0..1000 {
        sim.step(&InputSnapshot::DEFAULT);

        let dist = min_distance_to(
            &obstacle_box,
            sim.vehicle().particles().iter().map(|p| p.position),
        );
        assert!(
            dist >= radius - 1e-4,
            "particle penetrated the obstacle on tick {tick}: distance {dist}"
        );
        closest = closest.min(dist);
    }

    assert!(closest < 0.1, "vehicle never reached the obstacle (closest {closest})");
    assert!(sim.vehicle().center_of_mass().x < 9.0);
}

#[test]
fn gate_poles_block_but_the_span_is_open() {
    let mut sim = make_sim(vehicle_at(0.0, 0.0, -FRAC_PI_2), vec![narrow_gate_at(6.0)]);
    let seq = InputSeq::new_single(InputBuilder::new().with_accelerator(1.0).build());
    for _ in 0..1500 {
        run(&mut sim, &seq, 1);
        assert!(max_particle_x(&sim) < 6.0, "vehicle drove through a pole");
    }

    // Wide gate: poles at y = ±3.5
    let mut sim = make_sim(vehicle_at(0.0, 0.0, -FRAC_PI_2), vec![gate_at(0, 6.0)]);
    run(&mut sim, &seq, 1500);
    assert!(sim.vehicle().center_of_mass().x > 10.0);
}

fn narrow_gate_at(x: f32) -> StaticEntity {
    // Poles at y = ±0.5
    StaticEntity::checkpoint_gate(0, Vec3A::new(x, 0.0, 0.0), Vec2::new(0.5, 1.0), 3.0, 0.0, 0.5)
}

fn max_particle_x(sim: &Simulation) -> f32 {
    sim.vehicle()
        .particles()
        .iter()
        .map(|p| p.position.x)
        .fold(f32::NEG_INFINITY, f32::max)
}

#[test]
fn rebound_off_a_pole_with_throttle_held_stays_blocked() {
    // Ram the poles at speed so the car bounces back while still pulling forward
    let mut vehicle = vehicle_at(0.0, 0.0, -FRAC_PI_2);
    vehicle.set_velocity(Vec3A::new(8.0, 0.0, 0.0));
    let mut sim = make_sim(vehicle, vec![narrow_gate_at(6.0)]);
    let seq = InputSeq::new_single(InputBuilder::new().with_accelerator(1.0).build());

    let mut top_speed = 0f32;
    for tick in 0..1500 {
        run(&mut sim, &seq, 1);
        let max_x = max_particle_x(&sim);
        assert!(max_x < 6.0, "vehicle passed the poles on tick {tick}: max x {max_x}");
        top_speed = top_speed.max(sim.vehicle().mean_velocity().length());
    }
    assert!(top_speed < 20.0, "pole contact launched the car at {top_speed} m/s");
}

#[test]
fn configured_pole_radius_is_solid() {
    let config = TrackConfig {
        pole_radius: 2.0,
        ..TrackConfig::DEFAULT
    };
    // Car edge passes 1.3 m from the pole at (6, 3.5)
    let start = vehicle_at(0.0, 1.7, -FRAC_PI_2);
    let seq = InputSeq::new_single(InputBuilder::new().with_accelerator(1.0).build());

    let track = Track::new(vec![gate_at(0, 6.0)], config).unwrap();
    let aabb = track.entities()[0].aabb;
    assert!(aabb.min.x <= 4.0 && aabb.max.x >= 8.0);
    assert!(aabb.max.y >= 5.5 && aabb.min.y <= -5.5);

    let mut sim = Simulation::new(
        start.clone(),
        track,
        flat_world(),
        SimulationParameters::DEFAULT,
    );
    run(&mut sim, &seq, 1500);
    assert!(
        sim.vehicle().center_of_mass().x < 6.0,
        "vehicle drove through a 2 m pole (com x {})",
        sim.vehicle().center_of_mass().x
    );

    // The default pole leaves the same line open
    let mut sim = make_sim(start, vec![gate_at(0, 6.0)]);
    run(&mut sim, &seq, 1500);
    assert!(sim.vehicle().center_of_mass().x > 10.0);
}

#[test]
fn particles_stay_inside_world_and_above_ground() {
    // Drive straight at the world edge
    let mut sim = make_sim(vehicle_at(90.0, 0.0, -FRAC_PI_2), Vec::new());
    let seq = InputSeq::new_single(InputBuilder::new().with_accelerator(1.0).build());
    run(&mut sim, &seq, 2000);

    let limit = WORLD_HALF_EXTENT - 2.0;
    for p in sim.vehicle().particles() {
        assert!(p.position.x <= limit + 1e-4);
        assert!(p.position.z >= -1e-4);
    }
}
