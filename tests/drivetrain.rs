mod common;

use common::*;
use glam::Vec2;
use joltsim::{
    AccelMode, DriveCommand, DrivetrainInput, Gear,
    consts::drivetrain::{DISPLAY_MAX_RPM, FINAL_DRIVE_RATIO, IDLE_RPM, WHEEL_RADIUS},
    display_rpm, drive_force, engine_rpm, engine_torque,
};
use std::f32::consts::{FRAC_PI_2, PI};

fn coast_input(local_velocity: Vec2) -> DrivetrainInput {
    DrivetrainInput {
        local_velocity,
        gear: Gear::First,
        steer: 0.0,
        command: DriveCommand::COAST,
        slope: 0.0,
        dt: 0.005,
    }
}

#[test]
fn torque_curve_floor_interpolation_and_cut() {
    assert_eq!(engine_torque(0.0), 80.0);
    assert_eq!(engine_torque(500.0), 80.0);
    assert_eq!(engine_torque(800.0), 80.0);
    assert_eq!(engine_torque(4500.0), 375.0);
    assert!((engine_torque(4250.0) - 372.5).abs() < 1e-3);
    assert_eq!(engine_torque(7000.0), 270.0);
    assert_eq!(engine_torque(7000.5), 0.0);
}

#[test]
fn rpm_follows_gear_ratio() {
    let expected = 10.0 * 60.0 * 3.36 * FINAL_DRIVE_RATIO / (2.0 * PI * WHEEL_RADIUS);
    assert!((engine_rpm(10.0, Gear::First) - expected).abs() < 1e-2);
    assert_eq!(engine_rpm(-10.0, Gear::First), engine_rpm(10.0, Gear::First));
    assert_eq!(engine_rpm(10.0, Gear::Reverse), engine_rpm(10.0, Gear::First));
    assert!(engine_rpm(10.0, Gear::Fourth) < engine_rpm(10.0, Gear::Second));

    assert_eq!(display_rpm(0.0), IDLE_RPM);
    assert_eq!(display_rpm(1e6), DISPLAY_MAX_RPM);
    assert_eq!(display_rpm(f32::NAN), IDLE_RPM);
}

#[test]
fn traction_from_rest_pushes_forward() {
    let out = drive_force(&DrivetrainInput {
        command: DriveCommand {
            mode: AccelMode::Accelerate,
            coefficient: 1.0,
        },
        ..coast_input(Vec2::ZERO)
    });
    assert!(out.accel.x > 0.0);
    assert_eq!(out.accel.y, 0.0);
    assert_eq!(out.delta_yaw, 0.0);
    assert_eq!(out.engine_rpm, 0.0);
}

#[test]
fn brakes_oppose_longitudinal_velocity() {
    for v_long in [5.0, -5.0] {
        let coast = drive_force(&coast_input(Vec2::new(v_long, 0.0)));
        for mode in [AccelMode::Brake, AccelMode::HardBrake] {
            let braked = drive_force(&DrivetrainInput {
                command: DriveCommand {
                    mode,
                    coefficient: 1.0,
                },
                ..coast_input(Vec2::new(v_long, 0.0))
            });
            if v_long > 0.0 {
                assert!(braked.accel.x < coast.accel.x);
            } else {
                assert!(braked.accel.x > coast.accel.x);
            }
        }
    }

    // Nothing to brake against when stopped
    let stopped = drive_force(&DrivetrainInput {
        command: DriveCommand {
            mode: AccelMode::Brake,
            coefficient: 1.0,
        },
        ..coast_input(Vec2::ZERO)
    });
    assert_eq!(stopped.accel.x, 0.0);
}

#[test]
fn hard_brake_is_stronger_than_brake() {
    let with_mode = |mode| {
        drive_force(&DrivetrainInput {
            command: DriveCommand {
                mode,
                coefficient: 1.0,
            },
            ..coast_input(Vec2::new(8.0, 0.0))
        })
        .accel
        .x
    };
    assert!(with_mode(AccelMode::HardBrake) < with_mode(AccelMode::Brake));
}

#[test]
fn right_steer_turns_clockwise_with_centripetal_pull() {
    let out = drive_force(&DrivetrainInput {
        steer: 0.1,
        ..coast_input(Vec2::new(10.0, 0.0))
    });
    assert!(out.delta_yaw < 0.0);
    assert!(out.accel.y > 0.0);

    let reversing = drive_force(&DrivetrainInput {
        steer: 0.1,
        ..coast_input(Vec2::new(-10.0, 0.0))
    });
    assert!(reversing.delta_yaw > 0.0);
}

#[test]
fn steering_is_clamped() {
    let out = drive_force(&DrivetrainInput {
        steer: FRAC_PI_2,
        ..coast_input(Vec2::new(10.0, 0.0))
    });
    assert!(out.delta_yaw.is_finite());
    assert!(out.accel.is_finite());
}

#[test]
fn downhill_slope_adds_forward_force() {
    let flat = drive_force(&coast_input(Vec2::new(3.0, 0.0)));
    let downhill = drive_force(&DrivetrainInput {
        slope: 0.1,
        ..coast_input(Vec2::new(3.0, 0.0))
    });
    assert!(downhill.accel.x > flat.accel.x);
    assert!(downhill.accel.z < 0.0);
}

#[test]
fn first_gear_from_rest_accelerates_in_one_tick() {
    let mut vehicle = vehicle_at(0.0, 0.0, 0.0);
    vehicle.set_gear(Gear::First);
    let mut sim = make_sim(vehicle, Vec::new());

    let input = InputBuilder::new().with_accelerator(1.0).build();
    sim.step_dt(0.005, &input);

    let vehicle = sim.vehicle();
    let v = vehicle.mean_velocity();
    assert!(v.length() > 0.0);
    assert!(v.dot(vehicle.heading()) > 0.0);
    assert!(vehicle.engine_rpm() >= IDLE_RPM);
    assert!(vehicle.engine_rpm() <= DISPLAY_MAX_RPM);
    assert_eq!(vehicle.gear(), Gear::First);
}
