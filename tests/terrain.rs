use glam::{Vec2, Vec3A};
use joltsim::{FlatTerrain, HeightField, Terrain, TrackError, WorldBounds};
use std::f32::consts::FRAC_PI_4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn quad() -> HeightField {
    // (0,0)=0 (1,0)=1
    // (0,1)=2 (1,1)=4
    HeightField::new(Vec2::ZERO, 1.0, 2, vec![0.0, 1.0, 2.0, 4.0]).unwrap()
}

#[test]
fn height_field_interpolates_per_triangle() {
    let field = quad();
    assert!(approx(field.height_at(0.0, 0.0), 0.0));
    assert!(approx(field.height_at(1.0, 0.0), 1.0));
    assert!(approx(field.height_at(0.0, 1.0), 2.0));
    assert!(approx(field.height_at(1.0, 1.0), 4.0));

    assert!(approx(field.height_at(0.25, 0.25), 0.75));
    assert!(approx(field.height_at(0.75, 0.75), 2.75));
}

#[test]
fn height_field_clamps_outside_queries() {
    let field = quad();
    assert!(approx(field.height_at(-5.0, -5.0), 0.0));
    assert!(approx(field.height_at(10.0, 10.0), 4.0));
    assert!(field.height_at(f32::NAN, 0.0).is_finite());
}

#[test]
fn height_field_bounds() {
    let field = HeightField::new(Vec2::new(-10.0, 5.0), 2.0, 3, vec![0.0; 12]).unwrap();
    assert_eq!(field.rows(), 4);
    assert_eq!(field.bounds(), WorldBounds::new(-10.0, -6.0, 5.0, 11.0));
}

#[test]
fn malformed_height_fields_are_rejected() {
    assert!(matches!(
        HeightField::new(Vec2::ZERO, 1.0, 3, vec![0.0; 4]),
        Err(TrackError::MalformedHeightField { columns: 3, samples: 4 })
    ));
    assert!(matches!(
        HeightField::new(Vec2::ZERO, 1.0, 2, vec![0.0; 2]),
        Err(TrackError::MalformedHeightField { .. })
    ));
    assert!(matches!(
        HeightField::new(Vec2::ZERO, 0.0, 2, vec![0.0; 4]),
        Err(TrackError::InvalidCellSize(_))
    ));
}

#[test]
fn slope_sign_follows_heading() {
    // Rises 1 m per meter along +x
    let ramp = HeightField::new(Vec2::ZERO, 10.0, 2, vec![0.0, 10.0, 0.0, 10.0]).unwrap();
    let p = Vec2::new(2.0, 5.0);
    assert!(approx(ramp.slope_along(p, Vec2::X, 1.0), -FRAC_PI_4));
    assert!(approx(ramp.slope_along(p + Vec2::X, -Vec2::X, 1.0), FRAC_PI_4));
    assert!(approx(ramp.slope_along(p, Vec2::Y, 1.0), 0.0));
    assert_eq!(ramp.slope_along(p, Vec2::ZERO, 1.0), 0.0);

    let flat = FlatTerrain::new(3.0, WorldBounds::new(-1.0, 1.0, -1.0, 1.0));
    assert_eq!(flat.slope_along(Vec2::ZERO, Vec2::X, 1.0), 0.0);
    assert_eq!(flat.height_at(50.0, -50.0), 3.0);
}

#[test]
fn world_bounds_inset_and_clamp() {
    let bounds = WorldBounds::new(-10.0, 10.0, 0.0, 3.0).inset(2.0);
    assert_eq!(bounds, WorldBounds::new(-8.0, 8.0, 1.5, 1.5));

    let clamped = bounds.clamp(Vec3A::new(20.0, -4.0, 7.0));
    assert_eq!(clamped, Vec3A::new(8.0, 1.5, 7.0));
    assert!(bounds.contains(Vec2::new(0.0, 1.5)));
    assert!(!bounds.contains(Vec2::new(9.0, 1.5)));
}
