//! Pulls the predicted particle cloud back toward a rigid copy of its rest shape.

use glam::{Mat3A, Vec3A};
use nalgebra::Matrix3;

use crate::sim::Particle;

/// Best rigid placement of the rest shape onto the predicted cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeFit {
    pub rotation: Mat3A,
    /// Mean of the predicted positions.
    pub center: Vec3A,
    /// Root of the summed squared distances between predicted positions and their rigid
    /// targets, measured before blending.
    pub residual: f32,
}

/// Least-squares rotation and translation taking the rest shape onto `particles`' predicted
/// positions. Always returns a proper rotation; degenerate clouds fall back to identity
/// when the decomposition fails.
#[must_use]
pub fn best_fit(particles: &[Particle], rest_com: Vec3A) -> ShapeFit {
    if particles.is_empty() {
        return ShapeFit {
            rotation: Mat3A::IDENTITY,
            center: Vec3A::ZERO,
            residual: 0.0,
        };
    }

    let center = particles.iter().map(|p| p.predicted).sum::<Vec3A>() / particles.len() as f32;

    let mut cov = Matrix3::<f32>::zeros();
    for p in particles {
        let a = p.predicted - center;
        let b = p.reference - rest_com;
        for i in 0..3 {
            for j in 0..3 {
                cov[(i, j)] += a[i] * b[j];
            }
        }
    }

    let rotation = polar_rotation(cov);
    let residual = particles
        .iter()
        .map(|p| {
            let target = rotation * (p.reference - rest_com) + center;
            p.predicted.distance_squared(target)
        })
        .sum::<f32>()
        .sqrt();

    ShapeFit {
        rotation,
        center,
        residual,
    }
}

/// Fits the rest shape and moves every predicted position `stiffness` of the way to its
/// rigid target.
pub fn shape_match(particles: &mut [Particle], rest_com: Vec3A, stiffness: f32) -> ShapeFit {
    let fit = best_fit(particles, rest_com);
    let stiffness = stiffness.clamp(0.0, 1.0);
    for p in particles.iter_mut() {
        let target = fit.rotation * (p.reference - rest_com) + fit.center;
        p.predicted += (target - p.predicted) * stiffness;
    }
    fit
}

// Rotation factor `U * Vᵀ` of the SVD, with the weakest axis flipped if that would be a
// reflection.
fn polar_rotation(cov: Matrix3<f32>) -> Mat3A {
    let svd = cov.svd(true, true);
    let (Some(mut u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Mat3A::IDENTITY;
    };

    if (u * v_t).determinant() < 0.0 {
        let weakest = svd
            .singular_values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(2, |(i, _)| i);
        u.column_mut(weakest).neg_mut();
    }

    let r = u * v_t;
    let rotation = Mat3A::from_cols(
        Vec3A::new(r[(0, 0)], r[(1, 0)], r[(2, 0)]),
        Vec3A::new(r[(0, 1)], r[(1, 1)], r[(2, 1)]),
        Vec3A::new(r[(0, 2)], r[(1, 2)], r[(2, 2)]),
    );

    if rotation.is_finite() {
        rotation
    } else {
        Mat3A::IDENTITY
    }
}
