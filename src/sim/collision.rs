//! Positional correction of predicted particles against the static world.

use glam::{Vec2, Vec3A};

use crate::{
    consts::{collision, epsilon},
    shared::Aabb,
    sim::{EntityKind, GridQuery, Particle, StaticEntity, Terrain, Track, WorldBounds},
};

/// Shrinks `correction` by repeated halving until its length is at most
/// `max(0.2, displacement * 0.5)`. Non-finite corrections become zero.
#[must_use]
pub fn limit_correction(correction: Vec3A, displacement: f32) -> Vec3A {
    if !correction.is_finite() {
        return Vec3A::ZERO;
    }

    let cap = correction_cap(displacement);
    let mut c = correction;
    while c.length() > cap {
        c *= 0.5;
    }
    c
}

#[must_use]
pub fn correction_cap(displacement: f32) -> f32 {
    collision::MIN_CORRECTION_CAP.max(displacement * collision::CORRECTION_CAP_PER_DISPLACEMENT)
}

/// Fixed state for the sub-iterations of one tick.
pub(crate) struct Resolver<'a> {
    pub track: &'a Track,
    pub terrain: &'a dyn Terrain,
    /// Terrain bounds already shrunk by the boundary margin.
    pub bounds: WorldBounds,
    pub radius: f32,
    /// Extra contact distance proportional to this tick's displacement.
    pub margin: f32,
    pub displacement: f32,
    /// Velocity-dependent push multiplier.
    pub rebound: f32,
    /// Unit direction opposing the drivetrain's pull, if it is pulling. Gate poles push
    /// along it when it leads away from the pole, and radially out of the pole otherwise.
    pub pole_push: Option<Vec3A>,
    /// Used when a push direction degenerates.
    pub fallback: Vec3A,
}

impl Resolver<'_> {
    /// Keeps every predicted position inside the world bounds and on or above the ground.
    pub fn clamp_to_world(&self, particles: &mut [Particle]) {
        for p in particles {
            let mut pos = self.bounds.clamp(p.predicted);
            let ground = self.terrain.height_at(pos.x, pos.y);
            if ground.is_finite() && pos.z < ground {
                pos.z = ground;
            }
            p.predicted = pos;
        }
    }

    /// One contact pass over every collidable entity near the cloud. Ids of gates the cloud
    /// overlapped are pushed to `touched_gates`.
    pub fn resolve_contacts(
        &self,
        particles: &mut [Particle],
        query: &mut GridQuery,
        touched_gates: &mut Vec<u32>,
    ) {
        let Some(cloud) = Aabb::from_points(particles.iter().map(|p| p.predicted)) else {
            return;
        };
        let cloud = cloud.expanded(self.radius + self.margin);
        let reach = (cloud.max - cloud.min).truncate().length() * 0.5;

        self.track.grid().query_into(cloud.center(), reach, query);

        let entities = self.track.entities();
        for idx in query.collidable() {
            let Some(entity) = entities.get(idx) else {
                continue;
            };
            if !cloud.intersects(&entity.aabb) {
                continue;
            }

            if let EntityKind::CheckpointGate(gate) = &entity.kind
                && !touched_gates.contains(&gate.id)
            {
                touched_gates.push(gate.id);
            }

            for p in particles.iter_mut() {
                let correction = self.contact_correction(entity, p.predicted);
                p.predicted += limit_correction(correction, self.displacement);
            }
        }
    }

    fn contact_correction(&self, entity: &StaticEntity, pos: Vec3A) -> Vec3A {
        let contact = self.radius + self.margin;
        let diff = pos - entity.aabb.clamp_point(pos);
        let dist = diff.length();
        if dist >= contact {
            return Vec3A::ZERO;
        }

        match &entity.kind {
            EntityKind::Obstacle => {
                let dir = diff
                    .try_normalize()
                    .filter(|d| d.length_squared() > epsilon::DIRECTION)
                    .unwrap_or(self.fallback);
                dir * (self.rebound * (self.radius - dist).abs())
            }
            EntityKind::CheckpointGate(gate) => {
                let pole_contact = self.radius + self.track.config().pole_radius;
                let pos_2d = pos.truncate();
                gate.poles
                    .iter()
                    .filter_map(|&pole: &Vec2| {
                        let offset = pos_2d - pole;
                        let d = offset.length();
                        (d < pole_contact).then(|| {
                            self.pole_direction(offset) * ((pole_contact - d) * self.rebound)
                        })
                    })
                    .sum()
            }
            EntityKind::Decorative => Vec3A::ZERO,
        }
    }

    // `offset` runs from the pole center to the particle in the ground plane.
    fn pole_direction(&self, offset: Vec2) -> Vec3A {
        let away = Vec3A::from(offset.extend(0.0));
        self.pole_push
            .filter(|dir| dir.dot(away) > 0.0)
            .or_else(|| away.try_normalize())
            .unwrap_or(self.fallback)
    }
}
