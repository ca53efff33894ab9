use glam::{Vec2, Vec3A};

use crate::{consts::collision, shared::Aabb};

/// Gate data. `is_first` and `is_last` are filled in by
/// [`Track::new`](crate::Track::new) once the full gate set is known.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckpointGate {
    pub id: u32,
    /// Ground-plane centers of the two solid poles.
    pub poles: [Vec2; 2],
    /// Counter-clockwise rotation of the gate about `z`, in radians.
    pub angle: f32,
    pub is_first: bool,
    pub is_last: bool,
    /// Set on the gate the driver should pass next.
    pub tracked: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityKind {
    Obstacle,
    CheckpointGate(CheckpointGate),
    /// Scenery with no collision.
    Decorative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Obstacle,
    Checkpoint,
    Decorative,
}

/// Anything placed in the world at load time. Never moves.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticEntity {
    pub position: Vec3A,
    pub aabb: Aabb,
    /// Bounding radius used for broad-phase inflation and visibility margins.
    pub radius: f32,
    pub kind: EntityKind,
}

impl StaticEntity {
    #[must_use]
    pub fn obstacle(aabb: Aabb) -> Self {
        Self {
            position: aabb.center(),
            aabb,
            radius: aabb.radius(),
            kind: EntityKind::Obstacle,
        }
    }

    #[must_use]
    pub fn decorative(position: Vec3A, radius: f32) -> Self {
        Self {
            position,
            aabb: Aabb::new(position - radius, position + radius),
            radius,
            kind: EntityKind::Decorative,
        }
    }

    /// A gate whose local box is `±half_extents` around `center` in the ground plane and
    /// `height` tall, turned by `angle`. The poles sit `pole_inset` in from two opposite
    /// corners of the local box. The bounding box holds poles of the default radius;
    /// [`Track::new`](crate::Track::new) widens it further for larger configured poles.
    #[must_use]
    pub fn checkpoint_gate(
        id: u32,
        center: Vec3A,
        half_extents: Vec2,
        height: f32,
        angle: f32,
        pole_inset: f32,
    ) -> Self {
        let rot = Vec2::from_angle(angle);
        let center_2d = center.truncate();
        let to_world = |local: Vec2| center_2d + rot.rotate(local);

        let corners = [
            Vec2::new(-half_extents.x, -half_extents.y),
            Vec2::new(half_extents.x, -half_extents.y),
            Vec2::new(half_extents.x, half_extents.y),
            Vec2::new(-half_extents.x, half_extents.y),
        ]
        .map(to_world);

        let inset = Vec2::splat(pole_inset);
        let poles = [
            to_world(-half_extents + inset),
            to_world(half_extents - inset),
        ];

        let (mut min, mut max) = (corners[0], corners[0]);
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }
        let aabb = Aabb::new(min.extend(center.z).into(), max.extend(center.z + height).into());

        let mut gate = Self {
            position: center,
            aabb,
            radius: aabb.radius(),
            kind: EntityKind::CheckpointGate(CheckpointGate {
                id,
                poles,
                angle,
                is_first: false,
                is_last: false,
                tracked: false,
            }),
        };
        gate.cover_poles(collision::POLE_RADIUS);
        gate
    }

    /// Grows a gate's bounding box to hold both pole discs of `pole_radius`.
    /// Does nothing for other entities.
    pub fn cover_poles(&mut self, pole_radius: f32) {
        let Some(poles) = self.as_gate().map(|g| g.poles) else {
            return;
        };
        let reach = Vec2::splat(pole_radius.max(0.0));
        for pole in poles {
            self.aabb += Aabb::new(
                (pole - reach).extend(self.aabb.min.z).into(),
                (pole + reach).extend(self.aabb.max.z).into(),
            );
        }
        self.radius = self.aabb.radius();
    }

    #[must_use]
    pub const fn category(&self) -> EntityCategory {
        match self.kind {
            EntityKind::Obstacle => EntityCategory::Obstacle,
            EntityKind::CheckpointGate(_) => EntityCategory::Checkpoint,
            EntityKind::Decorative => EntityCategory::Decorative,
        }
    }

    #[must_use]
    pub const fn is_collidable(&self) -> bool {
        !matches!(self.kind, EntityKind::Decorative)
    }

    #[must_use]
    pub const fn as_gate(&self) -> Option<&CheckpointGate> {
        match &self.kind {
            EntityKind::CheckpointGate(gate) => Some(gate),
            _ => None,
        }
    }

    pub const fn as_gate_mut(&mut self) -> Option<&mut CheckpointGate> {
        match &mut self.kind {
            EntityKind::CheckpointGate(gate) => Some(gate),
            _ => None,
        }
    }
}
