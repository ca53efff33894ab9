use glam::{Mat4, Vec3A};
use log::info;

use crate::{
    TrackError,
    sim::{CheckpointGate, GridQuery, SpatialGrid, StaticEntity, TrackConfig},
};

/// The static world: every placed entity and the grid indexing them.
///
/// Entities never move. The only state that changes after load is which gate is
/// `tracked`.
#[derive(Debug, Clone)]
pub struct Track {
    config: TrackConfig,
    entities: Vec<StaticEntity>,
    grid: SpatialGrid,
    // gate id -> entity index
    gate_indices: Vec<usize>,
}

impl Track {
    /// Checks that gate ids run `0..N` without gaps or repeats, marks the first and last
    /// gates, tracks the gate after the start line, sizes gate boxes for the configured pole
    /// radius and builds the grid.
    pub fn new(mut entities: Vec<StaticEntity>, config: TrackConfig) -> Result<Self, TrackError> {
        let mut gates: Vec<(u32, usize)> = entities
            .iter()
            .enumerate()
            .filter_map(|(idx, e)| e.as_gate().map(|g| (g.id, idx)))
            .collect();
        gates.sort_unstable();

        if let Some(pair) = gates.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(TrackError::DuplicateCheckpoint { id: pair[0].0 });
        }
        for (expected, &(id, _)) in gates.iter().enumerate() {
            let expected = expected as u32;
            if id != expected {
                return Err(TrackError::NonContiguousCheckpoints { expected, found: id });
            }
        }

        let gate_indices: Vec<usize> = gates.iter().map(|&(_, idx)| idx).collect();
        let last_id = gate_indices.len().saturating_sub(1) as u32;
        let tracked_id = if gate_indices.len() > 1 { 1 } else { 0 };
        for &idx in &gate_indices {
            if let Some(gate) = entities[idx].as_gate_mut() {
                gate.is_first = gate.id == 0;
                gate.is_last = gate.id == last_id;
                gate.tracked = gate.id == tracked_id;
            }
        }

        for entity in &mut entities {
            entity.cover_poles(config.pole_radius);
        }

        let grid = SpatialGrid::build(&entities, config.grid_cell_size)?;
        info!(
            "Loaded track with {} entities ({} checkpoints) in {} grid cells",
            entities.len(),
            gate_indices.len(),
            grid.cell_count()
        );

        Ok(Self {
            config,
            entities,
            grid,
            gate_indices,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TrackConfig {
        &self.config
    }

    #[must_use]
    pub fn entities(&self) -> &[StaticEntity] {
        &self.entities
    }

    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    #[must_use]
    pub fn checkpoint_count(&self) -> u32 {
        self.gate_indices.len() as u32
    }

    #[must_use]
    pub fn gate(&self, id: u32) -> Option<&CheckpointGate> {
        let idx = *self.gate_indices.get(id as usize)?;
        self.entities[idx].as_gate()
    }

    /// Id of the gate currently flagged as tracked.
    #[must_use]
    pub fn tracked_gate(&self) -> Option<u32> {
        self.gate_indices
            .iter()
            .filter_map(|&idx| self.entities[idx].as_gate())
            .find(|g| g.tracked)
            .map(|g| g.id)
    }

    /// Moves the tracked flag from the gate just passed to the one after it, wrapping.
    pub fn advance_tracked(&mut self, passed_id: u32) {
        let count = self.checkpoint_count();
        if count == 0 {
            return;
        }
        let next_id = (passed_id + 1) % count;
        for (id, &idx) in self.gate_indices.iter().enumerate() {
            if let Some(gate) = self.entities[idx].as_gate_mut() {
                if id as u32 == passed_id {
                    gate.tracked = false;
                }
                if id as u32 == next_id {
                    gate.tracked = true;
                }
            }
        }
    }

    /// Entities within render distance of `camera` that pass the frustum test.
    #[must_use]
    pub fn visible_entities(&self, camera: Vec3A, view_proj: &Mat4) -> GridQuery {
        self.grid
            .query_visible(&self.entities, camera, self.config.render_distance, view_proj)
    }
}
