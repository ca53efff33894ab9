use ahash::AHashMap;
use glam::{IVec2, Mat4, Vec2, Vec3A};

use crate::{
    TrackError,
    consts::collision,
    sim::{EntityCategory, StaticEntity},
};

#[derive(Debug, Clone)]
struct GridCell {
    coords: IVec2,
    obstacle_indices: Vec<usize>,
    checkpoint_indices: Vec<usize>,
    decorative_indices: Vec<usize>,
}

impl GridCell {
    const fn new(coords: IVec2) -> Self {
        Self {
            coords,
            obstacle_indices: Vec::new(),
            checkpoint_indices: Vec::new(),
            decorative_indices: Vec::new(),
        }
    }

    fn list_mut(&mut self, category: EntityCategory) -> &mut Vec<usize> {
        match category {
            EntityCategory::Obstacle => &mut self.obstacle_indices,
            EntityCategory::Checkpoint => &mut self.checkpoint_indices,
            EntityCategory::Decorative => &mut self.decorative_indices,
        }
    }
}

/// Entity indices returned by a grid query, split by category and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridQuery {
    pub obstacles: Vec<usize>,
    pub checkpoints: Vec<usize>,
    pub decorative: Vec<usize>,
}

impl GridQuery {
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.checkpoints.clear();
        self.decorative.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.checkpoints.is_empty() && self.decorative.is_empty()
    }

    /// Obstacles then checkpoints. Decorative entities never collide.
    pub fn collidable(&self) -> impl Iterator<Item = usize> + '_ {
        self.obstacles.iter().chain(&self.checkpoints).copied()
    }

    fn extend_from(&mut self, cell: &GridCell) {
        self.obstacles.extend_from_slice(&cell.obstacle_indices);
        self.checkpoints.extend_from_slice(&cell.checkpoint_indices);
        self.decorative.extend_from_slice(&cell.decorative_indices);
    }

    fn finish(&mut self) {
        for list in [&mut self.obstacles, &mut self.checkpoints, &mut self.decorative] {
            list.sort_unstable();
            list.dedup();
        }
    }

    fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) {
        self.obstacles.retain(|&i| keep(i));
        self.checkpoints.retain(|&i| keep(i));
        self.decorative.retain(|&i| keep(i));
    }
}

/// Uniform grid over the ground plane. Every entity lives in the one cell holding its
/// position; queries widen their range by the largest entity radius so nothing that
/// overlaps the query area is missed.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: AHashMap<i64, GridCell>,
    max_entity_radius: f32,
    entity_count: usize,
}

impl SpatialGrid {
    pub fn build(entities: &[StaticEntity], cell_size: f32) -> Result<Self, TrackError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TrackError::InvalidCellSize(cell_size));
        }

        let mut grid = Self {
            cell_size,
            cells: AHashMap::new(),
            max_entity_radius: 0.0,
            entity_count: entities.len(),
        };

        for (idx, entity) in entities.iter().enumerate() {
            let coords = grid.cell_coords(entity.position.truncate());
            grid.cells
                .entry(Self::cell_key(coords))
                .or_insert_with(|| GridCell::new(coords))
                .list_mut(entity.category())
                .push(idx);
            if entity.radius.is_finite() {
                grid.max_entity_radius = grid.max_entity_radius.max(entity.radius);
            }
        }

        Ok(grid)
    }

    /// Packs both signed cell coordinates into one key. Distinct cells never share a key.
    #[must_use]
    pub const fn cell_key(coords: IVec2) -> i64 {
        ((coords.x as i64) << 32) | (coords.y as u32 as i64)
    }

    #[must_use]
    pub fn cell_coords(&self, pos: Vec2) -> IVec2 {
        // `as` saturates, and maps NaN to 0
        (pos / self.cell_size).floor().as_ivec2()
    }

    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub const fn entity_count(&self) -> usize {
        self.entity_count
    }

    #[must_use]
    pub const fn max_entity_radius(&self) -> f32 {
        self.max_entity_radius
    }

    #[must_use]
    pub fn query(&self, position: Vec3A, radius: f32) -> GridQuery {
        let mut out = GridQuery::default();
        self.query_into(position, radius, &mut out);
        out
    }

    /// Like [`Self::query`], reusing `out`'s allocations.
    pub fn query_into(&self, position: Vec3A, radius: f32, out: &mut GridQuery) {
        out.clear();

        let reach = radius.max(0.0) + self.max_entity_radius;
        let center = position.truncate();
        let lo = self.cell_coords(center - reach);
        let hi = self.cell_coords(center + reach);

        let span = hi.as_i64vec2() - lo.as_i64vec2() + 1;
        if span.x.saturating_mul(span.y) > self.cells.len() as i64 {
            for cell in self.cells.values() {
                if cell.coords.cmpge(lo).all() && cell.coords.cmple(hi).all() {
                    out.extend_from(cell);
                }
            }
        } else {
            for cx in lo.x..=hi.x {
                for cy in lo.y..=hi.y {
                    if let Some(cell) = self.cells.get(&Self::cell_key(IVec2::new(cx, cy))) {
                        out.extend_from(cell);
                    }
                }
            }
        }

        out.finish();
    }

    /// Positional query followed by a clip-space frustum test for each candidate.
    /// Only for render-side culling.
    #[must_use]
    pub fn query_visible(
        &self,
        entities: &[StaticEntity],
        position: Vec3A,
        radius: f32,
        view_proj: &Mat4,
    ) -> GridQuery {
        let mut out = self.query(position, radius);
        out.retain(|idx| {
            entities
                .get(idx)
                .is_some_and(|e| is_visible(e.position, e.radius, view_proj))
        });
        out
    }
}

/// Whether a sphere at `position` lands inside the clip volume, widened by `radius` plus a
/// fixed margin in NDC units. Anything behind the camera is rejected.
#[must_use]
pub fn is_visible(position: Vec3A, radius: f32, view_proj: &Mat4) -> bool {
    let clip = *view_proj * Vec3A::extend(position, 1.0);
    if clip.w <= 0.0 {
        return false;
    }

    let ndc = clip.truncate() / clip.w;
    let limit = 1.0 + radius + collision::VISIBILITY_MARGIN;
    ndc.abs().cmple(glam::Vec3::splat(limit)).all()
}
