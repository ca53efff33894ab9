use glam::{Vec2, Vec3A};

use crate::TrackError;

/// Horizontal extent of the drivable world.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl WorldBounds {
    #[must_use]
    pub const fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Shrinks every side by `margin`. Sides that would cross collapse onto their midpoint.
    #[must_use]
    pub fn inset(&self, margin: f32) -> Self {
        let shrink = |lo: f32, hi: f32| {
            if hi - lo > 2.0 * margin {
                (lo + margin, hi - margin)
            } else {
                let mid = (lo + hi) * 0.5;
                (mid, mid)
            }
        };
        let (x_min, x_max) = shrink(self.x_min, self.x_max);
        let (y_min, y_max) = shrink(self.y_min, self.y_max);
        Self::new(x_min, x_max, y_min, y_max)
    }

    #[must_use]
    pub fn clamp(&self, pos: Vec3A) -> Vec3A {
        Vec3A::new(
            pos.x.clamp(self.x_min, self.x_max),
            pos.y.clamp(self.y_min, self.y_max),
            pos.z,
        )
    }

    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        (self.x_min..=self.x_max).contains(&pos.x) && (self.y_min..=self.y_max).contains(&pos.y)
    }
}

/// Read-only ground query used for clamping and slope estimation.
pub trait Terrain {
    fn height_at(&self, x: f32, y: f32) -> f32;

    fn bounds(&self) -> WorldBounds;

    /// Road slope in radians along `heading`, sampled `probe` meters ahead of `point`.
    /// Positive when the ground descends.
    fn slope_along(&self, point: Vec2, heading: Vec2, probe: f32) -> f32 {
        let Some(dir) = heading.try_normalize() else {
            return 0.0;
        };
        if probe <= 0.0 {
            return 0.0;
        }
        let ahead = point + dir * probe;
        let drop = self.height_at(point.x, point.y) - self.height_at(ahead.x, ahead.y);
        drop.atan2(probe)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatTerrain {
    pub height: f32,
    pub bounds: WorldBounds,
}

impl FlatTerrain {
    #[must_use]
    pub const fn new(height: f32, bounds: WorldBounds) -> Self {
        Self { height, bounds }
    }
}

impl Terrain for FlatTerrain {
    fn height_at(&self, _x: f32, _y: f32) -> f32 {
        self.height
    }

    fn bounds(&self) -> WorldBounds {
        self.bounds
    }
}

/// Heights sampled on a regular grid, row-major with rows running along `y`.
///
/// Each cell is split along its `(1, 0)`-`(0, 1)` diagonal and interpolated on whichever
/// triangle holds the query point. Points outside the grid use the nearest edge cell.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    origin: Vec2,
    cell_size: f32,
    columns: usize,
    rows: usize,
    heights: Vec<f32>,
}

impl HeightField {
    pub fn new(
        origin: Vec2,
        cell_size: f32,
        columns: usize,
        heights: Vec<f32>,
    ) -> Result<Self, TrackError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TrackError::InvalidCellSize(cell_size));
        }

        let samples = heights.len();
        if columns < 2 || samples % columns != 0 || samples / columns < 2 {
            return Err(TrackError::MalformedHeightField { columns, samples });
        }

        Ok(Self {
            origin,
            cell_size,
            columns,
            rows: samples / columns,
            heights,
        })
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    fn sample(&self, col: usize, row: usize) -> f32 {
        self.heights[row * self.columns + col]
    }

    // Cell index and the offset inside it along one axis.
    fn locate(coord: f32, cell_size: f32, count: usize) -> (usize, f32) {
        let scaled = coord / cell_size;
        let max_idx = count - 2;
        let idx = if scaled.is_finite() && scaled > 0.0 {
            (scaled.floor() as usize).min(max_idx)
        } else {
            0
        };
        let frac = if scaled.is_finite() {
            (scaled - idx as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (idx, frac)
    }
}

impl Terrain for HeightField {
    fn height_at(&self, x: f32, y: f32) -> f32 {
        let local = Vec2::new(x, y) - self.origin;
        let (i, u) = Self::locate(local.x, self.cell_size, self.columns);
        let (j, v) = Self::locate(local.y, self.cell_size, self.rows);

        let h00 = self.sample(i, j);
        let h10 = self.sample(i + 1, j);
        let h01 = self.sample(i, j + 1);
        let h11 = self.sample(i + 1, j + 1);

        if u + v <= 1.0 {
            h00 + u * (h10 - h00) + v * (h01 - h00)
        } else {
            h11 + (1.0 - u) * (h01 - h11) + (1.0 - v) * (h10 - h11)
        }
    }

    fn bounds(&self) -> WorldBounds {
        WorldBounds::new(
            self.origin.x,
            self.origin.x + (self.columns - 1) as f32 * self.cell_size,
            self.origin.y,
            self.origin.y + (self.rows - 1) as f32 * self.cell_size,
        )
    }
}
