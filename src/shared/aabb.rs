use glam::Vec3A;
use std::ops::{Add, AddAssign};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3A,
    pub max: Vec3A,
}

impl Aabb {
    pub const ZERO: Self = Self {
        min: Vec3A::ZERO,
        max: Vec3A::ZERO,
    };

    #[inline]
    pub const fn new(min: Vec3A, max: Vec3A) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`, or `None` if there are none.
    pub fn from_points<I: IntoIterator<Item = Vec3A>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    #[inline]
    #[must_use]
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3A {
        (self.min + self.max) * 0.5
    }

    /// Half the length of the diagonal.
    #[inline]
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }

    #[inline]
    pub fn intersects(&self, rhs: &Self) -> bool {
        self.min.cmple(rhs.max).all() && self.max.cmpge(rhs.min).all()
    }

    /// Nearest point of the box to `point`. Points inside are returned unchanged.
    #[inline]
    pub fn clamp_point(&self, point: Vec3A) -> Vec3A {
        point.clamp(self.min, self.max)
    }

    /// Zero for points inside the box.
    #[inline]
    pub fn distance_to_point(&self, point: Vec3A) -> f32 {
        point.distance(self.clamp_point(point))
    }
}

impl Add for Aabb {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            min: self.min.min(rhs.min),
            max: self.max.max(rhs.max),
        }
    }
}

impl AddAssign for Aabb {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
