use glam::Vec3;
use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that any `expand_to_include_point` call will snap to.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(-f32::MAX),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight box around `positions`, or `None` for an empty iterator.
    pub fn from_positions<I: IntoIterator<Item = Vec3>>(positions: I) -> Option<Self> {
        let mut aabb = Aabb::EMPTY;
        for position in positions {
            aabb.expand_to_include_point(position);
        }
        if aabb.is_empty() {
            None
        } else {
            Some(aabb)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn expand_to_include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows every side by `margin` times the current extent, so a margin of
    /// 0.5 doubles the box around its center.
    pub fn expanded_by_margin(&self, margin: f32) -> Aabb {
        let pad = self.extent() * margin;
        Aabb {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn get_random_point_inside<R: Rng>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            self._safe_randf32(rng, self.min.x, self.max.x),
            self._safe_randf32(rng, self.min.y, self.max.y),
            self._safe_randf32(rng, self.min.z, self.max.z),
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}
