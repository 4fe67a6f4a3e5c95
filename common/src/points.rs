use crate::bounds::Aabb;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rand::Rng;

/// Surface sample produced by the point sampler.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub barycentrics: Vec2,
    pub instance_triangle_id: u32,
    pub instance_id: u32,
    pub value: f32,
}

impl Point {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    pub fn with_instance(mut self, instance_id: u32, instance_triangle_id: u32) -> Self {
        self.instance_id = instance_id;
        self.instance_triangle_id = instance_triangle_id;
        self
    }

    pub fn random_inside<R: Rng>(bounds: &Aabb, instance_id: u32, rng: &mut R) -> Self {
        let position = bounds.get_random_point_inside(rng);
        let normal = random_unit_vector(rng);
        let tangent = normal.any_orthonormal_vector();
        let b0: f32 = rng.gen_range(0.0..=1.0);
        let b1: f32 = rng.gen_range(0.0..=(1.0 - b0));
        Self {
            position,
            normal,
            tangent,
            barycentrics: Vec2::new(b0, b1),
            instance_triangle_id: rng.gen_range(0..1024),
            instance_id,
            value: 0.0,
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::Z,
            tangent: Vec3::X,
            barycentrics: Vec2::ZERO,
            instance_triangle_id: 0,
            instance_id: 0,
            value: 0.0,
        }
    }
}

fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Per-instance slice of the sampled point stream.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InstanceSamples {
    pub point_offset: u32,
    pub point_count: u32,
    pub disk_radius: f32,
    pub is_dynamic: bool,
}

impl InstanceSamples {
    pub fn point_range(&self) -> std::ops::Range<usize> {
        let start = self.point_offset as usize;
        start..start + self.point_count as usize
    }
}

/// Everything the sampler hands over for one scene load.
#[derive(Debug, Clone, Default)]
pub struct SampledScene {
    pub points: Vec<Point>,
    pub instances: Vec<InstanceSamples>,
}

impl SampledScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    /// Appends an instance whose points follow the current end of the stream.
    pub fn push_instance(&mut self, points: &[Point], disk_radius: f32, is_dynamic: bool) -> u32 {
        let instance_id = self.instances.len() as u32;
        self.instances.push(InstanceSamples {
            point_offset: self.points.len() as u32,
            point_count: points.len() as u32,
            disk_radius,
            is_dynamic,
        });
        self.points.extend_from_slice(points);
        instance_id
    }

    pub fn instance_points(&self, instance_id: usize) -> Option<&[Point]> {
        let instance = self.instances.get(instance_id)?;
        self.points.get(instance.point_range())
    }
}
