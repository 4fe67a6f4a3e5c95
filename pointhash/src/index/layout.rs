use super::types::{DropStats, InstanceInfo};
use crate::config::{Config, MAX_GRID_DIM};
use crate::error::{PointHashError, PointHashResult};
use crate::sizing;
use common::{Aabb, InstanceSamples, Point, SampledScene};
use glam::Vec3;

pub(crate) fn validate_scene(scene: &SampledScene, config: &Config) -> PointHashResult<()> {
    config.validate()?;
    for (instance, samples) in scene.instances.iter().enumerate() {
        let end = samples.point_offset as u64 + samples.point_count as u64;
        if end > scene.points.len() as u64 {
            return Err(PointHashError::PointRangeOutOfBounds {
                instance,
                offset: samples.point_offset,
                count: samples.point_count,
                total_points: scene.points.len(),
            });
        }
        if samples.point_count > 0
            && !(samples.disk_radius.is_finite() && samples.disk_radius > 0.0)
        {
            return Err(PointHashError::InvalidDiskRadius {
                instance,
                radius: samples.disk_radius,
            });
        }
    }
    Ok(())
}

/// Offsets are sent to the client as `u32`, so the shared arrays may not
/// grow past `u32::MAX` entries.
pub(crate) fn check_layout(
    instance: usize,
    hash_table_entries: usize,
    point_slots: usize,
) -> PointHashResult<()> {
    let limit = u32::MAX as usize;
    if hash_table_entries > limit || point_slots > limit {
        return Err(PointHashError::LayoutOverflow {
            instance,
            hash_table_entries,
            point_slots,
        });
    }
    Ok(())
}

impl InstanceInfo {
    /// Sizes one instance from its points. Offsets are left at zero and
    /// assigned once the instance's place in the shared arrays is known.
    pub(crate) fn plan(samples: &InstanceSamples, points: &[Point], config: &Config) -> Self {
        let sizing = sizing::estimate(samples.point_count, samples.is_dynamic, config);
        let aabb = Aabb::from_positions(points.iter().map(|point| point.position))
            .map(|tight| tight.expanded_by_margin(config.aabb_margin))
            .unwrap_or_default();
        let (cell_size, grid_dim) =
            grid_layout(aabb.extent(), samples.disk_radius * config.disk_radius_factor);

        Self {
            point_range_offset: samples.point_offset,
            point_count: samples.point_count,
            aabb,
            grid_dim,
            disk_radius: samples.disk_radius,
            cell_size,
            is_dynamic: samples.is_dynamic,
            hash_table_offset: 0,
            hash_table_size: sizing.hash_table_size,
            cell_offset: 0,
            num_cells: sizing.num_cells,
            num_allocated_cells: 0,
            num_indexed_points: 0,
            drops: DropStats::default(),
        }
    }
}

/// Cell size and cubic cell count covering `extent`. The count is the
/// largest per-axis count plus one, so the far face of the box still maps
/// inside the grid. A grid finer than `MAX_GRID_DIM` per axis gets a coarser
/// cell instead, so every cell stays one voxel of the box.
pub(crate) fn grid_layout(extent: Vec3, cell_size: f32) -> (f32, u32) {
    let max_extent = extent.max_element();
    if !(max_extent.is_finite() && max_extent > 0.0) {
        return (cell_size, 1);
    }
    let cells = (max_extent / cell_size).floor();
    if cells < MAX_GRID_DIM as f32 {
        return (cell_size, cells as u32 + 1);
    }

    let mut coarse = max_extent / (MAX_GRID_DIM - 1) as f32;
    while (max_extent / coarse).floor() >= MAX_GRID_DIM as f32 {
        coarse = f32::from_bits(coarse.to_bits() + 1);
    }
    let dim = (max_extent / coarse).floor() as u32 + 1;
    tracing::warn!(
        requested = cell_size,
        cell_size = coarse,
        dim,
        max = MAX_GRID_DIM,
        "grid too fine, coarsening cells"
    );
    (coarse, dim)
}
