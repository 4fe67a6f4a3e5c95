use super::types::{HashTableEntry, PointSlot};
use super::PointHashIndex;
use crate::config::{FIXED_HASH_BUCKET_SIZE, FIXED_POINTS_PER_CELL};
use crate::hash::{decode_raw_cell_id, hash_cell};
use common::Point;
use glam::Vec3;
use serialization::quantize::{cell_coords, cell_origin};

impl PointHashIndex {
    /// Resident hash entry for the cell containing `position`, if that cell
    /// was allocated during the build.
    pub fn find_cell(&self, instance_id: usize, position: Vec3) -> Option<&HashTableEntry> {
        let info = self.instances.get(instance_id)?;
        if info.point_count == 0 || !info.aabb.contains_point(position) {
            return None;
        }
        let coords = cell_coords(position, info.aabb.min, info.cell_size);
        let hd = hash_cell(coords, info.grid_dim, info.hash_table_size);
        let start = info.hash_table_offset + hd.hash_base as usize * FIXED_HASH_BUCKET_SIZE;
        self.hash_table[start..start + FIXED_HASH_BUCKET_SIZE]
            .iter()
            .find(|entry| !entry.is_empty() && entry.raw_cell_id == hd.raw_cell_id)
    }

    /// Occupied points of the cell referenced by `entry`.
    pub fn cell_points(
        &self,
        instance_id: usize,
        entry: &HashTableEntry,
    ) -> impl Iterator<Item = &Point> + '_ {
        let range = match (self.instances.get(instance_id), entry.cell) {
            (Some(info), Some(cell)) => {
                let start = info.cell_offset + cell as usize;
                start..start + FIXED_POINTS_PER_CELL
            }
            _ => 0..0,
        };
        self.point_cells[range].iter().filter_map(PointSlot::point)
    }

    /// World-space corner of a cell, the reference point for decoding the
    /// compressed points stored in it.
    pub fn cell_origin(&self, instance_id: usize, raw_cell_id: u32) -> Option<Vec3> {
        let info = self.instances.get(instance_id)?;
        let coords = decode_raw_cell_id(raw_cell_id, info.grid_dim).as_ivec3();
        Some(cell_origin(coords, info.aabb.min, info.cell_size))
    }
}
