use crate::error::{PointHashError, PointHashResult};

/// Entries per hash bucket. Collisions are resolved by a linear scan of the
/// bucket only; there is no chaining.
pub const FIXED_HASH_BUCKET_SIZE: usize = 4;
/// Point slots per cell.
pub const FIXED_POINTS_PER_CELL: usize = 16;
/// Marks an empty entry in the compacted hash table.
pub const INVALID_CELL: u32 = u32::MAX;
/// `value` written to free slots in the wire columns.
pub const FREE_SLOT_VALUE: f32 = -1.0;
/// `value` of a claimed slot whose occlusion has not been computed yet.
pub const UNINITIALIZED_VALUE: f32 = 2.0;
/// Byte ceiling for the point update staging buffer.
pub const MAX_STAGING_BYTES: u64 = 4_000_000_000;
/// Largest cubic grid whose linear cell ids still fit in a `u32`.
pub const MAX_GRID_DIM: u32 = 1625;

const _: () = assert!(FIXED_HASH_BUCKET_SIZE.is_power_of_two());
const _: () = assert!(FIXED_POINTS_PER_CELL.is_power_of_two());

#[derive(Debug, Clone)]
pub struct Config {
    /// Added to `ceil(log2(points / bucket size))` when sizing the table.
    pub hash_log2_size_factor: u32,
    /// Cell edge length in units of the sampling disk radius. Also the
    /// expected number of points per cell when estimating the cell count.
    pub disk_radius_factor: f32,
    pub cells_preallocation_factor: f32,
    /// Cell count multiplier for instances that move after the build.
    pub dynamic_cell_headroom: u32,
    /// Fraction of the point extent added on every side of an instance box.
    pub aabb_margin: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hash_log2_size_factor: 1,
            disk_radius_factor: 2.0,
            cells_preallocation_factor: 4.0,
            dynamic_cell_headroom: 8,
            aabb_margin: 0.5,
        }
    }
}

impl Config {
    pub fn validate(&self) -> PointHashResult<()> {
        check_positive("disk_radius_factor", self.disk_radius_factor)?;
        check_positive("cells_preallocation_factor", self.cells_preallocation_factor)?;
        if self.dynamic_cell_headroom == 0 {
            return Err(PointHashError::InvalidConfig {
                name: "dynamic_cell_headroom",
                value: 0.0,
            });
        }
        if !self.aabb_margin.is_finite() || self.aabb_margin < 0.0 {
            return Err(PointHashError::InvalidConfig {
                name: "aabb_margin",
                value: self.aabb_margin,
            });
        }
        if self.hash_log2_size_factor > 16 {
            return Err(PointHashError::InvalidConfig {
                name: "hash_log2_size_factor",
                value: self.hash_log2_size_factor as f32,
            });
        }
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f32) -> PointHashResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PointHashError::InvalidConfig { name, value })
    }
}
