use crate::config::{Config, FIXED_HASH_BUCKET_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSizing {
    /// Number of buckets, each `FIXED_HASH_BUCKET_SIZE` entries wide.
    pub hash_table_size: u32,
    /// Preallocated cells, each `FIXED_POINTS_PER_CELL` slots wide.
    pub num_cells: u32,
}

pub fn estimate(point_count: u32, is_dynamic: bool, config: &Config) -> GridSizing {
    GridSizing {
        hash_table_size: hash_table_size(point_count, config),
        num_cells: num_cells(point_count, is_dynamic, config),
    }
}

/// `2^(ceil(log2(point_count / bucket)) + factor)`, never below the bucket
/// width. The quotient is an integer division, so fewer points than one
/// bucket lands on the floor.
pub fn hash_table_size(point_count: u32, config: &Config) -> u32 {
    let floor = FIXED_HASH_BUCKET_SIZE as u32;
    let quotient = point_count / floor;
    if quotient == 0 {
        return floor;
    }
    let log2 = ceil_log2(quotient) + config.hash_log2_size_factor;
    let size = if log2 >= 31 { 1u32 << 31 } else { 1u32 << log2 };
    size.max(floor)
}

pub fn num_cells(point_count: u32, is_dynamic: bool, config: &Config) -> u32 {
    let estimate =
        (point_count as f32 / config.disk_radius_factor) * config.cells_preallocation_factor;
    let cells = (estimate as u32).max(1);
    if is_dynamic {
        cells.saturating_mul(config.dynamic_cell_headroom)
    } else {
        cells
    }
}

#[inline(always)]
fn ceil_log2(value: u32) -> u32 {
    debug_assert!(value > 0);
    32 - (value - 1).leading_zeros()
}
