use glam::{IVec3, UVec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashData {
    /// Bucket index in `[0, hash_table_size)`.
    pub hash_base: u32,
    /// Linear id of the grid cell before it is folded into the table.
    pub raw_cell_id: u32,
}

/// Linear id of a cell in a cubic grid of `grid_dim` cells per axis.
#[inline(always)]
pub fn raw_cell_id(coords: UVec3, grid_dim: u32) -> u32 {
    coords
        .x
        .wrapping_add(grid_dim.wrapping_mul(coords.y.wrapping_add(grid_dim.wrapping_mul(coords.z))))
}

#[inline(always)]
pub fn decode_raw_cell_id(raw_cell_id: u32, grid_dim: u32) -> UVec3 {
    let dim = grid_dim.max(1);
    UVec3::new(
        raw_cell_id % dim,
        (raw_cell_id / dim) % dim,
        raw_cell_id / dim.saturating_mul(dim),
    )
}

/// Folds a cell id into a bucket using the top bits of its multiplicative
/// hash. `hash_table_size` must be a power of two.
#[inline(always)]
pub fn bucket_for(raw_cell_id: u32, hash_table_size: u32) -> u32 {
    debug_assert!(hash_table_size.is_power_of_two());
    let bits = hash_table_size.trailing_zeros();
    if bits == 0 {
        return 0;
    }
    fxhash::hash32(&raw_cell_id) >> (32 - bits)
}

/// Coordinates outside the grid are clamped onto its border cells.
#[inline(always)]
pub fn hash_cell(coords: IVec3, grid_dim: u32, hash_table_size: u32) -> HashData {
    let max = grid_dim.max(1) as i32 - 1;
    let clamped = coords.clamp(IVec3::ZERO, IVec3::splat(max)).as_uvec3();
    let raw_cell_id = raw_cell_id(clamped, grid_dim);
    HashData {
        hash_base: bucket_for(raw_cell_id, hash_table_size),
        raw_cell_id,
    }
}
