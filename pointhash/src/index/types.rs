use crate::config::{FIXED_HASH_BUCKET_SIZE, FIXED_POINTS_PER_CELL, FREE_SLOT_VALUE};
use common::{Aabb, Point};
use glam::UVec3;

/// One entry of a hash bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashTableEntry {
    pub raw_cell_id: u32,
    /// Instance-relative slot offset of the cell, `None` while unclaimed.
    pub cell: Option<u32>,
    pub num_points: u32,
}

impl HashTableEntry {
    pub const EMPTY: HashTableEntry = HashTableEntry {
        raw_cell_id: 0,
        cell: None,
        num_points: 0,
    };

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// Signed wire form: negative marks an empty entry.
    #[inline(always)]
    pub fn point_cell_index(&self) -> i32 {
        match self.cell {
            Some(cell) => cell as i32,
            None => -1,
        }
    }
}

impl Default for HashTableEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointSlot {
    #[default]
    Free,
    Occupied(Point),
}

impl PointSlot {
    #[inline(always)]
    pub fn is_free(&self) -> bool {
        matches!(self, PointSlot::Free)
    }

    #[inline(always)]
    pub fn point(&self) -> Option<&Point> {
        match self {
            PointSlot::Free => None,
            PointSlot::Occupied(point) => Some(point),
        }
    }

    /// Wire form of the slot. Free slots carry `FREE_SLOT_VALUE`.
    pub fn to_wire(&self) -> Point {
        match self {
            PointSlot::Free => Point::default().with_value(FREE_SLOT_VALUE),
            PointSlot::Occupied(point) => *point,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Every entry of the bucket is held by another cell.
    BucketFull,
    /// The point's cell has no free slot left.
    CellFull,
    /// The instance ran out of preallocated cells.
    ArenaExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropStats {
    pub bucket_full: u32,
    pub cell_full: u32,
    pub arena_exhausted: u32,
}

impl DropStats {
    pub fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::BucketFull => self.bucket_full += 1,
            DropReason::CellFull => self.cell_full += 1,
            DropReason::ArenaExhausted => self.arena_exhausted += 1,
        }
    }

    pub fn merge(&mut self, other: &DropStats) {
        self.bucket_full += other.bucket_full;
        self.cell_full += other.cell_full;
        self.arena_exhausted += other.arena_exhausted;
    }

    pub fn total(&self) -> u32 {
        self.bucket_full + self.cell_full + self.arena_exhausted
    }
}

/// Per-instance bookkeeping. Offsets index the shared arrays of the owning
/// `PointHashIndex`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
    pub point_range_offset: u32,
    pub point_count: u32,
    pub aabb: Aabb,
    pub grid_dim: u32,
    pub disk_radius: f32,
    pub cell_size: f32,
    pub is_dynamic: bool,
    /// First entry of this instance in the hash table.
    pub hash_table_offset: usize,
    /// Number of buckets.
    pub hash_table_size: u32,
    /// First slot of this instance in the point cell arena.
    pub cell_offset: usize,
    pub num_cells: u32,
    pub num_allocated_cells: u32,
    pub num_indexed_points: u32,
    pub drops: DropStats,
}

impl InstanceInfo {
    #[inline(always)]
    pub fn hash_table_entries(&self) -> usize {
        self.hash_table_size as usize * FIXED_HASH_BUCKET_SIZE
    }

    #[inline(always)]
    pub fn bucket_offset(&self) -> usize {
        self.hash_table_offset / FIXED_HASH_BUCKET_SIZE
    }

    #[inline(always)]
    pub fn max_num_points(&self) -> usize {
        self.num_cells as usize * FIXED_POINTS_PER_CELL
    }

    pub fn grid_dims(&self) -> UVec3 {
        UVec3::splat(self.grid_dim)
    }
}
