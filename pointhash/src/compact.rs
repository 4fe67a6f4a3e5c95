use crate::config::{FIXED_POINTS_PER_CELL, INVALID_CELL};
use crate::index::HashTableEntry;
use bytemuck::{Pod, Zeroable};

const OCCUPANCY_MASK: u32 = FIXED_POINTS_PER_CELL as u32 - 1;

/// Dense, transfer-ready form of a hash table entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct CompactHashEntry {
    pub raw_cell_id: u32,
    pub encoded_index: u32,
}

impl CompactHashEntry {
    pub const INVALID: CompactHashEntry = CompactHashEntry {
        raw_cell_id: INVALID_CELL,
        encoded_index: INVALID_CELL,
    };

    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.encoded_index != INVALID_CELL
    }

    /// Returns `(cell slot offset, num_points)` for a valid entry.
    #[inline(always)]
    pub fn decode(&self) -> Option<(u32, u32)> {
        if !self.is_valid() {
            return None;
        }
        Some((
            self.encoded_index & !OCCUPANCY_MASK,
            (self.encoded_index & OCCUPANCY_MASK) + 1,
        ))
    }
}

/// Packs a cell's slot offset and point count into one value. Cell offsets
/// are multiples of `FIXED_POINTS_PER_CELL`, which leaves the low bits free
/// for `num_points - 1`.
#[inline(always)]
pub fn encode_cell_index(cell: u32, num_points: u32) -> u32 {
    debug_assert_eq!(cell & OCCUPANCY_MASK, 0);
    debug_assert!((1..=FIXED_POINTS_PER_CELL as u32).contains(&num_points));
    cell | (num_points.saturating_sub(1) & OCCUPANCY_MASK)
}

#[inline(always)]
pub fn compact_entry(entry: &HashTableEntry) -> CompactHashEntry {
    match entry.cell {
        Some(cell) => CompactHashEntry {
            raw_cell_id: entry.raw_cell_id,
            encoded_index: encode_cell_index(cell, entry.num_points),
        },
        None => CompactHashEntry::INVALID,
    }
}

/// One compacted entry per bucket entry, in table order.
pub fn compact_table(entries: &[HashTableEntry]) -> Vec<CompactHashEntry> {
    entries.iter().map(compact_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entry_is_invalid() {
        let compact = compact_entry(&HashTableEntry::EMPTY);
        assert_eq!(compact, CompactHashEntry::INVALID);
        assert!(!compact.is_valid());
        assert_eq!(compact.decode(), None);
    }

    #[test]
    fn encode_decode() {
        let cell = 7 * FIXED_POINTS_PER_CELL as u32;
        for num_points in 1..=FIXED_POINTS_PER_CELL as u32 {
            let compact = compact_entry(&HashTableEntry {
                raw_cell_id: 99,
                cell: Some(cell),
                num_points,
            });
            assert_eq!(compact.raw_cell_id, 99);
            assert_eq!(compact.decode(), Some((cell, num_points)));
        }
    }
}
