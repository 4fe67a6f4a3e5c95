use super::types::{DropReason, HashTableEntry, InstanceInfo, PointSlot};
use crate::config::{FIXED_HASH_BUCKET_SIZE, FIXED_POINTS_PER_CELL, UNINITIALIZED_VALUE};
use crate::hash::hash_cell;
use common::Point;
use serialization::quantize::{cell_coords, compress_point};
use serialization::CompressedPoint;

/// Exclusive view of one instance's ranges in the shared arrays. Insertion
/// through a writer is single-threaded; separate instances may run on
/// separate writers concurrently.
pub(crate) struct InstanceWriter<'a> {
    info: &'a mut InstanceInfo,
    table: &'a mut [HashTableEntry],
    bucket_cells: &'a mut [u32],
    slots: &'a mut [PointSlot],
    compressed: &'a mut [CompressedPoint],
}

impl<'a> InstanceWriter<'a> {
    pub(crate) fn new(
        info: &'a mut InstanceInfo,
        table: &'a mut [HashTableEntry],
        bucket_cells: &'a mut [u32],
        slots: &'a mut [PointSlot],
        compressed: &'a mut [CompressedPoint],
    ) -> Self {
        debug_assert_eq!(table.len(), info.hash_table_entries());
        debug_assert_eq!(bucket_cells.len(), info.hash_table_size as usize);
        debug_assert_eq!(slots.len(), info.max_num_points());
        debug_assert_eq!(compressed.len(), info.max_num_points());
        Self {
            info,
            table,
            bucket_cells,
            slots,
            compressed,
        }
    }

    pub(crate) fn insert_all(&mut self, points: &[Point]) {
        for point in points {
            self.insert(point);
        }
    }

    /// Stores `point` or counts why it was dropped.
    pub(crate) fn insert(&mut self, point: &Point) {
        match self.try_insert(point) {
            Ok(()) => self.info.num_indexed_points += 1,
            Err(reason) => self.info.drops.record(reason),
        }
    }

    fn try_insert(&mut self, point: &Point) -> Result<(), DropReason> {
        let coords = cell_coords(point.position, self.info.aabb.min, self.info.cell_size);
        let hd = hash_cell(coords, self.info.grid_dim, self.info.hash_table_size);
        let base = hd.hash_base as usize * FIXED_HASH_BUCKET_SIZE;

        let mut first_free = None;
        for index in base..base + FIXED_HASH_BUCKET_SIZE {
            let entry = self.table[index];
            match entry.cell {
                Some(cell) if entry.raw_cell_id == hd.raw_cell_id => {
                    return self.insert_into_cell(index, cell, point);
                }
                None if first_free.is_none() => first_free = Some(index),
                _ => {}
            }
        }

        let Some(index) = first_free else {
            return Err(DropReason::BucketFull);
        };
        if self.info.num_allocated_cells >= self.info.num_cells {
            return Err(DropReason::ArenaExhausted);
        }

        let cell = self.info.num_allocated_cells * FIXED_POINTS_PER_CELL as u32;
        self.info.num_allocated_cells += 1;
        self.bucket_cells[hd.hash_base as usize] += 1;
        self.table[index] = HashTableEntry {
            raw_cell_id: hd.raw_cell_id,
            cell: Some(cell),
            num_points: 1,
        };
        self.write_slot(cell as usize, point);
        Ok(())
    }

    fn insert_into_cell(
        &mut self,
        entry_index: usize,
        cell: u32,
        point: &Point,
    ) -> Result<(), DropReason> {
        let start = cell as usize;
        let Some(local) = self.slots[start..start + FIXED_POINTS_PER_CELL]
            .iter()
            .position(PointSlot::is_free)
        else {
            return Err(DropReason::CellFull);
        };
        let slot = start + local;
        self.write_slot(slot, point);
        self.table[entry_index].num_points += 1;
        Ok(())
    }

    fn write_slot(&mut self, slot: usize, point: &Point) {
        let stored = point.with_value(UNINITIALIZED_VALUE);
        self.compressed[slot] = compress_point(
            stored.position,
            stored.normal,
            stored.value,
            self.info.aabb.min,
            self.info.cell_size,
        );
        self.slots[slot] = PointSlot::Occupied(stored);
    }
}
