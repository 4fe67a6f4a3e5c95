mod insert;
mod layout;
mod lookup;
mod types;

pub use types::{DropReason, DropStats, HashTableEntry, InstanceInfo, PointSlot};

use crate::buffers::TransferBuffers;
use crate::compact::{compact_table, CompactHashEntry};
use crate::config::{Config, FIXED_HASH_BUCKET_SIZE};
use crate::error::PointHashResult;
use common::SampledScene;
use insert::InstanceWriter;
use rayon::prelude::*;
use serialization::CompressedPoint;

/// Point-cell spatial hash over every instance of a scene.
///
/// Each instance owns a contiguous range of buckets in the hash table and a
/// contiguous range of slots in the point cell arena. Ranges are sized once
/// from the sampled point count and never grow, so points that do not fit
/// are dropped and counted in the instance's `DropStats`.
#[derive(Debug, Clone)]
pub struct PointHashIndex {
    config: Config,
    instances: Vec<InstanceInfo>,
    hash_table: Vec<HashTableEntry>,
    bucket_cell_counts: Vec<u32>,
    point_cells: Vec<PointSlot>,
    compressed_points: Vec<CompressedPoint>,
}

impl PointHashIndex {
    /// Sizes and fills one instance at a time, growing the shared arrays as
    /// each instance's ranges become known.
    pub fn build(scene: &SampledScene, config: Config) -> PointHashResult<Self> {
        layout::validate_scene(scene, &config)?;
        let mut index = Self {
            config,
            instances: Vec::with_capacity(scene.instances.len()),
            hash_table: Vec::new(),
            bucket_cell_counts: Vec::new(),
            point_cells: Vec::new(),
            compressed_points: Vec::new(),
        };

        for samples in &scene.instances {
            let points = &scene.points[samples.point_range()];
            let mut info = InstanceInfo::plan(samples, points, &index.config);
            info.hash_table_offset = index.hash_table.len();
            info.cell_offset = index.point_cells.len();

            let table_len = info.hash_table_offset + info.hash_table_entries();
            let cells_len = info.cell_offset + info.max_num_points();
            layout::check_layout(index.instances.len(), table_len, cells_len)?;
            index.hash_table.resize(table_len, HashTableEntry::EMPTY);
            index
                .bucket_cell_counts
                .resize(table_len / FIXED_HASH_BUCKET_SIZE, 0);
            index.point_cells.resize(cells_len, PointSlot::Free);
            index
                .compressed_points
                .resize(cells_len, CompressedPoint::default());

            let table_start = info.hash_table_offset;
            let bucket_start = info.bucket_offset();
            let cell_start = info.cell_offset;
            InstanceWriter::new(
                &mut info,
                &mut index.hash_table[table_start..],
                &mut index.bucket_cell_counts[bucket_start..],
                &mut index.point_cells[cell_start..],
                &mut index.compressed_points[cell_start..],
            )
            .insert_all(points);

            log_instance(index.instances.len(), &info);
            index.instances.push(info);
        }

        index.log_summary();
        Ok(index)
    }

    /// Two-pass build: every instance is sized first, then instances are
    /// filled in parallel over disjoint ranges. Produces the same index as
    /// [`PointHashIndex::build`].
    pub fn build_parallel(scene: &SampledScene, config: Config) -> PointHashResult<Self> {
        layout::validate_scene(scene, &config)?;

        let mut instances: Vec<InstanceInfo> = scene
            .instances
            .par_iter()
            .map(|samples| InstanceInfo::plan(samples, &scene.points[samples.point_range()], &config))
            .collect();

        let mut table_len = 0usize;
        let mut cells_len = 0usize;
        for (instance, info) in instances.iter_mut().enumerate() {
            info.hash_table_offset = table_len;
            info.cell_offset = cells_len;
            table_len += info.hash_table_entries();
            cells_len += info.max_num_points();
            layout::check_layout(instance, table_len, cells_len)?;
        }
        tracing::trace!(table_len, cells_len, "planned instance layout");

        let mut hash_table = vec![HashTableEntry::EMPTY; table_len];
        let mut bucket_cell_counts = vec![0u32; table_len / FIXED_HASH_BUCKET_SIZE];
        let mut point_cells = vec![PointSlot::Free; cells_len];
        let mut compressed_points = vec![CompressedPoint::default(); cells_len];

        {
            let mut table_rest = &mut hash_table[..];
            let mut buckets_rest = &mut bucket_cell_counts[..];
            let mut cells_rest = &mut point_cells[..];
            let mut compressed_rest = &mut compressed_points[..];
            let mut writers = Vec::with_capacity(instances.len());

            for (info, samples) in instances.iter_mut().zip(&scene.instances) {
                let (table, rest) =
                    std::mem::take(&mut table_rest).split_at_mut(info.hash_table_entries());
                table_rest = rest;
                let (buckets, rest) =
                    std::mem::take(&mut buckets_rest).split_at_mut(info.hash_table_size as usize);
                buckets_rest = rest;
                let (cells, rest) =
                    std::mem::take(&mut cells_rest).split_at_mut(info.max_num_points());
                cells_rest = rest;
                let (compressed, rest) =
                    std::mem::take(&mut compressed_rest).split_at_mut(info.max_num_points());
                compressed_rest = rest;

                let points = &scene.points[samples.point_range()];
                writers.push((
                    InstanceWriter::new(info, table, buckets, cells, compressed),
                    points,
                ));
            }

            writers
                .into_par_iter()
                .for_each(|(mut writer, points)| writer.insert_all(points));
        }

        for (instance, info) in instances.iter().enumerate() {
            log_instance(instance, info);
        }

        let index = Self {
            config,
            instances,
            hash_table,
            bucket_cell_counts,
            point_cells,
            compressed_points,
        };
        index.log_summary();
        Ok(index)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn instances(&self) -> &[InstanceInfo] {
        &self.instances
    }

    pub fn instance(&self, instance_id: usize) -> Option<&InstanceInfo> {
        self.instances.get(instance_id)
    }

    pub fn hash_table(&self) -> &[HashTableEntry] {
        &self.hash_table
    }

    /// Number of cells allocated through each bucket, across all instances.
    pub fn bucket_cell_counts(&self) -> &[u32] {
        &self.bucket_cell_counts
    }

    pub fn point_cells(&self) -> &[PointSlot] {
        &self.point_cells
    }

    pub fn compressed_points(&self) -> &[CompressedPoint] {
        &self.compressed_points
    }

    pub fn instance_hash_table(&self, instance_id: usize) -> Option<&[HashTableEntry]> {
        let info = self.instances.get(instance_id)?;
        let start = info.hash_table_offset;
        Some(&self.hash_table[start..start + info.hash_table_entries()])
    }

    pub fn instance_point_cells(&self, instance_id: usize) -> Option<&[PointSlot]> {
        let info = self.instances.get(instance_id)?;
        let start = info.cell_offset;
        Some(&self.point_cells[start..start + info.max_num_points()])
    }

    pub fn num_indexed_points(&self) -> usize {
        self.instances
            .iter()
            .map(|info| info.num_indexed_points as usize)
            .sum()
    }

    pub fn drop_stats(&self) -> DropStats {
        let mut stats = DropStats::default();
        for info in &self.instances {
            stats.merge(&info.drops);
        }
        stats
    }

    pub fn compact(&self) -> Vec<CompactHashEntry> {
        compact_table(&self.hash_table)
    }

    pub fn transfer_buffers(&self) -> TransferBuffers {
        TransferBuffers::from_index(self)
    }

    fn log_summary(&self) {
        let drops = self.drop_stats();
        tracing::debug!(
            instances = self.instances.len(),
            hash_table_entries = self.hash_table.len(),
            point_slots = self.point_cells.len(),
            indexed_points = self.num_indexed_points(),
            dropped_points = drops.total(),
            "built point hash index"
        );
    }
}

fn log_instance(instance: usize, info: &InstanceInfo) {
    tracing::debug!(
        instance,
        points = info.point_count,
        indexed = info.num_indexed_points,
        grid_dim = info.grid_dim,
        hash_table_size = info.hash_table_size,
        allocated_cells = info.num_allocated_cells,
        num_cells = info.num_cells,
        bucket_full = info.drops.bucket_full,
        cell_full = info.drops.cell_full,
        "indexed instance"
    );
    if info.drops.arena_exhausted > 0 {
        tracing::warn!(
            instance,
            num_cells = info.num_cells,
            dropped = info.drops.arena_exhausted,
            "instance ran out of preallocated cells"
        );
    }
}
