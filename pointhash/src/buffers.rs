use crate::compact::CompactHashEntry;
use crate::config::{FIXED_POINTS_PER_CELL, MAX_STAGING_BYTES};
use crate::index::{InstanceInfo, PointHashIndex};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serialization::{BlockCodec, CompressedPoint, TransferBlock, TransferSet};

/// Hash-side instance metadata as the client reads it.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InstanceHashInfo {
    pub aabb_min: [f32; 3],
    pub hash_table_offset: u32,
    pub aabb_max: [f32; 3],
    pub hash_table_size: u32,
    pub grid_dim: [u32; 3],
    pub padding: u32,
}

/// Arena-side instance metadata as the client reads it.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InstancePointInfo {
    pub aabb_min: [f32; 3],
    pub point_cell_offset: u32,
    pub aabb_max: [f32; 3],
    pub max_num_points: u32,
    pub grid_dim: [u32; 3],
    pub num_allocated_cells: u32,
    pub cell_size: f32,
    pub num_cells: u32,
    pub padding: [u32; 2],
}

/// Staging record for incremental point updates. Filled by the update path,
/// not by the build.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PointUpdate {
    pub slot_index: u32,
    pub instance_id: u32,
    pub point: CompressedPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    CompactHashTable,
    BucketCellCounts,
    Positions,
    Normals,
    Tangents,
    Barycentrics,
    InstanceTriangleIds,
    InstanceIds,
    Values,
    CompressedPoints,
    InstanceHashInfo,
    InstancePointInfo,
    CellDirtyFlags,
    PointUpdateStaging,
    /// Previous-frame copy of `CompressedPoints` kept by the client for
    /// temporal reuse. Starts out identical to the current buffer.
    PreviousCompressedPoints,
}

impl BufferKind {
    /// Every kind with bytes of its own, in transfer order.
    pub const ALL: [BufferKind; 14] = [
        BufferKind::CompactHashTable,
        BufferKind::BucketCellCounts,
        BufferKind::Positions,
        BufferKind::Normals,
        BufferKind::Tangents,
        BufferKind::Barycentrics,
        BufferKind::InstanceTriangleIds,
        BufferKind::InstanceIds,
        BufferKind::Values,
        BufferKind::CompressedPoints,
        BufferKind::InstanceHashInfo,
        BufferKind::InstancePointInfo,
        BufferKind::CellDirtyFlags,
        BufferKind::PointUpdateStaging,
    ];

    /// Kind whose bytes this buffer is initialized from.
    pub fn source(self) -> BufferKind {
        match self {
            BufferKind::PreviousCompressedPoints => BufferKind::CompressedPoints,
            kind => kind,
        }
    }
}

/// Every buffer the client needs, split per attribute so no single buffer
/// holds whole points. Attribute columns are index-aligned with the point
/// cell arena; free slots carry `FREE_SLOT_VALUE` in `values`.
#[derive(Debug, Clone, Default)]
pub struct TransferBuffers {
    pub compact_hash_table: Vec<CompactHashEntry>,
    pub bucket_cell_counts: Vec<u32>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub barycentrics: Vec<Vec2>,
    pub instance_triangle_ids: Vec<u32>,
    pub instance_ids: Vec<u32>,
    pub values: Vec<f32>,
    pub compressed_points: Vec<CompressedPoint>,
    pub instance_hash_info: Vec<InstanceHashInfo>,
    pub instance_point_info: Vec<InstancePointInfo>,
    pub cell_dirty_flags: Vec<u32>,
    pub point_update_staging: Vec<PointUpdate>,
}

impl TransferBuffers {
    pub fn from_index(index: &PointHashIndex) -> Self {
        let slots = index.point_cells();
        let mut buffers = TransferBuffers {
            compact_hash_table: index.compact(),
            bucket_cell_counts: index.bucket_cell_counts().to_vec(),
            compressed_points: index.compressed_points().to_vec(),
            instance_hash_info: index.instances().iter().map(instance_hash_info).collect(),
            instance_point_info: index.instances().iter().map(instance_point_info).collect(),
            cell_dirty_flags: vec![0; slots.len() / FIXED_POINTS_PER_CELL],
            point_update_staging: vec![PointUpdate::default(); staging_capacity(slots.len())],
            ..Default::default()
        };

        buffers.positions.reserve(slots.len());
        buffers.normals.reserve(slots.len());
        buffers.tangents.reserve(slots.len());
        buffers.barycentrics.reserve(slots.len());
        buffers.instance_triangle_ids.reserve(slots.len());
        buffers.instance_ids.reserve(slots.len());
        buffers.values.reserve(slots.len());
        for slot in slots {
            let point = slot.to_wire();
            buffers.positions.push(point.position);
            buffers.normals.push(point.normal);
            buffers.tangents.push(point.tangent);
            buffers.barycentrics.push(point.barycentrics);
            buffers.instance_triangle_ids.push(point.instance_triangle_id);
            buffers.instance_ids.push(point.instance_id);
            buffers.values.push(point.value);
        }
        buffers
    }

    pub fn bytes(&self, kind: BufferKind) -> &[u8] {
        match kind {
            BufferKind::CompactHashTable => bytemuck::cast_slice(&self.compact_hash_table),
            BufferKind::BucketCellCounts => bytemuck::cast_slice(&self.bucket_cell_counts),
            BufferKind::Positions => bytemuck::cast_slice(&self.positions),
            BufferKind::Normals => bytemuck::cast_slice(&self.normals),
            BufferKind::Tangents => bytemuck::cast_slice(&self.tangents),
            BufferKind::Barycentrics => bytemuck::cast_slice(&self.barycentrics),
            BufferKind::InstanceTriangleIds => bytemuck::cast_slice(&self.instance_triangle_ids),
            BufferKind::InstanceIds => bytemuck::cast_slice(&self.instance_ids),
            BufferKind::Values => bytemuck::cast_slice(&self.values),
            BufferKind::CompressedPoints | BufferKind::PreviousCompressedPoints => {
                bytemuck::cast_slice(&self.compressed_points)
            }
            BufferKind::InstanceHashInfo => bytemuck::cast_slice(&self.instance_hash_info),
            BufferKind::InstancePointInfo => bytemuck::cast_slice(&self.instance_point_info),
            BufferKind::CellDirtyFlags => bytemuck::cast_slice(&self.cell_dirty_flags),
            BufferKind::PointUpdateStaging => bytemuck::cast_slice(&self.point_update_staging),
        }
    }

    /// Packs every buffer in [`BufferKind::ALL`] with `codec`. Buffers that
    /// do not shrink are kept raw; see [`TransferBlock::pack`]. Aliased kinds
    /// are looked up through [`BufferKind::source`].
    pub fn encode(&self, codec: &BlockCodec) -> TransferSet<BufferKind> {
        let mut set = TransferSet::new();
        for kind in BufferKind::ALL {
            set.push(kind, TransferBlock::pack(codec, self.bytes(kind)));
        }
        tracing::debug!(
            codec = %codec.id(),
            uncompressed = set.uncompressed_len(),
            transfer = set.transfer_len(),
            "encoded transfer buffers"
        );
        set
    }
}

/// Number of staging records: enough for every slot, capped by
/// `MAX_STAGING_BYTES`.
pub fn staging_capacity(num_slots: usize) -> usize {
    let max_records = MAX_STAGING_BYTES / std::mem::size_of::<PointUpdate>() as u64;
    (max_records.min(num_slots as u64)) as usize
}

// Offsets fit in `u32`: the build rejects larger layouts.
fn instance_hash_info(info: &InstanceInfo) -> InstanceHashInfo {
    InstanceHashInfo {
        aabb_min: info.aabb.min.to_array(),
        hash_table_offset: info.hash_table_offset as u32,
        aabb_max: info.aabb.max.to_array(),
        hash_table_size: info.hash_table_size,
        grid_dim: info.grid_dims().to_array(),
        padding: 0,
    }
}

fn instance_point_info(info: &InstanceInfo) -> InstancePointInfo {
    InstancePointInfo {
        aabb_min: info.aabb.min.to_array(),
        point_cell_offset: info.cell_offset as u32,
        aabb_max: info.aabb.max.to_array(),
        max_num_points: info.max_num_points() as u32,
        grid_dim: info.grid_dims().to_array(),
        num_allocated_cells: info.num_allocated_cells,
        cell_size: info.cell_size,
        num_cells: info.num_cells,
        padding: [0; 2],
    }
}
