#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PointHashError {
    #[error("config value out of range ({name}: {value})")]
    InvalidConfig { name: &'static str, value: f32 },
    #[error("disk radius must be finite and positive (instance: {instance}, radius: {radius})")]
    InvalidDiskRadius { instance: usize, radius: f32 },
    #[error(
        "instance point range must be within the point stream (instance: {instance}, offset: {offset}, count: {count}, total_points: {total_points})"
    )]
    PointRangeOutOfBounds {
        instance: usize,
        offset: u32,
        count: u32,
        total_points: usize,
    },
    #[error(
        "instance layout exceeds u32 offsets (instance: {instance}, hash_table_entries: {hash_table_entries}, point_slots: {point_slots})"
    )]
    LayoutOverflow {
        instance: usize,
        hash_table_entries: usize,
        point_slots: usize,
    },
}

pub type PointHashResult<T> = Result<T, PointHashError>;
