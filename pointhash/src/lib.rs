pub mod buffers;
pub mod compact;
pub mod config;
pub mod error;
pub mod hash;
pub mod index;
pub mod sizing;

pub use buffers::{BufferKind, TransferBuffers};
pub use compact::CompactHashEntry;
pub use config::Config;
pub use error::{PointHashError, PointHashResult};
pub use index::{DropReason, DropStats, HashTableEntry, InstanceInfo, PointHashIndex, PointSlot};
