pub mod codec;
pub mod error;
pub mod quantize;
pub mod transfer;

pub use codec::{BlockCodec, CodecId};
pub use error::{SerializationError, SerializationResult};
pub use quantize::{compress_point, decompress_point, CompressedPoint};
pub use transfer::{BlockEncoding, TransferBlock, TransferSet};
