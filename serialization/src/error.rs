use crate::codec::CodecId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializationError {
    #[error("unknown compression codec id (id: {id})")]
    UnknownCodec { id: u32 },
    #[error(
        "{codec} compression failed (input_len: {input_len}, bound: {bound}): {reason}"
    )]
    Compress {
        codec: CodecId,
        input_len: usize,
        bound: usize,
        reason: String,
    },
    #[error(
        "{codec} decompression failed (compressed_len: {compressed_len}, capacity: {capacity}): {reason}"
    )]
    Decompress {
        codec: CodecId,
        compressed_len: usize,
        capacity: usize,
        reason: String,
    },
    #[error("decompressed length mismatch (expected: {expected}, written: {written})")]
    LengthMismatch { expected: usize, written: usize },
}

pub type SerializationResult<T> = Result<T, SerializationError>;
