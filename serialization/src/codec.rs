use crate::error::{SerializationError, SerializationResult};
use std::fmt;

pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Wire identifier of a block codec. Sent out of band next to every
/// compressed buffer, together with the uncompressed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CodecId {
    Lz4 = 0,
    Zstd = 1,
}

impl CodecId {
    pub fn from_int(value: u32) -> SerializationResult<Self> {
        match value {
            0 => Ok(CodecId::Lz4),
            1 => Ok(CodecId::Zstd),
            _ => Err(SerializationError::UnknownCodec { id: value }),
        }
    }

    pub fn as_int(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecId::Lz4 => write!(f, "lz4"),
            CodecId::Zstd => write!(f, "zstd"),
        }
    }
}

/// Raw block compressor. LZ4 is the fast, low-ratio choice and zstd the
/// slower, high-ratio one. Neither adds a frame of its own beyond what the
/// underlying format emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCodec {
    Lz4,
    Zstd { level: i32 },
}

impl Default for BlockCodec {
    fn default() -> Self {
        BlockCodec::Lz4
    }
}

impl BlockCodec {
    pub fn from_id(id: CodecId) -> Self {
        match id {
            CodecId::Lz4 => BlockCodec::Lz4,
            CodecId::Zstd => BlockCodec::Zstd {
                level: DEFAULT_ZSTD_LEVEL,
            },
        }
    }

    pub fn from_int(value: u32) -> SerializationResult<Self> {
        Ok(Self::from_id(CodecId::from_int(value)?))
    }

    pub fn id(&self) -> CodecId {
        match self {
            BlockCodec::Lz4 => CodecId::Lz4,
            BlockCodec::Zstd { .. } => CodecId::Zstd,
        }
    }

    /// Worst-case compressed size for `input_len` bytes.
    pub fn compress_bound(&self, input_len: usize) -> usize {
        match self {
            BlockCodec::Lz4 => lz4_flex::block::get_maximum_output_size(input_len),
            BlockCodec::Zstd { .. } => zstd::zstd_safe::compress_bound(input_len),
        }
    }

    /// Compresses `input` into `output`, which is resized to the worst-case
    /// bound first and truncated to the written length afterwards.
    pub fn compress_into(&self, input: &[u8], output: &mut Vec<u8>) -> SerializationResult<usize> {
        let bound = self.compress_bound(input.len());
        output.clear();
        output.resize(bound, 0);

        let written = match self {
            BlockCodec::Lz4 => lz4_flex::block::compress_into(input, &mut output[..])
                .map_err(|err| err.to_string()),
            BlockCodec::Zstd { level } => {
                zstd::bulk::compress_to_buffer(input, &mut output[..], *level)
                    .map_err(|err| err.to_string())
            }
        }
        .map_err(|reason| SerializationError::Compress {
            codec: self.id(),
            input_len: input.len(),
            bound,
            reason,
        })?;

        output.truncate(written);
        tracing::trace!(codec = %self.id(), input_len = input.len(), written, "compressed block");
        Ok(written)
    }

    pub fn compress(&self, input: &[u8]) -> SerializationResult<Vec<u8>> {
        let mut output = Vec::new();
        self.compress_into(input, &mut output)?;
        Ok(output)
    }

    /// Decompresses into a destination already sized to the known
    /// uncompressed length. Returns the number of bytes written.
    pub fn decompress_into(&self, compressed: &[u8], dst: &mut [u8]) -> SerializationResult<usize> {
        let capacity = dst.len();
        match self {
            BlockCodec::Lz4 => {
                lz4_flex::block::decompress_into(compressed, dst).map_err(|err| err.to_string())
            }
            BlockCodec::Zstd { .. } => {
                zstd::bulk::decompress_to_buffer(compressed, dst).map_err(|err| err.to_string())
            }
        }
        .map_err(|reason| SerializationError::Decompress {
            codec: self.id(),
            compressed_len: compressed.len(),
            capacity,
            reason,
        })
    }

    /// Decompresses a block whose uncompressed length was sent out of band.
    /// Anything other than exactly `decompressed_len` bytes is an error.
    pub fn decompress(&self, compressed: &[u8], decompressed_len: usize) -> SerializationResult<Vec<u8>> {
        let mut output = vec![0u8; decompressed_len];
        let written = self.decompress_into(compressed, &mut output)?;
        if written != decompressed_len {
            return Err(SerializationError::LengthMismatch {
                expected: decompressed_len,
                written,
            });
        }
        Ok(output)
    }
}
