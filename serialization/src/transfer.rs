use crate::codec::{BlockCodec, CodecId};
use crate::error::{SerializationError, SerializationResult};
use smallvec::SmallVec;

/// How a transfer block's bytes are stored. Travels out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEncoding {
    Raw,
    Compressed(CodecId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferBlock {
    pub encoding: BlockEncoding,
    pub uncompressed_len: usize,
    pub bytes: Vec<u8>,
}

impl TransferBlock {
    pub fn raw(data: &[u8]) -> Self {
        Self {
            encoding: BlockEncoding::Raw,
            uncompressed_len: data.len(),
            bytes: data.to_vec(),
        }
    }

    /// Compresses `data` with `codec`, keeping the raw bytes instead when
    /// compression fails or does not make the block smaller.
    pub fn pack(codec: &BlockCodec, data: &[u8]) -> Self {
        match codec.compress(data) {
            Ok(compressed) if compressed.len() < data.len() => Self {
                encoding: BlockEncoding::Compressed(codec.id()),
                uncompressed_len: data.len(),
                bytes: compressed,
            },
            Ok(compressed) => {
                tracing::debug!(
                    codec = %codec.id(),
                    input_len = data.len(),
                    compressed_len = compressed.len(),
                    "block did not shrink, sending raw"
                );
                Self::raw(data)
            }
            Err(err) => {
                tracing::warn!(%err, "block compression failed, sending raw");
                Self::raw(data)
            }
        }
    }

    pub fn unpack(&self) -> SerializationResult<Vec<u8>> {
        match self.encoding {
            BlockEncoding::Raw => {
                if self.bytes.len() != self.uncompressed_len {
                    return Err(SerializationError::LengthMismatch {
                        expected: self.uncompressed_len,
                        written: self.bytes.len(),
                    });
                }
                Ok(self.bytes.clone())
            }
            BlockEncoding::Compressed(id) => {
                BlockCodec::from_id(id).decompress(&self.bytes, self.uncompressed_len)
            }
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.encoding, BlockEncoding::Compressed(_))
    }

    pub fn transfer_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Keyed collection of transfer blocks produced from one build.
#[derive(Debug, Clone)]
pub struct TransferSet<K> {
    blocks: SmallVec<[(K, TransferBlock); 16]>,
}

impl<K: PartialEq + Copy> TransferSet<K> {
    pub fn new() -> Self {
        Self {
            blocks: SmallVec::new(),
        }
    }

    pub fn push(&mut self, key: K, block: TransferBlock) {
        self.blocks.push((key, block));
    }

    pub fn get(&self, key: K) -> Option<&TransferBlock> {
        self.blocks
            .iter()
            .find(|(block_key, _)| *block_key == key)
            .map(|(_, block)| block)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, TransferBlock)> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn uncompressed_len(&self) -> usize {
        self.blocks.iter().map(|(_, block)| block.uncompressed_len).sum()
    }

    pub fn transfer_len(&self) -> usize {
        self.blocks.iter().map(|(_, block)| block.transfer_len()).sum()
    }
}

impl<K: PartialEq + Copy> Default for TransferSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
