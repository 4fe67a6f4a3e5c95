use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serialization::quantize::{cell_coords, cell_origin};
use serialization::*;

fn codecs() -> [BlockCodec; 2] {
    [BlockCodec::Lz4, BlockCodec::Zstd { level: 3 }]
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

#[test]
fn test_unknown_codec_id() {
    assert_eq!(
        CodecId::from_int(7),
        Err(SerializationError::UnknownCodec { id: 7 })
    );
    assert!(BlockCodec::from_int(2).is_err());
    assert_eq!(BlockCodec::from_int(0), Ok(BlockCodec::Lz4));
    assert_eq!(BlockCodec::from_int(1).unwrap().id(), CodecId::Zstd);
}

#[test]
fn test_random_mebibyte_round_trip() {
    let data = random_bytes(1 << 20, 42);
    for codec in codecs() {
        let mut compressed = Vec::new();
        let written = codec.compress_into(&data, &mut compressed).unwrap();
        assert_eq!(written, compressed.len());
        assert!(written <= codec.compress_bound(data.len()));

        let mut restored = vec![0u8; data.len()];
        let restored_len = codec.decompress_into(&compressed, &mut restored).unwrap();
        assert_eq!(restored_len, data.len());
        assert_eq!(restored, data);
    }
}

#[test]
fn test_compressible_round_trip() {
    let data: Vec<u8> = (0..200_000u32).flat_map(|i| (i % 97).to_le_bytes()).collect();
    for codec in codecs() {
        let compressed = codec.compress(&data).unwrap();
        assert!(compressed.len() < data.len() / 4);
        assert_eq!(codec.decompress(&compressed, data.len()).unwrap(), data);
    }
}

#[test]
fn test_undersized_destination_fails() {
    let data = random_bytes(4096, 3);
    for codec in codecs() {
        let compressed = codec.compress(&data).unwrap();
        let mut too_small = vec![0u8; data.len() / 2];
        assert!(matches!(
            codec.decompress_into(&compressed, &mut too_small),
            Err(SerializationError::Decompress { .. })
        ));
    }
}

#[test]
fn test_malformed_stream_fails() {
    let garbage = vec![0xffu8; 64];
    for codec in codecs() {
        let mut dst = vec![0u8; 1024];
        assert!(codec.decompress_into(&garbage, &mut dst).is_err());
    }
}

#[test]
fn test_wrong_decompressed_length_is_rejected() {
    let data = vec![5u8; 1000];
    for codec in codecs() {
        let compressed = codec.compress(&data).unwrap();
        assert!(codec.decompress(&compressed, data.len() + 10).is_err());
    }
}

#[test]
fn test_transfer_block_falls_back_to_raw() {
    let data = random_bytes(8192, 11);
    for codec in codecs() {
        let block = TransferBlock::pack(&codec, &data);
        assert_eq!(block.encoding, BlockEncoding::Raw);
        assert_eq!(block.unpack().unwrap(), data);
    }
}

#[test]
fn test_transfer_block_compresses() {
    let data = vec![1u8; 8192];
    for codec in codecs() {
        let block = TransferBlock::pack(&codec, &data);
        assert_eq!(block.encoding, BlockEncoding::Compressed(codec.id()));
        assert!(block.transfer_len() < data.len());
        assert_eq!(block.unpack().unwrap(), data);
    }
}

#[test]
fn test_transfer_set_lookup() {
    let mut set = TransferSet::new();
    set.push(1u8, TransferBlock::raw(&[1, 2, 3]));
    set.push(2u8, TransferBlock::pack(&BlockCodec::Lz4, &[0u8; 4096]));
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(1).unwrap().bytes, vec![1, 2, 3]);
    assert!(set.get(3).is_none());
    assert_eq!(set.uncompressed_len(), 4099);
    assert!(set.transfer_len() < set.uncompressed_len());
}

#[test]
fn test_point_quantization_error_bounds() {
    let mut rng = StdRng::seed_from_u64(5);
    let aabb_min = Vec3::new(-10.0, -4.0, 2.0);
    let cell_size = 0.25;
    for _ in 0..10_000 {
        let position = aabb_min
            + Vec3::new(
                rng.gen_range(0.0..20.0),
                rng.gen_range(0.0..8.0),
                rng.gen_range(0.0..3.0),
            );
        let normal = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .normalize_or(Vec3::Y);
        let value: f32 = rng.gen_range(0.0..1.0);

        let compressed = compress_point(position, normal, value, aabb_min, cell_size);
        let origin = cell_origin(cell_coords(position, aabb_min, cell_size), aabb_min, cell_size);
        let (p, n, v) = decompress_point(&compressed, origin, cell_size);

        assert!((p - position).abs().max_element() <= cell_size / 65535.0 + 1e-4);
        assert!(n.dot(normal) > 0.9999);
        assert!((v - value).abs() <= 1e-3);
    }
}

#[test]
fn test_sentinel_values_survive_quantization() {
    let free = compress_point(Vec3::ZERO, Vec3::Z, -1.0, Vec3::ZERO, 1.0);
    assert_eq!(free.value(), -1.0);
    let uninitialized = compress_point(Vec3::ZERO, Vec3::Z, 2.0, Vec3::ZERO, 1.0);
    assert_eq!(uninitialized.value(), 2.0);
}
