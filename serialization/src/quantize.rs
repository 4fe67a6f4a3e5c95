use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec2, Vec3};
use half::f16;

const UNORM16_MAX: f32 = u16::MAX as f32;
const SNORM16_MAX: f32 = i16::MAX as f32;

/// Client-side point record. The position is stored relative to the grid
/// cell the point falls into, so the reader needs the cell origin (known
/// from the hash table) to reconstruct it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct CompressedPoint {
    pub position: [u16; 3],
    pub normal: [i16; 2],
    pub value: u16,
}

impl CompressedPoint {
    pub const SIZE: usize = std::mem::size_of::<CompressedPoint>();

    pub fn value(&self) -> f32 {
        f16::from_bits(self.value).to_f32()
    }
}

/// Integer cell coordinates of `position` in a grid anchored at `aabb_min`.
#[inline(always)]
pub fn cell_coords(position: Vec3, aabb_min: Vec3, cell_size: f32) -> IVec3 {
    ((position - aabb_min) / cell_size).floor().as_ivec3()
}

#[inline(always)]
pub fn cell_origin(coords: IVec3, aabb_min: Vec3, cell_size: f32) -> Vec3 {
    aabb_min + coords.as_vec3() * cell_size
}

pub fn compress_point(
    position: Vec3,
    normal: Vec3,
    value: f32,
    aabb_min: Vec3,
    cell_size: f32,
) -> CompressedPoint {
    let local = (position - aabb_min) / cell_size;
    let fraction = (local - local.floor()).clamp(Vec3::ZERO, Vec3::ONE);
    CompressedPoint {
        position: [
            to_unorm16(fraction.x),
            to_unorm16(fraction.y),
            to_unorm16(fraction.z),
        ],
        normal: octahedral_encode(normal),
        value: f16::from_f32(value).to_bits(),
    }
}

/// Returns `(position, normal, value)`.
pub fn decompress_point(point: &CompressedPoint, cell_origin: Vec3, cell_size: f32) -> (Vec3, Vec3, f32) {
    let fraction = Vec3::new(
        from_unorm16(point.position[0]),
        from_unorm16(point.position[1]),
        from_unorm16(point.position[2]),
    );
    (
        cell_origin + fraction * cell_size,
        octahedral_decode(point.normal),
        point.value(),
    )
}

#[inline(always)]
fn to_unorm16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * UNORM16_MAX).round() as u16
}

#[inline(always)]
fn from_unorm16(v: u16) -> f32 {
    v as f32 / UNORM16_MAX
}

#[inline(always)]
fn to_snorm16(v: f32) -> i16 {
    (v.clamp(-1.0, 1.0) * SNORM16_MAX).round() as i16
}

#[inline(always)]
fn from_snorm16(v: i16) -> f32 {
    (v as f32 / SNORM16_MAX).clamp(-1.0, 1.0)
}

#[inline(always)]
fn sign_not_zero(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x >= 0.0 { 1.0 } else { -1.0 },
        if v.y >= 0.0 { 1.0 } else { -1.0 },
    )
}

fn octahedral_encode(normal: Vec3) -> [i16; 2] {
    let l1 = normal.x.abs() + normal.y.abs() + normal.z.abs();
    if !(l1 > 0.0) || !l1.is_finite() {
        return [0, 0];
    }
    let n = normal / l1;
    let mut uv = Vec2::new(n.x, n.y);
    if n.z < 0.0 {
        uv = (Vec2::ONE - Vec2::new(uv.y.abs(), uv.x.abs())) * sign_not_zero(uv);
    }
    [to_snorm16(uv.x), to_snorm16(uv.y)]
}

fn octahedral_decode(encoded: [i16; 2]) -> Vec3 {
    let uv = Vec2::new(from_snorm16(encoded[0]), from_snorm16(encoded[1]));
    let mut n = Vec3::new(uv.x, uv.y, 1.0 - uv.x.abs() - uv.y.abs());
    let t = (-n.z).max(0.0);
    n.x += if n.x >= 0.0 { -t } else { t };
    n.y += if n.y >= 0.0 { -t } else { t };
    n.normalize_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_twelve_bytes() {
        assert_eq!(CompressedPoint::SIZE, 12);
    }

    #[test]
    fn axis_normals_are_exact() {
        for n in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let decoded = octahedral_decode(octahedral_encode(n));
            assert!((decoded - n).length() < 1e-4, "{n} -> {decoded}");
        }
    }

    #[test]
    fn degenerate_normal_decodes_to_unit() {
        let decoded = octahedral_decode(octahedral_encode(Vec3::ZERO));
        assert!((decoded.length() - 1.0).abs() < 1e-4);
    }
}
