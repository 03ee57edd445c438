use bytemuck::{Pod, Zeroable};
use glam::Vec3;

// ── light kind ────────────────────────────────────────────────────────────

/// Discriminant shared with the shader side (`LIGHT_TYPE_*` in `lighting.wgsl`).
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LightType {
    Point = 0,
    Spot = 1,
    Dir = 2,
}

impl From<LightType> for u32 {
    #[inline]
    fn from(kind: LightType) -> u32 {
        kind as u32
    }
}

impl TryFrom<u32> for LightType {
    type Error = InvalidLightType;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LightType::Point),
            1 => Ok(LightType::Spot),
            2 => Ok(LightType::Dir),
            other => Err(InvalidLightType(other)),
        }
    }
}

/// Returned when a raw discriminant does not name a light kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct InvalidLightType(pub u32);

impl std::fmt::Display for InvalidLightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid light type discriminant {}", self.0)
    }
}

impl std::error::Error for InvalidLightType {}

// ── records ───────────────────────────────────────────────────────────────
//
// Every `vec3` is followed by a 4-byte scalar so the next `vec3` starts on a
// 16-byte boundary, matching WGSL storage layout.

/// Point light record (32 bytes).
///
///  offset  0  position   [f32; 3]
///  offset 12  _pad0      f32
///  offset 16  color      [f32; 3]
///  offset 28  intensity  f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position: position.to_array(),
            _pad0: 0.0,
            color: color.to_array(),
            intensity,
        }
    }
}

/// Spot light record (64 bytes).
///
///  offset  0  position   [f32; 3]
///  offset 12  _pad0      f32
///  offset 16  direction  [f32; 3]
///  offset 28  cos_outer  f32
///  offset 32  color      [f32; 3]
///  offset 44  intensity  f32
///  offset 48  cos_inner  f32
///  offset 52  _pad1      [f32; 3]
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpotLight {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub direction: [f32; 3],
    pub cos_outer: f32,
    pub color: [f32; 3],
    pub intensity: f32,
    pub cos_inner: f32,
    pub _pad1: [f32; 3],
}

impl SpotLight {
    /// Builds a spot light from cone half-angles in radians.
    ///
    /// The shader only ever compares against cosines, so they are
    /// precomputed here. `direction` is normalized.
    pub fn new(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        inner_angle: f32,
        outer_angle: f32,
    ) -> Self {
        Self {
            position: position.to_array(),
            _pad0: 0.0,
            direction: direction.normalize_or_zero().to_array(),
            cos_outer: outer_angle.cos(),
            color: color.to_array(),
            intensity,
            cos_inner: inner_angle.cos(),
            _pad1: [0.0; 3],
        }
    }
}

/// Directional light record (32 bytes).
///
///  offset  0  direction  [f32; 3]
///  offset 12  _pad0      f32
///  offset 16  color      [f32; 3]
///  offset 28  intensity  f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DirLight {
    pub direction: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl DirLight {
    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero().to_array(),
            _pad0: 0.0,
            color: color.to_array(),
            intensity,
        }
    }
}

/// Number of valid records in each light buffer (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct LightingCounts {
    pub point_count: u32,
    pub spot_count: u32,
    pub dir_count: u32,
    pub _pad: u32, // 16-byte alignment
}

impl LightingCounts {
    #[inline]
    pub const fn new(point_count: u32, spot_count: u32, dir_count: u32) -> Self {
        Self {
            point_count,
            spot_count,
            dir_count,
            _pad: 0,
        }
    }

    #[inline]
    pub fn count(&self, kind: LightType) -> u32 {
        match kind {
            LightType::Point => self.point_count,
            LightType::Spot => self.spot_count,
            LightType::Dir => self.dir_count,
        }
    }

    /// Sum of all counts, saturating at `u32::MAX`.
    #[inline]
    pub fn total(&self) -> u32 {
        self.point_count
            .saturating_add(self.spot_count)
            .saturating_add(self.dir_count)
    }
}
