//! Light records shared between host code and shaders.
//!
//! The Rust structs in [`types`] and the WGSL declarations in
//! [`LIGHTING_WGSL`] describe the same bytes. Nothing validates this at
//! runtime: padding fields carry the 16-byte alignment, and the tests below
//! compare both sides field by field.
//!
//! Shaders that read lights prepend [`LIGHTING_WGSL`] to their own source and
//! bind [`LightBuffers::bind_group`] at [`LIGHTING_GROUP`].

mod buffers;
mod set;
mod types;

pub use buffers::LightBuffers;
pub use set::LightSet;
pub use types::{DirLight, InvalidLightType, LightType, LightingCounts, PointLight, SpotLight};

/// WGSL declarations of the light records and their bindings.
pub const LIGHTING_WGSL: &str = include_str!("shaders/lighting.wgsl");

pub const LIGHTING_GROUP: u32 = 2;
pub const POINT_LIGHTS_BINDING: u32 = 0;
pub const SPOT_LIGHTS_BINDING: u32 = 1;
pub const DIR_LIGHTS_BINDING: u32 = 2;
pub const COUNTS_BINDING: u32 = 3;
