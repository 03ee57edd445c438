//! Textured quad: vertex data, `quad.wgsl`, its CPU counterpart and the
//! renderer that draws it.
//!
//! Bindings:
//! - `@group(0) @binding(0)`: projection matrix (uniform, vertex stage)
//! - `@group(1) @binding(0)`: color texture (fragment stage)
//! - `@group(1) @binding(1)`: sampler (fragment stage)

mod projection;
mod renderer;
mod stages;
mod vertex;

pub use projection::aspect_fit;
pub use renderer::QuadRenderer;
pub use stages::{fragment_stage, vertex_stage};
pub use vertex::{ProjectionUniform, QuadVertex, QuadVertexOut, QUAD_VERTICES};

/// Source of the quad shader pair.
pub const QUAD_WGSL: &str = include_str!("shaders/quad.wgsl");

pub const VS_ENTRY: &str = "vs_main";
pub const FS_ENTRY: &str = "fs_main";

pub const PROJECTION_GROUP: u32 = 0;
pub const PROJECTION_BINDING: u32 = 0;
pub const TEXTURE_GROUP: u32 = 1;
pub const TEXTURE_BINDING: u32 = 0;
pub const SAMPLER_BINDING: u32 = 1;
