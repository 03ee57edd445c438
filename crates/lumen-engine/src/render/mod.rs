//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! record into a [`RenderTarget`] supplied by the frame loop.
//!
//! The [`quad`] module also carries a CPU rendition of its shader stages,
//! built on [`CpuTexture`] and [`SamplerState`], so the shading contract can
//! be checked without a device.

mod cpu_texture;
mod ctx;
mod sampler;
mod texture;

pub mod quad;

pub use cpu_texture::{CpuTexture, TextureError};
pub use ctx::{RenderCtx, RenderTarget};
pub use sampler::{AddressMode, FilterMode, SamplerState};
pub use texture::{checkerboard, load_rgba, QuadTexture};
