//! Lumen engine crate.
//!
//! Shared GPU light layouts, the textured-quad pipeline, and the platform +
//! GPU runtime used to drive them.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod lighting;
pub mod render;
