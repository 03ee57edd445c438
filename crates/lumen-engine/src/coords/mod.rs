//! Drawable-size types shared by renderers and the runtime.

mod viewport;

pub use viewport::Viewport;
