//! Viewport and transform math shared by the renderer and its callers.
//!
//! Conventions follow OpenGL: right-handed, -Z forward, column-major matrices,
//! viewport origin at the bottom-left in physical pixels.

mod transform;
mod transforms;
mod viewport;

pub use transform::Transform;
pub use transforms::{BUILTIN_UNIFORM_NAMES, Transforms};
pub use viewport::Viewport;
