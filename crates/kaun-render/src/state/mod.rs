//! Fixed-function render state and the cache that reconciles it with the device.

mod cache;
mod render_state;

pub use cache::StateCache;
pub use render_state::{BlendEquation, BlendFactor, CullFaces, DepthFunc, FrontFace, RenderState};
