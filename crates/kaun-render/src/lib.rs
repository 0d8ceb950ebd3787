//! Kaun render crate.
//!
//! Draw submission and GPU state caching on top of an OpenGL-style device.
//! Callers queue draws, the renderer sorts and executes them while skipping
//! redundant state changes.

pub mod device;
pub mod coords;
pub mod logging;

pub mod mesh;
pub mod shader;
pub mod state;
pub mod texture;
pub mod uniform;
pub mod target;
pub mod queue;
pub mod render;

pub use device::{GlDevice, GraphicsDevice, RendererConfig};
pub use queue::{RenderQueue, SortMode};
pub use render::Renderer;
