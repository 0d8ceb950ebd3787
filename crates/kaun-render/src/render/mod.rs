//! The renderer context.
//!
//! [`Renderer`] owns the device and every cache layered on top of it. There
//! is no global state: independent renderers (one per GL context) never
//! observe each other.
//!
//! Frame flow:
//! - update transforms (`set_projection`, `set_view_transform`, ...)
//! - `draw` into a caller-owned [`RenderQueue`](crate::queue::RenderQueue)
//! - `flush` (explicitly, or implicitly through `set_render_target`)

mod renderer;

pub use renderer::Renderer;
