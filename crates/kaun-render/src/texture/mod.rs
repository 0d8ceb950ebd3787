//! Sampled textures and the texture-unit allocator.
//!
//! Texture storage and upload live outside this crate; the renderer only
//! needs a texture's device identity.

mod units;

pub use units::TextureUnits;

pub use crate::device::{TextureHandle, TextureTarget};

/// Anything that can be bound to a texture unit.
pub trait Texture {
    fn handle(&self) -> TextureHandle;
}

impl Texture for TextureHandle {
    #[inline]
    fn handle(&self) -> TextureHandle {
        *self
    }
}
