//! Plain identifiers and enums exchanged with a [`GraphicsDevice`](super::GraphicsDevice).

use bitflags::bitflags;

/// Linked shader program object. Zero is "no program".
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

impl ProgramId {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Framebuffer object. Zero is the default (window) framebuffer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FramebufferId(pub u32);

impl FramebufferId {
    pub const DEFAULT: Self = Self(0);
}

/// Resolved location of an active uniform within a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Texture binding target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureTarget {
    Texture2D,
    Texture2DMultisample,
    Texture2DArray,
    Texture3D,
    CubeMap,
}

/// Identity of a device texture object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle {
    pub target: TextureTarget,
    pub object: u32,
}

impl TextureHandle {
    #[inline]
    pub const fn new(target: TextureTarget, object: u32) -> Self {
        Self { target, object }
    }
}

/// Identity of anything that can be attached to a framebuffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttachmentHandle {
    Texture(TextureHandle),
    Renderbuffer(u32),
}

/// Framebuffer attachment point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttachmentPoint {
    /// Color attachment by index.
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

/// Which framebuffer binding(s) a bind call targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FramebufferBinding {
    Read,
    Draw,
    Both,
}

bitflags! {
    /// Buffer planes of a render target, used for clears and blits.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR   = 1 << 0;
        const DEPTH   = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Hardware limits relevant to the caches.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DeviceLimits {
    /// Combined texture image units available to a program.
    pub texture_units: usize,
    pub max_color_attachments: usize,
}
