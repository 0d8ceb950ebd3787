use crate::device::{AttachmentHandle, AttachmentPoint, ClearMask, TextureHandle};

/// Internal format of an attachment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    R8,
    R16F,
    Rg8,
    Rg16F,
    Rgb8,
    Rgb16F,
    Rgba8,
    Rgba16F,
    Rgb10A2,
    Rg11FB10F,
    Rgb9E5,
    Depth16,
    Depth24,
    Depth32F,
    Depth24Stencil8,
    Depth32FStencil8,
    Stencil8,
}

impl PixelFormat {
    /// Where an attachment of this format goes when used as the
    /// depth/stencil attachment. `None` for color formats.
    pub const fn depth_stencil_point(self) -> Option<AttachmentPoint> {
        match self {
            Self::Depth16 | Self::Depth24 | Self::Depth32F => Some(AttachmentPoint::Depth),
            Self::Depth24Stencil8 | Self::Depth32FStencil8 => Some(AttachmentPoint::DepthStencil),
            Self::Stencil8 => Some(AttachmentPoint::Stencil),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_color(self) -> bool {
        self.depth_stencil_point().is_none()
    }

    /// Buffer planes an attachment of this format provides.
    pub const fn clear_mask(self) -> ClearMask {
        match self.depth_stencil_point() {
            None => ClearMask::COLOR,
            Some(AttachmentPoint::Depth) => ClearMask::DEPTH,
            Some(AttachmentPoint::Stencil) => ClearMask::STENCIL,
            Some(_) => ClearMask::DEPTH.union(ClearMask::STENCIL),
        }
    }
}

/// Something a framebuffer can render into: a texture level or a
/// renderbuffer. Identity is the device handle.
pub trait RenderAttachment {
    fn handle(&self) -> AttachmentHandle;
    fn pixel_format(&self) -> PixelFormat;
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// MSAA sample count; zero for single-sampled storage.
    fn samples(&self) -> u32 {
        0
    }

    fn clear_mask(&self) -> ClearMask {
        self.pixel_format().clear_mask()
    }
}

/// Description of an attachment created elsewhere.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Attachment {
    pub handle: AttachmentHandle,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
}

impl Attachment {
    pub const fn texture(
        texture: TextureHandle,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            handle: AttachmentHandle::Texture(texture),
            format,
            width,
            height,
            samples: 0,
        }
    }

    pub const fn renderbuffer(object: u32, format: PixelFormat, width: u32, height: u32) -> Self {
        Self {
            handle: AttachmentHandle::Renderbuffer(object),
            format,
            width,
            height,
            samples: 0,
        }
    }

    pub const fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }
}

impl RenderAttachment for Attachment {
    fn handle(&self) -> AttachmentHandle {
        self.handle
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn samples(&self) -> u32 {
        self.samples
    }
}
