use glam::UVec2;

use crate::coords::Viewport;
use crate::device::{
    AttachmentHandle, AttachmentPoint, ClearMask, FramebufferBinding, FramebufferId, GraphicsDevice,
};

use super::{RenderAttachment, RenderTargetError};

/// Identifies a target owned by a [`RenderTargetCache`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TargetId {
    /// The window's default framebuffer.
    Backbuffer,
    Cached(usize),
}

/// A framebuffer together with the attachments it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    framebuffer: FramebufferId,
    colors: Vec<AttachmentHandle>,
    depth_stencil: Option<AttachmentHandle>,
    width: u32,
    height: u32,
    samples: u32,
    clear_mask: ClearMask,
}

impl RenderTarget {
    fn backbuffer(width: u32, height: u32) -> Self {
        Self {
            framebuffer: FramebufferId::DEFAULT,
            colors: Vec::new(),
            depth_stencil: None,
            width,
            height,
            samples: 0,
            clear_mask: ClearMask::all(),
        }
    }

    #[inline]
    pub fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    pub fn color_attachments(&self) -> &[AttachmentHandle] {
        &self.colors
    }

    pub fn depth_stencil(&self) -> Option<AttachmentHandle> {
        self.depth_stencil
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Planes this target provides.
    #[inline]
    pub fn clear_mask(&self) -> ClearMask {
        self.clear_mask
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::full(self.width, self.height)
    }

    fn matches(
        &self,
        colors: &[&dyn RenderAttachment],
        depth_stencil: Option<&dyn RenderAttachment>,
    ) -> bool {
        self.depth_stencil == depth_stencil.map(|d| d.handle())
            && self.colors.len() == colors.len()
            && self.colors.iter().zip(colors).all(|(have, want)| *have == want.handle())
    }
}

/// Grow-only cache of render targets keyed by attachment identity.
///
/// Lookup is a linear scan; the number of distinct attachment combinations
/// in a frame is expected to stay small. Entries live as long as the cache.
#[derive(Debug)]
pub struct RenderTargetCache {
    backbuffer: RenderTarget,
    entries: Vec<RenderTarget>,
    max_color_attachments: usize,
}

impl RenderTargetCache {
    pub fn new(max_color_attachments: usize, backbuffer_size: UVec2) -> Self {
        Self {
            backbuffer: RenderTarget::backbuffer(backbuffer_size.x, backbuffer_size.y),
            entries: Vec::new(),
            max_color_attachments,
        }
    }

    /// Number of cached framebuffers, not counting the backbuffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_backbuffer_size(&mut self, size: UVec2) {
        self.backbuffer.width = size.x;
        self.backbuffer.height = size.y;
    }

    pub fn target(&self, id: TargetId) -> Option<&RenderTarget> {
        match id {
            TargetId::Backbuffer => Some(&self.backbuffer),
            TargetId::Cached(index) => self.entries.get(index),
        }
    }

    /// Looks up a target without creating one.
    pub fn find(
        &self,
        colors: &[&dyn RenderAttachment],
        depth_stencil: Option<&dyn RenderAttachment>,
    ) -> Option<TargetId> {
        if colors.is_empty() && depth_stencil.is_none() {
            return Some(TargetId::Backbuffer);
        }
        self.entries
            .iter()
            .position(|e| e.matches(colors, depth_stencil))
            .map(TargetId::Cached)
    }

    /// Returns the target for the given attachments, building it on a miss.
    ///
    /// Color order is significant: attachment `i` is bound to color point
    /// `i`. No attachments at all selects the backbuffer. A freshly built
    /// framebuffer is left bound for reading and drawing.
    pub fn get<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        colors: &[&dyn RenderAttachment],
        depth_stencil: Option<&dyn RenderAttachment>,
    ) -> Result<TargetId, RenderTargetError> {
        let Some(first) = colors.first().copied().or(depth_stencil) else {
            return Ok(TargetId::Backbuffer);
        };
        if let Some(id) = self.find(colors, depth_stencil) {
            return Ok(id);
        }

        let target = self.create(device, first, colors, depth_stencil).inspect_err(|err| {
            log::error!("cannot create render target: {err}");
        })?;

        self.entries.push(target);
        Ok(TargetId::Cached(self.entries.len() - 1))
    }

    /// Binds `id` to the given framebuffer binding(s). Unknown ids are ignored.
    pub fn bind<D: GraphicsDevice + ?Sized>(
        &self,
        device: &mut D,
        id: TargetId,
        binding: FramebufferBinding,
    ) {
        match self.target(id) {
            Some(target) => device.bind_framebuffer(binding, target.framebuffer),
            None => log::error!("unknown render target {id:?}"),
        }
    }

    fn create<D: GraphicsDevice + ?Sized>(
        &self,
        device: &mut D,
        first: &dyn RenderAttachment,
        colors: &[&dyn RenderAttachment],
        depth_stencil: Option<&dyn RenderAttachment>,
    ) -> Result<RenderTarget, RenderTargetError> {
        if colors.len() > self.max_color_attachments {
            return Err(RenderTargetError::TooManyColorAttachments {
                count: colors.len(),
                max: self.max_color_attachments,
            });
        }

        let (width, height, samples) = (first.width(), first.height(), first.samples());
        let mut clear_mask = ClearMask::empty();

        for attachment in colors.iter().copied().chain(depth_stencil) {
            let found = (attachment.width(), attachment.height());
            if found != (width, height) {
                return Err(RenderTargetError::SizeMismatch { expected: (width, height), found });
            }
            if attachment.samples() != samples {
                return Err(RenderTargetError::SampleMismatch {
                    expected: samples,
                    found: attachment.samples(),
                });
            }
            clear_mask |= attachment.clear_mask();
        }

        let depth_stencil = match depth_stencil {
            Some(ds) => {
                let format = ds.pixel_format();
                let point = format
                    .depth_stencil_point()
                    .ok_or(RenderTargetError::InvalidDepthStencilFormat(format))?;
                Some((point, ds.handle()))
            }
            None => None,
        };

        let framebuffer = device.create_framebuffer()?;
        device.bind_framebuffer(FramebufferBinding::Both, framebuffer);

        for (index, color) in colors.iter().enumerate() {
            device.attach(AttachmentPoint::Color(index as u32), color.handle());
        }
        if let Some((point, handle)) = depth_stencil {
            device.attach(point, handle);
        }
        device.set_draw_buffers(colors.len());

        let status = device.framebuffer_status();
        if !status.is_complete() {
            log::error!("framebuffer {} is incomplete after creation: {status}", framebuffer.0);
        }

        log::debug!(
            "created framebuffer {} ({width}x{height}, {} color, samples {samples})",
            framebuffer.0,
            colors.len(),
        );

        Ok(RenderTarget {
            framebuffer,
            colors: colors.iter().map(|c| c.handle()).collect(),
            depth_stencil: depth_stencil.map(|(_, handle)| handle),
            width,
            height,
            samples,
            clear_mask,
        })
    }
}
