//! Graphics device seam.
//!
//! Everything above this module talks to the GPU through [`GraphicsDevice`]:
//! a narrow, synchronous command surface shaped after OpenGL. [`GlDevice`]
//! implements it on top of `glow`.
//!
//! A device is bound to one context on one thread; none of these types are
//! meant to be shared across threads.

mod error;
mod gl;
mod init;
#[cfg(test)]
pub(crate) mod recording;
mod types;

pub use error::{DeviceError, FramebufferStatus};
pub use gl::GlDevice;
pub use init::RendererConfig;
pub use types::{
    AttachmentHandle, AttachmentPoint, ClearMask, DeviceLimits, FramebufferBinding, FramebufferId,
    ProgramId, TextureHandle, TextureTarget, UniformLocation,
};

use glam::{UVec2, Vec4};

use crate::coords::Viewport;
use crate::mesh::MeshDraw;
use crate::state::{BlendEquation, BlendFactor, CullFaces, DepthFunc, FrontFace};
use crate::uniform::{UniformPayload, UniformType};

/// Device commands issued by the caches and the render queue.
pub trait GraphicsDevice {
    fn limits(&self) -> DeviceLimits;

    // ── fixed-function state ──────────────────────────────────────────────

    fn set_depth_write(&mut self, enabled: bool);
    /// `DepthFunc::Disabled` turns the depth test off; anything else turns it
    /// on and selects the comparison.
    fn set_depth_func(&mut self, func: DepthFunc);
    /// `CullFaces::None` turns culling off.
    fn set_cull_faces(&mut self, faces: CullFaces);
    fn set_front_face(&mut self, face: FrontFace);
    fn set_blend_enabled(&mut self, enabled: bool);
    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn set_blend_equation(&mut self, equation: BlendEquation);

    // ── resources ─────────────────────────────────────────────────────────

    /// Binds `texture` to `unit`, or clears the unit when `None`.
    fn bind_texture(&mut self, unit: usize, texture: Option<TextureHandle>);
    fn use_program(&mut self, program: ProgramId);
    /// Writes to a uniform of the bound program. The element count is the
    /// payload length divided by the type's component count.
    fn set_uniform(
        &mut self,
        location: UniformLocation,
        ty: UniformType,
        payload: UniformPayload<'_>,
    );
    /// `instances == 0` is a plain, non-instanced draw.
    fn draw(&mut self, draw: &MeshDraw, instances: u32);

    // ── framebuffers ──────────────────────────────────────────────────────

    fn create_framebuffer(&mut self) -> Result<FramebufferId, DeviceError>;
    fn bind_framebuffer(&mut self, binding: FramebufferBinding, framebuffer: FramebufferId);
    /// Attaches to the framebuffer bound for both reading and drawing.
    fn attach(&mut self, point: AttachmentPoint, attachment: AttachmentHandle);
    /// Enables color attachments `0..count` for drawing. Zero selects no
    /// draw or read buffer at all.
    fn set_draw_buffers(&mut self, count: usize);
    fn framebuffer_status(&mut self) -> FramebufferStatus;
    /// Copies `mask` planes from the read framebuffer (`src` sized) to the
    /// draw framebuffer (`dst` sized) with nearest filtering.
    fn blit_framebuffer(&mut self, src: UVec2, dst: UVec2, mask: ClearMask);

    // ── output ────────────────────────────────────────────────────────────

    fn set_viewport(&mut self, viewport: Viewport);
    fn set_srgb(&mut self, enabled: bool);
    fn clear_color(&mut self, attachment: u32, color: Vec4);
    fn clear_depth(&mut self, depth: f32);

    /// Pops the oldest pending device error, if any.
    fn take_error(&mut self) -> Option<DeviceError>;
}
