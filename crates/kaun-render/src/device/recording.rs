//! Headless device that records every command, for tests.

use glam::{UVec2, Vec4};

use crate::coords::Viewport;
use crate::mesh::MeshDraw;
use crate::state::{BlendEquation, BlendFactor, CullFaces, DepthFunc, FrontFace};
use crate::uniform::{UniformPayload, UniformType};

use super::{
    AttachmentHandle, AttachmentPoint, ClearMask, DeviceError, DeviceLimits, FramebufferBinding,
    FramebufferId, FramebufferStatus, GraphicsDevice, ProgramId, TextureHandle, UniformLocation,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    F32(Vec<f32>),
    I32(Vec<i32>),
    U32(Vec<u32>),
}

impl From<UniformPayload<'_>> for Payload {
    fn from(payload: UniformPayload<'_>) -> Self {
        match payload {
            UniformPayload::F32(v) => Self::F32(v.to_vec()),
            UniformPayload::I32(v) => Self::I32(v.to_vec()),
            UniformPayload::U32(v) => Self::U32(v.to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeviceCall {
    DepthWrite(bool),
    DepthFunc(DepthFunc),
    CullFaces(CullFaces),
    FrontFace(FrontFace),
    BlendEnabled(bool),
    BlendFunc(BlendFactor, BlendFactor),
    BlendEquation(BlendEquation),
    BindTexture(usize, Option<TextureHandle>),
    UseProgram(ProgramId),
    SetUniform(UniformLocation, UniformType, Payload),
    Draw(MeshDraw, u32),
    CreateFramebuffer(FramebufferId),
    BindFramebuffer(FramebufferBinding, FramebufferId),
    Attach(AttachmentPoint, AttachmentHandle),
    DrawBuffers(usize),
    Blit(UVec2, UVec2, ClearMask),
    Viewport(Viewport),
    Srgb(bool),
    ClearColor(u32, Vec4),
    ClearDepth(f32),
}

#[derive(Debug)]
pub(crate) struct RecordingDevice {
    pub calls: Vec<DeviceCall>,
    pub limits: DeviceLimits,
    /// Status reported for every framebuffer.
    pub status: FramebufferStatus,
    /// Errors handed out by `take_error`, oldest first.
    pub errors: Vec<DeviceError>,
    /// Makes `create_framebuffer` fail.
    pub fail_framebuffers: bool,
    next_framebuffer: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::with_limits(16, 8)
    }

    pub fn with_limits(texture_units: usize, max_color_attachments: usize) -> Self {
        Self {
            calls: Vec::new(),
            limits: DeviceLimits { texture_units, max_color_attachments },
            status: FramebufferStatus::Complete,
            errors: Vec::new(),
            fail_framebuffers: false,
            next_framebuffer: 1,
        }
    }

    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, pred: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.calls.push(DeviceCall::DepthWrite(enabled));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.calls.push(DeviceCall::DepthFunc(func));
    }

    fn set_cull_faces(&mut self, faces: CullFaces) {
        self.calls.push(DeviceCall::CullFaces(faces));
    }

    fn set_front_face(&mut self, face: FrontFace) {
        self.calls.push(DeviceCall::FrontFace(face));
    }

    fn set_blend_enabled(&mut self, enabled: bool) {
        self.calls.push(DeviceCall::BlendEnabled(enabled));
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.calls.push(DeviceCall::BlendFunc(src, dst));
    }

    fn set_blend_equation(&mut self, equation: BlendEquation) {
        self.calls.push(DeviceCall::BlendEquation(equation));
    }

    fn bind_texture(&mut self, unit: usize, texture: Option<TextureHandle>) {
        self.calls.push(DeviceCall::BindTexture(unit, texture));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(DeviceCall::UseProgram(program));
    }

    fn set_uniform(
        &mut self,
        location: UniformLocation,
        ty: UniformType,
        payload: UniformPayload<'_>,
    ) {
        self.calls.push(DeviceCall::SetUniform(location, ty, payload.into()));
    }

    fn draw(&mut self, draw: &MeshDraw, instances: u32) {
        self.calls.push(DeviceCall::Draw(*draw, instances));
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId, DeviceError> {
        if self.fail_framebuffers {
            return Err(DeviceError::ObjectCreation("out of framebuffers".into()));
        }
        let id = FramebufferId(self.next_framebuffer);
        self.next_framebuffer += 1;
        self.calls.push(DeviceCall::CreateFramebuffer(id));
        Ok(id)
    }

    fn bind_framebuffer(&mut self, binding: FramebufferBinding, framebuffer: FramebufferId) {
        self.calls.push(DeviceCall::BindFramebuffer(binding, framebuffer));
    }

    fn attach(&mut self, point: AttachmentPoint, attachment: AttachmentHandle) {
        self.calls.push(DeviceCall::Attach(point, attachment));
    }

    fn set_draw_buffers(&mut self, count: usize) {
        self.calls.push(DeviceCall::DrawBuffers(count));
    }

    fn framebuffer_status(&mut self) -> FramebufferStatus {
        self.status
    }

    fn blit_framebuffer(&mut self, src: UVec2, dst: UVec2, mask: ClearMask) {
        self.calls.push(DeviceCall::Blit(src, dst, mask));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push(DeviceCall::Viewport(viewport));
    }

    fn set_srgb(&mut self, enabled: bool) {
        self.calls.push(DeviceCall::Srgb(enabled));
    }

    fn clear_color(&mut self, attachment: u32, color: Vec4) {
        self.calls.push(DeviceCall::ClearColor(attachment, color));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.calls.push(DeviceCall::ClearDepth(depth));
    }

    fn take_error(&mut self) -> Option<DeviceError> {
        if self.errors.is_empty() { None } else { Some(self.errors.remove(0)) }
    }
}
