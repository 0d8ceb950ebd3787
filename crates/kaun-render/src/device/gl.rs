use std::num::NonZeroU32;

use anyhow::{Context as _, Result};
use glam::{UVec2, Vec4};
use glow::HasContext;

use crate::coords::Viewport;
use crate::mesh::{IndexType, MeshDraw, PrimitiveMode};
use crate::state::{BlendEquation, BlendFactor, CullFaces, DepthFunc, FrontFace};
use crate::uniform::{UniformPayload, UniformType};

use super::{
    AttachmentHandle, AttachmentPoint, ClearMask, DeviceError, DeviceLimits, FramebufferBinding,
    FramebufferId, FramebufferStatus, GraphicsDevice, ProgramId, TextureHandle, TextureTarget,
    UniformLocation,
};

/// [`GraphicsDevice`] backed by an OpenGL 3.3+ or OpenGL ES 3.0+ context.
///
/// The context must be current on the calling thread for the whole lifetime
/// of the device.
pub struct GlDevice {
    gl: glow::Context,
    limits: DeviceLimits,
    /// Texture target last bound on each unit, so clearing a unit unbinds
    /// the right target.
    unit_targets: Vec<u32>,
}

impl GlDevice {
    /// Wraps an existing context after checking its version.
    pub fn new(gl: glow::Context) -> Result<Self> {
        let version = gl.version();
        anyhow::ensure!(
            is_supported_version(version.major, version.minor, version.is_embedded),
            "OpenGL 3.3 or OpenGL ES 3.0 required, context reports {}{}.{}",
            if version.is_embedded { "ES " } else { "" },
            version.major,
            version.minor
        );

        let (units, attachments) = unsafe {
            (
                gl.get_parameter_i32(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
                gl.get_parameter_i32(glow::MAX_COLOR_ATTACHMENTS),
            )
        };
        let limits = DeviceLimits {
            texture_units: usize::try_from(units).context("invalid texture unit limit")?,
            max_color_attachments: usize::try_from(attachments)
                .context("invalid color attachment limit")?,
        };

        log::debug!(
            "GL {}.{}{} ({}), {} texture units, {} color attachments",
            version.major,
            version.minor,
            if version.is_embedded { " ES" } else { "" },
            version.vendor_info,
            limits.texture_units,
            limits.max_color_attachments,
        );

        let unit_targets = vec![glow::TEXTURE_2D; limits.texture_units];
        Ok(Self { gl, limits, unit_targets })
    }

    /// Loads GL entry points through `loader` and wraps the result.
    ///
    /// # Safety
    /// A GL context must be current on this thread, and `loader` must return
    /// valid function pointers for it.
    pub unsafe fn from_loader<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const std::ffi::c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        Self::new(gl)
    }

    /// Underlying context, for resource creation outside this crate.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn set_capability(&self, capability: u32, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        }
    }
}

impl GraphicsDevice for GlDevice {
    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn set_depth_write(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) };
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        match depth_func_code(func) {
            None => self.set_capability(glow::DEPTH_TEST, false),
            Some(code) => {
                self.set_capability(glow::DEPTH_TEST, true);
                unsafe { self.gl.depth_func(code) };
            }
        }
    }

    fn set_cull_faces(&mut self, faces: CullFaces) {
        let mode = match faces {
            CullFaces::None => return self.set_capability(glow::CULL_FACE, false),
            CullFaces::Front => glow::FRONT,
            CullFaces::Back => glow::BACK,
        };
        self.set_capability(glow::CULL_FACE, true);
        unsafe { self.gl.cull_face(mode) };
    }

    fn set_front_face(&mut self, face: FrontFace) {
        let mode = match face {
            FrontFace::Cw => glow::CW,
            FrontFace::Ccw => glow::CCW,
        };
        unsafe { self.gl.front_face(mode) };
    }

    fn set_blend_enabled(&mut self, enabled: bool) {
        self.set_capability(glow::BLEND, enabled);
    }

    fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        unsafe { self.gl.blend_func(blend_factor_code(src), blend_factor_code(dst)) };
    }

    fn set_blend_equation(&mut self, equation: BlendEquation) {
        let code = match equation {
            BlendEquation::Add => glow::FUNC_ADD,
            BlendEquation::Subtract => glow::FUNC_SUBTRACT,
            BlendEquation::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
            BlendEquation::Min => glow::MIN,
            BlendEquation::Max => glow::MAX,
        };
        unsafe { self.gl.blend_equation(code) };
    }

    fn bind_texture(&mut self, unit: usize, texture: Option<TextureHandle>) {
        let target = track_unit_target(&mut self.unit_targets, unit, texture);
        let object = texture.and_then(|handle| NonZeroU32::new(handle.object));
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit as u32);
            self.gl.bind_texture(target, object.map(glow::NativeTexture));
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe { self.gl.use_program(NonZeroU32::new(program.0).map(glow::NativeProgram)) };
    }

    fn set_uniform(
        &mut self,
        location: UniformLocation,
        ty: UniformType,
        payload: UniformPayload<'_>,
    ) {
        let location = glow::NativeUniformLocation(location.0);
        let loc = Some(&location);
        let gl = &self.gl;
        unsafe {
            match (ty, payload) {
                (UniformType::Float, UniformPayload::F32(v)) => gl.uniform_1_f32_slice(loc, v),
                (UniformType::Vec2, UniformPayload::F32(v)) => gl.uniform_2_f32_slice(loc, v),
                (UniformType::Vec3, UniformPayload::F32(v)) => gl.uniform_3_f32_slice(loc, v),
                (UniformType::Vec4, UniformPayload::F32(v)) => gl.uniform_4_f32_slice(loc, v),
                (UniformType::Int | UniformType::Texture, UniformPayload::I32(v)) => {
                    gl.uniform_1_i32_slice(loc, v)
                }
                (UniformType::IVec2, UniformPayload::I32(v)) => gl.uniform_2_i32_slice(loc, v),
                (UniformType::IVec3, UniformPayload::I32(v)) => gl.uniform_3_i32_slice(loc, v),
                (UniformType::IVec4, UniformPayload::I32(v)) => gl.uniform_4_i32_slice(loc, v),
                (UniformType::UInt, UniformPayload::U32(v)) => gl.uniform_1_u32_slice(loc, v),
                (UniformType::UVec2, UniformPayload::U32(v)) => gl.uniform_2_u32_slice(loc, v),
                (UniformType::UVec3, UniformPayload::U32(v)) => gl.uniform_3_u32_slice(loc, v),
                (UniformType::UVec4, UniformPayload::U32(v)) => gl.uniform_4_u32_slice(loc, v),
                (UniformType::Mat2, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_2_f32_slice(loc, false, v)
                }
                (UniformType::Mat3, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_3_f32_slice(loc, false, v)
                }
                (UniformType::Mat4, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_4_f32_slice(loc, false, v)
                }
                (UniformType::Mat2x3, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_2x3_f32_slice(loc, false, v)
                }
                (UniformType::Mat3x2, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_3x2_f32_slice(loc, false, v)
                }
                (UniformType::Mat2x4, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_2x4_f32_slice(loc, false, v)
                }
                (UniformType::Mat4x2, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_4x2_f32_slice(loc, false, v)
                }
                (UniformType::Mat3x4, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_3x4_f32_slice(loc, false, v)
                }
                (UniformType::Mat4x3, UniformPayload::F32(v)) => {
                    gl.uniform_matrix_4x3_f32_slice(loc, false, v)
                }
                (ty, _) => log::warn!("payload does not match uniform type {ty:?}; write skipped"),
            }
        }
    }

    fn draw(&mut self, draw: &MeshDraw, instances: u32) {
        let mode = primitive_code(draw.mode);
        let count = draw.count as i32;
        unsafe {
            self.gl
                .bind_vertex_array(NonZeroU32::new(draw.vertex_array).map(glow::NativeVertexArray));
            match draw.indices {
                None if instances == 0 => self.gl.draw_arrays(mode, draw.first as i32, count),
                None => {
                    self.gl
                        .draw_arrays_instanced(mode, draw.first as i32, count, instances as i32)
                }
                Some(index) => {
                    let offset = (draw.first * index.size_bytes()) as i32;
                    let ty = index_type_code(index);
                    if instances == 0 {
                        self.gl.draw_elements(mode, count, ty, offset);
                    } else {
                        self.gl
                            .draw_elements_instanced(mode, count, ty, offset, instances as i32);
                    }
                }
            }
        }
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId, DeviceError> {
        unsafe { self.gl.create_framebuffer() }
            .map(|fbo| FramebufferId(fbo.0.get()))
            .map_err(DeviceError::ObjectCreation)
    }

    fn bind_framebuffer(&mut self, binding: FramebufferBinding, framebuffer: FramebufferId) {
        let target = match binding {
            FramebufferBinding::Read => glow::READ_FRAMEBUFFER,
            FramebufferBinding::Draw => glow::DRAW_FRAMEBUFFER,
            FramebufferBinding::Both => glow::FRAMEBUFFER,
        };
        let framebuffer = NonZeroU32::new(framebuffer.0).map(glow::NativeFramebuffer);
        unsafe { self.gl.bind_framebuffer(target, framebuffer) };
    }

    fn attach(&mut self, point: AttachmentPoint, attachment: AttachmentHandle) {
        let point = attachment_point_code(point);
        unsafe {
            match attachment {
                AttachmentHandle::Texture(handle) => {
                    let texture = NonZeroU32::new(handle.object).map(glow::NativeTexture);
                    match handle.target {
                        TextureTarget::Texture2D | TextureTarget::Texture2DMultisample => {
                            self.gl.framebuffer_texture_2d(
                                glow::FRAMEBUFFER,
                                point,
                                texture_target_code(handle.target),
                                texture,
                                0,
                            )
                        }
                        _ => self.gl.framebuffer_texture(glow::FRAMEBUFFER, point, texture, 0),
                    }
                }
                AttachmentHandle::Renderbuffer(object) => self.gl.framebuffer_renderbuffer(
                    glow::FRAMEBUFFER,
                    point,
                    glow::RENDERBUFFER,
                    NonZeroU32::new(object).map(glow::NativeRenderbuffer),
                ),
            }
        }
    }

    fn set_draw_buffers(&mut self, count: usize) {
        unsafe {
            if count == 0 {
                self.gl.draw_buffer(glow::NONE);
                self.gl.read_buffer(glow::NONE);
            } else {
                let buffers: Vec<u32> =
                    (0..count as u32).map(|i| glow::COLOR_ATTACHMENT0 + i).collect();
                self.gl.draw_buffers(&buffers);
            }
        }
    }

    fn framebuffer_status(&mut self) -> FramebufferStatus {
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        match status {
            glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
            glow::FRAMEBUFFER_UNDEFINED => FramebufferStatus::Undefined,
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
                FramebufferStatus::IncompleteMissingAttachment
            }
            glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
            glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
            glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
            glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
            glow::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => FramebufferStatus::IncompleteLayerTargets,
            other => FramebufferStatus::Unknown(other),
        }
    }

    fn blit_framebuffer(&mut self, src: UVec2, dst: UVec2, mask: ClearMask) {
        unsafe {
            self.gl.blit_framebuffer(
                0,
                0,
                src.x as i32,
                src.y as i32,
                0,
                0,
                dst.x as i32,
                dst.y as i32,
                clear_mask_bits(mask),
                glow::NEAREST,
            )
        };
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        unsafe { self.gl.viewport(viewport.x, viewport.y, viewport.width, viewport.height) };
    }

    fn set_srgb(&mut self, enabled: bool) {
        self.set_capability(glow::FRAMEBUFFER_SRGB, enabled);
    }

    fn clear_color(&mut self, attachment: u32, color: Vec4) {
        unsafe { self.gl.clear_buffer_f32_slice(glow::COLOR, attachment, &color.to_array()) };
    }

    fn clear_depth(&mut self, depth: f32) {
        unsafe { self.gl.clear_buffer_f32_slice(glow::DEPTH, 0, &[depth]) };
    }

    fn take_error(&mut self) -> Option<DeviceError> {
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => None,
            glow::INVALID_ENUM => Some(DeviceError::InvalidEnum),
            glow::INVALID_VALUE => Some(DeviceError::InvalidValue),
            glow::INVALID_OPERATION => Some(DeviceError::InvalidOperation),
            glow::INVALID_FRAMEBUFFER_OPERATION => Some(DeviceError::InvalidFramebufferOperation),
            glow::OUT_OF_MEMORY => Some(DeviceError::OutOfMemory),
            code => Some(DeviceError::Unknown(code)),
        }
    }
}

fn is_supported_version(major: u32, minor: u32, embedded: bool) -> bool {
    match (major, embedded) {
        (3, true) => true,
        (3, false) => minor >= 3,
        (major, _) => major > 3,
    }
}

/// Target to bind on `unit`. Binding records the texture's target; clearing
/// reuses the recorded one.
fn track_unit_target(targets: &mut [u32], unit: usize, texture: Option<TextureHandle>) -> u32 {
    match (texture, targets.get_mut(unit)) {
        (Some(handle), Some(slot)) => {
            *slot = texture_target_code(handle.target);
            *slot
        }
        (Some(handle), None) => texture_target_code(handle.target),
        (None, Some(slot)) => *slot,
        (None, None) => glow::TEXTURE_2D,
    }
}

fn depth_func_code(func: DepthFunc) -> Option<u32> {
    Some(match func {
        DepthFunc::Disabled => return None,
        DepthFunc::Never => glow::NEVER,
        DepthFunc::Less => glow::LESS,
        DepthFunc::Equal => glow::EQUAL,
        DepthFunc::LessEqual => glow::LEQUAL,
        DepthFunc::Greater => glow::GREATER,
        DepthFunc::NotEqual => glow::NOTEQUAL,
        DepthFunc::GreaterEqual => glow::GEQUAL,
        DepthFunc::Always => glow::ALWAYS,
    })
}

fn blend_factor_code(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
    }
}

fn texture_target_code(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::Texture2DMultisample => glow::TEXTURE_2D_MULTISAMPLE,
        TextureTarget::Texture2DArray => glow::TEXTURE_2D_ARRAY,
        TextureTarget::Texture3D => glow::TEXTURE_3D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
    }
}

fn attachment_point_code(point: AttachmentPoint) -> u32 {
    match point {
        AttachmentPoint::Color(index) => glow::COLOR_ATTACHMENT0 + index,
        AttachmentPoint::Depth => glow::DEPTH_ATTACHMENT,
        AttachmentPoint::Stencil => glow::STENCIL_ATTACHMENT,
        AttachmentPoint::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

fn primitive_code(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Points => glow::POINTS,
        PrimitiveMode::Lines => glow::LINES,
        PrimitiveMode::LineStrip => glow::LINE_STRIP,
        PrimitiveMode::LineLoop => glow::LINE_LOOP,
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn index_type_code(index: IndexType) -> u32 {
    match index {
        IndexType::U8 => glow::UNSIGNED_BYTE,
        IndexType::U16 => glow::UNSIGNED_SHORT,
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

fn clear_mask_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_gate_matches_gl33_and_es30() {
        assert!(is_supported_version(3, 3, false));
        assert!(is_supported_version(4, 6, false));
        assert!(is_supported_version(3, 0, true));
        assert!(!is_supported_version(3, 2, false));
        assert!(!is_supported_version(2, 1, false));
        assert!(!is_supported_version(2, 0, true));
    }

    #[test]
    fn clearing_a_unit_unbinds_its_last_target() {
        let mut targets = vec![glow::TEXTURE_2D; 4];
        let cube = TextureHandle::new(TextureTarget::CubeMap, 7);

        assert_eq!(track_unit_target(&mut targets, 2, Some(cube)), glow::TEXTURE_CUBE_MAP);
        assert_eq!(track_unit_target(&mut targets, 2, None), glow::TEXTURE_CUBE_MAP);
        assert_eq!(track_unit_target(&mut targets, 1, None), glow::TEXTURE_2D);
        assert_eq!(track_unit_target(&mut targets, 9, Some(cube)), glow::TEXTURE_CUBE_MAP);
        assert_eq!(track_unit_target(&mut targets, 9, None), glow::TEXTURE_2D);
    }

    #[test]
    fn disabled_depth_has_no_comparison() {
        assert_eq!(depth_func_code(DepthFunc::Disabled), None);
        assert_eq!(depth_func_code(DepthFunc::LessEqual), Some(glow::LEQUAL));
    }

    #[test]
    fn clear_mask_maps_to_buffer_bits() {
        assert_eq!(clear_mask_bits(ClearMask::empty()), 0);
        assert_eq!(
            clear_mask_bits(ClearMask::DEPTH | ClearMask::STENCIL),
            glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT
        );
    }

    #[test]
    fn color_attachment_points_are_indexed() {
        assert_eq!(attachment_point_code(AttachmentPoint::Color(3)), glow::COLOR_ATTACHMENT0 + 3);
        assert_eq!(
            attachment_point_code(AttachmentPoint::DepthStencil),
            glow::DEPTH_STENCIL_ATTACHMENT
        );
    }
}
