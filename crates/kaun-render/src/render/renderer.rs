use glam::{Mat4, UVec2, Vec4};

use crate::coords::{Transform, Transforms, Viewport};
use crate::device::{
    ClearMask, FramebufferBinding, GraphicsDevice, ProgramId, RendererConfig, TextureHandle,
    UniformLocation,
};
use crate::mesh::Mesh;
use crate::queue::{RenderQueue, SortMode, Submission};
use crate::shader::Shader;
use crate::state::{RenderState, StateCache};
use crate::target::{RenderAttachment, RenderTarget, RenderTargetCache, TargetId};
use crate::texture::TextureUnits;
use crate::uniform::{Uniform, UniformPayload, UniformType};

/// Render context for one device.
///
/// A new renderer assumes the context is in its initial state. If it was
/// used before, call [`ensure_state`](Self::ensure_state) first.
pub struct Renderer<D: GraphicsDevice> {
    device: D,
    config: RendererConfig,

    state: StateCache,
    textures: TextureUnits,
    targets: RenderTargetCache,
    transforms: Transforms,

    viewport: Viewport,
    program: Option<ProgramId>,
    srgb: bool,
    draw_target: TargetId,
    read_target: TargetId,

    /// Sampler textures of the submission being executed; reused across draws.
    samplers: Vec<TextureHandle>,
}

impl<D: GraphicsDevice> Renderer<D> {
    pub fn new(device: D, config: RendererConfig, backbuffer_size: UVec2) -> Self {
        let limits = device.limits();
        let units = config.texture_units.min(limits.texture_units);
        let attachments = config.max_color_attachments.min(limits.max_color_attachments);

        log::debug!(
            "renderer created: {units} texture units, {attachments} color attachments, \
             backbuffer {}x{}",
            backbuffer_size.x,
            backbuffer_size.y,
        );

        Self {
            device,
            config,
            state: StateCache::new(),
            textures: TextureUnits::new(units),
            targets: RenderTargetCache::new(attachments, backbuffer_size),
            transforms: Transforms::new(),
            viewport: Viewport::full(backbuffer_size.x, backbuffer_size.y),
            program: None,
            srgb: false,
            draw_target: TargetId::Backbuffer,
            read_target: TargetId::Backbuffer,
            samplers: Vec::new(),
        }
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Direct device access. Call [`ensure_state`](Self::ensure_state)
    /// afterwards if the device state was changed.
    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    #[inline]
    pub fn texture_units(&self) -> &TextureUnits {
        &self.textures
    }

    #[inline]
    pub fn state_cache(&self) -> &StateCache {
        &self.state
    }

    #[inline]
    pub fn render_targets(&self) -> &RenderTargetCache {
        &self.targets
    }

    // ── transforms ────────────────────────────────────────────────────────

    pub fn set_projection(&mut self, projection: Mat4) {
        self.transforms.set_projection(projection);
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.transforms.set_view_matrix(view);
    }

    pub fn set_view_transform(&mut self, camera: &Transform) {
        self.transforms.set_view_transform(camera);
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.transforms.set_model_matrix(model);
    }

    pub fn set_model_transform(&mut self, model: &Transform) {
        self.transforms.set_model_transform(model);
    }

    // ── output state ──────────────────────────────────────────────────────

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.device.set_viewport(viewport);
    }

    #[inline]
    pub fn srgb(&self) -> bool {
        self.srgb
    }

    pub fn set_srgb(&mut self, enabled: bool) {
        self.device.set_srgb(enabled);
        self.srgb = enabled;
    }

    /// Clears color attachment `attachment` of the current draw target.
    pub fn clear(&mut self, color: Vec4, attachment: u32) {
        self.device.clear_color(attachment, color);
    }

    pub fn clear_depth(&mut self, depth: f32) {
        self.device.clear_depth(depth);
    }

    /// Current draw target.
    #[inline]
    pub fn render_target(&self) -> TargetId {
        self.draw_target
    }

    /// Updates the backbuffer size after a window resize. The viewport
    /// follows if the backbuffer is the current draw target.
    pub fn set_backbuffer_size(&mut self, size: UVec2) {
        self.targets.set_backbuffer_size(size);
        if self.draw_target == TargetId::Backbuffer {
            self.set_viewport(Viewport::full(size.x, size.y));
        }
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Binds `texture` to a specific unit outside of any draw.
    pub fn bind_texture(&mut self, texture: TextureHandle, unit: usize) -> bool {
        self.textures.bind_fixed(&mut self.device, texture, unit)
    }

    /// Removes `texture` from every unit, e.g. before deleting it.
    pub fn unbind_texture(&mut self, texture: TextureHandle) {
        self.textures.unbind(&mut self.device, texture);
    }

    // ── submission ────────────────────────────────────────────────────────

    /// Queues a draw, capturing the current transforms and viewport as
    /// built-in uniforms ahead of `uniforms`. Does not touch the device.
    pub fn draw<'a>(
        &self,
        queue: &mut RenderQueue<'a>,
        mesh: &'a dyn Mesh,
        shader: &'a dyn Shader,
        uniforms: impl IntoIterator<Item = Uniform>,
        state: &RenderState,
    ) {
        self.draw_instanced(queue, mesh, shader, uniforms, state, 0);
    }

    /// Like [`draw`](Self::draw) with an instance count; zero is non-instanced.
    pub fn draw_instanced<'a>(
        &self,
        queue: &mut RenderQueue<'a>,
        mesh: &'a dyn Mesh,
        shader: &'a dyn Shader,
        uniforms: impl IntoIterator<Item = Uniform>,
        state: &RenderState,
        instances: u32,
    ) {
        let mut all: Vec<Uniform> = self.transforms.builtin_uniforms(self.viewport).into();
        all.extend(uniforms);

        let depth = self.transforms.origin_depth();
        queue.push(Submission::new(mesh, shader, *state, all, depth, instances));
    }

    /// Executes and clears every pending submission.
    pub fn flush(&mut self, queue: &mut RenderQueue<'_>, mode: SortMode) {
        if queue.is_empty() {
            return;
        }

        let count = queue.len();
        for submission in queue.iter_sorted(mode) {
            self.execute(submission);
        }
        queue.clear();

        log::trace!("flushed {count} submissions ({mode:?})");

        if self.config.check_errors {
            if let Some(err) = self.device.take_error() {
                log::warn!("device error after flush: {err}");
            }
        }
    }

    fn execute(&mut self, submission: &Submission<'_>) {
        let shader = submission.shader();
        let program = shader.program();
        if !program.is_valid() {
            log::error!("submission uses program 0; draw skipped");
            return;
        }

        self.state.apply(&mut self.device, submission.state(), false);

        self.samplers.clear();
        self.samplers
            .extend(submission.uniforms().iter().filter_map(Uniform::texture_handle));
        self.textures.mark_all_available();
        self.textures.bind_set(&mut self.device, &self.samplers);

        self.use_program(program);

        for uniform in submission.uniforms() {
            if let Some(location) = shader.uniform_location(uniform.name()) {
                self.write_uniform(shader, location, uniform);
            }
        }

        submission.mesh().draw(&mut self.device, submission.instances());
    }

    fn use_program(&mut self, program: ProgramId) {
        if self.program != Some(program) {
            self.device.use_program(program);
            self.program = Some(program);
        }
    }

    fn write_uniform(&mut self, shader: &dyn Shader, location: UniformLocation, uniform: &Uniform) {
        let mut max_count = uniform.count();
        if let Some(info) = shader.uniform_info(uniform.name()) {
            if info.ty != uniform.ty() {
                log::warn!(
                    "uniform '{}' is {:?} in program {} but {:?} was given; skipped",
                    uniform.name(),
                    info.ty,
                    shader.program().0,
                    uniform.ty(),
                );
                return;
            }
            max_count = max_count.min(info.size);
        }

        if let Some(texture) = uniform.texture_handle() {
            match self.textures.unit_of(texture) {
                Some(unit) => {
                    let unit = [unit as i32];
                    self.device
                        .set_uniform(location, UniformType::Texture, UniformPayload::I32(&unit));
                }
                None => {
                    log::debug!("sampler '{}' has no texture unit; left unchanged", uniform.name())
                }
            }
            return;
        }

        if let Some(payload) = uniform.payload_limited(max_count) {
            if !payload.is_empty() {
                self.device.set_uniform(location, uniform.ty(), payload);
            }
        }
    }

    // ── render targets ────────────────────────────────────────────────────

    /// Flushes `queue`, then makes the target built from the given
    /// attachments current for reading and drawing.
    ///
    /// No attachments selects the backbuffer. With `blit`, the planes both
    /// targets share are first copied from the current read target. Returns
    /// `None` (current targets unchanged) if the attachments are invalid.
    pub fn set_render_target(
        &mut self,
        queue: &mut RenderQueue<'_>,
        colors: &[&dyn RenderAttachment],
        depth_stencil: Option<&dyn RenderAttachment>,
        blit: bool,
    ) -> Option<TargetId> {
        self.flush(queue, self.config.default_sort);

        let id = self.targets.get(&mut self.device, colors, depth_stencil).ok()?;
        if blit {
            self.blit_into(id);
        }
        self.bind_target(id, FramebufferBinding::Both);
        Some(id)
    }

    fn blit_into(&mut self, id: TargetId) {
        if id == self.read_target {
            log::debug!("blit into the current read target {id:?} skipped");
            return;
        }
        let src = self.targets.target(self.read_target);
        let dst = self.targets.target(id);
        let (Some(src), Some(dst)) = (src, dst) else {
            return;
        };
        let (src_size, dst_size) = (src.size(), dst.size());
        let common = src.clear_mask() & dst.clear_mask();

        self.targets.bind(&mut self.device, self.read_target, FramebufferBinding::Read);
        self.targets.bind(&mut self.device, id, FramebufferBinding::Draw);

        if common.contains(ClearMask::COLOR) {
            self.device.blit_framebuffer(src_size, dst_size, ClearMask::COLOR);
        }

        // Depth/stencil blits go wrong on some drivers with sRGB conversion on.
        let rest = common - ClearMask::COLOR;
        if !rest.is_empty() {
            if self.srgb {
                self.device.set_srgb(false);
            }
            self.device.blit_framebuffer(src_size, dst_size, rest);
            if self.srgb {
                self.device.set_srgb(true);
            }
        }
    }

    fn bind_target(&mut self, id: TargetId, binding: FramebufferBinding) {
        self.targets.bind(&mut self.device, id, binding);
        if binding != FramebufferBinding::Draw {
            self.read_target = id;
        }
        if binding != FramebufferBinding::Read {
            self.draw_target = id;
            if let Some(viewport) = self.targets.target(id).map(RenderTarget::viewport) {
                self.set_viewport(viewport);
            }
        }
    }

    // ── resync ────────────────────────────────────────────────────────────

    /// Re-issues all cached device state.
    ///
    /// Needed whenever other code drove the same context: sRGB, target
    /// bindings, viewport, render state, program and texture units are all
    /// sent again regardless of what the caches believe.
    pub fn ensure_state(&mut self) {
        self.device.set_srgb(self.srgb);
        self.targets.bind(&mut self.device, self.draw_target, FramebufferBinding::Draw);
        self.targets.bind(&mut self.device, self.read_target, FramebufferBinding::Read);
        self.device.set_viewport(self.viewport);
        self.state.reapply(&mut self.device);
        if let Some(program) = self.program {
            self.device.use_program(program);
        }
        self.textures.reapply(&mut self.device);
    }
}
