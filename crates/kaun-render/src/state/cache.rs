use crate::device::GraphicsDevice;

use super::{BlendEquation, BlendFactor, CullFaces, DepthFunc, FrontFace, RenderState};

/// Last render state actually applied to the device.
///
/// Each field is `None` while its device value is unknown, which makes the
/// next `apply` emit it regardless of the requested value.
#[derive(Debug, Clone, PartialEq)]
pub struct StateCache {
    depth_write: Option<bool>,
    depth_func: Option<DepthFunc>,
    cull_faces: Option<CullFaces>,
    front_face: Option<FrontFace>,
    blend_enabled: Option<bool>,
    blend_func: Option<(BlendFactor, BlendFactor)>,
    blend_equation: Option<BlendEquation>,
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCache {
    /// Cache matching a freshly created context.
    pub fn new() -> Self {
        let s = RenderState::device_defaults();
        Self {
            depth_write: Some(s.depth_write),
            depth_func: Some(s.depth_func),
            cull_faces: Some(s.cull_faces),
            front_face: Some(s.front_face),
            blend_enabled: Some(s.blend_enabled),
            blend_func: Some((s.blend_src, s.blend_dst)),
            blend_equation: Some(s.blend_equation),
        }
    }

    /// Cache with no knowledge of the device state.
    pub fn unknown() -> Self {
        Self {
            depth_write: None,
            depth_func: None,
            cull_faces: None,
            front_face: None,
            blend_enabled: None,
            blend_func: None,
            blend_equation: None,
        }
    }

    /// Forgets everything, e.g. after foreign code drove the context.
    pub fn invalidate(&mut self) {
        *self = Self::unknown();
    }

    /// Returns the applied state if every field is known.
    pub fn current(&self) -> Option<RenderState> {
        let (blend_src, blend_dst) = self.blend_func?;
        Some(RenderState {
            depth_write: self.depth_write?,
            depth_func: self.depth_func?,
            cull_faces: self.cull_faces?,
            front_face: self.front_face?,
            blend_enabled: self.blend_enabled?,
            blend_src,
            blend_dst,
            blend_equation: self.blend_equation?,
        })
    }

    /// Re-emits every known field, e.g. after foreign code drove the context.
    ///
    /// Unknown fields are reset to the device defaults. Blend factors are
    /// forgotten when blending is off, since they are not re-emitted then.
    pub fn reapply<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) {
        let d = RenderState::device_defaults();
        let (blend_src, blend_dst) = self.blend_func.unwrap_or((d.blend_src, d.blend_dst));
        let state = RenderState {
            depth_write: self.depth_write.unwrap_or(d.depth_write),
            depth_func: self.depth_func.unwrap_or(d.depth_func),
            cull_faces: self.cull_faces.unwrap_or(d.cull_faces),
            front_face: self.front_face.unwrap_or(d.front_face),
            blend_enabled: self.blend_enabled.unwrap_or(d.blend_enabled),
            blend_src,
            blend_dst,
            blend_equation: self.blend_equation.unwrap_or(d.blend_equation),
        };
        self.apply(device, &state, true);
        if !state.blend_enabled {
            self.blend_func = None;
            self.blend_equation = None;
        }
    }

    /// Reconciles the device with `state`.
    ///
    /// Only differing fields are emitted unless `force` is set. Blend factors
    /// and the blend equation are left untouched while blending is off, so a
    /// later re-enable keeps whatever factors were applied last.
    pub fn apply<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        state: &RenderState,
        force: bool,
    ) {
        if needs(self.depth_write, state.depth_write, force) {
            device.set_depth_write(state.depth_write);
            self.depth_write = Some(state.depth_write);
        }

        if needs(self.depth_func, state.depth_func, force) {
            device.set_depth_func(state.depth_func);
            self.depth_func = Some(state.depth_func);
        }

        if needs(self.cull_faces, state.cull_faces, force) {
            device.set_cull_faces(state.cull_faces);
            self.cull_faces = Some(state.cull_faces);
        }

        if needs(self.front_face, state.front_face, force) {
            device.set_front_face(state.front_face);
            self.front_face = Some(state.front_face);
        }

        if needs(self.blend_enabled, state.blend_enabled, force) {
            device.set_blend_enabled(state.blend_enabled);
            self.blend_enabled = Some(state.blend_enabled);
        }

        if state.blend_enabled {
            let func = (state.blend_src, state.blend_dst);
            if needs(self.blend_func, func, force) {
                device.set_blend_func(func.0, func.1);
                self.blend_func = Some(func);
            }
            if needs(self.blend_equation, state.blend_equation, force) {
                device.set_blend_equation(state.blend_equation);
                self.blend_equation = Some(state.blend_equation);
            }
        }
    }
}

#[inline]
fn needs<T: PartialEq>(cached: Option<T>, wanted: T, force: bool) -> bool {
    force || cached != Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::recording::{DeviceCall, RecordingDevice};

    fn applied(cache: &mut StateCache, state: RenderState, force: bool) -> Vec<DeviceCall> {
        let mut device = RecordingDevice::new();
        cache.apply(&mut device, &state, force);
        device.take_calls()
    }

    // ── diffing ───────────────────────────────────────────────────────────

    #[test]
    fn device_defaults_on_fresh_cache_emit_nothing() {
        let mut cache = StateCache::new();
        assert!(applied(&mut cache, RenderState::device_defaults(), false).is_empty());
    }

    #[test]
    fn default_state_emits_only_depth_and_culling() {
        let mut cache = StateCache::new();
        let calls = applied(&mut cache, RenderState::default(), false);
        assert_eq!(
            calls,
            vec![
                DeviceCall::DepthFunc(DepthFunc::LessEqual),
                DeviceCall::CullFaces(CullFaces::Back),
            ]
        );
    }

    #[test]
    fn reapplying_same_state_is_silent() {
        let mut cache = StateCache::new();
        let state = RenderState::default().alpha_blended();
        applied(&mut cache, state, false);
        assert!(applied(&mut cache, state, false).is_empty());
    }

    #[test]
    fn only_changed_fields_are_emitted() {
        let mut cache = StateCache::new();
        let a = RenderState::default();
        let b = a.with_depth(DepthFunc::Less, false);
        applied(&mut cache, a, false);
        let calls = applied(&mut cache, b, false);
        assert_eq!(
            calls,
            vec![DeviceCall::DepthWrite(false), DeviceCall::DepthFunc(DepthFunc::Less)]
        );
        assert_eq!(cache.current(), Some(b));
    }

    // ── blending ──────────────────────────────────────────────────────────

    #[test]
    fn blend_func_not_emitted_while_blending_off() {
        let mut cache = StateCache::new();
        let mut state = RenderState::device_defaults();
        state.blend_src = BlendFactor::SrcAlpha;
        state.blend_dst = BlendFactor::OneMinusSrcAlpha;
        state.blend_equation = BlendEquation::Max;
        assert!(applied(&mut cache, state, false).is_empty());
        assert!(applied(&mut cache, state, true).iter().all(|c| !matches!(
            c,
            DeviceCall::BlendFunc(..) | DeviceCall::BlendEquation(_)
        )));
    }

    #[test]
    fn reenabling_blend_reuses_stale_factors() {
        let mut cache = StateCache::new();
        let blended = RenderState::default().alpha_blended();
        let opaque = RenderState::default();

        let first = applied(&mut cache, blended, false);
        assert!(first.contains(&DeviceCall::BlendFunc(
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha
        )));

        assert_eq!(applied(&mut cache, opaque, false), vec![DeviceCall::BlendEnabled(false)]);
        assert_eq!(applied(&mut cache, blended, false), vec![DeviceCall::BlendEnabled(true)]);
    }

    #[test]
    fn changed_equation_only_emits_equation() {
        let mut cache = StateCache::new();
        let add = RenderState::default().alpha_blended();
        let max = add.with_blend_equation(BlendEquation::Max);
        applied(&mut cache, add, false);
        assert_eq!(
            applied(&mut cache, max, false),
            vec![DeviceCall::BlendEquation(BlendEquation::Max)]
        );
    }

    // ── forcing ───────────────────────────────────────────────────────────

    #[test]
    fn force_emits_every_field() {
        let mut cache = StateCache::new();
        let state = RenderState::device_defaults();
        assert_eq!(applied(&mut cache, state, true).len(), 5);

        let blended = state.alpha_blended();
        applied(&mut cache, blended, false);
        assert_eq!(applied(&mut cache, blended, true).len(), 7);
    }

    #[test]
    fn force_matches_unknown_cache() {
        let states = [
            RenderState::default(),
            RenderState::device_defaults(),
            RenderState::default().alpha_blended().with_culling(CullFaces::Front, FrontFace::Cw),
        ];
        for state in states {
            let mut warm = StateCache::new();
            applied(&mut warm, RenderState::default().alpha_blended(), false);
            let forced = applied(&mut warm, state, true);

            let mut cold = StateCache::unknown();
            let fresh = applied(&mut cold, state, false);

            assert_eq!(forced, fresh);
        }
    }

    #[test]
    fn reapply_forces_known_state() {
        let mut cache = StateCache::new();
        let state = RenderState::default().alpha_blended();
        applied(&mut cache, state, false);

        let mut device = RecordingDevice::new();
        cache.reapply(&mut device);
        assert_eq!(device.calls.len(), 7);
        assert!(device.calls.contains(&DeviceCall::BlendFunc(
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha
        )));
        assert_eq!(cache.current(), Some(state));
    }

    #[test]
    fn reapply_without_blending_forgets_factors() {
        let mut cache = StateCache::new();
        let blended = RenderState::default().alpha_blended();
        applied(&mut cache, blended, false);
        applied(&mut cache, RenderState::default(), false);

        let mut device = RecordingDevice::new();
        cache.reapply(&mut device);
        assert_eq!(device.calls.len(), 5);

        // Factors may have been changed behind our back, so they are re-sent.
        let calls = applied(&mut cache, blended, false);
        assert!(calls.contains(&DeviceCall::BlendFunc(
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha
        )));
    }

    #[test]
    fn invalidate_forgets_state() {
        let mut cache = StateCache::new();
        assert!(cache.current().is_some());
        cache.invalidate();
        assert_eq!(cache.current(), None);
        assert_eq!(cache, StateCache::unknown());
    }
}
