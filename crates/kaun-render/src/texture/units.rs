use crate::device::{GraphicsDevice, TextureHandle};

/// Texture-unit table.
///
/// Tracks two independent facts per unit: which texture the device has bound
/// there, and whether the unit may be claimed by the draw currently being
/// prepared. A unit can stay bound to a texture from an earlier draw while
/// being available to the current one; claiming it rebinds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureUnits {
    bound: Vec<Option<TextureHandle>>,
    available: Vec<bool>,
}

impl TextureUnits {
    pub fn new(units: usize) -> Self {
        Self {
            bound: vec![None; units],
            available: vec![true; units],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Texture currently bound to `unit`.
    pub fn bound(&self, unit: usize) -> Option<TextureHandle> {
        self.bound.get(unit).copied().flatten()
    }

    /// First unit `texture` is bound to.
    pub fn unit_of(&self, texture: TextureHandle) -> Option<usize> {
        self.bound.iter().position(|b| *b == Some(texture))
    }

    pub fn is_available(&self, unit: usize) -> bool {
        self.available.get(unit).copied().unwrap_or(false)
    }

    /// Makes every unit claimable again. Bindings are untouched.
    pub fn mark_all_available(&mut self) {
        self.available.fill(true);
    }

    /// Binds `texture` to `unit` and claims the unit.
    ///
    /// Returns `false` if `unit` is out of range.
    pub fn bind_fixed<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        texture: TextureHandle,
        unit: usize,
    ) -> bool {
        if unit >= self.len() {
            log::error!("texture unit {unit} out of range ({} units)", self.len());
            return false;
        }
        if self.bound[unit] != Some(texture) {
            device.bind_texture(unit, Some(texture));
            self.bound[unit] = Some(texture);
        }
        self.available[unit] = false;
        true
    }

    /// Binds `texture` to a unit of the allocator's choosing.
    ///
    /// A texture that is already bound keeps its unit and costs no device
    /// call. Otherwise the first available unit is claimed. Returns `None`
    /// (and logs) when every unit is taken.
    pub fn bind<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        texture: TextureHandle,
    ) -> Option<usize> {
        if let Some(unit) = self.unit_of(texture) {
            self.available[unit] = false;
            return Some(unit);
        }

        let Some(unit) = self.available.iter().position(|&a| a) else {
            log::error!(
                "no texture unit available for texture {} ({} units in use)",
                texture.object,
                self.len()
            );
            return None;
        };

        device.bind_texture(unit, Some(texture));
        self.bound[unit] = Some(texture);
        self.available[unit] = false;
        Some(unit)
    }

    /// Binds all textures of one draw.
    ///
    /// Textures that are already bound claim their units first, so they are
    /// never evicted by another texture of the same set. The rest take the
    /// remaining free units. Returns `false` if some texture got no unit.
    pub fn bind_set<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        textures: &[TextureHandle],
    ) -> bool {
        let mut pending = Vec::new();
        for &texture in textures {
            match self.unit_of(texture) {
                Some(unit) => self.available[unit] = false,
                None => pending.push(texture),
            }
        }

        let mut all_bound = true;
        for texture in pending {
            all_bound &= self.bind(device, texture).is_some();
        }
        all_bound
    }

    /// Clears every unit holding `texture`, e.g. before it is deleted.
    pub fn unbind<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D, texture: TextureHandle) {
        for (unit, bound) in self.bound.iter_mut().enumerate() {
            if *bound == Some(texture) {
                device.bind_texture(unit, None);
                *bound = None;
            }
        }
    }

    /// Re-issues every unit's binding after foreign code touched the device.
    pub fn reapply<D: GraphicsDevice + ?Sized>(&self, device: &mut D) {
        for (unit, bound) in self.bound.iter().enumerate() {
            device.bind_texture(unit, *bound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::TextureTarget;
    use crate::device::recording::{DeviceCall, RecordingDevice};

    fn tex(object: u32) -> TextureHandle {
        TextureHandle::new(TextureTarget::Texture2D, object)
    }

    fn binds(device: &RecordingDevice) -> usize {
        device.count(|c| matches!(c, DeviceCall::BindTexture(..)))
    }

    // ── floating bind ─────────────────────────────────────────────────────

    #[test]
    fn distinct_textures_get_distinct_units() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(4);
        let got: Vec<_> = (1..=4).map(|i| units.bind(&mut device, tex(i))).collect();
        assert_eq!(got, vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(units.bind(&mut device, tex(5)), None);
    }

    #[test]
    fn rebinding_same_texture_reuses_unit_without_device_call() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(4);
        assert_eq!(units.bind(&mut device, tex(9)), Some(0));
        assert_eq!(units.bind(&mut device, tex(9)), Some(0));
        assert_eq!(binds(&device), 1);
    }

    #[test]
    fn exhaustion_is_recoverable_after_reset() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(2);
        units.bind(&mut device, tex(1));
        units.bind(&mut device, tex(2));
        assert_eq!(units.bind(&mut device, tex(3)), None);

        units.mark_all_available();
        assert_eq!(units.bind(&mut device, tex(3)), Some(0));
        assert_eq!(units.bound(0), Some(tex(3)));
        assert_eq!(units.unit_of(tex(1)), None);
    }

    #[test]
    fn reset_keeps_bindings() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(2);
        units.bind(&mut device, tex(1));
        units.mark_all_available();
        assert!(units.is_available(0));
        assert_eq!(units.bound(0), Some(tex(1)));
        assert_eq!(units.bind(&mut device, tex(1)), Some(0));
        assert_eq!(binds(&device), 1);
    }

    // ── fixed bind ────────────────────────────────────────────────────────

    #[test]
    fn fixed_bind_overwrites_and_claims() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(4);
        units.bind(&mut device, tex(1));
        assert!(units.bind_fixed(&mut device, tex(2), 0));
        assert_eq!(units.bound(0), Some(tex(2)));
        assert!(!units.is_available(0));
        assert_eq!(units.bind(&mut device, tex(3)), Some(1));
        assert!(!units.bind_fixed(&mut device, tex(4), 4));
    }

    #[test]
    fn fixed_and_floating_interoperate() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(3);
        units.bind_fixed(&mut device, tex(10), 1);
        assert_eq!(units.bind(&mut device, tex(11)), Some(0));
        assert_eq!(units.bind(&mut device, tex(12)), Some(2));
        assert_eq!(units.bind(&mut device, tex(10)), Some(1));
    }

    // ── sets ──────────────────────────────────────────────────────────────

    #[test]
    fn bind_set_keeps_already_bound_units() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(2);
        units.bind(&mut device, tex(1));
        units.bind(&mut device, tex(2));
        device.take_calls();

        // tex(2) sits in unit 1; tex(3) must not evict it.
        units.mark_all_available();
        assert!(units.bind_set(&mut device, &[tex(3), tex(2)]));
        assert_eq!(units.unit_of(tex(2)), Some(1));
        assert_eq!(units.unit_of(tex(3)), Some(0));
        assert_eq!(device.take_calls(), vec![DeviceCall::BindTexture(0, Some(tex(3)))]);
    }

    #[test]
    fn bind_set_reports_overflow() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(1);
        assert!(!units.bind_set(&mut device, &[tex(1), tex(2)]));
        assert_eq!(units.unit_of(tex(1)), Some(0));
    }

    // ── maintenance ───────────────────────────────────────────────────────

    #[test]
    fn unbind_clears_every_unit() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(3);
        units.bind_fixed(&mut device, tex(1), 0);
        units.bind_fixed(&mut device, tex(1), 2);
        device.take_calls();
        units.unbind(&mut device, tex(1));
        assert_eq!(
            device.take_calls(),
            vec![DeviceCall::BindTexture(0, None), DeviceCall::BindTexture(2, None)]
        );
        assert_eq!(units.unit_of(tex(1)), None);
    }

    #[test]
    fn reapply_rebinds_all_units() {
        let mut device = RecordingDevice::new();
        let mut units = TextureUnits::new(2);
        units.bind(&mut device, tex(5));
        device.take_calls();
        units.reapply(&mut device);
        assert_eq!(
            device.take_calls(),
            vec![DeviceCall::BindTexture(0, Some(tex(5))), DeviceCall::BindTexture(1, None)]
        );
    }
}
