use crate::device::ProgramId;

/// How a flush orders pending submissions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SortMode {
    /// Opaque before blended, grouped by program, then by depth.
    Default,
    /// Exactly the order `draw` was called in.
    Submission,
}

/// Packed 64-bit ordering key, ascending.
///
/// Layout:
/// - bit 63: blending enabled (opaque draws sort first)
/// - bits 62..24: program id
/// - bits 23..0: depth quantized to 24 bits, inverted for blended draws so
///   they run back-to-front while opaque draws run front-to-back
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SortKey(pub u64);

impl SortKey {
    const DEPTH_BITS: u32 = 24;
    const DEPTH_MAX: u64 = (1 << Self::DEPTH_BITS) - 1;
    const PROGRAM_MASK: u64 = (1 << 39) - 1;
    const BLEND_BIT: u64 = 1 << 63;

    pub fn new(blended: bool, program: ProgramId, depth: f32) -> Self {
        let mut depth = quantize_depth(depth);
        let mut key = (program.0 as u64 & Self::PROGRAM_MASK) << Self::DEPTH_BITS;
        if blended {
            depth = Self::DEPTH_MAX - depth;
            key |= Self::BLEND_BIT;
        }
        Self(key | depth)
    }

    #[inline]
    pub fn is_blended(self) -> bool {
        self.0 & Self::BLEND_BIT != 0
    }

    #[inline]
    pub fn program(self) -> u64 {
        (self.0 >> Self::DEPTH_BITS) & Self::PROGRAM_MASK
    }

    /// Stored depth bits (already inverted for blended keys).
    #[inline]
    pub fn depth_bits(self) -> u32 {
        (self.0 & Self::DEPTH_MAX) as u32
    }
}

/// Maps GL NDC depth in [-1, 1] onto 24 bits, near plane at zero.
/// Out-of-range values saturate and NaN maps to zero.
fn quantize_depth(depth: f32) -> u64 {
    if depth.is_nan() {
        return 0;
    }
    ((depth * 0.5 + 0.5).clamp(0.0, 1.0) * SortKey::DEPTH_MAX as f32) as u64
}
