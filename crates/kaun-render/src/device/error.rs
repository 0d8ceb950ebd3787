use std::fmt;

/// Error reported by the device, or a failed object creation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DeviceError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    /// Error code with no known meaning.
    Unknown(u32),
    /// The device refused to create an object.
    ObjectCreation(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnum => f.write_str("GL_INVALID_ENUM"),
            Self::InvalidValue => f.write_str("GL_INVALID_VALUE"),
            Self::InvalidOperation => f.write_str("GL_INVALID_OPERATION"),
            Self::InvalidFramebufferOperation => f.write_str("GL_INVALID_FRAMEBUFFER_OPERATION"),
            Self::OutOfMemory => f.write_str("GL_OUT_OF_MEMORY"),
            Self::Unknown(code) => write!(f, "unknown device error 0x{code:X}"),
            Self::ObjectCreation(msg) => write!(f, "object creation failed: {msg}"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Completeness of the currently bound framebuffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramebufferStatus {
    Complete,
    Undefined,
    IncompleteAttachment,
    IncompleteMissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    IncompleteMultisample,
    IncompleteLayerTargets,
    Unknown(u32),
}

impl FramebufferStatus {
    #[inline]
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Undefined => "undefined",
            Self::IncompleteAttachment => "incomplete_attachment",
            Self::IncompleteMissingAttachment => "incomplete_missing_attachment",
            Self::IncompleteDrawBuffer => "incomplete_draw_buffer",
            Self::IncompleteReadBuffer => "incomplete_read_buffer",
            Self::Unsupported => "unsupported",
            Self::IncompleteMultisample => "incomplete_multisample",
            Self::IncompleteLayerTargets => "incomplete_layer_targets",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown (0x{code:X})"),
            other => f.write_str(other.name()),
        }
    }
}
