use std::fmt;

use crate::device::DeviceError;

use super::PixelFormat;

/// Why a render target could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderTargetError {
    SizeMismatch { expected: (u32, u32), found: (u32, u32) },
    SampleMismatch { expected: u32, found: u32 },
    InvalidDepthStencilFormat(PixelFormat),
    TooManyColorAttachments { count: usize, max: usize },
    Device(DeviceError),
}

impl fmt::Display for RenderTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, found } => write!(
                f,
                "attachments are of different sizes ({}x{} vs {}x{})",
                expected.0, expected.1, found.0, found.1
            ),
            Self::SampleMismatch { expected, found } => write!(
                f,
                "attachments have different MSAA sample counts ({expected} vs {found})"
            ),
            Self::InvalidDepthStencilFormat(format) => {
                write!(f, "{format:?} is not a depth/stencil format")
            }
            Self::TooManyColorAttachments { count, max } => {
                write!(f, "{count} color attachments exceed the limit of {max}")
            }
            Self::Device(err) => write!(f, "device error: {err}"),
        }
    }
}

impl std::error::Error for RenderTargetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Device(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DeviceError> for RenderTargetError {
    fn from(err: DeviceError) -> Self {
        Self::Device(err)
    }
}
