//! Render targets: framebuffer objects built from attachments, cached by
//! attachment identity.

mod attachment;
mod cache;
mod error;

pub use attachment::{Attachment, PixelFormat, RenderAttachment};
pub use cache::{RenderTarget, RenderTargetCache, TargetId};
pub use error::RenderTargetError;
