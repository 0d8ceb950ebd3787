//! Deferred draw submissions.
//!
//! Responsibilities:
//! - hold per-draw snapshots (mesh, shader, state, uniforms) until a flush
//! - order them for execution (packed sort key, or submission order)
//!
//! Meshes and shaders are borrowed for the queue's lifetime `'a`, so they
//! cannot be dropped while a submission still refers to them.

mod key;
mod list;

pub use key::{SortKey, SortMode};
pub use list::{RenderQueue, Submission};
