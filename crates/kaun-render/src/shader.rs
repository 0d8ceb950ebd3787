//! Shader seam.
//!
//! Compilation and reflection live outside this crate. The renderer needs a
//! program identity to bind and sort by, and a way to resolve uniform names.

use crate::device::{ProgramId, UniformLocation};
use crate::uniform::UniformType;

/// Reflected description of an active uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformInfo {
    pub ty: UniformType,
    /// Array length; 1 for non-arrays.
    pub size: usize,
}

/// A linked shader program.
pub trait Shader {
    fn program(&self) -> ProgramId;

    /// Location of an active uniform, `None` if the program does not use it.
    fn uniform_location(&self, name: &str) -> Option<UniformLocation>;

    /// Type and array size of an active uniform, when reflection is available.
    fn uniform_info(&self, _name: &str) -> Option<UniformInfo> {
        None
    }
}
