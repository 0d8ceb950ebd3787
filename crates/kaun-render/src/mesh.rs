//! Geometry seam.
//!
//! Vertex storage lives outside this crate. A mesh only has to describe how
//! it is drawn.

use crate::device::GraphicsDevice;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    #[inline]
    pub const fn size_bytes(self) -> u32 {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Everything a device needs to issue a draw call for a mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshDraw {
    /// Vertex array object holding the vertex (and index) buffer bindings.
    pub vertex_array: u32,
    pub mode: PrimitiveMode,
    /// First vertex, or first index when `indices` is set.
    pub first: u32,
    pub count: u32,
    /// Index type of the bound element buffer; `None` draws vertices in order.
    pub indices: Option<IndexType>,
}

/// A drawable piece of geometry.
pub trait Mesh {
    fn draw_call(&self) -> MeshDraw;

    /// Issues the draw. `instances == 0` is a non-instanced draw.
    fn draw(&self, device: &mut dyn GraphicsDevice, instances: u32) {
        device.draw(&self.draw_call(), instances);
    }
}

impl Mesh for MeshDraw {
    fn draw_call(&self) -> MeshDraw {
        *self
    }
}
