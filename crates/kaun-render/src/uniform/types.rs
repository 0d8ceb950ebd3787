/// Shader-side type of a uniform.
///
/// `Texture` uniforms are samplers: the value written is the texture unit
/// chosen at flush time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
    Mat2,
    Mat3,
    Mat4,
    Mat2x3,
    Mat3x2,
    Mat2x4,
    Mat4x2,
    Mat3x4,
    Mat4x3,
    Texture,
}

/// Scalar component type backing a uniform's payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) enum Scalar {
    F32,
    I32,
    U32,
}

impl UniformType {
    /// Number of scalar components in one element.
    pub const fn components(self) -> usize {
        use UniformType::*;
        match self {
            Float | Int | UInt | Texture => 1,
            Vec2 | IVec2 | UVec2 => 2,
            Vec3 | IVec3 | UVec3 => 3,
            Vec4 | IVec4 | UVec4 | Mat2 => 4,
            Mat2x3 | Mat3x2 => 6,
            Mat2x4 | Mat4x2 => 8,
            Mat3 => 9,
            Mat3x4 | Mat4x3 => 12,
            Mat4 => 16,
        }
    }

    /// Size of one element in bytes. Samplers count as a single int.
    pub const fn size_bytes(self) -> usize {
        self.components() * 4
    }

    pub const fn is_matrix(self) -> bool {
        use UniformType::*;
        matches!(self, Mat2 | Mat3 | Mat4 | Mat2x3 | Mat3x2 | Mat2x4 | Mat4x2 | Mat3x4 | Mat4x3)
    }

    pub(crate) const fn scalar(self) -> Scalar {
        use UniformType::*;
        match self {
            Int | IVec2 | IVec3 | IVec4 | Texture => Scalar::I32,
            UInt | UVec2 | UVec3 | UVec4 => Scalar::U32,
            _ => Scalar::F32,
        }
    }
}
