use std::borrow::Cow;

use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::device::TextureHandle;
use crate::texture::Texture;

use super::types::Scalar;
use super::UniformType;

/// Borrowed uniform payload handed to the device.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformPayload<'a> {
    F32(&'a [f32]),
    I32(&'a [i32]),
    U32(&'a [u32]),
}

impl UniformPayload<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Data {
    F32(Vec<f32>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    Texture(TextureHandle),
}

/// Values that map directly onto a uniform type.
pub trait UniformValue: Copy {
    const TYPE: UniformType;

    #[doc(hidden)]
    fn pack(values: &[Self]) -> Uniform;
}

macro_rules! uniform_value {
    ($($ty:ty => $variant:ident, $data:ident, $scalar:ty;)*) => {$(
        impl UniformValue for $ty {
            const TYPE: UniformType = UniformType::$variant;

            fn pack(values: &[Self]) -> Uniform {
                Uniform {
                    name: Cow::Borrowed(""),
                    ty: Self::TYPE,
                    count: values.len(),
                    data: Data::$data(bytemuck::cast_slice::<$ty, $scalar>(values).to_vec()),
                }
            }
        }
    )*};
}

uniform_value! {
    f32 => Float, F32, f32;
    Vec2 => Vec2, F32, f32;
    Vec3 => Vec3, F32, f32;
    Vec4 => Vec4, F32, f32;
    i32 => Int, I32, i32;
    IVec2 => IVec2, I32, i32;
    IVec3 => IVec3, I32, i32;
    IVec4 => IVec4, I32, i32;
    u32 => UInt, U32, u32;
    UVec2 => UVec2, U32, u32;
    UVec3 => UVec3, U32, u32;
    UVec4 => UVec4, U32, u32;
    Mat2 => Mat2, F32, f32;
    Mat3 => Mat3, F32, f32;
    Mat4 => Mat4, F32, f32;
}

/// A named uniform value.
///
/// The type tag fully determines how the payload is read. Texture uniforms
/// carry only a texture handle; the unit they are sampled from is decided
/// when the owning submission is flushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    name: Cow<'static, str>,
    ty: UniformType,
    count: usize,
    data: Data,
}

impl Uniform {
    /// Single-element uniform.
    pub fn new<T: UniformValue>(name: impl Into<Cow<'static, str>>, value: T) -> Self {
        Self::array(name, &[value])
    }

    /// Array uniform; one element per value.
    pub fn array<T: UniformValue>(name: impl Into<Cow<'static, str>>, values: &[T]) -> Self {
        let mut uniform = T::pack(values);
        uniform.name = name.into();
        uniform
    }

    /// Sampler uniform bound to `texture`.
    pub fn texture(name: impl Into<Cow<'static, str>>, texture: &dyn Texture) -> Self {
        Self {
            name: name.into(),
            ty: UniformType::Texture,
            count: 0,
            data: Data::Texture(texture.handle()),
        }
    }

    /// Float-backed uniform from raw column-major components, for types
    /// without a matching math type (`Mat2x3`, `Mat4x3`, ...).
    ///
    /// Returns `None` if `ty` is not float-backed or `values` does not hold a
    /// whole number of elements.
    pub fn from_f32(
        name: impl Into<Cow<'static, str>>,
        ty: UniformType,
        values: &[f32],
    ) -> Option<Self> {
        let components = ty.components();
        if ty.scalar() != Scalar::F32 || values.len() % components != 0 {
            return None;
        }
        Some(Self {
            name: name.into(),
            ty,
            count: values.len() / components,
            data: Data::F32(values.to_vec()),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> UniformType {
        self.ty
    }

    /// Number of array elements. Zero for texture uniforms.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Texture handle of a sampler uniform.
    pub fn texture_handle(&self) -> Option<TextureHandle> {
        match self.data {
            Data::Texture(handle) => Some(handle),
            _ => None,
        }
    }

    /// Payload of a value uniform. `None` for texture uniforms.
    pub fn payload(&self) -> Option<UniformPayload<'_>> {
        self.payload_limited(self.count)
    }

    /// Payload truncated to at most `max_count` elements.
    pub fn payload_limited(&self, max_count: usize) -> Option<UniformPayload<'_>> {
        let len = self.count.min(max_count) * self.ty.components();
        match &self.data {
            Data::F32(v) => Some(UniformPayload::F32(&v[..len])),
            Data::I32(v) => Some(UniformPayload::I32(&v[..len])),
            Data::U32(v) => Some(UniformPayload::U32(&v[..len])),
            Data::Texture(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::TextureTarget;

    #[test]
    fn scalar_uniform() {
        let u = Uniform::new("alpha", 0.5f32);
        assert_eq!(u.name(), "alpha");
        assert_eq!(u.ty(), UniformType::Float);
        assert_eq!(u.count(), 1);
        assert_eq!(u.payload(), Some(UniformPayload::F32(&[0.5])));
    }

    #[test]
    fn matrix_payload_is_column_major() {
        let m = Mat2::from_cols(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let u = Uniform::new("m", m);
        assert_eq!(u.payload(), Some(UniformPayload::F32(&[1.0, 2.0, 3.0, 4.0])));
    }

    #[test]
    fn array_uniform_counts_elements() {
        let u = Uniform::array("offsets", &[IVec2::new(1, 2), IVec2::new(3, 4), IVec2::ZERO]);
        assert_eq!(u.ty(), UniformType::IVec2);
        assert_eq!(u.count(), 3);
        assert_eq!(u.payload().map(|p| p.len()), Some(6));
        assert_eq!(u.payload_limited(1), Some(UniformPayload::I32(&[1, 2])));
    }

    #[test]
    fn texture_uniform_has_no_payload() {
        let handle = TextureHandle::new(TextureTarget::Texture2D, 7);
        let u = Uniform::texture("albedo", &handle);
        assert_eq!(u.ty(), UniformType::Texture);
        assert_eq!(u.count(), 0);
        assert_eq!(u.payload(), None);
        assert_eq!(u.texture_handle(), Some(handle));
    }

    #[test]
    fn from_f32_validates_shape() {
        let u = Uniform::from_f32("bones", UniformType::Mat4x3, &[0.0; 24]);
        assert_eq!(u.map(|u| u.count()), Some(2));
        assert!(Uniform::from_f32("bad", UniformType::Mat4x3, &[0.0; 13]).is_none());
        assert!(Uniform::from_f32("bad", UniformType::IVec2, &[0.0; 2]).is_none());
    }

    #[test]
    fn owned_names_are_accepted() {
        let name = format!("light[{}]", 3);
        let u = Uniform::new(name, Vec3::ONE);
        assert_eq!(u.name(), "light[3]");
    }
}
