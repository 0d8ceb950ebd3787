use glam::{Mat3, Mat4, Vec4};

use crate::uniform::Uniform;

use super::{Transform, Viewport};

/// Names of the built-in uniforms, in the order they are captured.
pub const BUILTIN_UNIFORM_NAMES: [&str; 11] = [
    "kaun_viewport",
    "kaun_view",
    "kaun_invView",
    "kaun_projection",
    "kaun_invProjection",
    "kaun_viewProjection",
    "kaun_invViewProjection",
    "kaun_model",
    "kaun_normal",
    "kaun_modelView",
    "kaun_modelViewProjection",
];

/// Current projection, view and model matrices plus the products derived
/// from them. Inverses are kept up to date on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Transforms {
    projection: Mat4,
    inv_projection: Mat4,
    view: Mat4,
    inv_view: Mat4,
    view_projection: Mat4,
    inv_view_projection: Mat4,
    model: Mat4,
    normal: Mat3,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            inv_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inv_view: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            inv_view_projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            normal: Mat3::IDENTITY,
        }
    }
}

impl Transforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.inv_projection = projection.inverse();
        self.update_view_projection();
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
        self.inv_view = view.inverse();
        self.update_view_projection();
    }

    /// Sets the view from the camera's world transform.
    pub fn set_view_transform(&mut self, camera: &Transform) {
        self.inv_view = camera.matrix();
        self.view = self.inv_view.inverse();
        self.update_view_projection();
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.model = model;
        self.normal = Mat3::from_mat4(model.inverse().transpose());
    }

    pub fn set_model_transform(&mut self, model: &Transform) {
        self.set_model_matrix(model.matrix());
    }

    fn update_view_projection(&mut self) {
        self.view_projection = self.projection * self.view;
        self.inv_view_projection = self.inv_view * self.inv_projection;
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// Inverse-transpose of the model matrix's upper 3x3.
    #[inline]
    pub fn normal(&self) -> Mat3 {
        self.normal
    }

    #[inline]
    pub fn model_view(&self) -> Mat4 {
        self.view * self.model
    }

    #[inline]
    pub fn model_view_projection(&self) -> Mat4 {
        self.view_projection * self.model
    }

    /// Normalized device depth of the model-space origin.
    pub fn origin_depth(&self) -> f32 {
        let clip = self.model_view_projection() * Vec4::W;
        clip.z / clip.w
    }

    /// Snapshot of the built-in uniforms, named per [`BUILTIN_UNIFORM_NAMES`].
    pub fn builtin_uniforms(&self, viewport: Viewport) -> [Uniform; 11] {
        let [vp, view, inv_view, proj, inv_proj, view_proj, inv_view_proj, model, normal, mv, mvp] =
            BUILTIN_UNIFORM_NAMES;
        [
            Uniform::new(vp, viewport.as_ivec4()),
            Uniform::new(view, self.view),
            Uniform::new(inv_view, self.inv_view),
            Uniform::new(proj, self.projection),
            Uniform::new(inv_proj, self.inv_projection),
            Uniform::new(view_proj, self.view_projection),
            Uniform::new(inv_view_proj, self.inv_view_projection),
            Uniform::new(model, self.model),
            Uniform::new(normal, self.normal),
            Uniform::new(mv, self.model_view()),
            Uniform::new(mvp, self.model_view_projection()),
        ]
    }
}
