/// Depth comparison function.
///
/// `Disabled` turns the depth test off entirely. With the test off the device
/// also stops writing depth, so use `Always` to write without testing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthFunc {
    Disabled,
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Which faces are culled. `None` disables culling.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CullFaces {
    None,
    Front,
    Back,
}

/// Winding order of front-facing triangles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FrontFace {
    Cw,
    Ccw,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Depth, culling and blending configuration of a single draw.
///
/// Blend factors and the blend equation only take effect while
/// `blend_enabled` is set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderState {
    pub depth_write: bool,
    pub depth_func: DepthFunc,
    pub cull_faces: CullFaces,
    pub front_face: FrontFace,
    pub blend_enabled: bool,
    pub blend_src: BlendFactor,
    pub blend_dst: BlendFactor,
    pub blend_equation: BlendEquation,
}

impl Default for RenderState {
    /// Depth tested with `LessEqual`, back faces culled, blending off.
    fn default() -> Self {
        Self {
            depth_write: true,
            depth_func: DepthFunc::LessEqual,
            cull_faces: CullFaces::Back,
            front_face: FrontFace::Ccw,
            blend_enabled: false,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            blend_equation: BlendEquation::Add,
        }
    }
}

impl RenderState {
    /// The state a freshly created context starts out with.
    pub const fn device_defaults() -> Self {
        Self {
            depth_write: true,
            depth_func: DepthFunc::Disabled,
            cull_faces: CullFaces::None,
            front_face: FrontFace::Ccw,
            blend_enabled: false,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            blend_equation: BlendEquation::Add,
        }
    }

    /// Enables blending with the given factors.
    pub fn with_blend(mut self, src: BlendFactor, dst: BlendFactor) -> Self {
        self.blend_enabled = true;
        self.blend_src = src;
        self.blend_dst = dst;
        self
    }

    /// Enables straight alpha blending (`SrcAlpha`, `OneMinusSrcAlpha`).
    pub fn alpha_blended(self) -> Self {
        self.with_blend(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
    }

    pub fn with_blend_equation(mut self, equation: BlendEquation) -> Self {
        self.blend_equation = equation;
        self
    }

    pub fn with_depth(mut self, func: DepthFunc, write: bool) -> Self {
        self.depth_func = func;
        self.depth_write = write;
        self
    }

    pub fn with_culling(mut self, faces: CullFaces, front_face: FrontFace) -> Self {
        self.cull_faces = faces;
        self.front_face = front_face;
        self
    }
}
