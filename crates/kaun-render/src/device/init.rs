use crate::queue::SortMode;

/// Construction parameters for a [`Renderer`](crate::render::Renderer).
///
/// Limits are upper bounds; the renderer clamps them to what the device
/// reports.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Number of texture units the allocator manages.
    pub texture_units: usize,

    /// Maximum color attachments per render target.
    pub max_color_attachments: usize,

    /// Poll and log one pending device error after every non-empty flush.
    ///
    /// Polling stalls some drivers, so this defaults to debug builds only.
    pub check_errors: bool,

    /// Sort mode of the implicit flush performed when switching render targets.
    pub default_sort: SortMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_units: 16,
            max_color_attachments: 8,
            check_errors: cfg!(debug_assertions),
            default_sort: SortMode::Default,
        }
    }
}
