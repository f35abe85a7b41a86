//! Fatal GPU error types.
//!
//! Every failure here is a static configuration or programming defect, so
//! callers abort with a descriptive message instead of retrying.

use thiserror::Error;

/// Errors raised while setting up the GPU renderer.
#[derive(Debug, Error)]
pub(crate) enum RenderError {
    /// The WGSL shader module failed validation. `log` carries the
    /// backend's diagnostic text.
    #[error("shader failed to compile: {log}")]
    ShaderCompile { log: String },

    /// A pipeline or bind group referenced a binding the shader does not
    /// expose, or the layouts disagree.
    #[error("pipeline binding mismatch: {log}")]
    Binding { log: String },
}
