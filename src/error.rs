use thiserror::Error;

/// Result alias for fallible dashcanvas operations.
pub type Result<T> = std::result::Result<T, DashError>;

/// Errors surfaced by configuration, parsing and script loading.
///
/// Interactive operations (select, drag, resize, format edits) never fail;
/// they clamp or no-op instead.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("unknown visual kind `{0}`")]
    UnknownKind(String),
    #[error("unknown resize handle `{0}`")]
    UnknownHandle(String),
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),
    #[error("script error: {0}")]
    Script(#[from] serde_json::Error),
}

/// Failure reported by an external renderable.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("release failed: {0}")]
    Release(String),
    #[error("renderable already released")]
    Released,
}
