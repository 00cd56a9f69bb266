use thiserror::Error;

/// Failure reported by a [`crate::Host`] while touching the platform.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure reported by a [`crate::Renderer`] while drawing a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("failed to initialize renderer: {0}")]
    Init(String),

    #[error("surface texture unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("renderer already disposed")]
    Disposed,
}

#[derive(Error, Debug)]
pub enum ViewportError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Viewport is already mounted")]
    AlreadyMounted,

    #[error("Viewport resources were disposed; create a new viewport to mount again")]
    Disposed,

    #[error("Failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Invalid TOML config: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("Invalid JSON config: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
