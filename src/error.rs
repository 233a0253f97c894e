use thiserror::Error;

/// Errors surfaced by the paint engine and its loading/export collaborators
#[derive(Error, Debug)]
pub enum PaintError {
    /// No tool variant is registered under the requested name
    #[error("unknown tool: {0:?}")]
    UnknownTool(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote image failed, including non-success status codes
    #[cfg(not(target_arch = "wasm32"))]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Attempted to export a surface with no pixels
    #[error("surface is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Result type for paint operations
pub type PaintResult<T> = Result<T, PaintError>;
