//! Error types for rando-render.

use thiserror::Error;

/// Failures raised by a rendering collaborator.
///
/// A non-success HTTP status is *not* an error: it comes back as a
/// [`RenderResponse`](crate::RenderResponse) so the caller can report it.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The live application could not be reached.
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// A streamed body broke off while it was being materialized.
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),

    /// The collaborator raised while rendering.
    #[error("render failed: {0}")]
    Failed(String),
}
