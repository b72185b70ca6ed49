//! Request/response shapes exchanged with a rendering collaborator.

use std::fmt;
use std::io::Read;

use rando_core::Language;

use crate::endpoint::Endpoint;
use crate::error::RenderError;

/// A synthetic, anonymous request for one endpoint in one language.
///
/// The language is always explicit: collaborators must not rely on any
/// process-wide locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub endpoint: Endpoint,
    pub language: Language,
    pub query: Vec<(String, String)>,
    /// Host the rendered documents should refer to in absolute links.
    pub host: String,
}

impl RenderRequest {
    pub fn new(endpoint: Endpoint, language: Language, host: impl Into<String>) -> Self {
        Self {
            endpoint,
            language,
            query: Vec::new(),
            host: host.into(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn route(&self) -> String {
        self.endpoint.route(&self.language)
    }
}

/// Response payload, either already in memory or still streaming.
pub enum Body {
    Bytes(Vec<u8>),
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[derive(Debug)]
pub struct RenderResponse {
    pub status: u16,
    pub body: Body,
}

impl RenderResponse {
    pub fn ok(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: Body::Bytes(bytes.into()),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Body::Bytes(Vec::new()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Materialize the body in full, draining a stream if needed.
    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        match self.body {
            Body::Bytes(bytes) => Ok(bytes),
            Body::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

/// Anything that can render an endpoint: the live application over HTTP,
/// or an in-process fake in tests.
pub trait Renderable {
    fn render(&self, request: &RenderRequest) -> Result<RenderResponse, RenderError>;
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn render(&self, request: &RenderRequest) -> Result<RenderResponse, RenderError> {
        (**self).render(request)
    }
}
