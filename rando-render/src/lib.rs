//! # rando-render
//!
//! The rendering collaborator contract: "render endpoint E for object O in
//! language L" as one synchronous call returning a status and a payload.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use rando_core::Language;
//! use rando_render::{Endpoint, HttpRenderer, Renderable, RenderRequest};
//!
//! let renderer = HttpRenderer::new("http://localhost:8000", Duration::from_secs(30));
//! let request = RenderRequest::new(Endpoint::TrekList, Language::from("en"), "localhost:8000");
//! if let Ok(response) = renderer.render(&request) {
//!     println!("HTTP {}", response.status);
//! }
//! ```

pub mod endpoint;
pub mod error;
pub mod http;
pub mod request;

pub use endpoint::{Endpoint, ExportKind, TrekRef};
pub use error::RenderError;
pub use http::HttpRenderer;
pub use request::{Body, RenderRequest, RenderResponse, Renderable};
