//! HTTP adapter: renders endpoints by querying the live web application.

use std::time::Duration;

use crate::error::RenderError;
use crate::request::{Body, RenderRequest, RenderResponse, Renderable};

/// Renders endpoints with anonymous `GET` requests against `base_url`.
pub struct HttpRenderer {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpRenderer {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .redirects(0)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, request: &RenderRequest) -> String {
        format!("{}/{}", self.base_url, request.route())
    }
}

impl Renderable for HttpRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderResponse, RenderError> {
        let url = self.url_for(request);
        let mut call = self
            .agent
            .get(&url)
            .set("Accept", request.endpoint.kind().mime())
            .set("Accept-Language", request.language.as_str())
            .set("Referer", &self.base_url);
        for (key, value) in &request.query {
            call = call.query(key, value);
        }

        tracing::debug!(%url, "render");
        match call.call() {
            Ok(response) => Ok(RenderResponse {
                status: response.status(),
                body: Body::Stream(Box::new(response.into_reader())),
            }),
            Err(ureq::Error::Status(status, _)) => Ok(RenderResponse::status(status)),
            Err(ureq::Error::Transport(transport)) => Err(RenderError::Transport {
                url,
                reason: transport.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rando_core::{Language, TrekId};

    use crate::endpoint::{Endpoint, TrekRef};

    #[test]
    fn url_joins_base_and_route() {
        let renderer = HttpRenderer::new("http://rando.example.org/", Duration::from_secs(1));
        let request = RenderRequest::new(
            Endpoint::TrekGpx(TrekRef {
                id: TrekId(3),
                slug: "tour".to_string(),
            }),
            Language::from("en"),
            "rando.example.org",
        );
        assert_eq!(
            renderer.url_for(&request),
            "http://rando.example.org/api/en/treks/3/tour.gpx"
        );
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let renderer = HttpRenderer::new("http://127.0.0.1:9", Duration::from_secs(2));
        let request = RenderRequest::new(Endpoint::Themes, Language::from("en"), "127.0.0.1:9");
        let err = renderer.render(&request).expect_err("nothing listens on port 9");
        assert!(matches!(err, RenderError::Transport { .. }));
    }
}
