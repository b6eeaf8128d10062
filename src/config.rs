//! Configuration for the fetch and rendering pipeline.
//!
//! Built in code or from CLI flags only; nothing here is read from files or
//! the environment.

use url::Url;

use crate::error::FetchError;

/// Where the extension server is mounted when nothing else is given.
pub const DEFAULT_API_BASE: &str = "http://localhost:8888/pachyderm/";

/// How the pan/zoom transform starts out on first render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPolicy {
    /// Scale and center the drawing to fit the panel.
    #[default]
    AutoFit,
    /// Identity transform, drawing at layout coordinates.
    Identity,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Panel width in pixels; also the layout target width.
    pub width: f64,
    /// Panel height in pixels; also the layout target height.
    pub height: f64,
    /// Radius of every node circle.
    pub node_radius: f64,
    pub view_policy: ViewPolicy,
    /// Embed the pan/zoom script in the SVG output.
    pub interactive: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1300.0,
            height: 700.0,
            node_radius: 20.0,
            view_policy: ViewPolicy::AutoFit,
            interactive: true,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Location of the extension server API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base: Url,
}

impl ApiConfig {
    /// Parse a base URL. A missing trailing slash is added so that relative
    /// endpoint paths resolve beneath it.
    pub fn parse(base: &str) -> Result<Self, FetchError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { base })
    }

    /// Absolute URL of an endpoint relative to the API base.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|e| FetchError::InvalidUrl {
            url: format!("{}{path}", self.base),
            reason: e.to_string(),
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
        }
    }
}
