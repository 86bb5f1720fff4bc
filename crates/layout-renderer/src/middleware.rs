//! axum middleware that renders a layout after the rest of the pipeline has run.
//!
//! The middleware puts a fresh [`RenderContext`] into the request extensions, runs the
//! downstream handlers, then reads the `content` template name and optional `data`
//! they stored and renders `content` inside the configured layout.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::{middleware, routing::get, Router};
//! use layout_renderer::{apply_layout, ApplyLayout, DataMap, RenderContext, Renderer};
//! use serde_json::json;
//!
//! async fn home(ctx: RenderContext) {
//!     ctx.set_content("pages/home.tera");
//!     ctx.set_data(json!({ "Title": "Home" }));
//! }
//!
//! # fn build() -> Result<Router, Box<dyn std::error::Error>> {
//! let renderer = Arc::new(Renderer::new("web", DataMap::new())?);
//! let app = Router::new()
//!     .route("/", get(home))
//!     .layer(middleware::from_fn_with_state(
//!         ApplyLayout::new(renderer, "layouts/base.tera"),
//!         apply_layout,
//!     ));
//! # Ok(app)
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Context key holding the content template name.
pub const CONTENT_KEY: &str = "content";
/// Context key holding the page data.
pub const DATA_KEY: &str = "data";

/// Per-request key/value store shared between handlers and [`apply_layout`].
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Name the template rendered inside the layout.
    pub fn set_content(&self, template: impl Into<String>) {
        self.insert(CONTENT_KEY, template.into());
    }

    /// Page data merged over the renderer's global data.
    pub fn set_data(&self, data: impl Into<Value>) {
        self.insert(DATA_KEY, data);
    }

    /// The content template name, if one was set as a string.
    pub fn content(&self) -> Option<String> {
        match self.get(CONTENT_KEY)? {
            Value::String(name) => Some(name),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<Value> {
        self.get(DATA_KEY)
    }
}

impl<S> FromRequestParts<S> for RenderContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RenderContext>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "render context missing; is the layout middleware installed?",
        ))
    }
}

/// State for [`apply_layout`]: the shared renderer and the layout fixed at construction.
#[derive(Debug, Clone)]
pub struct ApplyLayout {
    renderer: Arc<Renderer>,
    layout: Arc<str>,
}

impl ApplyLayout {
    pub fn new(renderer: Arc<Renderer>, layout: impl Into<Arc<str>>) -> Self {
        Self {
            renderer,
            layout: layout.into(),
        }
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }
}

/// Run the downstream pipeline, then render its content template inside the layout.
///
/// Writes exactly one response: the rendered page, or a fixed 500. A successful
/// render keeps the downstream status code and replaces its body.
pub async fn apply_layout(
    State(state): State<ApplyLayout>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = RenderContext::new();
    request.extensions_mut().insert(context.clone());

    let downstream = next.run(request).await;

    let Some(content) = context.content() else {
        let err = RenderError::ContentNotSet;
        err.log();
        return err.into_response();
    };
    let data = context.data();

    let mut response =
        state
            .renderer
            .render_with_layout_response(&content, data.as_ref(), &state.layout);
    if response.status().is_success() {
        *response.status_mut() = downstream.status();
    }
    response
}
