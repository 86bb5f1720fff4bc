//! # Render Error Types
//!
//! Every render failure is logged with full detail and answered with a fixed
//! plain-text 500. Clients never see template names or engine messages.

use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::ConfigError;
use crate::template_index::IndexError;

/// Failures while rendering a template or layout.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout template not found: {name}")]
    LayoutNotFound { name: String },

    #[error("no layout configured")]
    NoLayoutConfigured,

    #[error("failed to render template '{name}': {source}")]
    Template { name: String, source: tera::Error },

    #[error("failed to render layout template '{layout}': {source}")]
    Layout { layout: String, source: tera::Error },

    /// Raised by the middleware when no handler set a content template.
    #[error("content not set")]
    ContentNotSet,
}

impl RenderError {
    /// The fixed body sent to the client.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            RenderError::LayoutNotFound { .. } => "Error setting layout",
            RenderError::NoLayoutConfigured | RenderError::Layout { .. } => {
                "Error rendering layout template"
            }
            RenderError::Template { .. } => "Error rendering template",
            RenderError::ContentNotSet => "content not set",
        }
    }

    /// Log the detailed cause at error level.
    pub(crate) fn log(&self) {
        tracing::error!(error = %error_chain(self), "{}", self.public_message());
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}

/// Crate-level error for fallible construction paths.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to index templates: {0}")]
    Index(#[from] IndexError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Join an error and all of its sources with `: `.
///
/// Tera keeps the useful part (the missing variable, the bad filter) in the source
/// chain rather than the top-level message.
pub(crate) fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages_are_fixed() {
        assert_eq!(
            RenderError::LayoutNotFound {
                name: "missing.tera".into()
            }
            .public_message(),
            "Error setting layout"
        );
        assert_eq!(
            RenderError::NoLayoutConfigured.public_message(),
            "Error rendering layout template"
        );
        assert_eq!(
            RenderError::Template {
                name: "home.tera".into(),
                source: tera::Error::msg("boom"),
            }
            .public_message(),
            "Error rendering template"
        );
        assert_eq!(RenderError::ContentNotSet.public_message(), "content not set");
    }

    #[test]
    fn test_into_response_is_500() {
        let response = RenderError::NoLayoutConfigured.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = RenderError::Layout {
            layout: "secret/base.tera".into(),
            source: tera::Error::msg("Variable `Token` not found"),
        };
        assert!(!err.public_message().contains("secret"));
        assert!(err.to_string().contains("secret/base.tera"));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = tera::Error::msg("Variable `Name` not found in context");
        let outer = tera::Error::chain("Failed to render 'home.tera'", inner);
        let err = RenderError::Template {
            name: "home.tera".into(),
            source: outer,
        };

        let chain = error_chain(&err);
        assert!(chain.contains("home.tera"));
        assert!(chain.contains("Variable `Name` not found"));
    }
}
