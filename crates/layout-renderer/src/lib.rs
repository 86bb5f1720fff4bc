//! Server-side Tera rendering with layout composition.
//!
//! A [`Renderer`] indexes every template file under `<web_dir>/templates`, merges
//! process-wide global data with per-call page data, and renders a named template
//! either standalone or wrapped in a layout. The layout receives the inner render as
//! `Content` and the merged data as `Data`.
//!
//! # Modules
//!
//! - [`config`] — TOML-backed renderer configuration
//! - [`data`] — Global/page data merging
//! - [`error`] — Render error taxonomy and its HTTP 500 mapping
//! - [`filters`] — Case-conversion filters registered on every index
//! - [`middleware`] — axum middleware that renders the layout after downstream handlers
//! - [`renderer`] — Standalone and layout rendering, global data, current layout
//! - [`template_index`] — Recursive `.tera` directory indexing
//!
//! # Example
//!
//! ```rust,no_run
//! use layout_renderer::{DataMap, Renderer};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = Renderer::new("web", DataMap::new())?;
//! renderer.add_global_data("Name", "World");
//! renderer.set_layout("base.tera")?;
//!
//! let html = renderer.render("home.tera", Some(&json!({ "Title": "Home" })), true)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod renderer;
pub mod template_index;

pub use config::{ConfigError, RendererConfig};
pub use data::{merge, DataMap};
pub use error::{Error, RenderError};
pub use middleware::{apply_layout, ApplyLayout, RenderContext};
pub use renderer::Renderer;
pub use template_index::{IndexError, TemplateIndex};
