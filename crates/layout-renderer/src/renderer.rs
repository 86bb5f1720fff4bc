//! Standalone and layout rendering over an indexed template set.
//!
//! A layout render is two-phase: the content template is rendered to a string with
//! the merged data, then the layout is rendered with
//! `{ Content: <string>, Data: <merged data> }`. Standalone renders get the merged
//! data directly as their top-level context.
//!
//! Global data and the current layout sit behind locks, so concurrent requests see
//! consistent snapshots. [`Renderer::render_with_layout`] takes its layout as an
//! argument and never touches the shared current layout.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;
use tera::Context;

use crate::config::{RendererConfig, DEFAULT_TEMPLATES_DIR};
use crate::data::{merge, DataMap};
use crate::error::{error_chain, Error, RenderError};
use crate::template_index::{IndexError, TemplateIndex};

/// Renders indexed templates, optionally wrapped in a layout.
#[derive(Debug)]
pub struct Renderer {
    templates: TemplateIndex,
    web_dir: PathBuf,
    global_data: RwLock<DataMap>,
    layout: RwLock<Option<String>>,
}

impl Renderer {
    /// Index `<web_dir>/templates` and start with `global_data`.
    ///
    /// Fails if any template cannot be walked, read or parsed.
    pub fn new(web_dir: impl AsRef<Path>, global_data: DataMap) -> Result<Self, IndexError> {
        let web_dir = web_dir.as_ref();
        let templates = TemplateIndex::load(&web_dir.join(DEFAULT_TEMPLATES_DIR))?;
        Ok(Self::with_index(templates, web_dir.to_path_buf(), global_data))
    }

    /// Build a renderer from configuration, selecting the configured layout if any.
    pub fn from_config(config: &RendererConfig) -> Result<Self, Error> {
        let templates =
            TemplateIndex::load_with_extension(&config.template_root(), &config.extension)?;
        let renderer = Self::with_index(
            templates,
            config.web_dir.clone(),
            config.global_data.clone(),
        );
        if let Some(layout) = &config.layout {
            renderer.set_layout(layout)?;
        }
        Ok(renderer)
    }

    fn with_index(templates: TemplateIndex, web_dir: PathBuf, global_data: DataMap) -> Self {
        tracing::info!(
            web_dir = %web_dir.display(),
            templates = templates.len(),
            "Template renderer ready"
        );
        Self {
            templates,
            web_dir,
            global_data: RwLock::new(global_data),
            layout: RwLock::new(None),
        }
    }

    pub fn web_dir(&self) -> &Path {
        &self.web_dir
    }

    pub fn templates(&self) -> &TemplateIndex {
        &self.templates
    }

    /// Insert or overwrite a global data entry.
    pub fn add_global_data(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.global_data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Snapshot of the current global data.
    pub fn global_data(&self) -> DataMap {
        self.global_data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Select the layout used by `render(.., use_layout = true)`.
    ///
    /// An empty name clears the layout. A name missing from the index is rejected
    /// and the current layout is left as it was.
    pub fn set_layout(&self, name: &str) -> Result<(), RenderError> {
        let next = if name.is_empty() {
            None
        } else if self.templates.contains(name) {
            Some(name.to_string())
        } else {
            return Err(RenderError::LayoutNotFound {
                name: name.to_string(),
            });
        };

        *self.layout.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    pub fn current_layout(&self) -> Option<String> {
        self.layout
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render `name` with global data overlaid by `page_data`.
    ///
    /// With `use_layout`, the output is `name` wrapped in the current layout.
    pub fn render(
        &self,
        name: &str,
        page_data: Option<&Value>,
        use_layout: bool,
    ) -> Result<String, RenderError> {
        let data = self.merged(page_data);

        if use_layout {
            let layout = self
                .current_layout()
                .ok_or(RenderError::NoLayoutConfigured)?;
            self.render_layout(&layout, name, &data)
        } else {
            self.execute(name, &data)
                .map_err(|source| RenderError::Template {
                    name: name.to_string(),
                    source,
                })
        }
    }

    /// Render `content` wrapped in `layout`, independent of the current layout.
    ///
    /// An empty `layout` behaves like a cleared layout.
    pub fn render_with_layout(
        &self,
        content: &str,
        page_data: Option<&Value>,
        layout: &str,
    ) -> Result<String, RenderError> {
        if layout.is_empty() {
            return Err(RenderError::NoLayoutConfigured);
        }
        if !self.templates.contains(layout) {
            return Err(RenderError::LayoutNotFound {
                name: layout.to_string(),
            });
        }

        let data = self.merged(page_data);
        self.render_layout(layout, content, &data)
    }

    /// [`render`](Self::render) as an HTTP response.
    pub fn render_response(
        &self,
        name: &str,
        page_data: Option<&Value>,
        use_layout: bool,
    ) -> Response {
        respond(self.render(name, page_data, use_layout))
    }

    /// [`render_with_layout`](Self::render_with_layout) as an HTTP response.
    pub fn render_with_layout_response(
        &self,
        content: &str,
        page_data: Option<&Value>,
        layout: &str,
    ) -> Response {
        respond(self.render_with_layout(content, page_data, layout))
    }

    fn merged(&self, page_data: Option<&Value>) -> DataMap {
        let global = self
            .global_data
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        merge(&global, page_data)
    }

    fn render_layout(
        &self,
        layout: &str,
        content: &str,
        data: &DataMap,
    ) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("Content", &self.render_content(content, data));
        context.insert("Data", data);

        self.templates
            .tera()
            .render(layout, &context)
            .map_err(|source| RenderError::Layout {
                layout: layout.to_string(),
                source,
            })
    }

    /// Inner render for a layout. Failures yield empty content rather than failing
    /// the page.
    fn render_content(&self, name: &str, data: &DataMap) -> String {
        match self.execute(name, data) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    template = name,
                    error = %error_chain(&e),
                    "Content render failed, layout receives empty content"
                );
                String::new()
            }
        }
    }

    fn execute(&self, name: &str, data: &DataMap) -> Result<String, tera::Error> {
        let context = Context::from_serialize(data)?;
        self.templates.tera().render(name, &context)
    }
}

fn respond(result: Result<String, RenderError>) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            e.log();
            e.into_response()
        }
    }
}
