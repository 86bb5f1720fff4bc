//! Index every template file under a root directory into one Tera set.
//!
//! Templates are named by their path relative to the root, joined with `/` on every
//! platform (`pages/home.tera`). Directories and files with other extensions are
//! skipped; symlinks to matching files are followed. Any walk, read or parse failure
//! aborts the whole index; a partially loaded set is never returned.
//!
//! Auto-escaping is off for every template: a layout inserts `Content` verbatim.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tera::Tera;
use walkdir::WalkDir;

use crate::filters;

/// File extension recognized as a template when none is configured.
pub const DEFAULT_EXTENSION: &str = "tera";

/// The parsed, read-only template set for the lifetime of a renderer.
#[derive(Debug)]
pub struct TemplateIndex {
    tera: Tera,
    root: PathBuf,
}

impl TemplateIndex {
    /// Index all `.tera` files below `root`.
    pub fn load(root: &Path) -> Result<Self, IndexError> {
        Self::load_with_extension(root, DEFAULT_EXTENSION)
    }

    /// Index all files below `root` whose extension is `extension` (with or
    /// without a leading dot).
    pub fn load_with_extension(root: &Path, extension: &str) -> Result<Self, IndexError> {
        let extension = extension.trim_start_matches('.');
        let sources = collect_sources(root, extension)?;

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        filters::register(&mut tera);

        // Added in one batch so `extends`/`import` resolve regardless of walk order.
        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, body)| (name.as_str(), body.as_str())),
        )
        .map_err(|source| IndexError::Parse {
            path: failing_path(root, &sources, &source),
            source,
        })?;

        tracing::debug!(
            root = %root.display(),
            templates = sources.len(),
            "Indexed templates"
        );

        Ok(Self {
            tera,
            root: root.to_path_buf(),
        })
    }

    /// Directory the template names are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// All template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tera.get_template_names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn tera(&self) -> &Tera {
        &self.tera
    }
}

/// Walk `root` and read every matching file as `(name, body)`.
fn collect_sources(root: &Path, extension: &str) -> Result<Vec<(String, String)>, IndexError> {
    let mut sources = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| IndexError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
        if !is_file || path.extension() != Some(OsStr::new(extension)) {
            continue;
        }

        let body = std::fs::read_to_string(path).map_err(|source| IndexError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = template_name(root, path);
        tracing::debug!(template = %name, "Found template");
        sources.push((name, body));
    }

    Ok(sources)
}

/// Slash-joined path of `path` relative to `root`.
fn template_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Tera names the offending template in its top-level message; map it back to a file.
fn failing_path(root: &Path, sources: &[(String, String)], error: &tera::Error) -> PathBuf {
    let message = error.to_string();
    sources
        .iter()
        .find(|(name, _)| message.contains(&format!("'{name}'")))
        .map(|(name, _)| root.join(name))
        .unwrap_or_else(|| root.to_path_buf())
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to walk template directory {root}: {source}")]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse template {path}: {source}")]
    Parse { path: PathBuf, source: tera::Error },
}
