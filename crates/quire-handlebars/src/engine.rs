//! Page engine abstraction.
//!
//! This module defines the [`PageEngine`] trait, the seam between a site
//! builder and a template language. The builder asks each engine which
//! source trees it cares about, forwards change events for those trees, and
//! calls [`render`](PageEngine::render) once per page. [`HandlebarsEngine`]
//! is the implementation this crate provides.
//!
//! [`HandlebarsEngine`]: crate::HandlebarsEngine

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::EngineError;
use crate::watch::{WatchBinding, WatchEvent};

/// A template engine the site builder can drive.
pub trait PageEngine {
    /// Identifier of the templating capability this engine needs, so the host
    /// can verify it is available before use.
    fn requires(&self) -> &'static str;

    /// The source trees this engine wants change events for.
    fn watchers(&self) -> Vec<WatchBinding>;

    /// Applies one change event to the engine's registries.
    ///
    /// Recoverable problems (a helper that fails to load) are logged and
    /// swallowed; anything else is returned.
    fn handle(&mut self, event: WatchEvent) -> Result<(), EngineError>;

    /// Renders a page body inside its layout.
    ///
    /// Never fails: errors are converted to page text.
    fn render(&self, page_body: &str, page_data: &Value, file: &SourceFile) -> String;
}

/// The page source being rendered, used to attribute errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl From<PathBuf> for SourceFile {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

impl From<&Path> for SourceFile {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SourceFile {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
