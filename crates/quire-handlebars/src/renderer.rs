//! The Handlebars page engine.
//!
//! [`HandlebarsEngine`] owns three registries and keeps them in step with the
//! source tree through [`WatchEvent`]s:
//!
//! | Tree | Registry | Name |
//! |------|----------|------|
//! | `{input}/layouts` | engine-owned layout map | relative path, no extension |
//! | `{input}/partials` | compiler partials | relative path, no extension |
//! | `{input}/helpers` | compiler helpers (Rhai) | file stem |
//!
//! # Rendering
//!
//! A page names its layout in `page_data.layout`. The layout's first
//! `{{> body}}` marker is replaced with the page body, and the composite is
//! compiled and executed against the page data:
//!
//! ```rust
//! use quire_handlebars::{EngineOptions, HandlebarsEngine, PageEngine, SourceFile, WatchEvent, WatchKind};
//! use serde_json::json;
//!
//! let mut engine = HandlebarsEngine::new(EngineOptions::new("src").cwd("/site")).unwrap();
//! engine.handle(WatchEvent::update(
//!     WatchKind::Layouts,
//!     "default",
//!     "/site/src/layouts/default.html",
//!     Some("<title>{{title}}</title>{{> body}}".to_string()),
//! )).unwrap();
//!
//! let html = engine.render(
//!     "<p>{{title}}</p>",
//!     &json!({"layout": "default", "title": "Home"}),
//!     &SourceFile::new("src/pages/index.html"),
//! );
//! assert_eq!(html, "<title>Home</title><p>Home</p>");
//! ```
//!
//! Only the first marker is replaced; any later `{{> body}}` is left for the
//! compiler, where it resolves like any other partial named `body`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde_json::Value;
use tracing::{debug, warn};

use crate::compiler::Compiler;
use crate::config::EngineOptions;
use crate::engine::{PageEngine, SourceFile};
use crate::error::EngineError;
use crate::file_loader::{self, walk_dir};
use crate::report::{ErrorFormatter, HtmlErrorPage};
use crate::watch::{WatchBinding, WatchEvent, WatchKind};

/// Identifier of the templating capability this engine is built on.
pub const REQUIRES: &str = "handlebars";

/// Layout used when a page does not name one.
pub const DEFAULT_LAYOUT: &str = "default";

static BODY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{> ?body ?\}\}").expect("body marker pattern is valid"));

/// Handlebars implementation of [`PageEngine`].
pub struct HandlebarsEngine {
    options: EngineOptions,
    cwd: PathBuf,
    compiler: Compiler,
    layouts: HashMap<String, String>,
    formatter: Box<dyn ErrorFormatter>,
}

impl HandlebarsEngine {
    /// Creates an engine with empty registries.
    ///
    /// Registers the standard helper bundle when `options.builtins` is set.
    /// Nothing is read from disk; call [`load`](Self::load) or deliver watch
    /// events to populate the registries.
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        let cwd = options.resolve_cwd()?;
        let compiler = Compiler::new(options.builtins);
        Ok(Self {
            options,
            cwd,
            compiler,
            layouts: HashMap::new(),
            formatter: Box::new(HtmlErrorPage),
        })
    }

    /// Replaces the formatter used for failed renders.
    pub fn with_formatter(mut self, formatter: impl ErrorFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Absolute root of the tree watched for `kind`.
    pub fn root(&self, kind: WatchKind) -> PathBuf {
        self.cwd
            .join(&self.options.input)
            .join(self.options.folders.dir(kind))
    }

    pub fn has_layout(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Registered layout names, sorted.
    pub fn layout_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn has_partial(&self, name: &str) -> bool {
        self.compiler.has_partial(name)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.compiler.has_helper(name)
    }

    /// Populates the registries by walking the three source trees.
    ///
    /// Each matching file is applied as an update event, layouts first, then
    /// partials, then helpers. Trees that do not exist are skipped. A file
    /// that cannot be read or registered is logged with `warn!` and skipped,
    /// so one broken partial only fails the pages that include it. Returns
    /// the number of files applied.
    pub fn load(&mut self) -> Result<usize, EngineError> {
        let mut applied = 0;
        for binding in self.watchers() {
            let root = self.root(binding.kind);
            if !root.is_dir() {
                debug!(root = %root.display(), "skipping missing source tree");
                continue;
            }

            for file in walk_dir(&root, binding.kind.extensions())? {
                let path = file.path.clone();
                match self.load_file(&binding, file) {
                    Ok(()) => applied += 1,
                    Err(err) => warn!(file = %path.display(), "skipped during load: {}", err),
                }
            }
        }
        Ok(applied)
    }

    fn load_file(
        &mut self,
        binding: &WatchBinding,
        file: file_loader::LoadedFile,
    ) -> Result<(), EngineError> {
        let name = match binding.kind {
            WatchKind::Helpers => file_loader::helper_name(&file.path),
            _ => file.name,
        };
        let contents = if binding.read {
            Some(read_source(&file.path)?)
        } else {
            None
        };
        self.handle(WatchEvent::update(binding.kind, name, file.path, contents))
    }

    /// Renders like [`PageEngine::render`] but returns the error instead of
    /// formatting it.
    pub fn try_render(&self, page_body: &str, page_data: &Value) -> Result<String, EngineError> {
        let name = layout_name(page_data);
        let layout = self
            .layouts
            .get(name.as_ref())
            .ok_or_else(|| missing_layout(&name))?;

        let page = splice_body(layout, page_body);
        self.compiler.render(&page, page_data)
    }

    fn update_layout(
        &mut self,
        name: String,
        path: &Path,
        contents: Option<String>,
    ) -> Result<(), EngineError> {
        let contents = match contents {
            Some(contents) => contents,
            None => read_source(path)?,
        };
        debug!(layout = %name, "layout updated");
        self.layouts.insert(name, contents);
        Ok(())
    }

    fn remove_layout(&mut self, name: &str) {
        if self.layouts.remove(name).is_some() {
            debug!(layout = %name, "layout removed");
        }
    }

    fn update_partial(&mut self, path: &Path, contents: Option<String>) -> Result<(), EngineError> {
        let name = self.partial_name(path)?;
        let contents = match contents {
            Some(contents) => contents,
            None => read_source(path)?,
        };
        self.compiler.register_partial(&name, &contents)?;
        debug!(partial = %name, "partial registered");
        Ok(())
    }

    fn remove_partial(&mut self, path: &Path) -> Result<(), EngineError> {
        let name = self.partial_name(path)?;
        if self.compiler.unregister_partial(&name) {
            debug!(partial = %name, "partial unregistered");
        }
        Ok(())
    }

    fn update_helper(&mut self, name: &str, path: &Path) {
        match self.load_helper(name, path) {
            Ok(()) => debug!(helper = %name, "helper loaded"),
            Err(err) => {
                let err = EngineError::HelperLoad {
                    file: helper_file_name(path),
                    message: err.to_string(),
                };
                warn!(helper = %name, "{}", err);
            }
        }
    }

    fn load_helper(&mut self, name: &str, path: &Path) -> Result<(), EngineError> {
        let script = read_source(path)?;
        self.compiler.register_script_helper(name, &script)
    }

    fn remove_helper(&mut self, name: &str) -> Result<(), EngineError> {
        if self.compiler.unregister_helper(name)? {
            debug!(helper = %name, "helper unregistered");
        }
        Ok(())
    }

    fn partial_name(&self, path: &Path) -> Result<String, EngineError> {
        file_loader::relative_name(
            &self.root(WatchKind::Partials),
            path,
            WatchKind::Partials.extensions(),
        )
    }
}

impl PageEngine for HandlebarsEngine {
    fn requires(&self) -> &'static str {
        REQUIRES
    }

    fn watchers(&self) -> Vec<WatchBinding> {
        WatchKind::ALL
            .iter()
            .map(|&kind| WatchBinding::new(kind, self.options.folders.dir(kind)))
            .collect()
    }

    fn handle(&mut self, event: WatchEvent) -> Result<(), EngineError> {
        match event {
            WatchEvent::Update {
                kind: WatchKind::Layouts,
                name,
                path,
                contents,
            } => self.update_layout(name, &path, contents),
            WatchEvent::Remove {
                kind: WatchKind::Layouts,
                name,
                ..
            } => {
                self.remove_layout(&name);
                Ok(())
            }
            WatchEvent::Update {
                kind: WatchKind::Partials,
                path,
                contents,
                ..
            } => self.update_partial(&path, contents),
            WatchEvent::Remove {
                kind: WatchKind::Partials,
                path,
                ..
            } => self.remove_partial(&path),
            WatchEvent::Update {
                kind: WatchKind::Helpers,
                name,
                path,
                ..
            } => {
                self.update_helper(&name, &path);
                Ok(())
            }
            WatchEvent::Remove {
                kind: WatchKind::Helpers,
                name,
                ..
            } => self.remove_helper(&name),
        }
    }

    fn render(&self, page_body: &str, page_data: &Value, file: &SourceFile) -> String {
        match self.try_render(page_body, page_data) {
            Ok(html) => html,
            Err(err) => self.formatter.format(&err, file.path()),
        }
    }
}

/// Name of the layout `page_data` asks for. A missing or null `layout`
/// means [`DEFAULT_LAYOUT`].
fn layout_name(page_data: &Value) -> Cow<'_, str> {
    match page_data.get("layout") {
        None | Some(Value::Null) => Cow::Borrowed(DEFAULT_LAYOUT),
        Some(Value::String(name)) => Cow::Borrowed(name),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

fn missing_layout(name: &str) -> EngineError {
    if name == DEFAULT_LAYOUT {
        EngineError::MissingDefaultLayout
    } else {
        EngineError::MissingNamedLayout {
            name: name.to_string(),
        }
    }
}

/// Replaces the first body marker in `layout` with `page_body`, literally.
fn splice_body(layout: &str, page_body: &str) -> String {
    BODY_MARKER.replace(layout, NoExpand(page_body)).into_owned()
}

fn read_source(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))
}

fn helper_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
