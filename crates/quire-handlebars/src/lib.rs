//! # Quire Handlebars - Handlebars Page Engine
//!
//! `quire-handlebars` is the Handlebars rendering engine for a static-site
//! builder. It wraps each page in a layout, resolves partials and helpers,
//! and keeps all three in sync with a watched source tree.
//!
//! ## Core Concepts
//!
//! - [`PageEngine`]: the interface a site builder drives (watch bindings,
//!   change events, per-page rendering)
//! - [`HandlebarsEngine`]: the Handlebars implementation
//! - [`WatchBinding`] / [`WatchEvent`]: how source-tree changes reach the engine
//! - [`ErrorFormatter`]: turns a failed render into page output
//!
//! ## Source Layout
//!
//! ```text
//! src/
//! ├── layouts/
//! │   └── default.html      layout "default"
//! ├── partials/
//! │   └── nav/header.hbs    partial "nav/header"
//! └── helpers/
//!     └── shout.rhai        helper "shout"
//! ```
//!
//! Layouts mark where the page goes with `{{> body}}`. Helpers are
//! [Rhai](https://rhai.rs) scripts that receive their arguments as `params`
//! and `hash`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quire_handlebars::{EngineOptions, HandlebarsEngine, PageEngine, SourceFile};
//! use serde_json::json;
//!
//! let mut engine = HandlebarsEngine::new(EngineOptions::new("src").builtins(true))?;
//! engine.load()?;
//!
//! let html = engine.render(
//!     "<h1>{{uppercase title}}</h1>",
//!     &json!({"layout": "default", "title": "Hello"}),
//!     &SourceFile::new("src/pages/index.html"),
//! );
//! println!("{}", html);
//! # Ok::<(), quire_handlebars::EngineError>(())
//! ```
//!
//! ## Errors
//!
//! [`PageEngine::render`] never fails. A missing layout or a template error
//! becomes an HTML error page (see [`HtmlErrorPage`]), so one bad page does
//! not stop a build. Helper scripts that fail to load are logged with
//! `tracing` and skipped, and so are files that fail during
//! [`HandlebarsEngine::load`].

pub mod builtins;
mod compiler;
mod config;
mod engine;
mod error;
pub mod file_loader;
mod renderer;
mod report;
mod watch;

pub use config::{EngineOptions, Folders};
pub use engine::{PageEngine, SourceFile};
pub use error::EngineError;
pub use renderer::{HandlebarsEngine, DEFAULT_LAYOUT, REQUIRES};
pub use report::{ErrorFormatter, HtmlErrorPage};
pub use watch::{WatchBinding, WatchEvent, WatchKind};
