//! Error types for the page engine.
//!
//! [`EngineError`] covers every failure the engine can observe. Most of them
//! never reach the caller: layout and template failures inside
//! [`render`](crate::PageEngine::render) are turned into page text by an
//! [`ErrorFormatter`](crate::ErrorFormatter), and helper load failures are
//! logged and dropped. The remaining variants propagate from
//! [`handle`](crate::PageEngine::handle) and
//! [`load`](crate::HandlebarsEngine::load).

use std::io;
use std::path::PathBuf;

/// Errors that can occur while maintaining registries or rendering pages.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The page asked for the reserved `default` layout and none is registered.
    #[error("You must have a layout named \"default\".")]
    MissingDefaultLayout,

    /// The page asked for a named layout that is not registered.
    #[error("No layout named \"{name}\" exists.")]
    MissingNamedLayout { name: String },

    /// The composite page failed to compile or execute.
    #[error(transparent)]
    Render(#[from] handlebars::RenderError),

    /// A partial failed to compile when it was registered.
    #[error(transparent)]
    Template(#[from] handlebars::TemplateError),

    /// A helper script failed to compile.
    #[error("helper \"{name}\" failed to compile: {message}")]
    Script { name: String, message: String },

    /// A helper file could not be loaded or registered.
    #[error("Error when loading {file} as a Handlebars helper: {message}")]
    HelperLoad { file: String, message: String },

    /// A watched file sits outside the root its name is derived from.
    #[error("{} is not inside {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Reading a source file or directory failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Engine options could not be parsed.
    #[error("invalid engine options: {0}")]
    Config(String),

    /// The process working directory could not be resolved.
    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[source] io::Error),
}

impl EngineError {
    /// Create an I/O error attributed to `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for the two missing-layout kinds.
    pub fn is_missing_layout(&self) -> bool {
        matches!(
            self,
            Self::MissingDefaultLayout | Self::MissingNamedLayout { .. }
        )
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
