//! Watcher bindings and the events delivered through them.
//!
//! The engine does not watch anything itself. It publishes one
//! [`WatchBinding`] per source tree, and the host's watcher turns filesystem
//! changes under those patterns into [`WatchEvent`]s that it passes to
//! [`PageEngine::handle`](crate::PageEngine::handle).

use std::path::{Path, PathBuf};

use crate::file_loader::{HELPER_EXTENSIONS, TEMPLATE_EXTENSIONS};

const TEMPLATE_GLOB: &str = "**/*.{html,hbs,handlebars}";
const HELPER_GLOB: &str = "**/*.rhai";

/// The three namespaces kept in sync with the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchKind {
    Layouts,
    Partials,
    Helpers,
}

impl WatchKind {
    /// All kinds, in the order the initial scan applies them.
    pub const ALL: [WatchKind; 3] = [WatchKind::Layouts, WatchKind::Partials, WatchKind::Helpers];

    /// File extensions (with leading dot) that belong to this kind.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            WatchKind::Layouts | WatchKind::Partials => TEMPLATE_EXTENSIONS,
            WatchKind::Helpers => HELPER_EXTENSIONS,
        }
    }

    /// Whether the watcher should read file contents before calling `update`.
    pub fn reads_contents(self) -> bool {
        !matches!(self, WatchKind::Helpers)
    }

    fn glob(self) -> &'static str {
        match self {
            WatchKind::Layouts | WatchKind::Partials => TEMPLATE_GLOB,
            WatchKind::Helpers => HELPER_GLOB,
        }
    }
}

/// One watched source tree as declared to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchBinding {
    pub kind: WatchKind,
    /// Glob pattern relative to the input root, e.g. `layouts/**/*.{html,hbs,handlebars}`.
    pub pattern: String,
    /// Whether `update` events must carry the file contents.
    pub read: bool,
}

impl WatchBinding {
    /// Builds the binding for `kind` rooted at `folder`.
    pub fn new(kind: WatchKind, folder: &str) -> Self {
        let folder = folder.trim_end_matches('/');
        Self {
            kind,
            pattern: format!("{}/{}", folder, kind.glob()),
            read: kind.reads_contents(),
        }
    }
}

/// A change reported by the host watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A file was created or modified.
    Update {
        kind: WatchKind,
        /// Name resolved by the watcher (relative path without extension).
        name: String,
        path: PathBuf,
        /// File contents, present when the binding asked for them.
        contents: Option<String>,
    },
    /// A file was deleted.
    Remove {
        kind: WatchKind,
        name: String,
        path: PathBuf,
    },
}

impl WatchEvent {
    /// Create an update event.
    pub fn update(
        kind: WatchKind,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        contents: Option<String>,
    ) -> Self {
        Self::Update {
            kind,
            name: name.into(),
            path: path.into(),
            contents,
        }
    }

    /// Create a remove event.
    pub fn remove(kind: WatchKind, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Remove {
            kind,
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn kind(&self) -> WatchKind {
        match self {
            Self::Update { kind, .. } | Self::Remove { kind, .. } => *kind,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Update { name, .. } | Self::Remove { name, .. } => name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Update { path, .. } | Self::Remove { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_patterns() {
        let layouts = WatchBinding::new(WatchKind::Layouts, "layouts");
        assert_eq!(layouts.pattern, "layouts/**/*.{html,hbs,handlebars}");
        assert!(layouts.read);

        let helpers = WatchBinding::new(WatchKind::Helpers, "helpers/");
        assert_eq!(helpers.pattern, "helpers/**/*.rhai");
        assert!(!helpers.read);
    }

    #[test]
    fn test_event_accessors() {
        let event = WatchEvent::remove(
            WatchKind::Partials,
            "nav/header",
            "/s/partials/nav/header.hbs",
        );
        assert_eq!(event.kind(), WatchKind::Partials);
        assert_eq!(event.name(), "nav/header");
        assert_eq!(event.path(), Path::new("/s/partials/nav/header.hbs"));
    }

    #[test]
    fn test_extensions_per_kind() {
        assert!(WatchKind::Layouts.extensions().contains(&".hbs"));
        assert_eq!(WatchKind::Helpers.extensions(), &[".rhai"]);
    }
}
