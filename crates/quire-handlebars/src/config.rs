//! Engine configuration.
//!
//! [`EngineOptions`] mirrors the options object the host passes to every page
//! engine. Only `input` and `builtins` matter to most sites; `cwd` and
//! `folders` exist so the source layout can be moved without code changes.
//!
//! Options can be built in code or parsed from YAML/JSON:
//!
//! ```rust
//! use quire_handlebars::EngineOptions;
//!
//! let options = EngineOptions::from_yaml(r#"
//! input: site
//! builtins: true
//! folders:
//!   partials: includes
//! "#).unwrap();
//!
//! assert_eq!(options.input.to_str(), Some("site"));
//! assert_eq!(options.folders.partials, "includes");
//! assert_eq!(options.folders.layouts, "layouts");
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::watch::WatchKind;

/// Names of the three watched subdirectories under the input root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Folders {
    pub layouts: String,
    pub partials: String,
    pub helpers: String,
}

impl Default for Folders {
    fn default() -> Self {
        Self {
            layouts: "layouts".to_string(),
            partials: "partials".to_string(),
            helpers: "helpers".to_string(),
        }
    }
}

impl Folders {
    /// Returns the folder name watched for `kind`.
    pub fn dir(&self, kind: WatchKind) -> &str {
        match kind {
            WatchKind::Layouts => &self.layouts,
            WatchKind::Partials => &self.partials,
            WatchKind::Helpers => &self.helpers,
        }
    }
}

/// Options for constructing a [`HandlebarsEngine`](crate::HandlebarsEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Root content directory, relative to `cwd` unless absolute.
    pub input: PathBuf,
    /// Register the standard helper bundle at construction.
    pub builtins: bool,
    /// Working directory; the process working directory when unset.
    pub cwd: Option<PathBuf>,
    /// Subdirectory names for layouts, partials and helpers.
    pub folders: Folders,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("src"),
            builtins: false,
            cwd: None,
            folders: Folders::default(),
        }
    }
}

impl EngineOptions {
    /// Creates options rooted at `input` with everything else defaulted.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Enable or disable the standard helper bundle.
    pub fn builtins(mut self, enabled: bool) -> Self {
        self.builtins = enabled;
        self
    }

    /// Resolve `input` against `cwd` instead of the process working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Replace the watched folder names.
    pub fn folders(mut self, folders: Folders) -> Self {
        self.folders = folders;
        self
    }

    /// Parses options from a YAML document. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, EngineError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses options from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves the working directory used for path derivation.
    pub(crate) fn resolve_cwd(&self) -> Result<PathBuf, EngineError> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().map_err(EngineError::WorkingDir),
        }
    }
}
