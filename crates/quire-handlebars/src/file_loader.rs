//! Name derivation and directory walking for watched source trees.
//!
//! Layouts, partials and helpers are all referenced by a name derived from
//! where the file lives:
//!
//! | File Path | Kind | Name |
//! |-----------|------|------|
//! | `src/layouts/default.html` | layout | `"default"` |
//! | `src/layouts/blog/post.hbs` | layout | `"blog/post"` |
//! | `src/partials/nav/header.handlebars` | partial | `"nav/header"` |
//! | `src/helpers/text/shout.rhai` | helper | `"shout"` |
//!
//! Layout and partial names are the path relative to their root with the
//! template extension stripped and separators normalized to `/`, so the same
//! tree yields the same names on every platform. Only a recognized extension
//! is stripped: `post.v2.hbs` becomes `post.v2`. Helper names are the bare
//! file stem.

use std::path::{Component, Path, PathBuf};

use crate::error::EngineError;

/// Extensions recognized as layout or partial templates.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".html", ".hbs", ".handlebars"];

/// Extensions recognized as helper scripts.
pub const HELPER_EXTENSIONS: &[&str] = &[".rhai"];

/// A file discovered during directory walking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// Name without extension, relative to the walked root (e.g. `"nav/header"`).
    pub name: String,
    /// Path to the file.
    pub path: PathBuf,
}

impl LoadedFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Strips a recognized extension from a filename.
///
/// Returns the original name when no extension in the list matches.
///
/// ```rust
/// use quire_handlebars::file_loader::{strip_extension, TEMPLATE_EXTENSIONS};
///
/// assert_eq!(strip_extension("default.html", TEMPLATE_EXTENSIONS), "default");
/// assert_eq!(strip_extension("nav/header.hbs", TEMPLATE_EXTENSIONS), "nav/header");
/// assert_eq!(strip_extension("notes.txt", TEMPLATE_EXTENSIONS), "notes.txt");
/// ```
pub fn strip_extension(name: &str, extensions: &[&str]) -> String {
    for ext in extensions {
        if let Some(base) = name.strip_suffix(ext) {
            return base.to_string();
        }
    }
    name.to_string()
}

/// Derives a slash-joined name for `path` relative to `root`.
///
/// Fails when `path` is not inside `root`.
pub fn relative_name(root: &Path, path: &Path, extensions: &[&str]) -> Result<String, EngineError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| EngineError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let joined = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    Ok(strip_extension(&joined, extensions))
}

/// Derives a helper name: the file name with its extension stripped.
pub fn helper_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    strip_extension(&file_name, HELPER_EXTENSIONS)
}

/// Recursively walks `root` and returns every file with a matching extension,
/// sorted by name.
pub fn walk_dir(root: &Path, extensions: &[&str]) -> Result<Vec<LoadedFile>, EngineError> {
    let mut files = Vec::new();
    walk_dir_recursive(root, root, extensions, &mut files)?;
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn walk_dir_recursive(
    current: &Path,
    root: &Path,
    extensions: &[&str],
    files: &mut Vec<LoadedFile>,
) -> Result<(), EngineError> {
    let entries = std::fs::read_dir(current).map_err(|e| EngineError::io(current, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| EngineError::io(current, e))?;
        let path = entry.path();

        if path.is_dir() {
            walk_dir_recursive(&path, root, extensions, files)?;
        } else if path.is_file() && has_extension(&path, extensions) {
            let name = relative_name(root, &path, extensions)?;
            files.push(LoadedFile::new(name, path));
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let path_str = path.to_string_lossy();
    extensions.iter().any(|ext| path_str.ends_with(ext))
}
