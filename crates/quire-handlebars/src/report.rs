//! Turning render failures into page output.
//!
//! A page that fails to render still produces an output file. The engine hands
//! the error to an [`ErrorFormatter`], and whatever string it returns becomes
//! the page. [`HtmlErrorPage`] is the default.

use std::path::Path;

use crate::error::EngineError;

/// Formats a render failure as page text.
///
/// Implementations are also responsible for reporting the failure (logging,
/// collecting it for a build summary, ...).
pub trait ErrorFormatter: Send + Sync {
    fn format(&self, err: &EngineError, path: &Path) -> String;
}

/// Logs the failure and renders a minimal HTML page describing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlErrorPage;

impl ErrorFormatter for HtmlErrorPage {
    fn format(&self, err: &EngineError, path: &Path) -> String {
        tracing::error!(path = %path.display(), error = %err, "page failed to render");

        let path = escape_text(&path.display().to_string());
        let message = escape_text(&err.to_string());
        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head><title>Render error</title></head>\n\
             <body>\n\
             <h1>Error rendering {path}</h1>\n\
             <pre>{message}</pre>\n\
             </body>\n\
             </html>\n"
        )
    }
}

impl<F> ErrorFormatter for F
where
    F: Fn(&EngineError, &Path) -> String + Send + Sync,
{
    fn format(&self, err: &EngineError, path: &Path) -> String {
        self(err, path)
    }
}

// Element content only needs `&`, `<` and `>` escaped; quotes stay readable.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
