//! Standard helper bundle, registered when `builtins` is enabled.
//!
//! These complement the helpers handlebars already ships (`if`, `each`,
//! `eq`, `len`, ...) with the string and value helpers most page templates
//! reach for.
//!
//! | Helper | Example | Output |
//! |--------|---------|--------|
//! | `uppercase` | `{{uppercase "hi"}}` | `HI` |
//! | `lowercase` | `{{lowercase "Hi"}}` | `hi` |
//! | `capitalize` | `{{capitalize "hello world"}}` | `Hello world` |
//! | `truncate` | `{{truncate "abcdef" 3}}` | `abc...` |
//! | `replace` | `{{replace "a-b" "-" "+"}}` | `a+b` |
//! | `default` | `{{default title "Untitled"}}` | `title` if truthy, else `Untitled` |
//! | `join` | `{{join tags ", "}}` | `a, b` |
//! | `json` | `{{{json page}}}` | the value serialized as JSON |

use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

/// Names of every helper in the bundle.
pub const BUILTIN_HELPERS: &[&str] = &[
    "uppercase",
    "lowercase",
    "capitalize",
    "truncate",
    "replace",
    "default",
    "join",
    "json",
];

handlebars_helper!(uppercase: |s: str| s.to_uppercase());
handlebars_helper!(lowercase: |s: str| s.to_lowercase());
handlebars_helper!(capitalize: |s: str| capitalize_first(s));
handlebars_helper!(truncate: |s: str, len: u64, { suffix: str = "..." }| {
    truncate_chars(s, len as usize, suffix)
});
handlebars_helper!(replace: |s: str, from: str, to: str| s.replace(from, to));
handlebars_helper!(default: |value: Json, fallback: Json| {
    if is_truthy(value) { value.clone() } else { fallback.clone() }
});
handlebars_helper!(join: |items: array, separator: str| {
    items.iter().map(scalar_text).collect::<Vec<_>>().join(separator)
});
handlebars_helper!(json: |value: Json| value.to_string());

/// Registers the bundle into `registry`, replacing same-named helpers.
pub fn register(registry: &mut Handlebars<'_>) {
    registry.register_helper("uppercase", Box::new(uppercase));
    registry.register_helper("lowercase", Box::new(lowercase));
    registry.register_helper("capitalize", Box::new(capitalize));
    registry.register_helper("truncate", Box::new(truncate));
    registry.register_helper("replace", Box::new(replace));
    registry.register_helper("default", Box::new(default));
    registry.register_helper("join", Box::new(join));
    registry.register_helper("json", Box::new(json));
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, len: usize, suffix: &str) -> String {
    if s.chars().count() <= len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(len).collect();
    out.push_str(suffix);
    out
}

// Same truthiness handlebars uses for `{{#if}}`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        register(&mut registry);
        registry
    }

    fn render(template: &str, data: Value) -> String {
        registry().render_template(template, &data).unwrap()
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(render("{{uppercase name}}", json!({"name": "quire"})), "QUIRE");
        assert_eq!(render("{{lowercase \"LOUD\"}}", json!({})), "loud");
        assert_eq!(render("{{capitalize \"hello world\"}}", json!({})), "Hello world");
        assert_eq!(render("{{capitalize \"\"}}", json!({})), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(render("{{truncate \"abcdef\" 3}}", json!({})), "abc...");
        assert_eq!(render("{{truncate \"abc\" 3}}", json!({})), "abc");
        assert_eq!(
            render("{{truncate \"abcdef\" 2 suffix=\"~\"}}", json!({})),
            "ab~"
        );
    }

    #[test]
    fn test_replace() {
        assert_eq!(render("{{replace \"a-b-c\" \"-\" \"+\"}}", json!({})), "a+b+c");
    }

    #[test]
    fn test_default() {
        let template = "{{default title \"Untitled\"}}";
        assert_eq!(render(template, json!({"title": "Home"})), "Home");
        assert_eq!(render(template, json!({"title": ""})), "Untitled");
        assert_eq!(render(template, json!({})), "Untitled");
    }

    #[test]
    fn test_join_mixed_values() {
        let data = json!({"tags": ["rust", 2, true]});
        assert_eq!(render("{{join tags \", \"}}", data), "rust, 2, true");
    }

    #[test]
    fn test_json_unescaped() {
        let data = json!({"page": {"n": 1}});
        assert_eq!(render("{{{json page}}}", data), r#"{"n":1}"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(0.5)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
