//! Integration tests for script helper loading and hot reload.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use quire_handlebars::{EngineOptions, HandlebarsEngine, PageEngine, WatchEvent, WatchKind};
use serde_json::json;
use tempfile::TempDir;

fn create_file(dir: &Path, relative_path: &str, content: &str) -> PathBuf {
    let full_path = dir.join(relative_path);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = std::fs::File::create(&full_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    full_path
}

fn site_engine(site: &TempDir) -> HandlebarsEngine {
    create_file(site.path(), "src/layouts/default.html", "{{> body}}");
    let mut engine = HandlebarsEngine::new(EngineOptions::new("src").cwd(site.path())).unwrap();
    engine.load().unwrap();
    engine
}

fn helper_update(name: &str, path: &Path) -> WatchEvent {
    WatchEvent::update(WatchKind::Helpers, name, path, None)
}

/// Collects formatted log output so tests can assert on warnings.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured.contents())
}

#[test]
fn helper_loads_from_disk_and_renders() {
    let site = TempDir::new().unwrap();
    create_file(site.path(), "src/helpers/shout.rhai", r#"params[0].to_upper() + "!""#);
    let engine = site_engine(&site);

    assert!(engine.has_helper("shout"));
    let out = engine
        .try_render("{{shout word}}", &json!({"layout": "default", "word": "hey"}))
        .unwrap();
    assert_eq!(out, "HEY!");
}

#[test]
fn nested_helper_uses_file_stem() {
    let site = TempDir::new().unwrap();
    create_file(site.path(), "src/helpers/text/wrap.rhai", r#""(" + params[0] + ")""#);
    let engine = site_engine(&site);

    assert!(engine.has_helper("wrap"));
    assert!(!engine.has_helper("text/wrap"));
}

#[test]
fn broken_helper_is_skipped_with_warning() {
    let site = TempDir::new().unwrap();
    let path = create_file(site.path(), "src/helpers/broken.rhai", "let x = ;");
    let mut engine = site_engine(&site);
    assert!(!engine.has_helper("broken"));

    let (result, logs) = with_captured_logs(|| engine.handle(helper_update("broken", &path)));
    assert!(result.is_ok());
    assert!(logs.contains("WARN"), "logs: {}", logs);
    assert!(logs.contains("broken.rhai"), "logs: {}", logs);
    assert!(!engine.has_helper("broken"));

    let data = json!({"layout": "default", "word": "x"});
    assert!(engine.try_render("{{broken word}}", &data).is_err());
    let page = engine.render("{{broken word}}", &data, &"src/pages/a.html".into());
    assert!(page.contains("src/pages/a.html"));
}

#[test]
fn missing_helper_file_is_skipped_with_warning() {
    let site = TempDir::new().unwrap();
    let mut engine = site_engine(&site);
    let path = site.path().join("src/helpers/ghost.rhai");

    let (result, logs) = with_captured_logs(|| engine.handle(helper_update("ghost", &path)));
    assert!(result.is_ok());
    assert!(logs.contains("ghost.rhai"), "logs: {}", logs);
    assert!(!engine.has_helper("ghost"));
}

#[test]
fn helper_reload_picks_up_new_source() {
    let site = TempDir::new().unwrap();
    let path = create_file(site.path(), "src/helpers/greet.rhai", r#""hello""#);
    let mut engine = site_engine(&site);
    let data = json!({"layout": "default"});
    assert_eq!(engine.try_render("{{greet 1}}", &data).unwrap(), "hello");

    create_file(site.path(), "src/helpers/greet.rhai", r#""goodbye""#);
    engine.handle(helper_update("greet", &path)).unwrap();
    assert_eq!(engine.try_render("{{greet 1}}", &data).unwrap(), "goodbye");
}

#[test]
fn failed_reload_keeps_previous_definition() {
    let site = TempDir::new().unwrap();
    let path = create_file(site.path(), "src/helpers/greet.rhai", r#""hello""#);
    let mut engine = site_engine(&site);

    create_file(site.path(), "src/helpers/greet.rhai", "fn (");
    let (result, logs) = with_captured_logs(|| engine.handle(helper_update("greet", &path)));
    assert!(result.is_ok());
    assert!(logs.contains("greet.rhai"));

    let data = json!({"layout": "default"});
    assert_eq!(engine.try_render("{{greet 1}}", &data).unwrap(), "hello");
}

#[test]
fn removed_helper_is_unregistered() {
    let site = TempDir::new().unwrap();
    let path = create_file(site.path(), "src/helpers/greet.rhai", r#""hello""#);
    let mut engine = site_engine(&site);

    engine
        .handle(WatchEvent::remove(WatchKind::Helpers, "greet", &path))
        .unwrap();
    assert!(!engine.has_helper("greet"));
    assert!(engine
        .try_render("{{greet 1}}", &json!({"layout": "default"}))
        .is_err());

    // Removing an unknown helper is not an error.
    engine
        .handle(WatchEvent::remove(WatchKind::Helpers, "greet", &path))
        .unwrap();
}

#[test]
fn removing_script_restores_shadowed_builtin() {
    let site = TempDir::new().unwrap();
    create_file(site.path(), "src/layouts/default.html", "{{> body}}");
    let path = create_file(site.path(), "src/helpers/uppercase.rhai", r#""scripted""#);
    let options = EngineOptions::new("src").cwd(site.path()).builtins(true);
    let mut engine = HandlebarsEngine::new(options).unwrap();
    engine.load().unwrap();

    let data = json!({"layout": "default", "t": "a"});
    assert_eq!(engine.try_render("{{uppercase t}}", &data).unwrap(), "scripted");

    engine
        .handle(WatchEvent::remove(WatchKind::Helpers, "uppercase", &path))
        .unwrap();
    assert_eq!(engine.try_render("{{uppercase t}}", &data).unwrap(), "A");
}
