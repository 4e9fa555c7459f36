//! The handlebars symbol table owned by one engine.
//!
//! [`Compiler`] wraps a `handlebars::Handlebars` registry configured with the
//! engine's fixed compile options (`prevent_indent`) and tracks what was
//! registered into it. Partials and helpers are only ever reached through
//! the register/unregister calls here.
//!
//! Helpers are Rhai scripts compiled by handlebars' script helper support.
//! Each script sees the call's positional arguments as `params` and its hash
//! arguments as `hash`:
//!
//! ```text
//! // helpers/shout.rhai
//! params[0].to_upper() + "!"
//! ```
//!
//! handlebars has no way to drop a single helper, so unregistering one
//! rebuilds the registry from the tracked partial and helper sources.

use std::collections::BTreeMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::builtins;
use crate::error::EngineError;

pub struct Compiler {
    registry: Handlebars<'static>,
    builtins: bool,
    partials: BTreeMap<String, String>,
    helpers: BTreeMap<String, String>,
}

impl Compiler {
    /// Creates an empty compiler, with the standard helper bundle when
    /// `builtins` is set.
    pub fn new(builtins: bool) -> Self {
        Self {
            registry: fresh_registry(builtins),
            builtins,
            partials: BTreeMap::new(),
            helpers: BTreeMap::new(),
        }
    }

    /// Registers (or overwrites) a partial.
    ///
    /// The previous definition stays in place when `source` fails to compile.
    pub fn register_partial(&mut self, name: &str, source: &str) -> Result<(), EngineError> {
        self.registry.register_partial(name, source)?;
        self.partials.insert(name.to_string(), source.to_string());
        Ok(())
    }

    /// Unregisters a partial. Returns `false` if no partial was registered
    /// under `name`.
    pub fn unregister_partial(&mut self, name: &str) -> bool {
        self.registry.unregister_template(name);
        self.partials.remove(name).is_some()
    }

    pub fn has_partial(&self, name: &str) -> bool {
        self.partials.contains_key(name)
    }

    /// Compiles `script` and registers it as helper `name`.
    ///
    /// Compilation happens before the swap, so a script that fails to compile
    /// leaves any previous definition registered.
    pub fn register_script_helper(&mut self, name: &str, script: &str) -> Result<(), EngineError> {
        self.registry
            .register_script_helper(name, script)
            .map_err(|e| EngineError::Script {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        self.helpers.insert(name.to_string(), script.to_string());
        Ok(())
    }

    /// Unregisters a script helper. Returns `false` if no script was
    /// registered under `name`.
    ///
    /// A builtin helper shadowed by the script becomes visible again.
    pub fn unregister_helper(&mut self, name: &str) -> Result<bool, EngineError> {
        if self.helpers.remove(name).is_none() {
            return Ok(false);
        }
        self.rebuild()?;
        Ok(true)
    }

    /// Whether a script helper or builtin named `name` is registered.
    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
            || (self.builtins && builtins::BUILTIN_HELPERS.contains(&name))
    }

    /// Compiles `template` and executes it against `data`.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, EngineError> {
        Ok(self.registry.render_template(template, data)?)
    }

    fn rebuild(&mut self) -> Result<(), EngineError> {
        let mut registry = fresh_registry(self.builtins);
        for (name, source) in &self.partials {
            registry.register_partial(name, source)?;
        }
        for (name, script) in &self.helpers {
            registry
                .register_script_helper(name, script)
                .map_err(|e| EngineError::Script {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
        }
        self.registry = registry;
        Ok(())
    }
}

fn fresh_registry(with_builtins: bool) -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.set_prevent_indent(true);
    if with_builtins {
        builtins::register(&mut registry);
    }
    registry
}
