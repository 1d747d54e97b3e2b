//! Compile-time constants for the REPL banner, plus the bootstrap
//! bindings for the `config` module (the mutable `Reference`s primitives
//! read and `set!` through).

use std::collections::HashMap;

use crate::value::Value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WELCOME_MESSAGE: &str = "Ragnarok";
pub const WELCOME_SUBTITLE: &str = "a small Lisp-family interpreter";

pub const DEFAULT_LOOKUP_PATH: &[&str] = &["shell", "core", "string"];
pub const DEFAULT_EDITOR: &str = "emacs";

/// Bindings installed in the `config` module at startup.
pub fn config_bindings() -> HashMap<String, Value> {
    let mut bindings = HashMap::new();
    let lookup_path = Value::list(DEFAULT_LOOKUP_PATH.iter().map(|m| Value::symbol(*m)).collect());
    bindings.insert("lookup-path".to_string(), Value::reference(lookup_path));
    bindings.insert("editor".to_string(), Value::reference(Value::string(DEFAULT_EDITOR)));
    bindings
}
