//! Registration entrypoint for the primitive library. Each category
//! module contributes a `register(bindings)` function; this module wires
//! them into the `core`, `string`, and `shell` binding maps that
//! `main.rs` hands to `Ecosystem::add_module`.

mod arithmetic;
mod collections;
mod comparison;
mod lists;
mod refs;
mod shell;
mod strings;
mod types;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::context::Context;
use crate::error::RagnarokError;
use crate::value::{Primitive, Value};

thread_local! {
    static NEXT_PRIMITIVE_ID: Cell<u64> = Cell::new(0);
}

/// Builds a primitive Value with a fixed arity range. The dispatcher in
/// `eval::dispatch`/`eval::apply_value` enforces `min ..= max` before the
/// body ever runs, so primitive bodies only need to check argument kinds.
pub fn primitive(
    name: &str,
    min_args: usize,
    max_args: Option<usize>,
    func: impl Fn(&str, &[Value], &Context) -> Result<Value, RagnarokError> + 'static,
) -> Value {
    let id = NEXT_PRIMITIVE_ID.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    });
    Value::Primitive(Rc::new(Primitive {
        name: name.to_string(),
        id,
        min_args,
        max_args,
        func: Box::new(func),
    }))
}

pub fn core_bindings() -> HashMap<String, Value> {
    let mut bindings = HashMap::new();
    bindings.insert("true".to_string(), Value::Boolean(true));
    bindings.insert("false".to_string(), Value::Boolean(false));
    arithmetic::register(&mut bindings);
    comparison::register(&mut bindings);
    lists::register(&mut bindings);
    refs::register(&mut bindings);
    collections::register(&mut bindings);
    types::register(&mut bindings);
    bindings
}

pub fn string_bindings() -> HashMap<String, Value> {
    let mut bindings = HashMap::new();
    strings::register(&mut bindings);
    bindings
}

pub fn shell_bindings() -> HashMap<String, Value> {
    let mut bindings = HashMap::new();
    shell::register(&mut bindings);
    bindings
}
