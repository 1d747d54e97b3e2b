//! `ref` and the polymorphic `get`/`set!` pair. `ref` only builds mutable
//! cells; `get`/`set!` dispatch over whichever mutable kind (Reference,
//! Array, Dict) they're handed, since all three share the same read/write
//! shape conceptually even though they're distinct `Value` variants here.

use std::collections::HashMap;

use crate::error::RagnarokError;
use crate::value::Value;

use super::primitive;

fn get_one(name: &str, target: &Value) -> Result<Value, RagnarokError> {
    match target {
        Value::Reference(cell) => Ok(cell.borrow().clone()),
        other => Err(RagnarokError::wrong_type(name, other.kind_name())),
    }
}

fn get_indexed(name: &str, target: &Value, key: &Value) -> Result<Value, RagnarokError> {
    match target {
        Value::Array(cell) => {
            if !key.is_number() {
                return Err(RagnarokError::wrong_type(name, key.kind_name()));
            }
            let idx = key.as_int();
            let items = cell.borrow();
            if idx < 0 || idx as usize >= items.len() {
                return Err(RagnarokError::OutOfBounds { primitive: name.to_string(), index: idx });
            }
            Ok(items[idx as usize].clone())
        }
        Value::Dict(cell) => {
            if !key.is_symbol() && !key.is_string() {
                return Err(RagnarokError::wrong_type(name, key.kind_name()));
            }
            let k = key.as_str().to_string();
            cell.borrow().get(&k).cloned().ok_or_else(|| RagnarokError::DictKeyMissing(k))
        }
        other => Err(RagnarokError::wrong_type(name, other.kind_name())),
    }
}

fn set_one(name: &str, target: &Value, value: Value) -> Result<Value, RagnarokError> {
    match target {
        Value::Reference(cell) => {
            *cell.borrow_mut() = value;
            Ok(Value::Nil)
        }
        other => Err(RagnarokError::wrong_type(name, other.kind_name())),
    }
}

fn set_indexed(name: &str, target: &Value, key: &Value, value: Value) -> Result<Value, RagnarokError> {
    match target {
        Value::Array(cell) => {
            if !key.is_number() {
                return Err(RagnarokError::wrong_type(name, key.kind_name()));
            }
            let idx = key.as_int();
            let mut items = cell.borrow_mut();
            if idx < 0 || idx as usize >= items.len() {
                return Err(RagnarokError::OutOfBounds { primitive: name.to_string(), index: idx });
            }
            items[idx as usize] = value;
            Ok(Value::Nil)
        }
        Value::Dict(cell) => {
            if !key.is_symbol() && !key.is_string() {
                return Err(RagnarokError::wrong_type(name, key.kind_name()));
            }
            // absent keys are created silently rather than rejected
            cell.borrow_mut().insert(key.as_str().to_string(), value);
            Ok(Value::Nil)
        }
        other => Err(RagnarokError::wrong_type(name, other.kind_name())),
    }
}

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "ref".to_string(),
        primitive("ref", 1, Some(1), |_name, args, _ctx| Ok(Value::reference(args[0].clone()))),
    );

    bindings.insert(
        "get".to_string(),
        primitive("get", 1, Some(2), |name, args, _ctx| {
            if args.len() == 1 {
                get_one(name, &args[0])
            } else {
                get_indexed(name, &args[0], &args[1])
            }
        }),
    );

    bindings.insert(
        "set!".to_string(),
        primitive("set!", 2, Some(3), |name, args, _ctx| {
            if args.len() == 2 {
                set_one(name, &args[0], args[1].clone())
            } else {
                set_indexed(name, &args[0], &args[1], args[2].clone())
            }
        }),
    );
}
