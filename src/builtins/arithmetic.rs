//! Arithmetic: `+`, `*`, `-`. There is no division or modulo primitive in
//! this language.

use std::collections::HashMap;

use crate::error::RagnarokError;
use crate::value::Value;

use super::primitive;

fn as_int(name: &str, v: &Value) -> Result<i64, RagnarokError> {
    if v.is_number() {
        Ok(v.as_int())
    } else {
        Err(RagnarokError::wrong_type(name, v.kind_name()))
    }
}

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "+".to_string(),
        primitive("+", 0, None, |name, args, _ctx| {
            let mut sum = 0i64;
            for arg in args {
                sum += as_int(name, arg)?;
            }
            Ok(Value::Integer(sum))
        }),
    );

    bindings.insert(
        "*".to_string(),
        primitive("*", 0, None, |name, args, _ctx| {
            let mut product = 1i64;
            for arg in args {
                product *= as_int(name, arg)?;
            }
            Ok(Value::Integer(product))
        }),
    );

    bindings.insert(
        "-".to_string(),
        primitive("-", 1, None, |name, args, _ctx| {
            let first = as_int(name, &args[0])?;
            if args.len() == 1 {
                return Ok(Value::Integer(-first));
            }
            let mut result = first;
            for arg in &args[1..] {
                result -= as_int(name, arg)?;
            }
            Ok(Value::Integer(result))
        }),
    );
}
