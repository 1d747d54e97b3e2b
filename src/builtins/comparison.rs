//! Comparison and boolean negation: `=`, `<`, `<=`, `>`, `>=`, `not`.
//!
//! `=` is polymorphic (uses `Value`'s own equality, so it works across all
//! kinds including structural list/dict comparison and reference identity).
//! The ordering operators are numeric-only.

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

fn order(name: &str, args: &[Value], cmp: impl Fn(i64, i64) -> bool) -> Result<Value, RagnarokError> {
    let a = as_int(name, &args[0])?;
    let b = as_int(name, &args[1])?;
    Ok(Value::Boolean(cmp(a, b)))
}

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "=".to_string(),
        primitive("=", 2, None, |_name, args, _ctx| {
            Ok(Value::Boolean(args.windows(2).all(|w| w[0] == w[1])))
        }),
    );

    bindings.insert(
        "<".to_string(),
        primitive("<", 2, Some(2), |name, args, _ctx| order(name, args, |a, b| a < b)),
    );
    bindings.insert(
        "<=".to_string(),
        primitive("<=", 2, Some(2), |name, args, _ctx| order(name, args, |a, b| a <= b)),
    );
    bindings.insert(
        ">".to_string(),
        primitive(">", 2, Some(2), |name, args, _ctx| order(name, args, |a, b| a > b)),
    );
    bindings.insert(
        ">=".to_string(),
        primitive(">=", 2, Some(2), |name, args, _ctx| order(name, args, |a, b| a >= b)),
    );

    bindings.insert(
        "not".to_string(),
        primitive("not", 1, Some(1), |_name, args, _ctx| Ok(Value::Boolean(!args[0].is_true()))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::ecosystem::Ecosystem;
    use crate::eval::apply_value;

    fn call(name: &str, args: &[Value]) -> Result<Value, RagnarokError> {
        let mut bindings = HashMap::new();
        register(&mut bindings);
        let f = bindings.get(name).unwrap().clone();
        let eco = Ecosystem::new();
        let env = eco.add_shell("*1*", HashMap::new());
        let ctx = Context {
            home_module: "*1*".to_string(),
            current_module: std::cell::RefCell::new("*1*".to_string()),
            next_current_module: std::cell::RefCell::new(None),
            ecosystem: eco,
            current_env: std::cell::RefCell::new(env),
            report: Box::new(|_| {}),
            bail: Box::new(|| {}),
            read_all: Box::new(|_, _| Ok(())),
        };
        apply_value(&f, args.to_vec(), &ctx)
    }

    #[test]
    fn equality_is_polymorphic() {
        assert_eq!(call("=", &[Value::string("a"), Value::string("a")]).unwrap(), Value::Boolean(true));
        assert_eq!(call("=", &[Value::Integer(1), Value::string("1")]).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn ordering_compares_a_single_pair() {
        assert_eq!(call("<", &[Value::Integer(1), Value::Integer(2)]).unwrap(), Value::Boolean(true));
        assert_eq!(call("<", &[Value::Integer(2), Value::Integer(1)]).unwrap(), Value::Boolean(false));
        assert_eq!(call(">=", &[Value::Integer(3), Value::Integer(3)]).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn not_negates_truthiness() {
        assert_eq!(call("not", &[Value::Boolean(false)]).unwrap(), Value::Boolean(true));
        assert_eq!(call("not", &[Value::Nil]).unwrap(), Value::Boolean(true));
        assert_eq!(call("not", &[Value::Integer(0)]).unwrap(), Value::Boolean(true));
    }
}
