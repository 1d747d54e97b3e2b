//! String primitives: `string-append`, `string-length`, `string-lower`,
//! `string-upper`, `string-substring`. Installed in their own `string`
//! module so they can be referred to either unqualified (via the default
//! lookup path) or qualified as `string::string-append`.

use std::collections::HashMap;

use crate::error::RagnarokError;
use crate::value::Value;

use super::primitive;

fn as_str<'a>(name: &str, v: &'a Value) -> Result<&'a str, RagnarokError> {
    if v.is_string() {
        Ok(v.as_str())
    } else {
        Err(RagnarokError::wrong_type(name, v.kind_name()))
    }
}

fn as_int(name: &str, v: &Value) -> Result<i64, RagnarokError> {
    if v.is_number() {
        Ok(v.as_int())
    } else {
        Err(RagnarokError::wrong_type(name, v.kind_name()))
    }
}

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "string-append".to_string(),
        primitive("string-append", 0, None, |name, args, _ctx| {
            let mut out = String::new();
            for arg in args {
                out.push_str(as_str(name, arg)?);
            }
            Ok(Value::string(out))
        }),
    );

    bindings.insert(
        "string-length".to_string(),
        primitive("string-length", 1, Some(1), |name, args, _ctx| {
            Ok(Value::Integer(as_str(name, &args[0])?.len() as i64))
        }),
    );

    bindings.insert(
        "string-lower".to_string(),
        primitive("string-lower", 1, Some(1), |name, args, _ctx| {
            Ok(Value::string(as_str(name, &args[0])?.to_lowercase()))
        }),
    );

    bindings.insert(
        "string-upper".to_string(),
        primitive("string-upper", 1, Some(1), |name, args, _ctx| {
            Ok(Value::string(as_str(name, &args[0])?.to_uppercase()))
        }),
    );

    bindings.insert(
        "string-substring".to_string(),
        primitive("string-substring", 1, Some(3), |name, args, _ctx| {
            let s = as_str(name, &args[0])?;
            let chars: Vec<char> = s.chars().collect();
            let start = if args.len() > 1 { as_int(name, &args[1])? } else { 0 };
            let end = if args.len() > 2 { as_int(name, &args[2])? } else { chars.len() as i64 };
            let start = start.clamp(0, chars.len() as i64) as usize;
            let end = end.clamp(0, chars.len() as i64) as usize;
            if end < start {
                return Ok(Value::string(""));
            }
            let out: String = chars[start..end].iter().collect();
            Ok(Value::string(out))
        }),
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
    fn append_joins_all_args() {
        assert_eq!(call("string-append", &[Value::string("foo"), Value::string("bar")]).unwrap(), Value::string("foobar"));
        assert_eq!(call("string-append", &[]).unwrap(), Value::string(""));
    }

    #[test]
    fn length_counts_bytes() {
        assert_eq!(call("string-length", &[Value::string("hello")]).unwrap(), Value::Integer(5));
    }

    #[test]
    fn case_conversion() {
        assert_eq!(call("string-lower", &[Value::string("ABC")]).unwrap(), Value::string("abc"));
        assert_eq!(call("string-upper", &[Value::string("abc")]).unwrap(), Value::string("ABC"));
    }

    #[test]
    fn substring_extracts_range() {
        assert_eq!(
            call("string-substring", &[Value::string("hello"), Value::Integer(1), Value::Integer(3)]).unwrap(),
            Value::string("el")
        );
    }

    #[test]
    fn substring_clamps_out_of_bounds_end() {
        assert_eq!(
            call("string-substring", &[Value::string("hi"), Value::Integer(0), Value::Integer(5)]).unwrap(),
            Value::string("hi")
        );
    }

    #[test]
    fn substring_defaults_to_whole_string() {
        assert_eq!(call("string-substring", &[Value::string("hello")]).unwrap(), Value::string("hello"));
    }

    #[test]
    fn substring_end_before_start_is_empty() {
        assert_eq!(
            call("string-substring", &[Value::string("hello"), Value::Integer(3), Value::Integer(1)]).unwrap(),
            Value::string("")
        );
    }
}
