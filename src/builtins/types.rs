//! `type` and the `<kind>?` predicate family.

use std::collections::HashMap;

use crate::value::Value;

use super::primitive;

fn pred(name: &'static str, test: impl Fn(&Value) -> bool + 'static, bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        name.to_string(),
        primitive(name, 1, Some(1), move |_name, args, _ctx| Ok(Value::Boolean(test(&args[0])))),
    );
}

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "type".to_string(),
        primitive("type", 1, Some(1), |_name, args, _ctx| Ok(Value::symbol(args[0].kind_name()))),
    );

    pred("empty?", Value::is_empty, bindings);
    pred("cons?", Value::is_cons, bindings);
    pred("list?", Value::is_list, bindings);
    pred("number?", Value::is_number, bindings);
    pred("ref?", Value::is_ref, bindings);
    pred("boolean?", Value::is_boolean, bindings);
    pred("string?", Value::is_string, bindings);
    pred("symbol?", Value::is_symbol, bindings);
    pred("function?", Value::is_function, bindings);
    pred("nil?", Value::is_nil, bindings);
    pred("array?", Value::is_array, bindings);
    pred("dict?", Value::is_dict, bindings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::ecosystem::Ecosystem;
    use crate::eval::apply_value;

    fn call(name: &str, args: &[Value]) -> Value {
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
        apply_value(&f, args.to_vec(), &ctx).unwrap()
    }

    #[test]
    fn type_names_each_kind() {
        assert_eq!(call("type", &[Value::Integer(1)]), Value::symbol("integer"));
        assert_eq!(call("type", &[Value::Boolean(true)]), Value::symbol("boolean"));
    }

    #[test]
    fn predicates_match_their_kind_only() {
        assert_eq!(call("number?", &[Value::Integer(1)]), Value::Boolean(true));
        assert_eq!(call("number?", &[Value::string("1")]), Value::Boolean(false));
        assert_eq!(call("nil?", &[Value::Nil]), Value::Boolean(true));
        assert_eq!(call("string?", &[Value::string("x")]), Value::Boolean(true));
    }
}
