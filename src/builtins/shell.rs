//! Shell primitives: the small set of host-effecting operations that
//! don't belong in `core` because they touch the REPL loop itself (`quit`,
//! `go`), the filesystem (`load`), or wall-clock time (`timed-apply`).

use std::collections::HashMap;
use std::fs;
use std::time::Instant;

use crate::context::Context;
use crate::error::RagnarokError;
use crate::eval::apply_value;
use crate::value::Value;

use super::primitive;

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "quit".to_string(),
        primitive("quit", 0, Some(0), |_name, _args, ctx: &Context| {
            (ctx.bail)();
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "env".to_string(),
        primitive("env", 0, Some(0), |_name, _args, ctx: &Context| {
            let env = ctx.current_env.borrow().clone();
            for (name, value) in env.own_bindings() {
                (ctx.report)(&format!("{:<24} {}", name, value));
            }
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "go".to_string(),
        primitive("go", 1, Some(1), |name, args, ctx: &Context| {
            if !args[0].is_symbol() && !args[0].is_string() {
                return Err(RagnarokError::wrong_type(name, args[0].kind_name()));
            }
            ctx.request_switch(args[0].as_str().to_string());
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "modules".to_string(),
        primitive("modules", 0, Some(0), |_name, _args, ctx: &Context| {
            let mut names = ctx.ecosystem.module_names();
            names.sort();
            for name in &names {
                (ctx.report)(name);
            }
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "help".to_string(),
        primitive("help", 0, Some(0), |_name, _args, ctx: &Context| {
            (ctx.report)("quit                     exit the shell");
            (ctx.report)("env                      list bindings visible in the current module");
            (ctx.report)("go <module>              switch the current module");
            (ctx.report)("modules                  list loaded modules");
            (ctx.report)("print <v>...             display one or more values");
            (ctx.report)("load <path>              read and evaluate a file");
            (ctx.report)("timed-apply <f> <args>   call f, reporting elapsed time");
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "print".to_string(),
        primitive("print", 0, None, |_name, args, _ctx: &Context| {
            let line = args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
            println!("{}", line);
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "load".to_string(),
        primitive("load", 1, Some(1), |name, args, ctx: &Context| {
            if !args[0].is_string() {
                return Err(RagnarokError::wrong_type(name, args[0].kind_name()));
            }
            let path = args[0].as_str();
            let contents = fs::read_to_string(path).map_err(|e| RagnarokError::ReadError(e.to_string()))?;
            (ctx.read_all)(&contents, ctx)?;
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "timed-apply".to_string(),
        primitive("timed-apply", 2, Some(2), |name, args, ctx: &Context| {
            let flat_args = args[1]
                .to_vec()
                .ok_or_else(|| RagnarokError::MalformedList(name.to_string()))?;
            let start = Instant::now();
            let result = apply_value(&args[0], flat_args, ctx)?;
            let elapsed = start.elapsed();
            (ctx.report)(&format!("elapsed: {:?}", elapsed));
            Ok(result)
        }),
    );
}
