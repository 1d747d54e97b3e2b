//! List primitives: construction/deconstruction (`cons`, `head`, `tail`,
//! `list`, `append`, `reverse`, `length`, `nth`) and the higher-order
//! family (`map`, `for`, `filter`, `foldr`, `foldl`, `apply`), all of which
//! call back into the evaluator through `eval::apply_value`.

use std::collections::HashMap;

use crate::context::Context;
use crate::error::RagnarokError;
use crate::eval::apply_value;
use crate::value::Value;

use super::primitive;

fn as_list(name: &str, v: &Value) -> Result<Vec<Value>, RagnarokError> {
    v.to_vec().ok_or_else(|| RagnarokError::MalformedList(name.to_string()))
}

/// Zips `lists` in parallel, truncating to the shortest, for `map`/`for`'s
/// multi-list form. Each output row holds one element from every list, in
/// list order.
fn zip_lists(name: &str, lists: &[Value]) -> Result<Vec<Vec<Value>>, RagnarokError> {
    let columns: Vec<Vec<Value>> = lists.iter().map(|l| as_list(name, l)).collect::<Result<_, _>>()?;
    let shortest = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut rows = Vec::with_capacity(shortest);
    for i in 0..shortest {
        rows.push(columns.iter().map(|c| c[i].clone()).collect());
    }
    Ok(rows)
}

pub fn register(bindings: &mut HashMap<String, Value>) {
    bindings.insert(
        "cons".to_string(),
        primitive("cons", 2, Some(2), |name, args, _ctx| {
            if !args[1].is_list() {
                return Err(RagnarokError::wrong_type(name, args[1].kind_name()));
            }
            Ok(Value::cons(args[0].clone(), args[1].clone()))
        }),
    );

    bindings.insert(
        "head".to_string(),
        primitive("head", 1, Some(1), |name, args, _ctx| {
            if !args[0].is_cons() {
                return Err(RagnarokError::wrong_type(name, args[0].kind_name()));
            }
            Ok(args[0].head().clone())
        }),
    );

    bindings.insert(
        "tail".to_string(),
        primitive("tail", 1, Some(1), |name, args, _ctx| {
            if !args[0].is_cons() {
                return Err(RagnarokError::wrong_type(name, args[0].kind_name()));
            }
            Ok(args[0].tail().clone())
        }),
    );

    bindings.insert(
        "list".to_string(),
        primitive("list", 0, None, |_name, args, _ctx| Ok(Value::list(args.to_vec()))),
    );

    bindings.insert(
        "append".to_string(),
        primitive("append", 0, None, |name, args, _ctx| {
            let Some((last, init)) = args.split_last() else {
                return Ok(Value::Empty);
            };
            let mut items = Vec::new();
            for arg in init {
                items.extend(as_list(name, arg)?);
            }
            let mut result = last.clone();
            for item in items.into_iter().rev() {
                result = Value::cons(item, result);
            }
            Ok(result)
        }),
    );

    bindings.insert(
        "reverse".to_string(),
        primitive("reverse", 1, Some(1), |name, args, _ctx| {
            let mut items = as_list(name, &args[0])?;
            items.reverse();
            Ok(Value::list(items))
        }),
    );

    bindings.insert(
        "length".to_string(),
        primitive("length", 1, Some(1), |name, args, _ctx| Ok(Value::Integer(as_list(name, &args[0])?.len() as i64))),
    );

    bindings.insert(
        "nth".to_string(),
        primitive("nth", 2, Some(2), |name, args, _ctx| {
            let items = as_list(name, &args[0])?;
            if !args[1].is_number() {
                return Err(RagnarokError::wrong_type(name, args[1].kind_name()));
            }
            let idx = args[1].as_int();
            if idx < 0 || idx as usize >= items.len() {
                return Err(RagnarokError::OutOfBounds { primitive: name.to_string(), index: idx });
            }
            Ok(items[idx as usize].clone())
        }),
    );

    bindings.insert(
        "map".to_string(),
        primitive("map", 2, None, |name, args, ctx: &Context| {
            let rows = zip_lists(name, &args[1..])?;
            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                out.push(apply_value(&args[0], row, ctx)?);
            }
            Ok(Value::list(out))
        }),
    );

    bindings.insert(
        "for".to_string(),
        primitive("for", 2, None, |name, args, ctx: &Context| {
            let rows = zip_lists(name, &args[1..])?;
            for row in rows {
                apply_value(&args[0], row, ctx)?;
            }
            Ok(Value::Nil)
        }),
    );

    bindings.insert(
        "filter".to_string(),
        primitive("filter", 2, Some(2), |name, args, ctx: &Context| {
            let items = as_list(name, &args[1])?;
            let mut out = Vec::new();
            for item in items {
                if apply_value(&args[0], vec![item.clone()], ctx)?.is_true() {
                    out.push(item);
                }
            }
            Ok(Value::list(out))
        }),
    );

    bindings.insert(
        "foldl".to_string(),
        primitive("foldl", 3, Some(3), |name, args, ctx: &Context| {
            let items = as_list(name, &args[2])?;
            let mut acc = args[1].clone();
            for item in items {
                acc = apply_value(&args[0], vec![acc, item], ctx)?;
            }
            Ok(acc)
        }),
    );

    bindings.insert(
        "foldr".to_string(),
        primitive("foldr", 3, Some(3), |name, args, ctx: &Context| {
            let items = as_list(name, &args[2])?;
            let mut acc = args[1].clone();
            for item in items.into_iter().rev() {
                acc = apply_value(&args[0], vec![item, acc], ctx)?;
            }
            Ok(acc)
        }),
    );

    bindings.insert(
        "apply".to_string(),
        primitive("apply", 2, Some(2), |name, args, ctx: &Context| {
            let flat_args = as_list(name, &args[1])?;
            apply_value(&args[0], flat_args, ctx)
        }),
    );
}
