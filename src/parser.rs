//! Rewrites the S-expression values produced by the reader into AST nodes,
//! desugaring `fn`, `let`, `let*`, and `do` into `LetRec`/`Apply`/`If` as
//! specified. `letrec` is the only binding form that becomes an AST node
//! directly; everything else is surface sugar over it.

use std::cell::Cell;
use std::rc::Rc;

use crate::ast::{Ast, Def, DefKind};
use crate::error::RagnarokError;
use crate::value::Value;

const KEYWORDS: &[&str] = &["def", "if", "fn", "let", "let*", "letrec", "do", "quote", "macro"];

thread_local! {
    static FRESH_COUNTER: Cell<u64> = Cell::new(0);
}

fn fresh_name(base: &str) -> String {
    FRESH_COUNTER.with(|c| {
        let n = c.get();
        c.set(n + 1);
        format!("{}__{}", base, n)
    })
}

fn err(msg: impl Into<String>) -> RagnarokError {
    RagnarokError::ParseError(msg.into())
}

fn is_keyword_head(v: &Value, kw: &str) -> bool {
    matches!(v, Value::Symbol(s) if s.as_str() == kw)
}

fn head_keyword(v: &Value) -> Option<&'static str> {
    if let Value::Symbol(s) = v {
        KEYWORDS.iter().find(|k| s.as_str() == **k).copied()
    } else {
        None
    }
}

/// Parses a top-level `(def ...)` declaration. Returns `Ok(None)` if `sexp`
/// is not headed by `def` at all (the caller should then try
/// `parse_expr`).
pub fn parse_def(sexp: &Value) -> Result<Option<Def>, RagnarokError> {
    let Some(items) = sexp.to_vec() else { return Ok(None) };
    let Some(head) = items.first() else { return Ok(None) };
    if !is_keyword_head(head, "def") {
        return Ok(None);
    }
    if items.len() < 3 {
        return Err(err("too few arguments to def"));
    }
    if items.len() > 3 {
        return Err(err("too many arguments to def"));
    }
    let target = &items[1];
    let body_sexp = &items[2];

    if let Value::Symbol(name) = target {
        let body = parse_expr(body_sexp)?;
        return Ok(Some(Def { name: name.to_string(), kind: DefKind::Value, params: vec![], body }));
    }

    if let Some(spec) = target.to_vec() {
        let Some((name, params)) = spec.split_first() else {
            return Err(err("malformed def"));
        };
        let Value::Symbol(name) = name else {
            return Err(err("definition name not a symbol"));
        };
        let params = parse_symbols(params)?;
        let body = parse_expr(body_sexp)?;
        return Ok(Some(Def { name: name.to_string(), kind: DefKind::Function, params, body }));
    }

    Err(err("malformed def"))
}

fn parse_symbols(items: &[Value]) -> Result<Vec<String>, RagnarokError> {
    items
        .iter()
        .map(|v| match v {
            Value::Symbol(s) => Ok(s.to_string()),
            _ => Err(err("expected a symbol")),
        })
        .collect()
}

/// Parses an expression (anything that isn't a top-level `def`).
pub fn parse_expr(sexp: &Value) -> Result<Ast, RagnarokError> {
    match sexp {
        Value::Symbol(s) => Ok(Ast::Id(s.to_string())),
        Value::Integer(_) | Value::Boolean(_) | Value::String(_) => Ok(Ast::Literal(sexp.clone())),
        Value::Empty => Err(err("empty application")),
        Value::Cons(_) => parse_list_expr(sexp),
        other => Err(err(format!("cannot parse {}", other))),
    }
}

fn parse_list_expr(sexp: &Value) -> Result<Ast, RagnarokError> {
    let items = sexp.to_vec().ok_or_else(|| err("malformed list"))?;
    let head = items.first().ok_or_else(|| err("empty application"))?;

    match head_keyword(head) {
        Some("quote") => parse_quote(&items),
        Some("if") => parse_if(&items),
        Some("fn") => parse_fn(&items),
        Some("let") => parse_let(&items),
        Some("let*") => parse_let_star(&items),
        Some("letrec") => parse_letrec(&items),
        Some("do") => parse_do(&items),
        Some("def") => Err(err("def is only valid at the top level")),
        Some("macro") => Err(err("macro not supported")),
        _ => parse_apply(&items),
    }
}

fn parse_quote(items: &[Value]) -> Result<Ast, RagnarokError> {
    if items.len() != 2 {
        return Err(err("wrong number of arguments to quote"));
    }
    Ok(Ast::Quote(items[1].clone()))
}

fn parse_if(items: &[Value]) -> Result<Ast, RagnarokError> {
    if items.len() < 4 {
        return Err(err("too few arguments to if"));
    }
    if items.len() > 4 {
        return Err(err("too many arguments to if"));
    }
    let cnd = parse_expr(&items[1])?;
    let thn = parse_expr(&items[2])?;
    let els = parse_expr(&items[3])?;
    Ok(Ast::If(Rc::new(cnd), Rc::new(thn), Rc::new(els)))
}

/// `(fn (p1 ... pn) body)` and the self-naming `(fn name (p1 ... pn) body)`
/// both desugar into a single-binding `LetRec`.
fn parse_fn(items: &[Value]) -> Result<Ast, RagnarokError> {
    if items.len() < 3 {
        return Err(err("too few arguments to fn"));
    }
    if let Value::Symbol(name) = &items[1] {
        if items.len() != 4 {
            return Err(err("malformed named fn"));
        }
        let params = parse_symbols(&items[2].to_vec().ok_or_else(|| err("malformed fn parameter list"))?)?;
        let body = parse_expr(&items[3])?;
        return Ok(make_letrec(name.to_string(), params, body));
    }
    if items.len() != 3 {
        return Err(err("malformed fn"));
    }
    let params = parse_symbols(&items[1].to_vec().ok_or_else(|| err("malformed fn parameter list"))?)?;
    let body = parse_expr(&items[2])?;
    Ok(make_letrec(fresh_name("fn"), params, body))
}

fn make_letrec(name: String, params: Vec<String>, body: Ast) -> Ast {
    Ast::LetRec {
        names: vec![name.clone()],
        params: vec![params],
        bodies: vec![Rc::new(body)],
        body: Rc::new(Ast::Id(name)),
    }
}

/// `(let ((x1 e1) ...) body)` => `((fn (x1 ...) body) e1 ...)`.
fn parse_let(items: &[Value]) -> Result<Ast, RagnarokError> {
    if items.len() != 3 {
        return Err(err("malformed let"));
    }
    let (names, inits) = parse_bindings(&items[1])?;
    let body = parse_expr(&items[2])?;
    let fn_ast = make_letrec(fresh_name("let"), names, body);
    let args = inits.iter().map(parse_expr).collect::<Result<Vec<_>, _>>()?;
    Ok(Ast::Apply(Rc::new(fn_ast), args))
}

/// `(let* ((x1 e1) (x2 e2) ...) body)` right-associates into nested
/// single-binding `let`s.
fn parse_let_star(items: &[Value]) -> Result<Ast, RagnarokError> {
    if items.len() != 3 {
        return Err(err("malformed let*"));
    }
    let bindings = items[1].to_vec().ok_or_else(|| err("malformed let* bindings"))?;
    build_let_star(&bindings, &items[2])
}

fn build_let_star(bindings: &[Value], body_sexp: &Value) -> Result<Ast, RagnarokError> {
    match bindings.split_first() {
        None => parse_expr(body_sexp),
        Some((first, rest)) => {
            let pair = first.to_vec().ok_or_else(|| err("malformed let* binding"))?;
            if pair.len() != 2 {
                return Err(err("malformed let* binding"));
            }
            let Value::Symbol(name) = &pair[0] else { return Err(err("let* binding name not a symbol")) };
            let init = parse_expr(&pair[1])?;
            let inner = build_let_star(rest, body_sexp)?;
            let fn_ast = make_letrec(fresh_name("let*"), vec![name.to_string()], inner);
            Ok(Ast::Apply(Rc::new(fn_ast), vec![init]))
        }
    }
}

fn parse_bindings(sexp: &Value) -> Result<(Vec<String>, Vec<Value>), RagnarokError> {
    let items = sexp.to_vec().ok_or_else(|| err("malformed bindings"))?;
    let mut names = Vec::with_capacity(items.len());
    let mut inits = Vec::with_capacity(items.len());
    for item in items {
        let pair = item.to_vec().ok_or_else(|| err("malformed binding"))?;
        if pair.len() != 2 {
            return Err(err("malformed binding"));
        }
        let Value::Symbol(name) = &pair[0] else { return Err(err("binding name not a symbol")) };
        names.push(name.to_string());
        inits.push(pair[1].clone());
    }
    Ok((names, inits))
}

/// `(letrec ((n1 (p...) b1) ...) body)` builds the `LetRec` node directly.
fn parse_letrec(items: &[Value]) -> Result<Ast, RagnarokError> {
    if items.len() != 3 {
        return Err(err("malformed letrec"));
    }
    let bindings = items[1].to_vec().ok_or_else(|| err("malformed letrec bindings"))?;
    let mut names = Vec::with_capacity(bindings.len());
    let mut params = Vec::with_capacity(bindings.len());
    let mut bodies = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let parts = binding.to_vec().ok_or_else(|| err("malformed letrec binding"))?;
        if parts.len() != 3 {
            return Err(err("malformed letrec binding"));
        }
        let Value::Symbol(name) = &parts[0] else { return Err(err("letrec binding name not a symbol")) };
        let ps = parse_symbols(&parts[1].to_vec().ok_or_else(|| err("malformed letrec parameter list"))?)?;
        let b = parse_expr(&parts[2])?;
        names.push(name.to_string());
        params.push(ps);
        bodies.push(Rc::new(b));
    }
    let body = parse_expr(&items[2])?;
    Ok(Ast::LetRec { names, params, bodies, body: Rc::new(body) })
}

/// `(do e1 ... en)` right-folds into nested single-binding `let`s ending
/// in the literal last expression; `(do)` yields `Literal(Nil)`.
fn parse_do(items: &[Value]) -> Result<Ast, RagnarokError> {
    let body_forms = &items[1..];
    build_do(body_forms)
}

fn build_do(forms: &[Value]) -> Result<Ast, RagnarokError> {
    match forms {
        [] => Ok(Ast::Literal(Value::Nil)),
        [last] => parse_expr(last),
        [first, rest @ ..] => {
            let init = parse_expr(first)?;
            let inner = build_do(rest)?;
            let fn_ast = make_letrec(fresh_name("do"), vec![fresh_name("_")], inner);
            Ok(Ast::Apply(Rc::new(fn_ast), vec![init]))
        }
    }
}

fn parse_apply(items: &[Value]) -> Result<Ast, RagnarokError> {
    let fn_ast = parse_expr(&items[0])?;
    let args = items[1..].iter().map(parse_expr).collect::<Result<Vec<_>, _>>()?;
    Ok(Ast::Apply(Rc::new(fn_ast), args))
}
