use std::cell::RefCell;
use std::rc::Rc;

use ragnarok::ast::DefKind;
use ragnarok::builtins;
use ragnarok::config;
use ragnarok::context::Context;
use ragnarok::ecosystem::Ecosystem;
use ragnarok::env::Environment;
use ragnarok::error::RagnarokError;
use ragnarok::eval::eval;
use ragnarok::parser::{parse_def, parse_expr};
use ragnarok::reader::{read, ReadResult};
use ragnarok::value::{Function, Value};

fn fresh_shell() -> (Rc<Ecosystem>, Rc<Environment>) {
    let eco = Ecosystem::new();
    eco.add_module("core", builtins::core_bindings());
    eco.add_module("string", builtins::string_bindings());
    eco.add_module("config", config::config_bindings());
    let env = eco.add_shell("*1*", builtins::shell_bindings());
    (eco, env)
}

fn context(eco: Rc<Ecosystem>, env: Rc<Environment>) -> Context {
    Context {
        home_module: "*1*".to_string(),
        current_module: RefCell::new("*1*".to_string()),
        next_current_module: RefCell::new(None),
        ecosystem: eco,
        current_env: RefCell::new(env),
        report: Box::new(|_| {}),
        bail: Box::new(|| {}),
        read_all: Box::new(|_, _| Ok(())),
    }
}

/// Evaluates one top-level form, installing `def` bindings in `env` just
/// like the REPL's top-level loop does, and returns its result.
fn try_eval_one(sexp: &Value, env: &Rc<Environment>, ctx: &Context) -> Result<Value, RagnarokError> {
    if let Some(def) = parse_def(sexp)? {
        match def.kind {
            DefKind::Value => {
                let value = eval(&def.body, env.clone(), ctx)?;
                env.update(&def.name, value.clone());
                Ok(value)
            }
            DefKind::Function => {
                let f = Value::Function(Rc::new(Function {
                    params: def.params.clone(),
                    body: Rc::new(def.body),
                    env: env.clone(),
                }));
                env.update(&def.name, f.clone());
                Ok(f)
            }
        }
    } else {
        let ast = parse_expr(sexp)?;
        eval(&ast, env.clone(), ctx)
    }
}

fn read_one(src: &str) -> Value {
    match read(src).unwrap() {
        ReadResult::Form(v, _) => v,
        other => panic!("expected a complete form in {:?}, got {:?}", src, std::mem::discriminant(&other)),
    }
}

fn eval_one(src: &str, env: Rc<Environment>, ctx: &Context) -> Value {
    try_eval_one(&read_one(src), &env, ctx).unwrap()
}

/// Evaluates every top-level form in `src` against the same environment, in
/// source order, and returns the last result.
fn eval_all(src: &str, env: Rc<Environment>, ctx: &Context) -> Value {
    let mut remaining = src;
    let mut last = Value::Nil;
    loop {
        match read(remaining).unwrap() {
            ReadResult::Done => return last,
            ReadResult::Incomplete => panic!("incomplete form in {:?}", src),
            ReadResult::Form(sexp, rest) => {
                last = try_eval_one(&sexp, &env, ctx).unwrap();
                remaining = rest;
            }
        }
    }
}

#[test]
fn scenario_1_reading_and_arithmetic() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    let v = eval_one("(+ 1 2 3)", env, &ctx);
    assert_eq!(v, Value::Integer(6));
    assert_eq!(v.to_string(), "6");
}

#[test]
fn scenario_2_lambda_application() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    assert_eq!(eval_one("((fn (x y) (+ x y)) 3 4)", env, &ctx), Value::Integer(7));
}

#[test]
fn scenario_3_let_and_let_star() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    assert_eq!(eval_one("(let ((x 10) (y 20)) (+ x y))", env.clone(), &ctx), Value::Integer(30));
    assert_eq!(eval_one("(let* ((x 10) (y (+ x 1))) y)", env, &ctx), Value::Integer(11));
}

#[test]
fn scenario_4_do_sequences_and_discards() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    assert_eq!(eval_one("(do (ref 1) (ref 2) 42)", env, &ctx), Value::Integer(42));
}

#[test]
fn scenario_5_reference_get_set() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    let r = eval_one("(ref 10)", env.clone(), &ctx);
    env.update("r", r);
    assert_eq!(eval_one("(get r)", env.clone(), &ctx), Value::Integer(10));
    assert_eq!(eval_one("(set! r 20)", env.clone(), &ctx), Value::Nil);
    assert_eq!(eval_one("(get r)", env, &ctx), Value::Integer(20));
}

#[test]
fn scenario_6_map_truncates_to_shortest() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    let v = eval_one("(map (fn (x y) (+ x y)) '(1 2 3) '(10 20 30 40))", env, &ctx);
    assert_eq!(v.to_string(), "(11 22 33)");
}

#[test]
fn tail_call_soundness_one_million_iterations() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    let src = "(letrec ((loop (n) (if (= n 0) 'done (loop (- n 1))))) (loop 1000000))";
    assert_eq!(eval_one(src, env, &ctx), Value::symbol("done"));
}

#[test]
fn lexical_scoping_inner_letrec_does_not_leak() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    eval_one("(def x 1)", env.clone(), &ctx);
    let v = eval_one("(letrec ((x (n) n)) (x 2))", env.clone(), &ctx);
    assert_eq!(v, Value::Integer(2));
    assert_eq!(eval_one("x", env, &ctx), Value::Integer(1));
}

#[test]
fn mutual_recursion_even_odd() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    let src = "(letrec ((even? (n) (if (= n 0) #t (odd? (- n 1)))) (odd? (n) (if (= n 0) #f (even? (- n 1))))) (even? 10))";
    assert_eq!(eval_one(src, env, &ctx), Value::Boolean(true));
}

#[test]
fn qualified_name_reaches_any_module_regardless_of_current_module() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    assert_eq!(eval_one("string::string-length", env, &ctx).kind_name(), "function");
}

#[test]
fn removing_core_from_lookup_path_breaks_unqualified_resolution() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco.clone(), env.clone());

    assert_eq!(eval_one("(+ 1 1)", env.clone(), &ctx), Value::Integer(2));

    let config_env = eco.get("config").unwrap();
    config_env.update("lookup-path", Value::reference(Value::list(vec![Value::symbol("shell")])));

    let ast = parse_expr(&read_one("(+ 1 1)")).unwrap();
    assert!(eval(&ast, env, &ctx).is_err());
}

#[test]
fn def_installs_a_binding_visible_to_later_forms() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    eval_one("(def answer 42)", env.clone(), &ctx);
    assert_eq!(eval_one("answer", env, &ctx), Value::Integer(42));
}

#[test]
fn named_function_def_can_recurse() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    eval_one("(def (countdown n) (if (= n 0) 'liftoff (countdown (- n 1))))", env.clone(), &ctx);
    assert_eq!(eval_one("(countdown 5)", env, &ctx), Value::symbol("liftoff"));
}

#[test]
fn error_partway_through_a_sequence_keeps_earlier_effects() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    eval_one("(def a 1)", env.clone(), &ctx);
    assert!(try_eval_one(&read_one("(nosuchthing)"), &env, &ctx).is_err());
    assert_eq!(eval_one("a", env, &ctx), Value::Integer(1));
}

#[test]
fn eval_all_runs_every_form_in_source_order() {
    let (eco, env) = fresh_shell();
    let ctx = context(eco, env.clone());
    let v = eval_all("(def a 1) (def b 2) (+ a b)", env, &ctx);
    assert_eq!(v, Value::Integer(3));
}

#[test]
fn round_trip_atoms_through_read_and_display() {
    for src in ["42", "-7", "#t", "#f", "\"hi\"", "sym", "()"] {
        let v = read_one(src);
        let reread = read_one(&v.to_string());
        assert_eq!(v, reread, "round-trip failed for {:?}", src);
    }
}
