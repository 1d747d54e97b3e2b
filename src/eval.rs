//! Tree-walking evaluator with a tail-call trampoline. Each AST node's
//! step either produces a final `Value` or a `(next-ast, next-env)`
//! continuation; the driver loop in `eval` repeats until a `Value` comes
//! out, so self- and mutually-recursive tail calls never grow the native
//! stack.

use std::rc::Rc;

use crate::ast::Ast;
use crate::context::Context;
use crate::env::Environment;
use crate::error::RagnarokError;
use crate::value::{Function, Value};

/// Either a borrowed node from the original parse tree, or an owned node
/// reached by following a continuation (a function body, a branch, a
/// `letrec` body). Avoids cloning the whole tree on every step.
enum Node<'a> {
    Ref(&'a Ast),
    Owned(Rc<Ast>),
}

impl<'a> Node<'a> {
    fn get(&self) -> &Ast {
        match self {
            Node::Ref(a) => a,
            Node::Owned(a) => a,
        }
    }
}

enum Step {
    Value(Value),
    Continue(Rc<Ast>, Rc<Environment>),
}

/// Evaluates `ast` in `env`, driving the trampoline to completion.
pub fn eval(ast: &Ast, env: Rc<Environment>, ctx: &Context) -> Result<Value, RagnarokError> {
    let mut node = Node::Ref(ast);
    let mut env = env;
    loop {
        match step(node.get(), &env, ctx)? {
            Step::Value(v) => return Ok(v),
            Step::Continue(next_ast, next_env) => {
                node = Node::Owned(next_ast);
                env = next_env;
            }
        }
    }
}

fn step(ast: &Ast, env: &Rc<Environment>, ctx: &Context) -> Result<Step, RagnarokError> {
    match ast {
        Ast::Literal(v) => Ok(Step::Value(v.clone())),
        Ast::Id(name) => Ok(Step::Value(env.find(name)?)),
        Ast::Quote(v) => Ok(Step::Value(v.clone())),

        Ast::If(cnd, thn, els) => {
            let cond = eval(cnd, env.clone(), ctx)?;
            if cond.is_true() {
                Ok(Step::Continue(thn.clone(), env.clone()))
            } else {
                Ok(Step::Continue(els.clone(), env.clone()))
            }
        }

        Ast::Apply(fn_ast, arg_asts) => {
            let fn_val = eval(fn_ast, env.clone(), ctx)?;
            let mut args = Vec::with_capacity(arg_asts.len());
            for a in arg_asts {
                args.push(eval(a, env.clone(), ctx)?);
            }
            dispatch(&fn_val, args, ctx)
        }

        Ast::LetRec { names, params, bodies, body } => {
            let frame = env.layer(names, None);
            for i in 0..names.len() {
                let f = Value::Function(Rc::new(Function {
                    params: params[i].clone(),
                    body: bodies[i].clone(),
                    env: frame.clone(),
                }));
                frame.update(&names[i], f);
            }
            Ok(Step::Continue(body.clone(), frame))
        }
    }
}

/// Dispatches an application. A `Function` target becomes a tail
/// continuation (no native recursion); a `Primitive` target is called
/// directly since primitives are leaves and don't participate in TCO.
fn dispatch(fn_val: &Value, args: Vec<Value>, ctx: &Context) -> Result<Step, RagnarokError> {
    match fn_val {
        Value::Function(f) => {
            if args.len() != f.params.len() {
                return Err(RagnarokError::arity("function", args.len()));
            }
            let frame = f.env.layer(&f.params, Some(&args));
            Ok(Step::Continue(f.body.clone(), frame))
        }
        Value::Primitive(p) => {
            check_arity(&p.name, p.min_args, p.max_args, args.len())?;
            let v = (p.func)(&p.name, &args, ctx)?;
            Ok(Step::Value(v))
        }
        other => Err(RagnarokError::NotApplicable(other.to_string())),
    }
}

fn check_arity(name: &str, min: usize, max: Option<usize>, got: usize) -> Result<(), RagnarokError> {
    if got < min || max.map_or(false, |m| got > m) {
        return Err(RagnarokError::arity(name, got));
    }
    Ok(())
}

/// Applies a function or primitive value from outside the trampoline (used
/// by primitives like `apply`, `map`, `filter`, `timed-apply`). This call
/// itself uses one native stack frame, but any tail recursion *inside* the
/// callee still runs through the trampoline and doesn't grow the stack
/// further.
pub fn apply_value(fn_val: &Value, args: Vec<Value>, ctx: &Context) -> Result<Value, RagnarokError> {
    match fn_val {
        Value::Function(f) => {
            if args.len() != f.params.len() {
                return Err(RagnarokError::arity("function", args.len()));
            }
            let frame = f.env.layer(&f.params, Some(&args));
            eval(&f.body, frame, ctx)
        }
        Value::Primitive(p) => {
            check_arity(&p.name, p.min_args, p.max_args, args.len())?;
            (p.func)(&p.name, &args, ctx)
        }
        other => Err(RagnarokError::NotApplicable(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::Ecosystem;
    use crate::env::Environment;
    use crate::parser::parse_expr;
    use crate::reader::{read, ReadResult};
    use std::collections::HashMap;

    fn test_context() -> (Rc<Environment>, Context) {
        let eco = Ecosystem::new();
        eco.add_module("core", crate::builtins::core_bindings());
        eco.add_module("string", crate::builtins::string_bindings());
        eco.add_module("config", crate::config::config_bindings());
        let env = eco.add_shell("*1*", crate::builtins::shell_bindings());
        let ctx = Context {
            home_module: "*1*".to_string(),
            current_module: std::cell::RefCell::new("*1*".to_string()),
            next_current_module: std::cell::RefCell::new(None),
            ecosystem: eco,
            current_env: std::cell::RefCell::new(env.clone()),
            report: Box::new(|_| {}),
            bail: Box::new(|| {}),
            read_all: Box::new(|_, _| Ok(())),
        };
        (env, ctx)
    }

    fn eval_str(src: &str) -> Value {
        let (env, ctx) = test_context();
        let v = match read(src).unwrap() {
            ReadResult::Form(v, _) => v,
            _ => panic!("expected a complete form"),
        };
        let ast = parse_expr(&v).unwrap();
        eval(&ast, env, &ctx).unwrap()
    }

    #[test]
    fn literal_evaluates_to_itself() {
        assert_eq!(eval_str("42"), Value::Integer(42));
    }

    #[test]
    fn if_picks_branch() {
        assert_eq!(eval_str("(if #t 1 2)"), Value::Integer(1));
        assert_eq!(eval_str("(if #f 1 2)"), Value::Integer(2));
    }

    #[test]
    fn quote_is_literal_data() {
        assert_eq!(eval_str("'(1 2 3)").to_string(), "(1 2 3)");
    }

    #[test]
    fn lambda_application() {
        assert_eq!(eval_str("((fn (x y) x) 3 4)"), Value::Integer(3));
    }

    #[test]
    fn let_binds_and_shadows() {
        assert_eq!(eval_str("(let ((x 10) (y 20)) x)"), Value::Integer(10));
    }

    #[test]
    fn letrec_mutual_recursion() {
        let src = "(letrec ((even? (n) (if (= n 0) #t (odd? (- n 1)))) (odd? (n) (if (= n 0) #f (even? (- n 1))))) (even? 10))";
        assert_eq!(eval_str(src), Value::Boolean(true));
    }

    #[test]
    fn tail_call_does_not_overflow_stack() {
        let src = "(letrec ((loop (n acc) (if (= n 0) acc (loop (- n 1) (+ acc 1))))) (loop 200000 0))";
        assert_eq!(eval_str(src), Value::Integer(200000));
    }

    #[test]
    fn unbound_name_is_an_error() {
        let (env, ctx) = test_context();
        let v = match read("nosuchthing").unwrap() {
            ReadResult::Form(v, _) => v,
            _ => panic!(),
        };
        let ast = parse_expr(&v).unwrap();
        assert!(eval(&ast, env, &ctx).is_err());
    }
}
