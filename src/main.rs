mod ast;
mod builtins;
mod config;
mod context;
mod ecosystem;
mod env;
mod error;
mod eval;
mod parser;
mod reader;
mod value;

use std::cell::RefCell;
use std::rc::Rc;

use ast::{Ast, DefKind};
use clap::Parser as ClapParser;
use config::{VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use context::Context;
use ecosystem::Ecosystem;
use env::Environment;
use error::RagnarokError;
use eval::eval;
use parser::{parse_def, parse_expr};
use reader::{read, ReadResult};
use rustyline::error::ReadlineError;
use rustyline::{Config as RlConfig, Editor};
use std::path::PathBuf;
use value::Value;

const HISTORY_FILE: &str = ".ragnarok_history";
const HOME_MODULE: &str = "*1*";

/// An interactive interpreter for the Ragnarok Lisp dialect.
#[derive(ClapParser, Debug)]
#[command(name = "ragnarok")]
#[command(version = VERSION)]
#[command(about = "An interactive interpreter for the Ragnarok Lisp dialect")]
struct CliArgs {
    /// Script file to execute (omit to start the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn bootstrap() -> (Rc<Ecosystem>, Rc<Environment>) {
    let ecosystem = Ecosystem::new();
    ecosystem.add_module("core", builtins::core_bindings());
    ecosystem.add_module("string", builtins::string_bindings());
    ecosystem.add_module("config", config::config_bindings());
    let shell_env = ecosystem.add_shell(HOME_MODULE, builtins::shell_bindings());
    (ecosystem, shell_env)
}

fn make_context(ecosystem: Rc<Ecosystem>, env: Rc<Environment>) -> Context {
    Context {
        home_module: HOME_MODULE.to_string(),
        current_module: RefCell::new(HOME_MODULE.to_string()),
        next_current_module: RefCell::new(None),
        ecosystem,
        current_env: RefCell::new(env),
        report: Box::new(|line: &str| println!("{}", line)),
        bail: Box::new(|| std::process::exit(0)),
        read_all: Box::new(|src: &str, ctx: &Context| read_all(src, ctx)),
    }
}

/// Reads every top-level form out of `src` in order and evaluates each
/// against `ctx`'s current environment, bailing out on the first error
/// (already-evaluated forms keep their effect).
fn read_all(src: &str, ctx: &Context) -> Result<(), RagnarokError> {
    let mut remaining = src;
    loop {
        match read(remaining)? {
            ReadResult::Done => return Ok(()),
            ReadResult::Incomplete => return Err(RagnarokError::ReadError("incomplete form".to_string())),
            ReadResult::Form(sexp, rest) => {
                eval_top_level(&sexp, ctx)?;
                remaining = rest;
            }
        }
    }
}

/// The outcome of evaluating one top-level form: a `def` echoes its name,
/// anything else echoes its result value (unless `Nil`).
enum TopLevel {
    Def(String),
    Value(Value),
}

fn eval_top_level(sexp: &Value, ctx: &Context) -> Result<TopLevel, RagnarokError> {
    let env = ctx.current_env.borrow().clone();
    if let Some(def) = parse_def(sexp)? {
        let name = def.name.clone();
        match def.kind {
            DefKind::Value => {
                let value = eval(&def.body, env.clone(), ctx)?;
                env.update(&def.name, value);
            }
            DefKind::Function => {
                let f = Value::Function(Rc::new(value::Function {
                    params: def.params.clone(),
                    body: Rc::new(def.body),
                    env: env.clone(),
                }));
                env.update(&def.name, f);
            }
        }
        return Ok(TopLevel::Def(name));
    }
    let ast: Ast = parse_expr(sexp)?;
    Ok(TopLevel::Value(eval(&ast, env, ctx)?))
}

fn run_script(path: &PathBuf, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    read_all(&source, ctx)?;
    Ok(())
}

fn run_repl(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    let rl_config = RlConfig::builder().auto_add_history(true).build();
    let mut rl = Editor::<(), rustyline::history::DefaultHistory>::with_config(rl_config)?;
    let _ = rl.load_history(HISTORY_FILE);

    let mut buffer = String::new();
    loop {
        ctx.apply_pending_switch().ok();
        let module = ctx.current_module.borrow().clone();
        let prompt = if buffer.is_empty() {
            format!("{} | ", module)
        } else {
            format!("{:width$} | ", "", width = module.len())
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() && buffer.is_empty() {
                    continue;
                }
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);

                match read(&buffer) {
                    Ok(ReadResult::Form(sexp, rest)) => {
                        buffer = rest.to_string();
                        match eval_top_level(&sexp, ctx) {
                            Ok(TopLevel::Def(name)) => println!(";; {}", name),
                            Ok(TopLevel::Value(v)) => {
                                if !v.is_nil() {
                                    println!("{}", v);
                                }
                            }
                            Err(RagnarokError::ParseError(msg)) => println!("PARSE ERROR - {}", msg),
                            Err(e) => println!("EVAL ERROR - {}", e),
                        }
                        ctx.apply_pending_switch().ok();
                    }
                    Ok(ReadResult::Incomplete) => {
                        // keep accumulating
                    }
                    Ok(ReadResult::Done) => {
                        buffer.clear();
                    }
                    Err(e) => {
                        println!("READ ERROR - {}", e);
                        buffer.clear();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => {
                if !buffer.trim().is_empty() {
                    println!("EVAL ERROR - Use (quit) to bail out.");
                }
                break;
            }
            Err(err) => {
                println!("READ ERROR - {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let (ecosystem, env) = bootstrap();
    let ctx = make_context(ecosystem, env);

    if let Some(script) = &args.script {
        run_script(script, &ctx)?;
        return Ok(());
    }

    run_repl(&ctx)?;
    Ok(())
}
