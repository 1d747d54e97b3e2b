//! AST node definitions produced by the parser and consumed by the
//! trampoline evaluator.

use std::rc::Rc;

use crate::value::Value;

#[derive(Debug)]
pub enum Ast {
    Literal(Value),
    Id(String),
    If(Rc<Ast>, Rc<Ast>, Rc<Ast>),
    Apply(Rc<Ast>, Vec<Ast>),
    Quote(Value),
    LetRec {
        names: Vec<String>,
        params: Vec<Vec<String>>,
        bodies: Vec<Rc<Ast>>,
        body: Rc<Ast>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Value,
    Function,
}

#[derive(Debug)]
pub struct Def {
    pub name: String,
    pub kind: DefKind,
    pub params: Vec<String>,
    pub body: Ast,
}
