//! The uniform polymorphic Value type: every Ragnarok datum is one of these
//! variants. Kind predicates, Display (the REPL's print form), and equality
//! live here rather than spread across the evaluator.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Ast;
use crate::env::Environment;

/// A cons cell. Lists are chains of these terminated by `Value::Empty`.
#[derive(Debug)]
pub struct ConsCell {
    pub head: Value,
    pub tail: Value,
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(Rc<String>),
    Symbol(Rc<String>),
    Empty,
    Cons(Rc<ConsCell>),
    Nil,
    Reference(Rc<RefCell<Value>>),
    Array(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<HashMap<String, Value>>>),
    Primitive(Rc<Primitive>),
    Function(Rc<Function>),
}

pub struct Primitive {
    pub name: String,
    pub id: u64,
    pub min_args: usize,
    pub max_args: Option<usize>,
    pub func: Box<dyn Fn(&str, &[Value], &crate::context::Context) -> Result<Value, crate::error::RagnarokError>>,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive").field("name", &self.name).field("id", &self.id).finish()
    }
}

#[derive(Debug)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Rc<Ast>,
    pub env: Rc<Environment>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::new(s.into()))
    }

    pub fn symbol(s: impl Into<String>) -> Value {
        Value::Symbol(Rc::new(s.into()))
    }

    pub fn cons(head: Value, tail: Value) -> Value {
        Value::Cons(Rc::new(ConsCell { head, tail }))
    }

    pub fn reference(v: Value) -> Value {
        Value::Reference(Rc::new(RefCell::new(v)))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn dict(entries: HashMap<String, Value>) -> Value {
        Value::Dict(Rc::new(RefCell::new(entries)))
    }

    /// Builds a proper list from a Rust vector, right to left.
    pub fn list(items: Vec<Value>) -> Value {
        items.into_iter().rev().fold(Value::Empty, |tail, head| Value::cons(head, tail))
    }

    pub fn is_true(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) => true,
            Value::Empty => false,
            Value::Cons(_) => true,
            Value::Nil => false,
            Value::Reference(_) => false,
            Value::Array(_) => false,
            Value::Dict(_) => false,
            Value::Primitive(_) => true,
            Value::Function(_) => true,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Empty => "empty",
            Value::Cons(_) => "cons",
            Value::Nil => "nil",
            Value::Reference(_) => "ref",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Primitive(_) => "function",
            Value::Function(_) => "function",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_cons(&self) -> bool {
        matches!(self, Value::Cons(_))
    }

    pub fn is_list(&self) -> bool {
        self.is_cons() || self.is_empty()
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Primitive(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_dict(&self) -> bool {
        matches!(self, Value::Dict(_))
    }

    /// Unchecked accessor. Callers must have already checked `is_number`;
    /// calling this on any other kind is an implementer error.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Integer(n) => *n,
            other => panic!("unchecked access to integer on {}", other.kind_name()),
        }
    }

    /// Unchecked accessor, see `as_int`.
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(s) => s,
            Value::Symbol(s) => s,
            other => panic!("unchecked access to string on {}", other.kind_name()),
        }
    }

    /// Unchecked accessor, see `as_int`.
    pub fn head(&self) -> Value {
        match self {
            Value::Cons(cell) => cell.head.clone(),
            other => panic!("unchecked access to cons head on {}", other.kind_name()),
        }
    }

    /// Unchecked accessor, see `as_int`.
    pub fn tail(&self) -> Value {
        match self {
            Value::Cons(cell) => cell.tail.clone(),
            other => panic!("unchecked access to cons tail on {}", other.kind_name()),
        }
    }

    /// Collects a proper list into a Vec; fails if the tail doesn't
    /// terminate in Empty.
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        let mut out = Vec::new();
        let mut current = self.clone();
        loop {
            match current {
                Value::Empty => return Some(out),
                Value::Cons(cell) => {
                    out.push(cell.head.clone());
                    current = cell.tail.clone();
                }
                _ => return None,
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Empty, Value::Empty) => true,
            (Value::Nil, Value::Nil) => true,
            (Value::Cons(a), Value::Cons(b)) => a.head == b.head && a.tail == b.tail,
            (Value::Reference(a), Value::Reference(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Primitive(a), Value::Primitive(b)) => a.id == b.id,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Empty => write!(f, "()"),
            Value::Nil => write!(f, "#nil"),
            Value::Cons(_) => {
                write!(f, "(")?;
                let mut current = self.clone();
                let mut first = true;
                loop {
                    match current {
                        Value::Cons(cell) => {
                            if !first {
                                write!(f, " ")?;
                            }
                            write!(f, "{}", cell.head)?;
                            first = false;
                            current = cell.tail.clone();
                        }
                        Value::Empty => break,
                        improper => {
                            write!(f, " <{}>", improper)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Reference(cell) => write!(f, "#<ref {}>", cell.borrow()),
            Value::Array(items) => {
                write!(f, "#[")?;
                for (i, v) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Dict(entries) => {
                write!(f, "#(")?;
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({} {})", k, v)?;
                }
                write!(f, ")")
            }
            Value::Primitive(p) => write!(f, "#[prim {}]", p.name),
            Value::Function(_) => write!(f, "#<fun>"),
        }
    }
}
