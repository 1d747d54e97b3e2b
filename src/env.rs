//! Lexical environment: a chain of frames, each holding a binding map and a
//! pointer to its enclosing frame. Every frame also shares a reference to
//! the module registry so qualified lookups (`Module::name`) and the
//! `config::lookup-path` search work from any depth.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RagnarokError;
use crate::value::Value;

pub type ModuleTable = Rc<RefCell<HashMap<String, Rc<Environment>>>>;

const MODULE_SEP: &str = "::";

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
    modules: ModuleTable,
}

impl Environment {
    /// A fresh, empty module table, used once at startup by the Ecosystem.
    pub fn new_module_table() -> ModuleTable {
        Rc::new(RefCell::new(HashMap::new()))
    }

    /// Builds a root (parentless) frame, as used for modules, shells, and
    /// buffers.
    pub fn root(bindings: HashMap<String, Value>, modules: ModuleTable) -> Rc<Environment> {
        Rc::new(Environment { bindings: RefCell::new(bindings), parent: None, modules })
    }

    /// Builds a child frame binding `names` to `values` in order; names
    /// beyond the supplied values are bound to `Nil`.
    pub fn layer(self: &Rc<Self>, names: &[String], values: Option<&[Value]>) -> Rc<Environment> {
        let mut bindings = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let v = match values {
                Some(vs) if i < vs.len() => vs[i].clone(),
                _ => Value::Nil,
            };
            bindings.insert(name.clone(), v);
        }
        Rc::new(Environment { bindings: RefCell::new(bindings), parent: Some(self.clone()), modules: self.modules.clone() })
    }

    /// Installs (or overwrites) a binding in this frame only.
    pub fn update(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    /// This frame's own bindings only, sorted by name. Used by the `env`
    /// shell primitive to report what's in scope; does not walk to parent
    /// frames.
    pub fn own_bindings(&self) -> Vec<(String, Value)> {
        let mut out: Vec<(String, Value)> = self.bindings.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Direct lookup in a named module's own bindings (no frame walk, no
    /// search path).
    pub fn lookup(&self, module: &str, name: &str) -> Result<Value, RagnarokError> {
        let modules = self.modules.borrow();
        let module_env = modules.get(module).ok_or_else(|| RagnarokError::UnknownModule(module.to_string()))?;
        module_env
            .bindings
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| RagnarokError::UnboundName(name.to_string()))
    }

    /// Resolves a name: qualified names (`Module::name`) go straight to
    /// `lookup`; unqualified names walk the frame chain, then fall back to
    /// `config::lookup-path`.
    pub fn find(&self, name: &str) -> Result<Value, RagnarokError> {
        if let Some(pos) = name.find(MODULE_SEP) {
            let module = &name[..pos];
            let rest = &name[pos + MODULE_SEP.len()..];
            if rest.contains(MODULE_SEP) {
                return Err(RagnarokError::UnboundName(name.to_string()));
            }
            return self.lookup(module, rest);
        }

        let mut current = self;
        loop {
            if let Some(v) = current.bindings.borrow().get(name) {
                return Ok(v.clone());
            }
            match &current.parent {
                Some(p) => current = p,
                None => break,
            }
        }

        // Unqualified miss: consult the search path.
        if let Ok(lookup_path) = self.lookup("config", "lookup-path") {
            if let Value::Reference(cell) = &lookup_path {
                let mut modules = cell.borrow().clone();
                loop {
                    match modules {
                        Value::Cons(cell) => {
                            if let Value::Symbol(module_name) = &cell.head {
                                if let Ok(v) = self.lookup(module_name, name) {
                                    return Ok(v);
                                }
                            }
                            modules = cell.tail.clone();
                        }
                        _ => break,
                    }
                }
            }
        }

        Err(RagnarokError::UnboundName(name.to_string()))
    }
}
