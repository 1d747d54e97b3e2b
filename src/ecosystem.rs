//! The Ecosystem: a flat registry of named top-level environments, split
//! into modules, shells, and buffers by intended lifetime. Only `modules`
//! is reachable through qualified (`M::name`) lookup; all three share one
//! namespace for `get`/switching purposes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::env::{Environment, ModuleTable};
use crate::value::Value;

pub struct Ecosystem {
    modules: ModuleTable,
    shells: RefCell<HashMap<String, Rc<Environment>>>,
    buffers: RefCell<HashMap<String, Rc<Environment>>>,
}

impl Ecosystem {
    pub fn new() -> Rc<Ecosystem> {
        Rc::new(Ecosystem {
            modules: Environment::new_module_table(),
            shells: RefCell::new(HashMap::new()),
            buffers: RefCell::new(HashMap::new()),
        })
    }

    pub fn add_module(&self, name: &str, bindings: HashMap<String, Value>) -> Rc<Environment> {
        let env = Environment::root(bindings, self.modules.clone());
        self.modules.borrow_mut().insert(name.to_string(), env.clone());
        env
    }

    pub fn add_shell(&self, name: &str, bindings: HashMap<String, Value>) -> Rc<Environment> {
        let env = Environment::root(bindings, self.modules.clone());
        self.shells.borrow_mut().insert(name.to_string(), env.clone());
        env
    }

    pub fn add_buffer(&self, name: &str, bindings: HashMap<String, Value>) -> Rc<Environment> {
        let env = Environment::root(bindings, self.modules.clone());
        self.buffers.borrow_mut().insert(name.to_string(), env.clone());
        env
    }

    /// Tries modules, then shells, then buffers, in that order.
    pub fn get(&self, name: &str) -> Option<Rc<Environment>> {
        if let Some(env) = self.modules.borrow().get(name) {
            return Some(env.clone());
        }
        if let Some(env) = self.shells.borrow().get(name) {
            return Some(env.clone());
        }
        if let Some(env) = self.buffers.borrow().get(name) {
            return Some(env.clone());
        }
        None
    }

    /// Names of the registered modules only (used by the `modules`
    /// primitive), in arbitrary order.
    pub fn module_names(&self) -> Vec<String> {
        self.modules.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_tries_all_three_categories() {
        let eco = Ecosystem::new();
        eco.add_module("core", HashMap::new());
        eco.add_shell("*1*", HashMap::new());
        eco.add_buffer("scratch", HashMap::new());
        assert!(eco.get("core").is_some());
        assert!(eco.get("*1*").is_some());
        assert!(eco.get("scratch").is_some());
        assert!(eco.get("nope").is_none());
    }

    #[test]
    fn module_names_excludes_shells_and_buffers() {
        let eco = Ecosystem::new();
        eco.add_module("core", HashMap::new());
        eco.add_shell("*1*", HashMap::new());
        let names = eco.module_names();
        assert_eq!(names, vec!["core".to_string()]);
    }
}
