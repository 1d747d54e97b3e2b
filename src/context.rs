//! The host context passed alongside `env` to every primitive: module
//! identity, the switch-module protocol, and the three host-effect
//! callbacks (`report`, `bail`, `read_all`).

use std::cell::RefCell;
use std::rc::Rc;

use crate::ecosystem::Ecosystem;
use crate::env::Environment;
use crate::error::RagnarokError;

pub struct Context {
    pub home_module: String,
    pub current_module: RefCell<String>,
    pub next_current_module: RefCell<Option<String>>,
    pub ecosystem: Rc<Ecosystem>,
    pub current_env: RefCell<Rc<Environment>>,
    pub report: Box<dyn Fn(&str)>,
    pub bail: Box<dyn Fn()>,
    pub read_all: Box<dyn Fn(&str, &Context) -> Result<(), RagnarokError>>,
}

impl Context {
    /// Stages a module switch; takes effect the next time
    /// `apply_pending_switch` runs (between REPL iterations).
    pub fn request_switch(&self, module: String) {
        *self.next_current_module.borrow_mut() = Some(module);
    }

    /// Applies a staged module switch, if any. Switching to a nonexistent
    /// target fails without changing any state.
    pub fn apply_pending_switch(&self) -> Result<(), RagnarokError> {
        let target = self.next_current_module.borrow_mut().take();
        let Some(target) = target else { return Ok(()) };
        match self.ecosystem.get(&target) {
            Some(env) => {
                *self.current_module.borrow_mut() = target;
                *self.current_env.borrow_mut() = env;
                Ok(())
            }
            None => Err(RagnarokError::UnknownModule(target)),
        }
    }
}
