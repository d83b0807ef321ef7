use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A variable scope: a mapping from names to values with a link to the
/// enclosing scope.
///
/// Only the global scope and function call frames are *function scopes*;
/// `var` declarations bind there. The scope created for a `catch` parameter
/// is not, so a `var` inside a catch block still lands in the enclosing
/// function.
///
/// Scopes are shared through `Rc` because closures keep their defining scope
/// alive after the call that created it has returned.
pub struct Environment {
    vars:              RefCell<HashMap<String, Value>>,
    parent:            Option<Rc<Self>>,
    is_function_scope: bool,
}

impl Environment {
    /// Creates an empty global scope.
    #[must_use]
    pub fn global() -> Rc<Self> {
        Rc::new(Self { vars:              RefCell::new(HashMap::new()),
                       parent:            None,
                       is_function_scope: true, })
    }

    /// Creates a call frame whose parent is `parent`.
    #[must_use]
    pub fn function_scope(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { vars:              RefCell::new(HashMap::new()),
                       parent:            Some(Rc::clone(parent)),
                       is_function_scope: true, })
    }

    /// Creates a nested scope that `var` declarations pass through.
    #[must_use]
    pub fn block_scope(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { vars:              RefCell::new(HashMap::new()),
                       parent:            Some(Rc::clone(parent)),
                       is_function_scope: false, })
    }

    /// Looks a name up along the scope chain.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.vars.borrow_mut().insert(name.to_string(), value);
    }

    /// Binds `name` in the nearest function scope, as `var` does.
    pub fn declare_var(&self, name: &str, value: Value) {
        match &self.parent {
            Some(parent) if !self.is_function_scope => parent.declare_var(name, value),
            _ => self.define(name, value),
        }
    }

    /// Binds `name` in the nearest function scope unless that scope already
    /// has it. Used for hoisting, where a parameter of the same name must
    /// keep its argument.
    pub fn declare_var_if_absent(&self, name: &str) {
        match &self.parent {
            Some(parent) if !self.is_function_scope => parent.declare_var_if_absent(name),
            _ => {
                self.vars
                    .borrow_mut()
                    .entry(name.to_string())
                    .or_insert(Value::Undefined);
            },
        }
    }

    /// Assigns to the nearest existing binding of `name`.
    ///
    /// An assignment to a name bound nowhere creates it in the global scope.
    pub fn assign(&self, name: &str, value: Value) {
        if let Some(slot) = self.vars.borrow_mut().get_mut(name) {
            *slot = value;
            return;
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => self.define(name, value),
        }
    }

    /// Whether `name` is bound anywhere along the chain.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
        || self.parent.as_ref().is_some_and(|parent| parent.contains(name))
    }
}

impl std::fmt::Debug for Environment {
    // Values may hold closures over this scope, so only the names are shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.vars.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Environment")
         .field("names", &names)
         .field("is_function_scope", &self.is_function_scope)
         .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_walk_outward() {
        let global = Environment::global();
        global.define("a", Value::from(1));
        let frame = Environment::function_scope(&global);
        frame.define("b", Value::from(2));

        assert_eq!(frame.get("a"), Some(Value::from(1)));
        assert_eq!(frame.get("b"), Some(Value::from(2)));
        assert_eq!(global.get("b"), None);
    }

    #[test]
    fn var_skips_block_scopes() {
        let global = Environment::global();
        let frame = Environment::function_scope(&global);
        let block = Environment::block_scope(&frame);
        block.declare_var("x", Value::from(3));

        assert!(frame.contains("x"));
        assert!(!global.contains("x"));
    }

    #[test]
    fn assignment_updates_nearest_binding_or_falls_back_to_global() {
        let global = Environment::global();
        global.define("a", Value::from(1));
        let frame = Environment::function_scope(&global);
        frame.define("a", Value::from(2));

        frame.assign("a", Value::from(5));
        frame.assign("fresh", Value::from(7));

        assert_eq!(global.get("a"), Some(Value::from(1)));
        assert_eq!(frame.get("a"), Some(Value::from(5)));
        assert_eq!(global.get("fresh"), Some(Value::from(7)));
    }

    #[test]
    fn hoisting_keeps_parameters() {
        let global = Environment::global();
        let frame = Environment::function_scope(&global);
        frame.define("p", Value::from(4));
        frame.declare_var_if_absent("p");
        frame.declare_var_if_absent("q");

        assert_eq!(frame.get("p"), Some(Value::from(4)));
        assert_eq!(frame.get("q"), Some(Value::Undefined));
    }
}
