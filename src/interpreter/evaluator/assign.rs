use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, environment::Environment},
    },
};

/// A resolved assignment target.
///
/// The object and key of a property target are evaluated exactly once, so
/// `a[i++] += 1` reads and writes the same element.
#[derive(Debug)]
pub enum Place {
    /// A variable, by name.
    Variable(String),
    /// A property of an array, object or primitive.
    Property(Value, Value),
}

impl Context {
    /// Evaluates `target = value` or a compound assignment such as `target += value`.
    ///
    /// For a compound assignment the target's current value is read before
    /// the right-hand side is evaluated.
    ///
    /// # Returns
    /// The value stored.
    pub fn eval_assign(&mut self,
                       target: &Expr,
                       op: Option<BinaryOperator>,
                       value: &Expr,
                       env: &Rc<Environment>,
                       pos: usize)
                       -> EvalResult<Value> {
        let place = self.resolve_place(target, env)?;
        let new = match op {
            Some(op) => {
                let current = self.read_place(&place, env, pos)?;
                let rhs = self.eval(value, env)?;
                Self::apply_binary(op, &current, &rhs)
            },
            None => self.eval(value, env)?,
        };
        self.write_place(&place, new.clone(), env, pos)?;
        Ok(new)
    }

    /// Evaluates the parts of an assignment target.
    ///
    /// # Errors
    /// [`RuntimeError::TypeError`] if `target` cannot be assigned to.
    pub fn resolve_place(&mut self, target: &Expr, env: &Rc<Environment>) -> EvalResult<Place> {
        match target {
            Expr::Variable { name, .. } => Ok(Place::Variable(name.clone())),
            Expr::Index { object, index, .. } => {
                let object = self.eval(object, env)?;
                let key = self.eval(index, env)?;
                Ok(Place::Property(object, key))
            },
            Expr::Member { object, property, .. } => {
                let object = self.eval(object, env)?;
                Ok(Place::Property(object, Value::from(property.as_str())))
            },
            other => Err(RuntimeError::type_error("Invalid assignment target", other.pos())),
        }
    }

    /// Reads the current value of a resolved target.
    pub fn read_place(&mut self, place: &Place, env: &Rc<Environment>, pos: usize) -> EvalResult<Value> {
        match place {
            Place::Variable(name) => self.lookup(name, env, pos),
            Place::Property(object, key) => Self::get_property(object, key, pos),
        }
    }

    /// Stores a value into a resolved target.
    ///
    /// A variable bound nowhere in the scope chain is first looked up among
    /// the program's pending top-level definitions, so that running one later
    /// cannot overwrite the value stored here. If it is still unbound the
    /// assignment creates a global.
    pub fn write_place(&mut self,
                       place: &Place,
                       value: Value,
                       env: &Rc<Environment>,
                       pos: usize)
                       -> EvalResult<()> {
        match place {
            Place::Variable(name) => {
                if !env.contains(name) {
                    self.resolve_global(name)?;
                }
                env.assign(name, value);
                Ok(())
            },
            Place::Property(object, key) => Self::set_property(object, key, value, pos),
        }
    }
}
