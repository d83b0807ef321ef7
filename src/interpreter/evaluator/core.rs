use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        program::{GlobalDefinition, Program},
        value::{core::Value, environment::Environment, function::JsFunction},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The outcome of executing a statement.
///
/// Anything other than `Normal` unwinds the enclosing statements until a
/// construct that handles it: loops absorb `Break` and `Continue`, `switch`
/// absorbs `Break`, and a function call turns `Return` into its result.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the current function with a value.
    Return(Value),
    /// Leave the innermost loop or `switch`.
    Break,
    /// Skip to the next iteration of the innermost loop.
    Continue,
}

/// Stores the runtime evaluation context.
///
/// A `Context` lives for one host call. It holds the program, whose
/// top-level definitions are resolved lazily into the global scope, and the
/// current depth of script calls.
///
/// ## Usage
///
/// All evaluation methods take the scope to evaluate in explicitly; the
/// context itself holds only what is shared by every scope of the call.
pub struct Context {
    program:        Rc<Program>,
    globals:        Rc<Environment>,
    max_call_depth: usize,
    pub(crate) depth: usize,
}

impl Context {
    /// Creates a context over a program and its global scope.
    #[must_use]
    pub const fn new(program: Rc<Program>, globals: Rc<Environment>, max_call_depth: usize) -> Self {
        Self { program,
               globals,
               max_call_depth,
               depth: 0 }
    }

    /// The configured limit on nested script calls.
    #[must_use]
    pub const fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression variant; operators, assignments and calls
    /// are handled in their own modules.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `env`: Scope to resolve names in.
    pub fn eval(&mut self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.into()),
            Expr::Variable { name, pos } => self.lookup(name, env, *pos),
            Expr::ArrayLiteral { elements, .. } => {
                let items = elements.iter()
                                    .map(|element| self.eval(element, env))
                                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(items.into())
            },
            Expr::ObjectLiteral { properties, .. } => self.eval_object_literal(properties, env),
            Expr::Function(def) => Ok(JsFunction::closure(Rc::clone(def), Rc::clone(env))),
            Expr::UnaryOp { op, expr, pos } => self.eval_unary_op(*op, expr, env, *pos),
            Expr::Update { op,
                           prefix,
                           target,
                           pos, } => self.eval_update(*op, *prefix, target, env, *pos),
            Expr::BinaryOp { left, op, right, pos } => self.eval_binary_op(left, *op, right, env, *pos),
            Expr::Conditional { condition,
                                then_expr,
                                else_expr,
                                .. } => {
                if self.eval(condition, env)?.is_truthy() {
                    self.eval(then_expr, env)
                } else {
                    self.eval(else_expr, env)
                }
            },
            Expr::Assign { target,
                           op,
                           value,
                           pos, } => self.eval_assign(target, *op, value, env, *pos),
            Expr::Sequence { expressions, .. } => {
                let mut last = Value::Undefined;
                for expr in expressions {
                    last = self.eval(expr, env)?;
                }
                Ok(last)
            },
            Expr::Call { callee,
                         arguments,
                         pos, } => self.eval_call(callee, arguments, env, *pos),
            Expr::Index { object, index, pos } => {
                let object = self.eval(object, env)?;
                let key = self.eval(index, env)?;
                Self::get_property(&object, &key, *pos)
            },
            Expr::Member { object,
                           property,
                           pos, } => {
                let object = self.eval(object, env)?;
                Self::get_property(&object, &Value::from(property.as_str()), *pos)
            },
        }
    }

    /// Executes a single statement.
    ///
    /// # Returns
    /// The [`Flow`] signal the statement produced.
    pub fn exec(&mut self, statement: &Statement, env: &Rc<Environment>) -> EvalResult<Flow> {
        match statement {
            // Function declarations are bound when the enclosing call starts.
            Statement::Empty | Statement::FunctionDeclaration(_) => Ok(Flow::Normal),
            Statement::VarDeclaration { declarations, .. } => {
                for (name, init) in declarations {
                    match init {
                        Some(init) => {
                            let value = self.eval(init, env)?;
                            env.declare_var(name, value);
                        },
                        None => env.declare_var_if_absent(name),
                    }
                }
                Ok(Flow::Normal)
            },
            Statement::Expression { expr, .. } => {
                self.eval(expr, env)?;
                Ok(Flow::Normal)
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval(condition, env)?.is_truthy() {
                    self.exec(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch, env)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::For { init,
                             condition,
                             update,
                             body,
                             .. } => {
                self.exec_for(init.as_deref(), condition.as_ref(), update.as_ref(), body, env)
            },
            Statement::While { condition, body, .. } => self.exec_while(condition, body, env),
            Statement::DoWhile { body, condition, .. } => self.exec_do_while(body, condition, env),
            Statement::Break { .. } => Ok(Flow::Break),
            Statement::Continue { .. } => Ok(Flow::Continue),
            Statement::Switch { discriminant, cases, .. } => self.exec_switch(discriminant, cases, env),
            Statement::Try { block,
                             handler,
                             finalizer,
                             .. } => self.exec_try(block, handler.as_ref(), finalizer.as_deref(), env),
            Statement::Throw { value, pos } => {
                let value = self.eval(value, env)?;
                Err(RuntimeError::Thrown { value, pos: *pos })
            },
            Statement::Block { statements, .. } => self.exec_block(statements, env),
        }
    }

    /// Executes statements in order, stopping at the first signal other than
    /// [`Flow::Normal`] and passing it on.
    pub fn exec_block(&mut self, statements: &[Statement], env: &Rc<Environment>) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec(statement, env)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Reads a variable.
    ///
    /// Names missing from the scope chain are looked up among the program's
    /// top-level definitions before giving up.
    ///
    /// # Errors
    /// [`RuntimeError::ReferenceError`] if the name is defined nowhere.
    pub fn lookup(&mut self, name: &str, env: &Rc<Environment>, pos: usize) -> EvalResult<Value> {
        if let Some(value) = env.get(name) {
            return Ok(value);
        }
        self.resolve_global(name)?
            .ok_or_else(|| RuntimeError::ReferenceError { name: name.to_string(),
                                                          pos })
    }

    /// Binds a top-level definition of `name` into the global scope.
    ///
    /// A function declaration is bound to a closure over the global scope. A
    /// top-level statement that assigns the name is run once, after which the
    /// name is looked up again; function declarations parsed along with it
    /// are bound first.
    ///
    /// # Returns
    /// `Ok(None)` if the program does not define the name.
    pub fn resolve_global(&mut self, name: &str) -> EvalResult<Option<Value>> {
        match self.program.resolve(name)? {
            None => Ok(None),
            Some(GlobalDefinition::Function(def)) => {
                let function = JsFunction::closure(def, Rc::clone(&self.globals));
                self.globals.define(name, function.clone());
                Ok(Some(function))
            },
            Some(GlobalDefinition::Statements(statements)) => {
                let globals = Rc::clone(&self.globals);
                for statement in &statements {
                    if let Statement::FunctionDeclaration(def) = statement
                       && let Some(name) = &def.name
                    {
                        globals.define(name, JsFunction::closure(Rc::clone(def), Rc::clone(&globals)));
                    }
                }
                self.exec_block(&statements, &globals)?;
                Ok(globals.get(name))
            },
        }
    }

    fn eval_object_literal(&mut self,
                           properties: &[(String, Expr)],
                           env: &Rc<Environment>)
                           -> EvalResult<Value> {
        let object = Value::object(Vec::with_capacity(properties.len()));
        for (key, expr) in properties {
            let value = self.eval(expr, env)?;
            Self::set_property(&object, &Value::from(key.as_str()), value, expr.pos())?;
        }
        Ok(object)
    }
}
