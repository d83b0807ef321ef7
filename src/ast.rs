use std::rc::Rc;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the constants that can appear directly in source
/// code. Array, object and function literals are separate [`Expr`] variants
/// because evaluating them allocates a fresh reference value each time.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A double-precision number.
    Number(f64),
    /// A string.
    Str(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Each variant models a distinct syntactic construct and carries the byte
/// offset (`pos`) of its first token, or of its operator for binary forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or `null`).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Byte offset in the source.
        pos:   usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Byte offset in the source.
        pos:  usize,
    },
    /// An array literal such as `[1, 2, x]`.
    ArrayLiteral {
        /// The element expressions in order.
        elements: Vec<Self>,
        /// Byte offset in the source.
        pos:      usize,
    },
    /// An object literal such as `{a: 1, "b": f}`.
    ObjectLiteral {
        /// Property names and their value expressions, in source order.
        properties: Vec<(String, Self)>,
        /// Byte offset in the source.
        pos:        usize,
    },
    /// A function expression, `function (a, b) { ... }`.
    Function(Rc<FunctionDef>),
    /// A prefix unary operation such as `-x` or `!x`.
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Byte offset in the source.
        pos:  usize,
    },
    /// `++x`, `x++`, `--x` or `x--`.
    Update {
        /// Whether the target is incremented or decremented.
        op:     UpdateOperator,
        /// `true` for the prefix form, which yields the new value.
        prefix: bool,
        /// The assignment target.
        target: Box<Self>,
        /// Byte offset in the source.
        pos:    usize,
    },
    /// A binary operation (arithmetic, bitwise, comparison or logical).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Byte offset of the operator.
        pos:   usize,
    },
    /// `condition ? then_expr : else_expr`.
    Conditional {
        /// The condition.
        condition: Box<Self>,
        /// Evaluated when the condition is truthy.
        then_expr: Box<Self>,
        /// Evaluated when the condition is falsy.
        else_expr: Box<Self>,
        /// Byte offset in the source.
        pos:       usize,
    },
    /// Plain (`op == None`) or compound assignment.
    Assign {
        /// The assignment target: a variable, index or member expression.
        target: Box<Self>,
        /// The binary operator of a compound assignment such as `+=`.
        op:     Option<BinaryOperator>,
        /// The right-hand side.
        value:  Box<Self>,
        /// Byte offset of the assignment operator.
        pos:    usize,
    },
    /// Comma-separated expressions; evaluates to the last one.
    Sequence {
        /// The expressions in evaluation order.
        expressions: Vec<Self>,
        /// Byte offset in the source.
        pos:         usize,
    },
    /// A call such as `f(a, b)` or `a.splice(0, 1)`.
    Call {
        /// The expression producing the function.
        callee:    Box<Self>,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Byte offset of the opening parenthesis.
        pos:       usize,
    },
    /// Computed member access, `object[index]`.
    Index {
        /// The indexed value.
        object: Box<Self>,
        /// The index or key expression.
        index:  Box<Self>,
        /// Byte offset of the opening bracket.
        pos:    usize,
    },
    /// Named member access, `object.property`.
    Member {
        /// The accessed value.
        object:   Box<Self>,
        /// The property name.
        property: String,
        /// Byte offset of the dot.
        pos:      usize,
    },
}

impl Expr {
    /// Returns the byte offset associated with this expression.
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Self::Literal { pos, .. }
            | Self::Variable { pos, .. }
            | Self::ArrayLiteral { pos, .. }
            | Self::ObjectLiteral { pos, .. }
            | Self::UnaryOp { pos, .. }
            | Self::Update { pos, .. }
            | Self::BinaryOp { pos, .. }
            | Self::Conditional { pos, .. }
            | Self::Assign { pos, .. }
            | Self::Sequence { pos, .. }
            | Self::Call { pos, .. }
            | Self::Index { pos, .. }
            | Self::Member { pos, .. } => *pos,
            Self::Function(def) => def.pos,
        }
    }

    /// Whether this expression may appear on the left of `=` or be updated
    /// with `++`/`--`.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(self,
                 Self::Variable { .. } | Self::Index { .. } | Self::Member { .. })
    }
}

/// A prefix unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-x`
    Negate,
    /// `+x`
    Plus,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `typeof x`
    Typeof,
    /// `void x`
    Void,
}

/// `++` or `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `>>>`
    UnsignedShiftRight,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`, short-circuiting.
    And,
    /// `||`, short-circuiting.
    Or,
}

/// A function definition shared by declarations and function expressions.
///
/// Definitions are reference counted so that every closure created from the
/// same source shares one parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name; `None` for anonymous function expressions.
    pub name:   Option<String>,
    /// Parameter names in order.
    pub params: Vec<String>,
    /// The statements of the body.
    pub body:   Vec<Statement>,
    /// Byte offset of the `function` keyword.
    pub pos:    usize,
}

/// One `case` (or the `default`) label of a `switch` together with the
/// statements that follow it up to the next label.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// The case value; `None` marks the `default` label.
    pub test: Option<Expr>,
    /// Statements following the label.
    pub body: Vec<Statement>,
}

/// The `catch` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The name bound to the caught value, if any.
    pub param: Option<String>,
    /// The handler statements.
    pub body:  Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `;` on its own.
    Empty,
    /// `var a = 1, b;`; each declarator has an optional initializer.
    VarDeclaration {
        /// Declared names and their initializers.
        declarations: Vec<(String, Option<Expr>)>,
        /// Byte offset in the source.
        pos:          usize,
    },
    /// A named function declaration inside a body; hoisted at call time.
    FunctionDeclaration(Rc<FunctionDef>),
    /// An expression evaluated for its side effects.
    Expression {
        /// The expression.
        expr: Expr,
        /// Byte offset in the source.
        pos:  usize,
    },
    /// `return` with an optional value.
    Return {
        /// The returned expression; `None` returns `undefined`.
        value: Option<Expr>,
        /// Byte offset in the source.
        pos:   usize,
    },
    /// `if (condition) then_branch else else_branch`.
    If {
        /// The condition.
        condition:   Expr,
        /// Executed when the condition is truthy.
        then_branch: Box<Self>,
        /// Executed otherwise, if present.
        else_branch: Option<Box<Self>>,
        /// Byte offset in the source.
        pos:         usize,
    },
    /// `for (init; condition; update) body`.
    For {
        /// Runs once before the loop.
        init:      Option<Box<Self>>,
        /// Checked before each iteration; absent means always true.
        condition: Option<Expr>,
        /// Runs after each iteration, including after `continue`.
        update:    Option<Expr>,
        /// The loop body.
        body:      Box<Self>,
        /// Byte offset in the source.
        pos:       usize,
    },
    /// `while (condition) body`.
    While {
        /// Checked before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Byte offset in the source.
        pos:       usize,
    },
    /// `do body while (condition)`.
    DoWhile {
        /// The loop body; runs at least once.
        body:      Box<Self>,
        /// Checked after each iteration.
        condition: Expr,
        /// Byte offset in the source.
        pos:       usize,
    },
    /// `break`.
    Break {
        /// Byte offset in the source.
        pos: usize,
    },
    /// `continue`.
    Continue {
        /// Byte offset in the source.
        pos: usize,
    },
    /// `switch (discriminant) { case ...: ... default: ... }`.
    Switch {
        /// The value compared against every case.
        discriminant: Expr,
        /// Labels in source order.
        cases:        Vec<SwitchCase>,
        /// Byte offset in the source.
        pos:          usize,
    },
    /// `try { ... } catch (e) { ... } finally { ... }`.
    Try {
        /// The protected statements.
        block:     Vec<Self>,
        /// The handler, if any.
        handler:   Option<CatchClause>,
        /// Statements that always run afterwards, if any.
        finalizer: Option<Vec<Self>>,
        /// Byte offset in the source.
        pos:       usize,
    },
    /// `throw value`.
    Throw {
        /// The thrown expression.
        value: Expr,
        /// Byte offset in the source.
        pos:   usize,
    },
    /// `{ ... }`; introduces no scope.
    Block {
        /// The statements of the block.
        statements: Vec<Self>,
        /// Byte offset in the source.
        pos:        usize,
    },
}
