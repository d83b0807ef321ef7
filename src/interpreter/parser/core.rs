use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{BinaryOperator, Expr, FunctionDef, Statement},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{binary::parse_conditional, block::parse_statements, statement::parse_function},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression, including the comma operator.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level and recursively descends through the precedence
/// hierarchy. A comma-separated list produces an [`Expr::Sequence`]; a single
/// operand is returned unchanged.
///
/// Grammar: `expression := assignment ("," assignment)*`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, offset)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let first = parse_assignment(tokens)?;
    if !matches!(tokens.peek(), Some((Token::Comma, _))) {
        return Ok(first);
    }

    let pos = first.pos();
    let mut expressions = vec![first];
    while let Some((Token::Comma, _)) = tokens.peek() {
        tokens.next();
        expressions.push(parse_assignment(tokens)?);
    }

    Ok(Expr::Sequence { expressions,
                        pos })
}

/// Parses an assignment expression.
///
/// Assignment is right-associative, so `a = b = 1` parses as `a = (b = 1)`.
/// Compound operators keep their binary operator in the `op` field of
/// [`Expr::Assign`].
///
/// Grammar: `assignment := conditional (assign_op assignment)?`
///
/// # Errors
/// Returns [`ParseError::InvalidAssignmentTarget`] when the left-hand side is
/// not a variable, index or member expression.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let target = parse_conditional(tokens)?;

    if let Some((token, pos)) = tokens.peek()
       && let Some(op) = assignment_operator(token)
    {
        tokens.next();
        if !target.is_assignable() {
            return Err(ParseError::InvalidAssignmentTarget { pos: *pos });
        }
        let value = parse_assignment(tokens)?;
        return Ok(Expr::Assign { target: Box::new(target),
                                 op,
                                 value: Box::new(value),
                                 pos: *pos });
    }

    Ok(target)
}

/// Maps an assignment token to its compound operator.
///
/// Returns `Some(None)` for plain `=`, `Some(Some(op))` for compound forms and
/// `None` for tokens that do not assign.
const fn assignment_operator(token: &Token) -> Option<Option<BinaryOperator>> {
    let op = match token {
        Token::Equals => return Some(None),
        Token::PlusAssign => BinaryOperator::Add,
        Token::MinusAssign => BinaryOperator::Sub,
        Token::MulAssign => BinaryOperator::Mul,
        Token::DivAssign => BinaryOperator::Div,
        Token::ModAssign => BinaryOperator::Mod,
        Token::ShiftLeftAssign => BinaryOperator::ShiftLeft,
        Token::ShiftRightAssign => BinaryOperator::ShiftRight,
        Token::UnsignedShiftRightAssign => BinaryOperator::UnsignedShiftRight,
        Token::AndAssign => BinaryOperator::BitAnd,
        Token::OrAssign => BinaryOperator::BitOr,
        Token::XorAssign => BinaryOperator::BitXor,
        _ => return None,
    };
    Some(Some(op))
}

/// Parses a complete token slice as a statement list.
///
/// Used for top-level statements and anything else that must consume every
/// token it is given. End-of-input errors are reported at `end`.
///
/// # Errors
/// Any parse error, or [`ParseError::UnexpectedToken`] if tokens remain after
/// the last statement.
pub fn parse_all(tokens: &[(Token, usize)], end: usize) -> ParseResult<Vec<Statement>> {
    let mut iter = tokens.iter().peekable();
    parse_statements(&mut iter).map_err(|e| e.at_end_of_input(end))
}

/// Parses a complete token slice holding exactly one function, starting at
/// its `function` keyword.
///
/// # Errors
/// Any parse error in the function, or [`ParseError::UnexpectedToken`] if the
/// slice does not start with `function` or has tokens after the closing brace.
pub fn parse_function_tokens(tokens: &[(Token, usize)],
                             end: usize)
                             -> ParseResult<Rc<FunctionDef>> {
    let mut iter = tokens.iter().peekable();
    let parsed = match iter.next() {
        Some((Token::Function, pos)) => parse_function(&mut iter, *pos),
        Some((tok, pos)) => Err(ParseError::UnexpectedToken { token: tok.describe(),
                                                              pos:   *pos, }),
        None => Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
    }.map_err(|e| e.at_end_of_input(end))?;

    match iter.next() {
        Some((tok, pos)) => Err(ParseError::UnexpectedToken { token: tok.describe(),
                                                              pos:   *pos, }),
        None => Ok(parsed),
    }
}
