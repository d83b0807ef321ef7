use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator, UpdateOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_assignment, parse_expression},
            statement::parse_function,
            utils::{expect, parse_comma_separated, unexpected},
        },
    },
    util::num::format_number,
};

/// Parses a unary expression.
///
/// Supports the prefix operators `!`, `-`, `+`, `~`, `typeof`, `void` and the
/// prefix update operators `++`/`--`. Unary operators are right-associative,
/// so `!-x` parses as `!(-x)`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any postfix operators via
/// [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("!" | "-" | "+" | "~" | "typeof" | "void") unary
///            | ("++" | "--") unary
///            | primary postfix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, pos)) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { pos: 0 });
    };
    let pos = *pos;

    let op = match token {
        Token::Bang => Some(UnaryOperator::Not),
        Token::Minus => Some(UnaryOperator::Negate),
        Token::Plus => Some(UnaryOperator::Plus),
        Token::Tilde => Some(UnaryOperator::BitNot),
        Token::Typeof => Some(UnaryOperator::Typeof),
        Token::Void => Some(UnaryOperator::Void),
        _ => None,
    };
    if let Some(op) = op {
        tokens.next();
        let expr = parse_unary(tokens)?;
        return Ok(Expr::UnaryOp { op,
                                  expr: Box::new(expr),
                                  pos });
    }

    let update = match token {
        Token::PlusPlus => Some(UpdateOperator::Increment),
        Token::MinusMinus => Some(UpdateOperator::Decrement),
        _ => None,
    };
    if let Some(op) = update {
        tokens.next();
        let target = parse_unary(tokens)?;
        if !target.is_assignable() {
            return Err(ParseError::InvalidAssignmentTarget { pos });
        }
        return Ok(Expr::Update { op,
                                 prefix: true,
                                 target: Box::new(target),
                                 pos });
    }

    let primary = parse_primary(tokens)?;
    parse_postfix(tokens, primary)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric, string, boolean and `null` literals
/// - identifiers
/// - parenthesized expressions
/// - array literals (`[ ... ]`)
/// - object literals (`{ key: value, ... }`)
/// - function expressions
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier
///              | "(" expression ")"
///              | "[" elements "]"
///              | "{" properties "}"
///              | function
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (token, pos) = tokens.next()
                             .ok_or(ParseError::UnexpectedEndOfInput { pos: 0 })?;
    let pos = *pos;

    let literal = |value| Ok(Expr::Literal { value, pos });
    match token {
        Token::Number(n) => literal(LiteralValue::Number(*n)),
        Token::Str(s) => literal(LiteralValue::Str(s.clone())),
        Token::Bool(b) => literal(LiteralValue::Bool(*b)),
        Token::Null => literal(LiteralValue::Null),
        Token::Identifier(name) => Ok(Expr::Variable { name: name.clone(),
                                                       pos }),
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen)?;
            Ok(expr)
        },
        Token::LBracket => {
            let elements = parse_comma_separated(tokens, parse_assignment, &Token::RBracket)?;
            Ok(Expr::ArrayLiteral { elements, pos })
        },
        Token::LBrace => {
            let properties = parse_comma_separated(tokens, parse_property, &Token::RBrace)?;
            Ok(Expr::ObjectLiteral { properties,
                                     pos })
        },
        Token::Function => Ok(Expr::Function(parse_function(tokens, pos)?)),
        tok => Err(unexpected(tok, pos)),
    }
}

/// Parses one `key: value` entry of an object literal.
///
/// Keys may be identifiers, keywords, strings or numbers; numeric keys are
/// stored in their string form.
fn parse_property<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<(String, Expr)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let key = match tokens.next() {
        Some((Token::Identifier(name) | Token::Str(name), _)) => name.clone(),
        Some((Token::Number(n), _)) => format_number(*n),
        Some((tok, pos)) => match tok.property_name() {
            Some(name) => name.to_string(),
            None => return Err(unexpected(tok, *pos)),
        },
        None => return Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
    };
    expect(tokens, &Token::Colon)?;
    let value = parse_assignment(tokens)?;
    Ok((key, value))
}

/// Parses postfix operators applied to an expression.
///
/// Handles, in any chain:
/// 1. **Calls** `expr(args)`
/// 2. **Computed member access** `expr[index]`
/// 3. **Named member access** `expr.name`
///
/// followed by at most one postfix update (`expr++`, `expr--`).
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "(" arguments ")"
///              | postfix "[" expression "]"
///              | postfix "." name
///              | postfix ("++" | "--")
/// ```
///
/// # Errors
/// Returns a `ParseError` if:
/// - a bracket is not properly closed,
/// - `.` is not followed by a name,
/// - a postfix update is applied to something that is not assignable.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::LParen, pos)) => {
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_assignment, &Token::RParen)?;
                node = Expr::Call { callee: Box::new(node),
                                    arguments,
                                    pos: *pos };
            },
            Some((Token::LBracket, pos)) => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket)?;
                node = Expr::Index { object: Box::new(node),
                                     index:  Box::new(index),
                                     pos:    *pos, };
            },
            Some((Token::Dot, pos)) => {
                tokens.next();
                let property = match tokens.next() {
                    Some((Token::Identifier(name), _)) => name.clone(),
                    Some((tok, name_pos)) => match tok.property_name() {
                        Some(name) => name.to_string(),
                        None => return Err(unexpected(tok, *name_pos)),
                    },
                    None => return Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
                };
                node = Expr::Member { object: Box::new(node),
                                      property,
                                      pos: *pos };
            },
            _ => break,
        }
    }

    let update = match tokens.peek() {
        Some((Token::PlusPlus, pos)) => Some((UpdateOperator::Increment, *pos)),
        Some((Token::MinusMinus, pos)) => Some((UpdateOperator::Decrement, *pos)),
        _ => None,
    };
    if let Some((op, pos)) = update {
        tokens.next();
        if !node.is_assignable() {
            return Err(ParseError::InvalidAssignmentTarget { pos });
        }
        node = Expr::Update { op,
                              prefix: false,
                              target: Box::new(node),
                              pos };
    }

    Ok(node)
}
