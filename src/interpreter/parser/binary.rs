use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_assignment},
            unary::parse_unary,
            utils::expect,
        },
    },
};

/// Parses a conditional expression, `condition ? then : else`.
///
/// Both branches are parsed at assignment level, so `a ? b = 1 : c = 2` is
/// accepted and the operator nests to the right.
///
/// Grammar: `conditional := logical_or ("?" assignment ":" assignment)?`
pub fn parse_conditional<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_logical_or(tokens)?;

    if let Some((Token::Question, pos)) = tokens.peek() {
        tokens.next();
        let then_expr = parse_assignment(tokens)?;
        expect(tokens, &Token::Colon)?;
        let else_expr = parse_assignment(tokens)?;
        return Ok(Expr::Conditional { condition: Box::new(condition),
                                      then_expr: Box::new(then_expr),
                                      else_expr: Box::new(else_expr),
                                      pos:       *pos, });
    }

    Ok(condition)
}

/// Parses a logical OR expression.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_logical_and, |op| matches!(op, BinaryOperator::Or))
}

/// Parses a logical AND expression.
///
/// The rule is: `logical_and := bitwise_or ("&&" bitwise_or)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_bitwise_or, |op| matches!(op, BinaryOperator::And))
}

/// The rule is: `bitwise_or := bitwise_xor ("|" bitwise_xor)*`
fn parse_bitwise_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_bitwise_xor, |op| matches!(op, BinaryOperator::BitOr))
}

/// The rule is: `bitwise_xor := bitwise_and ("^" bitwise_and)*`
fn parse_bitwise_xor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_bitwise_and, |op| matches!(op, BinaryOperator::BitXor))
}

/// The rule is: `bitwise_and := equality ("&" equality)*`
fn parse_bitwise_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_equality, |op| matches!(op, BinaryOperator::BitAnd))
}

/// Parses loose and strict equality.
///
/// The rule is: `equality := relational (("==" | "!=" | "===" | "!==")
/// relational)*`
fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_relational, |op| {
        matches!(op,
                 BinaryOperator::Equal
                 | BinaryOperator::NotEqual
                 | BinaryOperator::StrictEqual
                 | BinaryOperator::StrictNotEqual)
    })
}

/// The rule is: `relational := shift (("<" | "<=" | ">" | ">=") shift)*`
fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_shift, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::LessEqual
                 | BinaryOperator::Greater
                 | BinaryOperator::GreaterEqual)
    })
}

/// The rule is: `shift := additive (("<<" | ">>" | ">>>") additive)*`
fn parse_shift<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_additive, |op| {
        matches!(op,
                 BinaryOperator::ShiftLeft
                 | BinaryOperator::ShiftRight
                 | BinaryOperator::UnsignedShiftRight)
    })
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_unary, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod)
    })
}

/// Folds one precedence level into a left-leaning tree of
/// [`Expr::BinaryOp`] nodes.
///
/// `operand` parses the next-higher level; `accepts` selects the operators
/// that belong to this level.
///
/// # Parameters
/// - `tokens`: Token stream with offset information.
/// - `operand`: Parser for the operands of this level.
/// - `accepts`: Predicate over the operators of this level.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operand: impl Fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 accepts: impl Fn(BinaryOperator) -> bool)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some((token, pos)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && accepts(op)
        {
            tokens.next();
            let right = operand(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    pos: *pos };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Maps a token to the binary operator it spells, if any.
///
/// # Example
/// ```
/// use jsinterp::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::UnsignedShiftRight),
///            Some(BinaryOperator::UnsignedShiftRight));
/// assert_eq!(token_to_binary_operator(&Token::PlusAssign), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::Percent => BinaryOperator::Mod,
        Token::ShiftLeft => BinaryOperator::ShiftLeft,
        Token::ShiftRight => BinaryOperator::ShiftRight,
        Token::UnsignedShiftRight => BinaryOperator::UnsignedShiftRight,
        Token::Ampersand => BinaryOperator::BitAnd,
        Token::Pipe => BinaryOperator::BitOr,
        Token::Caret => BinaryOperator::BitXor,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::StrictEqual => BinaryOperator::StrictEqual,
        Token::StrictNotEqual => BinaryOperator::StrictNotEqual,
        Token::Less => BinaryOperator::Less,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::Greater => BinaryOperator::Greater,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::AndAnd => BinaryOperator::And,
        Token::OrOr => BinaryOperator::Or,
        _ => return None,
    })
}
