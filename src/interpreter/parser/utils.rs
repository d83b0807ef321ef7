use std::iter::Peekable;

use crate::{error::ParseError, interpreter::{lexer::Token, parser::core::ParseResult}};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, object literals, parameter lists
/// and call arguments. It repeatedly calls `parse_item` to parse one element,
/// expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list, and a
/// single trailing comma before the closing token is accepted, as minifiers
/// sometimes leave one behind.
///
/// Grammar (simplified): `list := item ("," item)* ","?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    loop {
        if eat(tokens, closing) {
            break;
        }
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, pos)) => {
                return Err(ParseError::UnexpectedToken { token: format!("expected ',' or {closing:?}, found {}",
                                                                        tok.describe()),
                                                         pos:   *pos, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the input
/// ends.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, pos)) => Err(unexpected(tok, *pos)),
        None => Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
    }
}

/// Consumes the expected token and returns its offset.
///
/// # Errors
/// Returns [`ParseError::UnexpectedToken`] naming what was expected if a
/// different token follows, or [`ParseError::UnexpectedEndOfInput`].
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, pos)) if tok == expected => Ok(*pos),
        Some((tok, pos)) => {
            Err(ParseError::UnexpectedToken { token: format!("expected {expected:?}, found {}",
                                                             tok.describe()),
                                              pos:   *pos, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
    }
}

/// Consumes the next token if it equals `token`.
pub(in crate::interpreter::parser) fn eat<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    if let Some((tok, _)) = tokens.peek()
       && tok == token
    {
        tokens.next();
        return true;
    }
    false
}

/// Whether the next token equals `token`, without consuming it.
pub(in crate::interpreter::parser) fn peek_is<'a, I>(tokens: &mut Peekable<I>, token: &Token) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    matches!(tokens.peek(), Some((tok, _)) if tok == token)
}

/// Builds the error for a token that cannot start or continue the construct
/// being parsed.
pub(in crate::interpreter::parser) fn unexpected(token: &Token, pos: usize) -> ParseError {
    ParseError::UnexpectedToken { token: token.describe(),
                                  pos }
}
