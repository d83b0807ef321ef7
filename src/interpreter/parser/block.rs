use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, statement::parse_statement},
    },
};

/// Parses the statements of a brace-delimited block.
///
/// The opening `{` has already been consumed; parsing continues until the
/// matching `}` is reached, which is consumed as well.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Errors
/// Returns [`ParseError::UnexpectedEndOfInput`] if the closing brace is
/// missing.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();

    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => statements.push(parse_statement(tokens)?),
            None => return Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
        }
    }

    Ok(statements)
}

/// Parses statements until the token stream is exhausted.
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();
    while tokens.peek().is_some() {
        statements.push(parse_statement(tokens)?);
    }
    Ok(statements)
}

/// Finds the index of the bracket closing the one at `open`.
///
/// `(`, `[` and `{` nest independently of each other; string and number
/// literals are single tokens, so brackets inside them never count.
///
/// # Returns
/// The index of the matching closer, or `None` if `open` is not an opening
/// bracket or the input ends first.
///
/// # Example
/// ```
/// use jsinterp::interpreter::{lexer::tokenize, parser::block::find_matching};
///
/// let tokens = tokenize("f(a[1], {b: ')'}) + 1").unwrap();
/// assert_eq!(find_matching(&tokens, 1), Some(12));
/// ```
#[must_use]
pub fn find_matching(tokens: &[(Token, usize)], open: usize) -> Option<usize> {
    if !matches!(tokens.get(open), Some((Token::LParen | Token::LBracket | Token::LBrace, _))) {
        return None;
    }

    let mut depth = 0usize;
    for (index, (token, _)) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            },
            _ => {},
        }
    }
    None
}

/// Whether `token` can be the last token of a complete expression.
fn ends_expression(token: &Token) -> bool {
    matches!(token,
             Token::Identifier(_)
             | Token::Number(_)
             | Token::Str(_)
             | Token::Bool(_)
             | Token::Null
             | Token::RParen
             | Token::RBracket
             | Token::RBrace)
}

/// Whether `token` starts a statement. After a complete expression none of
/// these can continue it, so a statement boundary without `;` lies between.
fn begins_statement(token: &Token) -> bool {
    matches!(token,
             Token::Identifier(_)
             | Token::Number(_)
             | Token::Str(_)
             | Token::Bool(_)
             | Token::Null
             | Token::Var
             | Token::Function
             | Token::Return
             | Token::If
             | Token::For
             | Token::While
             | Token::Do
             | Token::Break
             | Token::Continue
             | Token::Switch
             | Token::Try
             | Token::Throw
             | Token::Typeof
             | Token::Void)
}

/// Finds the end of the top-level statement starting at `start`.
///
/// Scans forward for a `;` that is not nested inside any bracket. The
/// returned index is one past the statement's last token, including the `;`
/// if one was found, so consecutive calls walk a program statement by
/// statement.
///
/// Line breaks are not tokens, so a statement also ends where, outside any
/// bracket, a token that completes an expression is followed by one that
/// starts a statement (`a = 1 b = 2`, `var f = function(){} function g(){}`).
/// In a statement led by `if`, `for`, `while`, `do`, `switch` or `try` only a
/// closing `}` counts as completing, since a `)` there may close the
/// condition; `do {...} while (...)` keeps its `while`.
///
/// A statement that starts with `function` ends at the brace closing its
/// body, since declarations need no `;`.
///
/// # Errors
/// Returns [`ParseError::UnexpectedToken`] for a closing bracket with no
/// opener, and [`ParseError::UnexpectedEndOfInput`] when a bracket is never
/// closed.
pub fn find_statement_end(tokens: &[(Token, usize)], start: usize) -> ParseResult<usize> {
    if let Some((Token::Function, _)) = tokens.get(start)
       && let Some(body) = tokens.iter()
                                 .skip(start)
                                 .position(|(t, _)| *t == Token::LBrace)
    {
        let close = find_matching(tokens, start + body).ok_or(ParseError::UnexpectedEndOfInput { pos: 0 })?;
        return Ok(close + 1);
    }

    let leader = tokens.get(start).map(|(t, _)| t);
    let is_control = matches!(leader,
                              Some(Token::If | Token::For | Token::While | Token::Do | Token::Switch | Token::Try));

    let mut depth = 0usize;
    for (index, (token, pos)) in tokens.iter().enumerate().skip(start) {
        if depth == 0
           && index > start
           && begins_statement(token)
        {
            let prev = &tokens[index - 1].0;
            let completes = if is_control { *prev == Token::RBrace } else { ends_expression(prev) };
            let do_while = leader == Some(&Token::Do) && *token == Token::While;
            if completes && !do_while {
                return Ok(index);
            }
        }
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                depth = depth.checked_sub(1)
                             .ok_or_else(|| ParseError::UnexpectedToken { token: token.describe(),
                                                                          pos:   *pos, })?;
            },
            Token::Semicolon if depth == 0 => return Ok(index + 1),
            _ => {},
        }
    }

    if depth > 0 {
        return Err(ParseError::UnexpectedEndOfInput { pos: 0 });
    }
    Ok(tokens.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    #[test]
    fn statement_end_skips_nested_semicolons() {
        let tokens = tokenize("var a = function(){x; y;}; b = 2").unwrap();
        assert_eq!(find_statement_end(&tokens, 0).unwrap(), 13);
        assert_eq!(find_statement_end(&tokens, 13).unwrap(), tokens.len());
    }

    #[test]
    fn function_declaration_ends_at_its_body() {
        let tokens = tokenize("function f(){return 1} g()").unwrap();
        assert_eq!(find_statement_end(&tokens, 0).unwrap(), 8);
    }

    #[test]
    fn statements_end_without_semicolons() {
        let tokens = tokenize("var a = function(){ return 1 } function b(){}").unwrap();
        assert_eq!(find_statement_end(&tokens, 0).unwrap(), 10);
        assert_eq!(find_statement_end(&tokens, 10).unwrap(), tokens.len());

        let tokens = tokenize("x = 1 y = 2").unwrap();
        assert_eq!(find_statement_end(&tokens, 0).unwrap(), 3);
    }

    #[test]
    fn conditions_and_do_while_stay_whole() {
        let tokens = tokenize("if (a) b = 1; c = 2").unwrap();
        assert_eq!(find_statement_end(&tokens, 0).unwrap(), 8);

        let tokens = tokenize("do { i++ } while (i < 3); j = 1").unwrap();
        assert_eq!(find_statement_end(&tokens, 0).unwrap(), 12);
    }

    #[test]
    fn unbalanced_input_is_rejected() {
        let tokens = tokenize("a = (1;").unwrap();
        assert!(matches!(find_statement_end(&tokens, 0),
                         Err(ParseError::UnexpectedEndOfInput { .. })));
        let tokens = tokenize("a = 1);").unwrap();
        assert!(matches!(find_statement_end(&tokens, 0),
                         Err(ParseError::UnexpectedToken { pos: 5, .. })));
    }

    #[test]
    fn matching_bracket_of_non_bracket_is_none() {
        let tokens = tokenize("a[0]").unwrap();
        assert_eq!(find_matching(&tokens, 0), None);
        assert_eq!(find_matching(&tokens, 1), Some(3));
    }
}
