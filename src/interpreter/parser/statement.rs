use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{CatchClause, Expr, FunctionDef, Statement, SwitchCase},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_assignment, parse_expression},
            utils::{eat, expect, parse_comma_separated, parse_identifier, peek_is, unexpected},
        },
    },
};

/// Parses a single statement, including an optional trailing `;`.
///
/// A statement may be one of:
/// - an empty statement (`;`)
/// - a block
/// - a variable declaration (`var`, `let`, `const`)
/// - a function declaration
/// - `return`, `if`, `for`, `while`, `do`, `break`, `continue`, `switch`,
///   `try` or `throw`
/// - an expression used as a statement.
///
/// The leading token decides which; anything that is not a keyword is parsed
/// as an expression statement.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, offset)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let statement = parse_statement_body(tokens)?;
    eat(tokens, &Token::Semicolon);
    Ok(statement)
}

fn parse_statement_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, pos)) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { pos: 0 });
    };
    let pos = *pos;

    match token {
        Token::Semicolon => Ok(Statement::Empty),
        Token::LBrace => {
            tokens.next();
            Ok(Statement::Block { statements: parse_block(tokens)?,
                                  pos })
        },
        Token::Var => parse_var_declaration(tokens),
        Token::Function if is_declaration(tokens) => {
            tokens.next();
            Ok(Statement::FunctionDeclaration(parse_function(tokens, pos)?))
        },
        Token::Return => {
            tokens.next();
            let value = if ends_statement(tokens) { None } else { Some(parse_expression(tokens)?) };
            Ok(Statement::Return { value, pos })
        },
        Token::If => parse_if(tokens),
        Token::For => parse_for(tokens),
        Token::While => {
            tokens.next();
            let condition = parse_parenthesized(tokens)?;
            let body = parse_statement(tokens)?;
            Ok(Statement::While { condition,
                                  body: Box::new(body),
                                  pos })
        },
        Token::Do => {
            tokens.next();
            let body = parse_statement(tokens)?;
            expect(tokens, &Token::While)?;
            let condition = parse_parenthesized(tokens)?;
            Ok(Statement::DoWhile { body: Box::new(body),
                                    condition,
                                    pos })
        },
        Token::Break => {
            tokens.next();
            Ok(Statement::Break { pos })
        },
        Token::Continue => {
            tokens.next();
            Ok(Statement::Continue { pos })
        },
        Token::Switch => parse_switch(tokens),
        Token::Try => parse_try(tokens),
        Token::Throw => {
            tokens.next();
            let value = parse_expression(tokens)?;
            Ok(Statement::Throw { value, pos })
        },
        _ => {
            let expr = parse_expression(tokens)?;
            Ok(Statement::Expression { expr, pos })
        },
    }
}

/// Whether the `function` keyword at the front of the stream starts a named
/// declaration rather than an anonymous function expression.
fn is_declaration<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();
    matches!(ahead.peek(), Some((Token::Identifier(_), _)))
}

/// Whether the next token ends the current statement, which makes a `return`
/// value absent.
fn ends_statement<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    matches!(tokens.peek(), None | Some((Token::Semicolon | Token::RBrace, _)))
}

/// Parses `var a = 1, b, c = a`.
///
/// The trailing `;` is left for the caller, so the same routine serves the
/// initializer clause of a `for` loop.
///
/// # Errors
/// Returns a `ParseError` if a declarator does not start with an identifier.
fn parse_var_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let pos = expect(tokens, &Token::Var)?;
    let mut declarations = Vec::new();
    loop {
        let name = parse_identifier(tokens)?;
        let init = if eat(tokens, &Token::Equals) { Some(parse_assignment(tokens)?) } else { None };
        declarations.push((name, init));
        if !eat(tokens, &Token::Comma) {
            break;
        }
    }
    Ok(Statement::VarDeclaration { declarations,
                                   pos })
}

/// Parses the parameter list and body of a function whose `function` keyword
/// has already been consumed.
///
/// Syntax:
/// ```text
///     function name? "(" params ")" "{" statements "}"
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `function` keyword.
/// - `pos`: Offset of the `function` keyword.
///
/// # Returns
/// A shared [`FunctionDef`].
pub(crate) fn parse_function<'a, I>(tokens: &mut Peekable<I>, pos: usize) -> ParseResult<Rc<FunctionDef>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = match tokens.peek() {
        Some((Token::Identifier(name), _)) => {
            tokens.next();
            Some(name.clone())
        },
        _ => None,
    };
    expect(tokens, &Token::LParen)?;
    let params = parse_comma_separated(tokens, parse_identifier, &Token::RParen)?;
    expect(tokens, &Token::LBrace)?;
    let body = parse_block(tokens)?;

    Ok(Rc::new(FunctionDef { name,
                             params,
                             body,
                             pos }))
}

/// Parses `"(" expression ")"`, as used by `if`, `while` and `switch` heads.
fn parse_parenthesized<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen)?;
    let expr = parse_expression(tokens)?;
    expect(tokens, &Token::RParen)?;
    Ok(expr)
}

/// Parses an `if` statement with an optional `else` branch.
///
/// Syntax:
/// ```text
///     if "(" condition ")" statement ("else" statement)?
/// ```
/// `else if` needs no special handling: the else branch is simply another
/// `if` statement.
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let pos = expect(tokens, &Token::If)?;
    let condition = parse_parenthesized(tokens)?;
    let then_branch = parse_statement(tokens)?;
    let else_branch = if eat(tokens, &Token::Else) {
        Some(Box::new(parse_statement(tokens)?))
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch: Box::new(then_branch),
                       else_branch,
                       pos })
}

/// Parses a C-style `for` loop.
///
/// Syntax:
/// ```text
///     for "(" (var_declaration | expression)? ";" expression? ";" expression? ")" statement
/// ```
///
/// # Errors
/// Returns a `ParseError` if either `;` separator or the closing `)` is
/// missing.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let pos = expect(tokens, &Token::For)?;
    expect(tokens, &Token::LParen)?;

    let init = match tokens.peek() {
        Some((Token::Semicolon, _)) => None,
        Some((Token::Var, _)) => Some(Box::new(parse_var_declaration(tokens)?)),
        Some((_, init_pos)) => {
            let init_pos = *init_pos;
            let expr = parse_expression(tokens)?;
            Some(Box::new(Statement::Expression { expr,
                                                  pos: init_pos }))
        },
        None => return Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
    };
    expect(tokens, &Token::Semicolon)?;

    let condition = if peek_is(tokens, &Token::Semicolon) { None } else { Some(parse_expression(tokens)?) };
    expect(tokens, &Token::Semicolon)?;

    let update = if peek_is(tokens, &Token::RParen) { None } else { Some(parse_expression(tokens)?) };
    expect(tokens, &Token::RParen)?;

    let body = parse_statement(tokens)?;

    Ok(Statement::For { init,
                        condition,
                        update,
                        body: Box::new(body),
                        pos })
}

/// Parses a `switch` statement.
///
/// Syntax:
/// ```text
///     switch "(" expression ")" "{" (("case" expression | "default") ":" statement*)* "}"
/// ```
/// Labels are kept in source order; a `default` label may appear anywhere.
///
/// # Errors
/// Returns a `ParseError` if the body contains statements before the first
/// label or more than one `default`.
fn parse_switch<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let pos = expect(tokens, &Token::Switch)?;
    let discriminant = parse_parenthesized(tokens)?;
    expect(tokens, &Token::LBrace)?;

    let mut cases: Vec<SwitchCase> = Vec::new();
    let mut seen_default = false;
    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some((Token::Case, _)) => {
                tokens.next();
                let test = parse_expression(tokens)?;
                expect(tokens, &Token::Colon)?;
                cases.push(SwitchCase { test: Some(test),
                                        body: Vec::new(), });
            },
            Some((Token::Default, default_pos)) => {
                if seen_default {
                    return Err(ParseError::Other { message: "More than one default clause in switch statement.".to_string(),
                                                   pos:     *default_pos, });
                }
                seen_default = true;
                tokens.next();
                expect(tokens, &Token::Colon)?;
                cases.push(SwitchCase { test: None,
                                        body: Vec::new(), });
            },
            Some((tok, stmt_pos)) => {
                let Some(current) = cases.last_mut() else {
                    return Err(unexpected(tok, *stmt_pos));
                };
                current.body.push(parse_statement(tokens)?);
            },
            None => return Err(ParseError::UnexpectedEndOfInput { pos: 0 }),
        }
    }

    Ok(Statement::Switch { discriminant,
                           cases,
                           pos })
}

/// Parses `try { } catch (e) { } finally { }`.
///
/// The catch parameter and either clause are optional, but at least one
/// clause must be present.
fn parse_try<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let pos = expect(tokens, &Token::Try)?;
    expect(tokens, &Token::LBrace)?;
    let block = parse_block(tokens)?;

    let handler = if eat(tokens, &Token::Catch) {
        let param = if eat(tokens, &Token::LParen) {
            let name = parse_identifier(tokens)?;
            expect(tokens, &Token::RParen)?;
            Some(name)
        } else {
            None
        };
        expect(tokens, &Token::LBrace)?;
        Some(CatchClause { param,
                           body: parse_block(tokens)? })
    } else {
        None
    };

    let finalizer = if eat(tokens, &Token::Finally) {
        expect(tokens, &Token::LBrace)?;
        Some(parse_block(tokens)?)
    } else {
        None
    };

    if handler.is_none() && finalizer.is_none() {
        return Err(ParseError::Other { message: "Missing catch or finally after try.".to_string(),
                                       pos });
    }

    Ok(Statement::Try { block,
                        handler,
                        finalizer,
                        pos })
}
