use std::{
    cell::RefCell,
    collections::HashMap,
    ops::Range,
    rc::Rc,
};

use crate::{
    ast::{FunctionDef, Statement},
    interpreter::{
        lexer::{Token, tokenize},
        parser::{
            block::find_statement_end,
            core::{ParseResult, parse_all, parse_function_tokens},
        },
    },
};

/// A tokenized program with an index of its top-level definitions.
///
/// Construction only tokenizes and scans bracket structure. Function bodies
/// and top-level statements are parsed the first time they are needed, and
/// parsed functions are cached for the lifetime of the program.
#[derive(Debug)]
pub struct Program {
    tokens:     Vec<(Token, usize)>,
    source_len: usize,
    /// `function NAME(...) {...}` declarations by name.
    functions:  HashMap<String, Range<usize>>,
    /// Other top-level statements, keyed by every name they assign.
    statements: RefCell<HashMap<String, Range<usize>>>,
    /// Names that hold functions, in source order.
    names:      Vec<String>,
    cache:      RefCell<HashMap<String, Rc<FunctionDef>>>,
}

/// What a top-level name resolves to.
#[derive(Debug)]
pub enum GlobalDefinition {
    /// A function declaration, parsed.
    Function(Rc<FunctionDef>),
    /// A top-level statement that assigns the name, parsed; it must be run
    /// once in the global scope.
    Statements(Vec<Statement>),
}

impl Program {
    /// Tokenizes `source` and indexes its top-level statements.
    ///
    /// Recognized at the top level:
    /// - `function NAME(...) {...}`
    /// - `var NAME = ...` (every declarator of the statement)
    /// - `NAME = ...`
    ///
    /// Anything else at the top level, such as a bare call, is skipped.
    ///
    /// # Errors
    /// Returns a `ParseError` for unrecognized characters and unbalanced
    /// brackets.
    pub fn new(source: &str) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        let mut functions = HashMap::new();
        let mut statements = HashMap::new();
        let mut names = Vec::new();

        let mut start = 0;
        while start < tokens.len() {
            let end = find_statement_end(&tokens, start).map_err(|e| e.at_end_of_input(source.len()))?;
            let statement = &tokens[start..end];

            match statement {
                [(Token::Function, _), (Token::Identifier(name), _), ..] => {
                    if !functions.contains_key(name) {
                        names.push(name.clone());
                    }
                    functions.insert(name.clone(), start..end);
                },
                [(Token::Var, _), ..] => {
                    for (name, holds_function) in declared_names(statement) {
                        if holds_function && !names.contains(&name) {
                            names.push(name.clone());
                        }
                        statements.entry(name).or_insert(start..end);
                    }
                },
                [(Token::Identifier(name), _), (Token::Equals, _), rest @ ..] => {
                    if matches!(rest.first(), Some((Token::Function, _))) && !names.contains(name) {
                        names.push(name.clone());
                    }
                    statements.entry(name.clone()).or_insert(start..end);
                },
                _ => {},
            }

            start = end;
        }

        tracing::debug!(tokens = tokens.len(),
                        functions = functions.len(),
                        statements = statements.len(),
                        "indexed program");

        Ok(Self { tokens,
                  source_len: source.len(),
                  functions,
                  statements: RefCell::new(statements),
                  names,
                  cache: RefCell::new(HashMap::new()) })
    }

    /// Names of the top-level functions, in source order.
    #[must_use]
    pub fn function_names(&self) -> &[String] {
        &self.names
    }

    /// Whether the program defines `name` at the top level, either as a
    /// function or through a statement that has not run yet.
    #[must_use]
    pub fn defines(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.statements.borrow().contains_key(name)
    }

    /// Parses the declared function `name`, using the cache when possible.
    ///
    /// # Returns
    /// `Ok(None)` when no function declaration of that name exists.
    ///
    /// # Errors
    /// Any parse error in the function.
    pub fn function(&self, name: &str) -> ParseResult<Option<Rc<FunctionDef>>> {
        if let Some(def) = self.cache.borrow().get(name) {
            return Ok(Some(Rc::clone(def)));
        }
        let Some(range) = self.functions.get(name) else {
            return Ok(None);
        };

        tracing::trace!(name, "parsing function body");
        let def = parse_function_tokens(&self.tokens[range.clone()], self.end_of(range))?;
        self.cache.borrow_mut().insert(name.to_string(), Rc::clone(&def));
        Ok(Some(def))
    }

    /// Resolves a top-level name that is not bound yet.
    ///
    /// A function declaration is returned parsed. For a pending statement,
    /// every name the statement assigns is withdrawn before parsing, so the
    /// statement is handed out at most once even if running it reads one of
    /// its own names.
    ///
    /// # Errors
    /// Any parse error in the definition.
    pub fn resolve(&self, name: &str) -> ParseResult<Option<GlobalDefinition>> {
        if let Some(def) = self.function(name)? {
            return Ok(Some(GlobalDefinition::Function(def)));
        }

        let Some(range) = self.statements.borrow_mut().remove(name) else {
            return Ok(None);
        };
        self.statements.borrow_mut().retain(|_, other| *other != range);

        tracing::trace!(name, "running top-level statement");
        let statements = parse_all(&self.tokens[range.clone()], self.end_of(&range))?;
        Ok(Some(GlobalDefinition::Statements(statements)))
    }

    /// The source offset just past a token range, for end-of-input errors.
    fn end_of(&self, range: &Range<usize>) -> usize {
        self.tokens.get(range.end).map_or(self.source_len, |(_, pos)| *pos)
    }
}

/// Lists the names declared by a top-level `var` statement, each with whether
/// its initializer is a function expression.
///
/// Declarators are the identifiers right after `var` or after a `,` that is
/// not nested inside brackets.
fn declared_names(statement: &[(Token, usize)]) -> Vec<(String, bool)> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut expect_name = false;

    for (index, (token, _)) in statement.iter().enumerate() {
        match token {
            Token::Var if index == 0 => expect_name = true,
            Token::Identifier(name) if expect_name && depth == 0 => {
                let holds_function = matches!(statement.get(index + 1..index + 3),
                                              Some([(Token::Equals, _), (Token::Function, _)]));
                names.push((name.clone(), holds_function));
                expect_name = false;
            },
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => expect_name = true,
            _ => expect_name = false,
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn indexes_every_kind_of_top_level_definition() {
        let program = Program::new("function a(){return 1}\n\
                                    var b = function(x){return x}, c = [1, 2];\n\
                                    d = function(){};\n\
                                    var e = {f: function(){}};\n\
                                    a();")
                      .unwrap();

        assert_eq!(program.function_names(), ["a", "b", "d"]);
        for name in ["a", "b", "c", "d", "e"] {
            assert!(program.defines(name), "{name} should be defined");
        }
        assert!(!program.defines("f"));
    }

    #[test]
    fn commas_inside_initializers_do_not_declare() {
        let tokens = tokenize("var a = f(x, y), b = [p, q]").unwrap();
        let names: Vec<_> = declared_names(&tokens).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn function_bodies_are_parsed_once() {
        let program = Program::new("function f(a){return a}").unwrap();
        let first = program.function("f").unwrap().unwrap();
        let second = program.function("f").unwrap().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.params, ["a"]);
    }

    #[test]
    fn statements_resolve_once_for_all_their_names() {
        let program = Program::new("var a = 1, b = 2;").unwrap();
        assert!(matches!(program.resolve("a"), Ok(Some(GlobalDefinition::Statements(_)))));
        assert!(matches!(program.resolve("b"), Ok(None)));
    }

    #[test]
    fn syntax_errors_surface_lazily() {
        let program = Program::new("function ok(){return 1} function bad(){return +}").unwrap();
        assert!(program.function("ok").is_ok());
        assert!(program.function("bad").is_err());
    }
}
