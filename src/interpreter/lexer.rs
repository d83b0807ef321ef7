use logos::Logos;

use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens of the script subset.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.14`, `.5`, `1e3` or `0x1F`.
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", parse_decimal)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_decimal)]
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex)]
    Number(f64),
    /// String literal tokens in single or double quotes, already unescaped.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\.)*'", parse_string)]
    Str(String),
    /// `true` / `false`
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// `null`
    #[token("null")]
    Null,
    /// `var`, `let` and `const`; all declare function-scoped variables.
    #[token("var")]
    #[token("let")]
    #[token("const")]
    Var,
    /// `function`
    #[token("function")]
    Function,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `while`
    #[token("while")]
    While,
    /// `do`
    #[token("do")]
    Do,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `case`
    #[token("case")]
    Case,
    /// `default`
    #[token("default")]
    Default,
    /// `try`
    #[token("try")]
    Try,
    /// `catch`
    #[token("catch")]
    Catch,
    /// `finally`
    #[token("finally")]
    Finally,
    /// `throw`
    #[token("throw")]
    Throw,
    /// `typeof`
    #[token("typeof")]
    Typeof,
    /// `void`
    #[token("void")]
    Void,
    /// Identifier tokens such as `x`, `$_xY1` or `_0x3a`.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `/* Block comments. */`
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    MultiLineComment,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,
    /// `>>>`
    #[token(">>>")]
    UnsignedShiftRight,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `!`
    #[token("!")]
    Bang,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `=`
    #[token("=")]
    Equals,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `%=`
    #[token("%=")]
    ModAssign,
    /// `<<=`
    #[token("<<=")]
    ShiftLeftAssign,
    /// `>>=`
    #[token(">>=")]
    ShiftRightAssign,
    /// `>>>=`
    #[token(">>>=")]
    UnsignedShiftRightAssign,
    /// `&=`
    #[token("&=")]
    AndAssign,
    /// `|=`
    #[token("|=")]
    OrAssign,
    /// `^=`
    #[token("^=")]
    XorAssign,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `===`
    #[token("===")]
    StrictEqual,
    /// `!==`
    #[token("!==")]
    StrictNotEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// Whitespace and line breaks.
    #[regex(r"[ \t\r\n\f\u{a0}\u{feff}]+", logos::skip)]
    Ignored,
}

/// Tokenizes a whole source text.
///
/// Each token is paired with the byte offset at which it starts, which is the
/// position reported by every later error.
///
/// # Errors
/// Returns [`ParseError::UnrecognizedCharacter`] for input that starts no
/// token, including unterminated string literals.
///
/// # Example
/// ```
/// use jsinterp::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("x += 0x10;").unwrap();
/// assert_eq!(tokens,
///            vec![(Token::Identifier("x".into()), 0),
///                 (Token::PlusAssign, 2),
///                 (Token::Number(16.0), 5),
///                 (Token::Semicolon, 9)]);
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let pos = lexer.span().start;
        match token {
            Ok(tok) => tokens.push((tok, pos)),
            Err(()) => {
                return Err(ParseError::UnrecognizedCharacter { found: lexer.slice().to_string(),
                                                               pos });
            },
        }
    }

    Ok(tokens)
}

impl Token {
    /// A short human-readable rendering used in parse error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Str(s) => format!("string {s:?}"),
            Self::Identifier(name) => format!("identifier '{name}'"),
            other => format!("{other:?}"),
        }
    }

    /// The name this token spells when used after `.` or as an object key.
    ///
    /// Keywords are valid property names (`a.default`, `{case: 1}`), so this
    /// accepts them alongside plain identifiers.
    #[must_use]
    pub fn property_name(&self) -> Option<&'static str> {
        Some(match self {
            Self::Bool(true) => "true",
            Self::Bool(false) => "false",
            Self::Null => "null",
            Self::Var => "var",
            Self::Function => "function",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Default => "default",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::Finally => "finally",
            Self::Throw => "throw",
            Self::Typeof => "typeof",
            Self::Void => "void",
            _ => return None,
        })
    }
}

/// Parses a decimal literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value if successful.
/// - `None`: If the slice is not a valid float.
fn parse_decimal(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a `0x`-prefixed hexadecimal literal from the current token slice.
#[allow(clippy::cast_precision_loss)]
fn parse_hex(lex: &logos::Lexer<Token>) -> Option<f64> {
    u64::from_str_radix(&lex.slice()[2..], 16).ok().map(|v| v as f64)
}

/// Strips the quotes from a string literal and resolves its escapes.
fn parse_string(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

/// Resolves backslash escapes. Unknown escapes pass the escaped character
/// through unchanged; malformed `\x`/`\u` escapes reject the literal.
fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => out.push(read_hex_escape(&mut chars, 2)?),
            'u' => out.push(read_hex_escape(&mut chars, 4)?),
            other => out.push(other),
        }
    }

    Some(out)
}

fn read_hex_escape(chars: &mut std::str::Chars<'_>, width: usize) -> Option<char> {
    let digits: String = chars.by_ref().take(width).collect();
    if digits.len() != width {
        return None;
    }
    let code = u32::from_str_radix(&digits, 16).ok()?;
    Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn identifiers_accept_dollar_and_underscore() {
        assert_eq!(kinds("$_xY1 _a $"),
                   vec![Token::Identifier("$_xY1".into()),
                        Token::Identifier("_a".into()),
                        Token::Identifier("$".into())]);
    }

    #[test]
    fn keywords_do_not_swallow_longer_identifiers() {
        assert_eq!(kinds("variable var"),
                   vec![Token::Identifier("variable".into()), Token::Var]);
    }

    #[test]
    fn multi_character_operators_use_longest_match() {
        assert_eq!(kinds("a>>>=b === c !== d << e"),
                   vec![Token::Identifier("a".into()),
                        Token::UnsignedShiftRightAssign,
                        Token::Identifier("b".into()),
                        Token::StrictEqual,
                        Token::Identifier("c".into()),
                        Token::StrictNotEqual,
                        Token::Identifier("d".into()),
                        Token::ShiftLeft,
                        Token::Identifier("e".into())]);
    }

    #[test]
    fn strings_resolve_escapes() {
        assert_eq!(kinds(r#""a\"b" 'c\'d' "\x41B""#),
                   vec![Token::Str("a\"b".into()),
                        Token::Str("c'd".into()),
                        Token::Str("AB".into())]);
    }

    #[test]
    fn comments_and_newlines_are_skipped() {
        assert_eq!(kinds("1 // one\n/* two\n */ 3"),
                   vec![Token::Number(1.0), Token::Number(3.0)]);
    }

    #[test]
    fn numbers_in_every_form() {
        assert_eq!(kinds("42 3.5 .5 1e3 0xff"),
                   vec![Token::Number(42.0),
                        Token::Number(3.5),
                        Token::Number(0.5),
                        Token::Number(1000.0),
                        Token::Number(255.0)]);
    }

    #[test]
    fn unrecognized_character_reports_its_offset() {
        let err = tokenize("a = #b").unwrap_err();
        assert_eq!(err,
                   ParseError::UnrecognizedCharacter { found: "#".into(),
                                                       pos:   4, });
    }
}
