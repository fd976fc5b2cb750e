//! Lexer for the rule language.
//!
//! Tokenizes source into a stream for the parser.

use chumsky::prelude::*;
use std::ops::Range;

/// Token types for the rule language
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    // Keywords
    If,
    And,
    True,
    False,

    // Literals and identifiers
    Ident(String),
    Int(i64),
    /// Kept as its lexeme; converted to f64 in the parser.
    Float(String),
    Str(String),

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Dot,       // .
    Semicolon, // ;
    Eq,        // =
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::If => write!(f, "if"),
            Token::And => write!(f, "and"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(s) => write!(f, "{}", s),
            Token::Str(s) => write!(f, "{:?}", s),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Semicolon => write!(f, ";"),
            Token::Eq => write!(f, "="),
        }
    }
}

/// Type alias for spans
pub type Span = Range<usize>;

/// Create a lexer for the rule language
pub fn lexer() -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    let keyword_or_ident = text::ident().map(|s: String| match s.as_str() {
        "if" => Token::If,
        "and" => Token::And,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Ident(s),
    });

    // Numbers: an optional sign, digits, and an optional fractional part.
    // `1.Method()` must lex as Int(1) Dot Ident, so the fractional part
    // only matches when a digit follows the dot.
    let number = just('-')
        .or_not()
        .then(text::int(10))
        .then(just('.').ignore_then(text::digits(10)).or_not())
        .try_map(|((sign, int), frac), span| {
            let sign = if sign.is_some() { "-" } else { "" };
            match frac {
                Some(frac) => Ok(Token::Float(format!("{}{}.{}", sign, int, frac))),
                None => format!("{}{}", sign, int)
                    .parse()
                    .map(Token::Int)
                    .map_err(|_| Simple::custom(span, "integer literal out of range")),
            }
        });

    // Strings: double-quoted, no escape sequences.
    let string = just('"')
        .ignore_then(none_of('"').repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(Token::Str);

    let punctuation = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
        just(',').to(Token::Comma),
        just('.').to(Token::Dot),
        just(';').to(Token::Semicolon),
        just('=').to(Token::Eq),
    ));

    // Comments: # to end of line (handles both mid-file and end-of-file)
    let line_comment = just('#')
        .then(none_of('\n').repeated())
        .then(just('\n').or_not())
        .ignored();

    // Token OR comment - comments produce None, tokens produce Some
    let token_or_skip = line_comment
        .to(None)
        .or(choice((number, string, keyword_or_ident, punctuation)).map(Some));

    token_or_skip
        .map_with_span(|opt_tok, span| opt_tok.map(|tok| (tok, span)))
        .padded()
        .repeated()
        .then_ignore(end())
        .map(|items| items.into_iter().flatten().collect())
}
