//! Parser for the rule language.
//!
//! Parses token streams into rules and query goals. The entry points
//! `parse_rules` and `parse_query` run the lexer and parser together and
//! render any failure into a `LoadError::Syntax` diagnostic.

use chumsky::prelude::*;

use crate::ast::{Goal, Rule};
use crate::error::{format_lexer_errors, format_parser_errors, LoadError};
use crate::lexer::{lexer, Span, Token};
use crate::term::Term;

/// Create a parser for a complete rule file
pub fn parser() -> impl Parser<Token, Vec<Rule>, Error = Simple<Token>> + Clone {
    rule_decl().repeated().then_ignore(end())
}

/// Create a parser for a textual query: a single goal, optionally
/// terminated by `;`
pub fn query_parser() -> impl Parser<Token, Goal, Error = Simple<Token>> + Clone {
    goal()
        .then_ignore(just(Token::Semicolon).or_not())
        .then_ignore(end())
}

// ============================================================================
// Helpers
// ============================================================================

fn ident() -> impl Parser<Token, String, Error = Simple<Token>> + Clone {
    select! {
        Token::Ident(s) => s,
    }
}

// ============================================================================
// Terms
// ============================================================================

fn term() -> impl Parser<Token, Term, Error = Simple<Token>> + Clone {
    recursive(|term| {
        let int = select! { Token::Int(n) => Term::Integer(n) };

        let float = select! { Token::Float(s) => s }.try_map(|s: String, span: Span| {
            s.parse::<f64>()
                .map(Term::Float)
                .map_err(|_| Simple::custom(span, "invalid float literal"))
        });

        let string = select! { Token::Str(s) => Term::String(s) };

        let boolean = choice((
            just(Token::True).to(Term::Boolean(true)),
            just(Token::False).to(Term::Boolean(false)),
        ));

        // List literal: [t, ...]
        let list = term
            .separated_by(just(Token::Comma))
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(Term::List);

        // A bare identifier is a variable; concrete values are literals.
        let variable = ident().map(Term::Variable);

        choice((int, float, string, boolean, list, variable))
    })
}

// ============================================================================
// Goals
// ============================================================================

fn arg_list() -> impl Parser<Token, Vec<Term>, Error = Simple<Token>> + Clone {
    term()
        .separated_by(just(Token::Comma))
        .delimited_by(just(Token::LParen), just(Token::RParen))
}

fn goal() -> impl Parser<Token, Goal, Error = Simple<Token>> + Clone {
    // Host callout: receiver.Method(args)
    let callout = term()
        .then_ignore(just(Token::Dot))
        .then(ident())
        .then(arg_list())
        .map(|((receiver, method), args)| Goal::Callout {
            receiver,
            method,
            args,
        });

    // Rule invocation: name(args)
    let invoke = ident()
        .then(arg_list())
        .map(|(name, args)| Goal::Invoke { name, args });

    // Explicit unification: term = term
    let unify = term()
        .then_ignore(just(Token::Eq))
        .then(term())
        .map(|(l, r)| Goal::Unify(l, r));

    // Order matters: callout has the longest distinguishing prefix
    // (term '.'), invoke needs ident '(', unify is the fallback.
    choice((callout, invoke, unify))
}

// ============================================================================
// Rules
// ============================================================================

fn rule_decl() -> impl Parser<Token, Rule, Error = Simple<Token>> + Clone {
    let body = just(Token::If).ignore_then(
        goal()
            .separated_by(just(Token::And))
            .at_least(1),
    );

    ident()
        .then(arg_list())
        .then(body.or_not())
        .then_ignore(just(Token::Semicolon))
        .map(|((name, params), body)| Rule {
            name,
            params,
            body: body.unwrap_or_default(),
        })
}

// ============================================================================
// Entry points
// ============================================================================

/// Lex and parse rule-language source into rules.
///
/// `source_id` names the source unit (file path or inline id) in
/// diagnostics.
pub fn parse_rules(source_id: &str, input: &str) -> Result<Vec<Rule>, LoadError> {
    let tokens = lex(source_id, input)?;
    let len = input.len();

    parser()
        .parse(chumsky::Stream::from_iter(
            len..len + 1,
            tokens.iter().cloned(),
        ))
        .map_err(|errs| LoadError::Syntax {
            source_id: source_id.to_string(),
            diagnostic: format_parser_errors(input, errs, &tokens),
        })
}

/// Lex and parse a textual query into a single goal.
pub fn parse_query(input: &str) -> Result<Goal, LoadError> {
    const QUERY_SOURCE_ID: &str = "<query>";

    let tokens = lex(QUERY_SOURCE_ID, input)?;
    let len = input.len();

    query_parser()
        .parse(chumsky::Stream::from_iter(
            len..len + 1,
            tokens.iter().cloned(),
        ))
        .map_err(|errs| LoadError::Syntax {
            source_id: QUERY_SOURCE_ID.to_string(),
            diagnostic: format_parser_errors(input, errs, &tokens),
        })
}

fn lex(source_id: &str, input: &str) -> Result<Vec<(Token, Span)>, LoadError> {
    lexer().parse(input).map_err(|errs| LoadError::Syntax {
        source_id: source_id.to_string(),
        diagnostic: format_lexer_errors(input, errs),
    })
}
