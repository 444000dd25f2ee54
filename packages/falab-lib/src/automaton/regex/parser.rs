use nom::{
    branch::alt,
    character::complete::{char, none_of, one_of},
    combinator::{all_consuming, map, value},
    error::ParseError,
    multi::{many0, separated_list1},
    sequence::delimited,
    IResult,
};

use crate::{automaton::regex::ast::Ast, error::FaError};

// Expression -> Sequence ('∪' Sequence)*
fn expression<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Ast, E> {
    let (input, mut terms) = separated_list1(char('∪'), sequence)(input)?;

    let ast = if terms.len() == 1 {
        terms.pop().unwrap()
    } else {
        Ast::Union(terms)
    };

    Ok((input, ast))
}

// Sequence -> Factor*; an empty sequence denotes the empty word
fn sequence<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Ast, E> {
    let (input, mut factors) = many0(factor)(input)?;

    let ast = match factors.len() {
        0 => Ast::Epsilon,
        1 => factors.pop().unwrap(),
        _ => Ast::Concat(factors),
    };

    Ok((input, ast))
}

// Factor -> Atom ('*' | '+')*
fn factor<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Ast, E> {
    let (input, base) = atom(input)?;
    let (input, postfixes) = many0(one_of("*+∗"))(input)?;

    let ast = postfixes.into_iter().fold(base, |inner, op| match op {
        '+' => Ast::Plus(Box::new(inner)),
        // `∗` (U+2217) is a synonym for `*`
        _ => Ast::Star(Box::new(inner)),
    });

    Ok((input, ast))
}

// Atom -> '(' Expression ')' | 'ε' | '∅' | literal
fn atom<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Ast, E> {
    alt((
        delimited(char('('), expression, char(')')),
        value(Ast::Epsilon, char('ε')),
        value(Ast::Empty, char('∅')),
        map(none_of("()*+∪∗"), Ast::Literal),
    ))(input)
}

/// Parses a regular expression over the closed operator set
/// `( ) * + ∪ ∅ ε`; any other codepoint is a literal symbol. Fails on an
/// unclosed parenthesis or input left over after the parse completes.
pub fn parse(input: &str) -> Result<Ast, FaError> {
    match all_consuming(expression::<nom::error::Error<&str>>)(input) {
        Ok((_, ast)) => Ok(ast),
        Err(e) => Err(FaError::Parse(format!("failed to parse regex: {}", e))),
    }
}

#[test]
fn test_parse_literal() {
    assert_eq!(parse("a").unwrap(), Ast::Literal('a'));
}

#[test]
fn test_parse_concatenation() {
    assert_eq!(
        parse("ab").unwrap(),
        Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b')])
    );
}

#[test]
fn test_parse_union_binds_weaker_than_concatenation() {
    assert_eq!(
        parse("ab∪c").unwrap(),
        Ast::Union(vec![
            Ast::Concat(vec![Ast::Literal('a'), Ast::Literal('b')]),
            Ast::Literal('c'),
        ])
    );
}

#[test]
fn test_parse_postfix_stacking() {
    assert_eq!(
        parse("a*+").unwrap(),
        Ast::Plus(Box::new(Ast::Star(Box::new(Ast::Literal('a')))))
    );
}

#[test]
fn test_parse_unicode_star_variant() {
    assert_eq!(
        parse("a∗").unwrap(),
        Ast::Star(Box::new(Ast::Literal('a')))
    );
}

#[test]
fn test_parse_groups() {
    assert_eq!(
        parse("(a∪b)*").unwrap(),
        Ast::Star(Box::new(Ast::Union(vec![
            Ast::Literal('a'),
            Ast::Literal('b'),
        ])))
    );
}

#[test]
fn test_parse_epsilon_and_empty_atoms() {
    assert_eq!(
        parse("ε∪∅").unwrap(),
        Ast::Union(vec![Ast::Epsilon, Ast::Empty])
    );
}

#[test]
fn test_parse_unclosed_paren_fails() {
    assert!(parse("(ab").is_err());
}

#[test]
fn test_parse_trailing_input_fails() {
    assert!(parse("a)b").is_err());
}
