//! Turns a pattern string into a flat stream of [`RegexAtom`]s, handling
//! escapes of the reserved characters. This is the scanning half of the
//! regex normalizer (spec.md §4.1); [`crate::regex::shunt`] does the rest
//! (explicit concatenation + shunting-yard).
//!
//! Grounded on the teacher's `parser::regex` combinators (`escaped_char`,
//! `normal_char`, the reserved-char set) but producing a flat token stream
//! instead of building a parse tree directly, since the spec calls for an
//! explicit postfix IR in between.

use super::error::PatternError;
use nom::branch::alt;
use nom::bytes::complete::take;
use nom::character::complete::char as nom_char;
use nom::combinator::{map, verify};
use nom::multi::many0;
use nom::sequence::preceded;
use nom::IResult;

const RESERVED: [char; 7] = ['(', ')', '|', '*', '+', '?', '\\'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegexAtom {
    Literal(char),
    Alt,
    Star,
    Plus,
    Question,
    LParen,
    RParen,
}

pub fn scan(pattern: &str) -> Result<Vec<RegexAtom>, PatternError> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(PatternError::EmptyPattern);
    }
    let (rest, atoms) =
        many0(atom)(trimmed).map_err(|_| PatternError::TrailingBackslash)?;
    if !rest.is_empty() {
        // The only way `atom` can fail to consume the rest of a non-empty,
        // already-trimmed string is a trailing lone backslash.
        return Err(PatternError::TrailingBackslash);
    }
    Ok(atoms)
}

fn atom(input: &str) -> IResult<&str, RegexAtom> {
    alt((
        map(nom_char('('), |_| RegexAtom::LParen),
        map(nom_char(')'), |_| RegexAtom::RParen),
        map(nom_char('|'), |_| RegexAtom::Alt),
        map(nom_char('*'), |_| RegexAtom::Star),
        map(nom_char('+'), |_| RegexAtom::Plus),
        map(nom_char('?'), |_| RegexAtom::Question),
        map(escaped_literal, RegexAtom::Literal),
        map(plain_literal, RegexAtom::Literal),
    ))(input)
}

fn escaped_literal(input: &str) -> IResult<&str, char> {
    map(preceded(nom_char('\\'), take(1usize)), |c: &str| {
        c.chars().next().expect("take(1) yields one char")
    })(input)
}

fn plain_literal(input: &str) -> IResult<&str, char> {
    verify(map(take(1usize), |c: &str| c.chars().next().unwrap()), |c| {
        !RESERVED.contains(c)
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_literals_and_operators() {
        let atoms = scan("ab|c*").unwrap();
        assert_eq!(
            atoms,
            vec![
                RegexAtom::Literal('a'),
                RegexAtom::Literal('b'),
                RegexAtom::Alt,
                RegexAtom::Literal('c'),
                RegexAtom::Star,
            ]
        );
    }

    #[test]
    fn escapes_reserved_characters() {
        let atoms = scan(r"\(\)\|").unwrap();
        assert_eq!(
            atoms,
            vec![
                RegexAtom::Literal('('),
                RegexAtom::Literal(')'),
                RegexAtom::Literal('|'),
            ]
        );
    }

    #[test]
    fn trims_surrounding_whitespace_but_not_internal() {
        let atoms = scan("  a b  ").unwrap();
        assert_eq!(
            atoms,
            vec![RegexAtom::Literal('a'), RegexAtom::Literal(' '), RegexAtom::Literal('b')]
        );
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(scan("   ").unwrap_err(), PatternError::EmptyPattern);
    }

    #[test]
    fn trailing_backslash_is_rejected() {
        assert_eq!(scan(r"a\").unwrap_err(), PatternError::TrailingBackslash);
    }
}
