//! The table-driven shift/reduce parsing engine (spec.md §4.10).

use super::lalr::{Action, LalrTable};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::token::{LexicalToken, LexicalTokenKind, TokenType};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token '{found}' in state {state}")]
    UnexpectedToken { state: usize, found: Symbol },
    #[error("no GOTO entry for nonterminal '{nonterminal}' from state {state} (malformed table)")]
    NoGotoEntry { state: usize, nonterminal: Symbol },
    #[error("token type '{0}' names no terminal of this grammar")]
    UnknownTokenType(String),
    #[error("lexical error token {0:?} cannot be parsed")]
    LexicalError(String),
}

/// Maps a lexer [`TokenType`] onto the grammar terminal of the same name —
/// the seam spec.md §2's data flow describes between (6) the DFA simulator
/// and (10) this engine, and spec.md §6's literal `parse(table, tokens)`
/// signature over `list<TokenType>` rather than over `Symbol`s directly.
pub fn token_type_to_symbol(token: &TokenType, grammar: &Grammar) -> Result<Symbol, ParseError> {
    grammar
        .terminals()
        .iter()
        .find(|t| t.name() == token.name.as_ref())
        .cloned()
        .ok_or_else(|| ParseError::UnknownTokenType(token.name.to_string()))
}

/// Converts a full lexical token stream — [`crate::dfa::simulate::tokenize`]'s
/// output — into the terminal sequence this engine consumes, failing on any
/// `ERROR` token.
pub fn symbols_from_lexical_tokens(
    tokens: &[LexicalToken],
    grammar: &Grammar,
) -> Result<Vec<Symbol>, ParseError> {
    tokens
        .iter()
        .map(|t| match &t.kind {
            LexicalTokenKind::Token(tt) => token_type_to_symbol(tt, grammar),
            LexicalTokenKind::Error => Err(ParseError::LexicalError(t.lexeme.clone())),
        })
        .collect()
}

/// Runs `table` over `tokens`, per spec.md §6's external interface
/// `parse(table, tokens) -> bool`: each [`TokenType`] is mapped to its
/// grammar terminal by name before driving the shift/reduce loop.
pub fn parse_token_types(
    table: &LalrTable,
    tokens: &[TokenType],
    grammar: &Grammar,
) -> Result<Vec<usize>, ParseError> {
    let symbols: Vec<Symbol> = tokens
        .iter()
        .map(|t| token_type_to_symbol(t, grammar))
        .collect::<Result<_, _>>()?;
    parse(table, &symbols)
}

/// Runs `table` directly over a lexer-produced token stream, wiring (6) the
/// DFA simulator straight into (10) this engine (spec.md §2's data flow).
pub fn parse_lexical_tokens(
    table: &LalrTable,
    tokens: &[LexicalToken],
    grammar: &Grammar,
) -> Result<Vec<usize>, ParseError> {
    let symbols = symbols_from_lexical_tokens(tokens, grammar)?;
    parse(table, &symbols)
}

/// Runs `table` over `input` (spec.md §4.10): maintain a stack of states,
/// shift on a matching terminal, reduce by popping `|rhs|` states and
/// pushing GOTO[state][lhs], accept when the augmenting production reduces.
/// Returns the production indices applied, in the order they were reduced —
/// the reverse of a rightmost derivation.
pub fn parse(table: &LalrTable, input: &[Symbol]) -> Result<Vec<usize>, ParseError> {
    let mut stack: Vec<usize> = vec![0];
    let mut reductions = Vec::new();
    let mut cursor = 0;

    let mut tokens: Vec<Symbol> = input.to_vec();
    tokens.push(Symbol::end_of_input());

    loop {
        let state = *stack.last().expect("stack is never empty");
        let lookahead = &tokens[cursor];

        match table.action[state].get(lookahead) {
            Some(Action::Shift(next)) => {
                stack.push(*next);
                cursor += 1;
            }
            Some(Action::Reduce(production)) => {
                let production = *production;
                let prod = table.grammar.production(production);
                let pop_count = prod.rhs.len();
                let lhs = prod.lhs.clone();
                stack.truncate(stack.len() - pop_count);

                let state_after_pop = *stack.last().expect("stack is never empty");
                let goto_state = *table.goto[state_after_pop]
                    .get(&lhs)
                    .ok_or_else(|| ParseError::NoGotoEntry {
                        state: state_after_pop,
                        nonterminal: lhs,
                    })?;
                stack.push(goto_state);
                reductions.push(production);
            }
            Some(Action::Accept) => return Ok(reductions),
            None => {
                return Err(ParseError::UnexpectedToken {
                    state,
                    found: lookahead.clone(),
                })
            }
        }
    }
}
