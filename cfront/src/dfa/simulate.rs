//! # DFA Simulator: maximal-munch tokenization (spec.md §4.6).
//!
//! Grounded on `dandy::dfa::eval::DfaEvaluator`'s step-by-step cursor
//! (`current_state` goes absent once a transition is missing), extended
//! with the last-accepting bookkeeping maximal munch requires — the
//! teacher's evaluator exists only to answer whole-string `accepts()`
//! queries and never needed to remember the best prefix seen so far.

use super::Dfa;
use crate::token::{LexicalToken, LexicalTokenKind};

/// Runs the DFA from `start` over `input[start..]`, taking the longest
/// accepted prefix (spec.md §4.6: "Match one token / maximal munch").
/// Returns `(token, consumed_chars)` on success.
fn match_one(dfa: &Dfa, input: &[char]) -> Option<(LexicalToken, usize)> {
    let mut state = dfa.start();
    let mut last_accept: Option<(usize, crate::token::TokenType)> = None;
    if dfa.states()[state].is_accepting() {
        last_accept = Some((0, dfa.states()[state].token().unwrap().clone()));
    }

    for (i, &c) in input.iter().enumerate() {
        match dfa.step(state, c) {
            Some(next) => {
                state = next;
                if dfa.states()[state].is_accepting() {
                    last_accept = Some((i + 1, dfa.states()[state].token().unwrap().clone()));
                }
            }
            None => break,
        }
    }

    last_accept.map(|(len, token)| {
        let lexeme: String = input[..len].iter().collect();
        (
            LexicalToken {
                lexeme,
                kind: LexicalTokenKind::Token(token),
            },
            len,
        )
    })
}

/// Produces the full sequence of lexical tokens for `input` by repeated
/// maximal munch, emitting `ERROR` tokens where no pattern can advance
/// (spec.md §4.6, §7). The error run is the longest prefix with no accepted
/// match starting at that position — symmetric with maximal munch on the
/// accepting side (an Open Question in spec.md §9, resolved this way in
/// DESIGN.md).
pub fn tokenize(dfa: &Dfa, input: &str) -> Vec<LexicalToken> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match match_one(dfa, &chars[i..]) {
            Some((token, consumed)) => {
                i += consumed;
                tokens.push(token);
            }
            None => {
                let error_len = error_run_len(dfa, &chars[i..]);
                let lexeme: String = chars[i..i + error_len].iter().collect();
                log::debug!("lexical error at byte offset {i}: {lexeme:?}");
                tokens.push(LexicalToken {
                    lexeme,
                    kind: LexicalTokenKind::Error,
                });
                i += error_len;
            }
        }
    }

    tokens
}

/// The longest run starting at `input[0]` over which no pattern can ever
/// accept, i.e. up to (but not including) the next position from which
/// `match_one` would succeed. Always at least 1.
fn error_run_len(dfa: &Dfa, input: &[char]) -> usize {
    let mut len = 1;
    while len < input.len() && match_one(dfa, &input[len..]).is_none() {
        len += 1;
    }
    len
}

/// Runs the DFA over the whole of `input`; returns the token type if the
/// final state is accepting, else `None` (spec.md §4.6: "Validate single
/// token").
pub fn validate(dfa: &Dfa, input: &str) -> Option<crate::token::TokenType> {
    let mut state = dfa.start();
    for c in input.chars() {
        state = dfa.step(state, c)?;
    }
    dfa.states()[state].token().cloned()
}
