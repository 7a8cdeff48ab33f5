//! # NFA Merger (spec.md §4.3)
//!
//! Combines several tagged NFAs into one by adding a fresh start state with
//! an ε-transition to each input's start. Grounded on
//! `dandy::nfa::Nfa::union`'s "new initial state with epsilon transitions to
//! both starts" construction, generalized from two NFAs to N and keeping
//! each input's token tag instead of folding acceptance to a bool.

use super::{alloc_state, Nfa, NfaState};

/// Merges `nfas` under a fresh start state. Returns the single input
/// unchanged if there's only one (spec.md §4.3).
pub fn merge(nfas: Vec<Nfa>) -> Nfa {
    assert!(!nfas.is_empty(), "merge requires at least one NFA");
    if nfas.len() == 1 {
        return nfas.into_iter().next().unwrap();
    }

    let mut states: Vec<NfaState> = Vec::new();
    let start = alloc_state(&mut states);

    for nfa in nfas {
        let offset = states.len();
        let Nfa {
            states: nfa_states,
            start: nfa_start,
        } = nfa;
        states.extend(nfa_states.into_iter().map(|mut s| {
            for (_, target) in s.transitions.iter_mut() {
                *target += offset;
            }
            s
        }));
        states[start].transitions.push((None, nfa_start + offset));
    }

    Nfa { states, start }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::thompson::compile_pattern;
    use crate::regex::to_postfix;
    use crate::token::TokenType;
    use std::collections::BTreeSet;

    fn pattern_nfa(pattern: &str, id: u32, name: &str) -> Nfa {
        let postfix = to_postfix(pattern).unwrap();
        compile_pattern(&postfix, TokenType::new(id, name)).unwrap()
    }

    fn accepting_token(nfa: &Nfa, input: &str) -> Option<u32> {
        let mut current = nfa.epsilon_closure(&BTreeSet::from([nfa.start()]));
        for c in input.chars() {
            current = nfa.epsilon_closure(&nfa.mov(&current, c));
        }
        current
            .iter()
            .filter_map(|&s| nfa.states()[s].token().map(|t| t.id))
            .min()
    }

    #[test]
    fn single_nfa_is_returned_unchanged() {
        let nfa = pattern_nfa("a", 1, "A");
        let states_before = nfa.states().len();
        let merged = merge(vec![nfa]);
        assert_eq!(merged.states().len(), states_before);
    }

    #[test]
    fn merged_nfa_recognizes_every_pattern_with_its_own_tag() {
        let merged = merge(vec![
            pattern_nfa("if|while|for", 1, "KEYWORD"),
            pattern_nfa("[0-9]", 2, "DIGIT_LIT"), // literal brackets, just a distinct pattern
        ]);
        assert_eq!(accepting_token(&merged, "if"), Some(1));
        assert!(accepting_token(&merged, "nonsense").is_none());
    }
}
