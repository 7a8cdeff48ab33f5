//! # DFA Builder: subset construction with token-priority tagging
//! (spec.md §4.4).
//!
//! Worklist-based subset construction grounded on
//! `dandy::nfa::Nfa::to_dfa`'s evaluator-driven loop (same worklist/memo-map
//! shape), generalized to carry a token tag through the closure instead of
//! a single accepting bool, since downstream tokenization needs to know
//! *which* pattern matched, not just whether the input was recognized.

use super::{highest_priority, Dfa, DfaState};
use crate::nfa::Nfa;
use std::collections::{BTreeSet, HashMap};

/// Determinizes `nfa` over alphabet `alphabet` (spec.md §4.4). The result's
/// state ids are assigned in discovery order starting from the start state.
pub fn determinize(nfa: &Nfa, alphabet: &[char]) -> Dfa {
    let start_set = nfa.epsilon_closure(&BTreeSet::from([nfa.start()]));
    let start_key = set_key(&start_set);

    let mut known: HashMap<Vec<usize>, u32> = HashMap::new();
    let mut worklist: Vec<BTreeSet<usize>> = vec![start_set.clone()];
    known.insert(start_key, 0);

    let mut built: Vec<(Vec<usize>, HashMap<char, u32>)> = Vec::new();
    built.push((set_key(&start_set), HashMap::new()));

    while let Some(set) = worklist.pop() {
        let this_key = set_key(&set);
        let &this_id = known.get(&this_key).expect("set must be known before expansion");

        let mut transitions = HashMap::new();
        for &c in alphabet {
            let moved = nfa.epsilon_closure(&nfa.mov(&set, c));
            if moved.is_empty() {
                continue;
            }
            let key = set_key(&moved);
            let id = *known.entry(key).or_insert_with(|| {
                let id = built.len() as u32;
                built.push((moved.iter().copied().collect(), HashMap::new()));
                worklist.push(moved.clone());
                id
            });
            transitions.insert(c, id);
        }
        built[this_id as usize].1 = transitions;
    }

    let states = built
        .into_iter()
        .enumerate()
        .map(|(id, (nfa_set, transitions))| {
            let accepting_tokens = nfa_set
                .iter()
                .filter_map(|&s| nfa.states()[s].token().cloned());
            let token = highest_priority(accepting_tokens);
            DfaState {
                id: id as u32,
                accepting: nfa_set.iter().any(|&s| nfa.states()[s].is_accepting()),
                token,
                nfa_set,
                transitions: transitions
                    .into_iter()
                    .map(|(c, id)| (c, id as usize))
                    .collect(),
            }
        })
        .collect();

    Dfa { states, start: 0 }
}

fn set_key(set: &BTreeSet<usize>) -> Vec<usize> {
    set.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::thompson::compile_pattern;
    use crate::token::TokenType;

    fn dfa_for(pattern: &str, id: u32) -> Dfa {
        let postfix = crate::regex::to_postfix(pattern).unwrap();
        let nfa = compile_pattern(&postfix, TokenType::new(id, "T")).unwrap();
        let alphabet: Vec<char> = nfa.implied_alphabet().into_iter().collect();
        determinize(&nfa, &alphabet)
    }

    fn accepts(dfa: &Dfa, input: &str) -> bool {
        let mut state = dfa.start();
        for c in input.chars() {
            match dfa.step(state, c) {
                Some(s) => state = s,
                None => return false,
            }
        }
        dfa.states()[state].is_accepting()
    }

    #[test]
    fn deterministic_transitions_exist_per_char() {
        let dfa = dfa_for("a(b|c)*", 1);
        assert!(accepts(&dfa, "abcbc"));
        assert!(accepts(&dfa, "a"));
        assert!(!accepts(&dfa, "b"));
    }

    #[test]
    fn token_priority_picks_minimum_id_on_shared_accept() {
        // Two patterns sharing a final state (both match "a") should tag
        // the DFA's accepting state with the lower id.
        let postfix_a = crate::regex::to_postfix("a").unwrap();
        let postfix_b = crate::regex::to_postfix("a").unwrap();
        let nfa_a = compile_pattern(&postfix_a, TokenType::new(5, "LOW_PRIORITY")).unwrap();
        let nfa_b = compile_pattern(&postfix_b, TokenType::new(1, "HIGH_PRIORITY")).unwrap();
        let merged = crate::nfa::merge::merge(vec![nfa_a, nfa_b]);
        let alphabet: Vec<char> = merged.implied_alphabet().into_iter().collect();
        let dfa = determinize(&merged, &alphabet);
        let mut state = dfa.start();
        state = dfa.step(state, 'a').unwrap();
        assert_eq!(dfa.states()[state].token().unwrap().id, 1);
    }
}
