//! Property tests for the lexer and parser pipelines, in the mixed
//! plain-`#[test]`/`proptest!` style `dandy::tests` uses.

use cfront::dfa::build::determinize;
use cfront::dfa::minimize::minimize;
use cfront::dfa::simulate::tokenize;
use cfront::grammar::first_follow::FirstFollow;
use cfront::grammar::{Grammar, GrammarBuilder, Production};
use cfront::lr::automaton;
use cfront::lr::item::core_key;
use cfront::nfa::merge::merge;
use cfront::nfa::thompson::compile_pattern;
use cfront::regex::to_postfix;
use cfront::symbol::Symbol;
use cfront::token::TokenType;
use proptest::prelude::*;
use std::collections::HashSet;

fn ab_star_abb_dfa() -> (cfront::dfa::Dfa, Vec<char>) {
    let postfix = to_postfix("(a|b)*abb").unwrap();
    let nfa = compile_pattern(&postfix, TokenType::new(0, "T")).unwrap();
    let alphabet = vec!['a', 'b'];
    let dfa = determinize(&nfa, &alphabet);
    (dfa, alphabet)
}

fn accepts(dfa: &cfront::dfa::Dfa, input: &str) -> bool {
    let mut state = dfa.start();
    for c in input.chars() {
        match dfa.step(state, c) {
            Some(s) => state = s,
            None => return false,
        }
    }
    dfa.states()[state].is_accepting()
}

proptest! {
    /// Minimization must never change which strings a DFA accepts.
    #[test]
    fn minimize_preserves_acceptance(input in "[ab]{0,20}") {
        let (dfa, alphabet) = ab_star_abb_dfa();
        let minimized = minimize(&dfa, &alphabet);
        prop_assert_eq!(accepts(&dfa, &input), accepts(&minimized, &input));
    }

    /// Every character of the input is accounted for by exactly one token's
    /// lexeme, in order — maximal munch never drops or duplicates input.
    #[test]
    fn tokenize_covers_the_whole_input(input in "[a-z ]{0,30}") {
        let keyword = compile_pattern(&to_postfix("if|for").unwrap(), TokenType::new(0, "KEYWORD")).unwrap();
        let ident = compile_pattern(
            &to_postfix("(a|b|c|d|e|f|g|h|i|j|k|l|m|n|o|p|q|r|s|t|u|v|w|x|y|z)+").unwrap(),
            TokenType::new(1, "IDENT"),
        ).unwrap();
        let merged = merge(vec![keyword, ident]);
        let alphabet: Vec<char> = merged.implied_alphabet().into_iter().collect();
        let dfa = determinize(&merged, &alphabet);

        let tokens = tokenize(&dfa, &input);
        let reconstructed: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        prop_assert_eq!(reconstructed, input);
    }
}

fn arithmetic_grammar() -> Grammar {
    let e = Symbol::nonterminal("E");
    let t = Symbol::nonterminal("T");
    let f = Symbol::nonterminal("F");
    let plus = Symbol::terminal("+");
    let star = Symbol::terminal("*");
    let lparen = Symbol::terminal("(");
    let rparen = Symbol::terminal(")");
    let id = Symbol::terminal("id");

    GrammarBuilder::new()
        .nonterminal(e.clone())
        .nonterminal(t.clone())
        .nonterminal(f.clone())
        .terminal(plus.clone())
        .terminal(star.clone())
        .terminal(lparen.clone())
        .terminal(rparen.clone())
        .terminal(id.clone())
        .start(e.clone())
        .production(Production::new(e.clone(), vec![e.clone(), plus, t.clone()]))
        .production(Production::new(e.clone(), vec![t.clone()]))
        .production(Production::new(t.clone(), vec![t.clone(), star, f.clone()]))
        .production(Production::new(t.clone(), vec![f.clone()]))
        .production(Production::new(f.clone(), vec![lparen, e, rparen]))
        .production(Production::new(f, vec![id]))
        .build()
        .unwrap()
}

/// `S -> i S e S | i S | a` — the classic dangling-else grammar (spec.md §8
/// scenario 4), kept separate from `arithmetic_grammar` since it's the one
/// with an actual Shift/Reduce conflict to merge kernels around.
fn dangling_else_grammar() -> Grammar {
    let s = Symbol::nonterminal("S");
    let i = Symbol::terminal("i");
    let e = Symbol::terminal("e");
    let a = Symbol::terminal("a");
    GrammarBuilder::new()
        .nonterminal(s.clone())
        .terminal(i.clone())
        .terminal(e.clone())
        .terminal(a.clone())
        .start(s.clone())
        .production(Production::new(s.clone(), vec![i.clone(), s.clone(), e, s.clone()]))
        .production(Production::new(s.clone(), vec![i, s.clone()]))
        .production(Production::new(s, vec![a]))
        .build()
        .unwrap()
}

/// spec.md §8: "after [FIRST/FOLLOW] computation, one additional iteration
/// yields no growth." Simulates that extra iteration directly against the
/// converged sets `FirstFollow::compute` already returns: for every
/// production `A -> X1...Xn`, applying the FIRST-update rule once more using
/// the already-computed sets must add nothing beyond what's already in
/// `FIRST(A)`/`FOLLOW(Xi)`.
#[test]
fn first_follow_reaches_a_fixpoint() {
    for grammar in [arithmetic_grammar(), dangling_else_grammar()] {
        let ff = FirstFollow::compute(&grammar);

        for p in grammar.productions() {
            let rhs_first = ff.first_of_sequence(&p.rhs);
            let lhs_first = ff.first(&p.lhs);
            for sym in rhs_first.iter().filter(|s| !s.is_epsilon()) {
                assert!(
                    lhs_first.contains(sym),
                    "one more FIRST iteration would add {sym} to FIRST({}) — not a fixpoint",
                    p.lhs
                );
            }
            if rhs_first.iter().any(Symbol::is_epsilon) {
                assert!(lhs_first.contains(&Symbol::epsilon()));
            }

            for (i, b) in p.rhs.iter().enumerate() {
                if !b.is_nonterminal() {
                    continue;
                }
                let rest_first = ff.first_of_sequence(&p.rhs[i + 1..]);
                let follow_b = ff.follow(b);
                for sym in rest_first.iter().filter(|s| !s.is_epsilon()) {
                    assert!(
                        follow_b.contains(sym),
                        "one more FOLLOW iteration would add {sym} to FOLLOW({b}) — not a fixpoint"
                    );
                }
                if rest_first.iter().any(Symbol::is_epsilon) {
                    let follow_lhs = ff.follow(&p.lhs);
                    for sym in follow_lhs {
                        assert!(
                            follow_b.contains(sym),
                            "one more FOLLOW iteration would add {sym} to FOLLOW({b}) via FOLLOW({}) — not a fixpoint",
                            p.lhs
                        );
                    }
                }
            }
        }
    }
}

/// spec.md §8: "every LR(1) state's kernel is a kernel of exactly one LALR
/// state; the LALR-induced goto graph is consistent with the LR(1) goto
/// graph under the merge map." Groups the canonical LR(1) states by kernel
/// directly (the same grouping `lr::lalr::build` performs internally) and
/// checks both halves of that invariant structurally.
#[test]
fn lalr_kernels_partition_canonical_lr1_states_with_consistent_gotos() {
    let grammar = dangling_else_grammar();
    let lr1 = automaton::build(&grammar);

    let mut core_to_states: std::collections::HashMap<_, Vec<usize>> = std::collections::HashMap::new();
    for (id, state) in lr1.states.iter().enumerate() {
        core_to_states.entry(core_key(state)).or_default().push(id);
    }

    // Every canonical state lands in exactly one kernel group — grouping by
    // a single key is exactly "a kernel of exactly one LALR state".
    let total_grouped: usize = core_to_states.values().map(Vec::len).sum();
    assert_eq!(total_grouped, lr1.states.len());

    // States sharing a kernel must agree, for every symbol, on which
    // kernel they transition to — otherwise merging them would make the
    // LALR goto graph inconsistent with the canonical one.
    for states_in_group in core_to_states.values() {
        let mut target_cores_per_symbol: std::collections::HashMap<Symbol, HashSet<Vec<String>>> =
            std::collections::HashMap::new();
        for &state_id in states_in_group {
            for (symbol, &target) in &lr1.transitions[state_id] {
                let target_core: Vec<String> = core_key(&lr1.states[target]).into_iter().collect();
                target_cores_per_symbol
                    .entry(symbol.clone())
                    .or_default()
                    .insert(target_core);
            }
        }
        for (symbol, cores) in &target_cores_per_symbol {
            assert_eq!(
                cores.len(),
                1,
                "states sharing a kernel transition to inconsistent kernels on '{symbol}'"
            );
        }
    }
}
