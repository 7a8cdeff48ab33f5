//! # FIRST/FOLLOW fixed-point analyzer (spec.md §4.7).
//!
//! Net-new: the teacher has no grammar-analysis code at all. The
//! worklist-to-fixpoint shape is grounded on the same pattern
//! `nfa::mod::epsilon_closure` uses elsewhere in this crate (seed a
//! worklist, keep folding in new members until nothing changes), applied
//! here to FIRST/FOLLOW per spec.md §4.7's explicit hint.

use super::Grammar;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

/// `FIRST` and `FOLLOW` sets for every symbol of a [`Grammar`], computed once
/// and reused by the LR(1) automaton builder.
pub struct FirstFollow {
    first: HashMap<Symbol, HashSet<Symbol>>,
    follow: HashMap<Symbol, HashSet<Symbol>>,
}

impl FirstFollow {
    /// Computes FIRST for every terminal and nonterminal, then FOLLOW for
    /// every nonterminal, per spec.md §4.7's standard fixed-point rules.
    pub fn compute(grammar: &Grammar) -> Self {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);
        Self { first, follow }
    }

    pub fn first(&self, s: &Symbol) -> &HashSet<Symbol> {
        static EMPTY: once_empty::Once = once_empty::Once::new();
        self.first.get(s).unwrap_or_else(|| EMPTY.get())
    }

    pub fn follow(&self, s: &Symbol) -> &HashSet<Symbol> {
        static EMPTY: once_empty::Once = once_empty::Once::new();
        self.follow.get(s).unwrap_or_else(|| EMPTY.get())
    }

    /// FIRST of a string of symbols `β` (spec.md §4.8 uses this for
    /// lookahead computation in CLOSURE): the union of FIRST of each symbol
    /// up to and including the first one that cannot derive ε, plus ε itself
    /// if the whole string can.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> HashSet<Symbol> {
        let mut result = HashSet::new();
        let mut all_nullable = true;
        for s in symbols {
            let f = self.first_including_unregistered_terminals(s);
            result.extend(f.iter().filter(|t| !t.is_epsilon()).cloned());
            if !f.iter().any(Symbol::is_epsilon) {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            result.insert(Symbol::epsilon());
        }
        result
    }

    /// Like [`first`](Self::first), but terminals absent from the grammar's
    /// declared terminal set (the lookahead markers `$` and `ε`) still yield
    /// themselves — they are terminals by construction, just never added to
    /// a [`Grammar`] via [`GrammarBuilder::terminal`](crate::grammar::GrammarBuilder::terminal).
    fn first_including_unregistered_terminals(&self, s: &Symbol) -> HashSet<Symbol> {
        match self.first.get(s) {
            Some(f) => f.clone(),
            None if s.is_terminal() => HashSet::from([s.clone()]),
            None => HashSet::new(),
        }
    }
}

/// A thread-unsafe-but-fine lazily-initialized empty set, used only so
/// [`FirstFollow::first`]/[`follow`] can return `&HashSet` for symbols with
/// no recorded entry (e.g. the end-of-input marker) without allocating.
mod once_empty {
    use crate::symbol::Symbol;
    use std::collections::HashSet;
    use std::sync::OnceLock;

    pub struct Once(OnceLock<HashSet<Symbol>>);

    impl Once {
        pub const fn new() -> Self {
            Self(OnceLock::new())
        }

        pub fn get(&self) -> &HashSet<Symbol> {
            self.0.get_or_init(HashSet::new)
        }
    }
}

fn compute_first(grammar: &Grammar) -> HashMap<Symbol, HashSet<Symbol>> {
    let mut first: HashMap<Symbol, HashSet<Symbol>> = HashMap::new();

    for t in grammar.terminals() {
        first.entry(t.clone()).or_default().insert(t.clone());
    }
    for nt in grammar.nonterminals() {
        first.entry(nt.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;
        for p in grammar.productions() {
            if p.rhs.is_empty() {
                changed |= first.get_mut(&p.lhs).unwrap().insert(Symbol::epsilon());
                continue;
            }

            let mut all_nullable = true;
            for s in &p.rhs {
                let f_s = first.get(s).cloned().unwrap_or_default();
                let lhs_first = first.get_mut(&p.lhs).unwrap();
                for sym in f_s.iter().filter(|t| !t.is_epsilon()) {
                    changed |= lhs_first.insert(sym.clone());
                }
                if !f_s.iter().any(Symbol::is_epsilon) {
                    all_nullable = false;
                    break;
                }
            }
            if all_nullable {
                changed |= first.get_mut(&p.lhs).unwrap().insert(Symbol::epsilon());
            }
        }
    }

    first
}

fn compute_follow(
    grammar: &Grammar,
    first: &HashMap<Symbol, HashSet<Symbol>>,
) -> HashMap<Symbol, HashSet<Symbol>> {
    let mut follow: HashMap<Symbol, HashSet<Symbol>> =
        grammar.nonterminals().iter().map(|nt| (nt.clone(), HashSet::new())).collect();
    follow.entry(grammar.start().clone()).or_default().insert(Symbol::end_of_input());

    let first_of = |s: &Symbol| first.get(s).cloned().unwrap_or_default();

    let mut changed = true;
    while changed {
        changed = false;
        for p in grammar.productions() {
            for (i, b) in p.rhs.iter().enumerate() {
                if !b.is_nonterminal() {
                    continue;
                }
                let rest = &p.rhs[i + 1..];
                let mut first_rest = HashSet::new();
                let mut rest_nullable = true;
                for sym in rest {
                    let f = first_of(sym);
                    first_rest.extend(f.iter().filter(|t| !t.is_epsilon()).cloned());
                    if !f.iter().any(Symbol::is_epsilon) {
                        rest_nullable = false;
                        break;
                    }
                }

                let follow_b = follow.entry(b.clone()).or_default();
                for sym in &first_rest {
                    changed |= follow_b.insert(sym.clone());
                }

                if rest_nullable {
                    let follow_lhs = follow.get(&p.lhs).cloned().unwrap_or_default();
                    let follow_b = follow.entry(b.clone()).or_default();
                    for sym in follow_lhs {
                        changed |= follow_b.insert(sym);
                    }
                }
            }
        }
    }

    follow
}
