//! LALR(1) kernel merging and ACTION/GOTO table construction (spec.md §4.9).

use super::automaton::{self, AugmentedGrammar};
use super::item::core_key;
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// One entry of the ACTION table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

/// A shift/reduce or reduce/reduce conflict encountered while filling the
/// ACTION table (spec.md §4.9: "log every conflict; resolve deterministically").
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("shift/reduce conflict in state {state} on '{symbol}': shift kept, reduce by production {reduce_production} discarded")]
    ShiftReduce {
        state: usize,
        symbol: Symbol,
        reduce_production: usize,
    },
    #[error("reduce/reduce conflict in state {state} on '{symbol}': production {kept} kept over {discarded}")]
    ReduceReduce {
        state: usize,
        symbol: Symbol,
        kept: usize,
        discarded: usize,
    },
}

/// The LALR(1) parsing tables: ACTION, GOTO, the grammar they were built
/// from, and every conflict found along the way.
pub struct LalrTable {
    pub grammar: AugmentedGrammar,
    pub action: Vec<HashMap<Symbol, Action>>,
    pub goto: Vec<HashMap<Symbol, usize>>,
    pub conflicts: Vec<Conflict>,
}

/// Builds the LALR(1) tables for `grammar` (spec.md §4.9):
///
/// 1. Build the canonical LR(1) automaton.
/// 2. Merge states sharing a core (same `(production, dot)` pairs,
///    lookaheads ignored) into a single LALR state, unioning lookaheads.
/// 3. Fill ACTION/GOTO from the merged states, resolving conflicts by
///    preferring shift over reduce, and the lower-indexed production on a
///    reduce/reduce conflict — logging every conflict found.
pub fn build(grammar: &Grammar) -> LalrTable {
    let canonical = automaton::build(grammar);

    // Map each canonical LR(1) state to its LALR state id by core.
    let mut core_to_lalr: HashMap<BTreeSet<String>, usize> = HashMap::new();
    let mut lr_to_lalr: Vec<usize> = Vec::with_capacity(canonical.states.len());
    for state in &canonical.states {
        let key = core_key(state);
        let next_id = core_to_lalr.len();
        let id = *core_to_lalr.entry(key).or_insert(next_id);
        lr_to_lalr.push(id);
    }
    let num_lalr_states = core_to_lalr.len();

    // Union lookaheads per (state, production, dot) core.
    let mut merged_items: Vec<HashMap<(usize, usize), HashSet<Symbol>>> =
        (0..num_lalr_states).map(|_| HashMap::new()).collect();
    for (lr_id, state) in canonical.states.iter().enumerate() {
        let lalr_id = lr_to_lalr[lr_id];
        for item in state {
            merged_items[lalr_id]
                .entry((item.production, item.dot))
                .or_default()
                .insert(item.lookahead.clone());
        }
    }

    // Merge transitions; consistent across merged states by LALR theory.
    let mut lalr_transitions: Vec<HashMap<Symbol, usize>> = (0..num_lalr_states).map(|_| HashMap::new()).collect();
    for (lr_id, trans) in canonical.transitions.iter().enumerate() {
        let lalr_id = lr_to_lalr[lr_id];
        for (symbol, target) in trans {
            lalr_transitions[lalr_id]
                .entry(symbol.clone())
                .or_insert_with(|| lr_to_lalr[*target]);
        }
    }

    let mut action: Vec<HashMap<Symbol, Action>> = (0..num_lalr_states).map(|_| HashMap::new()).collect();
    let mut goto: Vec<HashMap<Symbol, usize>> = (0..num_lalr_states).map(|_| HashMap::new()).collect();
    let mut conflicts = Vec::new();

    for state in 0..num_lalr_states {
        for ((production, dot), lookaheads) in &merged_items[state] {
            let rhs_len = canonical.grammar.production(*production).rhs.len();
            if *dot < rhs_len {
                continue;
            }
            // Complete item: reduce (or accept for the augmenting production).
            if *production == canonical.grammar.augmenting_production() {
                action[state].insert(Symbol::end_of_input(), Action::Accept);
                continue;
            }
            for la in lookaheads {
                insert_reduce(&mut action, &mut conflicts, state, la.clone(), *production);
            }
        }
    }

    for (state, trans) in lalr_transitions.iter().enumerate() {
        for (symbol, &target) in trans {
            if symbol.is_terminal() {
                insert_shift(&mut action, &mut conflicts, state, symbol.clone(), target);
            } else {
                goto[state].insert(symbol.clone(), target);
            }
        }
    }

    for c in &conflicts {
        log::warn!("{c}");
    }

    LalrTable {
        grammar: canonical.grammar,
        action,
        goto,
        conflicts,
    }
}

/// Inserts a reduce action, resolving reduce/reduce conflicts by keeping
/// the lower production index and shift/reduce conflicts by keeping the
/// shift (spec.md §9's default conflict-resolution policy).
fn insert_reduce(
    action: &mut [HashMap<Symbol, Action>],
    conflicts: &mut Vec<Conflict>,
    state: usize,
    symbol: Symbol,
    production: usize,
) {
    match action[state].get(&symbol) {
        None => {
            action[state].insert(symbol, Action::Reduce(production));
        }
        Some(Action::Shift(_)) | Some(Action::Accept) => {
            conflicts.push(Conflict::ShiftReduce {
                state,
                symbol,
                reduce_production: production,
            });
        }
        Some(Action::Reduce(existing)) => {
            if production < *existing {
                let existing = *existing;
                conflicts.push(Conflict::ReduceReduce {
                    state,
                    symbol: symbol.clone(),
                    kept: production,
                    discarded: existing,
                });
                action[state].insert(symbol, Action::Reduce(production));
            } else if production > *existing {
                conflicts.push(Conflict::ReduceReduce {
                    state,
                    symbol,
                    kept: *existing,
                    discarded: production,
                });
            }
        }
    }
}

/// Inserts a shift action. A shift always wins over a previously-recorded
/// reduce (spec.md §9's default policy); two shifts on the same symbol from
/// the same merged state never disagree (LALR merge invariant).
fn insert_shift(
    action: &mut [HashMap<Symbol, Action>],
    conflicts: &mut Vec<Conflict>,
    state: usize,
    symbol: Symbol,
    target: usize,
) {
    match action[state].get(&symbol) {
        Some(Action::Reduce(reduce_production)) => {
            conflicts.push(Conflict::ShiftReduce {
                state,
                symbol: symbol.clone(),
                reduce_production: *reduce_production,
            });
            action[state].insert(symbol, Action::Shift(target));
        }
        _ => {
            action[state].insert(symbol, Action::Shift(target));
        }
    }
}
