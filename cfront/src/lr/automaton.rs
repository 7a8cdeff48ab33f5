//! The augmented grammar and canonical LR(1) automaton construction
//! (spec.md §4.8).

use super::item::{canonical_set_key, closure, goto, LrItem, LrItemSet};
use crate::grammar::first_follow::FirstFollow;
use crate::grammar::{Grammar, Production};
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// `grammar` with a fresh start production `S' → S` prepended, so the
/// accepting item is always `[S' → S ·, $]` (spec.md §4.8: "augment the
/// grammar with a new start symbol").
#[derive(Clone, Debug)]
pub struct AugmentedGrammar {
    pub start: Symbol,
    productions: Vec<Rc<Production>>,
}

impl AugmentedGrammar {
    pub fn new(grammar: &Grammar) -> Self {
        let start = Symbol::nonterminal(format!("{}'", grammar.start().name()));
        let mut productions = vec![Rc::new(Production::new(start.clone(), vec![grammar.start().clone()]))];
        productions.extend(grammar.productions().iter().cloned());
        Self { start, productions }
    }

    pub fn production(&self, idx: usize) -> &Production {
        &self.productions[idx]
    }

    pub fn productions(&self) -> &[Rc<Production>] {
        &self.productions
    }

    pub fn productions_with_lhs<'a>(&'a self, lhs: &'a Symbol) -> impl Iterator<Item = usize> + 'a {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| &p.lhs == lhs)
            .map(|(i, _)| i)
    }

    /// The index of the augmenting production `S' → S` — always `0`.
    pub fn augmenting_production(&self) -> usize {
        0
    }
}

/// The canonical collection of LR(1) item sets plus the GOTO transitions
/// between them (spec.md §4.8).
pub struct LrAutomaton {
    pub grammar: AugmentedGrammar,
    pub states: Vec<LrItemSet>,
    pub transitions: Vec<HashMap<Symbol, usize>>,
}

/// Builds the canonical LR(1) automaton for `grammar` (spec.md §4.8): seed
/// state 0 with `[S' → · S, $]`, then repeatedly apply GOTO for every symbol
/// that appears after a dot, merging states with identical item sets.
pub fn build(grammar: &Grammar) -> LrAutomaton {
    let augmented = AugmentedGrammar::new(grammar);
    let first_follow = FirstFollow::compute(grammar);

    let seed = LrItemSet::from([LrItem::new(augmented.augmenting_production(), 0, Symbol::end_of_input())]);
    let initial = closure(seed, &augmented, &first_follow);

    let mut states = vec![initial.clone()];
    let mut transitions: Vec<HashMap<Symbol, usize>> = vec![HashMap::new()];
    let mut key_to_id: HashMap<BTreeSet<String>, usize> = HashMap::new();
    key_to_id.insert(canonical_set_key(&initial), 0);

    let mut worklist = vec![0usize];
    while let Some(state_id) = worklist.pop() {
        let items = states[state_id].clone();
        for symbol in symbols_after_dot(&items, &augmented) {
            let target = goto(&items, &symbol, &augmented, &first_follow);
            if target.is_empty() {
                continue;
            }
            let key = canonical_set_key(&target);
            let target_id = *key_to_id.entry(key).or_insert_with(|| {
                let id = states.len();
                states.push(target.clone());
                transitions.push(HashMap::new());
                worklist.push(id);
                id
            });
            transitions[state_id].insert(symbol, target_id);
        }
    }

    LrAutomaton {
        grammar: augmented,
        states,
        transitions,
    }
}

fn symbols_after_dot(items: &LrItemSet, grammar: &AugmentedGrammar) -> Vec<Symbol> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if let Some(s) = item.dot_symbol(grammar) {
            if seen.insert(s.clone()) {
                out.push(s.clone());
            }
        }
    }
    out
}
