//! LR(1) items and the CLOSURE/GOTO operations (spec.md §4.8).

use super::automaton::AugmentedGrammar;
use crate::grammar::first_follow::FirstFollow;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashSet};

/// `[A → α · β, a]`: a production (by index into the owning
/// [`AugmentedGrammar`]), a dot position, and a single lookahead terminal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LrItem {
    pub production: usize,
    pub dot: usize,
    pub lookahead: Symbol,
}

impl LrItem {
    pub fn new(production: usize, dot: usize, lookahead: Symbol) -> Self {
        Self {
            production,
            dot,
            lookahead,
        }
    }

    /// The symbol immediately after the dot, or `None` if the dot is at the
    /// end (a complete item, ready to reduce).
    pub fn dot_symbol<'a>(&self, grammar: &'a AugmentedGrammar) -> Option<&'a Symbol> {
        grammar.production(self.production).rhs.get(self.dot)
    }

    pub fn is_complete(&self, grammar: &AugmentedGrammar) -> bool {
        self.dot >= grammar.production(self.production).rhs.len()
    }

    fn advanced(&self) -> LrItem {
        LrItem {
            dot: self.dot + 1,
            ..self.clone()
        }
    }

    fn core_key(&self) -> String {
        format!("{}.{}", self.production, self.dot)
    }
}

pub type LrItemSet = HashSet<LrItem>;

/// A canonical, order-independent identity for an item set, used to
/// deduplicate automaton states (spec.md §4.8: "two states with identical
/// item sets are the same state").
pub fn canonical_set_key(items: &LrItemSet) -> BTreeSet<String> {
    items
        .iter()
        .map(|i| format!("{}.{}/{}", i.production, i.dot, i.lookahead.name()))
        .collect()
}

/// CLOSURE(I) (spec.md §4.8): for every item `[A → α · B β, a]` with `B` a
/// nonterminal, add `[B → · γ, b]` for every production `B → γ` and every
/// `b ∈ FIRST(βa)`.
pub fn closure(seed: LrItemSet, grammar: &AugmentedGrammar, first_follow: &FirstFollow) -> LrItemSet {
    let mut items = seed;
    let mut worklist: Vec<LrItem> = items.iter().cloned().collect();

    while let Some(item) = worklist.pop() {
        let Some(b) = item.dot_symbol(grammar) else {
            continue;
        };
        if !b.is_nonterminal() {
            continue;
        }
        let b = b.clone();

        let rhs = &grammar.production(item.production).rhs;
        let mut beta_a: Vec<Symbol> = rhs[item.dot + 1..].to_vec();
        beta_a.push(item.lookahead.clone());
        let lookaheads = first_follow.first_of_sequence(&beta_a);

        for prod_idx in grammar.productions_with_lhs(&b) {
            for la in &lookaheads {
                if la.is_epsilon() {
                    continue;
                }
                let new_item = LrItem::new(prod_idx, 0, la.clone());
                if items.insert(new_item.clone()) {
                    worklist.push(new_item);
                }
            }
        }
    }

    items
}

/// GOTO(I, X) (spec.md §4.8): advance the dot past `X` in every item of `I`
/// where `X` is next, then close the result.
pub fn goto(items: &LrItemSet, x: &Symbol, grammar: &AugmentedGrammar, first_follow: &FirstFollow) -> LrItemSet {
    let moved: LrItemSet = items
        .iter()
        .filter(|it| it.dot_symbol(grammar) == Some(x))
        .map(LrItem::advanced)
        .collect();
    closure(moved, grammar, first_follow)
}

/// The core of an item set — `(production, dot)` pairs with lookaheads
/// stripped — used by the LALR(1) kernel merge (spec.md §4.9) to decide
/// which canonical LR(1) states share a kernel.
pub fn core_key(items: &LrItemSet) -> BTreeSet<String> {
    items.iter().map(LrItem::core_key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, GrammarBuilder, Production};

    fn paren_grammar() -> Grammar {
        // S -> ( S ) | a
        let s = Symbol::nonterminal("S");
        let lparen = Symbol::terminal("(");
        let rparen = Symbol::terminal(")");
        let a = Symbol::terminal("a");
        GrammarBuilder::new()
            .nonterminal(s.clone())
            .terminal(lparen.clone())
            .terminal(rparen.clone())
            .terminal(a.clone())
            .start(s.clone())
            .production(Production::new(s.clone(), vec![lparen, s.clone(), rparen]))
            .production(Production::new(s, vec![a]))
            .build()
            .unwrap()
    }

    #[test]
    fn closure_adds_productions_of_the_symbol_after_the_dot() {
        let g = paren_grammar();
        let ff = FirstFollow::compute(&g);
        let augmented = AugmentedGrammar::new(&g);
        let seed = LrItemSet::from([LrItem::new(0, 0, Symbol::end_of_input())]);
        let closed = closure(seed, &augmented, &ff);
        // Should contain the augmented item, plus both S productions with
        // lookahead $ (since S' -> . S and FIRST(epsilon $) = {$}).
        assert!(closed.contains(&LrItem::new(0, 0, Symbol::end_of_input())));
        assert_eq!(closed.len(), 1 + 2); // S' item + S -> (S) + S -> a
    }

    #[test]
    fn goto_advances_the_dot_and_recloses() {
        let g = paren_grammar();
        let ff = FirstFollow::compute(&g);
        let augmented = AugmentedGrammar::new(&g);
        let seed = LrItemSet::from([LrItem::new(0, 0, Symbol::end_of_input())]);
        let closed = closure(seed, &augmented, &ff);
        let after_lparen = goto(&closed, &Symbol::terminal("("), &augmented, &ff);
        // after "(" we should again be able to see S -> . ( S ) and S -> . a
        assert!(after_lparen
            .iter()
            .any(|it| it.production == 1 && it.dot == 1)); // S -> ( . S )
    }
}
