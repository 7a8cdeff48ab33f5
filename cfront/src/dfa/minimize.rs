//! # DFA Minimizer: table-filling (spec.md §4.5).
//!
//! Marks pairs of states distinguishable until a fixpoint, then merges
//! every still-unmarked (i.e. equivalent) pair via union-find. Reachability
//! pruning before minimizing is grounded on
//! `dandy::dfa::Dfa::reachable_state_idx`'s BFS; the fixpoint loop itself
//! follows spec.md §4.5 literally (a different algorithm shape than the
//! teacher's Hopcroft-style partition refinement, which has no notion of
//! per-token distinguishability to begin with).

use super::{Dfa, DfaState};
use std::collections::{HashMap, HashSet};

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

fn reachable_states(dfa: &Dfa) -> Vec<usize> {
    let mut seen = HashSet::from([dfa.start()]);
    let mut worklist = vec![dfa.start()];
    while let Some(s) = worklist.pop() {
        for &target in dfa.states()[s].transitions.values() {
            if seen.insert(target) {
                worklist.push(target);
            }
        }
    }
    let mut v: Vec<usize> = seen.into_iter().collect();
    v.sort_unstable();
    v
}

/// Minimizes `dfa`, preserving both the language and the token tags
/// (spec.md §4.5). Must never merge two accepting states that carry
/// different token types.
pub fn minimize(dfa: &Dfa, alphabet: &[char]) -> Dfa {
    let reachable = reachable_states(dfa);
    let n = reachable.len();
    // local index <-> original state index
    let to_local: HashMap<usize, usize> = reachable.iter().enumerate().map(|(i, &s)| (s, i)).collect();

    let accepting = |i: usize| dfa.states()[reachable[i]].accepting;
    let token_of = |i: usize| dfa.states()[reachable[i]].token.as_ref();

    let mut distinguishable = vec![vec![false; n]; n];
    for p in 0..n {
        for q in (p + 1)..n {
            let differ = accepting(p) != accepting(q)
                || (accepting(p) && accepting(q) && token_of(p) != token_of(q));
            if differ {
                distinguishable[p][q] = true;
                distinguishable[q][p] = true;
            }
        }
    }

    let transition_local = |i: usize, c: char| -> Option<usize> {
        dfa.states()[reachable[i]]
            .transitions
            .get(&c)
            .and_then(|&t| to_local.get(&t).copied())
    };

    let mut changed = true;
    while changed {
        changed = false;
        for p in 0..n {
            for q in (p + 1)..n {
                if distinguishable[p][q] {
                    continue;
                }
                for &c in alphabet {
                    let tp = transition_local(p, c);
                    let tq = transition_local(q, c);
                    let now_distinguishable = match (tp, tq) {
                        (Some(a), Some(b)) => a != b && distinguishable[a.min(b)][a.max(b)],
                        (None, None) => false,
                        _ => true,
                    };
                    if now_distinguishable {
                        distinguishable[p][q] = true;
                        distinguishable[q][p] = true;
                        changed = true;
                        break;
                    }
                }
            }
        }
    }

    let mut uf = UnionFind::new(n);
    for p in 0..n {
        for q in (p + 1)..n {
            if !distinguishable[p][q] {
                uf.union(p, q);
            }
        }
    }

    // Stable class ids: order classes by their lowest-index member.
    let mut class_of: Vec<usize> = (0..n).map(|i| uf.find(i)).collect();
    let mut roots: Vec<usize> = class_of.clone();
    roots.sort_unstable();
    roots.dedup();
    let root_rank: HashMap<usize, usize> = roots.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    for c in class_of.iter_mut() {
        *c = root_rank[c];
    }

    let num_classes = roots.len();
    let mut new_states: Vec<Option<DfaState>> = (0..num_classes).map(|_| None).collect();

    for class in 0..num_classes {
        let member = (0..n).find(|&i| class_of[i] == class).unwrap();
        let mut transitions = HashMap::new();
        for &c in alphabet {
            if let Some(target_local) = transition_local(member, c) {
                transitions.insert(c, class_of[target_local]);
            }
        }
        new_states[class] = Some(DfaState {
            id: class as u32,
            nfa_set: Vec::new(),
            accepting: accepting(member),
            token: token_of(member).cloned(),
            transitions,
        });
    }

    let start_local = to_local[&dfa.start()];
    Dfa {
        states: new_states.into_iter().map(Option::unwrap).collect(),
        start: class_of[start_local],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::build::determinize;
    use crate::nfa::thompson::compile_pattern;
    use crate::token::TokenType;

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
    fn minimizing_ab_star_abb_yields_four_states() {
        // Classic Hopcroft example: (a|b)*abb minimizes to 4 states.
        let postfix = crate::regex::to_postfix("(a|b)*abb").unwrap();
        let nfa = compile_pattern(&postfix, TokenType::new(1, "T")).unwrap();
        let alphabet = vec!['a', 'b'];
        let dfa = determinize(&nfa, &alphabet);
        let minimized = minimize(&dfa, &alphabet);
        assert_eq!(minimized.states().len(), 4);
        for input in ["abb", "aabb", "babb", "ababb"] {
            assert!(accepts(&minimized, input));
        }
        for input in ["ab", "abbb", "a", ""] {
            assert!(!accepts(&minimized, input));
        }
    }

    #[test]
    fn minimization_preserves_token_distinctions() {
        let postfix_a = crate::regex::to_postfix("a").unwrap();
        let postfix_b = crate::regex::to_postfix("b").unwrap();
        let nfa_a = compile_pattern(&postfix_a, TokenType::new(1, "A")).unwrap();
        let nfa_b = compile_pattern(&postfix_b, TokenType::new(2, "B")).unwrap();
        let merged = crate::nfa::merge::merge(vec![nfa_a, nfa_b]);
        let alphabet = vec!['a', 'b'];
        let dfa = determinize(&merged, &alphabet);
        let minimized = minimize(&dfa, &alphabet);

        let mut s = minimized.start();
        s = minimized.step(s, 'a').unwrap();
        assert_eq!(minimized.states()[s].token().unwrap().id, 1);

        let mut s2 = minimized.start();
        s2 = minimized.step(s2, 'b').unwrap();
        assert_eq!(minimized.states()[s2].token().unwrap().id, 2);
    }
}
