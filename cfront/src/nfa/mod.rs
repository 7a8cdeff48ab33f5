//! # NFA Builder & shared NFA model
//!
//! An [`Nfa`] is an arena of [`NfaState`]s addressed by index (spec.md §9:
//! "prefer arenas of states addressed by index" over a pointer-rich graph).
//! States are built by [`thompson::compile_pattern`] from the postfix
//! stream [`crate::regex::to_postfix`] produces, and several tagged NFAs
//! are combined into one by [`merge::merge`].

pub mod merge;
pub mod thompson;

use crate::token::TokenType;
use std::collections::BTreeSet;

/// A state in the NFA arena: an ordered list of transitions (`None` label
/// means ε) plus whether it accepts, and if so which token it tags
/// (spec.md §3).
#[derive(Clone, Debug)]
pub struct NfaState {
    pub(crate) transitions: Vec<(Option<char>, usize)>,
    pub(crate) accepting: bool,
    pub(crate) token: Option<TokenType>,
}

impl NfaState {
    fn new() -> Self {
        Self {
            transitions: Vec::new(),
            accepting: false,
            token: None,
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn token(&self) -> Option<&TokenType> {
        self.token.as_ref()
    }

    pub fn transitions(&self) -> &[(Option<char>, usize)] {
        &self.transitions
    }
}

/// Allocates a fresh state in `states` and returns its index. The arena's
/// own length is the build-scoped id source spec.md §5 calls for (never a
/// process-global counter, so concurrent builds never interact) — this is
/// the generalized form of the teacher's `regex::StateCounter`.
pub(crate) fn alloc_state(states: &mut Vec<NfaState>) -> usize {
    let id = states.len();
    states.push(NfaState::new());
    id
}

/// A nondeterministic finite automaton with ε-moves: an arena of states
/// plus a start index. Any state with `accepting = true` may additionally
/// carry a token tag.
#[derive(Clone, Debug)]
pub struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) start: usize,
}

impl Nfa {
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// The smallest set containing `set` and closed under ε-transitions
    /// (spec.md §4.4).
    pub fn epsilon_closure(&self, set: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut closure = set.clone();
        let mut worklist: Vec<usize> = set.iter().copied().collect();
        while let Some(state) = worklist.pop() {
            for &(label, target) in &self.states[state].transitions {
                if label.is_none() && closure.insert(target) {
                    worklist.push(target);
                }
            }
        }
        closure
    }

    /// The set of states directly reachable from any state in `set` by a
    /// `c`-transition (spec.md §4.4).
    pub fn mov(&self, set: &BTreeSet<usize>, c: char) -> BTreeSet<usize> {
        set.iter()
            .flat_map(|&state| {
                self.states[state]
                    .transitions
                    .iter()
                    .filter(move |&&(label, _)| label == Some(c))
                    .map(|&(_, target)| target)
            })
            .collect()
    }

    /// The alphabet implied by this NFA's own transition labels (excluding
    /// ε). Convenient for callers who don't already know the full alphabet
    /// the way a caller supplying a custom `Σ` might.
    pub fn implied_alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.iter().filter_map(|&(label, _)| label))
            .collect()
    }
}
