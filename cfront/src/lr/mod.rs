//! # LR(1) automaton, LALR(1) table construction and the shift/reduce
//! engine (spec.md §4.8, §4.9, §4.10).
//!
//! Entirely net-new relative to `CMDJojo-dandy`, which stops at regular
//! languages. Grounded only in the teacher's general idioms — arena-style
//! `Vec`-indexed state storage (as in `dfa::Dfa`/`nfa::Nfa` here), canonical
//! sorted keys for set deduplication (as `dfa::build::set_key` does for NFA
//! subsets) — applied to the context-free case.

pub mod automaton;
pub mod engine;
pub mod item;
pub mod lalr;
