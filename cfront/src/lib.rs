//! Regex-to-DFA lexer generator and LALR(1) parser generator core.
//!
//! Two independent pipelines share the [`symbol`] and [`token`] vocabulary:
//!
//! - **Lexer**: [`regex`] parses a pattern into postfix form, [`nfa`]
//!   compiles it to Thompson-construction NFA fragments and merges several
//!   token patterns into one, [`dfa`] determinizes, minimizes and then
//!   simulates the result with maximal-munch tokenization.
//! - **Parser**: [`grammar`] holds the context-free grammar and its
//!   FIRST/FOLLOW sets, [`lr`] builds the canonical LR(1) automaton, merges
//!   it into LALR(1) ACTION/GOTO tables, and drives a table-based
//!   shift/reduce engine over a token stream.
//!
//! ```
//! let postfix = cfront::regex::to_postfix("a(b|c)*").unwrap();
//! assert!(!postfix.is_empty());
//! ```

pub mod dfa;
pub mod grammar;
pub mod lr;
pub mod nfa;
pub mod regex;
pub mod symbol;
pub mod token;
