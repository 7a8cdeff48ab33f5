//! # Grammar data model (spec.md §3) + FIRST/FOLLOW (spec.md §4.7).
//!
//! New relative to the teacher: `CMDJojo-dandy` has no context-free grammar
//! concept at all. The data shape (nonterminal + ordered alternatives) is
//! grounded on the `Finite-automata-and-formal-languages-dandy` fork's
//! `grammar::Grammar`/`grammar::Production`, but that fork only validates a
//! parsed grammar — it has no FIRST/FOLLOW, LR, or LALR machinery, which is
//! built fresh here in the validating-`TryFrom`/`thiserror` idiom the
//! teacher uses throughout (`nfa::parse::NfaParseError`,
//! `grammar::parse::GrammarParseError`).

pub mod first_follow;

use crate::symbol::Symbol;
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;

/// `A → X₁ … Xₙ`. An empty `rhs` denotes the production `A → ε`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} →", self.lhs)?;
        if self.rhs.is_empty() {
            write!(f, " ε")?;
        } else {
            for s in &self.rhs {
                write!(f, " {s}")?;
            }
        }
        Ok(())
    }
}

/// An immutable, validated context-free grammar (spec.md §3).
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) terminals: Vec<Symbol>,
    pub(crate) nonterminals: Vec<Symbol>,
    pub(crate) productions: Vec<Rc<Production>>,
    pub(crate) start: Symbol,
}

impl Grammar {
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[Symbol] {
        &self.nonterminals
    }

    pub fn productions(&self) -> &[Rc<Production>] {
        &self.productions
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("start symbol '{0}' is not declared as a nonterminal")]
    StartNotNonterminal(String),
    #[error("symbol '{0}' is used in a production but declared as neither a terminal nor a nonterminal")]
    UndeclaredSymbol(String),
    #[error("'{0}' is declared as both a terminal and a nonterminal")]
    TerminalNonterminalOverlap(String),
    #[error("production left-hand side '{0}' is not declared as a nonterminal")]
    ProductionLhsNotNonterminal(String),
}

/// Builds a [`Grammar`], validating spec.md §3's invariant on [`build`]:
/// every symbol used in any production appears in the terminal or
/// nonterminal set, and the start symbol is a nonterminal.
#[derive(Default)]
pub struct GrammarBuilder {
    terminals: Vec<Symbol>,
    nonterminals: Vec<Symbol>,
    productions: Vec<Production>,
    start: Option<Symbol>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminal(mut self, s: Symbol) -> Self {
        self.terminals.push(s);
        self
    }

    pub fn nonterminal(mut self, s: Symbol) -> Self {
        self.nonterminals.push(s);
        self
    }

    pub fn start(mut self, s: Symbol) -> Self {
        self.start = Some(s);
        self
    }

    pub fn production(mut self, p: Production) -> Self {
        self.productions.push(p);
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        use GrammarError::*;
        let Self {
            terminals,
            nonterminals,
            productions,
            start,
        } = self;

        let terminal_set: HashSet<&Symbol> = terminals.iter().collect();
        let nonterminal_set: HashSet<&Symbol> = nonterminals.iter().collect();

        if let Some(overlap) = terminal_set.intersection(&nonterminal_set).next() {
            return Err(TerminalNonterminalOverlap(overlap.name().to_string()));
        }

        let start = start.ok_or_else(|| StartNotNonterminal("<none>".to_string()))?;
        if !nonterminal_set.contains(&start) {
            return Err(StartNotNonterminal(start.name().to_string()));
        }

        for p in &productions {
            if !nonterminal_set.contains(&p.lhs) {
                return Err(ProductionLhsNotNonterminal(p.lhs.name().to_string()));
            }
            for s in &p.rhs {
                if !(terminal_set.contains(s) || nonterminal_set.contains(s)) {
                    return Err(UndeclaredSymbol(s.name().to_string()));
                }
            }
        }

        Ok(Grammar {
            terminals,
            nonterminals,
            productions: productions.into_iter().map(Rc::new).collect(),
            start,
        })
    }
}
