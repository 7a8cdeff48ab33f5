//! Grammar symbols: the shared vocabulary terminals and nonterminals are
//! built from. A [`Symbol`] is a plain value — equality is by `(name, kind)`,
//! matching spec.md §3's "identity is their tuple".

use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

/// A named terminal or nonterminal. Cheap to clone (`Rc<str>` name).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: Rc<str>,
    kind: SymbolKind,
}

impl Symbol {
    pub fn terminal(name: impl Into<Rc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Terminal,
        }
    }

    pub fn nonterminal(name: impl Into<Rc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Nonterminal,
        }
    }

    /// The distinguished empty-string terminal `ε`. It is never part of a
    /// production's right-hand side (an empty `rhs` denotes ε instead); it
    /// only appears inside FIRST/FOLLOW sets.
    pub fn epsilon() -> Self {
        Self::terminal("ε")
    }

    /// The distinguished end-of-input terminal `$`.
    pub fn end_of_input() -> Self {
        Self::terminal("$")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == SymbolKind::Nonterminal
    }

    pub fn is_epsilon(&self) -> bool {
        self.is_terminal() && &*self.name == "ε"
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_name_and_kind() {
        assert_eq!(Symbol::terminal("a"), Symbol::terminal("a"));
        assert_ne!(Symbol::terminal("a"), Symbol::nonterminal("a"));
    }

    #[test]
    fn epsilon_and_end_are_distinguished_terminals() {
        assert!(Symbol::epsilon().is_terminal());
        assert!(Symbol::epsilon().is_epsilon());
        assert!(Symbol::end_of_input().is_terminal());
        assert!(!Symbol::end_of_input().is_epsilon());
    }
}
