use thiserror::Error;

/// Everything that can go wrong turning a pattern string into a tagged NFA.
/// Surfaced at compile time (spec.md §7's `MalformedPattern`); the pattern
/// is rejected outright, there is no partial/recoverable result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is empty")]
    EmptyPattern,
    #[error("unbalanced parentheses in pattern")]
    UnbalancedParens,
    #[error("trailing backslash with nothing to escape")]
    TrailingBackslash,
    #[error("operator '{0}' has nothing to apply to")]
    DanglingOperator(char),
    #[error("pattern did not parse as a single expression (internal stack had {0} items)")]
    MalformedExpression(usize),
}
