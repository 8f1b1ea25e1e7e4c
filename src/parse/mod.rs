use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

mod formula;

pub mod consts {
    pub const NEG: &str = "!";
    pub const IMP: &str = "->";

    /// Deepest parenthesis nesting, and longest chain of nested operators, a formula may have.
    pub const MAX_NESTING: usize = 512;
}

pub use formula::{Assignment, Assignments, Formula, Subformula};

/// Everything that can make a formula malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed formula: empty formula")]
    EmptyFormula,
    #[error("malformed formula: unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("malformed formula: encountered invalid character(s) {0:?}")]
    InvalidCharacter(Vec<String>),
    #[error("malformed formula: more than one top-level implication, add parentheses to disambiguate")]
    Ambiguous,
    #[error("malformed formula: missing operator or variable, or misplaced parentheses")]
    MissingOp,
    #[error("malformed formula: misuse of negation internally in formula")]
    BadUnary,
    #[error("malformed formula: nested deeper than {} levels", consts::MAX_NESTING)]
    TooDeep,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable {0:?} is not bound by the assignment")]
    UnboundVariable(String),
}

/// Parse a formula from its textual form.
///
/// Shorthand for [`Formula::parse`].
pub fn parse(i: &str) -> Result<Formula, ParseError> {
    Formula::parse(i)
}

/// Normalize operator spellings in a given string.
///
/// The token forms `IMP`/`NOT` and the usual logical symbols all become `->` and `!`.
pub fn normalize_ops(i: &str) -> String {
    use std::ops::Deref;
    use consts::*;

    static IMP_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"(?:\bIMP\b|→|⇒|⊃)"#).unwrap(), IMP) );
    static NEG_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"(?:\bNOT\b|¬|~)"#).unwrap(), NEG) );

    let pairs = [
        IMP_REGEX.deref(),
        NEG_REGEX.deref(),
    ];

    let mut out = i.to_owned();

    for (regex, norm) in pairs {
        out = regex.replace_all(&out, *norm).to_string();
    }

    out
}

/// Collapse runs of whitespace into single spaces, and drop
/// any space sitting directly inside a parenthesis.
pub fn normalize_spaces(i: &str) -> String {
    use std::ops::Deref;

    static WS_REGEX   : Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"\s+"#).unwrap(), " ") );
    static OPEN_REGEX : Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"\( "#).unwrap(), "(") );
    static CLOSE_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#" \)"#).unwrap(), ")") );

    let pairs = [
        WS_REGEX.deref(),
        OPEN_REGEX.deref(),
        CLOSE_REGEX.deref(),
    ];

    let mut out = i.trim().to_owned();

    for (regex, norm) in pairs {
        out = regex.replace_all(&out, *norm).to_string();
    }

    out
}
