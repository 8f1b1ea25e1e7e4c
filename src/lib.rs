//! Constructive completeness for the implication/negation fragment of
//! propositional logic: every tautology gets an explicit Hilbert-style derivation.
mod check;
mod derivation;
mod parse;
mod prove;

pub use parse::*;
pub use derivation::*;
pub use check::*;
pub use prove::*;
