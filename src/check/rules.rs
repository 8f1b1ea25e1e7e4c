use thiserror::Error;

use crate::derivation::*;

use super::Checker;

pub type CheckErrors = Vec<(usize, CheckError)>;

pub trait Rule {
    /// Verifies that the justification cited by entry `i` is used correctly.
    fn is_right(&self, c: &Checker, d: &Derivation, i: usize) -> Result<(), CheckError>;

    /// Validate entry `i` of the derivation.
    fn validate(&self, c: &Checker, d: &Derivation, i: usize) -> Result<(), CheckError> {
        // Sequence numbers run 1, 2, 3, ... with no gaps.
        if d[i].n != i + 1 {
            return Err(CheckError::BadNumbering)
        }

        self.is_right(c, d, i)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("sequence number does not match the entry's position")]
    BadNumbering,
    #[error("formula is not the instance of the cited axiom schema")]
    BadAxiom,
    #[error("formula is not one of the allowed hypotheses")]
    UnknownHypothesis,
    #[error("cited a current or future entry, or an entry that does not exist")]
    BadCitation,
    #[error("cited entries do not have the shape A and A -> B")]
    BadUsage,
    #[error("derivation does not end with the expected formula")]
    WrongConclusion,
    #[error("derivation is empty")]
    EmptyDerivation,
}

/// Pick the rule that checks a given justification.
pub(crate) fn rule_for(j: &Justification) -> &'static dyn Rule {
    match j {
        Justification::Axiom(_) => &AxiomInstance,
        Justification::Hypothesis => &Premise,
        Justification::ModusPonens(..) => &ModusPonens,
    }
}

struct AxiomInstance;

impl Rule for AxiomInstance {
    fn is_right(&self, _c: &Checker, d: &Derivation, i: usize) -> Result<(), CheckError> {
        let Justification::Axiom(ax) = &d[i].justification else {
            return Err(CheckError::BadUsage)
        };

        if ax.instantiate() != d[i].formula {
            return Err(CheckError::BadAxiom)
        }

        Ok(())
    }
}

struct Premise;

impl Rule for Premise {
    fn is_right(&self, c: &Checker, d: &Derivation, i: usize) -> Result<(), CheckError> {
        if !c.is_hypothesis(&d[i].formula) {
            return Err(CheckError::UnknownHypothesis)
        }

        Ok(())
    }
}

struct ModusPonens;

impl Rule for ModusPonens {
    fn is_right(&self, _c: &Checker, d: &Derivation, i: usize) -> Result<(), CheckError> {
        let &Justification::ModusPonens(a, b) = &d[i].justification else {
            return Err(CheckError::BadUsage)
        };

        // Only strictly earlier entries may be cited.
        if a >= i || b >= i {
            return Err(CheckError::BadCitation)
        }

        let Some((lhs, rhs)) = d[b].formula.as_implication() else {
            return Err(CheckError::BadUsage)
        };

        if *lhs == d[a].formula && *rhs == d[i].formula {
            Ok(())
        } else {
            Err(CheckError::BadUsage)
        }
    }
}
