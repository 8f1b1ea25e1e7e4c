mod rules;

use std::collections::HashSet;

use crate::derivation::Derivation;
use crate::parse::Formula;

pub use self::rules::*;

/// Independently re-validates derivations, entry by entry.
#[derive(Debug, Default, Clone)]
pub struct Checker {
    hypotheses: HashSet<Formula>,
}

impl Checker {
    /// A checker that allows no hypotheses at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hypotheses<I>(hypotheses: I) -> Self
    where
        I: IntoIterator<Item = Formula>
    {
        Self {
            hypotheses: hypotheses.into_iter().collect()
        }
    }

    pub fn add_hypothesis(&mut self, f: Formula) {
        self.hypotheses.insert(f);
    }

    pub fn is_hypothesis(&self, f: &Formula) -> bool {
        self.hypotheses.contains(f)
    }

    pub fn check_derivation(&self, d: &Derivation) -> Result<(), CheckErrors> {
        let mut errors = Vec::new();

        for (i, e) in d.entries().iter().enumerate() {
            if let Err(err) = rule_for(&e.justification).validate(self, d, i) {
                errors.push( (i + 1, err) )
            }
        }

        if !errors.is_empty() {
            return Err(errors)
        }

        Ok(())
    }

    /// Check `d` and also require that it ends with `goal`.
    pub fn check_proof(&self, d: &Derivation, goal: &Formula) -> Result<(), CheckErrors> {
        let mut errors = match self.check_derivation(d) {
            Ok(()) => Vec::new(),
            Err(e) => e,
        };

        match d.conclusion() {
            None => errors.push( (0, CheckError::EmptyDerivation) ),
            Some(c) if c != goal => errors.push( (d.len(), CheckError::WrongConclusion) ),
            Some(_) => (),
        }

        if !errors.is_empty() {
            return Err(errors)
        }

        Ok(())
    }
}
