//! The completeness construction.
//!
//! Every tautology gets an explicit derivation from the axioms alone. For each
//! full assignment the Kalmar construction derives the formula from that
//! assignment's signed literals; the driver then removes the literals one
//! variable at a time by deriving the formula under `x` and under `!x` and
//! merging the two with case elimination.
//!
//! The merge tree has depth `n` over `2^n` leaves, and each level multiplies the
//! length of the derivation by a constant factor, so proof size is exponential in
//! the number of variables. [`ProverConfig::max_variables`] caps it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod kalmar;

use crate::derivation::lemmas::case_elimination;
use crate::derivation::{discharge, Axiom, Derivation, DeriveError};
use crate::parse::{Assignment, EvalError, Formula};

pub use kalmar::kalmar;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProveError {
    #[error("formula is not a tautology, it is false under {counterexample:?}")]
    NotATautology {
        counterexample: Assignment,
    },
    #[error("formula has {count} variables, more than the configured limit of {limit}")]
    TooManyVariables {
        count : usize,
        limit : usize,
    },
    #[error("variable {0:?} is not bound by the assignment")]
    UnboundVariable(String),
    #[error(transparent)]
    Derive(#[from] DeriveError),
    #[error("derivation ended with {found} instead of {expected}")]
    UnexpectedConclusion {
        expected : String,
        found    : String,
    },
}

impl From<EvalError> for ProveError {
    fn from(e: EvalError) -> Self {
        match e {
            EvalError::UnboundVariable(v) => Self::UnboundVariable(v)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Formulas over more variables than this are rejected outright.
    pub max_variables       : usize,
    /// Formulas over more variables than this are proved, with a warning.
    pub warn_variables      : usize,
    /// Formulas over more variables than this, and over `max_variables`, are
    /// rejected before their truth table is enumerated.
    pub max_table_variables : usize,
    /// Prove axiom instances and `X -> X` directly instead of by completeness.
    pub shortcuts           : bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            max_variables       : 3,
            warn_variables      : 2,
            max_table_variables : 20,
            shortcuts           : true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Prover {
    config: ProverConfig,
}

/// Prove `f` with the default configuration.
pub fn prove(f: &Formula) -> Result<Derivation, ProveError> {
    Prover::default().prove(f)
}

impl Prover {
    pub fn new(config: ProverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Build a hypothesis-free derivation ending in `f`.
    ///
    /// Fails with [`ProveError::NotATautology`] when some assignment falsifies `f`.
    /// Formulas too large for both the truth table and the proof fail with
    /// [`ProveError::TooManyVariables`] whether or not they are tautologies.
    pub fn prove(&self, f: &Formula) -> Result<Derivation, ProveError> {
        // Axiom instances and X -> X are tautologies; no table needed.
        if self.config.shortcuts {
            if let Some(d) = shortcut(f)? {
                tracing::info!(formula = %f, len = d.len(), "proved directly");
                return Ok(d)
            }
        }

        let vars: Vec<String> = f
            .variables()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let too_many = ProveError::TooManyVariables {
            count: vars.len(),
            limit: self.config.max_variables,
        };

        if vars.len() > self.config.max_variables && vars.len() > self.config.max_table_variables {
            return Err(too_many)
        }

        if let Some(counterexample) = f.counterexample() {
            return Err(ProveError::NotATautology { counterexample })
        }

        if vars.len() > self.config.max_variables {
            return Err(too_many)
        }

        if vars.len() > self.config.warn_variables {
            tracing::warn!(
                formula = %f,
                variables = vars.len(),
                "proof size grows exponentially with the variable count"
            );
        }

        let d = eliminate(f, &vars, &mut Assignment::new())?;

        match d.conclusion() {
            Some(c) if c == f => (),
            c => {
                return Err(ProveError::UnexpectedConclusion {
                    expected : f.to_string(),
                    found    : c.map(Formula::to_string).unwrap_or_default(),
                })
            }
        }

        tracing::info!(formula = %f, len = d.len(), "proved by completeness");

        Ok(d)
    }
}

/// Formulas that are already an axiom, or `X -> X`.
fn shortcut(f: &Formula) -> Result<Option<Derivation>, DeriveError> {
    let mut d = Derivation::new();

    if let Some(ax) = Axiom::recognize(f) {
        d.axiom(ax);
        return Ok( Some(d) )
    }

    match f.as_implication() {
        Some((l, r)) if l == r => {
            d.self_implication(l)?;
            Ok( Some(d) )
        },
        _ => Ok(None)
    }
}

/// Derive `f` from the literals fixed in `fixed`, for every value of the variables in `free`.
fn eliminate(f: &Formula, free: &[String], fixed: &mut Assignment) -> Result<Derivation, ProveError> {
    let Some((x, rest)) = free.split_first() else {
        return kalmar(f, fixed)
    };

    fixed.insert(x.clone(), false);
    let negative = eliminate(f, rest, fixed)?;

    fixed.insert(x.clone(), true);
    let positive = eliminate(f, rest, fixed)?;

    fixed.remove(x);

    let x = Formula::atomic(x.as_str());

    // !x -> f and x -> f, still under the literals fixed so far.
    let negative = discharge(&negative, &x.negated())?;
    let positive = discharge(&positive, &x)?;

    let mut d = Derivation::new();
    let neg = d.splice(negative)?;
    let pos = d.splice(positive)?;
    d.apply( case_elimination(&x, f)?, &[pos, neg] )?;

    tracing::debug!(
        variable = %x,
        fixed = fixed.len(),
        len = d.len(),
        "eliminated variable"
    );

    Ok(d)
}
