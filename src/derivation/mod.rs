use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse::Formula;

mod deduction;
pub mod lemmas;

pub use deduction::discharge;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeriveError {
    #[error("modus ponens cannot be applied to F_{antecedent} and F_{implication}")]
    InvalidModusPonens {
        antecedent  : usize,
        implication : usize,
    },
    #[error("cited entry {0} does not exist")]
    MissingEntry(usize),
    #[error("expected a non-empty derivation")]
    EmptyDerivation,
    #[error("cannot discharge hypothesis at F_{step}: {missing} was never derived")]
    Undischargeable {
        step    : usize,
        missing : String,
    },
    #[error("while deriving {name}: {source}")]
    Lemma {
        name   : &'static str,
        source : Box<DeriveError>,
    },
}

/// An instance of one of the three axiom schemas.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axiom {
    /// `F -> (G -> F)`
    A1(Formula, Formula),
    /// `(F -> (G -> H)) -> ((F -> G) -> (F -> H))`
    A2(Formula, Formula, Formula),
    /// `(!G -> !F) -> ((!G -> F) -> G)`
    A3(Formula, Formula),
}

impl Axiom {
    /// Build the formula this instance stands for.
    pub fn instantiate(&self) -> Formula {
        match self {
            Self::A1(f, g) => f.implies( &g.implies(f) ),
            Self::A2(f, g, h) => {
                let l = f.implies( &g.implies(h) );
                let r = f.implies(g).implies( &f.implies(h) );

                l.implies(&r)
            },
            Self::A3(f, g) => {
                let l = g.negated().implies( &f.negated() );
                let r = g.negated().implies(f).implies(g);

                l.implies(&r)
            }
        }
    }

    /// Which schema this is an instance of.
    pub fn schema(&self) -> u8 {
        match self {
            Self::A1(..) => 1,
            Self::A2(..) => 2,
            Self::A3(..) => 3,
        }
    }

    /// Recognize `formula` as an instance of some schema.
    pub fn recognize(formula: &Formula) -> Option<Self> {
        let (l, r) = formula.as_implication()?;

        let mut candidates = Vec::with_capacity(3);

        if let Some((g, _)) = r.as_implication() {
            candidates.push( Self::A1(l.clone(), g.clone()) );
        }

        if let Some((f, gh)) = l.as_implication() {
            if let Some((g, h)) = gh.as_implication() {
                candidates.push( Self::A2(f.clone(), g.clone(), h.clone()) );
            }
        }

        if let Some((Formula::Neg(g), Formula::Neg(f))) = l.as_implication() {
            candidates.push( Self::A3((**f).clone(), (**g).clone()) );
        }

        candidates
            .into_iter()
            .find(|ax| ax.instantiate() == *formula)
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A1(a, b) | Self::A3(a, b) => {
                write!(f, "Axiom A{} applied to: F: {a}, G: {b}", self.schema())
            },
            Self::A2(a, b, c) => {
                write!(f, "Axiom A2 applied to: F: {a}, G: {b}, H: {c}")
            }
        }
    }
}

/// How an entry came to be part of a derivation.
///
/// Modus ponens cites its premises by position in the derivation, never by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justification {
    Axiom(Axiom),
    Hypothesis,
    /// Indices of the antecedent `A` and the implication `A -> B`.
    ModusPonens(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// One-based sequence number.
    pub n: usize,
    pub formula: Formula,
    pub justification: Justification,
}

impl Entry {
    pub fn is_hypothesis(&self) -> bool {
        self.justification == Justification::Hypothesis
    }
}

/// An append-only sequence of justified formulas.
///
/// Entry `i` always carries sequence number `i + 1`. Splicing another
/// derivation onto this one renumbers the incoming entries and shifts
/// their modus ponens citations accordingly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    entries: Vec<Entry>,
}

impl Derivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries produced elsewhere. Nothing is validated;
    /// run the result through a [`Checker`](crate::Checker) before trusting it.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, i: usize) -> Option<&Entry> {
        self.entries.get(i)
    }

    /// The formula this derivation ends with.
    pub fn conclusion(&self) -> Option<&Formula> {
        self.entries.last().map(|e| &e.formula)
    }

    /// Index of the last entry.
    pub fn last_index(&self) -> Result<usize, DeriveError> {
        self.entries
            .len()
            .checked_sub(1)
            .ok_or(DeriveError::EmptyDerivation)
    }

    /// Formulas entered as hypotheses, in order of appearance.
    pub fn hypotheses(&self) -> impl Iterator<Item = &Formula> {
        self.entries
            .iter()
            .filter(|e| e.is_hypothesis() )
            .map(|e| &e.formula)
    }

    fn push(&mut self, formula: Formula, justification: Justification) -> usize {
        let n = self.entries.len() + 1;

        self.entries.push(Entry {
            n,
            formula,
            justification,
        });

        n - 1
    }

    pub fn axiom(&mut self, ax: Axiom) -> usize {
        let formula = ax.instantiate();
        self.push( formula, Justification::Axiom(ax) )
    }

    /// Enter `f` as a hypothesis.
    pub fn hypothesis(&mut self, f: Formula) -> usize {
        self.push(f, Justification::Hypothesis)
    }

    /// From entry `a` holding `A` and entry `b` holding `A -> B`, derive `B`.
    pub fn modus_ponens(&mut self, a: usize, b: usize) -> Result<usize, DeriveError> {
        let antecedent = self.get(a).ok_or(DeriveError::MissingEntry(a))?;
        let implication = self.get(b).ok_or(DeriveError::MissingEntry(b))?;

        let Some((lhs, rhs)) = implication.formula.as_implication() else {
            return Err(DeriveError::InvalidModusPonens { antecedent: a + 1, implication: b + 1 })
        };

        if *lhs != antecedent.formula {
            return Err(DeriveError::InvalidModusPonens { antecedent: a + 1, implication: b + 1 })
        }

        let rhs = rhs.clone();
        Ok( self.push( rhs, Justification::ModusPonens(a, b) ) )
    }

    /// The fixed five step proof of `F -> F`.
    pub fn self_implication(&mut self, f: &Formula) -> Result<usize, DeriveError> {
        let ff = f.implies(f);

        let a2 = self.axiom( Axiom::A2(f.clone(), ff.clone(), f.clone()) );
        let a1 = self.axiom( Axiom::A1(f.clone(), ff) );
        let mp = self.modus_ponens(a1, a2)?;
        let a1 = self.axiom( Axiom::A1(f.clone(), f.clone()) );

        self.modus_ponens(a1, mp)
    }

    /// Append every entry of `other`, returning the new index of its last entry.
    pub fn splice(&mut self, other: Derivation) -> Result<usize, DeriveError> {
        if other.is_empty() {
            return Err(DeriveError::EmptyDerivation)
        }

        let offset = self.entries.len();

        self.entries.extend(
            other.entries
                .into_iter()
                .map(|mut e| {
                    e.n += offset;

                    if let Justification::ModusPonens(a, b) = &mut e.justification {
                        *a += offset;
                        *b += offset;
                    }

                    e
                })
        );

        self.last_index()
    }

    /// Splice a closed lemma of the shape `P1 -> (P2 -> ... -> C)`, then
    /// detach each antecedent against the given premise entries in turn.
    ///
    /// Returns the index of the entry holding `C`.
    pub fn apply(&mut self, lemma: Derivation, premises: &[usize]) -> Result<usize, DeriveError> {
        let mut at = self.splice(lemma)?;

        for premise in premises {
            at = self.modus_ponens(*premise, at)?;
        }

        Ok(at)
    }
}

impl Index<usize> for Derivation {
    type Output = Entry;

    fn index(&self, i: usize) -> &Self::Output {
        &self.entries[i]
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}: {} - ", self.n, self.formula)?;

        match &self.justification {
            Justification::Axiom(ax) => write!(f, "{ax}"),
            Justification::Hypothesis => write!(f, "Hypothesis"),
            Justification::ModusPonens(a, b) => {
                write!(f, "Modus ponens rule applied to F_{} and F_{}", a + 1, b + 1)
            }
        }
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            writeln!(f, "{e}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(i: &str) -> Formula {
        Formula::parse(i).unwrap()
    }

    #[test]
    fn schemas() {
        let f = parse("(f)");
        let g = parse("(g)");
        let h = parse("(h)");

        assert_eq!(
            Axiom::A1(f.clone(), g.clone()).instantiate(),
            parse("((f) -> ((g) -> (f)))")
        );

        assert_eq!(
            Axiom::A2(f.clone(), g.clone(), h).instantiate(),
            parse("(((f) -> ((g) -> (h))) -> (((f) -> (g)) -> ((f) -> (h))))")
        );

        assert_eq!(
            Axiom::A3(f, g).instantiate(),
            parse("(((!(g)) -> (!(f))) -> (((!(g)) -> (f)) -> (g)))")
        );
    }

    #[test]
    fn recognize() {
        let f = parse("(!(a))");
        let g = parse("((a) -> (b))");
        let h = parse("(c)");

        for ax in [
            Axiom::A1(f.clone(), g.clone()),
            Axiom::A2(f.clone(), g.clone(), h),
            Axiom::A3(f, g),
        ] {
            assert_eq!(
                Axiom::recognize( &ax.instantiate() ),
                Some(ax)
            );
        }

        assert_eq!(Axiom::recognize( &parse("((a) -> (b))") ), None);
        assert_eq!(Axiom::recognize( &parse("((a) -> (a))") ), None);
    }

    #[test]
    fn modus_ponens() {
        let mut d = Derivation::new();

        let f = d.hypothesis( parse("(f)") );
        let g = d.hypothesis( parse("(g)") );
        let a1 = d.axiom( Axiom::A1(parse("(f)"), parse("(g)")) );
        let mp = d.modus_ponens(f, a1).unwrap();

        assert_eq!(d[mp].formula, parse("((g) -> (f))"));
        assert_eq!(d[mp].justification, Justification::ModusPonens(0, 2));
        assert_eq!(d[mp].n, 4);

        assert_eq!(
            d.modus_ponens(g, a1).unwrap_err(),
            DeriveError::InvalidModusPonens { antecedent: 2, implication: 3 }
        );

        assert_eq!(
            d.modus_ponens(a1, f).unwrap_err(),
            DeriveError::InvalidModusPonens { antecedent: 3, implication: 1 }
        );

        assert_eq!(
            d.modus_ponens(f, 17).unwrap_err(),
            DeriveError::MissingEntry(17)
        );
    }

    #[test]
    fn self_implication() {
        let mut d = Derivation::new();
        let f = parse("(f)");

        let last = d.self_implication(&f).unwrap();

        assert_eq!(d.len(), 5);
        assert_eq!(last, 4);
        assert_eq!(d.conclusion(), Some( &f.implies(&f) ));
    }

    #[test]
    fn splice_renumbers() {
        let mut a = Derivation::new();
        a.hypothesis( parse("(x)") );

        let mut b = Derivation::new();
        b.self_implication( &parse("(y)") ).unwrap();

        let last = a.splice(b).unwrap();

        assert_eq!(last, 5);

        for (i, e) in a.entries().iter().enumerate() {
            assert_eq!(e.n, i + 1);
        }

        // The first modus ponens of the spliced proof cites its axioms, now at 2 and 3.
        assert_eq!(a[3].justification, Justification::ModusPonens(2, 1));

        assert_eq!(
            a.splice( Derivation::new() ).unwrap_err(),
            DeriveError::EmptyDerivation
        );
    }

    #[test]
    fn display() {
        let mut d = Derivation::new();
        let f = parse("(f)");

        d.hypothesis( f.clone() );
        d.axiom( Axiom::A1(f.clone(), f.negated()) );
        d.modus_ponens(0, 1).unwrap();

        assert_eq!(
            d.to_string(),
            "F_1: (f) - Hypothesis\n\
             F_2: ((f) -> ((!(f)) -> (f))) - Axiom A1 applied to: F: (f), G: (!(f))\n\
             F_3: ((!(f)) -> (f)) - Modus ponens rule applied to F_1 and F_2\n"
        );
    }
}
