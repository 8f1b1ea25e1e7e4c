use std::collections::HashMap;

use crate::derivation::lemmas::*;
use crate::derivation::{Axiom, Derivation};
use crate::parse::{Assignment, EvalError, Formula};

use super::ProveError;

/// Derive `F` or `!F`, whichever `a` makes true, from the signed literals of `a`.
///
/// The derivation opens with one hypothesis per variable of `a`, in name
/// order: `x` where `a(x)` holds, `!x` otherwise. Every variable of `f`
/// must be bound by `a`.
pub fn kalmar(f: &Formula, a: &Assignment) -> Result<Derivation, ProveError> {
    let mut k = Kalmar {
        a,
        d: Derivation::new(),
        literals: HashMap::new(),
    };

    for (name, value) in a {
        let x = Formula::atomic(name.as_str());
        let literal = if *value { x } else { x.negated() };

        let i = k.d.hypothesis(literal);
        k.literals.insert(name.as_str(), i);
    }

    let (i, _) = k.derive(f)?;

    // A bare literal may sit among the opening hypotheses; restate it last.
    if i + 1 != k.d.len() {
        let literal = k.d[i].formula.clone();
        k.d.hypothesis(literal);
    }

    Ok(k.d)
}

struct Kalmar<'a> {
    a        : &'a Assignment,
    d        : Derivation,
    literals : HashMap<&'a str, usize>,
}

impl Kalmar<'_> {
    /// Append a derivation of `f` signed by `a`, returning its index and whether `a` satisfies `f`.
    fn derive(&mut self, f: &Formula) -> Result<(usize, bool), ProveError> {
        match f {
            Formula::Atomic(name) => {
                let (Some(i), Some(v)) = (self.literals.get(&**name), self.a.get(&**name)) else {
                    return Err( EvalError::UnboundVariable( name.to_string() ).into() )
                };

                Ok((*i, *v))
            },
            Formula::Neg(g) => {
                let (i, v) = self.derive(g)?;

                if v {
                    // g holds, so !g is false; lift g to !!g.
                    let i = self.d.apply( double_negation_intro(g)?, &[i] )?;
                    Ok((i, false))
                } else {
                    Ok((i, true))
                }
            },
            Formula::Imp(g, h) => {
                let (i, v_g) = self.derive(g)?;
                let (j, v_h) = self.derive(h)?;

                if !v_g {
                    let i = self.d.apply( ex_falso(g, h)?, &[i] )?;
                    Ok((i, true))
                } else if v_h {
                    let a1 = self.d.axiom( Axiom::A1((**h).clone(), (**g).clone()) );
                    let i = self.d.modus_ponens(j, a1)?;
                    Ok((i, true))
                } else {
                    let i = self.d.apply( negated_implication(g, h)?, &[i, j] )?;
                    Ok((i, false))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::check::Checker;
    use crate::parse::Assignments;

    fn parse(i: &str) -> Formula {
        Formula::parse(i).unwrap()
    }

    fn literals(a: &Assignment) -> Vec<Formula> {
        a.iter()
            .map(|(n, v)| {
                let x = Formula::atomic(n.as_str());
                if *v { x } else { x.negated() }
            })
            .collect()
    }

    fn assert_signed(f: &Formula) {
        for a in Assignments::new( f.variables() ) {
            let d = kalmar(f, &a).unwrap();

            let expected = if f.evaluate(&a).unwrap() {
                f.clone()
            } else {
                f.negated()
            };

            Checker::with_hypotheses( literals(&a) )
                .check_proof(&d, &expected)
                .unwrap();

            assert_eq!(
                d.hypotheses().cloned().collect::<Vec<_>>(),
                literals(&a)
            );
        }
    }

    #[test]
    fn variable() {
        let f = parse("(x)");
        let a = Assignment::from([("x".to_owned(), false)]);

        let d = kalmar(&f, &a).unwrap();

        assert_eq!(d.len(), 1);
        assert_eq!(d.conclusion(), Some( &f.negated() ));
    }

    #[test]
    fn literal_among_others() {
        let f = parse("(x)");
        let a = Assignment::from([("x".to_owned(), true), ("y".to_owned(), false)]);

        let d = kalmar(&f, &a).unwrap();

        assert_eq!(d.conclusion(), Some(&f));
    }

    #[test]
    fn negation() {
        assert_signed( &parse("(!(x))") );
        assert_signed( &parse("(!(!(x)))") );
    }

    #[test]
    fn implication() {
        assert_signed( &parse("((x) -> (y))") );
        assert_signed( &parse("(!((x) -> (!(y))))") );
    }

    #[test]
    fn unbound() {
        let f = parse("((x) -> (y))");
        let a = Assignment::from([("x".to_owned(), true)]);

        assert!(matches!(
            kalmar(&f, &a),
            Err(ProveError::UnboundVariable(v)) if v == "y"
        ));
    }
}
