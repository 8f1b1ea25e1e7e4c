//! Derived theorems of the calculus.
//!
//! Every lemma here is a closed derivation: all working hypotheses have been
//! discharged, so the result can be spliced anywhere and detached against the
//! caller's own entries with [`Derivation::apply`].

use crate::parse::Formula;

use super::{discharge, Axiom, Derivation, DeriveError};

fn lemma<B>(name: &'static str, build: B) -> Result<Derivation, DeriveError>
where
    B: FnOnce() -> Result<Derivation, DeriveError>
{
    let d = build().map_err(|e| DeriveError::Lemma { name, source: Box::new(e) })?;

    tracing::trace!(lemma = name, len = d.len(), "derived lemma");

    Ok(d)
}

/// `|- F -> F`
pub fn self_implication(f: &Formula) -> Result<Derivation, DeriveError> {
    lemma("self-implication", || {
        let mut d = Derivation::new();
        d.self_implication(f)?;
        Ok(d)
    })
}

/// `|- (F -> G) -> ((G -> H) -> (F -> H))`
pub fn syllogism(f: &Formula, g: &Formula, h: &Formula) -> Result<Derivation, DeriveError> {
    lemma("syllogism", || {
        let fg = f.implies(g);
        let gh = g.implies(h);

        let mut d = Derivation::new();

        let i_fg = d.hypothesis( fg.clone() );
        let i_gh = d.hypothesis( gh.clone() );
        let i_f = d.hypothesis( f.clone() );
        let i_g = d.modus_ponens(i_f, i_fg)?;
        d.modus_ponens(i_g, i_gh)?;

        let d = discharge(&d, f)?;
        let d = discharge(&d, &gh)?;
        discharge(&d, &fg)
    })
}

/// `|- (F -> (G -> H)) -> (G -> (F -> H))`
pub fn premise_exchange(f: &Formula, g: &Formula, h: &Formula) -> Result<Derivation, DeriveError> {
    lemma("premise exchange", || {
        let fgh = f.implies( &g.implies(h) );

        let mut d = Derivation::new();

        let i_fgh = d.hypothesis( fgh.clone() );
        let i_g = d.hypothesis( g.clone() );
        let i_f = d.hypothesis( f.clone() );
        let i_gh = d.modus_ponens(i_f, i_fgh)?;
        d.modus_ponens(i_g, i_gh)?;

        let d = discharge(&d, f)?;
        let d = discharge(&d, g)?;
        discharge(&d, &fgh)
    })
}

/// `|- !!F -> F`
pub fn double_negation_elim(f: &Formula) -> Result<Derivation, DeriveError> {
    lemma("double negation elimination", || {
        let nf = f.negated();
        let nnf = nf.negated();

        let mut d = Derivation::new();

        let h = d.hypothesis( nnf.clone() );
        let weakening = d.axiom( Axiom::A1(nnf.clone(), nf.clone()) );
        let nf_nnf = d.modus_ponens(h, weakening)?;
        let a3 = d.axiom( Axiom::A3(nf.clone(), f.clone()) );
        let step = d.modus_ponens(nf_nnf, a3)?;
        let nf_nf = d.self_implication(&nf)?;
        d.modus_ponens(nf_nf, step)?;

        discharge(&d, &nnf)
    })
}

/// `|- F -> !!F`
pub fn double_negation_intro(f: &Formula) -> Result<Derivation, DeriveError> {
    lemma("double negation introduction", || {
        let nnf = f.negated().negated();
        let nnnf = nnf.negated();

        let mut d = Derivation::new();

        let h = d.hypothesis( f.clone() );
        let elim = d.splice( double_negation_elim(&f.negated())? )?;
        let a3 = d.axiom( Axiom::A3(f.clone(), nnf) );
        let step = d.modus_ponens(elim, a3)?;
        let weakening = d.axiom( Axiom::A1(f.clone(), nnnf) );
        let nnnf_f = d.modus_ponens(h, weakening)?;
        d.modus_ponens(nnnf_f, step)?;

        discharge(&d, f)
    })
}

/// `|- !F -> (F -> G)`
pub fn ex_falso(f: &Formula, g: &Formula) -> Result<Derivation, DeriveError> {
    lemma("ex falso", || {
        let nf = f.negated();
        let ng = g.negated();

        let mut d = Derivation::new();

        let i_f = d.hypothesis( f.clone() );
        let i_nf = d.hypothesis( nf.clone() );
        let a1 = d.axiom( Axiom::A1(f.clone(), ng.clone()) );
        let ng_f = d.modus_ponens(i_f, a1)?;
        let a1 = d.axiom( Axiom::A1(nf.clone(), ng) );
        let ng_nf = d.modus_ponens(i_nf, a1)?;
        let a3 = d.axiom( Axiom::A3(f.clone(), g.clone()) );
        let step = d.modus_ponens(ng_nf, a3)?;
        d.modus_ponens(ng_f, step)?;

        let d = discharge(&d, f)?;
        discharge(&d, &nf)
    })
}

/// `|- (!G -> !F) -> (F -> G)`
pub fn reverse_contraposition(f: &Formula, g: &Formula) -> Result<Derivation, DeriveError> {
    lemma("reverse contraposition", || {
        let ng = g.negated();
        let ng_nf = ng.implies( &f.negated() );

        let mut d = Derivation::new();

        let h = d.hypothesis( ng_nf.clone() );
        let i_f = d.hypothesis( f.clone() );
        let a3 = d.axiom( Axiom::A3(f.clone(), g.clone()) );
        let step = d.modus_ponens(h, a3)?;
        let a1 = d.axiom( Axiom::A1(f.clone(), ng) );
        let ng_f = d.modus_ponens(i_f, a1)?;
        d.modus_ponens(ng_f, step)?;

        let d = discharge(&d, f)?;
        discharge(&d, &ng_nf)
    })
}

/// `|- (F -> G) -> (!G -> !F)`
pub fn contraposition(f: &Formula, g: &Formula) -> Result<Derivation, DeriveError> {
    lemma("contraposition", || {
        let fg = f.implies(g);
        let nnf = f.negated().negated();

        let mut d = Derivation::new();

        let i_fg = d.hypothesis( fg.clone() );
        let i_nnf = d.hypothesis( nnf.clone() );
        let i_f = d.apply( double_negation_elim(f)?, &[i_nnf] )?;
        let i_g = d.modus_ponens(i_f, i_fg)?;
        d.apply( double_negation_intro(g)?, &[i_g] )?;

        // !!F -> !!G, still under F -> G
        let mut d = discharge(&d, &nnf)?;
        let last = d.last_index()?;
        d.apply( reverse_contraposition(&g.negated(), &f.negated())?, &[last] )?;

        discharge(&d, &fg)
    })
}

/// `|- F -> (!G -> !(F -> G))`
pub fn negated_implication(f: &Formula, g: &Formula) -> Result<Derivation, DeriveError> {
    lemma("negated implication", || {
        let fg = f.implies(g);

        let mut d = Derivation::new();

        let i_f = d.hypothesis( f.clone() );
        let i_fg = d.hypothesis( fg.clone() );
        d.modus_ponens(i_f, i_fg)?;

        // (F -> G) -> G, still under F
        let mut d = discharge(&d, &fg)?;
        let last = d.last_index()?;
        d.apply( contraposition(&fg, g)?, &[last] )?;

        discharge(&d, f)
    })
}

/// `|- (F -> G) -> ((!F -> G) -> G)`
pub fn case_elimination(f: &Formula, g: &Formula) -> Result<Derivation, DeriveError> {
    lemma("case elimination", || {
        let nf = f.negated();
        let fg = f.implies(g);
        let nf_g = nf.implies(g);

        let mut d = Derivation::new();

        let i_fg = d.hypothesis( fg.clone() );
        let i_nf_g = d.hypothesis( nf_g.clone() );
        let ng_nf = d.apply( contraposition(f, g)?, &[i_fg] )?;
        let ng_nnf = d.apply( contraposition(&nf, g)?, &[i_nf_g] )?;
        let a3 = d.axiom( Axiom::A3(nf, g.clone()) );
        let step = d.modus_ponens(ng_nnf, a3)?;
        d.modus_ponens(ng_nf, step)?;

        let d = discharge(&d, &nf_g)?;
        discharge(&d, &fg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::check::Checker;

    fn parse(i: &str) -> Formula {
        Formula::parse(i).unwrap()
    }

    /// Assert `d` is a valid, hypothesis-free proof of `goal`.
    fn assert_proves(d: &Derivation, goal: &str) {
        let goal = parse(goal);

        Checker::new()
            .check_proof(d, &goal)
            .unwrap();

        assert_eq!(d.hypotheses().count(), 0);
    }

    #[test]
    fn self_implication_lemma() {
        let d = self_implication( &parse("((a) -> (b))") ).unwrap();

        assert_eq!(d.len(), 5);
        assert_proves(&d, "(((a) -> (b)) -> ((a) -> (b)))");
    }

    #[test]
    fn syllogism_lemma() {
        let d = syllogism( &parse("(f)"), &parse("(g)"), &parse("(h)") ).unwrap();

        assert_proves(&d, "(((f) -> (g)) -> (((g) -> (h)) -> ((f) -> (h))))");
    }

    #[test]
    fn premise_exchange_lemma() {
        let d = premise_exchange( &parse("(f)"), &parse("(g)"), &parse("(h)") ).unwrap();

        assert_proves(&d, "(((f) -> ((g) -> (h))) -> ((g) -> ((f) -> (h))))");
    }

    #[test]
    fn double_negation() {
        let d = double_negation_elim( &parse("(f)") ).unwrap();
        assert_proves(&d, "((!(!(f))) -> (f))");

        let d = double_negation_intro( &parse("(f)") ).unwrap();
        assert_proves(&d, "((f) -> (!(!(f))))");
    }

    #[test]
    fn ex_falso_lemma() {
        let d = ex_falso( &parse("(f)"), &parse("(g)") ).unwrap();

        assert_proves(&d, "((!(f)) -> ((f) -> (g)))");
    }

    #[test]
    fn contraposition_lemmas() {
        let d = reverse_contraposition( &parse("(f)"), &parse("(g)") ).unwrap();
        assert_proves(&d, "(((!(g)) -> (!(f))) -> ((f) -> (g)))");

        let d = contraposition( &parse("(f)"), &parse("(g)") ).unwrap();
        assert_proves(&d, "(((f) -> (g)) -> ((!(g)) -> (!(f))))");
    }

    #[test]
    fn negated_implication_lemma() {
        let d = negated_implication( &parse("(f)"), &parse("(g)") ).unwrap();

        assert_proves(&d, "((f) -> ((!(g)) -> (!((f) -> (g)))))");
    }

    #[test]
    fn case_elimination_lemma() {
        let d = case_elimination( &parse("(f)"), &parse("(g)") ).unwrap();

        assert_proves(&d, "(((f) -> (g)) -> (((!(f)) -> (g)) -> (g)))");
    }

    #[test]
    fn compound_parameters() {
        // Parameters that collide with the lemma's own working hypotheses.
        let f = parse("((a) -> (a))");
        let g = parse("(!((a) -> (a)))");

        let d = case_elimination(&f, &g).unwrap();

        assert_proves(&d, &case_elimination_goal(&f, &g));

        let d = syllogism(&f, &f, &f).unwrap();
        let ff = f.implies(&f);

        assert_proves(&d, &ff.implies( &ff.implies(&ff) ).to_string());
    }

    fn case_elimination_goal(f: &Formula, g: &Formula) -> String {
        f.implies(g)
            .implies( &f.negated().implies(g).implies(g) )
            .to_string()
    }
}
