use std::collections::HashMap;

use crate::parse::Formula;

use super::{Axiom, Derivation, DeriveError, Justification};

/// Turn a derivation of `H` that may use `f` as a hypothesis into a
/// derivation of `f -> H` that does not.
///
/// Every other hypothesis of `d` is carried over unchanged. Each input
/// entry `E` is replaced by a few entries ending in `f -> E`:
/// - `f` itself becomes the five step proof of `f -> f`;
/// - hypotheses and axioms are restated, then weakened through `A1`;
/// - modus ponens from `A` and `A -> E` goes through `A2`, reusing the
///   `f -> A` and `f -> (A -> E)` produced for the earlier entries.
pub fn discharge(d: &Derivation, f: &Formula) -> Result<Derivation, DeriveError> {
    let mut out = Derivation::new();

    // Latest output index holding each formula. Later entries shadow earlier ones.
    let mut emitted: HashMap<Formula, usize> = HashMap::new();

    for entry in d.entries() {
        let start = out.len();

        if entry.formula == *f {
            out.self_implication(f)?;
        } else {
            match &entry.justification {
                Justification::Hypothesis | Justification::Axiom(_) => {
                    let restated = match &entry.justification {
                        Justification::Axiom(ax) => out.axiom( ax.clone() ),
                        _ => out.hypothesis( entry.formula.clone() ),
                    };

                    let weakening = out.axiom( Axiom::A1(entry.formula.clone(), f.clone()) );
                    out.modus_ponens(restated, weakening)?;
                },
                Justification::ModusPonens(a, _) => {
                    let a = &d.get(*a).ok_or(DeriveError::MissingEntry(*a))?.formula;

                    let f_a = f.implies(a);
                    let f_ae = f.implies( &a.implies(&entry.formula) );

                    let lookup = |target: &Formula| {
                        emitted
                            .get(target)
                            .copied()
                            .ok_or_else(|| DeriveError::Undischargeable {
                                step    : entry.n,
                                missing : target.to_string(),
                            })
                    };

                    let f_a = lookup(&f_a)?;
                    let f_ae = lookup(&f_ae)?;

                    let distribution = out.axiom( Axiom::A2(f.clone(), a.clone(), entry.formula.clone()) );
                    let step = out.modus_ponens(f_ae, distribution)?;
                    out.modus_ponens(f_a, step)?;
                }
            }
        }

        for i in start..out.len() {
            emitted.insert(out[i].formula.clone(), i);
        }
    }

    tracing::debug!(
        discharged = %f,
        input = d.len(),
        output = out.len(),
        "discharged hypothesis"
    );

    Ok(out)
}
