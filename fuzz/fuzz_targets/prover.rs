#![no_main]

extern crate hilbert;

use libfuzzer_sys::fuzz_target;
use libfuzzer_sys::arbitrary;

use hilbert::*;

const NAMES: [&str; 2] = ["p", "q"];
const MAX_DEPTH: usize = 4;

#[derive(Debug, arbitrary::Arbitrary)]
enum ArbFormula {
    Var(bool),
    Neg(Box<ArbFormula>),
    Imp(Box<ArbFormula>, Box<ArbFormula>),
}

impl ArbFormula {
    fn build(&self, depth: usize) -> Option<Formula> {
        if depth > MAX_DEPTH {
            return None
        }

        match self {
            Self::Var(v) => Some( Formula::atomic(NAMES[*v as usize]) ),
            Self::Neg(f) => Some( f.build(depth + 1)?.negated() ),
            Self::Imp(l, r) => Some( l.build(depth + 1)?.implies( &r.build(depth + 1)? ) ),
        }
    }
}

fuzz_target!(|data: ArbFormula| {
    let Some(f) = data.build(0) else { return };

    match prove(&f) {
        Ok(d) => Checker::new().check_proof(&d, &f).unwrap(),
        Err(ProveError::NotATautology { counterexample }) => {
            assert_eq!(f.evaluate(&counterexample), Ok(false))
        },
        Err(e) => panic!("{e}"),
    }
});
