use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{normalize_ops, normalize_spaces};
use super::{EvalError, ParseError};
use super::consts::*;

/// A truth value for every variable, keyed by name.
pub type Assignment = BTreeMap<String, bool>;

/// A propositional formula over implication and negation.
///
/// Subtrees are reference counted, so building `F -> G` out of existing
/// formulas never copies them. Equality and hashing are structural, and
/// hashing any formula costs the same regardless of its size.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Formula {
    /// A propositional variable.
    Atomic(Rc<str>),
    /// Negation.
    Neg(Subformula),
    /// Implication.
    Imp(Subformula, Subformula),
}

/// A shared operand of [`Formula`], carrying the structural hash of the
/// formula it wraps.
///
/// Hashing reads the cached value. Comparison short-circuits on shared
/// pointers and on differing hashes before walking the tree.
#[derive(Clone)]
pub struct Subformula(Rc<Node>);

struct Node {
    hash    : u64,
    formula : Formula,
}

impl Subformula {
    pub fn new(formula: Formula) -> Self {
        let mut hasher = DefaultHasher::new();
        formula.hash(&mut hasher);

        Self( Rc::new(Node { hash: hasher.finish(), formula }) )
    }
}

impl Deref for Subformula {
    type Target = Formula;

    fn deref(&self) -> &Formula {
        &self.0.formula
    }
}

impl AsRef<Formula> for Subformula {
    fn as_ref(&self) -> &Formula {
        self
    }
}

impl PartialEq for Subformula {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || (
            self.0.hash == other.0.hash &&
            self.0.formula == other.0.formula
        )
    }
}

impl Eq for Subformula {}

impl Hash for Subformula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

impl PartialOrd for Subformula {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some( self.cmp(other) )
    }
}

impl Ord for Subformula {
    fn cmp(&self, other: &Self) -> Ordering {
        if Rc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal
        }

        self.0.formula.cmp(&other.0.formula)
    }
}

impl fmt::Debug for Subformula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0.formula, f)
    }
}

impl fmt::Display for Subformula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.formula, f)
    }
}

impl Serialize for Subformula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.formula.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Subformula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Formula::deserialize(deserializer).map(Self::new)
    }
}

impl Formula {
    pub fn parse(i: &str) -> Result<Self, ParseError> {
        let i = normalize_spaces( &normalize_ops(i) );

        Self::parse_normalized(&i, 0)
    }

    /// `level` counts the recursive calls above this one.
    fn parse_normalized(i: &str, level: usize) -> Result<Self, ParseError> {
        static ATOMIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").unwrap() );

        if level > MAX_NESTING {
            return Err(ParseError::TooDeep)
        }

        let i = i.trim();

        if i.is_empty() {
            return Err(ParseError::EmptyFormula)
        }

        // Everything past this point is ASCII, so byte offsets are char offsets.
        invalid_chars(i)?;

        let d = compute_depths(i)?;

        // Remove redundant outer parentheses
        if d[0] == 1 && d[1..i.len() - 1].iter().all(|d| *d > 0) {
            return Self::parse_normalized(&i[1..i.len() - 1], level + 1)
        }

        if ATOMIC_REGEX.is_match(i) {
            return Ok( Self::atomic(i) )
        }

        let mut main_op = None;

        // Locate the main operator.
        for (n, _) in i.match_indices(IMP) {
            if d[n] != 0 {
                continue;
            }

            if main_op.is_some() {
                return Err(ParseError::Ambiguous)
            }

            main_op = Some(n);
        }

        if let Some(n) = main_op {
            let l = Self::parse_normalized(&i[..n], level + 1)?;
            let r = Self::parse_normalized(&i[n + IMP.len()..], level + 1)?;

            return Ok( l.implies(&r) )
        }

        if let Some(rest) = i.strip_prefix(NEG) {
            return Ok( Self::parse_normalized(rest, level + 1)?.negated() )
        }

        if i.match_indices(NEG).any(|(n, _)| d[n] == 0) {
            return Err(ParseError::BadUnary)
        }

        Err(ParseError::MissingOp)
    }

    pub fn atomic(name: impl Into<Rc<str>>) -> Self {
        Self::Atomic( name.into() )
    }

    pub fn negated(&self) -> Self {
        Self::Neg( Subformula::new(self.clone()) )
    }

    pub fn implies(&self, other: &Self) -> Self {
        Self::Imp( Subformula::new(self.clone()), Subformula::new(other.clone()) )
    }

    /// Split an implication into its antecedent and consequent.
    pub fn as_implication(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Imp(l, r) => Some((l.as_ref(), r.as_ref())),
            _ => None
        }
    }

    /// Compute the truth value of this formula under `a`.
    pub fn evaluate(&self, a: &Assignment) -> Result<bool, EvalError> {
        match self {
            Self::Atomic(name) => a
                .get(&**name)
                .copied()
                .ok_or_else(|| EvalError::UnboundVariable( name.to_string() )),
            Self::Neg(f) => Ok( !f.evaluate(a)? ),
            Self::Imp(l, r) => Ok( !l.evaluate(a)? || r.evaluate(a)? ),
        }
    }

    /// The names of all variables occurring in this formula, sorted.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Atomic(name) => {
                out.insert(&**name);
            },
            Self::Neg(f) => f.collect_variables(out),
            Self::Imp(l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
        }
    }

    /// The first assignment, in canonical order, under which this formula is false.
    pub fn counterexample(&self) -> Option<Assignment> {
        Assignments::new( self.variables() ).find(|a| !matches!(self.evaluate(a), Ok(true)))
    }

    pub fn is_tautology(&self) -> bool {
        self.counterexample().is_none()
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic(name) => write!(f, "({name})"),
            Self::Neg(inner) => write!(f, "({NEG}{inner})"),
            Self::Imp(l, r) => write!(f, "({l} {IMP} {r})"),
        }
    }
}

/// Every assignment over a list of variables, in canonical order.
///
/// The first variable is the most significant bit and enumeration
/// starts from all-false, so `[a, b]` yields `00, 01, 10, 11`.
#[derive(Debug, Clone)]
pub struct Assignments {
    vars: Vec<String>,
    bits: Option<Vec<bool>>,
}

impl Assignments {
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let vars: Vec<String> = vars.into_iter().map(Into::into).collect();
        let bits = Some( vec![false; vars.len()] );

        Self { vars, bits }
    }
}

impl Iterator for Assignments {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        let bits = self.bits.as_mut()?;

        let out = self.vars
            .iter()
            .cloned()
            .zip( bits.iter().copied() )
            .collect();

        let mut carry = true;

        for b in bits.iter_mut().rev() {
            if *b {
                *b = false;
            } else {
                *b = true;
                carry = false;
                break;
            }
        }

        if carry {
            self.bits = None;
        }

        Some(out)
    }
}

fn invalid_chars(i: &str) -> Result<(), ParseError> {
    static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[^A-Za-z0-9_!()\s>-]"#).unwrap() );

    let captures: Vec<_> = REGEX.find_iter(i)
        .map(|m| m.as_str() )
        .map(|s| s.to_owned() )
        .collect();

    if !captures.is_empty() {
        return Err( ParseError::InvalidCharacter(captures) )
    }

    Ok(())
}

fn compute_depths(i: &str) -> Result<Box<[u16]>, ParseError> {
    let mut c_depth = 0_u16;
    let mut v_depth = vec![];

    for c in i.chars() {
        match c {
            '(' => {
                c_depth = c_depth
                    .checked_add(1)
                    .filter(|d| usize::from(*d) <= MAX_NESTING)
                    .ok_or(ParseError::TooDeep)?
            },
            ')' => {
                c_depth = c_depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedParentheses)?
            },
            _   => ()
        }

        v_depth.push(c_depth);
    }

    if c_depth != 0 {
        return Err(ParseError::UnbalancedParentheses)
    }

    Ok( v_depth.into_boxed_slice() )
}
