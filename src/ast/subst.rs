//! Witness matching for the quantifier rules.
//!
//! Rather than substituting into a formula and comparing, the checker
//! matches the already-given instance against the quantified body: every
//! occurrence of the bound variable must line up with one consistent
//! witness term, and the witness may not contain a variable that is bound
//! at the occurrence point. No renaming is ever performed, so derived
//! structural equality remains the only notion of formula equality.

use crate::*;

/// How an instance relates to a quantified body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Instantiation {
    /// The bound variable does not occur in the body; the instance is the
    /// body itself.
    Unused,
    /// Every occurrence of the bound variable corresponds to this term.
    Witness(Term),
}

/// Matches `instance` against `body` where `var` generalizes. Returns
/// `None` if no consistent witness exists.
pub(crate) fn match_instance(
    body: &Formula,
    var: Symbol,
    instance: &Formula,
) -> Option<Instantiation> {
    let mut witness = None;
    let mut bound = Vec::new();
    if match_formula(body, instance, var, &mut bound, &mut witness, false) {
        Some(match witness {
            Some(t) => Instantiation::Witness(t),
            None => Instantiation::Unused,
        })
    } else {
        None
    }
}

fn match_formula(
    body: &Formula,
    inst: &Formula,
    var: Symbol,
    bound: &mut Vec<Symbol>,
    witness: &mut Option<Term>,
    shadowed: bool,
) -> bool {
    match (body, inst) {
        (Formula::Atom(p, a), Formula::Atom(q, b)) => {
            p == q
                && a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| match_term(x, y, var, bound, witness, shadowed))
        }
        (Formula::Not(x), Formula::Not(y)) => match_formula(x, y, var, bound, witness, shadowed),
        (Formula::And(a, b), Formula::And(c, d))
        | (Formula::Or(a, b), Formula::Or(c, d))
        | (Formula::Implies(a, b), Formula::Implies(c, d)) => {
            match_formula(a, c, var, bound, witness, shadowed)
                && match_formula(b, d, var, bound, witness, shadowed)
        }
        (Formula::ForAll(x, bx), Formula::ForAll(y, by))
        | (Formula::Exists(x, bx), Formula::Exists(y, by)) => {
            // binder names must agree: no alpha-equivalence
            if x != y {
                return false;
            }
            bound.push(*x);
            let ok = match_formula(bx, by, var, bound, witness, shadowed || *x == var);
            bound.pop();
            ok
        }
        _ => false,
    }
}

fn match_term(
    body: &Term,
    inst: &Term,
    var: Symbol,
    bound: &mut Vec<Symbol>,
    witness: &mut Option<Term>,
    shadowed: bool,
) -> bool {
    match body {
        Term::Var(v) if *v == var && !shadowed => {
            if captures(inst, bound) {
                return false;
            }
            match witness {
                Some(w) => w == inst,
                None => {
                    *witness = Some(inst.clone());
                    true
                }
            }
        }
        Term::Var(v) => matches!(inst, Term::Var(u) if u == v),
        Term::Const(c) => matches!(inst, Term::Const(d) if d == c),
        Term::Apply(f, args) => match inst {
            Term::Apply(g, brgs) => {
                f == g
                    && args.len() == brgs.len()
                    && args
                        .iter()
                        .zip(brgs)
                        .all(|(x, y)| match_term(x, y, var, bound, witness, shadowed))
            }
            _ => false,
        },
    }
}

/// A witness containing a variable bound at the occurrence point would be
/// captured.
fn captures(t: &Term, bound: &[Symbol]) -> bool {
    match t {
        Term::Var(v) => bound.contains(v),
        Term::Const(_) => false,
        Term::Apply(_, args) => args.iter().any(|a| captures(a, bound)),
    }
}

impl Formula {
    /// Every constant symbol occurring in the formula.
    pub fn consts(&self) -> IndexSet<Symbol> {
        let mut out = IndexSet::default();
        self.collect_consts(&mut out);
        out
    }

    pub fn contains_const(&self, c: Symbol) -> bool {
        self.consts().contains(&c)
    }

    fn collect_consts(&self, out: &mut IndexSet<Symbol>) {
        if let Formula::Atom(_, args) = self {
            for t in args {
                t.collect_consts(out);
            }
        }
        for child in self.children() {
            child.collect_consts(out);
        }
    }
}

impl Term {
    fn collect_consts(&self, out: &mut IndexSet<Symbol>) {
        match self {
            Term::Var(_) => {}
            Term::Const(c) => {
                out.insert(*c);
            }
            Term::Apply(_, args) => {
                for t in args {
                    t.collect_consts(out);
                }
            }
        }
    }
}
