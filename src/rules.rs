//! The inference rule table.
//!
//! Each rule validates the shape of its citations, the structure of the
//! cited formulas, and the conclusion, in that order. Scope bookkeeping
//! (which subproofs a discharge rule actually closed) is read back from
//! the [`ScopeTree`] built beforehand.

use crate::ast::{match_instance, Instantiation};
use crate::*;
use thiserror::Error;

pub(crate) struct RuleContext<'a> {
    pub lines: &'a [ProofLine],
    pub scopes: &'a ScopeTree,
}

impl RuleContext<'_> {
    fn formula(&self, idx: usize) -> Result<&Formula, RuleMismatch> {
        self.lines[idx]
            .formula
            .as_ref()
            .map_err(|_| RuleMismatch::MalformedPremise(idx))
    }
}

#[derive(Debug, Error)]
pub enum RuleMismatch {
    #[error("{rule} expects {expected}, but {found} premises were cited")]
    Arity {
        rule: Rule,
        expected: &'static str,
        found: usize,
    },
    #[error("{rule} premises must be single lines, not subproof ranges")]
    UnexpectedRange { rule: Rule },
    #[error("{rule} needs a subproof range citation")]
    MissingRange { rule: Rule },
    #[error("line {} is {found}, not {shape}", .premise + 1)]
    Shape {
        premise: usize,
        found: String,
        shape: &'static str,
    },
    #[error("the conclusion is {found}, not {shape}")]
    ConclusionShape { found: String, shape: &'static str },
    #[error("expected {expected}, found {found}")]
    Conclusion { expected: String, found: String },
    #[error("{found} is neither conjunct of {premise}")]
    NeitherConjunct { premise: String, found: String },
    #[error("neither disjunct of {found} is {premise}")]
    PremiseNotDisjunct { premise: String, found: String },
    #[error("modus ponens needs an implication and its antecedent; got {first} and {second}")]
    NoAntecedent { first: String, second: String },
    #[error("the case assumptions {first} and {second} do not cover the disjuncts of {disjunction}")]
    CasesMismatch {
        disjunction: String,
        first: String,
        second: String,
    },
    #[error("the subproof {}–{} is not discharged at this line", .start + 1, .end + 1)]
    NotDischarged { start: usize, end: usize },
    #[error("line {} is not a contradiction", .0 + 1)]
    NotContradiction(usize),
    #[error("{first} and {second} are not contradictory")]
    NotContradictoryPair { first: String, second: String },
    #[error("line {} lies outside the cited subproof", .0 + 1)]
    WitnessOutsideSubproof(usize),
    #[error("no consistent witness term turns {body} into {instance}")]
    NoWitness { body: String, instance: String },
    #[error("witness {0} is a compound term, not a constant")]
    WitnessNotConstant(String),
    #[error("constant {0} is not fresh: it occurs in {1}")]
    NotFresh(Symbol, String),
    #[error("line {} is not well-formed", .0 + 1)]
    MalformedPremise(usize),
}

fn one_line(just: &Justification) -> Result<usize, RuleMismatch> {
    match just.premises.as_slice() {
        [LineRef::Line(p)] => Ok(*p),
        [LineRef::Range(..)] => Err(RuleMismatch::UnexpectedRange { rule: just.rule }),
        refs => Err(RuleMismatch::Arity {
            rule: just.rule,
            expected: "one premise",
            found: refs.len(),
        }),
    }
}

fn two_lines(just: &Justification) -> Result<(usize, usize), RuleMismatch> {
    match just.premises.as_slice() {
        [LineRef::Line(p), LineRef::Line(q)] => Ok((*p, *q)),
        [_, _] => Err(RuleMismatch::UnexpectedRange { rule: just.rule }),
        refs => Err(RuleMismatch::Arity {
            rule: just.rule,
            expected: "two premises",
            found: refs.len(),
        }),
    }
}

fn one_range(just: &Justification) -> Result<(usize, usize), RuleMismatch> {
    match just.premises.as_slice() {
        [LineRef::Range(m, n)] => Ok((*m, *n)),
        [LineRef::Line(_)] => Err(RuleMismatch::MissingRange { rule: just.rule }),
        refs => Err(RuleMismatch::Arity {
            rule: just.rule,
            expected: "one subproof range",
            found: refs.len(),
        }),
    }
}

fn contradictory(a: &Formula, b: &Formula) -> bool {
    matches!(b, Formula::Not(x) if x.as_ref() == a) || matches!(a, Formula::Not(x) if x.as_ref() == b)
}

fn is_contradiction(f: &Formula) -> bool {
    matches!(f, Formula::And(a, b) if contradictory(a, b))
}

pub(crate) fn check(
    just: &Justification,
    conclusion: &Formula,
    line: usize,
    ctx: &RuleContext,
) -> Result<(), RuleMismatch> {
    match just.rule {
        Rule::Assumption => match just.premises.len() {
            0 => Ok(()),
            n => Err(RuleMismatch::Arity {
                rule: just.rule,
                expected: "no premises",
                found: n,
            }),
        },

        Rule::Reiteration => {
            let p = one_line(just)?;
            let f = ctx.formula(p)?;
            if f == conclusion {
                Ok(())
            } else {
                Err(RuleMismatch::Conclusion {
                    expected: f.to_string(),
                    found: conclusion.to_string(),
                })
            }
        }

        Rule::AndIntro => {
            let (p, q) = two_lines(just)?;
            let expected = Formula::and(ctx.formula(p)?.clone(), ctx.formula(q)?.clone());
            if *conclusion == expected {
                Ok(())
            } else {
                Err(RuleMismatch::Conclusion {
                    expected: expected.to_string(),
                    found: conclusion.to_string(),
                })
            }
        }

        Rule::AndElim => {
            let p = one_line(just)?;
            match ctx.formula(p)? {
                Formula::And(a, b) => {
                    if conclusion == a.as_ref() || conclusion == b.as_ref() {
                        Ok(())
                    } else {
                        Err(RuleMismatch::NeitherConjunct {
                            premise: ctx.formula(p)?.to_string(),
                            found: conclusion.to_string(),
                        })
                    }
                }
                f => Err(RuleMismatch::Shape {
                    premise: p,
                    found: f.to_string(),
                    shape: "a conjunction",
                }),
            }
        }

        Rule::OrIntro => {
            let p = one_line(just)?;
            let f = ctx.formula(p)?;
            match conclusion {
                Formula::Or(a, b) if a.as_ref() == f || b.as_ref() == f => Ok(()),
                Formula::Or(..) => Err(RuleMismatch::PremiseNotDisjunct {
                    premise: f.to_string(),
                    found: conclusion.to_string(),
                }),
                _ => Err(RuleMismatch::ConclusionShape {
                    found: conclusion.to_string(),
                    shape: "a disjunction",
                }),
            }
        }

        Rule::OrElim => {
            let mut cited_line = None;
            let mut ranges = Vec::new();
            for r in &just.premises {
                match r {
                    LineRef::Line(p) if cited_line.is_none() => cited_line = Some(*p),
                    LineRef::Range(m, n) => ranges.push((*m, *n)),
                    LineRef::Line(_) => {
                        return Err(RuleMismatch::Arity {
                            rule: just.rule,
                            expected: "a disjunction line and two subproof ranges",
                            found: just.premises.len(),
                        })
                    }
                }
            }
            let (Some(d), [(m1, n1), (m2, n2)]) = (cited_line, ranges.as_slice()) else {
                return Err(RuleMismatch::Arity {
                    rule: just.rule,
                    expected: "a disjunction line and two subproof ranges",
                    found: just.premises.len(),
                });
            };
            let Formula::Or(a, b) = ctx.formula(d)? else {
                return Err(RuleMismatch::Shape {
                    premise: d,
                    found: ctx.formula(d)?.to_string(),
                    shape: "a disjunction",
                });
            };
            for &(m, n) in &[(*m1, *n1), (*m2, *n2)] {
                if !ctx.scopes.discharged_at(m, n, line) {
                    return Err(RuleMismatch::NotDischarged { start: m, end: n });
                }
            }
            let first = ctx.formula(*m1)?;
            let second = ctx.formula(*m2)?;
            let covered = (first == a.as_ref() && second == b.as_ref())
                || (first == b.as_ref() && second == a.as_ref());
            if !covered {
                return Err(RuleMismatch::CasesMismatch {
                    disjunction: ctx.formula(d)?.to_string(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
            for &n in &[*n1, *n2] {
                let f = ctx.formula(n)?;
                if f != conclusion {
                    return Err(RuleMismatch::Conclusion {
                        expected: f.to_string(),
                        found: conclusion.to_string(),
                    });
                }
            }
            Ok(())
        }

        Rule::ImpliesIntro => {
            let (m, n) = one_range(just)?;
            if !ctx.scopes.discharged_at(m, n, line) {
                return Err(RuleMismatch::NotDischarged { start: m, end: n });
            }
            let expected = Formula::implies(ctx.formula(m)?.clone(), ctx.formula(n)?.clone());
            if *conclusion == expected {
                Ok(())
            } else {
                Err(RuleMismatch::Conclusion {
                    expected: expected.to_string(),
                    found: conclusion.to_string(),
                })
            }
        }

        Rule::ImpliesElim => {
            let (p, q) = two_lines(just)?;
            let fp = ctx.formula(p)?;
            let fq = ctx.formula(q)?;
            let mut conclusion_err = None;
            let mut any_implication = false;
            for (imp, arg) in [(fp, fq), (fq, fp)] {
                if let Formula::Implies(a, b) = imp {
                    any_implication = true;
                    if arg == a.as_ref() {
                        if conclusion == b.as_ref() {
                            return Ok(());
                        }
                        conclusion_err = Some(RuleMismatch::Conclusion {
                            expected: b.to_string(),
                            found: conclusion.to_string(),
                        });
                    }
                }
            }
            Err(conclusion_err.unwrap_or_else(|| {
                if any_implication {
                    RuleMismatch::NoAntecedent {
                        first: fp.to_string(),
                        second: fq.to_string(),
                    }
                } else {
                    RuleMismatch::Shape {
                        premise: p,
                        found: fp.to_string(),
                        shape: "an implication",
                    }
                }
            }))
        }

        Rule::NotIntro => {
            let mut range = None;
            let mut witnesses = Vec::new();
            for r in &just.premises {
                match r {
                    LineRef::Range(m, n) if range.is_none() => range = Some((*m, *n)),
                    LineRef::Line(p) => witnesses.push(*p),
                    LineRef::Range(..) => {
                        return Err(RuleMismatch::Arity {
                            rule: just.rule,
                            expected: "one subproof range",
                            found: just.premises.len(),
                        })
                    }
                }
            }
            let Some((m, n)) = range else {
                return Err(RuleMismatch::MissingRange { rule: just.rule });
            };
            if !ctx.scopes.discharged_at(m, n, line) {
                return Err(RuleMismatch::NotDischarged { start: m, end: n });
            }
            match witnesses.as_slice() {
                [] => {
                    if !is_contradiction(ctx.formula(n)?) {
                        return Err(RuleMismatch::NotContradiction(n));
                    }
                }
                &[x, y] => {
                    for p in [x, y] {
                        if !(m..=n).contains(&p) {
                            return Err(RuleMismatch::WitnessOutsideSubproof(p));
                        }
                    }
                    let fx = ctx.formula(x)?;
                    let fy = ctx.formula(y)?;
                    if !contradictory(fx, fy) {
                        return Err(RuleMismatch::NotContradictoryPair {
                            first: fx.to_string(),
                            second: fy.to_string(),
                        });
                    }
                }
                _ => {
                    return Err(RuleMismatch::Arity {
                        rule: just.rule,
                        expected: "one subproof range, optionally with two contradictory lines",
                        found: just.premises.len(),
                    })
                }
            }
            let expected = Formula::not(ctx.formula(m)?.clone());
            if *conclusion == expected {
                Ok(())
            } else {
                Err(RuleMismatch::Conclusion {
                    expected: expected.to_string(),
                    found: conclusion.to_string(),
                })
            }
        }

        Rule::NotElim => {
            let p = one_line(just)?;
            match ctx.formula(p)? {
                Formula::Not(inner) => match inner.as_ref() {
                    Formula::Not(a) => {
                        if conclusion == a.as_ref() {
                            Ok(())
                        } else {
                            Err(RuleMismatch::Conclusion {
                                expected: a.to_string(),
                                found: conclusion.to_string(),
                            })
                        }
                    }
                    _ => Err(RuleMismatch::Shape {
                        premise: p,
                        found: ctx.formula(p)?.to_string(),
                        shape: "a double negation",
                    }),
                },
                f => Err(RuleMismatch::Shape {
                    premise: p,
                    found: f.to_string(),
                    shape: "a double negation",
                }),
            }
        }

        Rule::ForAllElim => {
            let p = one_line(just)?;
            let Formula::ForAll(v, body) = ctx.formula(p)? else {
                return Err(RuleMismatch::Shape {
                    premise: p,
                    found: ctx.formula(p)?.to_string(),
                    shape: "a universal",
                });
            };
            match match_instance(body, *v, conclusion) {
                Some(_) => Ok(()),
                None => Err(RuleMismatch::NoWitness {
                    body: body.to_string(),
                    instance: conclusion.to_string(),
                }),
            }
        }

        Rule::ForAllIntro => {
            let p = one_line(just)?;
            let Formula::ForAll(v, body) = conclusion else {
                return Err(RuleMismatch::ConclusionShape {
                    found: conclusion.to_string(),
                    shape: "a universal",
                });
            };
            let premise = ctx.formula(p)?;
            match match_instance(body, *v, premise) {
                None => Err(RuleMismatch::NoWitness {
                    body: body.to_string(),
                    instance: premise.to_string(),
                }),
                Some(Instantiation::Unused) => Ok(()),
                Some(Instantiation::Witness(Term::Const(c))) => {
                    if conclusion.contains_const(c) {
                        return Err(RuleMismatch::NotFresh(c, conclusion.to_string()));
                    }
                    for a in ctx.scopes.assumptions_in_scope(ctx.lines[line].scope) {
                        if let Ok(fa) = ctx.lines[a].formula.as_ref() {
                            if fa.contains_const(c) {
                                return Err(RuleMismatch::NotFresh(c, fa.to_string()));
                            }
                        }
                    }
                    Ok(())
                }
                Some(Instantiation::Witness(t)) => {
                    Err(RuleMismatch::WitnessNotConstant(t.to_string()))
                }
            }
        }

        Rule::ExistsIntro => {
            let p = one_line(just)?;
            let Formula::Exists(v, body) = conclusion else {
                return Err(RuleMismatch::ConclusionShape {
                    found: conclusion.to_string(),
                    shape: "an existential",
                });
            };
            let premise = ctx.formula(p)?;
            match match_instance(body, *v, premise) {
                Some(_) => Ok(()),
                None => Err(RuleMismatch::NoWitness {
                    body: body.to_string(),
                    instance: premise.to_string(),
                }),
            }
        }

        Rule::ExistsElim => {
            let (e, m, n) = match just.premises.as_slice() {
                [LineRef::Line(e), LineRef::Range(m, n)]
                | [LineRef::Range(m, n), LineRef::Line(e)] => (*e, *m, *n),
                refs => {
                    return Err(RuleMismatch::Arity {
                        rule: just.rule,
                        expected: "an existential line and one subproof range",
                        found: refs.len(),
                    })
                }
            };
            let Formula::Exists(v, body) = ctx.formula(e)? else {
                return Err(RuleMismatch::Shape {
                    premise: e,
                    found: ctx.formula(e)?.to_string(),
                    shape: "an existential",
                });
            };
            if !ctx.scopes.discharged_at(m, n, line) {
                return Err(RuleMismatch::NotDischarged { start: m, end: n });
            }
            let assumption = ctx.formula(m)?;
            match match_instance(body, *v, assumption) {
                None => {
                    return Err(RuleMismatch::NoWitness {
                        body: body.to_string(),
                        instance: assumption.to_string(),
                    })
                }
                Some(Instantiation::Unused) => {}
                Some(Instantiation::Witness(Term::Const(c))) => {
                    let existential = ctx.formula(e)?;
                    if existential.contains_const(c) {
                        return Err(RuleMismatch::NotFresh(c, existential.to_string()));
                    }
                    if conclusion.contains_const(c) {
                        return Err(RuleMismatch::NotFresh(c, conclusion.to_string()));
                    }
                    for j in 0..m {
                        if ctx.scopes.citable(ctx.lines, m, j).is_ok() {
                            if let Ok(fj) = ctx.lines[j].formula.as_ref() {
                                if fj.contains_const(c) {
                                    return Err(RuleMismatch::NotFresh(c, fj.to_string()));
                                }
                            }
                        }
                    }
                }
                Some(Instantiation::Witness(t)) => {
                    return Err(RuleMismatch::WitnessNotConstant(t.to_string()))
                }
            }
            let result = ctx.formula(n)?;
            if result == conclusion {
                Ok(())
            } else {
                Err(RuleMismatch::Conclusion {
                    expected: result.to_string(),
                    found: conclusion.to_string(),
                })
            }
        }
    }
}
