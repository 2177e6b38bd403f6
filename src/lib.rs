//! fitch is a proof checker for Fitch-style natural deduction in
//! first-order logic.
//!
//! A proof is an ordered sequence of `(formula, justification)` pairs.
//! Each formula is parsed into an immutable AST, each justification into
//! a rule plus the lines (or subproof ranges) it cites. A scope pass
//! assigns every line its subproof, then each line is checked against the
//! structural pattern of its rule. The result is one verdict per line and
//! an overall verdict; nothing persists between calls.

pub mod ast;
#[cfg(feature = "bin")]
pub mod cli;
mod rules;
mod scope;
pub mod util;

pub use ast::*;
pub use rules::RuleMismatch;
pub use scope::{Scope, ScopeError, ScopeId, ScopeTree};
pub use symbol_table::GlobalSymbol as Symbol;
pub use util::{IndexMap, IndexSet, ListDisplay};

use rules::RuleContext;
use thiserror::Error;
use util::{HashMap, HashSet};

/// One proof line after parsing. `depth` and `scope` are assigned by the
/// scope pass, not supplied by the caller.
#[derive(Debug)]
pub struct ProofLine {
    pub index: usize,
    pub text: String,
    pub formula: Result<Formula, ParseError>,
    pub justification: Result<Justification, JustificationError>,
    pub depth: usize,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineVerdict {
    pub line: usize,
    pub valid: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub verdicts: Vec<LineVerdict>,
    pub valid: bool,
}

/// The proof verifier. Holds only configuration; every call to
/// [`Checker::verify`] recomputes all state from its input.
#[derive(Debug, Clone)]
pub struct Checker {
    /// Maximum number of proof lines accepted.
    pub max_lines: usize,
    /// Maximum formula nesting depth.
    pub max_nesting: usize,
    /// Maximum formula length in bytes. This also bounds parser
    /// recursion, which is linear in the input length.
    pub max_formula_len: usize,
}

impl Default for Checker {
    fn default() -> Self {
        Checker {
            max_lines: 10_000,
            max_nesting: 128,
            max_formula_len: 4096,
        }
    }
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies a proof given as `(formula, justification)` pairs.
    ///
    /// Parse, scope, and rule failures on a line invalidate that line's
    /// verdict (and any line citing it) without aborting the pass. Only
    /// an empty proof or an oversized input aborts the whole call.
    pub fn verify(&self, input: &[(&str, &str)]) -> Result<VerificationResult, Error> {
        if input.iter().all(|(formula, _)| formula.trim().is_empty()) {
            return Err(Error::EmptyProof);
        }
        if input.len() > self.max_lines {
            return Err(Error::TooManyLines(input.len(), self.max_lines));
        }

        let mut lines: Vec<ProofLine> = input
            .iter()
            .enumerate()
            .map(|(i, (ftext, jtext))| ProofLine {
                index: i,
                text: ftext.to_string(),
                formula: self.parse_bounded(ftext),
                justification: ast::parse_justification(None, jtext),
                depth: 0,
                scope: 0,
            })
            .collect();

        let (scopes, scope_errors) = ScopeTree::build(&mut lines);
        let ctx = RuleContext {
            lines: &lines,
            scopes: &scopes,
        };

        let mut tainted: HashSet<usize> = HashSet::default();
        let mut verdicts = Vec::with_capacity(lines.len());
        for line in &lines {
            let (verdict, taints) = check_line(line, &ctx, &scope_errors, &tainted);
            log::debug!(
                "line {}: {}",
                line.index + 1,
                verdict.reason.as_deref().unwrap_or("ok")
            );
            if taints {
                tainted.insert(line.index);
            }
            verdicts.push(verdict);
        }

        let valid = verdicts.iter().all(|v| v.valid);
        log::info!(
            "checked {} lines: {}",
            lines.len(),
            if valid { "valid" } else { "invalid" }
        );
        Ok(VerificationResult { verdicts, valid })
    }

    fn parse_bounded(&self, text: &str) -> Result<Formula, ParseError> {
        if text.len() > self.max_formula_len {
            return Err(ParseError::TooLong(text.len(), self.max_formula_len));
        }
        let f = ast::parse_formula(None, text)?;
        if f.depth() > self.max_nesting {
            return Err(ParseError::TooDeep(f.depth(), self.max_nesting));
        }
        Ok(f)
    }
}

/// Checks one line. The second return value is whether the line is
/// malformed in a way that taints everything citing it: parse and scope
/// failures taint, a failed rule check does not (its formula is still
/// well-formed and citable).
fn check_line(
    line: &ProofLine,
    ctx: &RuleContext,
    scope_errors: &HashMap<usize, ScopeError>,
    tainted: &HashSet<usize>,
) -> (LineVerdict, bool) {
    let invalid = |reason: String| LineVerdict {
        line: line.index,
        valid: false,
        reason: Some(reason),
    };

    let formula = match &line.formula {
        Ok(f) => f,
        Err(e) => return (invalid(e.to_string()), true),
    };
    let just = match &line.justification {
        Ok(j) => j,
        Err(e) => return (invalid(e.to_string()), true),
    };
    if let Some(e) = scope_errors.get(&line.index) {
        return (invalid(e.to_string()), true);
    }

    let discharged: Vec<(usize, usize)> = if just.rule.discharges() {
        just.premises
            .iter()
            .filter_map(|r| match r {
                LineRef::Range(m, n) => Some((*m, *n)),
                LineRef::Line(_) => None,
            })
            .collect()
    } else {
        Vec::new()
    };

    for r in &just.premises {
        let endpoints = match r {
            LineRef::Line(p) => vec![*p],
            LineRef::Range(m, n) => vec![*m, *n],
        };
        for p in endpoints {
            if p >= ctx.lines.len() || p >= line.index {
                let e = ScopeError::ForwardCitation {
                    citing: line.index,
                    cited: p,
                };
                return (invalid(e.to_string()), true);
            }
            if tainted.contains(&p) {
                return (
                    invalid(format!("line {} is cited but not well-formed", p + 1)),
                    true,
                );
            }
        }
        // single-line citations must be in scope, unless they sit inside
        // a subproof this very rule discharges
        if let LineRef::Line(p) = r {
            let in_own_range = discharged.iter().any(|&(m, n)| (m..=n).contains(p));
            if !in_own_range {
                if let Err(e) = ctx.scopes.citable(ctx.lines, line.index, *p) {
                    return (invalid(e.to_string()), true);
                }
            }
        }
    }

    match rules::check(just, formula, line.index, ctx) {
        Ok(()) => (
            LineVerdict {
                line: line.index,
                valid: true,
                reason: None,
            },
            false,
        ),
        Err(e) => (invalid(e.to_string()), false),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error(transparent)]
    JustificationError(#[from] JustificationError),
    #[error(transparent)]
    ScopeError(#[from] ScopeError),
    #[error("proof is empty")]
    EmptyProof,
    #[error("proof has {0} lines, limit is {1}")]
    TooManyLines(usize, usize),
}
