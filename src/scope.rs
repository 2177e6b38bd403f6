//! Subproof scope tracking.
//!
//! Natural-deduction subproofs nest strictly, so scopes live in an arena
//! with parent links and the open scopes form a stack. An assumption line
//! pushes; a discharge rule pops one scope per cited range, innermost
//! first. Citation legality then reduces to "is the cited line's scope on
//! my ancestor chain".

use crate::util::HashMap;
use crate::*;
use std::cmp::Reverse;
use thiserror::Error;

pub type ScopeId = usize;

#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// The assumption line that opened this scope; `None` for the root.
    pub assumption: Option<usize>,
    pub opened_at: usize,
    /// The last line inside the scope, once closed.
    pub closed_at: Option<usize>,
    /// The line whose rule discharged the scope.
    pub closed_by: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("line {} cites the later line {}", .citing + 1, .cited + 1)]
    ForwardCitation { citing: usize, cited: usize },
    #[error("line {} is not in scope at line {}", .cited + 1, .citing + 1)]
    OutOfScope { citing: usize, cited: usize },
    #[error("line {} does not open an active subproof", .0 + 1)]
    DischargeNotOpen(usize),
    #[error("subproofs close innermost-first; the subproof opened at line {} is not innermost", .0 + 1)]
    DischargeNotInnermost(usize),
    #[error("cited range {}–{} must end at line {}", .start + 1, .end + 1, .expected_end + 1)]
    RangeMismatch {
        start: usize,
        end: usize,
        expected_end: usize,
    },
}

impl ScopeTree {
    /// Runs the scope pass: assigns every line its depth and scope, opens
    /// a scope per assumption, and closes scopes cited by discharge
    /// rules. Violations are collected per line and the offending line is
    /// treated as non-discharging.
    pub fn build(lines: &mut [ProofLine]) -> (ScopeTree, HashMap<usize, ScopeError>) {
        let mut scopes = vec![Scope {
            parent: None,
            assumption: None,
            opened_at: 0,
            closed_at: None,
            closed_by: None,
        }];
        let mut stack: Vec<ScopeId> = vec![0];
        let mut errors: HashMap<usize, ScopeError> = HashMap::default();

        for i in 0..lines.len() {
            match lines[i].justification.as_ref().ok() {
                Some(j) if j.rule == Rule::Assumption => {
                    let id = scopes.len();
                    scopes.push(Scope {
                        parent: Some(*stack.last().unwrap()),
                        assumption: Some(i),
                        opened_at: i,
                        closed_at: None,
                        closed_by: None,
                    });
                    stack.push(id);
                }
                Some(j) if j.rule.discharges() => {
                    let mut ranges: Vec<(usize, usize)> = j
                        .premises
                        .iter()
                        .filter_map(|r| match r {
                            LineRef::Range(m, n) => Some((*m, *n)),
                            LineRef::Line(_) => None,
                        })
                        .collect();
                    ranges.sort_by_key(|&(m, _)| Reverse(m));
                    match plan_discharge(&scopes, &stack, &ranges, i) {
                        Ok(pops) => {
                            for (id, end) in pops {
                                stack.pop();
                                scopes[id].closed_at = Some(end);
                                scopes[id].closed_by = Some(i);
                            }
                        }
                        Err(e) => {
                            errors.insert(i, e);
                        }
                    }
                }
                _ => {}
            }
            lines[i].scope = *stack.last().unwrap();
            lines[i].depth = stack.len() - 1;
        }

        (ScopeTree { scopes }, errors)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Whether `cited` may be referenced from `citing`: it must come
    /// earlier, and its scope must be on the citing line's ancestor
    /// chain. A line inside an already-closed subproof fails here.
    pub fn citable(
        &self,
        lines: &[ProofLine],
        citing: usize,
        cited: usize,
    ) -> Result<(), ScopeError> {
        if cited >= citing {
            return Err(ScopeError::ForwardCitation { citing, cited });
        }
        let target = lines[cited].scope;
        let mut cursor = Some(lines[citing].scope);
        while let Some(id) = cursor {
            if id == target {
                return Ok(());
            }
            cursor = self.scopes[id].parent;
        }
        Err(ScopeError::OutOfScope { citing, cited })
    }

    /// Whether the subproof spanning `start..=end` was discharged by line
    /// `by`.
    pub fn discharged_at(&self, start: usize, end: usize, by: usize) -> bool {
        self.scopes.iter().any(|s| {
            s.assumption == Some(start) && s.closed_at == Some(end) && s.closed_by == Some(by)
        })
    }

    /// Assumption lines visible from `scope`, innermost first.
    pub fn assumptions_in_scope(&self, mut scope: ScopeId) -> Vec<usize> {
        let mut out = Vec::new();
        loop {
            if let Some(a) = self.scopes[scope].assumption {
                out.push(a);
            }
            match self.scopes[scope].parent {
                Some(p) => scope = p,
                None => break,
            }
        }
        out
    }
}

/// Validates a discharge before mutating the stack: each cited range must
/// match the next innermost open scope and end exactly where the
/// enclosing context resumes.
fn plan_discharge(
    scopes: &[Scope],
    stack: &[ScopeId],
    ranges: &[(usize, usize)],
    line: usize,
) -> Result<Vec<(ScopeId, usize)>, ScopeError> {
    let mut pops = Vec::new();
    let mut boundary = line;
    for &(m, n) in ranges {
        let top_pos = stack.len() - 1 - pops.len();
        let top = stack[top_pos];
        if scopes[top].assumption == Some(m) {
            if n + 1 != boundary {
                return Err(ScopeError::RangeMismatch {
                    start: m,
                    end: n,
                    expected_end: boundary - 1,
                });
            }
            pops.push((top, n));
            boundary = m;
        } else if stack[..top_pos]
            .iter()
            .any(|&s| scopes[s].assumption == Some(m))
        {
            return Err(ScopeError::DischargeNotInnermost(m));
        } else {
            return Err(ScopeError::DischargeNotOpen(m));
        }
    }
    Ok(pops)
}
