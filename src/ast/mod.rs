pub mod parse;
mod subst;

use crate::*;
pub use parse::{parse_formula, parse_justification, JustificationError, ParseError, Span, DUMMY_SPAN};
pub(crate) use subst::{match_instance, Instantiation};

use smallvec::SmallVec;
use std::fmt::Display;

/// A first-order term: a variable bound by an enclosing quantifier, an
/// uninterpreted constant, or a function application such as `A ∪ B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Var(Symbol),
    Const(Symbol),
    Apply(Symbol, Vec<Term>),
}

impl Term {
    pub fn var(name: impl Into<Symbol>) -> Self {
        Term::Var(name.into())
    }

    pub fn constant(name: impl Into<Symbol>) -> Self {
        Term::Const(name.into())
    }

    pub fn apply(head: impl Into<Symbol>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Apply(head.into(), args.into_iter().collect())
    }

    pub fn depth(&self) -> usize {
        match self {
            Term::Var(_) | Term::Const(_) => 1,
            Term::Apply(_, args) => 1 + args.iter().map(Term::depth).max().unwrap_or(0),
        }
    }
}

/// Binary term operators printed infix.
pub(crate) fn infix_op(name: Symbol) -> bool {
    matches!(name.as_str(), "∪" | "∩")
}

/// Binary predicates printed infix.
pub(crate) fn infix_pred(name: Symbol) -> bool {
    matches!(name.as_str(), "∈" | "⊆" | "⊂")
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Var(s) | Term::Const(s) => Display::fmt(s, f),
            Term::Apply(op, args) if args.len() == 2 && infix_op(*op) => {
                // left-associative: parenthesize only an infix right operand
                write!(f, "{} {op} ", args[0])?;
                if matches!(&args[1], Term::Apply(rhs, rargs) if rargs.len() == 2 && infix_op(*rhs))
                {
                    write!(f, "({})", args[1])
                } else {
                    write!(f, "{}", args[1])
                }
            }
            Term::Apply(head, args) => write!(f, "{head}({})", ListDisplay(args, ", ")),
        }
    }
}

/// An immutable first-order formula. Equality is derived structural
/// equality; alpha-equivalent formulas with different bound-variable names
/// are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Atom(Symbol, Vec<Term>),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    ForAll(Symbol, Box<Formula>),
    Exists(Symbol, Box<Formula>),
}

impl Formula {
    pub fn atom(pred: impl Into<Symbol>, args: impl IntoIterator<Item = Term>) -> Self {
        Formula::Atom(pred.into(), args.into_iter().collect())
    }

    pub fn not(inner: Formula) -> Self {
        Formula::Not(Box::new(inner))
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::Implies(Box::new(left), Box::new(right))
    }

    pub fn forall(var: impl Into<Symbol>, body: Formula) -> Self {
        Formula::ForAll(var.into(), Box::new(body))
    }

    pub fn exists(var: impl Into<Symbol>, body: Formula) -> Self {
        Formula::Exists(var.into(), Box::new(body))
    }

    fn children(&self) -> SmallVec<[&Formula; 2]> {
        match self {
            Formula::Atom(..) => SmallVec::new(),
            Formula::Not(x) | Formula::ForAll(_, x) | Formula::Exists(_, x) => {
                SmallVec::from_slice(&[x.as_ref()])
            }
            Formula::And(a, b) | Formula::Or(a, b) | Formula::Implies(a, b) => {
                SmallVec::from_slice(&[a.as_ref(), b.as_ref()])
            }
        }
    }

    /// Tree height, counting term nesting inside atoms.
    pub fn depth(&self) -> usize {
        match self {
            Formula::Atom(_, args) => 1 + args.iter().map(Term::depth).max().unwrap_or(0),
            _ => 1 + self.children().iter().map(|c| c.depth()).max().unwrap_or(0),
        }
    }
}

// Binding strength, loosest first. Used by the printer to insert the
// minimal parentheses that survive a round-trip through the parser.
const PREC_IMPLIES: u8 = 0;
const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_UNARY: u8 = 3;

impl Formula {
    fn fmt_prec(&self, f: &mut std::fmt::Formatter<'_>, prec: u8) -> std::fmt::Result {
        let own = match self {
            Formula::Implies(..) => PREC_IMPLIES,
            Formula::Or(..) => PREC_OR,
            Formula::And(..) => PREC_AND,
            _ => PREC_UNARY,
        };
        if own < prec {
            write!(f, "(")?;
        }
        match self {
            Formula::Atom(pred, args) if args.len() == 2 && infix_pred(*pred) => {
                write!(f, "{} {pred} {}", args[0], args[1])?;
            }
            Formula::Atom(pred, args) => {
                if args.is_empty() {
                    write!(f, "{pred}")?;
                } else {
                    write!(f, "{pred}({})", ListDisplay(args, ", "))?;
                }
            }
            Formula::Not(x) => {
                write!(f, "¬")?;
                x.fmt_prec(f, PREC_UNARY)?;
            }
            Formula::And(a, b) => {
                a.fmt_prec(f, PREC_AND)?;
                write!(f, " ∧ ")?;
                b.fmt_prec(f, PREC_AND + 1)?;
            }
            Formula::Or(a, b) => {
                a.fmt_prec(f, PREC_OR)?;
                write!(f, " ∨ ")?;
                b.fmt_prec(f, PREC_OR + 1)?;
            }
            Formula::Implies(a, b) => {
                a.fmt_prec(f, PREC_IMPLIES + 1)?;
                write!(f, " → ")?;
                b.fmt_prec(f, PREC_IMPLIES)?;
            }
            Formula::ForAll(v, body) => {
                write!(f, "∀{v} ")?;
                body.fmt_prec(f, PREC_UNARY)?;
            }
            Formula::Exists(v, body) => {
                write!(f, "∃{v} ")?;
                body.fmt_prec(f, PREC_UNARY)?;
            }
        }
        if own < prec {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_prec(f, PREC_IMPLIES)
    }
}

/// The inference rules of the natural-deduction calculus, one
/// introduction/elimination pair per connective plus the structural rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Assumption,
    Reiteration,
    AndIntro,
    AndElim,
    OrIntro,
    OrElim,
    ImpliesIntro,
    ImpliesElim,
    NotIntro,
    NotElim,
    ForAllIntro,
    ForAllElim,
    ExistsIntro,
    ExistsElim,
}

impl Rule {
    pub fn token(&self) -> &'static str {
        match self {
            Rule::Assumption => "assumption",
            Rule::Reiteration => "R",
            Rule::AndIntro => "I∧",
            Rule::AndElim => "E∧",
            Rule::OrIntro => "I∨",
            Rule::OrElim => "E∨",
            Rule::ImpliesIntro => "I→",
            Rule::ImpliesElim => "E→",
            Rule::NotIntro => "I¬",
            Rule::NotElim => "E¬",
            Rule::ForAllIntro => "I∀",
            Rule::ForAllElim => "E∀",
            Rule::ExistsIntro => "I∃",
            Rule::ExistsElim => "E∃",
        }
    }

    /// Rules that close the subproofs named by their range citations.
    pub(crate) fn discharges(&self) -> bool {
        matches!(
            self,
            Rule::ImpliesIntro | Rule::NotIntro | Rule::OrElim | Rule::ExistsElim
        )
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A citation of prior work: a single line, or the span of a whole
/// subproof for the discharge rules. Indices are 0-based in memory and
/// 1-based in the surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRef {
    Line(usize),
    Range(usize, usize),
}

impl Display for LineRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineRef::Line(i) => write!(f, "{}", i + 1),
            LineRef::Range(m, n) => write!(f, "{}–{}", m + 1, n + 1),
        }
    }
}

/// A parsed justification: the rule invoked plus its premise citations,
/// in citation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Justification {
    pub rule: Rule,
    pub premises: SmallVec<[LineRef; 2]>,
    pub span: Span,
}

impl Display for Justification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.premises.is_empty() {
            write!(f, "{}", self.rule)
        } else {
            write!(f, "{} {}", self.rule, ListDisplay(&self.premises, ", "))
        }
    }
}
