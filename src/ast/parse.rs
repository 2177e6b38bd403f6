//! Parse formulas and justifications.
//!
//! Both grammars share one tokenizer-level synonym table, so every ASCII
//! fallback and backslash command form is resolved in exactly one place.

use crate::*;

use super::infix_op;
use smallvec::SmallVec;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

/// Parse a single formula in first-order notation.
pub fn parse_formula(filename: Option<String>, input: &str) -> Result<Formula, ParseError> {
    let ctx = Context::new(filename, input);
    let (out, rest) = formula(&ctx)?;
    if !rest.is_at_end() {
        return Err(ParseError::TrailingInput(rest.span_here()));
    }
    Ok(bind(out, &mut Vec::new()))
}

/// Parse the justification field of a proof line. A blank justification
/// denotes an assumption: assumption lines are the only lines that carry
/// no rule citation.
pub fn parse_justification(
    filename: Option<String>,
    input: &str,
) -> Result<Justification, JustificationError> {
    let ctx = Context::new(filename, input);
    if ctx.is_at_end() {
        return Ok(Justification {
            rule: Rule::Assumption,
            premises: SmallVec::new(),
            span: ctx.span_here(),
        });
    }
    let (rule, next) = rule_token(&ctx)?;
    let (premises, next) = line_refs(&next)?;
    if !next.is_at_end() {
        return Err(JustificationError::TrailingInput(next.span_here()));
    }
    Ok(Justification {
        rule,
        premises,
        span: Span(ctx.source.clone(), ctx.index, next.index),
    })
}

/// A [`Span`] contains the file name and a pair of offsets representing the start and the end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span(pub(crate) Arc<SrcFile>, pub(crate) usize, pub(crate) usize);

lazy_static::lazy_static! {
    pub static ref DUMMY_SPAN: Span = Span(Arc::new(SrcFile {name: None, contents: String::new()}), 0, 0);
}

impl Span {
    pub fn string(&self) -> &str {
        &self.0.contents[self.1..self.2]
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct SrcFile {
    name: Option<String>,
    contents: String,
}

struct Location {
    line: usize,
    col: usize,
}

impl SrcFile {
    pub fn get_location(&self, offset: usize) -> Location {
        let mut line = 1;
        let mut col = 1;
        // offset is a byte index, so walk char_indices
        for (i, c) in self.contents.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        Location { line, col }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = self.0.get_location(self.1);
        let end = self.0.get_location(self.2.saturating_sub(1).max(self.1));
        let quote = self.string();
        match (&self.0.name, start.line == end.line) {
            (Some(filename), true) => write!(
                f,
                "In {}:{}-{} of {filename}: {quote}",
                start.line, start.col, end.col
            ),
            (Some(filename), false) => write!(
                f,
                "In {}:{}-{}:{} of {filename}: {quote}",
                start.line, start.col, end.line, end.col
            ),
            (None, false) => write!(
                f,
                "In {}:{}-{}:{}: {quote}",
                start.line, start.col, end.line, end.col
            ),
            (None, true) => write!(f, "In {}:{}-{}: {quote}", start.line, start.col, end.col),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Context {
    source: Arc<SrcFile>,
    index: usize,
}

impl Context {
    pub fn new(name: Option<String>, contents: &str) -> Context {
        let mut next = Context {
            source: Arc::new(SrcFile {
                name,
                contents: contents.to_string(),
            }),
            index: 0,
        };
        next.advance_past_whitespace();
        next
    }

    fn span_here(&self) -> Span {
        Span(self.source.clone(), self.index, self.index)
    }

    fn rest(&self) -> &str {
        &self.source.contents[self.index..]
    }

    /// Advances past `s` if it is next in the input. A token ending in an
    /// alphanumeric character must not run into a following identifier
    /// character, so `forall` matches in `forall x` but not in `forallx`
    /// (and `\subset` does not swallow the head of `\subseteq`).
    pub fn advance_token(&self, s: &str) -> Option<(Span, Context)> {
        if !self.rest().starts_with(s) {
            return None;
        }
        if s.ends_with(|c: char| c.is_alphanumeric()) {
            if let Some(c) = self.rest()[s.len()..].chars().next() {
                if c.is_alphanumeric() || c == '_' {
                    return None;
                }
            }
        }
        let mut next = self.clone();
        next.index += s.len();
        next.advance_past_whitespace();
        Some((Span(self.source.clone(), self.index, self.index + s.len()), next))
    }

    fn advance_past_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.index += rest.len() - trimmed.len();
    }

    pub fn is_at_end(&self) -> bool {
        self.index == self.source.contents.len()
    }
}

type Res<T> = Result<(T, Context), ParseError>;

trait Parser<T>: Fn(&Context) -> Res<T> + Clone {}
impl<T, F: Fn(&Context) -> Res<T> + Clone> Parser<T> for F {}

fn text(s: &'static str) -> impl Parser<Span> {
    move |ctx: &Context| {
        if let Some((span, next)) = ctx.advance_token(s) {
            Ok((span, next))
        } else {
            Err(ParseError::ExpectedText(ctx.span_here(), s.to_string()))
        }
    }
}

fn choice<T>(a: impl Parser<T>, b: impl Parser<T>) -> impl Parser<T> {
    move |ctx| a(ctx).or_else(|_| b(ctx))
}

macro_rules! choices {
    ( $x:expr , ) => { $x };
    ( $x:expr $( , $xs:expr )+ , ) => {
        choice( $x, choices!( $( $xs , )+ ) )
    };
}

fn map<T, U>(parser: impl Parser<T>, f: impl Fn(T) -> U + Clone) -> impl Parser<U> {
    move |ctx| {
        let (x, next) = parser(ctx)?;
        Ok((f(x), next))
    }
}

fn sequence<T, U>(a: impl Parser<T>, b: impl Parser<U>) -> impl Parser<(T, U)> {
    move |ctx| {
        let (x, next) = a(ctx)?;
        let (y, next) = b(&next)?;
        Ok(((x, y), next))
    }
}

fn option<T>(parser: impl Parser<T>) -> impl Parser<Option<T>> {
    move |ctx| match parser(ctx) {
        Ok((x, next)) => Ok((Some(x), next)),
        Err(_) => Ok((None, ctx.clone())),
    }
}

fn parens<T>(f: impl Parser<T>) -> impl Parser<T> {
    move |ctx| {
        let (_, next) = text("(")(ctx)?;
        let (x, next) = f(&next)?;
        let (_, next) = text(")")(&next)?;
        Ok((x, next))
    }
}

fn comma_list<T>(parser: impl Parser<T>) -> impl Parser<Vec<T>> {
    move |ctx| {
        let (first, mut next) = parser(ctx)?;
        let mut vec = vec![first];
        while let Ok((_, rest)) = text(",")(&next) {
            let (x, rest) = parser(&rest)?;
            vec.push(x);
            next = rest;
        }
        Ok((vec, next))
    }
}

/// Canonical glyphs and their tokenizer-level synonyms. This table is the
/// single source of truth for the accepted notation: the formula grammar
/// matches through [`symbol`], and rule tokens are normalized against the
/// same entries.
const SYMBOL_SYNONYMS: &[(&str, &[&str])] = &[
    ("∀", &["\\forall", "forall"]),
    ("∃", &["\\exists", "exists"]),
    ("∧", &["/\\", "&", "\\land", "\\wedge"]),
    ("∨", &["\\/", "|", "\\lor", "\\vee"]),
    ("→", &["->", "=>", "\\to", "\\rightarrow", "\\implies"]),
    ("¬", &["~", "!", "\\neg", "\\lnot"]),
    ("∈", &["\\in"]),
    ("⊆", &["\\subseteq"]),
    ("⊂", &["\\subset"]),
    ("∪", &["\\cup"]),
    ("∩", &["\\cap"]),
    ("∅", &["\\emptyset", "\\empty"]),
];

fn synonyms_of(canonical: &str) -> &'static [&'static str] {
    SYMBOL_SYNONYMS
        .iter()
        .find(|(c, _)| *c == canonical)
        .map(|(_, syns)| *syns)
        .unwrap_or(&[])
}

/// Matches a canonical symbol or any of its synonym spellings.
fn symbol(canonical: &'static str) -> impl Parser<Span> {
    move |ctx: &Context| {
        for form in std::iter::once(canonical).chain(synonyms_of(canonical).iter().copied()) {
            if let Some((span, next)) = ctx.advance_token(form) {
                return Ok((span, next));
            }
        }
        Err(ParseError::ExpectedText(
            ctx.span_here(),
            canonical.to_string(),
        ))
    }
}

// The formula grammar, loosest binding first. Implication is
// right-associative; disjunction and conjunction are left-associative;
// negation and the quantifiers bind their immediate sub-formula.

fn formula(ctx: &Context) -> Res<Formula> {
    let (lhs, next) = disjunction(ctx)?;
    if let Ok((_, next)) = symbol("→")(&next) {
        let (rhs, next) = formula(&next)?;
        Ok((Formula::implies(lhs, rhs), next))
    } else {
        Ok((lhs, next))
    }
}

fn disjunction(ctx: &Context) -> Res<Formula> {
    let (mut lhs, mut next) = conjunction(ctx)?;
    while let Ok((_, rest)) = symbol("∨")(&next) {
        let (rhs, rest) = conjunction(&rest)?;
        lhs = Formula::or(lhs, rhs);
        next = rest;
    }
    Ok((lhs, next))
}

fn conjunction(ctx: &Context) -> Res<Formula> {
    let (mut lhs, mut next) = unary(ctx)?;
    while let Ok((_, rest)) = symbol("∧")(&next) {
        let (rhs, rest) = unary(&rest)?;
        lhs = Formula::and(lhs, rhs);
        next = rest;
    }
    Ok((lhs, next))
}

fn unary(ctx: &Context) -> Res<Formula> {
    choices!(
        map(sequence(symbol("¬"), unary), |(_, x)| Formula::not(x)),
        quantified,
        parens(formula),
        atom,
    )(ctx)
}

fn quantified(ctx: &Context) -> Res<Formula> {
    let (universal, next) = choice(
        map(symbol("∀"), |_| true),
        map(symbol("∃"), |_| false),
    )(ctx)?;
    let (var, next) = ident(&next)?;
    let (_, next) = option(text("."))(&next)?;
    let (body, next) = unary(&next)?;
    let f = if universal {
        Formula::forall(var, body)
    } else {
        Formula::exists(var, body)
    };
    Ok((f, next))
}

fn atom(ctx: &Context) -> Res<Formula> {
    let start = ctx.index;
    let (lhs, next) = term(ctx)?;
    for pred in ["∈", "⊆", "⊂"] {
        if let Ok((_, rest)) = symbol(pred)(&next) {
            let (rhs, rest) = term(&rest)?;
            return Ok((Formula::atom(pred, [lhs, rhs]), rest));
        }
    }
    // a bare term in formula position must be a predicate application
    match lhs {
        Term::Apply(head, args) if !infix_op(head) => Ok((Formula::Atom(head, args), next)),
        Term::Const(name) if name.as_str() != "∅" => Ok((Formula::Atom(name, vec![]), next)),
        _ => Err(ParseError::ExpectedPredicate(Span(
            ctx.source.clone(),
            start,
            next.index,
        ))),
    }
}

fn term(ctx: &Context) -> Res<Term> {
    let (mut lhs, mut next) = factor(ctx)?;
    loop {
        let mut matched = false;
        for op in ["∪", "∩"] {
            if let Ok((_, rest)) = symbol(op)(&next) {
                let (rhs, rest) = factor(&rest)?;
                lhs = Term::apply(op, [lhs, rhs]);
                next = rest;
                matched = true;
                break;
            }
        }
        if !matched {
            return Ok((lhs, next));
        }
    }
}

fn factor(ctx: &Context) -> Res<Term> {
    choices!(
        map(symbol("∅"), |_| Term::constant("∅")),
        parens(term),
        application,
    )(ctx)
}

fn application(ctx: &Context) -> Res<Term> {
    let (head, next) = ident(ctx)?;
    if let Ok((args, next)) = parens(comma_list(term))(&next) {
        Ok((Term::Apply(head, args), next))
    } else {
        // variables are resolved against enclosing binders after parsing
        Ok((Term::Const(head), next))
    }
}

fn ident(ctx: &Context) -> Res<Symbol> {
    let mut chars = ctx.rest().char_indices();
    match chars.next() {
        Some((_, c)) if c.is_alphabetic() || c == '_' => {}
        _ => return Err(ParseError::ExpectedIdent(ctx.span_here())),
    }
    let len = chars
        .find(|(_, c)| !c.is_alphanumeric() && *c != '_')
        .map(|(i, _)| i)
        .unwrap_or_else(|| ctx.rest().len());
    let span = Span(ctx.source.clone(), ctx.index, ctx.index + len);
    let name = span.string();
    if matches!(name, "forall" | "exists") {
        return Err(ParseError::ReservedWord(span.clone(), name.to_string()));
    }
    let sym = Symbol::from(name);
    let mut next = ctx.clone();
    next.index += len;
    next.advance_past_whitespace();
    Ok((sym, next))
}

/// Resolves identifiers bound by an enclosing quantifier into variables.
/// The parser itself is context-free and produces constants everywhere.
fn bind(f: Formula, bound: &mut Vec<Symbol>) -> Formula {
    match f {
        Formula::Atom(p, args) => {
            Formula::Atom(p, args.into_iter().map(|t| bind_term(t, bound)).collect())
        }
        Formula::Not(x) => Formula::not(bind(*x, bound)),
        Formula::And(a, b) => Formula::and(bind(*a, bound), bind(*b, bound)),
        Formula::Or(a, b) => Formula::or(bind(*a, bound), bind(*b, bound)),
        Formula::Implies(a, b) => Formula::implies(bind(*a, bound), bind(*b, bound)),
        Formula::ForAll(v, body) => {
            bound.push(v);
            let body = bind(*body, bound);
            bound.pop();
            Formula::forall(v, body)
        }
        Formula::Exists(v, body) => {
            bound.push(v);
            let body = bind(*body, bound);
            bound.pop();
            Formula::exists(v, body)
        }
    }
}

fn bind_term(t: Term, bound: &[Symbol]) -> Term {
    match t {
        Term::Const(s) if bound.contains(&s) => Term::Var(s),
        Term::Var(_) | Term::Const(_) => t,
        Term::Apply(head, args) => Term::Apply(
            head,
            args.into_iter().map(|t| bind_term(t, bound)).collect(),
        ),
    }
}

// The justification grammar: a rule token, then comma- or
// space-separated references (`3`, or `2–4` for a subproof).

fn rule_token(ctx: &Context) -> Result<(Rule, Context), JustificationError> {
    let len = ctx
        .rest()
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || c.is_ascii_digit() || *c == ',')
        .map(|(i, _)| i)
        .unwrap_or_else(|| ctx.rest().len());
    let span = Span(ctx.source.clone(), ctx.index, ctx.index + len);
    let token = span.string().to_string();
    let rule = lookup_rule(&token)
        .ok_or_else(|| JustificationError::UnknownRule(span.clone(), token))?;
    let mut next = ctx.clone();
    next.index += len;
    next.advance_past_whitespace();
    Ok((rule, next))
}

/// Rewrites synonym spellings inside a rule token to canonical glyphs, so
/// `E&`, `E/\` and `E\land` all read as `E∧`.
fn normalize_token(token: &str) -> String {
    let mut out = String::new();
    let mut rest = token;
    'outer: while !rest.is_empty() {
        for (canonical, syns) in SYMBOL_SYNONYMS {
            for syn in syns.iter() {
                if rest.starts_with(syn) {
                    out.push_str(canonical);
                    rest = &rest[syn.len()..];
                    continue 'outer;
                }
            }
        }
        let c = rest.chars().next().unwrap();
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn lookup_rule(token: &str) -> Option<Rule> {
    match normalize_token(token).as_str() {
        "I∧" | "∧I" => return Some(Rule::AndIntro),
        "E∧" | "∧E" => return Some(Rule::AndElim),
        "I∨" | "∨I" => return Some(Rule::OrIntro),
        "E∨" | "∨E" => return Some(Rule::OrElim),
        "I→" | "→I" => return Some(Rule::ImpliesIntro),
        "E→" | "→E" => return Some(Rule::ImpliesElim),
        "I¬" | "¬I" => return Some(Rule::NotIntro),
        "E¬" | "¬E" => return Some(Rule::NotElim),
        "I∀" | "∀I" => return Some(Rule::ForAllIntro),
        "E∀" | "∀E" => return Some(Rule::ForAllElim),
        "I∃" | "∃I" => return Some(Rule::ExistsIntro),
        "E∃" | "∃E" => return Some(Rule::ExistsElim),
        _ => {}
    }
    match token.to_ascii_lowercase().as_str() {
        "assumption" | "hyp" | "premise" => Some(Rule::Assumption),
        "r" | "reit" | "reiteration" => Some(Rule::Reiteration),
        "mp" => Some(Rule::ImpliesElim),
        "dne" => Some(Rule::NotElim),
        _ => None,
    }
}

fn line_refs(ctx: &Context) -> Result<(SmallVec<[LineRef; 2]>, Context), JustificationError> {
    let mut refs = SmallVec::new();
    let mut next = ctx.clone();
    while !next.is_at_end() {
        if let Some((_, rest)) = next.advance_token(",") {
            next = rest;
        }
        let ref_start = next.index;
        let (start, rest) = line_number(&next)?;
        let mut dashed = None;
        for dash in ["–", "—", "-", ".."] {
            if let Some((_, r)) = rest.advance_token(dash) {
                dashed = Some(r);
                break;
            }
        }
        if let Some(rest) = dashed {
            let (end, rest) = line_number(&rest)?;
            if end < start {
                return Err(JustificationError::InvalidReference(Span(
                    rest.source.clone(),
                    ref_start,
                    rest.index,
                )));
            }
            refs.push(LineRef::Range(start - 1, end - 1));
            next = rest;
        } else {
            refs.push(LineRef::Line(start - 1));
            next = rest;
        }
    }
    Ok((refs, next))
}

fn line_number(ctx: &Context) -> Result<(usize, Context), JustificationError> {
    let len = ctx
        .rest()
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or_else(|| ctx.rest().len());
    let span = Span(ctx.source.clone(), ctx.index, ctx.index + len);
    if len == 0 {
        return Err(JustificationError::InvalidReference(span));
    }
    let n: usize = span
        .string()
        .parse()
        .map_err(|_| JustificationError::InvalidReference(span.clone()))?;
    if n == 0 {
        return Err(JustificationError::InvalidReference(span));
    }
    let mut next = ctx.clone();
    next.index += len;
    next.advance_past_whitespace();
    Ok((n, next))
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}\nexpected {1}")]
    ExpectedText(Span, String),
    #[error("{0}\nexpected identifier")]
    ExpectedIdent(Span),
    #[error("{0}\n{1} is a reserved word")]
    ReservedWord(Span, String),
    #[error("{0}\nthis is a term, not a formula")]
    ExpectedPredicate(Span),
    #[error("{0}\nunexpected trailing input")]
    TrailingInput(Span),
    #[error("formula is {0} bytes long, limit is {1}")]
    TooLong(usize, usize),
    #[error("formula nests {0} levels deep, limit is {1}")]
    TooDeep(usize, usize),
}

#[derive(Debug, Error)]
pub enum JustificationError {
    #[error("{0}\nunknown rule: {1}")]
    UnknownRule(Span, String),
    #[error("{0}\nmalformed line reference")]
    InvalidReference(Span),
    #[error("{0}\nunexpected trailing input after justification")]
    TrailingInput(Span),
}

#[cfg(test)]
mod tests {
    use crate::ast::{parse_formula, parse_justification};
    use crate::{Formula, LineRef, Rule, Term};

    #[test]
    fn test_parser_display_roundtrip() {
        for s in [
            "P",
            "P(x, y)",
            "¬P ∧ Q",
            "A ∧ B ∧ C",
            "A → B → C",
            "(A → B) → C",
            "A ∨ B ∧ C",
            "(A ∨ B) ∧ C",
            "¬(A ∨ B)",
            "∀x P(x)",
            "∀x (P(x) → Q(x))",
            "∃x P(x) ∧ Q",
            "x ∈ A",
            "A ∪ B ⊆ C",
            "A ∪ B ∩ C ⊂ D",
            "∀x (x ∈ A → x ∈ A ∪ B)",
            "∅ ⊆ A",
        ] {
            let f = parse_formula(None, s).unwrap();
            assert_eq!(format!("{}", f), s);
        }
    }

    #[test]
    fn test_synonyms() {
        let canonical = parse_formula(None, "A ∧ B").unwrap();
        for s in ["A & B", "A /\\ B", "A \\land B", "A \\wedge B"] {
            assert_eq!(parse_formula(None, s).unwrap(), canonical);
        }
        let canonical = parse_formula(None, "∀x (P(x) → ¬Q ∨ x ∈ S)").unwrap();
        assert_eq!(
            parse_formula(None, "forall x. (P(x) -> ~Q | x \\in S)").unwrap(),
            canonical
        );
        assert_eq!(
            parse_formula(None, "\\forall x (P(x) => !Q \\/ x ∈ S)").unwrap(),
            canonical
        );
    }

    #[test]
    fn test_precedence() {
        let f = parse_formula(None, "A → B ∨ C ∧ ¬D").unwrap();
        assert_eq!(
            f,
            Formula::implies(
                Formula::atom("A", []),
                Formula::or(
                    Formula::atom("B", []),
                    Formula::and(Formula::atom("C", []), Formula::not(Formula::atom("D", [])))
                )
            )
        );
        // implication is right-associative
        assert_eq!(
            parse_formula(None, "A → B → C").unwrap(),
            Formula::implies(
                Formula::atom("A", []),
                Formula::implies(Formula::atom("B", []), Formula::atom("C", []))
            )
        );
    }

    #[test]
    fn test_quantifier_binds_immediate_subformula() {
        let f = parse_formula(None, "∀x P(x) ∧ Q(x)").unwrap();
        let Formula::And(lhs, rhs) = f else {
            panic!("expected conjunction, got {f}");
        };
        assert_eq!(
            *lhs,
            Formula::forall("x", Formula::atom("P", [Term::var("x")]))
        );
        // the second x is outside the quantifier, hence a constant
        assert_eq!(*rhs, Formula::atom("Q", [Term::constant("x")]));
    }

    #[test]
    fn test_shadowing_binds_innermost() {
        let f = parse_formula(None, "∀x ∃x P(x)").unwrap();
        assert_eq!(
            f,
            Formula::forall(
                "x",
                Formula::exists("x", Formula::atom("P", [Term::var("x")]))
            )
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_formula(None, "").is_err());
        assert!(parse_formula(None, "A ∧").is_err());
        assert!(parse_formula(None, "(A ∨ B").is_err());
        assert!(parse_formula(None, "A B").is_err());
        assert!(parse_formula(None, "∀ ∧ P").is_err());
        // a bare set term is not a formula
        assert!(parse_formula(None, "A ∪ B").is_err());
        assert!(parse_formula(None, "∅").is_err());
        let err = parse_formula(None, "A ∧ ∧").unwrap_err();
        assert!(err.to_string().contains("1:5"), "unhelpful span: {err}");
    }

    #[test]
    fn test_justifications() {
        let j = parse_justification(None, "E∧ 1").unwrap();
        assert_eq!(j.rule, Rule::AndElim);
        assert_eq!(j.premises.as_slice(), &[LineRef::Line(0)]);

        let j = parse_justification(None, "E→ 1, 2").unwrap();
        assert_eq!(j.rule, Rule::ImpliesElim);
        assert_eq!(
            j.premises.as_slice(),
            &[LineRef::Line(0), LineRef::Line(1)]
        );

        let j = parse_justification(None, "I→ 1–2").unwrap();
        assert_eq!(j.rule, Rule::ImpliesIntro);
        assert_eq!(j.premises.as_slice(), &[LineRef::Range(0, 1)]);

        // ASCII spellings of the same citations
        assert_eq!(parse_justification(None, "E& 1").unwrap().rule, Rule::AndElim);
        assert_eq!(parse_justification(None, "I-> 1-2").unwrap().rule, Rule::ImpliesIntro);
        assert_eq!(parse_justification(None, "->E 1 2").unwrap().rule, Rule::ImpliesElim);
        assert_eq!(parse_justification(None, "MP 1, 2").unwrap().rule, Rule::ImpliesElim);
        assert_eq!(parse_justification(None, "E∨ 1, 2–4, 5..7").unwrap().premises.len(), 3);

        // blank means assumption
        let j = parse_justification(None, "  ").unwrap();
        assert_eq!(j.rule, Rule::Assumption);
        assert!(j.premises.is_empty());
    }

    #[test]
    fn test_justification_errors() {
        assert!(matches!(
            parse_justification(None, "E⊕ 1"),
            Err(crate::JustificationError::UnknownRule(..))
        ));
        assert!(matches!(
            parse_justification(None, "E∧ 0"),
            Err(crate::JustificationError::InvalidReference(..))
        ));
        assert!(matches!(
            parse_justification(None, "I→ 3–1"),
            Err(crate::JustificationError::InvalidReference(..))
        ));
        assert!(matches!(
            parse_justification(None, "E∧ 1 nonsense"),
            Err(crate::JustificationError::UnknownRule(..))
                | Err(crate::JustificationError::InvalidReference(..))
        ));
    }
}
