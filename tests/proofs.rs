use fitch::*;

fn verify(lines: &[(&str, &str)]) -> VerificationResult {
    let _ = env_logger::builder().is_test(true).try_init();
    Checker::default().verify(lines).unwrap()
}

fn reasons(result: &VerificationResult) -> String {
    result
        .verdicts
        .iter()
        .filter_map(|v| {
            v.reason
                .as_ref()
                .map(|r| format!("line {}: {r}", v.line + 1))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[track_caller]
fn assert_valid(lines: &[(&str, &str)]) {
    let result = verify(lines);
    assert!(result.valid, "expected valid proof:\n{}", reasons(&result));
}

#[track_caller]
fn assert_line_invalid(lines: &[(&str, &str)], line: usize, reason_part: &str) {
    let result = verify(lines);
    assert!(!result.valid);
    let verdict = &result.verdicts[line];
    assert!(!verdict.valid, "line {} unexpectedly valid", line + 1);
    let reason = verdict.reason.as_deref().unwrap();
    assert!(
        reason.contains(reason_part),
        "reason for line {} is {reason:?}, expected it to mention {reason_part:?}",
        line + 1
    );
}

#[test]
fn test_conjunction_elimination() {
    assert_valid(&[("A ∧ B", "assumption"), ("A", "E∧ 1")]);
    assert_valid(&[("A ∧ B", "assumption"), ("B", "E∧ 1")]);
    assert_line_invalid(
        &[("A ∧ B", "assumption"), ("C", "E∧ 1")],
        1,
        "neither conjunct",
    );
    assert_line_invalid(&[("A ∨ B", "assumption"), ("A", "E∧ 1")], 1, "conjunction");
}

#[test]
fn test_conjunction_introduction() {
    assert_valid(&[
        ("A", "assumption"),
        ("B", "assumption"),
        ("A ∧ B", "I∧ 1, 2"),
    ]);
    // citation order is strict
    assert_line_invalid(
        &[
            ("A", "assumption"),
            ("B", "assumption"),
            ("A ∧ B", "I∧ 2, 1"),
        ],
        2,
        "expected B ∧ A",
    );
}

#[test]
fn test_modus_ponens_is_symmetric_in_citation_order() {
    assert_valid(&[
        ("A → B", "assumption"),
        ("A", "assumption"),
        ("B", "E→ 1, 2"),
    ]);
    assert_valid(&[
        ("A → B", "assumption"),
        ("A", "assumption"),
        ("B", "E→ 2, 1"),
    ]);
    assert_line_invalid(
        &[
            ("A → B", "assumption"),
            ("C", "assumption"),
            ("B", "E→ 1, 2"),
        ],
        2,
        "antecedent",
    );
    assert_line_invalid(
        &[
            ("A → B", "assumption"),
            ("A", "assumption"),
            ("C", "E→ 1, 2"),
        ],
        2,
        "expected B",
    );
}

#[test]
fn test_disjunction_introduction() {
    assert_valid(&[("A", "assumption"), ("A ∨ B", "I∨ 1")]);
    assert_valid(&[("A", "assumption"), ("B ∨ A", "I∨ 1")]);
    assert_line_invalid(
        &[("A", "assumption"), ("B ∨ C", "I∨ 1")],
        1,
        "neither disjunct",
    );
    assert_line_invalid(
        &[("A", "assumption"), ("A ∧ B", "I∨ 1")],
        1,
        "not a disjunction",
    );
}

#[test]
fn test_implication_introduction() {
    // a subproof assuming A, reiterating into B ∨ A, discharged by I→
    assert_valid(&[
        ("B", "assumption"),
        ("A", "assumption"),
        ("B", "R 1"),
        ("A → B", "I→ 2–3"),
    ]);
}

#[test]
fn test_closed_subproof_is_not_citable() {
    // after I→ discharges the subproof, its lines are out of scope
    assert_line_invalid(
        &[
            ("A", "assumption"),
            ("A", "R 1"),
            ("A → A", "I→ 1–2"),
            ("A", "R 1"),
        ],
        3,
        "not in scope",
    );
    // and discharging the same range again fails in the scope pass
    assert_line_invalid(
        &[
            ("A", "assumption"),
            ("A", "R 1"),
            ("A → A", "I→ 1–2"),
            ("A → A", "I→ 1–2"),
        ],
        3,
        "does not open an active subproof",
    );
}

#[test]
fn test_range_must_cover_the_subproof() {
    assert_line_invalid(
        &[
            ("A", "assumption"),
            ("A", "R 1"),
            ("A", "R 1"),
            ("A → A", "I→ 1–2"),
        ],
        3,
        "must end at line 3",
    );
}

#[test]
fn test_reiteration() {
    assert_valid(&[("A", "assumption"), ("A", "R 1")]);
    // reiterating from an enclosing scope into a subproof is fine
    assert_valid(&[
        ("A", "assumption"),
        ("B", "assumption"),
        ("A", "R 1"),
    ]);
    assert_line_invalid(
        &[("A", "assumption"), ("B", "R 1")],
        1,
        "expected A",
    );
}

#[test]
fn test_forward_citation_is_rejected() {
    assert_line_invalid(
        &[("A", "assumption"), ("A", "R 2")],
        1,
        "cites the later line",
    );
    assert_line_invalid(
        &[("A", "assumption"), ("A", "R 5")],
        1,
        "cites the later line",
    );
}

#[test]
fn test_disjunction_elimination() {
    assert_valid(&[
        ("A ∨ B", "assumption"),
        ("A", "assumption"),
        ("B ∨ A", "I∨ 2"),
        ("B", "assumption"),
        ("B ∨ A", "I∨ 4"),
        ("B ∨ A", "E∨ 1, 2–3, 4–5"),
    ]);
    // the case assumptions must cover the disjuncts
    assert_line_invalid(
        &[
            ("A ∨ B", "assumption"),
            ("A", "assumption"),
            ("B ∨ A", "I∨ 2"),
            ("C", "assumption"),
            ("B ∨ A", "I∨ 2"),
            ("B ∨ A", "E∨ 1, 2–3, 4–5"),
        ],
        5,
        "do not cover",
    );
    // both cases must reach the conclusion
    assert_line_invalid(
        &[
            ("A ∨ B", "assumption"),
            ("A", "assumption"),
            ("B ∨ A", "I∨ 2"),
            ("B", "assumption"),
            ("A ∨ B", "R 1"),
            ("B ∨ A", "E∨ 1, 2–3, 4–5"),
        ],
        5,
        "expected A ∨ B",
    );
}

#[test]
fn test_negation_introduction() {
    assert_valid(&[
        ("¬A", "assumption"),
        ("A", "assumption"),
        ("¬A", "R 1"),
        ("A ∧ ¬A", "I∧ 2, 3"),
        ("¬A", "I¬ 2–4"),
    ]);
    // the contradiction may also be named as a pair of lines
    assert_valid(&[
        ("¬A", "assumption"),
        ("A", "assumption"),
        ("¬A", "R 1"),
        ("¬A", "I¬ 2–3, 2, 3"),
    ]);
    assert_line_invalid(
        &[
            ("B", "assumption"),
            ("A", "assumption"),
            ("B", "R 1"),
            ("¬A", "I¬ 2–3"),
        ],
        3,
        "not a contradiction",
    );
}

#[test]
fn test_negation_elimination() {
    assert_valid(&[("¬¬A", "assumption"), ("A", "E¬ 1")]);
    assert_valid(&[("¬¬A", "assumption"), ("A", "DNE 1")]);
    assert_line_invalid(
        &[("¬A", "assumption"), ("A", "E¬ 1")],
        1,
        "double negation",
    );
    assert_line_invalid(
        &[("¬¬A", "assumption"), ("B", "E¬ 1")],
        1,
        "expected A",
    );
}

#[test]
fn test_universal_elimination() {
    assert_valid(&[("∀x P(x)", "assumption"), ("P(c)", "E∀ 1")]);
    assert_valid(&[
        ("∀x (P(x) → Q(x))", "assumption"),
        ("P(a ∪ b) → Q(a ∪ b)", "E∀ 1"),
    ]);
    // the witness must be consistent across occurrences
    assert_line_invalid(
        &[("∀x R(x, x)", "assumption"), ("R(a, b)", "E∀ 1")],
        1,
        "witness",
    );
    assert_line_invalid(
        &[("∀x P(x)", "assumption"), ("Q(c)", "E∀ 1")],
        1,
        "witness",
    );
}

#[test]
fn test_universal_introduction() {
    assert_valid(&[
        ("∀x P(x)", "assumption"),
        ("P(c)", "E∀ 1"),
        ("∀y P(y)", "I∀ 2"),
    ]);
    // the generalized constant may not occur in an assumption in scope
    assert_line_invalid(
        &[("P(c)", "assumption"), ("∀x P(x)", "I∀ 1")],
        1,
        "not fresh",
    );
    // nor may it survive into the conclusion
    assert_line_invalid(
        &[
            ("∀x R(x, x)", "assumption"),
            ("R(c, c)", "E∀ 1"),
            ("∀y R(y, c)", "I∀ 2"),
        ],
        2,
        "not fresh",
    );
}

#[test]
fn test_existential_introduction() {
    assert_valid(&[("P(c)", "assumption"), ("∃x P(x)", "I∃ 1")]);
    // generalizing only some occurrences is allowed
    assert_valid(&[("R(c, c)", "assumption"), ("∃x R(x, c)", "I∃ 1")]);
    assert_line_invalid(
        &[("P(c)", "assumption"), ("∃x Q(x)", "I∃ 1")],
        1,
        "witness",
    );
}

#[test]
fn test_existential_elimination() {
    assert_valid(&[
        ("∃x P(x)", "assumption"),
        ("∀y (P(y) → Q)", "assumption"),
        ("P(c)", "assumption"),
        ("P(c) → Q", "E∀ 2"),
        ("Q", "E→ 3, 4"),
        ("Q", "E∃ 1, 3–5"),
    ]);
    // the witness constant may not escape into the conclusion
    assert_line_invalid(
        &[
            ("∃x P(x)", "assumption"),
            ("P(c)", "assumption"),
            ("P(c)", "R 2"),
            ("P(c)", "E∃ 1, 2–3"),
        ],
        3,
        "not fresh",
    );
    // nor may it already occur before the subproof
    assert_line_invalid(
        &[
            ("Q(c)", "assumption"),
            ("∃x P(x)", "assumption"),
            ("P(c)", "assumption"),
            ("∃y P(y)", "I∃ 3"),
            ("∃y P(y)", "E∃ 2, 3–4"),
        ],
        4,
        "not fresh",
    );
}

#[test]
fn test_unknown_rule_invalidates_only_its_line() {
    let result = verify(&[("A", "assumption"), ("A", "XYZZY 1"), ("B", "assumption")]);
    assert!(!result.valid);
    assert!(result.verdicts[0].valid);
    assert!(!result.verdicts[1].valid);
    assert!(result.verdicts[2].valid);
    assert!(result.verdicts[1]
        .reason
        .as_deref()
        .unwrap()
        .contains("unknown rule"));
}

#[test]
fn test_malformed_line_taints_its_citers() {
    let result = verify(&[
        ("A ∧", "assumption"),
        ("A", "E∧ 1"),
        ("A ∨ B", "I∨ 2"),
        ("C", "assumption"),
    ]);
    assert!(!result.verdicts[0].valid);
    // line 2 cites the malformed line 1, line 3 transitively cites line 2
    assert!(result.verdicts[1]
        .reason
        .as_deref()
        .unwrap()
        .contains("not well-formed"));
    assert!(result.verdicts[2]
        .reason
        .as_deref()
        .unwrap()
        .contains("not well-formed"));
    // an unrelated line is unaffected
    assert!(result.verdicts[3].valid);
}

#[test]
fn test_rule_failure_does_not_taint() {
    let result = verify(&[
        ("A ∧ B", "assumption"),
        ("C", "E∧ 1"),
        ("C ∨ D", "I∨ 2"),
    ]);
    // line 2 fails its rule check, but its formula is well-formed, so
    // line 3 may still build on it
    assert!(!result.verdicts[1].valid);
    assert!(result.verdicts[2].valid);
}

#[test]
fn test_blank_justification_is_an_assumption() {
    assert_valid(&[("A → B", ""), ("A", ""), ("B", "E→ 1, 2")]);
}

#[test]
fn test_ascii_only_proof() {
    assert_valid(&[
        ("A -> B", "hyp"),
        ("A", "hyp"),
        ("B", "MP 1, 2"),
        ("B \\/ C", "I| 3"),
    ]);
}

#[test]
fn test_verification_is_deterministic() {
    let lines = [
        ("A ∧ B", "assumption"),
        ("A", "E∧ 1"),
        ("B", "E∧ 1"),
        ("B ∧ A", "I∧ 3, 2"),
        ("C", "E∧ 99"),
    ];
    let first = verify(&lines);
    let second = verify(&lines);
    assert_eq!(first, second);
}

#[test]
fn test_empty_proof_is_an_error() {
    let _ = env_logger::builder().is_test(true).try_init();
    let checker = Checker::default();
    assert!(matches!(
        checker.verify(&[("", ""), ("  ", "")]),
        Err(Error::EmptyProof)
    ));
}

#[test]
fn test_nested_subproofs() {
    // ⊢ A → (B → A)
    assert_valid(&[
        ("A", "assumption"),
        ("B", "assumption"),
        ("A", "R 1"),
        ("B → A", "I→ 2–3"),
        ("A → (B → A)", "I→ 1–4"),
    ]);
}
