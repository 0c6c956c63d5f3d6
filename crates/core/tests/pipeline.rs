//! End-to-end tests: PDDL text in, ASP facts or normalized PDDL out.

use pddlasp_core::normalized::{AtomicFormula, Literal};
use pddlasp_core::{
    beautify_sources, check_syntax, normalize, normalize_sources, parse_description, pipeline, translate_sources, Error,
    Mode, NormalizationConfig, Options, Source,
};

const BLOCKS_DOMAIN: &str = "
(define (domain blocks)
  (:requirements :strips :typing :negative-preconditions)
  (:types block)
  (:predicates (on ?x ?y - block) (ontable ?x - block) (clear ?x - block)
               (handempty) (holding ?x - block))
  (:action pick-up
    :parameters (?x - block)
    :precondition (and (clear ?x) (ontable ?x) (handempty))
    :effect (and (not (ontable ?x)) (not (clear ?x)) (not (handempty)) (holding ?x))))";

const BLOCKS_PROBLEM: &str = "
(define (problem tower)
  (:domain blocks)
  (:objects a b - block)
  (:init (clear a) (clear b) (ontable a) (ontable b) (handempty) (not (holding a)))
  (:goal (and (on a b) (clear a))))";

fn sources(texts: &[(&str, &str)]) -> Vec<Source> {
    texts.iter().map(|(name, text)| Source::new(*name, *text)).collect()
}

fn normalized(text: &str) -> pddlasp_core::normalized::Description {
    let sources = sources(&[("input.pddl", text)]);
    let mut context = pipeline::context(&sources, &Options::default());
    let description = parse_description(&mut context).unwrap();
    normalize(description, &NormalizationConfig::default()).unwrap()
}

// ──────────────────────────────────────────────
// Translation
// ──────────────────────────────────────────────

#[test]
fn predicates_become_variables() {
    let output = translate_sources(
        &sources(&[("domain.pddl", "(define (domain d) (:predicates (handempty) (on ?x ?y)))")]),
        &Options::default(),
    )
    .unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert!(lines.contains(&"variable(handempty)."));
    assert!(lines.contains(&"variable((on, X1, X2)) :- has(X1, type(object)), has(X2, type(object))."));
}

#[test]
fn domain_and_problem_from_separate_files() {
    let output = translate_sources(
        &sources(&[("domain.pddl", BLOCKS_DOMAIN), ("problem.pddl", BLOCKS_PROBLEM)]),
        &Options::default(),
    )
    .unwrap();
    let lines: Vec<_> = output.lines().collect();

    let domain = lines.iter().position(|line| *line == "% domain").unwrap();
    let problem = lines.iter().position(|line| *line == "% problem").unwrap();
    assert!(domain < problem);

    assert!(lines.contains(&"action(action((pick_hup, X1))) :- has(X1, type(block))."));
    assert!(lines.contains(
        &"initialState(variable((holding, constant(a))), value((holding, constant(a)), false))."
    ));
    let goals = lines.iter().filter(|line| line.starts_with("goal(")).count();
    assert_eq!(goals, 2);
}

#[test]
fn unsupported_input_is_reported_at_normalization() {
    let error = translate_sources(
        &sources(&[(
            "domain.pddl",
            "(define (domain d) (:requirements :equality)
               (:predicates (p ?x))
               (:action a :parameters (?x ?y) :precondition (= ?x ?y) :effect (p ?x)))",
        )]),
        &Options::default(),
    )
    .unwrap_err();
    assert!(matches!(error, Error::Normalization { .. }));
    assert!(error
        .message()
        .contains("“=” expressions currently unsupported by normalization"));
}

// ──────────────────────────────────────────────
// Normalization
// ──────────────────────────────────────────────

#[test]
fn conjunctions_distribute_into_disjuncts() {
    let description = normalized(
        "(define (domain d) (:requirements :disjunctive-preconditions)
           (:predicates (p) (q) (r))
           (:action a :precondition (and (p) (or (q) (r))) :effect (p)))",
    );
    let declaration = &description.domain.derived_predicates[0];
    assert_eq!(declaration.body.len(), 2);
    for (disjunct, second) in declaration.body.iter().zip(["q", "r"]) {
        let names: Vec<_> = disjunct
            .iter()
            .map(|literal| match literal.atomic() {
                AtomicFormula::Predicate(predicate) => {
                    description.domain.predicate(predicate.declaration).name.as_str()
                }
                AtomicFormula::DerivedPredicate(_) => "derived",
            })
            .collect();
        assert_eq!(names, ["p", second]);
    }
}

#[test]
fn derived_ids_are_unique_and_increasing() {
    let description = normalized(
        "(define (domain d) (:requirements :adl)
           (:types t)
           (:predicates (p ?x - t) (q ?x - t))
           (:action a :parameters (?x - t)
             :precondition (or (p ?x) (exists (?y - t) (q ?y)))
             :effect (when (imply (p ?x) (q ?x)) (not (p ?x)))))
         (define (problem e) (:domain d) (:objects o - t)
           (:init (p o))
           (:goal (or (p o) (q o))))",
    );
    let problem = description.problem.as_ref().unwrap();
    let ids: Vec<_> = description
        .domain
        .derived_predicates
        .iter()
        .chain(&problem.derived_predicates)
        .map(|declaration| declaration.id)
        .collect();
    assert!(ids.len() >= 4);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids[0], 1);

    for literal in &problem.initial_state {
        assert!(matches!(literal, Literal::Atomic(AtomicFormula::Predicate(_))));
    }
}

#[test]
fn normalized_output_is_printed_as_pddl() {
    let printed = normalize_sources(
        &sources(&[(
            "domain.pddl",
            "(define (domain d) (:requirements :disjunctive-preconditions)
               (:predicates (p) (q))
               (:action a :precondition (or (p) (q)) :effect (p)))",
        )]),
        &Options::default(),
    )
    .unwrap();
    assert!(printed.contains("(:derived (derived-predicate-1)"));
    assert!(printed.contains(":precondition\n\t\t\t(derived-predicate-1)"));
}

#[test]
fn normalized_output_normalizes_to_itself() {
    let options = Options::default();
    let first = normalize_sources(
        &sources(&[("domain.pddl", BLOCKS_DOMAIN), ("problem.pddl", BLOCKS_PROBLEM)]),
        &options,
    )
    .unwrap();
    assert!(!first.contains(":derived"));

    check_syntax(&sources(&[("normalized.pddl", &first)]), &options).unwrap();
    let second = normalize_sources(&sources(&[("normalized.pddl", &first)]), &options).unwrap();
    assert_eq!(second, first);
}

// ──────────────────────────────────────────────
// Beautify
// ──────────────────────────────────────────────

#[test]
fn beautified_output_beautifies_to_itself() {
    let options = Options::default();
    let problem = "(define (problem empty) (:domain blocks) (:objects a - block) (:init) (:goal (clear a)))";
    let first = beautify_sources(
        &sources(&[("domain.pddl", BLOCKS_DOMAIN), ("problem.pddl", problem)]),
        &options,
    )
    .unwrap();
    assert!(first.contains("(:init)"));

    check_syntax(&sources(&[("beautified.pddl", &first)]), &options).unwrap();
    let second = beautify_sources(&sources(&[("beautified.pddl", &first)]), &options).unwrap();
    assert_eq!(second, first);
}

// ──────────────────────────────────────────────
// Parsing
// ──────────────────────────────────────────────

#[test]
fn either_typed_arguments_match_on_any_member() {
    let domain = "(define (domain d) (:requirements :typing) (:types a b c)
                    (:constants k - (either a b) m - (either b c))
                    (:predicates (p ?x - a))
                    (:action act :parameters (?v - (either c a))
                      :precondition (and (p k) (p ?v)) :effect (p k)))";
    check_syntax(&sources(&[("domain.pddl", domain)]), &Options::default()).unwrap();

    let disjoint = domain.replace("(p ?v)", "(p m)");
    let error = check_syntax(&sources(&[("domain.pddl", &disjoint)]), &Options::default()).unwrap_err();
    assert_eq!(error.message(), "no matching declaration found for predicate “p”");

    let error = translate_sources(&sources(&[("domain.pddl", domain)]), &Options::default()).unwrap_err();
    assert_eq!(error.message(), "only primitive types supported currently");
}


#[test]
fn universal_preconditions_need_their_requirement() {
    let error = check_syntax(
        &sources(&[(
            "domain.pddl",
            "(define (domain d) (:requirements :typing) (:types t)
               (:predicates (p ?x - t))
               (:action a :parameters (?y - t)
                 :precondition (forall (?x - t) (p ?x)) :effect (p ?y)))",
        )]),
        &Options::default(),
    )
    .unwrap_err();
    assert!(error.is_syntax_error());
    assert!(error.message().contains("universal-preconditions"));
}

#[test]
fn compatibility_mode_adds_missing_requirements() {
    let options = Options {
        parsing_mode: Mode::Compatibility,
        ..Options::default()
    };
    check_syntax(
        &sources(&[(
            "domain.pddl",
            "(define (domain d) (:requirements :typing) (:types t)
               (:predicates (p ?x - t))
               (:action a :precondition (forall (?x - t) (p ?x)) :effect (and)))",
        )]),
        &options,
    )
    .unwrap();
}

#[test]
fn untyped_object_arguments_match_by_arity() {
    let domain = "(define (domain d) (:requirements :typing)
                    (:predicates (at ?x - object ?y - object)))";
    let matching = "(define (problem p) (:domain d) (:objects ball1 room2) (:init (at ball1 room2))
                    (:goal (at ball1 room2)))";
    check_syntax(&sources(&[("d.pddl", domain), ("p.pddl", matching)]), &Options::default()).unwrap();

    let mismatching =
        "(define (problem p) (:domain d) (:objects ball1 room2) (:init (at ball1 room2 room2))
          (:goal (at ball1 room2)))";
    let error =
        check_syntax(&sources(&[("d.pddl", domain), ("p.pddl", mismatching)]), &Options::default())
            .unwrap_err();
    assert!(error.message().contains("arity mismatch"));
    assert_eq!(error.location().unwrap().section, "p.pddl");
}
