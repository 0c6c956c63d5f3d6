//! CLI integration tests for every subcommand.
//!
//! Uses `assert_cmd` to spawn the `pddlasp` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! Every test runs inside its own temporary directory so that a
//! `pddlasp.toml` is only picked up where a test writes one.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DOMAIN: &str = "
(define (domain blocks)
  (:requirements :strips :typing)
  (:types block)
  (:predicates (on ?x ?y - block) (clear ?x - block) (handempty) (holding ?x - block))
  (:action pick-up
    :parameters (?x - block)
    :precondition (and (clear ?x) (handempty))
    :effect (and (not (clear ?x)) (not (handempty)) (holding ?x))))
";

const PROBLEM: &str = "
(define (problem lift)
  (:domain blocks)
  (:objects a - block)
  (:init (clear a) (handempty))
  (:goal (holding a)))
";

/// A temporary working directory holding `domain.pddl` and `problem.pddl`.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("domain.pddl"), DOMAIN).unwrap();
    fs::write(tmp.path().join("problem.pddl"), PROBLEM).unwrap();
    tmp
}

/// Helper: create a Command for the `pddlasp` binary, rooted at `dir`.
fn pddlasp(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pddlasp");
    cmd.current_dir(dir.path());
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    let tmp = workspace();
    pddlasp(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("answer set programs"))
        .stdout(predicate::str::contains("check-syntax"));
}

#[test]
fn help_subcommand_describes_commands() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["help", "translate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Translate PDDL to ASP facts"));
}

#[test]
fn version_flag_and_subcommand() {
    let tmp = workspace();
    pddlasp(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pddlasp"));
    pddlasp(&tmp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pddlasp version "));
}

#[test]
fn missing_command_prints_help() {
    let tmp = workspace();
    pddlasp(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_option_is_a_usage_error() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["translate", "--parsing-mode", "lenient"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lenient"));
}

// ──────────────────────────────────────────────
// 2. Translate
// ──────────────────────────────────────────────

#[test]
fn translate_domain_and_problem() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["translate", "domain.pddl", "problem.pddl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("% domain"))
        .stdout(predicate::str::contains("variable(handempty)."))
        .stdout(predicate::str::contains(
            "action(action((pick_hup, X1))) :- has(X1, type(block)).",
        ))
        .stdout(predicate::str::contains(
            "goal(variable((holding, constant(a))), value((holding, constant(a)), true)).",
        ));
}

#[test]
fn translate_reads_stdin_without_files() {
    let tmp = workspace();
    pddlasp(&tmp)
        .arg("translate")
        .write_stdin(DOMAIN)
        .assert()
        .success()
        .stdout(predicate::str::contains("type(type(block))."))
        .stderr(predicate::str::contains("info: reading from stdin"))
        .stderr(predicate::str::contains("Usage").not());
}

#[test]
fn log_priority_hides_info_messages() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["-p", "warning", "translate"])
        .write_stdin(DOMAIN)
        .assert()
        .success()
        .stderr(predicate::str::contains("reading from stdin").not());
}

#[test]
fn translate_nonexistent_file_exits_1() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["translate", "missing.pddl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing.pddl"));
}

// ──────────────────────────────────────────────
// 3. Normalize, beautify, check-syntax
// ──────────────────────────────────────────────

#[test]
fn normalize_prints_derived_predicates() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("or.pddl"),
        "(define (domain d) (:requirements :disjunctive-preconditions)
           (:predicates (p) (q))
           (:action a :precondition (or (p) (q)) :effect (p)))",
    )
    .unwrap();
    pddlasp(&tmp)
        .args(["normalize", "or.pddl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(:derived (derived-predicate-1)"));
}

#[test]
fn beautify_prints_indented_pddl() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["beautify", "domain.pddl"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("(define (domain blocks)"))
        .stdout(predicate::str::contains("\t(:types\n\t\tblock)"));
}

#[test]
fn check_syntax_prints_nothing_on_success() {
    let tmp = workspace();
    pddlasp(&tmp)
        .args(["check-syntax", "domain.pddl", "problem.pddl"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 4. Diagnostics
// ──────────────────────────────────────────────

#[test]
fn syntax_errors_report_location_and_suggest_compatibility_mode() {
    let tmp = workspace();
    fs::write(tmp.path().join("bad.pddl"), "(define (domain d)\n  (:foo))").unwrap();
    pddlasp(&tmp)
        .args(["check-syntax", "bad.pddl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: bad.pddl:2:4 unknown domain section “:foo”",
        ))
        .stderr(predicate::str::contains("--parsing-mode=compatibility"));
}

#[test]
fn compatibility_mode_has_no_suggestion() {
    let tmp = workspace();
    fs::write(tmp.path().join("bad.pddl"), "(define (domain d)\n  (:foo))").unwrap();
    pddlasp(&tmp)
        .args(["--parsing-mode", "compatibility", "check-syntax", "bad.pddl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parsing-mode=compatibility").not());
}

#[test]
fn legacy_sections_need_compatibility_mode() {
    let tmp = workspace();
    let text = format!("(in-package :user)\n{}", DOMAIN);
    fs::write(tmp.path().join("legacy.pddl"), text).unwrap();

    pddlasp(&tmp)
        .args(["check-syntax", "legacy.pddl"])
        .assert()
        .failure();
    pddlasp(&tmp)
        .args(["--parsing-mode", "compatibility", "check-syntax", "legacy.pddl"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: "))
        .stderr(predicate::str::contains("ignoring section"));
    pddlasp(&tmp)
        .args([
            "--parsing-mode",
            "compatibility",
            "--warnings-as-errors",
            "check-syntax",
            "legacy.pddl",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn sas_input_is_unsupported() {
    let tmp = workspace();
    pddlasp(&tmp)
        .arg("translate")
        .write_stdin("begin_version\n3\nend_version\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("SAS input is not supported"))
        .stderr(predicate::str::contains("Usage").not());
}

#[test]
fn unknown_input_language() {
    let tmp = workspace();
    pddlasp(&tmp)
        .arg("translate")
        .write_stdin("hello world")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not detect input language"))
        .stderr(predicate::str::contains("Usage: pddlasp"));
}

#[test]
fn json_output_reports_error_kind_and_location() {
    let tmp = workspace();
    fs::write(tmp.path().join("bad.pddl"), "(define (domain d)\n  (:foo))").unwrap();
    let output = pddlasp(&tmp)
        .args(["--output", "json", "check-syntax", "bad.pddl"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    let start = stderr.find('{').unwrap();
    let end = stderr.rfind('}').unwrap();
    let value: serde_json::Value = serde_json::from_str(&stderr[start..=end]).unwrap();
    assert_eq!(value["kind"], "parser");
    assert_eq!(value["location"]["section"], "bad.pddl");
    assert_eq!(value["location"]["row_start"], 2);
}

// ──────────────────────────────────────────────
// 5. Configuration
// ──────────────────────────────────────────────

#[test]
fn config_file_in_working_directory_is_used() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("pddlasp.toml"),
        "[normalization]\nderived_predicate_prefix = \"dp-\"\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("or.pddl"),
        "(define (domain d) (:requirements :disjunctive-preconditions)
           (:predicates (p) (q))
           (:action a :precondition (or (p) (q)) :effect (p)))",
    )
    .unwrap();
    pddlasp(&tmp)
        .args(["normalize", "or.pddl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(:derived (dp-1)"));
}

#[test]
fn flags_override_the_config_file() {
    let tmp = workspace();
    fs::write(tmp.path().join("custom.toml"), "parsing_mode = \"compatibility\"\n").unwrap();
    let text = format!("(in-package :user)\n{}", DOMAIN);
    fs::write(tmp.path().join("legacy.pddl"), text).unwrap();

    pddlasp(&tmp)
        .args(["--config", "custom.toml", "check-syntax", "legacy.pddl"])
        .assert()
        .success();
    pddlasp(&tmp)
        .args([
            "--config",
            "custom.toml",
            "--parsing-mode",
            "strict",
            "check-syntax",
            "legacy.pddl",
        ])
        .assert()
        .failure();
}

#[test]
fn invalid_config_file_exits_1() {
    let tmp = workspace();
    fs::write(tmp.path().join("pddlasp.toml"), "parsing_mode = \"lenient\"\n").unwrap();
    pddlasp(&tmp)
        .args(["check-syntax", "domain.pddl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not parse 'pddlasp.toml'"));
}
