//! End-to-end tests driving the `canopy` binary's public entry point
//! (`run_cli_with_args`) against temp-file JSON fixtures, exercising the
//! `validate` and `solve` subcommands the way a real invocation would.

use canopy_cli::run_cli_with_args;
use canopy_core::config::{ConfigComponent, Direction, GrammaticalConfiguration, SyntacticDependency};
use canopy_core::pos::{BasePos, Pos};
use canopy_core::token::Position;
use canopy_core::{DependencyTree, Sentence, SyntacticRelation, Token};
use std::io::Write;
use std::path::PathBuf;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("canopy-cli-integration-{}-{}", std::process::id(), name));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn write_json(name: &str, value: &impl serde::Serialize) -> PathBuf {
    write_temp(name, &serde_json::to_string(value).unwrap())
}

fn one_token_sentence() -> Sentence {
    let mut token = Token::new(1, "dog", Position { index: 0, char_start: 0, char_end: 3 });
    token.relation = Some(SyntacticRelation::root("root", 1.0));
    Sentence::new(vec![token])
}

fn one_token_tree() -> DependencyTree {
    let mut tree = DependencyTree::new();
    tree.set_arc(1, None, "root", 1.0).unwrap();
    tree
}

#[test]
fn validate_reports_no_violations_for_an_empty_catalogue() {
    let sentence_path = write_json("sentence.json", &one_token_sentence());
    let tree_path = write_json("tree.json", &one_token_tree());
    let catalogue_path = write_temp("catalogue.json", "[]");

    let result = run_cli_with_args(vec![
        "canopy".to_string(),
        "validate".to_string(),
        "--sentence".to_string(),
        sentence_path.display().to_string(),
        "--tree".to_string(),
        tree_path.display().to_string(),
        "--catalogue".to_string(),
        catalogue_path.display().to_string(),
    ]);
    assert!(result.is_ok(), "{result:?}");

    let _ = std::fs::remove_file(sentence_path);
    let _ = std::fs::remove_file(tree_path);
    let _ = std::fs::remove_file(catalogue_path);
}

#[test]
fn validate_rejects_missing_catalogue_file() {
    let sentence_path = write_json("sentence2.json", &one_token_sentence());
    let tree_path = write_json("tree2.json", &one_token_tree());

    let result = run_cli_with_args(vec![
        "canopy".to_string(),
        "validate".to_string(),
        "--sentence".to_string(),
        sentence_path.display().to_string(),
        "--tree".to_string(),
        tree_path.display().to_string(),
        "--catalogue".to_string(),
        "/nonexistent/catalogue.json".to_string(),
    ]);
    assert!(result.is_err());

    let _ = std::fs::remove_file(sentence_path);
    let _ = std::fs::remove_file(tree_path);
}

#[test]
fn solve_builds_a_tree_from_an_arc_matrix_and_label_scores() {
    let sentence_path = write_json("sentence3.json", &one_token_sentence());
    let catalogue_path = write_temp("catalogue3.json", "[]");
    let arc_matrix_path = write_temp("arcs3.json", r#"{"1": {"-1": 1.0}}"#);
    let config = GrammaticalConfiguration::new(vec![ConfigComponent::new(
        Pos::new(BasePos::Noun),
        SyntacticDependency::new("root", Direction::Root),
    )]);
    let label_scores_path = write_json("labels3.json", &serde_json::json!({ "1": [ { "config": config, "score": 1.0 } ] }));

    let result = run_cli_with_args(vec![
        "canopy".to_string(),
        "solve".to_string(),
        "--sentence".to_string(),
        sentence_path.display().to_string(),
        "--catalogue".to_string(),
        catalogue_path.display().to_string(),
        "--arc-matrix".to_string(),
        arc_matrix_path.display().to_string(),
        "--label-scores".to_string(),
        label_scores_path.display().to_string(),
    ]);
    assert!(result.is_ok(), "{result:?}");

    let _ = std::fs::remove_file(sentence_path);
    let _ = std::fs::remove_file(catalogue_path);
    let _ = std::fs::remove_file(arc_matrix_path);
    let _ = std::fs::remove_file(label_scores_path);
}

#[test]
fn solve_requires_either_tree_or_arc_matrix() {
    let sentence_path = write_json("sentence4.json", &one_token_sentence());
    let catalogue_path = write_temp("catalogue4.json", "[]");
    let label_scores_path = write_temp("labels4.json", "{}");

    let result = run_cli_with_args(vec![
        "canopy".to_string(),
        "solve".to_string(),
        "--sentence".to_string(),
        sentence_path.display().to_string(),
        "--catalogue".to_string(),
        catalogue_path.display().to_string(),
        "--label-scores".to_string(),
        label_scores_path.display().to_string(),
    ]);
    assert!(result.is_err());

    let _ = std::fs::remove_file(sentence_path);
    let _ = std::fs::remove_file(catalogue_path);
    let _ = std::fs::remove_file(label_scores_path);
}
