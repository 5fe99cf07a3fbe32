//! Command-line interface for canopy.
//!
//! Two subcommands over the JSON wire shapes of §6: `validate` runs the
//! sentence validator and reports the first group of violations (or that
//! none were found); `solve` builds a dependency tree from an arc matrix
//! (or loads a prebuilt one), runs the labels solver and the morphology
//! solver, and prints the resulting tree and per-token choices.

use crate::error::{CliError, CliResult};
use crate::stand_ins::{NoContextPercolator, PassthroughSelector};
use crate::wire::{parse_arc_matrix, parse_label_scores};
use canopy_constraints::validator::SentenceValidator;
use canopy_core::{Constraint, DependencyTree, Sentence, TokenId};
use canopy_solver::config::{SolverConfig, TreeStrategy};
use canopy_solver::selector::{LabelerSelector, ScoredConfig};
use canopy_solver::{cycle_fixer, DependencyTreeBuilder, LabelsSolver, MorphologySolver, ScoredArc};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Constraint solving over dependency-parser output", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a sentence against a constraint catalogue, reporting the
    /// first group of violations found (§4.2).
    Validate {
        /// Path to a JSON-encoded `Sentence`.
        #[arg(long)]
        sentence: PathBuf,
        /// Path to a JSON-encoded `DependencyTree`.
        #[arg(long)]
        tree: PathBuf,
        /// Path to a JSON array of constraint records (§6).
        #[arg(long)]
        catalogue: PathBuf,
    },

    /// Solve for a dependency tree, its labels, and per-token
    /// morphologies (§4.4-§4.7).
    Solve {
        /// Path to a JSON-encoded `Sentence`.
        #[arg(long)]
        sentence: PathBuf,
        /// Path to a JSON array of constraint records (§6).
        #[arg(long)]
        catalogue: PathBuf,
        /// Path to a JSON arc-score matrix (§6). Required unless
        /// `--tree` supplies an already-built tree.
        #[arg(long)]
        arc_matrix: Option<PathBuf>,
        /// Path to a prebuilt JSON-encoded `DependencyTree`, skipping
        /// tree construction entirely.
        #[arg(long)]
        tree: Option<PathBuf>,
        /// Path to a JSON per-token configuration-score table (§6).
        #[arg(long)]
        label_scores: PathBuf,
        /// Path to a JSON-encoded `SolverConfig`. Defaults to
        /// `SolverConfig::default()` if omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn read_json(path: &Path) -> CliResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn read_typed<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let value = read_json(path)?;
    serde_json::from_value(value).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Dispatches a parsed [`Cli`] invocation. Kept separate from argument
/// parsing so tests can build a [`Commands`] value directly.
pub fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Validate { sentence, tree, catalogue } => run_validate(&sentence, &tree, &catalogue),
        Commands::Solve { sentence, catalogue, arc_matrix, tree, label_scores, config } => {
            run_solve(&sentence, &catalogue, arc_matrix.as_deref(), tree.as_deref(), &label_scores, config.as_deref())
        }
    }
}

fn load_catalogue(path: &Path) -> CliResult<Vec<canopy_core::Constraint>> {
    let value = read_json(path)?;
    let records = value
        .as_array()
        .ok_or_else(|| CliError::Wire(format!("'{}' must contain a JSON array of constraint records", path.display())))?;
    Ok(canopy_constraints::parse_catalogue(records)?)
}

fn run_validate(sentence_path: &Path, tree_path: &Path, catalogue_path: &Path) -> CliResult<()> {
    let mut sentence: Sentence = read_typed(sentence_path)?;
    let mut tree: DependencyTree = read_typed(tree_path)?;
    let catalogue = load_catalogue(catalogue_path)?;

    let validator = SentenceValidator::new(&catalogue);
    match validator.validate(&mut sentence, &mut tree, &NoContextPercolator) {
        None => {
            println!("valid: no violations across any of the six constraint groups");
        }
        Some((step, violations)) => {
            println!("invalid at group {step:?}:");
            for (token_id, violated) in &violations {
                let descriptions: Vec<&str> = violated.iter().map(|c| c.description.as_str()).collect();
                println!("  token {token_id}: {}", descriptions.join(", "));
            }
        }
    }
    Ok(())
}

/// Builds the tree for the configured strategy. Both branches run the
/// labels solver before returning, so every tree this produces already
/// carries real labels (§4.4, §4.5) — callers never need a second pass.
#[allow(clippy::too_many_arguments)]
fn build_tree(
    config: &SolverConfig,
    arc_matrix: &HashMap<TokenId, Vec<ScoredArc>>,
    sentence: &mut Sentence,
    catalogue: &[Constraint],
    scored_configs: &HashMap<TokenId, Vec<ScoredConfig>>,
    selector: &dyn LabelerSelector,
) -> CliResult<DependencyTree> {
    match config.tree_strategy {
        TreeStrategy::Beam => {
            let builder = DependencyTreeBuilder::new(config.beam_width, config.fork_width, config.max_iterations);
            builder
                .build(arc_matrix, sentence, catalogue, scored_configs, selector)
                .ok_or(CliError::TreeBuildFailed)
        }
        TreeStrategy::GreedyWithCycleFixer => {
            let mut tree = DependencyTree::new();
            for (&dependent, candidates) in arc_matrix {
                if let Some(&(governor, score)) = candidates.iter().max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)) {
                    let governor = if governor == canopy_core::ROOT_ID { None } else { Some(governor) };
                    tree.set_arc(dependent, governor, "dep", score)?;
                }
            }
            cycle_fixer::fix_cycles(&mut tree, arc_matrix);
            LabelsSolver::new(catalogue).solve(
                sentence,
                &mut tree,
                selector,
                scored_configs,
                config.beam_width,
                config.fork_width,
                config.max_iterations,
            );
            Ok(tree)
        }
    }
}

fn ensure_label_scores_cover(scored_configs: &HashMap<TokenId, Vec<ScoredConfig>>, ids: impl Iterator<Item = TokenId>) -> CliResult<()> {
    for token_id in ids {
        if scored_configs.get(&token_id).is_none_or(Vec::is_empty) {
            return Err(CliError::Wire(format!(
                "no candidate grammatical configuration supplied for token {token_id}"
            )));
        }
    }
    Ok(())
}

fn run_solve(
    sentence_path: &Path,
    catalogue_path: &Path,
    arc_matrix_path: Option<&Path>,
    tree_path: Option<&Path>,
    label_scores_path: &Path,
    config_path: Option<&Path>,
) -> CliResult<()> {
    let mut sentence: Sentence = read_typed(sentence_path)?;
    let catalogue = load_catalogue(catalogue_path)?;
    let config: SolverConfig = match config_path {
        Some(path) => read_typed(path)?,
        None => SolverConfig::default(),
    };
    let label_scores_json = read_json(label_scores_path)?;
    let scored_configs = parse_label_scores(&label_scores_json)?;

    let mut tree = match tree_path {
        Some(path) => {
            let mut tree: DependencyTree = read_typed(path)?;
            ensure_label_scores_cover(&scored_configs, tree.ids().into_iter())?;
            LabelsSolver::new(&catalogue).solve(
                &mut sentence,
                &mut tree,
                &PassthroughSelector,
                &scored_configs,
                config.beam_width,
                config.fork_width,
                config.max_iterations,
            );
            tree
        }
        None => {
            let arc_matrix_path = arc_matrix_path
                .ok_or_else(|| CliError::Wire("either --tree or --arc-matrix is required".to_string()))?;
            let arc_matrix_json = read_json(arc_matrix_path)?;
            let arc_matrix = parse_arc_matrix(&arc_matrix_json)?;
            ensure_label_scores_cover(&scored_configs, arc_matrix.keys().copied())?;
            build_tree(&config, &arc_matrix, &mut sentence, &catalogue, &scored_configs, &PassthroughSelector)?
        }
    };

    let morphology_solver = MorphologySolver::new(&catalogue);
    let morphologies = morphology_solver.solve(&mut sentence, &tree);

    info!(score = tree.score, "solve finished");
    println!("tree score: {}", tree.score);
    for token_id in sentence.ids() {
        let arc = tree.arc(token_id);
        let governor = arc.and_then(|a| a.governor).map_or("ROOT".to_string(), |g| g.to_string());
        let label = arc.map(|a| a.label.as_str()).unwrap_or("?");
        println!("  token {token_id}: governor={governor} label={label}");
        if let Some(candidates) = morphologies.get(&token_id) {
            println!("    {} surviving morphologies", candidates.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_rejects_unknown_subcommand_before_dispatch() {
        // Argument parsing itself (clap) is exercised end-to-end in
        // tests/cli_integration.rs via run_cli_with_args; this just
        // guards the run() dispatch match stays exhaustive as
        // subcommands are added.
        let result = load_catalogue(Path::new("/nonexistent/catalogue.json"));
        assert!(result.is_err());
    }
}
