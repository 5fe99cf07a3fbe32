//! JSON wire shapes for the demonstration CLI (§6): the arc matrix and
//! configuration-score table the `solve` subcommand reads alongside the
//! sentence and catalogue. Field names mirror the External Interfaces
//! section one-to-one; this module is purely a serialization concern.

use crate::error::{CliError, CliResult};
use canopy_core::config::GrammaticalConfiguration;
use canopy_core::{TokenId, ROOT_ID};
use canopy_solver::ScoredArc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

fn parse_token_key(key: &str) -> CliResult<TokenId> {
    if key == "-1" {
        return Ok(ROOT_ID);
    }
    key.parse::<TokenId>()
        .map_err(|_| CliError::Wire(format!("'{key}' is not a valid token id")))
}

/// Parses `{ dependent_id: { governor_id: score, ... }, ... }`, with
/// `"-1"` as the root-sentinel governor key, into the arc matrix the
/// dependency-tree builder and cycle fixer consume.
pub fn parse_arc_matrix(value: &Value) -> CliResult<HashMap<TokenId, Vec<ScoredArc>>> {
    let obj = value
        .as_object()
        .ok_or_else(|| CliError::Wire("arc matrix must be a JSON object".to_string()))?;

    let mut matrix = HashMap::with_capacity(obj.len());
    for (dependent_key, governors) in obj {
        let dependent_id = parse_token_key(dependent_key)?;
        let governors = governors
            .as_object()
            .ok_or_else(|| CliError::Wire(format!("arc matrix entry for '{dependent_key}' must be an object")))?;

        let mut arcs = Vec::with_capacity(governors.len());
        for (governor_key, score) in governors {
            let governor_id = parse_token_key(governor_key)?;
            let score = score
                .as_f64()
                .ok_or_else(|| CliError::Wire(format!("score for {dependent_key} -> {governor_key} must be a number")))?;
            arcs.push((governor_id, score));
        }
        matrix.insert(dependent_id, arcs);
    }
    Ok(matrix)
}

#[derive(Deserialize)]
struct ScoredConfigWire {
    config: GrammaticalConfiguration,
    score: f64,
}

/// Parses `{ token_id: [ { "config": <GrammaticalConfiguration>, "score":
/// f64 }, ... ], ... }` into the per-token candidate-configuration table
/// the labels solver consumes.
pub fn parse_label_scores(value: &Value) -> CliResult<HashMap<TokenId, Vec<(GrammaticalConfiguration, f64)>>> {
    let obj = value
        .as_object()
        .ok_or_else(|| CliError::Wire("label score table must be a JSON object".to_string()))?;

    let mut table = HashMap::with_capacity(obj.len());
    for (token_key, candidates) in obj {
        let token_id = parse_token_key(token_key)?;
        let wire: Vec<ScoredConfigWire> = serde_json::from_value(candidates.clone())
            .map_err(|e| CliError::Wire(format!("label scores for token {token_key}: {e}")))?;
        table.insert(token_id, wire.into_iter().map(|w| (w.config, w.score)).collect());
    }
    Ok(table)
}
