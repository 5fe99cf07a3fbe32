//! Constraint catalogue parsing (§6): turns a sequence of loosely-typed
//! JSON records into validated [`Constraint`]s, surfacing each schema
//! violation named in §6/§7 as its own error kind.

use crate::error::{ConstraintError, ConstraintResult};
use canopy_core::{Constraint, ConstraintBody, PairPredicate, UnaryPredicate};
use serde_json::Value;

const PAIR_FIELDS: &[&str] = &["dependent", "governor"];

fn is_pair_shaped(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.keys().any(|k| PAIR_FIELDS.contains(&k.as_str())))
}

fn has_forbidden_extra_fields(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.keys().any(|k| !PAIR_FIELDS.contains(&k.as_str())))
}

/// Parses every record in `records` into a [`Constraint`], in order.
/// Fails on the first invalid record (§7: schema errors are non-recoverable
/// for the affected catalogue).
pub fn parse_catalogue(records: &[Value]) -> ConstraintResult<Vec<Constraint>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, value: &Value) -> ConstraintResult<Constraint> {
    let obj = value
        .as_object()
        .ok_or(ConstraintError::MissingField { index, field: "description" })?;

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .ok_or(ConstraintError::MissingField { index, field: "description" })?
        .to_string();

    let premise = obj
        .get("premise")
        .ok_or(ConstraintError::MissingField { index, field: "premise" })?;
    let condition = obj
        .get("condition")
        .ok_or(ConstraintError::MissingField { index, field: "condition" })?;

    let penalty = obj.get("penalty").and_then(Value::as_f64).unwrap_or(1.0);
    let boost = obj.get("boost").and_then(Value::as_f64).unwrap_or(1.0);

    let is_binary = is_pair_shaped(premise) || is_pair_shaped(condition);

    let body = if is_binary {
        for (side, side_value) in [("premise", premise), ("condition", condition)] {
            if has_forbidden_extra_fields(side_value) {
                return Err(ConstraintError::ForbiddenExtraFields {
                    index,
                    description,
                    side,
                });
            }
        }
        let premise = parse_side::<PairPredicate>(index, &description, premise)?;
        let condition = parse_side::<PairPredicate>(index, &description, condition)?;
        ConstraintBody::Binary { premise, condition }
    } else {
        let premise = parse_side::<UnaryPredicate>(index, &description, premise)?;
        let condition = parse_side::<UnaryPredicate>(index, &description, condition)?;
        ConstraintBody::Unary { premise, condition }
    };

    Constraint::new(description, penalty, boost, body).map_err(ConstraintError::from)
}

fn parse_side<T: serde::de::DeserializeOwned>(
    index: usize,
    description: &str,
    value: &Value,
) -> ConstraintResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| ConstraintError::Schema {
        index,
        description: description.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_unary_record() {
        let records = vec![json!({
            "description": "noun-has-number",
            "penalty": 0.0,
            "premise": { "op": "HasBasePos", "pos": "Noun" },
            "condition": { "op": "HasFeature", "name": "Number" }
        })];
        let parsed = parse_catalogue(&records).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(!parsed[0].is_binary());
        assert!(parsed[0].is_hard());
    }

    #[test]
    fn parses_a_binary_record() {
        let records = vec![json!({
            "description": "noun-dependent-of-verb",
            "penalty": 0.5,
            "premise": { "dependent": { "op": "HasBasePos", "pos": "Noun" } },
            "condition": { "governor": { "op": "HasBasePos", "pos": "Verb" } }
        })];
        let parsed = parse_catalogue(&records).unwrap();
        assert!(parsed[0].is_binary());
    }

    #[test]
    fn rejects_missing_description() {
        let records = vec![json!({
            "premise": { "op": "True" },
            "condition": { "op": "True" }
        })];
        let err = parse_catalogue(&records).unwrap_err();
        assert!(matches!(
            err,
            ConstraintError::MissingField { field: "description", .. }
        ));
    }

    #[test]
    fn rejects_mixed_pair_and_plain_fields() {
        let records = vec![json!({
            "description": "bad",
            "premise": { "dependent": { "op": "True" }, "op": "True" },
            "condition": { "op": "True" }
        })];
        let err = parse_catalogue(&records).unwrap_err();
        assert!(matches!(err, ConstraintError::ForbiddenExtraFields { .. }));
    }

    #[test]
    fn rejects_no_op_constraint_via_core_error() {
        let records = vec![json!({
            "description": "no-op",
            "premise": { "op": "True" },
            "condition": { "op": "True" }
        })];
        let err = parse_catalogue(&records).unwrap_err();
        assert!(matches!(err, ConstraintError::Core(canopy_core::CoreError::Schema { .. })));
    }
}
