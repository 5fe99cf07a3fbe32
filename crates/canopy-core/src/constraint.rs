//! Constraint: an immutable premise/condition pair with a penalty and a
//! boost, plus the catalogue-level schema validation external catalogues
//! must pass (§6).

use crate::error::CoreError;
use crate::predicate::{Capabilities, EvalContext, PairPredicate, UnaryPredicate};
use crate::token::TokenId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// The shape of a constraint's premise/condition: unary (single-token) or
/// binary (dependent/governor pair). A constraint is binary iff its
/// premise or condition carries `dependent`/`governor` sub-fields (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintBody {
    Unary {
        premise: UnaryPredicate,
        condition: UnaryPredicate,
    },
    Binary {
        premise: PairPredicate,
        condition: PairPredicate,
    },
}

impl ConstraintBody {
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, ConstraintBody::Binary { .. })
    }

    #[must_use]
    fn capabilities(&self) -> Capabilities {
        match self {
            ConstraintBody::Unary { premise, condition } => {
                premise.capabilities().union(condition.capabilities())
            }
            ConstraintBody::Binary { premise, condition } => {
                premise.capabilities().union(condition.capabilities())
            }
        }
    }
}

/// An immutable linguistic constraint (§3). `description` is the identity
/// used for equality/hashing — two constraints with the same description
/// are the same constraint regardless of other fields, matching the
/// source catalogue's use of description as a natural key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub description: String,
    pub penalty: f64,
    pub boost: f64,
    pub body: ConstraintBody,
    #[serde(skip)]
    capabilities: Capabilities,
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}
impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description.hash(state);
    }
}

impl Constraint {
    /// # Errors
    /// Returns [`CoreError::Schema`] if both `penalty` and `boost` are
    /// 1.0 (§6: "both `penalty == 1` and `boost == 1`" is an error — a
    /// constraint with no effect at all is not meaningful).
    pub fn new(
        description: impl Into<String>,
        penalty: f64,
        boost: f64,
        body: ConstraintBody,
    ) -> Result<Self, CoreError> {
        if (penalty - 1.0).abs() < f64::EPSILON && (boost - 1.0).abs() < f64::EPSILON {
            return Err(CoreError::Schema {
                field: "penalty/boost".to_string(),
                reason: "a constraint with penalty == 1.0 and boost == 1.0 has no effect".to_string(),
            });
        }
        let capabilities = body.capabilities();
        Ok(Self {
            description: description.into(),
            penalty,
            boost,
            body,
            capabilities,
        })
    }

    #[must_use]
    pub fn is_hard(&self) -> bool {
        self.penalty == 0.0
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.body.is_binary()
    }

    /// Verified iff `¬premise ∨ condition` (§3/§4.1). For a binary
    /// constraint this is evaluated over `(dependent_id, governor_id)`;
    /// for a unary constraint `governor_id` is ignored.
    #[must_use]
    pub fn is_verified(
        &self,
        dependent_id: TokenId,
        governor_id: Option<TokenId>,
        ctx: &EvalContext,
    ) -> bool {
        match &self.body {
            ConstraintBody::Unary { premise, condition } => {
                !premise.eval(dependent_id, ctx) || condition.eval(dependent_id, ctx)
            }
            ConstraintBody::Binary { premise, condition } => {
                !premise.eval(dependent_id, governor_id, ctx)
                    || condition.eval(dependent_id, governor_id, ctx)
            }
        }
    }
}
