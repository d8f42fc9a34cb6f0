// verdict.rs — The outcome of a single access check.

use serde::{Deserialize, Serialize};
use sg_types::TypeName;

/// Allow or deny; there is no third outcome at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Deny,
}

/// Why a verdict came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum VerdictBasis {
    /// A registered filter returned Allow or Deny.
    Filter { name: String, index: usize },
    /// Every filter abstained, or the registry was empty: fail closed.
    Exhausted,
    /// No filtering is configured, so everything is allowed.
    Unfiltered,
}

/// Immutable result of one gate or registry check.
///
/// `type_name` is the type that was actually evaluated. For object-bound
/// checks this is the object's exact runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessVerdict {
    verdict: Verdict,
    type_name: TypeName,
    basis: VerdictBasis,
}

impl AccessVerdict {
    pub(crate) fn decided(
        verdict: Verdict,
        type_name: TypeName,
        filter: &str,
        index: usize,
    ) -> Self {
        Self {
            verdict,
            type_name,
            basis: VerdictBasis::Filter {
                name: filter.to_string(),
                index,
            },
        }
    }

    pub(crate) fn exhausted(type_name: TypeName) -> Self {
        Self {
            verdict: Verdict::Deny,
            type_name,
            basis: VerdictBasis::Exhausted,
        }
    }

    /// An Allow issued because no filtering is configured.
    pub fn unfiltered(type_name: TypeName) -> Self {
        Self {
            verdict: Verdict::Allow,
            type_name,
            basis: VerdictBasis::Unfiltered,
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn basis(&self) -> &VerdictBasis {
        &self.basis
    }

    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }

    pub fn is_denied(&self) -> bool {
        self.verdict == Verdict::Deny
    }
}
