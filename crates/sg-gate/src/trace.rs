// trace.rs — Observable record of one gate check.
//
// A trace carries the same verdict the plain check would return, plus the
// filters consulted on the way there. The ancestor chain is included for
// the reader's benefit only; it is never consulted for the decision.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sg_policy::{AccessVerdict, FilterStep};
use sg_types::TypeName;

/// Which integration point asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckChannel {
    /// Method call / property get / property set on a live object.
    Instance,
    /// Type lookup by name followed by instantiation.
    TypeResolution,
}

impl fmt::Display for CheckChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckChannel::Instance => write!(f, "instance"),
            CheckChannel::TypeResolution => write!(f, "type_resolution"),
        }
    }
}

/// Full record of a gate check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateTrace {
    pub channel: CheckChannel,
    /// The final verdict, identical to the untraced check.
    pub verdict: AccessVerdict,
    /// Filters consulted, in order, up to and including the decisive one.
    pub steps: Vec<FilterStep>,
    /// Ancestor chain of the evaluated type (most derived first).
    pub ancestors: Vec<TypeName>,
    pub checked_at: DateTime<Utc>,
}
