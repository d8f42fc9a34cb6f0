// filter.rs — The single-type policy unit.
//
// A filter is a pure function of a type name. It must not block, must not
// mutate shared state, and must give the same answer for the same name no
// matter which channel (object-bound or name-bound) asked. The registry
// does not enforce any of this; a filter that breaks the contract is a
// caller bug.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sg_types::TypeName;

/// What one filter says about one type name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDecision {
    /// The type may be reflectively exposed.
    Allow,
    /// The type must not be reflectively exposed.
    Deny,
    /// No opinion; ask the next filter.
    #[default]
    Abstain,
}

/// The decision a configured filter produces when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    Allow,
    Deny,
}

impl From<FilterAction> for FilterDecision {
    fn from(action: FilterAction) -> Self {
        match action {
            FilterAction::Allow => FilterDecision::Allow,
            FilterAction::Deny => FilterDecision::Deny,
        }
    }
}

impl fmt::Display for FilterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterAction::Allow => write!(f, "allow"),
            FilterAction::Deny => write!(f, "deny"),
        }
    }
}

/// A named policy unit deciding Allow / Deny / Abstain for a type name.
pub trait TypeFilter: Send + Sync {
    /// Human-readable name, used in logs and traces.
    fn name(&self) -> &str;

    /// Decide for the exact type name given. No hierarchy is implied.
    fn decide(&self, type_name: &TypeName) -> FilterDecision;
}

/// Shared handle to a registered filter.
///
/// Registration and deregistration are by handle identity, so keep the
/// `Arc` you registered if you want to remove it later.
pub type FilterRef = Arc<dyn TypeFilter>;

/// A filter backed by a closure.
pub struct FnFilter<F> {
    name: String,
    decide: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&TypeName) -> FilterDecision + Send + Sync,
{
    pub fn new(name: impl Into<String>, decide: F) -> Self {
        Self {
            name: name.into(),
            decide,
        }
    }
}

impl<F> TypeFilter for FnFilter<F>
where
    F: Fn(&TypeName) -> FilterDecision + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, type_name: &TypeName) -> FilterDecision {
        (self.decide)(type_name)
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}
