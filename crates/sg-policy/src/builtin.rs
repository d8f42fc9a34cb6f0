// builtin.rs — Ready-made filters.
//
// By default every filter here abstains on anything it does not match, so
// several of them can be stacked in one registry and the order decides
// precedence. `otherwise(..)` changes what a filter says about non-matching
// types; `deny(..).otherwise(Allow)` is the classic "hide these, expose the
// rest" filter and is decisive for every type on its own.
//
// Only `SubtypeFilter` looks at the hierarchy. The others match the exact
// name they are given; denying a type does not deny its subclasses unless a
// filter says so.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use glob::Pattern;
use sg_types::{HierarchyResolver, TypeName};

use crate::error::PolicyError;
use crate::filter::{FilterAction, FilterDecision, TypeFilter};

/// Exact-match allow-list or deny-list.
#[derive(Debug, Clone)]
pub struct TypeListFilter {
    name: String,
    action: FilterAction,
    otherwise: FilterDecision,
    types: HashSet<TypeName>,
}

impl TypeListFilter {
    pub fn new(
        name: impl Into<String>,
        action: FilterAction,
        types: impl IntoIterator<Item = impl Into<TypeName>>,
    ) -> Self {
        Self {
            name: name.into(),
            action,
            otherwise: FilterDecision::Abstain,
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Decision for types not on the list (default: abstain).
    pub fn otherwise(mut self, decision: FilterDecision) -> Self {
        self.otherwise = decision;
        self
    }

    /// Deny exactly the listed types.
    pub fn deny(
        name: impl Into<String>,
        types: impl IntoIterator<Item = impl Into<TypeName>>,
    ) -> Self {
        Self::new(name, FilterAction::Deny, types)
    }

    /// Allow exactly the listed types.
    pub fn allow(
        name: impl Into<String>,
        types: impl IntoIterator<Item = impl Into<TypeName>>,
    ) -> Self {
        Self::new(name, FilterAction::Allow, types)
    }
}

impl TypeFilter for TypeListFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, type_name: &TypeName) -> FilterDecision {
        if self.types.contains(type_name) {
            self.action.into()
        } else {
            self.otherwise
        }
    }
}

/// Glob patterns over type names, e.g. `com.acme.internal.*`.
///
/// `*` matches any run of characters, dots included.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    name: String,
    action: FilterAction,
    otherwise: FilterDecision,
    patterns: Vec<Pattern>,
}

impl PatternFilter {
    /// Compile `patterns`. Any malformed pattern rejects the whole filter.
    pub fn new(
        name: impl Into<String>,
        action: FilterAction,
        patterns: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, PolicyError> {
        let patterns = patterns
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Pattern::new(raw).map_err(|e| PolicyError::InvalidPattern {
                    pattern: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.into(),
            action,
            otherwise: FilterDecision::Abstain,
            patterns,
        })
    }

    /// Decision for names no pattern matches (default: abstain).
    pub fn otherwise(mut self, decision: FilterDecision) -> Self {
        self.otherwise = decision;
        self
    }

    /// The compiled patterns as written.
    pub fn raw_patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::as_str).collect()
    }
}

impl TypeFilter for PatternFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, type_name: &TypeName) -> FilterDecision {
        if self.patterns.iter().any(|p| p.matches(type_name.as_str())) {
            self.action.into()
        } else {
            self.otherwise
        }
    }
}

/// Matches the listed types and every type descending from them.
///
/// This is the opt-in cascade: use it when denying a type should also deny
/// all of its current and future subclasses.
pub struct SubtypeFilter {
    name: String,
    action: FilterAction,
    otherwise: FilterDecision,
    roots: Vec<TypeName>,
    resolver: Arc<dyn HierarchyResolver>,
}

impl SubtypeFilter {
    pub fn new(
        name: impl Into<String>,
        action: FilterAction,
        roots: impl IntoIterator<Item = impl Into<TypeName>>,
        resolver: Arc<dyn HierarchyResolver>,
    ) -> Self {
        Self {
            name: name.into(),
            action,
            otherwise: FilterDecision::Abstain,
            roots: roots.into_iter().map(Into::into).collect(),
            resolver,
        }
    }

    /// Decision for types outside every listed family (default: abstain).
    pub fn otherwise(mut self, decision: FilterDecision) -> Self {
        self.otherwise = decision;
        self
    }
}

impl TypeFilter for SubtypeFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, type_name: &TypeName) -> FilterDecision {
        if self
            .roots
            .iter()
            .any(|root| self.resolver.is_ancestor_of(root, type_name))
        {
            self.action.into()
        } else {
            self.otherwise
        }
    }
}

impl fmt::Debug for SubtypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtypeFilter")
            .field("name", &self.name)
            .field("action", &self.action)
            .field("otherwise", &self.otherwise)
            .field("roots", &self.roots)
            .finish()
    }
}
