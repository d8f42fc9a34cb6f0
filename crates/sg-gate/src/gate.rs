// gate.rs — The access gate.
//
// The single surface the template engine calls before reflection. Every
// check:
//
// 1. Resolves the type to evaluate (the object's exact runtime type, or the
//    requested name as given).
// 2. Takes one snapshot of the filter registry.
// 3. Empty snapshot → Allow (no policy configured means no filtering).
// 4. Otherwise → the registry's first-decisive-filter verdict, which fails
//    closed when every filter abstains.
//
// Ancestors are never consulted. A Deny on `SuperCar` stands even if `Car`
// is allowed, and a Deny on `Car` says nothing about `SuperCar`. Filters
// that want a cascade must implement it themselves (see `SubtypeFilter`).
//
// The two channels share the per-type verdict function but nothing else:
// no cache, no memory of earlier checks.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use sg_policy::{AccessVerdict, FilterRegistry, PolicyConfig, PolicyError};
use sg_types::{FlatHierarchy, HierarchyResolver, HostObject, TypeName};

use crate::trace::{CheckChannel, GateTrace};

/// Composes a filter registry with a hierarchy resolver into the two
/// admit/deny checks the engine performs.
///
/// Cheap to share: wrap it in an `Arc` and hand it to every render.
pub struct AccessGate {
    registry: Arc<FilterRegistry>,
    resolver: Arc<dyn HierarchyResolver>,
}

impl AccessGate {
    pub fn new(registry: Arc<FilterRegistry>, resolver: Arc<dyn HierarchyResolver>) -> Self {
        Self { registry, resolver }
    }

    /// A gate with no filters registered yet and no host type information.
    pub fn unfiltered() -> Self {
        Self::new(Arc::new(FilterRegistry::new()), Arc::new(FlatHierarchy))
    }

    /// Build a gate from a policy file's filters.
    pub fn from_policy(
        config: &PolicyConfig,
        resolver: Arc<dyn HierarchyResolver>,
    ) -> Result<Self, PolicyError> {
        let registry = config.build_registry(Arc::clone(&resolver))?;
        Ok(Self::new(Arc::new(registry), resolver))
    }

    /// The live registry. Register and deregister filters through it at any
    /// time; the next check sees the change.
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &Arc<dyn HierarchyResolver> {
        &self.resolver
    }

    /// Object-bound check, made before any method call or property access
    /// on `object`.
    ///
    /// Evaluates the object's exact runtime type only.
    pub fn check_instance_access<O>(&self, object: &O) -> AccessVerdict
    where
        O: HostObject + ?Sized,
    {
        self.check(CheckChannel::Instance, object.type_name())
    }

    /// Name-bound check, made before resolving `requested` by name and
    /// instantiating it.
    ///
    /// A subclass requested by name is decided on its own name, not its
    /// base type's.
    pub fn check_type_resolution(&self, requested: &TypeName) -> AccessVerdict {
        self.check(CheckChannel::TypeResolution, requested.clone())
    }

    /// [`check_instance_access`](Self::check_instance_access) with a full trace.
    pub fn check_instance_access_with_trace<O>(&self, object: &O) -> GateTrace
    where
        O: HostObject + ?Sized,
    {
        self.trace(CheckChannel::Instance, object.type_name())
    }

    /// [`check_type_resolution`](Self::check_type_resolution) with a full trace.
    pub fn check_type_resolution_with_trace(&self, requested: &TypeName) -> GateTrace {
        self.trace(CheckChannel::TypeResolution, requested.clone())
    }

    fn check(&self, channel: CheckChannel, type_name: TypeName) -> AccessVerdict {
        let snapshot = self.registry.snapshot();
        let verdict = if snapshot.is_empty() {
            AccessVerdict::unfiltered(type_name)
        } else {
            snapshot.evaluate(&type_name)
        };
        log_check(channel, &verdict);
        verdict
    }

    fn trace(&self, channel: CheckChannel, type_name: TypeName) -> GateTrace {
        let ancestors = self.resolver.ancestor_chain(&type_name);
        let snapshot = self.registry.snapshot();
        let (verdict, steps) = if snapshot.is_empty() {
            (AccessVerdict::unfiltered(type_name), Vec::new())
        } else {
            snapshot.evaluate_with_steps(&type_name)
        };
        log_check(channel, &verdict);
        GateTrace {
            channel,
            verdict,
            steps,
            ancestors,
            checked_at: Utc::now(),
        }
    }
}

fn log_check(channel: CheckChannel, verdict: &AccessVerdict) {
    tracing::debug!(
        %channel,
        type_name = %verdict.type_name(),
        verdict = ?verdict.verdict(),
        "access check"
    );
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::unfiltered()
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
