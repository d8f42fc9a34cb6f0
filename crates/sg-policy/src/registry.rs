// registry.rs — Ordered filter registry and its aggregation policy.
//
// Evaluation of a type name:
//
// 1. Take a snapshot of the registered filters.
// 2. Consult each filter in registration order.
// 3. The first Allow or Deny is the verdict.
// 4. If all abstain (or there are none) → Deny.
//
// The registry never caches verdicts. Filters may come and go between
// renders, and each check must reflect the filters registered right now.
//
// Storage is copy-on-write: the filter list lives in an `Arc<Vec<_>>`
// behind an `RwLock`. Writers swap in a modified list; readers clone the
// `Arc` and evaluate without holding the lock, so a filter that calls back
// into the registry cannot deadlock and no reader sees a torn list.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use sg_types::TypeName;

use crate::filter::{FilterDecision, FilterRef};
use crate::verdict::{AccessVerdict, Verdict};

/// One filter consulted during a traced evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStep {
    /// Position of the filter in the snapshot.
    pub index: usize,
    /// The filter's name.
    pub filter: String,
    /// What it decided.
    pub decision: FilterDecision,
}

/// An immutable view of the registered filters at one point in time.
#[derive(Clone)]
pub struct FilterSnapshot {
    filters: Arc<Vec<FilterRef>>,
}

impl FilterSnapshot {
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Evaluate `type_name` against this snapshot (first decisive filter wins).
    pub fn evaluate(&self, type_name: &TypeName) -> AccessVerdict {
        self.run(type_name, None)
    }

    /// Like [`evaluate`](Self::evaluate), also recording each filter consulted.
    pub fn evaluate_with_steps(&self, type_name: &TypeName) -> (AccessVerdict, Vec<FilterStep>) {
        let mut steps = Vec::new();
        let verdict = self.run(type_name, Some(&mut steps));
        (verdict, steps)
    }

    fn run(&self, type_name: &TypeName, mut steps: Option<&mut Vec<FilterStep>>) -> AccessVerdict {
        for (index, filter) in self.filters.iter().enumerate() {
            let decision = filter.decide(type_name);
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(FilterStep {
                    index,
                    filter: filter.name().to_string(),
                    decision,
                });
            }
            let verdict = match decision {
                FilterDecision::Allow => Verdict::Allow,
                FilterDecision::Deny => Verdict::Deny,
                FilterDecision::Abstain => continue,
            };
            tracing::debug!(
                type_name = %type_name,
                filter = filter.name(),
                index,
                ?verdict,
                "filter decided"
            );
            return AccessVerdict::decided(verdict, type_name.clone(), filter.name(), index);
        }

        if !self.filters.is_empty() {
            tracing::warn!(
                type_name = %type_name,
                filters = self.filters.len(),
                "all filters abstained, denying"
            );
        }
        AccessVerdict::exhausted(type_name.clone())
    }

    /// Names of the filters in this snapshot, in order.
    pub fn filter_names(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.name().to_string()).collect()
    }
}

impl fmt::Debug for FilterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.filter_names()).finish()
    }
}

/// The ordered collection of registered filters.
///
/// Created once per engine configuration and shared (behind an `Arc`) by
/// every concurrent render. Safe to mutate at any time.
pub struct FilterRegistry {
    filters: RwLock<Arc<Vec<FilterRef>>>,
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            filters: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create a registry holding `filters` in the given order.
    pub fn with_filters(filters: impl IntoIterator<Item = FilterRef>) -> Self {
        Self {
            filters: RwLock::new(Arc::new(filters.into_iter().collect())),
        }
    }

    /// Append `filter` to the end of the order. No deduplication: the same
    /// handle registered twice occupies two positions.
    pub fn register(&self, filter: FilterRef) {
        tracing::info!(filter = filter.name(), "registering type filter");
        let mut guard = self.filters.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).push(filter);
    }

    /// Remove the first registration of `filter` (by handle identity).
    ///
    /// Removing a filter that isn't registered is a no-op. Returns whether
    /// anything was removed.
    pub fn deregister(&self, filter: &FilterRef) -> bool {
        let mut guard = self.filters.write().unwrap_or_else(PoisonError::into_inner);
        let position = guard
            .iter()
            .position(|f| std::ptr::addr_eq(Arc::as_ptr(f), Arc::as_ptr(filter)));
        let removed = position.map(|index| (index, Arc::make_mut(&mut guard).remove(index)));
        // Filter code (even `name()`) must not run under the write guard.
        drop(guard);

        match removed {
            Some((index, removed)) => {
                tracing::info!(filter = removed.name(), index, "deregistered type filter");
                true
            }
            None => {
                tracing::debug!(filter = filter.name(), "deregister: filter not registered");
                false
            }
        }
    }

    /// A consistent view of the current filter list.
    pub fn snapshot(&self) -> FilterSnapshot {
        let guard = self.filters.read().unwrap_or_else(PoisonError::into_inner);
        FilterSnapshot {
            filters: Arc::clone(&guard),
        }
    }

    /// Evaluate `type_name` against the filters registered right now.
    ///
    /// An empty registry denies. Callers that want "no filters means no
    /// filtering" go through the access gate instead.
    pub fn evaluate(&self, type_name: &TypeName) -> AccessVerdict {
        self.snapshot().evaluate(type_name)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn filter_names(&self) -> Vec<String> {
        self.snapshot().filter_names()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FnFilter, TypeFilter};
    use crate::verdict::VerdictBasis;

    /// Helper: a filter that returns `decision` for `target` and abstains otherwise.
    fn on(name: &str, target: &'static str, decision: FilterDecision) -> FilterRef {
        Arc::new(FnFilter::new(name, move |t: &TypeName| {
            if t.as_str() == target {
                decision
            } else {
                FilterDecision::Abstain
            }
        }))
    }

    fn car() -> TypeName {
        TypeName::from("com.acme.Car")
    }

    #[test]
    fn empty_registry_fails_closed() {
        let registry = FilterRegistry::new();
        let verdict = registry.evaluate(&car());
        assert!(verdict.is_denied());
        assert_eq!(verdict.basis(), &VerdictBasis::Exhausted);
    }

    #[test]
    fn all_abstain_fails_closed() {
        let registry = FilterRegistry::new();
        registry.register(on("other", "com.acme.Truck", FilterDecision::Allow));
        let verdict = registry.evaluate(&car());
        assert!(verdict.is_denied());
        assert_eq!(verdict.basis(), &VerdictBasis::Exhausted);
    }

    #[test]
    fn abstain_defers_to_next_filter() {
        let registry = FilterRegistry::new();
        registry.register(on("f1", "com.acme.Truck", FilterDecision::Deny));
        registry.register(on("f2", "com.acme.Car", FilterDecision::Deny));
        let verdict = registry.evaluate(&car());
        assert!(verdict.is_denied());
        assert_eq!(
            verdict.basis(),
            &VerdictBasis::Filter {
                name: "f2".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn reversed_order_still_reaches_deny() {
        let registry = FilterRegistry::new();
        registry.register(on("f2", "com.acme.Car", FilterDecision::Deny));
        registry.register(on("f1", "com.acme.Truck", FilterDecision::Deny));
        assert!(registry.evaluate(&car()).is_denied());
    }

    #[test]
    fn first_decisive_filter_wins() {
        let registry = FilterRegistry::new();
        registry.register(on("deny-car", "com.acme.Car", FilterDecision::Deny));
        registry.register(on("allow-car", "com.acme.Car", FilterDecision::Allow));
        assert!(registry.evaluate(&car()).is_denied());

        let registry = FilterRegistry::new();
        registry.register(on("allow-car", "com.acme.Car", FilterDecision::Allow));
        registry.register(on("deny-car", "com.acme.Car", FilterDecision::Deny));
        assert!(registry.evaluate(&car()).is_allowed());
    }

    #[test]
    fn deregister_removes_influence() {
        let registry = FilterRegistry::new();
        let allow_all: FilterRef = Arc::new(FnFilter::new("allow-all", |_: &TypeName| {
            FilterDecision::Allow
        }));
        let deny_car = on("deny-car", "com.acme.Car", FilterDecision::Deny);

        registry.register(Arc::clone(&deny_car));
        registry.register(Arc::clone(&allow_all));
        assert!(registry.evaluate(&car()).is_denied());

        assert!(registry.deregister(&deny_car));
        assert!(registry.evaluate(&car()).is_allowed());
        assert_eq!(registry.filter_names(), vec!["allow-all".to_string()]);
    }

    #[test]
    fn deregister_unknown_filter_is_noop() {
        let registry = FilterRegistry::new();
        registry.register(on("deny-car", "com.acme.Car", FilterDecision::Deny));
        let stranger = on("deny-car", "com.acme.Car", FilterDecision::Deny);

        // Same name and behavior, different handle: not the registered one.
        assert!(!registry.deregister(&stranger));
        assert_eq!(registry.len(), 1);
        assert!(registry.evaluate(&car()).is_denied());
    }

    #[test]
    fn duplicate_registration_removed_one_at_a_time() {
        let registry = FilterRegistry::new();
        let deny_car = on("deny-car", "com.acme.Car", FilterDecision::Deny);
        registry.register(Arc::clone(&deny_car));
        registry.register(Arc::clone(&deny_car));
        assert_eq!(registry.len(), 2);

        assert!(registry.deregister(&deny_car));
        assert_eq!(registry.len(), 1);
        assert!(registry.evaluate(&car()).is_denied());

        assert!(registry.deregister(&deny_car));
        assert!(registry.is_empty());
        assert!(!registry.deregister(&deny_car));
    }

    #[test]
    fn deregister_removes_first_occurrence_only() {
        let registry = FilterRegistry::new();
        let deny_car = on("deny-car", "com.acme.Car", FilterDecision::Deny);
        let allow_car = on("allow-car", "com.acme.Car", FilterDecision::Allow);
        registry.register(Arc::clone(&deny_car));
        registry.register(Arc::clone(&allow_car));
        registry.register(Arc::clone(&deny_car));

        registry.deregister(&deny_car);
        assert_eq!(
            registry.filter_names(),
            vec!["allow-car".to_string(), "deny-car".to_string()]
        );
        assert!(registry.evaluate(&car()).is_allowed());
    }

    #[test]
    fn snapshot_is_unaffected_by_later_mutation() {
        let registry = FilterRegistry::new();
        registry.register(on("deny-car", "com.acme.Car", FilterDecision::Deny));
        let before = registry.snapshot();

        registry.register(on("allow-truck", "com.acme.Truck", FilterDecision::Allow));
        assert_eq!(before.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn evaluation_is_never_cached() {
        let registry = FilterRegistry::new();
        let deny_car = on("deny-car", "com.acme.Car", FilterDecision::Deny);
        registry.register(Arc::clone(&deny_car));
        assert!(registry.evaluate(&car()).is_denied());

        registry.deregister(&deny_car);
        registry.register(on("allow-car", "com.acme.Car", FilterDecision::Allow));
        assert!(registry.evaluate(&car()).is_allowed());
    }

    #[test]
    fn steps_stop_at_decisive_filter() {
        let registry = FilterRegistry::with_filters(vec![
            on("f1", "com.acme.Truck", FilterDecision::Deny),
            on("f2", "com.acme.Car", FilterDecision::Allow),
            on("f3", "com.acme.Car", FilterDecision::Deny),
        ]);
        let (verdict, steps) = registry.snapshot().evaluate_with_steps(&car());
        assert!(verdict.is_allowed());
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].decision, FilterDecision::Abstain);
        assert_eq!(steps[1].filter, "f2");
    }

    #[test]
    fn filter_may_reenter_registry() {
        let registry = Arc::new(FilterRegistry::new());
        let inner = Arc::clone(&registry);
        registry.register(Arc::new(FnFilter::new("reentrant", move |_: &TypeName| {
            // Reading the registry from inside a filter must not deadlock.
            if !inner.is_empty() {
                FilterDecision::Allow
            } else {
                FilterDecision::Deny
            }
        })));
        assert!(registry.evaluate(&car()).is_allowed());
    }

    /// A filter whose `name()` reads the registry it is registered in.
    struct RegistryAwareFilter {
        registry: Arc<FilterRegistry>,
    }

    impl TypeFilter for RegistryAwareFilter {
        fn name(&self) -> &str {
            let _ = self.registry.len();
            "registry-aware"
        }

        fn decide(&self, _type_name: &TypeName) -> FilterDecision {
            FilterDecision::Abstain
        }
    }

    #[test]
    fn deregister_logs_without_holding_the_lock() {
        let registry = Arc::new(FilterRegistry::new());
        let filter: FilterRef = Arc::new(RegistryAwareFilter {
            registry: Arc::clone(&registry),
        });
        registry.register(Arc::clone(&filter));

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let worker = Arc::clone(&registry);
        std::thread::spawn(move || {
            // With a subscriber enabled, log fields (and so `name()`) are evaluated.
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .finish();
            tracing::subscriber::with_default(subscriber, || {
                let _ = done_tx.send(worker.deregister(&filter));
            });
        });

        let removed = done_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("deregister blocked on the registry lock");
        assert!(removed);
        assert!(registry.is_empty());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let registry = Arc::new(FilterRegistry::new());
        registry.register(on("deny-car", "com.acme.Car", FilterDecision::Deny));

        let poisoner = Arc::clone(&registry);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.filters.write().unwrap();
            panic!("writer died holding the registry lock");
        })
        .join();
        assert!(result.is_err());
        assert!(registry.filters.is_poisoned());

        assert!(registry.evaluate(&car()).is_denied());
        assert_eq!(registry.len(), 1);

        let allow_truck = on("allow-truck", "com.acme.Truck", FilterDecision::Allow);
        registry.register(Arc::clone(&allow_truck));
        assert!(registry.evaluate(&"com.acme.Truck".into()).is_allowed());
        assert!(registry.deregister(&allow_truck));
        assert_eq!(registry.filter_names(), vec!["deny-car".to_string()]);
    }

    #[test]
    fn concurrent_register_and_evaluate() {
        let registry = Arc::new(FilterRegistry::new());
        registry.register(on("deny-car", "com.acme.Car", FilterDecision::Deny));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let filter = on("noise", "com.acme.Truck", FilterDecision::Allow);
                        registry.register(Arc::clone(&filter));
                        // deny-car stays first, so Car is always denied.
                        assert!(registry.evaluate(&car()).is_denied());
                        assert!(registry.deregister(&filter), "thread {i} lost its filter");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.filter_names(), vec!["deny-car".to_string()]);
    }
}
