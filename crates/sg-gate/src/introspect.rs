// introspect.rs — Mediated reflective invocation.
//
// The template engine decides *what* to call; the Introspector is the only
// way it actually calls it. Each operation asks the gate first:
//
//   invoke / get_property / set_property  → object-bound check
//   resolve_type / instantiate            → name-bound check
//
// A Deny makes the operation yield nothing (`None` / `false`), which the
// engine renders as an absent value. Filtering never raises an error and
// never aborts a render.

use std::sync::Arc;

use sg_policy::AccessVerdict;
use sg_types::{HostObject, TypeDescriptor, TypeName, TypeTable, Value};

use crate::gate::AccessGate;

/// The slice of engine configuration that concerns reflection.
///
/// No gate means filtering is disabled entirely.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub access_gate: Option<Arc<AccessGate>>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(gate: Arc<AccessGate>) -> Self {
        Self {
            access_gate: Some(gate),
        }
    }

    /// Object-bound check, or Allow when no gate is configured.
    pub fn check_instance<O>(&self, object: &O) -> AccessVerdict
    where
        O: HostObject + ?Sized,
    {
        match &self.access_gate {
            Some(gate) => gate.check_instance_access(object),
            None => AccessVerdict::unfiltered(object.type_name()),
        }
    }

    /// Name-bound check, or Allow when no gate is configured.
    pub fn check_type(&self, requested: &TypeName) -> AccessVerdict {
        match &self.access_gate {
            Some(gate) => gate.check_type_resolution(requested),
            None => AccessVerdict::unfiltered(requested.clone()),
        }
    }
}

/// Gate-checked reflection over host objects and host types.
#[derive(Debug, Clone)]
pub struct Introspector {
    config: EngineConfig,
    types: Arc<TypeTable>,
}

impl Introspector {
    pub fn new(config: EngineConfig, types: Arc<TypeTable>) -> Self {
        Self { config, types }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Call `method` on `object`. `None` if denied or if there is no such
    /// method.
    pub fn invoke(&self, object: &dyn HostObject, method: &str, args: &[Value]) -> Option<Value> {
        if !self.admit_instance(object, "invoke", method) {
            return None;
        }
        object.call(method, args)
    }

    /// Read `property` from `object`. `None` if denied or absent.
    pub fn get_property(&self, object: &dyn HostObject, property: &str) -> Option<Value> {
        if !self.admit_instance(object, "get", property) {
            return None;
        }
        object.get(property)
    }

    /// Write `property` on `object`. `false` if denied or not writable; a
    /// denied write leaves the object untouched.
    pub fn set_property(&self, object: &mut dyn HostObject, property: &str, value: Value) -> bool {
        if !self.admit_instance(&*object, "set", property) {
            return false;
        }
        object.set(property, value)
    }

    /// Look up a host type by name. `None` if denied or unknown.
    pub fn resolve_type(&self, name: &TypeName) -> Option<TypeDescriptor> {
        if !self.admit_type(name, "resolve") {
            return None;
        }
        self.types.descriptor(name).cloned()
    }

    /// Look up a host type by name and build a new instance of it. `None`
    /// if denied, unknown, or not constructible.
    ///
    /// Only the requested name is checked; a subclass is decided on its own
    /// name, not its base type's.
    pub fn instantiate(&self, name: &TypeName) -> Option<Box<dyn HostObject>> {
        if !self.admit_type(name, "instantiate") {
            return None;
        }
        self.types.instantiate(name)
    }

    fn admit_instance(&self, object: &dyn HostObject, operation: &str, member: &str) -> bool {
        let verdict = self.config.check_instance(object);
        if verdict.is_denied() {
            tracing::debug!(
                type_name = %verdict.type_name(),
                operation,
                member,
                "reflective access suppressed"
            );
        }
        verdict.is_allowed()
    }

    fn admit_type(&self, name: &TypeName, operation: &str) -> bool {
        let verdict = self.config.check_type(name);
        if verdict.is_denied() {
            tracing::debug!(type_name = %name, operation, "type resolution suppressed");
        }
        verdict.is_allowed()
    }
}
