// object.rs — The reflective surface of a live host object.
//
// The template engine never touches host objects directly. It goes through
// `HostObject`, and the access gate decides beforehand whether the call is
// allowed at all.

use std::collections::BTreeMap;

pub use serde_json::Value;

use crate::name::TypeName;

/// A live host object flowing through template evaluation context.
///
/// Every method has a "nothing here" default so that embedders only
/// implement the operations their type actually supports.
pub trait HostObject: Send + Sync {
    /// The exact runtime type of this object (never a supertype).
    fn type_name(&self) -> TypeName;

    /// Invoke `method` with `args`. `None` means no such method.
    fn call(&self, _method: &str, _args: &[Value]) -> Option<Value> {
        None
    }

    /// Read `property`. `None` means no such property.
    fn get(&self, _property: &str) -> Option<Value> {
        None
    }

    /// Write `property`. Returns false if the property is not writable.
    fn set(&mut self, _property: &str, _value: Value) -> bool {
        false
    }
}

/// A plain property bag typed as some host type.
///
/// Exposes bean-style accessors: `getColor()` / `setColor(v)` map onto the
/// `color` field, alongside direct `get`/`set`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordObject {
    type_name: TypeName,
    fields: BTreeMap<String, Value>,
}

impl RecordObject {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field initializer.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

/// `getColor` → `color`, `setModelYear` → `modelYear`.
fn accessor_property(method: &str, prefix: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

impl HostObject for RecordObject {
    fn type_name(&self) -> TypeName {
        self.type_name.clone()
    }

    fn call(&self, method: &str, args: &[Value]) -> Option<Value> {
        if method == "toString" && args.is_empty() {
            return Some(Value::String(format!("{}{:?}", self.type_name, self.fields)));
        }
        let property = accessor_property(method, "get")?;
        if !args.is_empty() {
            return None;
        }
        self.fields.get(&property).cloned()
    }

    fn get(&self, property: &str) -> Option<Value> {
        self.fields.get(property).cloned()
    }

    fn set(&mut self, property: &str, value: Value) -> bool {
        match self.fields.get_mut(property) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
