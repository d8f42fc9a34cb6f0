// hierarchy.rs — Ancestor / descendant questions over host types.
//
// A resolver is a read-only view over the host type system. It knows one
// thing, the direct supertype of a type, and everything else is derived
// from that. Nothing here makes access decisions.

use std::sync::Arc;

use crate::name::TypeName;

/// Answers ancestor questions about [`TypeName`]s.
///
/// Implementors provide [`supertype_of`](Self::supertype_of); the chain walk
/// and the ancestry test are derived from it.
pub trait HierarchyResolver: Send + Sync {
    /// The direct supertype of `type_name`, or `None` for a root or an
    /// unknown type.
    fn supertype_of(&self, type_name: &TypeName) -> Option<TypeName>;

    /// The type itself, then its supertype, then that type's supertype, up
    /// to a root.
    ///
    /// Never empty. Unknown types are treated as roots (length 1). If the
    /// underlying resolver reports a cycle, the walk stops before the first
    /// repeated type.
    fn ancestor_chain(&self, type_name: &TypeName) -> Vec<TypeName> {
        let mut chain = vec![type_name.clone()];
        let mut current = type_name.clone();
        while let Some(parent) = self.supertype_of(&current) {
            if chain.contains(&parent) {
                tracing::warn!(
                    type_name = %type_name,
                    repeated = %parent,
                    "hierarchy cycle detected, truncating ancestor chain"
                );
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// True if `candidate` is `type_name` itself or one of its ancestors.
    fn is_ancestor_of(&self, candidate: &TypeName, type_name: &TypeName) -> bool {
        self.ancestor_chain(type_name).contains(candidate)
    }

    /// True if `candidate` is a strict ancestor of `type_name`.
    fn is_proper_ancestor_of(&self, candidate: &TypeName, type_name: &TypeName) -> bool {
        candidate != type_name && self.is_ancestor_of(candidate, type_name)
    }
}

impl<R: HierarchyResolver + ?Sized> HierarchyResolver for Arc<R> {
    fn supertype_of(&self, type_name: &TypeName) -> Option<TypeName> {
        (**self).supertype_of(type_name)
    }
}

/// A resolver with no type relationships: every type is a root.
///
/// Used when the embedder supplies no host type information.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHierarchy;

impl HierarchyResolver for FlatHierarchy {
    fn supertype_of(&self, _type_name: &TypeName) -> Option<TypeName> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Helper: resolver backed by a plain child → parent map.
    struct MapResolver(HashMap<TypeName, TypeName>);

    impl HierarchyResolver for MapResolver {
        fn supertype_of(&self, type_name: &TypeName) -> Option<TypeName> {
            self.0.get(type_name).cloned()
        }
    }

    fn resolver(edges: &[(&str, &str)]) -> MapResolver {
        MapResolver(
            edges
                .iter()
                .map(|(child, parent)| (TypeName::from(*child), TypeName::from(*parent)))
                .collect(),
        )
    }

    #[test]
    fn chain_is_most_derived_first() {
        let r = resolver(&[
            ("com.acme.SuperCar", "com.acme.Car"),
            ("com.acme.Car", "java.lang.Object"),
        ]);
        let chain = r.ancestor_chain(&"com.acme.SuperCar".into());
        assert_eq!(
            chain,
            vec![
                TypeName::from("com.acme.SuperCar"),
                TypeName::from("com.acme.Car"),
                TypeName::from("java.lang.Object"),
            ]
        );
    }

    #[test]
    fn root_chain_has_length_one() {
        let r = resolver(&[("com.acme.Car", "java.lang.Object")]);
        assert_eq!(r.ancestor_chain(&"java.lang.Object".into()).len(), 1);
        assert_eq!(r.ancestor_chain(&"never.Registered".into()).len(), 1);
    }

    #[test]
    fn cyclic_resolver_still_terminates() {
        let r = resolver(&[("a.A", "a.B"), ("a.B", "a.A")]);
        let chain = r.ancestor_chain(&"a.A".into());
        assert_eq!(chain, vec![TypeName::from("a.A"), TypeName::from("a.B")]);
    }

    #[test]
    fn ancestry_includes_self_and_parents_only() {
        let r = resolver(&[("com.acme.SuperCar", "com.acme.Car")]);
        let car = TypeName::from("com.acme.Car");
        let super_car = TypeName::from("com.acme.SuperCar");

        assert!(r.is_ancestor_of(&car, &super_car));
        assert!(r.is_ancestor_of(&super_car, &super_car));
        assert!(!r.is_ancestor_of(&super_car, &car));

        assert!(r.is_proper_ancestor_of(&car, &super_car));
        assert!(!r.is_proper_ancestor_of(&super_car, &super_car));
    }

    #[test]
    fn flat_hierarchy_treats_everything_as_root() {
        let chain = FlatHierarchy.ancestor_chain(&"com.acme.SuperCar".into());
        assert_eq!(chain, vec![TypeName::from("com.acme.SuperCar")]);
    }

    #[test]
    fn arc_resolver_delegates() {
        let r: Arc<dyn HierarchyResolver> =
            Arc::new(resolver(&[("com.acme.SuperCar", "com.acme.Car")]));
        assert_eq!(
            r.supertype_of(&"com.acme.SuperCar".into()),
            Some(TypeName::from("com.acme.Car"))
        );
    }
}
