//! Process-wide registry of resource kinds this function produces.
//!
//! Registration happens once at startup; later calls return the same
//! registry. Converting a typed object whose kind is missing from the
//! registry fails.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use tracing::info;

use crate::nodepool::{NODEPOOL_API_VERSION, NODEPOOL_KIND};

static SCHEME: OnceLock<Scheme> = OnceLock::new();

/// A Rust type that serializes to a Kubernetes-style object
pub trait TypedObject: Serialize {
    const API_VERSION: &'static str;
    const KIND: &'static str;

    fn group_version_kind() -> GroupVersionKind {
        GroupVersionKind::new(Self::API_VERSION, Self::KIND)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersionKind {
    pub api_version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version, self.kind)
    }
}

#[derive(Debug)]
pub struct Scheme {
    known: BTreeSet<GroupVersionKind>,
}

impl Scheme {
    fn with_known_types() -> Self {
        let mut known = BTreeSet::new();
        known.insert(GroupVersionKind::new(NODEPOOL_API_VERSION, NODEPOOL_KIND));
        Self { known }
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.known.contains(gvk)
    }

    pub fn known_kinds(&self) -> impl Iterator<Item = &GroupVersionKind> {
        self.known.iter()
    }
}

/// Register the kinds this function emits. Safe to call any number of times.
pub fn register_known_types() -> &'static Scheme {
    SCHEME.get_or_init(|| {
        let scheme = Scheme::with_known_types();
        for gvk in scheme.known_kinds() {
            info!(gvk = %gvk, "Registered resource kind");
        }
        scheme
    })
}

/// The registry, if [`register_known_types`] has run
pub fn scheme() -> Option<&'static Scheme> {
    SCHEME.get()
}

/// Whether the kind of `T` has been registered
pub fn is_registered<T: TypedObject>() -> bool {
    scheme().is_some_and(|s| s.recognizes(&T::group_version_kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodepool::NodePool;

    #[test]
    fn test_registration_is_idempotent() {
        let first = register_known_types();
        let second = register_known_types();

        assert!(std::ptr::eq(first, second));
        assert_eq!(first.known_kinds().count(), 1);
    }

    #[test]
    fn test_nodepool_is_registered() {
        register_known_types();
        assert!(is_registered::<NodePool>());
        assert_eq!(
            NodePool::group_version_kind().to_string(),
            "karpenter.sh/v1, Kind=NodePool"
        );
    }
}
