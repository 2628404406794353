//! Composed resources and the desired-resource collection
//!
//! This module provides:
//! - Struct/JSON conversion for resources on the wire
//! - A kind registry for typed objects
//! - Reading and merging the desired composed resources of a request

mod convert;
pub mod scheme;

pub use convert::{map_to_struct, struct_to_map, struct_to_value, value_to_struct};
pub use scheme::{register_known_types, GroupVersionKind, Scheme, TypedObject};

use crate::error::{FunctionError, FunctionResult};
use crate::proto::{Ready, Resource, RunFunctionRequest, RunFunctionResponse, State};
use prost_types::Struct;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Desired composed resources, keyed by resource name
pub type DesiredResources = BTreeMap<String, DesiredComposed>;

/// An unstructured Kubernetes-style object.
///
/// Always carries a string `apiVersion` and `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    object: Map<String, Value>,
}

impl Composed {
    /// Wrap a JSON object, checking it names its apiVersion and kind
    pub fn from_map(object: Map<String, Value>) -> FunctionResult<Self> {
        for field in ["apiVersion", "kind"] {
            match object.get(field) {
                Some(Value::String(s)) if !s.is_empty() => {}
                _ => {
                    return Err(FunctionError::InvalidResource(format!(
                        "object has no {}",
                        field
                    )))
                }
            }
        }
        Ok(Self { object })
    }

    /// Convert a typed object. Its kind must have been registered.
    pub fn from_typed<T: TypedObject>(obj: &T) -> FunctionResult<Self> {
        if !scheme::is_registered::<T>() {
            return Err(FunctionError::UnregisteredKind(
                T::group_version_kind().to_string(),
            ));
        }

        match serde_json::to_value(obj)? {
            Value::Object(map) => Self::from_map(map),
            _ => Err(FunctionError::InvalidResource(format!(
                "{} did not serialize to an object",
                T::KIND
            ))),
        }
    }

    pub fn to_struct(&self) -> Struct {
        map_to_struct(&self.object)
    }

    pub fn api_version(&self) -> &str {
        self.object
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.object
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.object
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

}

/// A desired composed resource and its readiness
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredComposed {
    pub resource: Composed,
    pub ready: Ready,
}

impl DesiredComposed {
    pub fn new(resource: Composed) -> Self {
        Self {
            resource,
            ready: Ready::Unspecified,
        }
    }
}

/// Read the desired composed resources accumulated by earlier pipeline steps
pub fn get_desired_composed_resources(req: &RunFunctionRequest) -> FunctionResult<DesiredResources> {
    let Some(desired) = req.desired.as_ref() else {
        return Ok(DesiredResources::new());
    };

    desired
        .resources
        .iter()
        .map(|(name, resource)| {
            let object = resource
                .resource
                .as_ref()
                .map(struct_to_map)
                .transpose()
                .map_err(|e| wrap_resource_error(name, e))?
                .unwrap_or_default();
            let composed = Composed::from_map(object).map_err(|e| wrap_resource_error(name, e))?;
            let ready = Ready::try_from(resource.ready).unwrap_or(Ready::Unspecified);

            Ok((
                name.clone(),
                DesiredComposed {
                    resource: composed,
                    ready,
                },
            ))
        })
        .collect()
}

/// Merge desired composed resources into the response.
///
/// Entries under other names are left alone. Connection details already
/// recorded for a replaced entry are kept.
pub fn set_desired_composed_resources(rsp: &mut RunFunctionResponse, desired: &DesiredResources) {
    let state = rsp.desired.get_or_insert_with(State::default);

    for (name, dc) in desired {
        let connection_details = state
            .resources
            .remove(name)
            .map(|existing| existing.connection_details)
            .unwrap_or_default();

        state.resources.insert(
            name.clone(),
            Resource {
                resource: Some(dc.resource.to_struct()),
                connection_details,
                ready: dc.ready as i32,
            },
        );
    }
}

fn wrap_resource_error(name: &str, err: FunctionError) -> FunctionError {
    FunctionError::InvalidResource(format!("desired resource {:?}: {}", name, err))
}
