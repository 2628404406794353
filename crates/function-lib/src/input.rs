//! Function input and the per-invocation configuration record

use crate::error::{FunctionError, FunctionResult};
use crate::nodepool::{NodeClassReference, NodeSelectorRequirement};
use crate::proto::RunFunctionRequest;
use crate::resource::struct_to_value;
use crate::tier::Tier;
use serde::Deserialize;
use serde_json::Value;

/// Input supplied to the function by the composition pipeline step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,

    /// Free-form text echoed back in a result
    #[serde(default)]
    pub example: String,

    /// Environment tier label; `"production"` selects the larger preset
    #[serde(default)]
    pub cx_env: Option<String>,

    #[serde(default)]
    pub node_class_ref: Option<NodeClassReference>,

    #[serde(default)]
    pub requirements: Vec<NodeSelectorRequirement>,
}

/// Read the function input from a request.
///
/// An absent input reads as an empty object. Only fields of the wrong type
/// are rejected.
pub fn get_input(req: &RunFunctionRequest) -> FunctionResult<Input> {
    let value = match &req.input {
        Some(input) => struct_to_value(input)?,
        None => Value::Object(Default::default()),
    };

    serde_json::from_value(value).map_err(|e| FunctionError::InvalidInput(e.to_string()))
}

/// Everything the NodePool assembler needs for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub tier: Tier,
    /// The label the tier was derived from, as supplied
    pub tier_label: String,
    pub example: String,
    pub node_class_ref: Option<NodeClassReference>,
    pub requirements: Vec<NodeSelectorRequirement>,
}

impl RequestConfig {
    /// Build the configuration from the input. An unset tier reads as `""`.
    pub fn resolve(input: &Input) -> Self {
        let tier_label = input.cx_env.clone().unwrap_or_default();

        Self {
            tier: Tier::from_label(&tier_label),
            tier_label,
            example: input.example.clone(),
            node_class_ref: input.node_class_ref.clone(),
            requirements: input.requirements.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::value_to_struct;
    use serde_json::json;

    fn request_with_input(input: Value) -> RunFunctionRequest {
        RunFunctionRequest {
            input: Some(value_to_struct(&input).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_input_reads_fields() {
        let req = request_with_input(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Input",
            "example": "Hello, world",
            "cxEnv": "production"
        }));

        let input = get_input(&req).unwrap();
        assert_eq!(input.api_version, "template.fn.crossplane.io/v1beta1");
        assert_eq!(input.kind, "Input");
        assert_eq!(input.example, "Hello, world");
        assert_eq!(input.cx_env.as_deref(), Some("production"));
        assert!(input.node_class_ref.is_none());
        assert!(input.requirements.is_empty());
    }

    #[test]
    fn test_missing_input_reads_as_empty() {
        let input = get_input(&RunFunctionRequest::default()).unwrap();
        assert_eq!(input.api_version, "");
        assert_eq!(input.example, "");
        assert!(input.cx_env.is_none());

        let config = RequestConfig::resolve(&input);
        assert_eq!(config.tier, Tier::NonProduction);
        assert_eq!(config.tier_label, "");
    }

    #[test]
    fn test_type_and_kind_are_not_checked() {
        let req = request_with_input(json!({ "example": "x", "cxEnv": "production" }));
        let input = get_input(&req).unwrap();
        assert_eq!(RequestConfig::resolve(&input).tier, Tier::Production);

        let req = request_with_input(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Output",
            "example": "x"
        }));
        assert_eq!(get_input(&req).unwrap().kind, "Output");
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let req = request_with_input(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Input",
            "example": ["not", "a", "string"]
        }));
        assert!(matches!(
            get_input(&req),
            Err(FunctionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_requirements_are_parsed() {
        let req = request_with_input(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Input",
            "nodeClassRef": { "group": "karpenter.k8s.aws", "kind": "EC2NodeClass", "name": "default" },
            "requirements": [
                { "key": "karpenter.k8s.aws/instance-category", "operator": "In", "values": ["m"] },
                { "key": "kubernetes.io/arch", "operator": "Exists", "minValues": 1 }
            ]
        }));

        let input = get_input(&req).unwrap();
        assert_eq!(input.node_class_ref.unwrap().kind, "EC2NodeClass");
        assert_eq!(input.requirements.len(), 2);
        assert_eq!(input.requirements[1].min_values, Some(1));
        assert!(input.requirements[1].values.is_empty());
    }

    #[test]
    fn test_tier_comes_from_input_only() {
        let req = request_with_input(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Input",
            "cxEnv": "development"
        }));
        let config = RequestConfig::resolve(&get_input(&req).unwrap());
        assert_eq!(config.tier, Tier::NonProduction);
        assert_eq!(config.tier_label, "development");
    }
}
