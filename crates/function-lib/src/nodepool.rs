//! Karpenter NodePool descriptor and the tier-based assembler
//!
//! Only the fields this function sets are modeled. The serialized form is
//! the `karpenter.sh/v1` NodePool the host applies downstream.

use crate::input::RequestConfig;
use crate::resource::TypedObject;
use crate::tier::{CpuQuantity, LimitPreset, MemoryQuantity};
use serde::{Deserialize, Serialize};

pub const NODEPOOL_API_VERSION: &str = "karpenter.sh/v1";
pub const NODEPOOL_KIND: &str = "NodePool";

/// Name given to every generated NodePool
pub const NODEPOOL_NAME: &str = "default";

/// Key the NodePool is stored under in the desired resources
pub const NODEPOOL_RESOURCE_KEY: &str = "nodepool";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: NodePoolSpec,
}

impl TypedObject for NodePool {
    const API_VERSION: &'static str = NODEPOOL_API_VERSION;
    const KIND: &'static str = NODEPOOL_KIND;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMeta {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolSpec {
    pub limits: Limits,
    pub disruption: Disruption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<NodeClaimTemplate>,
}

/// Resource ceilings for the whole pool. Serialized in field order, so the
/// output is stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Limits {
    pub cpu: CpuQuantity,
    pub memory: MemoryQuantity,
}

impl From<LimitPreset> for Limits {
    fn from(preset: LimitPreset) -> Self {
        Self {
            cpu: preset.cpu,
            memory: preset.memory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disruption {
    pub consolidation_policy: ConsolidationPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsolidationPolicy {
    WhenEmpty,
    WhenEmptyOrUnderutilized,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeClaimTemplate {
    pub spec: NodeClaimTemplateSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClaimTemplateSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_class_ref: Option<NodeClassReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<NodeSelectorRequirement>,
}

/// Reference to the cloud-specific node class (e.g. an `EC2NodeClass`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeClassReference {
    pub group: String,
    pub kind: String,
    pub name: String,
}

/// Scheduling requirement on the nodes the pool may launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelectorRequirement {
    pub key: String,
    pub operator: NodeSelectorOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Gt,
    Lt,
}

/// Build the NodePool for one invocation.
///
/// Pure: the same configuration always yields the same descriptor.
pub fn assemble(config: &RequestConfig) -> NodePool {
    let template = if config.node_class_ref.is_some() || !config.requirements.is_empty() {
        Some(NodeClaimTemplate {
            spec: NodeClaimTemplateSpec {
                node_class_ref: config.node_class_ref.clone(),
                requirements: config.requirements.clone(),
            },
        })
    } else {
        None
    };

    NodePool {
        api_version: NODEPOOL_API_VERSION.to_string(),
        kind: NODEPOOL_KIND.to_string(),
        metadata: ObjectMeta {
            name: NODEPOOL_NAME.to_string(),
        },
        spec: NodePoolSpec {
            limits: config.tier.limits().into(),
            disruption: Disruption {
                consolidation_policy: ConsolidationPolicy::WhenEmptyOrUnderutilized,
            },
            template,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;
    use serde_json::json;

    fn config(tier_label: &str) -> RequestConfig {
        RequestConfig {
            tier: Tier::from_label(tier_label),
            tier_label: tier_label.to_string(),
            example: "Hello, world".to_string(),
            node_class_ref: None,
            requirements: Vec::new(),
        }
    }

    #[test]
    fn test_development_nodepool() {
        let nodepool = assemble(&config("development"));
        let value = serde_json::to_value(&nodepool).unwrap();

        assert_eq!(
            value,
            json!({
                "apiVersion": "karpenter.sh/v1",
                "kind": "NodePool",
                "metadata": { "name": "default" },
                "spec": {
                    "limits": { "cpu": "1000m", "memory": "1000Mi" },
                    "disruption": { "consolidationPolicy": "WhenEmptyOrUnderutilized" }
                }
            })
        );
    }

    #[test]
    fn test_production_nodepool_limits() {
        let nodepool = assemble(&config("production"));
        assert_eq!(nodepool.spec.limits.cpu.to_string(), "2000m");
        assert_eq!(nodepool.spec.limits.memory.to_string(), "2000Mi");
        assert_eq!(
            nodepool.spec.disruption.consolidation_policy,
            ConsolidationPolicy::WhenEmptyOrUnderutilized
        );
    }

    #[test]
    fn test_template_passes_through_node_class_and_requirements() {
        let mut cfg = config("production");
        cfg.node_class_ref = Some(NodeClassReference {
            group: "karpenter.k8s.aws".to_string(),
            kind: "EC2NodeClass".to_string(),
            name: "default".to_string(),
        });
        cfg.requirements = vec![NodeSelectorRequirement {
            key: "karpenter.k8s.aws/instance-category".to_string(),
            operator: NodeSelectorOperator::In,
            values: vec!["m".to_string(), "c".to_string()],
            min_values: None,
        }];

        let value = serde_json::to_value(assemble(&cfg)).unwrap();
        assert_eq!(
            value["spec"]["template"],
            json!({
                "spec": {
                    "nodeClassRef": {
                        "group": "karpenter.k8s.aws",
                        "kind": "EC2NodeClass",
                        "name": "default"
                    },
                    "requirements": [{
                        "key": "karpenter.k8s.aws/instance-category",
                        "operator": "In",
                        "values": ["m", "c"]
                    }]
                }
            })
        );
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let cfg = config("staging");
        let first = serde_json::to_vec(&assemble(&cfg)).unwrap();
        let second = serde_json::to_vec(&assemble(&cfg)).unwrap();
        assert_eq!(first, second);
    }
}
