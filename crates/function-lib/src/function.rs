//! The RunFunction handler
//!
//! Reads the input, picks the tier, and adds a NodePool to the desired
//! composed resources. Every failure becomes a fatal result in the response;
//! the gRPC call itself always succeeds.

use std::time::{Duration, Instant};
use tonic::{Request, Response, Status};

use crate::input::{get_input, RequestConfig};
use crate::nodepool::{self, NODEPOOL_RESOURCE_KEY};
use crate::observability::{outcomes, FunctionMetrics, StructuredLogger};
use crate::proto::{FunctionRunnerService, RunFunctionRequest, RunFunctionResponse};
use crate::resource::{
    self, get_desired_composed_resources, set_desired_composed_resources, Composed,
    DesiredComposed,
};
use crate::response;

pub const FUNCTION_NAME: &str = "function-nodepools";

/// Condition type reported on the composite and claim
pub const CONDITION_FUNCTION_SUCCESS: &str = "FunctionSuccess";

/// Composition function that derives a Karpenter NodePool
#[derive(Debug, Clone)]
pub struct NodePoolFunction {
    ttl: Duration,
    metrics: FunctionMetrics,
    logger: StructuredLogger,
}

impl Default for NodePoolFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl NodePoolFunction {
    /// Create the function. Registers the NodePool kind if that has not
    /// happened yet.
    pub fn new() -> Self {
        resource::register_known_types();
        Self {
            ttl: response::DEFAULT_TTL,
            metrics: FunctionMetrics::new(),
            logger: StructuredLogger::new(FUNCTION_NAME),
        }
    }

    /// Override how long the host may cache responses
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Handle one request
    pub fn run(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        let started = Instant::now();
        let tag = req
            .meta
            .as_ref()
            .map(|m| m.tag.as_str())
            .unwrap_or_default();
        self.logger.log_run(tag);

        let rsp = self.compose(req);

        let outcome = if response::has_fatal(&rsp) {
            if let Some(result) = rsp.results.last() {
                self.logger.log_fatal(tag, &result.message);
            }
            outcomes::FATAL
        } else {
            outcomes::SUCCESS
        };
        self.metrics.inc_runs(outcome);
        self.metrics
            .observe_run_duration(started.elapsed().as_secs_f64());

        rsp
    }

    fn compose(&self, req: &RunFunctionRequest) -> RunFunctionResponse {
        let mut rsp = response::to(req, self.ttl);

        let input = match get_input(req) {
            Ok(input) => input,
            Err(e) => {
                response::condition_false(&mut rsp, CONDITION_FUNCTION_SUCCESS, "InternalError")
                    .with_message("Something went wrong.")
                    .target_composite_and_claim();
                response::warning(&mut rsp, "something went wrong").target_composite_and_claim();
                response::fatal(
                    &mut rsp,
                    format!("cannot get Function input from RunFunctionRequest: {}", e),
                );
                return rsp;
            }
        };

        response::normal(&mut rsp, format!("I was run with input {:?}!", input.example));
        self.logger.log_input(&input.example);

        let mut desired = match get_desired_composed_resources(req) {
            Ok(desired) => desired,
            Err(e) => {
                response::fatal(
                    &mut rsp,
                    format!("cannot get desired resources from RunFunctionRequest: {}", e),
                );
                return rsp;
            }
        };

        let config = RequestConfig::resolve(&input);
        let nodepool = nodepool::assemble(&config);
        self.logger.log_tier_selected(
            &config.tier_label,
            config.tier,
            &nodepool.spec.limits.cpu.to_string(),
            &nodepool.spec.limits.memory.to_string(),
        );

        let composed = match Composed::from_typed(&nodepool) {
            Ok(composed) => composed,
            Err(e) => {
                response::fatal(&mut rsp, format!("cannot convert NodePool to Composed: {}", e));
                return rsp;
            }
        };

        desired.insert(
            NODEPOOL_RESOURCE_KEY.to_string(),
            DesiredComposed::new(composed),
        );
        set_desired_composed_resources(&mut rsp, &desired);
        self.metrics.inc_tier_selection(config.tier);

        response::condition_true(&mut rsp, CONDITION_FUNCTION_SUCCESS, "Success")
            .target_composite_and_claim();

        rsp
    }
}

#[tonic::async_trait]
impl FunctionRunnerService for NodePoolFunction {
    async fn run_function(
        &self,
        request: Request<RunFunctionRequest>,
    ) -> Result<Response<RunFunctionResponse>, Status> {
        let req = request.into_inner();
        Ok(Response::new(self.run(&req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{RequestMeta, Severity, Status as ConditionStatus, Target};
    use crate::resource::{struct_to_value, value_to_struct};
    use serde_json::json;

    fn request(input: Option<serde_json::Value>) -> RunFunctionRequest {
        RunFunctionRequest {
            meta: Some(RequestMeta {
                tag: "hello".to_string(),
            }),
            input: input.map(|i| value_to_struct(&i).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_registers_nodepool_kind() {
        let _function = NodePoolFunction::new();
        assert!(resource::scheme::is_registered::<nodepool::NodePool>());
    }

    #[test]
    fn test_malformed_input_is_fatal() {
        let function = NodePoolFunction::new();
        let rsp = function.run(&request(Some(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Input",
            "example": ["not", "a", "string"]
        }))));

        assert_eq!(rsp.conditions.len(), 1);
        assert_eq!(rsp.conditions[0].status(), ConditionStatus::ConditionFalse);
        assert_eq!(rsp.conditions[0].reason, "InternalError");
        assert_eq!(rsp.conditions[0].target(), Target::CompositeAndClaim);

        assert_eq!(rsp.results.len(), 2);
        assert_eq!(rsp.results[0].severity(), Severity::Warning);
        assert_eq!(rsp.results[0].target(), Target::CompositeAndClaim);
        assert_eq!(rsp.results[1].severity(), Severity::Fatal);
        assert!(rsp.results[1]
            .message
            .starts_with("cannot get Function input from RunFunctionRequest"));
        assert!(rsp.desired.is_none());
    }

    #[test]
    fn test_missing_input_gets_default_limits() {
        let function = NodePoolFunction::new();
        let rsp = function.run(&request(None));

        assert!(!response::has_fatal(&rsp));
        let state = rsp.desired.unwrap();
        let nodepool = struct_to_value(state.resources["nodepool"].resource.as_ref().unwrap()).unwrap();
        assert_eq!(nodepool["spec"]["limits"]["cpu"], "1000m");
        assert_eq!(nodepool["spec"]["limits"]["memory"], "1000Mi");
    }

    #[test]
    fn test_ttl_override() {
        let function = NodePoolFunction::new().with_ttl(Duration::from_secs(5));
        let rsp = function.run(&request(Some(json!({
            "apiVersion": "template.fn.crossplane.io/v1beta1",
            "kind": "Input"
        }))));

        assert_eq!(rsp.meta.unwrap().ttl.unwrap().seconds, 5);
    }

    #[tokio::test]
    async fn test_grpc_handler_returns_response() {
        let function = NodePoolFunction::new();
        let rsp = function
            .run_function(Request::new(request(Some(json!({
                "apiVersion": "template.fn.crossplane.io/v1beta1",
                "kind": "Input",
                "example": "Hello, world",
                "cxEnv": "production"
            })))))
            .await
            .unwrap()
            .into_inner();

        let state = rsp.desired.unwrap();
        let nodepool = struct_to_value(state.resources["nodepool"].resource.as_ref().unwrap()).unwrap();
        assert_eq!(nodepool["spec"]["limits"]["cpu"], "2000m");
        assert_eq!(nodepool["spec"]["limits"]["memory"], "2000Mi");
    }
}
