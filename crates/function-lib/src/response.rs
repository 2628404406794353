//! Builders for function responses
//!
//! Results are shown to users as events; conditions land on the composite
//! (and optionally the claim) status.

use crate::proto::{
    Condition, RequestMeta, ResponseMeta, Result as FnResult, RunFunctionRequest,
    RunFunctionResponse, Severity, Status, Target,
};
use std::fmt::Display;
use std::time::Duration;

/// How long the host may cache a response
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Start a response to `req`: echoes the tag and carries over the desired
/// state and context accumulated by earlier pipeline steps.
pub fn to(req: &RunFunctionRequest, ttl: Duration) -> RunFunctionResponse {
    let tag = req
        .meta
        .as_ref()
        .map(|RequestMeta { tag }| tag.clone())
        .unwrap_or_default();

    RunFunctionResponse {
        meta: Some(ResponseMeta {
            tag,
            ttl: Some(duration_to_proto(ttl)),
        }),
        desired: req.desired.clone(),
        results: Vec::new(),
        context: req.context.clone(),
        conditions: Vec::new(),
    }
}

fn duration_to_proto(d: Duration) -> prost_types::Duration {
    prost_types::Duration {
        seconds: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        nanos: d.subsec_nanos() as i32,
    }
}

/// Handle to a result just appended to a response
pub struct ResultBuilder<'a> {
    result: &'a mut FnResult,
}

impl ResultBuilder<'_> {
    pub fn target_composite_and_claim(self) -> Self {
        self.result.target = Some(Target::CompositeAndClaim as i32);
        self
    }
}

fn push_result(
    rsp: &mut RunFunctionResponse,
    severity: Severity,
    message: String,
) -> ResultBuilder<'_> {
    let idx = rsp.results.len();
    rsp.results.push(FnResult {
        severity: severity as i32,
        message,
        reason: None,
        target: Some(Target::Composite as i32),
    });
    ResultBuilder {
        result: &mut rsp.results[idx],
    }
}

/// Add a normal (informational) result
pub fn normal(rsp: &mut RunFunctionResponse, message: impl Into<String>) -> ResultBuilder<'_> {
    push_result(rsp, Severity::Normal, message.into())
}

/// Add a warning result
pub fn warning(rsp: &mut RunFunctionResponse, err: impl Display) -> ResultBuilder<'_> {
    push_result(rsp, Severity::Warning, err.to_string())
}

/// Add a fatal result. The host stops the pipeline when it sees one.
pub fn fatal(rsp: &mut RunFunctionResponse, err: impl Display) -> ResultBuilder<'_> {
    push_result(rsp, Severity::Fatal, err.to_string())
}

/// Handle to a condition just appended to a response
pub struct ConditionBuilder<'a> {
    condition: &'a mut Condition,
}

impl ConditionBuilder<'_> {
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.condition.message = Some(message.into());
        self
    }

    pub fn target_composite_and_claim(self) -> Self {
        self.condition.target = Some(Target::CompositeAndClaim as i32);
        self
    }
}

fn push_condition<'a>(
    rsp: &'a mut RunFunctionResponse,
    condition_type: &str,
    status: Status,
    reason: &str,
) -> ConditionBuilder<'a> {
    let idx = rsp.conditions.len();
    rsp.conditions.push(Condition {
        r#type: condition_type.to_string(),
        status: status as i32,
        reason: reason.to_string(),
        message: None,
        target: Some(Target::Composite as i32),
    });
    ConditionBuilder {
        condition: &mut rsp.conditions[idx],
    }
}

pub fn condition_true<'a>(
    rsp: &'a mut RunFunctionResponse,
    condition_type: &str,
    reason: &str,
) -> ConditionBuilder<'a> {
    push_condition(rsp, condition_type, Status::ConditionTrue, reason)
}

pub fn condition_false<'a>(
    rsp: &'a mut RunFunctionResponse,
    condition_type: &str,
    reason: &str,
) -> ConditionBuilder<'a> {
    push_condition(rsp, condition_type, Status::ConditionFalse, reason)
}

/// Whether any fatal result has been recorded
pub fn has_fatal(rsp: &RunFunctionResponse) -> bool {
    rsp.results
        .iter()
        .any(|r| r.severity == Severity::Fatal as i32)
}
