//! Library for the NodePool composition function
//!
//! This crate provides:
//! - The composition function wire protocol and gRPC service
//! - Tier-based NodePool limit selection and assembly
//! - Desired composed resource handling and response builders
//! - Health checks, metrics and server TLS loading

pub mod error;
pub mod function;
pub mod health;
pub mod input;
pub mod nodepool;
pub mod observability;
pub mod proto;
pub mod resource;
pub mod response;
pub mod tier;
pub mod tls;

pub use error::{FunctionError, FunctionResult};
pub use function::NodePoolFunction;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use observability::{FunctionMetrics, StructuredLogger};
pub use tier::Tier;
