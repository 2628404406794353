//! Composition function protocol
//!
//! This module contains the Rust types for the `apiextensions.fn.proto.v1`
//! package. With the `proto-gen` feature the code is generated at build time
//! by tonic-build; otherwise the equivalent hand-maintained types below are
//! used.

#[cfg(feature = "proto-gen")]
pub mod fn_v1 {
    tonic::include_proto!("apiextensions.fn.proto.v1");
}

#[cfg(not(feature = "proto-gen"))]
pub mod fn_v1 {
    use prost::Message;
    use std::collections::HashMap;

    #[derive(Clone, PartialEq, Message)]
    pub struct RunFunctionRequest {
        #[prost(message, optional, tag = "1")]
        pub meta: Option<RequestMeta>,
        #[prost(message, optional, tag = "2")]
        pub observed: Option<State>,
        #[prost(message, optional, tag = "3")]
        pub desired: Option<State>,
        #[prost(message, optional, tag = "4")]
        pub input: Option<prost_types::Struct>,
        #[prost(message, optional, tag = "5")]
        pub context: Option<prost_types::Struct>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct RequestMeta {
        #[prost(string, tag = "1")]
        pub tag: String,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct RunFunctionResponse {
        #[prost(message, optional, tag = "1")]
        pub meta: Option<ResponseMeta>,
        #[prost(message, optional, tag = "2")]
        pub desired: Option<State>,
        #[prost(message, repeated, tag = "3")]
        pub results: Vec<Result>,
        #[prost(message, optional, tag = "4")]
        pub context: Option<prost_types::Struct>,
        #[prost(message, repeated, tag = "6")]
        pub conditions: Vec<Condition>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ResponseMeta {
        #[prost(string, tag = "1")]
        pub tag: String,
        #[prost(message, optional, tag = "2")]
        pub ttl: Option<prost_types::Duration>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct State {
        #[prost(message, optional, tag = "1")]
        pub composite: Option<Resource>,
        #[prost(map = "string, message", tag = "2")]
        pub resources: HashMap<String, Resource>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Resource {
        #[prost(message, optional, tag = "1")]
        pub resource: Option<prost_types::Struct>,
        #[prost(map = "string, bytes", tag = "2")]
        pub connection_details: HashMap<String, Vec<u8>>,
        #[prost(enumeration = "Ready", tag = "3")]
        pub ready: i32,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Result {
        #[prost(enumeration = "Severity", tag = "1")]
        pub severity: i32,
        #[prost(string, tag = "2")]
        pub message: String,
        #[prost(string, optional, tag = "3")]
        pub reason: Option<String>,
        #[prost(enumeration = "Target", optional, tag = "4")]
        pub target: Option<i32>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct Condition {
        #[prost(string, tag = "1")]
        pub r#type: String,
        #[prost(enumeration = "Status", tag = "2")]
        pub status: i32,
        #[prost(string, tag = "3")]
        pub reason: String,
        #[prost(string, optional, tag = "4")]
        pub message: Option<String>,
        #[prost(enumeration = "Target", optional, tag = "5")]
        pub target: Option<i32>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum Ready {
        Unspecified = 0,
        True = 1,
        False = 2,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum Severity {
        Unspecified = 0,
        Fatal = 1,
        Warning = 2,
        Normal = 3,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum Target {
        Unspecified = 0,
        Composite = 1,
        CompositeAndClaim = 2,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum Status {
        ConditionUnspecified = 0,
        ConditionUnknown = 1,
        ConditionTrue = 2,
        ConditionFalse = 3,
    }

    pub mod function_runner_service_server {
        #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
        use tonic::codegen::*;

        #[async_trait]
        pub trait FunctionRunnerService: Send + Sync + 'static {
            async fn run_function(
                &self,
                request: tonic::Request<super::RunFunctionRequest>,
            ) -> std::result::Result<tonic::Response<super::RunFunctionResponse>, tonic::Status>;
        }

        #[derive(Debug)]
        pub struct FunctionRunnerServiceServer<T: FunctionRunnerService> {
            inner: _Inner<T>,
            accept_compression_encodings: EnabledCompressionEncodings,
            send_compression_encodings: EnabledCompressionEncodings,
            max_decoding_message_size: Option<usize>,
            max_encoding_message_size: Option<usize>,
        }

        struct _Inner<T>(Arc<T>);

        impl<T: FunctionRunnerService> FunctionRunnerServiceServer<T> {
            pub fn new(inner: T) -> Self {
                Self::from_arc(Arc::new(inner))
            }

            pub fn from_arc(inner: Arc<T>) -> Self {
                let inner = _Inner(inner);
                Self {
                    inner,
                    accept_compression_encodings: Default::default(),
                    send_compression_encodings: Default::default(),
                    max_decoding_message_size: None,
                    max_encoding_message_size: None,
                }
            }

            /// Limits the maximum size of a decoded message.
            #[must_use]
            pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
                self.max_decoding_message_size = Some(limit);
                self
            }

            /// Limits the maximum size of an encoded message.
            #[must_use]
            pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
                self.max_encoding_message_size = Some(limit);
                self
            }
        }

        impl<T, B> tonic::codegen::Service<http::Request<B>> for FunctionRunnerServiceServer<T>
        where
            T: FunctionRunnerService,
            B: Body + Send + 'static,
            B::Error: Into<StdError> + Send + 'static,
        {
            type Response = http::Response<tonic::body::BoxBody>;
            type Error = std::convert::Infallible;
            type Future = BoxFuture<Self::Response, Self::Error>;

            fn poll_ready(
                &mut self,
                _cx: &mut Context<'_>,
            ) -> Poll<std::result::Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: http::Request<B>) -> Self::Future {
                match req.uri().path() {
                    "/apiextensions.fn.proto.v1.FunctionRunnerService/RunFunction" => {
                        #[allow(non_camel_case_types)]
                        struct RunFunctionSvc<T: FunctionRunnerService>(pub Arc<T>);

                        impl<T: FunctionRunnerService>
                            tonic::server::UnaryService<super::RunFunctionRequest>
                            for RunFunctionSvc<T>
                        {
                            type Response = super::RunFunctionResponse;
                            type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

                            fn call(
                                &mut self,
                                request: tonic::Request<super::RunFunctionRequest>,
                            ) -> Self::Future {
                                let inner = Arc::clone(&self.0);
                                let fut = async move {
                                    <T as FunctionRunnerService>::run_function(&inner, request)
                                        .await
                                };
                                Box::pin(fut)
                            }
                        }

                        let accept_compression_encodings = self.accept_compression_encodings;
                        let send_compression_encodings = self.send_compression_encodings;
                        let max_decoding_message_size = self.max_decoding_message_size;
                        let max_encoding_message_size = self.max_encoding_message_size;
                        let inner = self.inner.clone();
                        let fut = async move {
                            let inner = inner.0;
                            let method = RunFunctionSvc(inner);
                            let codec = tonic::codec::ProstCodec::default();
                            let mut grpc = tonic::server::Grpc::new(codec)
                                .apply_compression_config(
                                    accept_compression_encodings,
                                    send_compression_encodings,
                                )
                                .apply_max_message_size_config(
                                    max_decoding_message_size,
                                    max_encoding_message_size,
                                );
                            let res = grpc.unary(method, req).await;
                            Ok(res)
                        };
                        Box::pin(fut)
                    }
                    _ => Box::pin(async move {
                        Ok(http::Response::builder()
                            .status(200)
                            .header("grpc-status", "12")
                            .header("content-type", "application/grpc")
                            .body(empty_body())
                            .unwrap())
                    }),
                }
            }
        }

        impl<T: FunctionRunnerService> Clone for FunctionRunnerServiceServer<T> {
            fn clone(&self) -> Self {
                let inner = self.inner.clone();
                Self {
                    inner,
                    accept_compression_encodings: self.accept_compression_encodings,
                    send_compression_encodings: self.send_compression_encodings,
                    max_decoding_message_size: self.max_decoding_message_size,
                    max_encoding_message_size: self.max_encoding_message_size,
                }
            }
        }

        impl<T: FunctionRunnerService> Clone for _Inner<T> {
            fn clone(&self) -> Self {
                Self(Arc::clone(&self.0))
            }
        }

        impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}", self.0)
            }
        }

        impl<T: FunctionRunnerService> tonic::server::NamedService for FunctionRunnerServiceServer<T> {
            const NAME: &'static str = "apiextensions.fn.proto.v1.FunctionRunnerService";
        }
    }
}

pub use fn_v1::function_runner_service_server::{
    FunctionRunnerService, FunctionRunnerServiceServer,
};
pub use fn_v1::*;
