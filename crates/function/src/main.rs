//! function-nodepools - Karpenter NodePool composition function
//!
//! Serves the RunFunction gRPC endpoint the composition engine calls, plus
//! an HTTP endpoint for health probes and Prometheus metrics.

use anyhow::{Context, Result};
use clap::Parser;
use function_lib::{
    health::{components, HealthRegistry},
    proto::FunctionRunnerServiceServer,
    resource,
    tls::load_server_tls,
    NodePoolFunction, StructuredLogger,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const FUNCTION_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let args = config::Args::parse();
    let config = config::FunctionConfig::load(&args)?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().json())
        .init();

    let logger = StructuredLogger::new(function_lib::function::FUNCTION_NAME);

    // Register the NodePool kind once, before any request is served
    resource::register_known_types();

    let health_registry = HealthRegistry::new();
    health_registry.register(components::FUNCTION_RUNNER).await;
    health_registry.register(components::TLS).await;

    let app_state = Arc::new(api::AppState::new(health_registry.clone()));
    let api_port = config.http_port;
    tokio::spawn(async move {
        if let Err(e) = api::serve(api_port, app_state).await {
            error!(error = %e, "Health and metrics server failed");
        }
    });

    let mut server = Server::builder();
    if config.insecure {
        warn!("Serving without TLS");
        health_registry
            .set_degraded(components::TLS, "Serving without TLS")
            .await;
    } else if let Some(dir) = &config.tls_certs_dir {
        let tls = load_server_tls(dir).await?;
        server = server
            .tls_config(tls)
            .context("Failed to configure server TLS")?;
    }

    let addr: SocketAddr = config
        .address
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.address))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let function = NodePoolFunction::new().with_ttl(config.response_ttl());

    logger.log_startup(FUNCTION_VERSION, &config.address, config.insecure);
    health_registry.set_serving(true).await;

    let result = server
        .add_service(FunctionRunnerServiceServer::new(function))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal())
        .await;

    health_registry.set_serving(false).await;

    if let Err(e) = result {
        health_registry
            .set_unhealthy(components::FUNCTION_RUNNER, e.to_string())
            .await;
        return Err(e).context("gRPC server failed");
    }

    logger.log_shutdown("signal received");
    info!("Shutting down");

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
