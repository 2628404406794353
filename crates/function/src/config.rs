//! Function configuration
//!
//! Settings come from `FUNCTION_*` environment variables; command-line flags
//! override them.

use anyhow::{bail, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line flags
#[derive(Debug, Default, Parser)]
#[command(name = "function-nodepools")]
#[command(author, version, about = "Composition function that derives a Karpenter NodePool", long_about = None)]
pub struct Args {
    /// Emit debug logs in addition to info logs
    #[arg(long, short)]
    pub debug: bool,

    /// Address at which to listen for gRPC connections
    #[arg(long)]
    pub address: Option<String>,

    /// Directory containing server certs (tls.key, tls.crt) and the CA used to verify client certificates (ca.crt)
    #[arg(long, env = "TLS_SERVER_CERTS_DIR")]
    pub tls_certs_dir: Option<PathBuf>,

    /// Run without mTLS credentials
    #[arg(long)]
    pub insecure: bool,

    /// Port for the health and metrics HTTP server
    #[arg(long)]
    pub http_port: Option<u16>,
}

/// Function configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FunctionConfig {
    /// gRPC listen address
    #[serde(default = "default_address")]
    pub address: String,

    /// Directory holding tls.crt, tls.key and ca.crt
    #[serde(default)]
    pub tls_certs_dir: Option<PathBuf>,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub debug: bool,

    /// Health and metrics HTTP port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// How long the host may cache a response
    #[serde(default = "default_response_ttl_secs")]
    pub response_ttl_secs: u64,
}

/// Longest response TTL accepted, in seconds
const MAX_RESPONSE_TTL_SECS: u64 = 24 * 60 * 60;

fn default_address() -> String {
    "0.0.0.0:9443".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_response_ttl_secs() -> u64 {
    60
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            tls_certs_dir: None,
            insecure: false,
            debug: false,
            http_port: default_http_port(),
            response_ttl_secs: default_response_ttl_secs(),
        }
    }
}

impl FunctionConfig {
    /// Load configuration from the environment and apply flag overrides
    pub fn load(args: &Args) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("FUNCTION"))
            .build()?;

        let mut config: FunctionConfig = config.try_deserialize()?;
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    fn apply_args(&mut self, args: &Args) {
        if args.debug {
            self.debug = true;
        }
        if args.insecure {
            self.insecure = true;
        }
        if let Some(address) = &args.address {
            self.address = address.clone();
        }
        if let Some(dir) = &args.tls_certs_dir {
            self.tls_certs_dir = Some(dir.clone());
        }
        if let Some(port) = args.http_port {
            self.http_port = port;
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.insecure && self.tls_certs_dir.is_none() {
            bail!("either --tls-certs-dir or --insecure must be set");
        }
        if self.response_ttl_secs == 0 {
            bail!("response TTL must be at least one second");
        }
        if self.response_ttl_secs > MAX_RESPONSE_TTL_SECS {
            bail!(
                "response TTL of {}s exceeds the maximum of {}s",
                self.response_ttl_secs,
                MAX_RESPONSE_TTL_SECS
            );
        }
        Ok(())
    }

    pub fn response_ttl(&self) -> Duration {
        Duration::from_secs(self.response_ttl_secs)
    }
}
