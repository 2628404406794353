//! Server TLS material for the gRPC endpoint
//!
//! The host mounts a directory holding `tls.crt`, `tls.key` and `ca.crt`.
//! Clients must present a certificate signed by that CA.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tonic::transport::{Certificate, Identity, ServerTlsConfig};
use tracing::debug;

pub const CERT_FILE: &str = "tls.crt";
pub const KEY_FILE: &str = "tls.key";
pub const CA_FILE: &str = "ca.crt";

/// Paths of the three PEM files inside a certificate directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub ca: PathBuf,
}

impl TlsPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cert: dir.join(CERT_FILE),
            key: dir.join(KEY_FILE),
            ca: dir.join(CA_FILE),
        }
    }
}

async fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {} from {:?}", what, path))
}

/// Load the server identity and client CA from `dir`
pub async fn load_server_tls(dir: &Path) -> Result<ServerTlsConfig> {
    let paths = TlsPaths::in_dir(dir);

    let cert = read_pem(&paths.cert, "server certificate").await?;
    let key = read_pem(&paths.key, "server private key").await?;
    let ca = read_pem(&paths.ca, "CA certificate").await?;

    debug!(dir = ?dir, "Loaded TLS certificates");

    Ok(ServerTlsConfig::new()
        .identity(Identity::from_pem(cert, key))
        .client_ca_root(Certificate::from_pem(ca)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DUMMY_PEM: &str = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    #[test]
    fn test_paths_in_dir() {
        let paths = TlsPaths::in_dir(Path::new("/tls/server"));
        assert_eq!(paths.cert, PathBuf::from("/tls/server/tls.crt"));
        assert_eq!(paths.key, PathBuf::from("/tls/server/tls.key"));
        assert_eq!(paths.ca, PathBuf::from("/tls/server/ca.crt"));
    }

    #[tokio::test]
    async fn test_missing_files_are_reported_with_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CERT_FILE), DUMMY_PEM).unwrap();

        let err = load_server_tls(dir.path()).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("server private key"), "{}", message);
        assert!(message.contains("tls.key"), "{}", message);
    }

    #[tokio::test]
    async fn test_loads_when_all_files_present() {
        let dir = TempDir::new().unwrap();
        for file in [CERT_FILE, KEY_FILE, CA_FILE] {
            std::fs::write(dir.path().join(file), DUMMY_PEM).unwrap();
        }

        assert!(load_server_tls(dir.path()).await.is_ok());
    }
}
