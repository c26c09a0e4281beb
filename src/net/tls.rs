//! TLS certificate loading for socket mode.

use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

fn require_file(path: &Path, what: &str) -> io::Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found: {}", what, path.display()),
        ))
    }
}

/// Load a rustls server config from PEM certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<RustlsConfig> {
    require_file(cert_path, "certificate file")?;
    require_file(key_path, "private key file")?;

    tracing::debug!(cert = %cert_path.display(), key = %key_path.display(), "Loading TLS material");
    RustlsConfig::from_pem_file(cert_path, key_path).await
}
