//! Seam for public-tunnel providers.
//!
//! The concrete provider (ngrok or similar) lives outside this crate: a run
//! selects it with `server: ngrok` and wires an implementation in. The only
//! part the core owns is the credential pre-flight check.

use std::net::SocketAddr;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, ReceiverError};

/// Environment variable holding the tunnel credential.
pub const AUTH_TOKEN_ENV: &str = "NGROK_AUTHTOKEN";

/// Exposes the local receiver on a publicly reachable URL.
#[async_trait]
pub trait TunnelProvider: Send + Sync {
    /// Opens a public endpoint forwarding to `local_addr`, returning its URL.
    ///
    /// # Errors
    ///
    /// Returns the provider's own error when the tunnel cannot be opened.
    async fn open(
        &self,
        local_addr: SocketAddr,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Fails fast when the tunnel credential is missing from the environment.
///
/// # Errors
///
/// Returns [`ReceiverError::TunnelTokenMissing`] when the variable is unset.
pub fn require_auth_token() -> AppResult<String> {
    std::env::var(AUTH_TOKEN_ENV).map_err(|_missing| {
        AppError::receiver(ReceiverError::TunnelTokenMissing {
            env: AUTH_TOKEN_ENV,
        })
    })
}
