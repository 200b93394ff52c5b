use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("Failed to bind receiver on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to resolve receiver address: {source}")]
    LocalAddr {
        #[source]
        source: std::io::Error,
    },
    #[error("Ngrok auth token missing from environment. Set {env} to use the tunnel mode.")]
    TunnelTokenMissing { env: &'static str },
    #[error("No tunnel provider is wired in for 'server: ngrok'.")]
    TunnelProviderUnavailable,
    #[error("Failed to open tunnel: {source}")]
    Tunnel {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
