//! # API Client
//!
//! reqwest-backed implementations of the `medireg-core` collaborator traits:
//! - [`HttpRecordGateway`] posts registrations and health records to the backend
//! - [`PostalLookupClient`] resolves postal codes to district and state
//! - [`StaticIdentity`] supplies a doctor identity known up front (CLI flag, request header)

#![warn(rust_2018_idioms)]

pub mod gateway;
pub mod identity;
pub mod lookup;

pub use gateway::HttpRecordGateway;
pub use identity::StaticIdentity;
pub use lookup::PostalLookupClient;

use medireg_core::GatewayError;

pub(crate) fn build_client() -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves `app` on an ephemeral local port and returns its base URL.
    pub async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A local URL nothing is listening on.
    pub async fn refused() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}
