//! MHS outbound client
//!
//! Sends assembled outbound requests to the MHS. The trait is the boundary
//! the continuation driver depends on; [`HttpMhsClient`] is the reqwest
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

use super::request::{
    OutboundRequest, CORRELATION_ID_HEADER, INTERACTION_ID_HEADER, MESSAGE_ID_HEADER,
    ODS_CODE_HEADER, WAIT_FOR_RESPONSE_HEADER,
};
use crate::config::MhsConfig;
use crate::domain::errors::{HermesError, MhsError};
use crate::domain::result::Result;

/// Accepts a built outbound request and reports success or transport error
#[async_trait]
pub trait MhsOutboundClient: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<()>;
}

/// HTTP implementation of the MHS outbound boundary
pub struct HttpMhsClient {
    base_url: String,
    client: Client,
}

impl HttpMhsClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &MhsConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                HermesError::Configuration(format!("failed to build MHS client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MhsOutboundClient for HttpMhsClient {
    async fn send(&self, request: &OutboundRequest) -> Result<()> {
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(ODS_CODE_HEADER, &request.ods_code)
            .header(INTERACTION_ID_HEADER, request.interaction_id)
            .header(CORRELATION_ID_HEADER, &request.conversation_id)
            .header(MESSAGE_ID_HEADER, &request.message_id)
            .header(
                WAIT_FOR_RESPONSE_HEADER,
                if request.wait_for_response { "true" } else { "false" },
            )
            .json(&request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MhsError::Timeout(e.to_string())
                } else {
                    MhsError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                conversation_id = %request.conversation_id,
                "MHS accepted outbound request"
            );
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        let error = if status.is_client_error() {
            MhsError::ClientError {
                status: status.as_u16(),
                message,
            }
        } else if status.is_server_error() {
            MhsError::ServerError {
                status: status.as_u16(),
                message,
            }
        } else {
            MhsError::InvalidResponse(format!(
                "unexpected status {}: {message}",
                status.as_u16()
            ))
        };

        Err(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mhs::request::{build_continue_request, OutboundMessage};

    fn config(base_url: &str) -> MhsConfig {
        MhsConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        }
    }

    fn request() -> OutboundRequest {
        build_continue_request(
            "conv-1",
            "B83002",
            "msg-1",
            OutboundMessage::new("<COPC_IN000001UK01/>"),
        )
    }

    #[tokio::test]
    async fn test_send_success_with_expected_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("Ods-Code", "B83002")
            .match_header("Interaction-Id", "COPC_IN000001UK01")
            .match_header("Correlation-Id", "conv-1")
            .match_header("Message-Id", "msg-1")
            .match_header("wait-for-response", "false")
            .match_header("content-type", "application/json")
            .with_status(202)
            .create_async()
            .await;

        let client = HttpMhsClient::new(&config(&server.url())).unwrap();
        assert!(client.send(&request()).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_maps_client_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(404)
            .with_body("unknown recipient")
            .create_async()
            .await;

        let client = HttpMhsClient::new(&config(&server.url())).unwrap();
        let error = client.send(&request()).await.unwrap_err();
        assert!(matches!(
            error,
            HermesError::Mhs(MhsError::ClientError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_send_maps_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;

        let client = HttpMhsClient::new(&config(&server.url())).unwrap();
        let error = client.send(&request()).await.unwrap_err();
        assert!(matches!(
            error,
            HermesError::Mhs(MhsError::ServerError { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_send_maps_connection_failure() {
        let client = HttpMhsClient::new(&config("http://127.0.0.1:1")).unwrap();
        let error = client.send(&request()).await.unwrap_err();
        assert!(matches!(
            error,
            HermesError::Mhs(MhsError::ConnectionFailed(_))
        ));
    }
}
