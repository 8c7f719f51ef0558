//! Email relay transport.
//!
//! One POST per submission, no retry. Transport failures and non-success
//! answers both come back as errors.

use std::future::Future;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RelayError, RelayResult};

/// Body posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayRequest {
    pub access_key: String,
    pub subject: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Relay answer. `message` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Something that can deliver a [`RelayRequest`].
///
/// `Ok` means the relay accepted the submission.
pub trait RelayTransport {
    fn send(&self, request: &RelayRequest) -> impl Future<Output = RelayResult<RelayResponse>> + Send;
}

/// Posts submissions to web3forms (or anything speaking its protocol).
#[derive(Debug, Clone)]
pub struct Web3FormsTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl Web3FormsTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Web3FormsTransport {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl RelayTransport for Web3FormsTransport {
    async fn send(&self, request: &RelayRequest) -> RelayResult<RelayResponse> {
        debug!(endpoint = %self.endpoint, subject = %request.subject, "Posting submission to relay");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let body: RelayResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(RelayError::Rejected {
                    status: status.as_u16(),
                    message: None,
                });
            }
            Err(e) => {
                return Err(RelayError::InvalidResponse {
                    endpoint: self.endpoint.clone(),
                    detail: e.to_string(),
                });
            }
        };

        if !status.is_success() || !body.success {
            warn!(status = status.as_u16(), message = ?body.message, "Relay did not accept submission");
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                message: body.message,
            });
        }

        Ok(body)
    }
}
