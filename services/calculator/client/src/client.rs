use derive_more::Display;
use serde::Deserialize;

use crate::model::{CalculationRequest, CalculationResponse};

#[derive(Debug, Display)]
pub enum ClientError {
    #[display(fmt = "Transport Error: {}", _0)]
    Transport(String),

    #[display(fmt = "Rejected with status {}: {}", status, message)]
    Rejected { status: u16, message: String },
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

pub struct CalculatorClient {
    post_url: String,
    client: reqwest::Client,
}

impl CalculatorClient {
    pub fn new(client: reqwest::Client, upstream: String) -> CalculatorClient {
        CalculatorClient {
            post_url: format!("{}/api/v1/calculation", upstream.trim_end_matches('/')),
            client,
        }
    }

    /// Submits `request` and returns the service's response, which carries
    /// either the result or the classified evaluation errors
    pub async fn make_calculation(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, ClientError> {
        let response = self.client.post(&self.post_url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CalculationResponse>()
            .await
            .map_err(ClientError::from)
    }
}
