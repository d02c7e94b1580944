use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use seatwise_core::payment::{ChargeRequest, PaymentError, PaymentGateway, PaymentReceipt};

/// Payment adapter against the provider's HTTP charge API. The client's
/// request timeout is the gateway timeout; callers apply no shorter
/// bound.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentReceipt, PaymentError> {
        let payload = json!({
            "amount": request.amount,
            "card": request.card,
        });

        let mut http_request = self
            .client
            .post(format!("{}/v1/charges", self.base_url))
            .json(&payload);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                PaymentError::Timeout
            } else {
                PaymentError::Provider(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| PaymentError::Provider(e.to_string()))?;
            let reference = body["reference"].as_str().unwrap_or_default().to_string();
            return Ok(PaymentReceipt {
                reference,
                amount: request.amount,
                charged_at: Utc::now(),
            });
        }

        // 402/422 are the provider's decline statuses; everything else
        // is a provider fault.
        if status == reqwest::StatusCode::PAYMENT_REQUIRED
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(PaymentError::Declined);
        }

        Err(PaymentError::Provider(format!(
            "provider returned {}",
            status
        )))
    }
}
