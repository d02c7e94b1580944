use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Card data collected at the boundary and passed through to the
/// provider. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetails {
    pub holder_name: String,
    pub number: String,
    pub expire_month: String,
    pub expire_year: String,
    pub cvc: String,
}

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount: Decimal,
    pub card: Option<CardDetails>,
}

#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount: Decimal,
    pub charged_at: DateTime<Utc>,
}

/// Every way a charge can fail. All variants map to transaction code 107.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PaymentError {
    #[error("charge declined by provider")]
    Declined,

    #[error("payment provider timed out")]
    Timeout,

    #[error("payment provider error: {0}")]
    Provider(String),
}

/// External payment provider. The adapter owns its own timeout; callers
/// await the charge to completion and apply no shorter bound.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentReceipt, PaymentError>;
}

/// Card number that always declines on the mock gateway.
pub const MOCK_DECLINE_CARD: &str = "4000000000000002";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    Approve,
    Decline,
    Timeout,
    ProviderError,
}

/// In-process gateway for tests and local development. The outcome is
/// switchable mid-test and every charge attempt is counted.
pub struct MockPaymentGateway {
    outcome: Mutex<MockOutcome>,
    calls: AtomicUsize,
}

impl MockPaymentGateway {
    pub fn approving() -> Self {
        Self::with_outcome(MockOutcome::Approve)
    }

    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.lock().expect("mutex poisoned") = outcome;
    }

    /// Number of charge attempts made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentReceipt, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(card) = &request.card {
            if card.number == MOCK_DECLINE_CARD {
                return Err(PaymentError::Declined);
            }
        }

        match *self.outcome.lock().expect("mutex poisoned") {
            MockOutcome::Approve => Ok(PaymentReceipt {
                reference: format!("mock_ch_{}", uuid::Uuid::new_v4().simple()),
                amount: request.amount,
                charged_at: Utc::now(),
            }),
            MockOutcome::Decline => Err(PaymentError::Declined),
            MockOutcome::Timeout => Err(PaymentError::Timeout),
            MockOutcome::ProviderError => {
                Err(PaymentError::Provider("Simulated Payment Gateway Failure".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(card: Option<CardDetails>) -> ChargeRequest {
        ChargeRequest {
            amount: dec!(100.00),
            card,
        }
    }

    #[tokio::test]
    async fn test_mock_gateway_counts_calls() {
        let gateway = MockPaymentGateway::approving();

        let receipt = gateway.charge(&request(None)).await.unwrap();
        assert_eq!(receipt.amount, dec!(100.00));
        assert_eq!(gateway.calls(), 1);

        gateway.set_outcome(MockOutcome::Decline);
        assert!(matches!(
            gateway.charge(&request(None)).await,
            Err(PaymentError::Declined)
        ));
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_decline_card_overrides_outcome() {
        let gateway = MockPaymentGateway::approving();
        let card = CardDetails {
            holder_name: "Jane Doe".to_string(),
            number: MOCK_DECLINE_CARD.to_string(),
            expire_month: "12".to_string(),
            expire_year: "2030".to_string(),
            cvc: "123".to_string(),
        };

        assert!(matches!(
            gateway.charge(&request(Some(card))).await,
            Err(PaymentError::Declined)
        ));
    }
}
