use serde::Serialize;

use seatwise_core::TransactionCode;

/// Response envelope: a `status` block on every response, plus a
/// `body.data` payload on success. The code strings are the stable
/// contract.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body<T>>,
    pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct Body<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub code: String,
    pub message: String,
    pub success: bool,
}

impl Status {
    pub fn ok() -> Self {
        Self {
            code: TransactionCode::Success.id().to_string(),
            message: TransactionCode::Success.message().to_string(),
            success: true,
        }
    }

    pub fn failed(code: TransactionCode) -> Self {
        Self {
            code: code.id().to_string(),
            message: code.message().to_string(),
            success: false,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            body: Some(Body { data }),
            status: Status::ok(),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(code: TransactionCode) -> Self {
        Self {
            body: None,
            status: Status::failed(code),
        }
    }
}
