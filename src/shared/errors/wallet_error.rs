use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 지갑 관련 에러
/// Wallet-related errors
///
/// 검증 실패류 (잔액 부족, 본인 이체 등)는 호출자가 처리 가능한 결과로 반환하고,
/// 저장소/게이트웨이 장애만 Internal 계열로 분류한다.
#[derive(Error, Debug)]
pub enum WalletError {
    /// 잔액 부족
    /// Insufficient wallet balance
    #[error("Insufficient wallet balance.")]
    InsufficientBalance,

    /// 본인 지갑으로 이체 시도
    /// Cannot transfer to own wallet
    #[error("Cannot transfer to your own wallet.")]
    SelfTransfer,

    /// 수신자 지갑을 찾을 수 없음
    /// Recipient wallet not found
    #[error("Recipient wallet not found.")]
    RecipientNotFound,

    /// 잘못된 금액 (0 이하)
    /// Invalid amount
    #[error("Amount must be greater than zero.")]
    InvalidAmount,

    /// reference 중복
    /// Duplicate transaction reference
    #[error("Transaction with this reference already exists: {reference}")]
    DuplicateReference { reference: String },

    /// 웹훅 서명 검증 실패
    /// Invalid webhook signature
    #[error("Invalid Paystack webhook signature.")]
    SignatureInvalid,

    /// 지갑을 찾을 수 없음
    /// Wallet not found
    #[error("Wallet not found: id={id}")]
    WalletNotFound { id: u64 },

    /// 거래를 찾을 수 없음
    /// Transaction not found
    #[error("Transaction not found.")]
    TransactionNotFound,

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러 (게이트웨이 호출 실패 포함)
    /// Internal server error (including gateway call failures)
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// WalletError를 HTTP 응답으로 변환
impl From<WalletError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: WalletError) -> Self {
        let (status, message) = match &err {
            WalletError::InsufficientBalance => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            WalletError::SelfTransfer => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            WalletError::RecipientNotFound => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            WalletError::InvalidAmount => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            WalletError::DuplicateReference { .. } => {
                (StatusCode::CONFLICT, err.to_string())
            }
            WalletError::SignatureInvalid => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            WalletError::WalletNotFound { .. } => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            WalletError::TransactionNotFound => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            WalletError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            WalletError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "error": message })))
    }
}
