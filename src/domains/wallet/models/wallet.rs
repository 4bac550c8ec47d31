use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};

// DB 저장용 Wallet 모델
// Note: PostgreSQL BIGINT는 signed이므로 조회 시 수동으로 i64 -> u64 변환
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = Wallet)]
pub struct Wallet {
    /// Wallet ID (BIGSERIAL, auto-generated)
    /// 지갑 ID (DB에서 자동 생성, 음수 불가능)
    pub id: u64,

    /// 소유자 ID (외부 인증 서비스의 사용자 식별자)
    /// Owner ID (user identifier from the external auth service)
    pub user_id: u64,

    /// 지갑 번호 (13자리, 이체 시 상대방 주소로 사용)
    /// Wallet number (13 characters, used as the transfer address)
    pub wallet_number: String,

    /// 잔액 (최소 화폐 단위 kobo, 음수 불가능)
    /// Balance in kobo (minor currency unit)
    pub balance: u64,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// 입금 요청
/// Deposit request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = DepositRequest)]
pub struct DepositRequest {
    /// 입금할 금액 (kobo)
    /// Amount to deposit in kobo
    #[schema(example = 5000)]
    pub amount: u64,
}

/// 입금 초기화 응답
/// Deposit initialization response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = DepositResponse)]
pub struct DepositResponse {
    /// 거래 reference (상태 조회에 사용)
    /// Transaction reference (used for status polling)
    pub reference: String,

    /// Paystack 결제 페이지 URL
    /// Paystack authorization URL
    pub authorization_url: String,

    /// 메시지
    /// Message
    pub message: String,
}

/// 잔액 조회 응답
/// Wallet balance response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = BalanceResponse)]
pub struct BalanceResponse {
    /// 잔액 (kobo)
    /// Balance in kobo
    #[schema(example = 15000)]
    pub balance: u64,

    /// 지갑 번호
    /// Wallet number
    #[schema(example = "4566678954356")]
    pub wallet_number: String,

    /// 메시지
    /// Message
    pub message: String,
}

/// 이체 요청
/// Transfer request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = TransferRequest)]
pub struct TransferRequest {
    /// 수신자 지갑 번호
    /// Recipient wallet number
    #[schema(example = "4566678954356")]
    pub wallet_number: String,

    /// 이체할 금액 (kobo)
    /// Amount to transfer in kobo
    #[schema(example = 3000)]
    pub amount: u64,
}

/// 이체 응답
/// Transfer response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransferResponse)]
pub struct TransferResponse {
    /// 이체 상태
    /// Transfer status
    pub status: String,

    /// 송신자 지갑 번호
    /// Sender wallet number
    pub sender_wallet_number: String,

    /// 수신자 지갑 번호
    /// Recipient wallet number
    pub recipient_wallet_number: String,

    /// 거래 reference
    /// Transaction reference
    pub reference: String,

    /// 메시지
    /// Message
    pub message: String,
}
