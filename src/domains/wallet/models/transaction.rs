use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use chrono::{DateTime, Utc};

// DB 저장용 Transaction 모델 (원장 레코드)
// Note: PostgreSQL BIGINT는 signed이므로 조회 시 수동으로 i64 -> u64 변환
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = Transaction)]
pub struct Transaction {
    /// Transaction ID (BIGSERIAL, auto-generated)
    pub id: u64,

    /// 거래가 속한 지갑 ID (입금: 입금받는 지갑, 이체: 송신자 지갑)
    /// Owning wallet ID (deposit: credited wallet, transfer: sender wallet)
    pub wallet_id: u64,

    /// 거래 종류 (deposit, transfer)
    #[serde(rename = "type")]
    pub transaction_type: String,

    /// 금액 (kobo, 음수 불가능)
    pub amount: u64,

    /// 거래 상태 (pending, success, failed)
    pub status: String,

    /// 거래 reference (고유, 웹훅 멱등성 처리의 기준)
    pub reference: String,

    /// 수신자 지갑 번호 (이체일 때만 설정)
    /// Recipient wallet number (set only for transfers)
    pub recipient_wallet_number: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Transaction 생성 payload
/// Transaction create payload
#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub wallet_id: u64,
    pub transaction_type: String,
    pub amount: u64,
    pub status: String,
    pub reference: String,
    pub recipient_wallet_number: Option<String>,
}

// 거래 종류 enum (DB 저장용)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,  // 외부 결제 게이트웨이를 통한 입금
    Transfer, // 지갑 간 이체
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Transfer => "transfer",
        }
    }
}

// 거래 상태 enum (DB 저장용)
// 입금은 pending으로 시작, 이체는 success로만 생성됨
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending, // 게이트웨이 확정 대기 중
    Success, // 확정됨 (잔액 반영 완료)
    Failed,  // 실패로 확정됨
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }
}

/// 거래 내역 조회 쿼리 파라미터
/// Transaction history query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TransactionHistoryQuery {
    /// 페이지 번호 (1부터 시작, 기본값 1)
    pub page: Option<u32>,

    /// 페이지 크기 (기본값 20)
    pub limit: Option<u32>,

    /// 거래 종류 필터 (deposit, transfer)
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,

    /// 거래 상태 필터 (pending, success, failed)
    pub status: Option<String>,

    /// 방향 필터 (deposit, sent, received)
    pub direction: Option<String>,
}

/// 거래 내역 필터 (repository 전달용)
/// History filter passed down to the repository
#[derive(Debug, Default, Clone)]
pub struct HistoryFilter {
    pub transaction_type: Option<String>,
    pub status: Option<String>,
    pub direction: Option<String>,
}

/// 거래 내역 항목
/// Transaction history item
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionHistoryItem)]
pub struct TransactionHistoryItem {
    /// 거래 종류
    #[serde(rename = "type")]
    pub transaction_type: String,

    /// 금액 (kobo)
    pub amount: u64,

    /// 거래 상태
    pub status: String,

    /// 방향 (deposit, sent, received) - 저장값이 아닌 파생값
    /// Direction (derived per querying wallet, not stored)
    pub direction: String,

    /// 거래 reference
    pub reference: String,

    /// 거래 시각
    pub timestamp: DateTime<Utc>,
}

/// 페이지네이션 메타데이터
/// Pagination metadata (필터 적용 후 기준으로 계산)
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = PaginationMeta)]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationMeta {
    /// 필터 적용 후 전체 건수를 기준으로 페이지 정보 계산
    /// total_pages = ceil(total / limit)
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let total_pages = total.div_ceil(limit as u64) as u32;
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

/// 거래 내역 응답
/// Transaction history response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionHistoryResponse)]
pub struct TransactionHistoryResponse {
    pub message: String,
    pub data: Vec<TransactionHistoryItem>,
    pub pagination: PaginationMeta,
}

/// 거래 상태 조회 응답
/// Transaction status response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionStatusResponse)]
pub struct TransactionStatusResponse {
    /// 거래 reference
    pub reference: String,

    /// 거래 상태 (pending, success, failed)
    pub status: String,

    /// 금액 (kobo)
    pub amount: u64,

    /// 메시지
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta_exact_pages() {
        // 40건, 페이지당 20건 -> 2페이지
        let meta = PaginationMeta::new(40, 1, 20);
        assert_eq!(meta.total_pages, 2);
        assert!(meta.has_next);
        assert!(!meta.has_previous);
    }

    #[test]
    fn test_pagination_meta_with_remainder() {
        // 41건, 페이지당 20건 -> 3페이지
        let meta = PaginationMeta::new(41, 3, 20);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn test_pagination_meta_empty() {
        let meta = PaginationMeta::new(0, 1, 20);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_previous);
    }

    #[test]
    fn test_status_and_type_as_str() {
        assert_eq!(TransactionStatus::Pending.as_str(), "pending");
        assert_eq!(TransactionStatus::Success.as_str(), "success");
        assert_eq!(TransactionStatus::Failed.as_str(), "failed");
        assert_eq!(TransactionType::Deposit.as_str(), "deposit");
        assert_eq!(TransactionType::Transfer.as_str(), "transfer");
    }
}
