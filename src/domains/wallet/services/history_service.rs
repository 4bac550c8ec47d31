use crate::shared::database::{Database, TransactionRepository, WalletRepository};
use crate::domains::wallet::models::{
    HistoryFilter, PaginationMeta, Transaction, TransactionHistoryItem, TransactionHistoryQuery,
    TransactionType, Wallet,
};
use crate::domains::wallet::services::WalletService;
use crate::shared::errors::WalletError;

/// 기본 페이지 크기
const DEFAULT_PAGE_LIMIT: u32 = 20;

/// 거래 내역 서비스 (읽기 전용)
/// HistoryService: read-only transaction history queries
///
/// 기준 집합: 지갑이 소유한 행(입금/보낸 이체) + 수신자로 등장하는 행(받은 이체).
/// direction은 저장값이 아니라 조회하는 지갑 기준으로 파생된다.
#[derive(Clone)]
pub struct HistoryService {
    db: Database,
    wallet_service: WalletService,
}

impl HistoryService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database, wallet_service: WalletService) -> Self {
        Self { db, wallet_service }
    }

    /// 거래 내역 조회 (필터 + 페이지네이션)
    /// Get transaction history with filters and pagination
    ///
    /// 페이지네이션 메타데이터는 모든 필터(direction 포함) 적용 후 건수 기준.
    pub async fn get_transactions(
        &self,
        user_id: u64,
        query: &TransactionHistoryQuery,
    ) -> Result<(Vec<TransactionHistoryItem>, PaginationMeta), WalletError> {
        let wallet = self.wallet_service.get_or_create_wallet(user_id).await?;

        let page = query.page.unwrap_or(1).max(1);
        let limit = match query.limit {
            Some(0) | None => DEFAULT_PAGE_LIMIT,
            Some(limit) => limit,
        };
        let offset = (page - 1) as i64 * limit as i64;

        let filter = HistoryFilter {
            transaction_type: query.transaction_type.clone(),
            status: query.status.clone(),
            direction: query.direction.clone(),
        };

        let transaction_repo = TransactionRepository::new(self.db.pool().clone());

        let total = transaction_repo
            .count_for_wallet(wallet.id, &wallet.wallet_number, &filter)
            .await
            .map_err(|e| {
                WalletError::DatabaseError(format!("Failed to count transactions: {}", e))
            })?;

        let transactions = transaction_repo
            .find_for_wallet(
                wallet.id,
                &wallet.wallet_number,
                &filter,
                limit as i64,
                offset,
            )
            .await
            .map_err(|e| {
                WalletError::DatabaseError(format!("Failed to fetch transactions: {}", e))
            })?;

        let items = transactions
            .iter()
            .map(|transaction| TransactionHistoryItem {
                transaction_type: transaction.transaction_type.clone(),
                amount: transaction.amount,
                status: transaction.status.clone(),
                direction: derive_direction(transaction, &wallet).to_string(),
                reference: transaction.reference.clone(),
                timestamp: transaction.created_at,
            })
            .collect();

        Ok((items, PaginationMeta::new(total, page, limit)))
    }

    /// 입금 상태 조회
    /// Get deposit transaction status by reference
    ///
    /// 본인 지갑의 거래만 조회 가능. 남의 reference는 존재 여부를
    /// 노출하지 않기 위해 똑같이 not found로 응답한다.
    pub async fn get_transaction_status(
        &self,
        user_id: u64,
        reference: &str,
    ) -> Result<Transaction, WalletError> {
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        let transaction = transaction_repo
            .get_by_reference(reference)
            .await
            .map_err(|e| {
                WalletError::DatabaseError(format!("Failed to fetch transaction: {}", e))
            })?
            .ok_or(WalletError::TransactionNotFound)?;

        // 소유권 확인
        // Ownership check
        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let wallet = wallet_repo
            .get_by_id(transaction.wallet_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(WalletError::TransactionNotFound)?;

        if wallet.user_id != user_id {
            return Err(WalletError::TransactionNotFound);
        }

        Ok(transaction)
    }
}

/// 거래 방향 파생
/// Derive the display direction of a transaction for the querying wallet
///
/// - deposit 타입 -> "deposit"
/// - transfer 타입이고 지갑이 소유자 -> "sent"
/// - transfer 타입이고 지갑이 수신자 -> "received"
pub fn derive_direction(transaction: &Transaction, wallet: &Wallet) -> &'static str {
    if transaction.transaction_type == TransactionType::Deposit.as_str() {
        "deposit"
    } else if transaction.wallet_id == wallet.id {
        "sent"
    } else if transaction.recipient_wallet_number.as_deref() == Some(&wallet.wallet_number) {
        "received"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::wallet::models::TransactionStatus;
    use chrono::Utc;

    fn test_wallet(id: u64, wallet_number: &str) -> Wallet {
        Wallet {
            id,
            user_id: id,
            wallet_number: wallet_number.to_string(),
            balance: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_transaction(
        wallet_id: u64,
        transaction_type: TransactionType,
        recipient: Option<&str>,
    ) -> Transaction {
        Transaction {
            id: 1,
            wallet_id,
            transaction_type: transaction_type.as_str().to_string(),
            amount: 500,
            status: TransactionStatus::Success.as_str().to_string(),
            reference: "TXN_1_a".to_string(),
            recipient_wallet_number: recipient.map(|r| r.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_direction_deposit() {
        let wallet = test_wallet(1, "aaaaaaaaaaaaa");
        let transaction = test_transaction(1, TransactionType::Deposit, None);
        assert_eq!(derive_direction(&transaction, &wallet), "deposit");
    }

    #[test]
    fn test_direction_sent() {
        let wallet = test_wallet(1, "aaaaaaaaaaaaa");
        let transaction = test_transaction(1, TransactionType::Transfer, Some("bbbbbbbbbbbbb"));
        assert_eq!(derive_direction(&transaction, &wallet), "sent");
    }

    #[test]
    fn test_direction_received() {
        // 수신자 지갑 입장에서는 남의 행이지만 recipient_wallet_number가 일치
        let wallet = test_wallet(2, "bbbbbbbbbbbbb");
        let transaction = test_transaction(1, TransactionType::Transfer, Some("bbbbbbbbbbbbb"));
        assert_eq!(derive_direction(&transaction, &wallet), "received");
    }
}
