use crate::shared::database::{Database, TransactionRepository, WalletRepository};
use crate::domains::wallet::models::{
    Transaction, TransactionCreate, TransactionStatus, TransactionType, Wallet,
};
use crate::domains::wallet::services::WalletService;
use crate::shared::errors::WalletError;
use crate::shared::utils::generate_transaction_reference;

/// 이체 서비스
/// TransferService: atomic wallet-to-wallet transfers
///
/// 원자성 규칙:
/// - 송신자 차감 + 수신자 입금 + 원장 기록은 같이 커밋되거나 같이 롤백
/// - 실패한 이체는 원장에 아무 흔적도 남기지 않음 (입금의 pending과 다른 점)
///
/// 데드락 규칙:
/// - 두 지갑 행은 항상 id 오름차순으로 잠근다.
///   반대 방향의 동시 이체가 서로의 락을 기다리는 교착을 방지.
#[derive(Clone)]
pub struct TransferService {
    db: Database,
    wallet_service: WalletService,
}

impl TransferService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database, wallet_service: WalletService) -> Self {
        Self { db, wallet_service }
    }

    /// 지갑 간 이체
    /// Transfer between wallets
    ///
    /// # Arguments
    /// * `user_id` - 송신자 사용자 ID
    /// * `recipient_wallet_number` - 수신자 지갑 번호
    /// * `amount` - 이체 금액 (kobo)
    ///
    /// # Returns
    /// * `Ok((sender_wallet, transaction))` - 차감 반영된 송신자 지갑과 생성된 원장 기록
    pub async fn transfer(
        &self,
        user_id: u64,
        recipient_wallet_number: &str,
        amount: u64,
    ) -> Result<(Wallet, Transaction), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }

        // 1. 송신자 지갑 조회/생성
        let sender_wallet = self.wallet_service.get_or_create_wallet(user_id).await?;

        // 2. 본인 이체 차단
        if sender_wallet.wallet_number == recipient_wallet_number {
            return Err(WalletError::SelfTransfer);
        }

        // 3. 수신자 지갑 확인
        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let recipient_wallet = wallet_repo
            .get_by_wallet_number(recipient_wallet_number)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(WalletError::RecipientNotFound)?;

        // 4. 잔액 사전 확인 (결과가 오래됐을 수 있으므로 커밋 시점에 다시 검증)
        // Pre-check balance (re-validated under lock, this result can be stale)
        if sender_wallet.balance < amount {
            return Err(WalletError::InsufficientBalance);
        }

        // 5. 원자적 이체 실행
        let (sender_wallet, transaction) = self
            .execute_transfer(&sender_wallet, &recipient_wallet, amount)
            .await?;

        tracing::info!(
            "Transfer successful: {} -> {} - {}",
            sender_wallet.wallet_number,
            recipient_wallet_number,
            amount
        );

        Ok((sender_wallet, transaction))
    }

    /// 이체 본체: 락 -> 차감 -> 입금 -> 원장 기록 -> 커밋
    /// Execute transfer inside one unit of work
    async fn execute_transfer(
        &self,
        sender: &Wallet,
        recipient: &Wallet,
        amount: u64,
    ) -> Result<(Wallet, Transaction), WalletError> {
        let mut tx = self.db.pool().begin().await.map_err(|e| {
            WalletError::DatabaseError(format!("Failed to begin transaction: {}", e))
        })?;

        // 두 지갑을 전역 고정 순서(id 오름차순)로 잠금
        // Lock both wallets in canonical order
        let (first_id, second_id) = if sender.id < recipient.id {
            (sender.id, recipient.id)
        } else {
            (recipient.id, sender.id)
        };

        let first = WalletRepository::lock_by_id(&mut tx, first_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to lock wallet: {}", e)))?
            .ok_or(WalletError::WalletNotFound { id: first_id })?;
        let second = WalletRepository::lock_by_id(&mut tx, second_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to lock wallet: {}", e)))?
            .ok_or(WalletError::WalletNotFound { id: second_id })?;

        // 잠긴 상태의 송신자 잔액으로 재검증
        // Re-validate with the locked sender balance
        let locked_sender = if first.id == sender.id { &first } else { &second };
        if locked_sender.balance < amount {
            return Err(WalletError::InsufficientBalance);
        }

        // 차감: UPDATE 문의 balance >= amount 조건이 최종 방어선
        // Debit: the conditional UPDATE is the final floor check
        let sender_wallet = WalletRepository::debit(&mut tx, sender.id, amount)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to debit wallet: {}", e)))?
            .ok_or(WalletError::InsufficientBalance)?;

        WalletRepository::credit(&mut tx, recipient.id, amount)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to credit wallet: {}", e)))?;

        // 원장 기록: 송신자 쪽 한 행만 생성. 수신자 내역은
        // recipient_wallet_number로 재구성된다.
        // Single ledger row on the sender's side
        let reference = generate_transaction_reference();
        let transaction = TransactionRepository::create_in_tx(
            &mut tx,
            &TransactionCreate {
                wallet_id: sender.id,
                transaction_type: TransactionType::Transfer.as_str().to_string(),
                amount,
                status: TransactionStatus::Success.as_str().to_string(),
                reference,
                recipient_wallet_number: Some(recipient.wallet_number.clone()),
            },
        )
        .await
        .map_err(|e| WalletError::DatabaseError(format!("Failed to record transfer: {}", e)))?;

        tx.commit().await.map_err(|e| {
            WalletError::DatabaseError(format!("Failed to commit transfer: {}", e))
        })?;

        Ok((sender_wallet, transaction))
    }
}
