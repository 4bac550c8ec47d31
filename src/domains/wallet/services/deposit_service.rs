use crate::shared::database::{Database, TransactionRepository, WalletRepository};
use crate::domains::wallet::models::{
    TransactionCreate, TransactionStatus, TransactionType,
};
use crate::domains::wallet::services::WalletService;
use crate::shared::clients::paystack::{PaystackWebhookData, PaystackWebhookEnvelope};
use crate::shared::clients::PaymentGateway;
use crate::shared::errors::WalletError;
use crate::shared::messages;
use crate::shared::utils::generate_transaction_reference;
use std::sync::Arc;

/// 입금 서비스
/// DepositService: handles deposit initiation and webhook settlement
///
/// 입금 상태 머신: pending -> success | failed (한 번만 전이, 이후 불변)
///
/// 주의:
/// - 웹훅 전달은 at-least-once: 같은 이벤트가 여러 번 와도 잔액은 한 번만 반영
/// - 상태 확인과 전이는 반드시 같은 DB 트랜잭션 안에서 수행 (동시 재전달 대비)
#[derive(Clone)]
pub struct DepositService {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
    wallet_service: WalletService,
}

impl DepositService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>, wallet_service: WalletService) -> Self {
        Self {
            db,
            gateway,
            wallet_service,
        }
    }

    /// 입금 초기화
    /// Initiate deposit
    ///
    /// 1. 지갑 조회/생성
    /// 2. pending 거래 레코드 생성 (reference 발급)
    /// 3. 게이트웨이에 거래 초기화 요청
    ///
    /// 게이트웨이 호출이 실패해도 pending 레코드는 남는다 (정산되지 않을 뿐).
    ///
    /// # Returns
    /// * `Ok((reference, authorization_url))` - 결제 페이지로 리다이렉트할 정보
    pub async fn initiate_deposit(
        &self,
        user_id: u64,
        email: &str,
        amount: u64,
    ) -> Result<(String, String), WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount);
        }

        let wallet = self.wallet_service.get_or_create_wallet(user_id).await?;
        let reference = generate_transaction_reference();

        // pending 거래 생성 (금액은 요청 그대로 kobo 단위)
        // Create pending transaction (amount already in kobo)
        let transaction_repo = TransactionRepository::new(self.db.pool().clone());
        transaction_repo
            .create(&TransactionCreate {
                wallet_id: wallet.id,
                transaction_type: TransactionType::Deposit.as_str().to_string(),
                amount,
                status: TransactionStatus::Pending.as_str().to_string(),
                reference: reference.clone(),
                recipient_wallet_number: None,
            })
            .await
            .map_err(|e| {
                let error_msg = format!("{:#}", e);
                if error_msg.contains("transactions_reference_key") {
                    WalletError::DuplicateReference {
                        reference: reference.clone(),
                    }
                } else {
                    WalletError::DatabaseError(format!("Failed to create transaction: {}", e))
                }
            })?;

        // 게이트웨이 거래 초기화
        // Initialize gateway transaction
        let init_data = self
            .gateway
            .initialize_transaction(email, amount, &reference)
            .await
            .map_err(|e| {
                tracing::error!("{}: {}", messages::PAYSTACK_INIT_FAILED, e);
                WalletError::Internal(messages::PAYSTACK_INIT_FAILED.to_string())
            })?;

        Ok((reference, init_data.authorization_url))
    }

    /// 웹훅 정산 처리
    /// Handle gateway webhook settlement
    ///
    /// 처리 순서:
    /// 1. 원본 body 바이트에 대한 서명 검증 (실패 시 아무것도 변경하지 않음)
    /// 2. charge.success 외의 이벤트는 no-op으로 수신 확인
    /// 3. reference로 거래 조회 - 없으면 no-op 수신 확인 (게이트웨이 재전달 방지)
    /// 4. 이미 정산된 거래면 no-op 수신 확인 (멱등성 가드)
    /// 5. 하나의 트랜잭션 안에서: 상태 전이 + (성공 시) 지갑 입금
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<(), WalletError> {
        // 1. 서명 검증 (보안 이벤트로 로깅)
        // Verify signature against the raw body
        if !self.gateway.verify_webhook_signature(payload, signature) {
            tracing::warn!("Rejected webhook with invalid signature");
            return Err(WalletError::SignatureInvalid);
        }

        // 2. 이벤트 파싱
        // Parse event envelope
        let envelope: PaystackWebhookEnvelope = match serde_json::from_slice(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                // 서명은 유효하지만 형식이 다른 payload: 재전달받아도 결과가 같으므로 수신 확인
                tracing::warn!("Ignoring unparseable webhook payload: {}", e);
                return Ok(());
            }
        };

        if envelope.event != "charge.success" {
            // 관심 없는 이벤트는 no-op
            return Ok(());
        }

        let data: PaystackWebhookData = match serde_json::from_value(envelope.data) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Ignoring charge event with unexpected data shape: {}", e);
                return Ok(());
            }
        };

        self.settle(&data).await
    }

    /// 정산 적용 (상태 전이 + 입금)
    /// Apply settlement: status transition + credit in one unit of work
    async fn settle(&self, data: &PaystackWebhookData) -> Result<(), WalletError> {
        let mut tx = self.db.pool().begin().await.map_err(|e| {
            WalletError::DatabaseError(format!("Failed to begin transaction: {}", e))
        })?;

        // 거래 행 잠금: 동시에 도착한 같은 reference의 웹훅을 직렬화
        // Lock the ledger row so concurrent deliveries serialize here
        let transaction = TransactionRepository::lock_by_reference(&mut tx, &data.reference)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to lock transaction: {}", e)))?;

        let transaction = match transaction {
            Some(transaction) => transaction,
            None => {
                // 모르는 reference: 우리 거래가 아님. 에러를 내면 게이트웨이가
                // 계속 재전달하므로 조용히 수신 확인한다.
                tracing::warn!("Transaction not found: {}", data.reference);
                return Ok(());
            }
        };

        // 멱등성 가드: 이미 종결된 거래는 잔액을 다시 반영하지 않음
        // Idempotency guard: never re-apply a settled transaction
        if transaction.status != TransactionStatus::Pending.as_str() {
            tracing::info!("Transaction already processed: {}", data.reference);
            return Ok(());
        }

        let new_status = if data.status == "success" {
            TransactionStatus::Success
        } else {
            TransactionStatus::Failed
        };

        let transitioned =
            TransactionRepository::transition_status(&mut tx, transaction.id, new_status.as_str())
                .await
                .map_err(|e| {
                    WalletError::DatabaseError(format!("Failed to update transaction: {}", e))
                })?;
        if !transitioned {
            // 행 잠금을 쥔 상태라 pending이 아닐 수 없음
            return Err(WalletError::Internal(
                "Status transition failed under row lock".to_string(),
            ));
        }

        // 성공 정산일 때만 입금 (이벤트가 알려준 실결제 금액 기준)
        // Credit only on success, with the amount the gateway says cleared
        if new_status == TransactionStatus::Success {
            let wallet = WalletRepository::credit(&mut tx, transaction.wallet_id, data.amount)
                .await
                .map_err(|e| {
                    WalletError::DatabaseError(format!("Failed to credit wallet: {}", e))
                })?;

            tx.commit().await.map_err(|e| {
                WalletError::DatabaseError(format!("Failed to commit settlement: {}", e))
            })?;

            tracing::info!(
                "Wallet credited: {} - {} kobo, new balance: {}",
                data.reference,
                data.amount,
                wallet.balance
            );
        } else {
            tx.commit().await.map_err(|e| {
                WalletError::DatabaseError(format!("Failed to commit settlement: {}", e))
            })?;

            tracing::info!("Deposit marked failed: {}", data.reference);
        }

        Ok(())
    }
}
