use crate::shared::database::{Database, WalletRepository};
use crate::domains::wallet::models::Wallet;
use crate::shared::errors::WalletError;
use crate::shared::utils::generate_wallet_number;

/// 지갑 번호 충돌 시 최대 재시도 횟수
/// 13자리 hex 난수라 충돌 확률은 사실상 0이며, 계속 실패하면 다른 문제가 있는 것
const WALLET_NUMBER_MAX_RETRIES: u32 = 5;

/// 지갑 서비스
/// WalletService: handles wallet creation and balance lookup
#[derive(Clone)]
pub struct WalletService {
    db: Database,
}

impl WalletService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 지갑 조회 또는 생성 (lazy 생성)
    /// Get or create wallet for user
    ///
    /// 사용자의 지갑이 없으면 잔액 0, 새 지갑 번호로 생성한다.
    /// 같은 사용자에 대한 동시 최초 호출은 user_id unique 제약이 중복 생성을 막고,
    /// 제약에 걸린 쪽은 먼저 생성된 지갑을 다시 조회해서 반환한다.
    pub async fn get_or_create_wallet(&self, user_id: u64) -> Result<Wallet, WalletError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        // 1. 기존 지갑 확인
        // Check existing wallet
        if let Some(wallet) = wallet_repo
            .get_by_user_id(user_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
        {
            return Ok(wallet);
        }

        // 2. 새 지갑 생성 (지갑 번호 충돌 시 재생성)
        // Create new wallet (regenerate wallet number on collision)
        for _ in 0..WALLET_NUMBER_MAX_RETRIES {
            let wallet_number = generate_wallet_number();

            match wallet_repo.create(user_id, &wallet_number).await {
                Ok(wallet) => {
                    tracing::info!(
                        "Wallet created for user {}: {}",
                        user_id,
                        wallet.wallet_number
                    );
                    return Ok(wallet);
                }
                Err(e) => {
                    // unique 제약 위반 구분: 에러 체인 전체에서 제약 이름 확인
                    let error_msg = format!("{:#}", e);
                    if error_msg.contains("wallets_user_id_key") {
                        // 동시 최초 호출 경합: 다른 요청이 먼저 생성함
                        return wallet_repo
                            .get_by_user_id(user_id)
                            .await
                            .map_err(|e| {
                                WalletError::DatabaseError(format!(
                                    "Failed to fetch wallet: {}",
                                    e
                                ))
                            })?
                            .ok_or_else(|| {
                                WalletError::Internal(
                                    "Wallet creation conflicted but wallet not found".to_string(),
                                )
                            });
                    } else if error_msg.contains("wallets_wallet_number_key") {
                        // 지갑 번호 충돌: 번호 재생성 후 재시도
                        continue;
                    } else {
                        return Err(WalletError::DatabaseError(format!(
                            "Failed to save wallet to database: {}",
                            e
                        )));
                    }
                }
            }
        }

        Err(WalletError::Internal(
            "Failed to generate a unique wallet number".to_string(),
        ))
    }

    /// 잔액 조회 (지갑이 없으면 생성)
    /// Get balance (creates the wallet lazily if missing)
    pub async fn get_balance(&self, user_id: u64) -> Result<Wallet, WalletError> {
        self.get_or_create_wallet(user_id).await
    }
}
