use crate::shared::database::Database;
use crate::domains::wallet::services::state::WalletState;
use crate::shared::clients::{PaymentGateway, PaystackClient};
use anyhow::Result;
use std::sync::Arc;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub wallet_state: WalletState,
}

impl AppState {
    /// Create AppState with database
    /// 결제 게이트웨이 클라이언트를 만들고 도메인 State를 초기화
    pub fn new(db: Database) -> Result<Self> {
        // Paystack secret key (서명 검증과 API 인증에 공용)
        let paystack_secret_key = std::env::var("PAYSTACK_SECRET_KEY")
            .unwrap_or_else(|_| "sk_test_change-in-production".to_string());

        let gateway: Arc<dyn PaymentGateway> = Arc::new(PaystackClient::new(paystack_secret_key)?);

        Ok(Self::with_gateway(db, gateway))
    }

    /// Create AppState with a custom payment gateway
    /// 테스트에서 MockPaymentGateway를 주입할 때 사용
    pub fn with_gateway(db: Database, gateway: Arc<dyn PaymentGateway>) -> Self {
        let wallet_state = WalletState::new(db.clone(), gateway);

        Self { db, wallet_state }
    }
}
