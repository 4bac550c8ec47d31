// Wallet domain state
// 지갑 도메인 상태
use crate::shared::database::Database;
use crate::domains::wallet::services::{
    DepositService, HistoryService, TransferService, WalletService,
};
use crate::shared::clients::PaymentGateway;
use std::sync::Arc;

/// Wallet domain state
/// 지갑 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct WalletState {
    pub wallet_service: WalletService,
    pub deposit_service: DepositService,
    pub transfer_service: TransferService,
    pub history_service: HistoryService,
}

impl WalletState {
    /// Create WalletState with database and payment gateway
    /// WalletState 생성 (데이터베이스 + 결제 게이트웨이 필요)
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>) -> Self {
        let wallet_service = WalletService::new(db.clone());

        Self {
            deposit_service: DepositService::new(db.clone(), gateway, wallet_service.clone()),
            transfer_service: TransferService::new(db.clone(), wallet_service.clone()),
            history_service: HistoryService::new(db, wallet_service.clone()),
            wallet_service,
        }
    }
}
