// 지갑 라우터
// Wallet router
use axum::{routing::{get, post}, Router};
use crate::domains::wallet::handlers::wallet_handler;
use crate::shared::services::AppState;

// 지갑 라우터 생성
// Create wallet router
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/deposit", post(wallet_handler::deposit))  // 인증 필요
        .route("/paystack/webhook", post(wallet_handler::handle_webhook))  // 서명으로 인증
        .route("/balance", get(wallet_handler::get_balance))  // 인증 필요
        .route("/transfer", post(wallet_handler::transfer))  // 인증 필요
        .route("/deposit/:reference/status", get(wallet_handler::get_deposit_status))  // 인증 필요
        .route("/transactions", get(wallet_handler::get_transactions))  // 인증 필요
}
