use crate::domains::wallet::models::{
    BalanceResponse, DepositRequest, DepositResponse, TransactionHistoryQuery,
    TransactionHistoryResponse, TransactionStatusResponse, TransferRequest, TransferResponse,
};
use crate::shared::services::AppState;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::errors::WalletError;
use crate::shared::messages;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

/// 입금 초기화 핸들러
/// Initiate deposit handler
#[utoipa::path(
    post,
    path = "/api/wallet/deposit",
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit initialized successfully", body = DepositResponse),
        (status = 400, description = "Bad request (invalid amount)"),
        (status = 401, description = "Unauthorized (missing identity headers)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallet"
)]
pub async fn deposit(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, (StatusCode, Json<serde_json::Value>)> {
    let (reference, authorization_url) = app_state
        .wallet_state
        .deposit_service
        .initiate_deposit(
            authenticated_user.user_id,
            &authenticated_user.email,
            request.amount,
        )
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(DepositResponse {
        reference,
        authorization_url,
        message: messages::PAYSTACK_INIT_SUCCESS.to_string(),
    }))
}

/// Paystack 웹훅 핸들러
/// Paystack webhook handler
///
/// Note: 서명은 원본 body 바이트에 대해 검증하므로 Bytes로 받는다.
/// 알 수 없는 reference나 이미 정산된 거래는 200으로 수신 확인해
/// 게이트웨이의 무한 재전달을 막는다.
#[utoipa::path(
    post,
    path = "/api/wallet/paystack/webhook",
    responses(
        (status = 200, description = "Webhook processed successfully"),
        (status = 400, description = "Invalid webhook signature"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallet"
)]
pub async fn handle_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    // 서명 헤더 누락은 서명 불일치와 동일하게 취급
    let signature = headers
        .get("x-paystack-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    app_state
        .wallet_state
        .deposit_service
        .handle_webhook(&body, signature)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(serde_json::json!({ "status": true })))
}

/// 잔액 조회 핸들러
/// Get balance handler
#[utoipa::path(
    get,
    path = "/api/wallet/balance",
    responses(
        (status = 200, description = "Wallet balance retrieved successfully", body = BalanceResponse),
        (status = 401, description = "Unauthorized (missing identity headers)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallet"
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .get_balance(authenticated_user.user_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(BalanceResponse {
        balance: wallet.balance,
        wallet_number: wallet.wallet_number,
        message: messages::WALLET_BALANCE_RETRIEVED.to_string(),
    }))
}

/// 이체 핸들러
/// Transfer handler
#[utoipa::path(
    post,
    path = "/api/wallet/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed successfully", body = TransferResponse),
        (status = 400, description = "Bad request (insufficient balance, self transfer)"),
        (status = 401, description = "Unauthorized (missing identity headers)"),
        (status = 404, description = "Recipient wallet not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallet"
)]
pub async fn transfer(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, (StatusCode, Json<serde_json::Value>)> {
    let (sender_wallet, transaction) = app_state
        .wallet_state
        .transfer_service
        .transfer(
            authenticated_user.user_id,
            &request.wallet_number,
            request.amount,
        )
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransferResponse {
        status: transaction.status,
        sender_wallet_number: sender_wallet.wallet_number,
        recipient_wallet_number: request.wallet_number,
        reference: transaction.reference,
        message: messages::TRANSFER_SUCCESSFUL.to_string(),
    }))
}

/// 입금 상태 조회 핸들러
/// Get deposit status handler
#[utoipa::path(
    get,
    path = "/api/wallet/deposit/{reference}/status",
    params(
        ("reference" = String, Path, description = "Transaction reference")
    ),
    responses(
        (status = 200, description = "Transaction status retrieved successfully", body = TransactionStatusResponse),
        (status = 401, description = "Unauthorized (missing identity headers)"),
        (status = 404, description = "Transaction not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallet"
)]
pub async fn get_deposit_status(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(reference): Path<String>,
) -> Result<Json<TransactionStatusResponse>, (StatusCode, Json<serde_json::Value>)> {
    let transaction = app_state
        .wallet_state
        .history_service
        .get_transaction_status(authenticated_user.user_id, &reference)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionStatusResponse {
        reference: transaction.reference,
        status: transaction.status,
        amount: transaction.amount,
        message: messages::TRANSACTION_STATUS_RETRIEVED.to_string(),
    }))
}

/// 거래 내역 조회 핸들러
/// Get transaction history handler
#[utoipa::path(
    get,
    path = "/api/wallet/transactions",
    params(TransactionHistoryQuery),
    responses(
        (status = 200, description = "Transaction history retrieved successfully", body = TransactionHistoryResponse),
        (status = 401, description = "Unauthorized (missing identity headers)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallet"
)]
pub async fn get_transactions(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(query): Query<TransactionHistoryQuery>,
) -> Result<Json<TransactionHistoryResponse>, (StatusCode, Json<serde_json::Value>)> {
    let (items, pagination) = app_state
        .wallet_state
        .history_service
        .get_transactions(authenticated_user.user_id, &query)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(TransactionHistoryResponse {
        message: messages::TRANSACTION_HISTORY_RETRIEVED.to_string(),
        data: items,
        pagination,
    }))
}
