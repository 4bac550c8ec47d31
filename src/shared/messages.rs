// 시스템 메시지 상수
// System message constants (API 응답에 쓰이는 사용자용 문구 모음)

// ==================== WALLET MESSAGES ====================
pub const WALLET_BALANCE_RETRIEVED: &str = "Wallet balance retrieved successfully.";

// ==================== TRANSACTION MESSAGES ====================
pub const TRANSACTION_HISTORY_RETRIEVED: &str = "Transaction history retrieved successfully.";
pub const TRANSACTION_STATUS_RETRIEVED: &str = "Transaction status retrieved successfully.";

// ==================== TRANSFER MESSAGES ====================
pub const TRANSFER_SUCCESSFUL: &str = "Transfer completed successfully.";
pub const TRANSFER_FAILED: &str = "Transfer failed. Please try again.";

// ==================== PAYSTACK MESSAGES ====================
pub const PAYSTACK_INIT_SUCCESS: &str = "Paystack deposit initialized successfully.";
pub const PAYSTACK_INIT_FAILED: &str = "Failed to initialize Paystack transaction.";
pub const PAYSTACK_VERIFICATION_FAILED: &str = "Failed to verify Paystack transaction.";
