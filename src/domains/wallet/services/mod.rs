// Wallet domain services
pub mod deposit_service;
pub mod history_service;
pub mod state;
pub mod transfer_service;
pub mod wallet_service;

pub use deposit_service::DepositService;
pub use history_service::HistoryService;
pub use transfer_service::TransferService;
pub use wallet_service::WalletService;
