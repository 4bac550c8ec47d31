// Shared errors
pub mod wallet_error;

pub use wallet_error::*;
