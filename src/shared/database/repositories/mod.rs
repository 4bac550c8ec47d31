// Repositories module
pub mod wallet;

pub use wallet::*;
