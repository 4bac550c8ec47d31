// External API clients
pub mod mock;
pub mod paystack;

pub use mock::MockPaymentGateway;
pub use paystack::{PaymentGateway, PaystackClient};
