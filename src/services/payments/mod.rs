pub mod checkout_gateway;
mod payment_ledger;
pub mod payment_service;

pub use checkout_gateway::{CheckoutGateway, InMemoryCheckoutGateway, StripeCheckoutGateway};
pub use payment_service::PaymentService;
