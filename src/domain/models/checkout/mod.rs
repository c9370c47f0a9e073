pub mod checkout_session;

pub use checkout_session::{
    CheckoutMetadata, CheckoutPaymentStatus, CheckoutSession, NewCheckoutSession,
};
