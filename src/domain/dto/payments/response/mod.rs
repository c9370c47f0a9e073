pub mod payment_response;

pub use payment_response::*;
