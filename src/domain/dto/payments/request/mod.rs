pub mod payment_request;

pub use payment_request::*;
