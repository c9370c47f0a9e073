//! Payments Entity Module

pub mod payment;

pub use payment::{Payment, PaymentKind, PaymentStatus};
