pub mod book_request;

pub use book_request::*;
