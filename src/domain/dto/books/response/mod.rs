pub mod book_response;

pub use book_response::*;
