pub mod comment_response;

pub use comment_response::*;
