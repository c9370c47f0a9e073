pub mod comment_request;

pub use comment_request::*;
