mod client;

pub use client::{HttpCommentApi, HttpConfig};
