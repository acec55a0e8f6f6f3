pub mod clipboard;
pub mod http;
