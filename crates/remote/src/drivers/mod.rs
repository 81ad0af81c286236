pub mod demo;
pub mod http;
