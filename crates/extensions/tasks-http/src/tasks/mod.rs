//! HTTP task implementations.

mod call;
mod http_get;
mod http_request;

pub use http_get::HttpGetTask;
pub use http_request::HttpRequestTask;
