//! Shared plumbing: the error type, endpoint configuration, the request
//! executor and the XML pull-parser helpers used by every client.

mod config;
mod error;
mod http;
pub mod xml;

pub use config::*;
pub use error::*;
pub use http::{RequestExecutor, parse_url};
