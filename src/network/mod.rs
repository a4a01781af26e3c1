//! HTTP networking module
//!
//! Defines the request-executor seam and the reqwest-backed client that
//! talks to the server's OCS API.

mod client;
mod error;
mod traits;

pub use client::HttpClient;
pub use error::RequestError;
pub use traits::*;
