//! Common types, request parameter parsing, and errors shared across `ssl-server-info` crates.

pub mod error;
pub mod params;
pub mod protocol;

pub use error::ServiceError;
pub use params::ParamMap;
pub use protocol::SslInfoResponse;
