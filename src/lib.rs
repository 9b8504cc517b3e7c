//! Network address utilities.
//!
//! IPv4/IPv6 subnet calculation, address summarization, representation
//! conversion, subnet division and IPv4 <-> IPv6 mapping, plus DNS record
//! queries through a resolver handle. [`service::Service`] dispatches JSON
//! requests onto these operations.

pub mod config;
pub mod error;
mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod service;

pub use config::Config;
pub use error::NetError;
pub use logging::init_logging;
pub use service::{Response, Service};
