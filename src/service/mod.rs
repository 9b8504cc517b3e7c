//! Request handling around the calculations.
//!
//! - [`request`] - route dispatch and the JSON response envelope
//! - [`dns`] - DNS record queries through a resolver handle

pub mod dns;
pub mod request;

pub use dns::{
    mx_value, query_records, soa_value, DnsError, DnsRecord, RecordResolver, RecordSet,
    RecordType, SystemResolver,
};
pub use request::{ApiError, Response, Service, ROUTES};
