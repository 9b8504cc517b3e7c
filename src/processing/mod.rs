//! Address calculations.
//!
//! This module contains the pure, synchronous operations:
//! - [`codec`] - decimal/binary/hex and mask/prefix conversions
//! - [`describe`] - network calculator
//! - [`summarize`] - merging addresses and blocks into runs
//! - [`divide`] - splitting a network into equal subnets
//! - [`family`] - IPv4 <-> IPv6 mapping

pub mod codec;
mod describe;
mod divide;
mod family;
mod private;
mod summarize;

// Re-export public functions
pub use codec::{convert_batch, Conversion};
pub use describe::describe;
pub use divide::{divide, DivideType, SubnetPlan};
pub use family::{v4_to_v6, v6_to_v4};
pub use private::{is_private, is_private_addr};
pub use summarize::{summarize, summarize_cidrs};
