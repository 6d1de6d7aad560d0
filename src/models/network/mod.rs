//! Common network-related structs.

mod afi;
mod prefix;

pub use afi::*;
pub use prefix::*;
