/*!
Data structures for the decoded messages: BGP, IS-IS, OSPFv2 and the MRT records that carry
them.

The types here hold data only. Decoding lives in [crate::parser], and every type that goes
back on the wire has its `encode()` next to its decoder.
*/

mod bgp;
mod isis;
mod message;
mod mrt;
mod network;
mod ospf;

pub use bgp::*;
pub use isis::*;
pub use message::*;
pub use mrt::*;
pub use network::*;
pub use ospf::*;
