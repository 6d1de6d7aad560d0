//! IS-IS decoding, encoding and a minimal passive speaker.
pub mod adjacency;
pub mod frame;
pub mod hello;
pub mod padding;
pub mod pdus;
pub mod tlvs;

pub use adjacency::{Adjacency, AdjacencyState, AdjacencyTable};
pub use frame::parse_isis_frame;
pub use hello::{build_lan_hello, IsisSpeakerConfig};
pub use padding::{pad_frame, padding_tlvs};
pub use pdus::parse_isis_pdu;
pub use tlvs::parse_tlvs;
