pub mod attributes;
pub mod messages;
pub mod stream;

pub use messages::{parse_bgp_message, parse_bgp_message_body};
pub use stream::{BgpStreamFramer, RawBgpMessage};
