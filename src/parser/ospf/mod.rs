//! OSPFv2 decoding and encoding.
mod ip_header;
mod lsa;
mod packets;

pub use ip_header::parse_ipv4_header;
pub use lsa::{parse_lsa, parse_lsa_header, parse_lsa_headers};
pub use packets::{decode_ospf_packet, parse_ospf_header, parse_ospf_packet};
