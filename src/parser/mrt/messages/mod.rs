use crate::models::MrtMessage;
use bytes::Bytes;

pub(crate) mod bgp;
pub(crate) mod bgp4mp;
pub(crate) mod isis;
pub(crate) mod ospf;
pub(crate) mod table_dump;

pub use bgp::parse_mrt_bgp;
pub use bgp4mp::{parse_bgp4mp, parse_bgp4mp_message, parse_bgp4mp_state_change};
pub use isis::parse_mrt_isis;
pub use ospf::parse_mrt_ospf;
pub use table_dump::parse_table_dump_message;

impl MrtMessage {
    pub fn encode(&self) -> Bytes {
        match self {
            MrtMessage::Ospf(m) => m.encode(),
            MrtMessage::TableDump(m) => m.encode(),
            MrtMessage::Bgp(m) => m.encode(),
            MrtMessage::Bgp4Mp(m) => m.encode(),
            MrtMessage::Isis(m) => m.encode(),
        }
    }
}
