pub mod messages;
pub mod mrt_header;
pub mod mrt_record;

pub use messages::*;
pub use mrt_header::parse_common_header;
pub use mrt_record::{chunk_mrt_record, parse_mrt_body, parse_mrt_record, RawMrtRecord};
