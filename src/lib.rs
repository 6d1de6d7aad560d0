/*!
rtkit decodes and re-encodes routing-protocol control traffic: BGP-4 messages, IS-IS PDUs and
OSPFv2 packets, together with the MRT archive format that timestamps and tags them.

# Reading MRT archives

```no_run
use rtkit::RtkitParser;

let parser = RtkitParser::new("updates.20240101.0000.gz").unwrap();
for record in parser {
    println!("{} {:?}", record.common_header.timestamp, record.common_header.entry_type);
}
```

Records whose body cannot be decoded are skipped with a warning; the MRT length field is
enough to find the next one. Use [RtkitParser::into_raw_record_iter] to get every record
framed but undecoded.

# Decoding single messages

```
use bytes::Bytes;
use rtkit::parser::parse_bgp_message;
use rtkit::models::BgpMessage;

let mut data = Bytes::from_static(&[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x13, 0x04,
]);
assert_eq!(parse_bgp_message(&mut data).unwrap(), BgpMessage::KeepAlive);
```

Every decoded type has an `encode()` that writes it back byte for byte, so captured traffic
can be filtered and rewritten without loss. Data this crate does not understand (unknown
path attributes, TLVs, LSA types) is kept raw rather than dropped.

# Live BGP streams

[parser::BgpStreamFramer] cuts a TCP byte stream into whole BGP messages, resynchronizing on
the 16-byte marker when it lands in the middle of one.

# Writing archives and table dumps

The [encoder] module has a size-rotating MRT writer, the prefix table that replays UPDATEs
into periodic TABLE_DUMP snapshots, and the splice and clean tools built on them.
*/

pub mod encoder;
pub mod error;
pub mod models;
pub mod parser;

pub use error::{ParserError, ParserErrorWithBytes};
pub use parser::iters::{RawRecordIterator, RecordIterator};
pub use parser::{ParserOptions, RtkitParser};
