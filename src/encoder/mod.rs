/*!
Writing MRT: framing records, size-bounded rotating output, periodic prefix-table dumps, and
the splice and clean tools built on top of them.
*/
pub mod clean;
pub mod mrt_writer;
pub mod splice;
pub mod table_encoder;

pub use clean::{clean, CleanStats};
pub use mrt_writer::{
    timestamped_file_name, write_record, RotatingMrtWriter, WriterConfig, DEFAULT_FILE_SIZE,
    MIN_FILE_SIZE,
};
pub use splice::{splice, TimeWindow};
pub use table_encoder::{
    snapshot_table, PrefixTable, RouteTableEntry, TableDumpConfig, TableDumper,
};
