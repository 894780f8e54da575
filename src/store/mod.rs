//!  Storage is organized through [record_store::CsvRecordStore].
//!  The basic idea is:
//!   - There is a directory with one table per user.
//!   - A table is a flat comma-separated file with a header row.
//!   - Every mutation rewrites the whole table; nothing is edited in place.

pub mod csv;
pub mod entities;
pub mod record_store;
