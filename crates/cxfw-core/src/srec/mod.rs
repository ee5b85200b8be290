//! Firmware image records
//!
//! CX2070x firmware ships as a Motorola S-record style text image. Only
//! `S3` (data) and `S7` (end) lines are used, each terminated by CR LF.

mod decode;
mod record;

pub use decode::{decode_record, Records};
pub use record::{Payload, Record, RecordType, ADDRESS_LEN, LINE_TERMINATOR, MAX_PAYLOAD_LEN};
