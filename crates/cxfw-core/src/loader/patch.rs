//! Patch staging descriptor
//!
//! Records in the patch address range are not written to their address.
//! Instead the low three address bytes, a length byte and the payload are
//! written to the staging buffer, and the device copies them into place
//! when the update control register is triggered:
//!
//! ```text
//! [0] addr[3]  [1] addr[2]  [2] addr[1]  [3] data_len - 1  [4..] payload
//! ```
//!
//! The most significant address byte only selects the patch range and is
//! not transmitted.

use crate::error::{Error, Result};
use crate::srec::{Record, MAX_PAYLOAD_LEN};

/// Staging header length
pub const HEADER_LEN: usize = 4;

/// Largest descriptor that can be staged
pub const MAX_DESCRIPTOR_LEN: usize = HEADER_LEN + MAX_PAYLOAD_LEN;

/// Wire image of one patch record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDescriptor {
    bytes: heapless::Vec<u8, MAX_DESCRIPTOR_LEN>,
}

impl PatchDescriptor {
    /// Build the descriptor for a data record
    pub fn from_record(record: &Record) -> Result<Self> {
        let addr = record.address();
        let data_len = record.data_len();
        if data_len == 0 {
            return Err(Error::EmptyPatch { addr });
        }

        let [_, a1, a2, a3] = record.address;
        let header = [a3, a2, a1, (data_len - 1) as u8];
        // Capacity is sized for the header plus a full payload
        let bytes = header.iter().chain(record.payload.iter()).copied().collect();

        Ok(Self { bytes })
    }

    /// Bytes to write to the staging buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Patched location as seen by the device (low 24 bits of the address)
    pub fn target(&self) -> u32 {
        u32::from_le_bytes([self.bytes[0], self.bytes[1], self.bytes[2], 0])
    }

    /// Payload carried by this descriptor
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srec::decode_record;

    #[test]
    fn test_descriptor_layout() {
        let (record, _) = decode_record(b"S3078000005012345A\r\n", 0).unwrap();
        let desc = PatchDescriptor::from_record(&record).unwrap();

        assert_eq!(desc.as_bytes(), &[0x50, 0x00, 0x00, 0x01, 0x12, 0x34]);
        assert_eq!(desc.target(), 0x50);
        assert_eq!(desc.payload(), &[0x12, 0x34]);
    }

    #[test]
    fn test_descriptor_drops_top_byte() {
        let record = Record::data(0x8012_3456, &[0xAA]).unwrap();
        let desc = PatchDescriptor::from_record(&record).unwrap();

        assert_eq!(desc.as_bytes(), &[0x56, 0x34, 0x12, 0x00, 0xAA]);
        assert_eq!(desc.target(), 0x12_3456);
    }

    #[test]
    fn test_descriptor_length_byte() {
        let payload = [0x5Au8; 250];
        let record = Record::data(0x8000_0000, &payload).unwrap();
        let desc = PatchDescriptor::from_record(&record).unwrap();

        assert_eq!(desc.as_bytes().len(), 254);
        assert_eq!(desc.as_bytes()[3], 249);
    }

    #[test]
    fn test_empty_patch_rejected() {
        let record = Record::data(0x8000_0010, &[]).unwrap();
        assert_eq!(
            PatchDescriptor::from_record(&record),
            Err(Error::EmptyPatch { addr: 0x8000_0010 })
        );
    }
}
