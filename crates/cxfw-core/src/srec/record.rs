//! Decoded image records

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Largest payload a record may carry
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Width of the normalized address field
pub const ADDRESS_LEN: usize = 4;

/// Line terminator required after every record
pub const LINE_TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Record payload, bounded to [`MAX_PAYLOAD_LEN`]
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

/// Record types accepted in a firmware image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// `S3`: data with a 32-bit address
    Data,
    /// `S7`: end of a block, 32-bit start address
    End,
}

impl RecordType {
    /// Map the type digit following `'S'` to a record type
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            3 => Some(Self::Data),
            7 => Some(Self::End),
            _ => None,
        }
    }

    /// The type digit for this record type
    pub fn code(self) -> u8 {
        match self {
            Self::Data => 3,
            Self::End => 7,
        }
    }

    /// Address field width in bytes
    ///
    /// Data types widen with the type code (S1..S3), termination types
    /// narrow with it (S9..S7). Both accepted types land on 4 bytes.
    pub fn address_len(self) -> usize {
        match self {
            Self::Data => self.code() as usize + 1,
            Self::End => 11 - self.code() as usize,
        }
    }
}

/// One decoded record of a firmware image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record type
    pub record_type: RecordType,
    /// Address bytes, big-endian, right-aligned to 4 bytes
    pub address: [u8; ADDRESS_LEN],
    /// Payload bytes
    pub payload: Payload,
    /// Declared length of address + payload + checksum
    pub record_len: u8,
    /// Declared checksum byte, if its digits were well-formed (not verified)
    pub checksum: Option<u8>,
}

impl Record {
    /// Create a data record
    ///
    /// Returns `None` if `payload` exceeds what a single record can carry.
    pub fn data(address: u32, payload: &[u8]) -> Option<Self> {
        Self::with_payload(RecordType::Data, address, payload)
    }

    /// Create an end record
    pub fn end(address: u32) -> Self {
        let mut record = Self {
            record_type: RecordType::End,
            address: address.to_be_bytes(),
            payload: Payload::new(),
            record_len: (RecordType::End.address_len() + 1) as u8,
            checksum: None,
        };
        record.checksum = Some(record.computed_checksum());
        record
    }

    fn with_payload(record_type: RecordType, address: u32, payload: &[u8]) -> Option<Self> {
        let record_len = record_type.address_len() + payload.len() + 1;
        if record_len > u8::MAX as usize {
            return None;
        }
        let mut record = Self {
            record_type,
            address: address.to_be_bytes(),
            payload: Payload::from_slice(payload).ok()?,
            record_len: record_len as u8,
            checksum: None,
        };
        record.checksum = Some(record.computed_checksum());
        Some(record)
    }

    /// Address as a 32-bit value
    pub fn address(&self) -> u32 {
        u32::from_be_bytes(self.address)
    }

    /// Number of payload bytes
    pub fn data_len(&self) -> usize {
        self.payload.len()
    }

    /// True for end records
    pub fn is_end(&self) -> bool {
        self.record_type == RecordType::End
    }

    /// Number of image bytes this record occupies, terminator included
    pub fn encoded_len(&self) -> usize {
        6 + self.record_len as usize * 2
    }

    /// Checksum the record should carry: ones' complement of the byte sum
    /// of length, address and payload
    pub fn computed_checksum(&self) -> u8 {
        let sum = self
            .address
            .iter()
            .chain(self.payload.iter())
            .fold(self.record_len, |acc, &b| acc.wrapping_add(b));
        !sum
    }

    /// Encode the record as an image line, terminator included
    #[cfg(feature = "alloc")]
    pub fn to_line(&self) -> Vec<u8> {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";

        fn push_byte(line: &mut Vec<u8>, b: u8) {
            line.push(HEX[(b >> 4) as usize]);
            line.push(HEX[(b & 0x0F) as usize]);
        }

        let mut line = Vec::with_capacity(self.encoded_len());

        line.push(b'S');
        line.push(b'0' + self.record_type.code());
        push_byte(&mut line, self.record_len);
        let skip = ADDRESS_LEN - self.record_type.address_len();
        for &b in &self.address[skip..] {
            push_byte(&mut line, b);
        }
        for &b in &self.payload {
            push_byte(&mut line, b);
        }
        push_byte(
            &mut line,
            self.checksum.unwrap_or_else(|| self.computed_checksum()),
        );
        line.extend_from_slice(&LINE_TERMINATOR);
        line
    }
}
