//! Record decoder
//!
//! Line syntax:
//!
//! ```text
//! 'S' <type> <len:2> <address ‖ payload ‖ checksum : len*2> CR LF
//! ```
//!
//! All fields after the type digit are ASCII hex. Only types 3 and 7 occur
//! in CX2070x images and both carry a 4-byte address. The checksum byte is
//! counted in `len` but never verified.

use super::record::{Payload, Record, RecordType, ADDRESS_LEN, LINE_TERMINATOR, MAX_PAYLOAD_LEN};
use crate::error::{DecodeError, Error};

/// Offset of the first hex digit after the length field
const BODY_START: usize = 4;

/// Decode one record starting at `offset` in `image`
///
/// Returns the record and the number of image bytes it occupies, including
/// the line terminator. This is a pure function of `image` and `offset`.
pub fn decode_record(image: &[u8], offset: usize) -> Result<(Record, usize), DecodeError> {
    let line = image.get(offset..).unwrap_or(&[]);

    if line.first() != Some(&b'S') {
        return Err(DecodeError::BadFraming);
    }

    let type_char = line.get(1).copied().unwrap_or(0);
    let record_type = hex_nibble(type_char)
        .and_then(RecordType::from_code)
        .ok_or(DecodeError::UnsupportedType(type_char))?;
    let address_len = record_type.address_len();

    let record_len = line
        .get(2..BODY_START)
        .and_then(decode_byte)
        .filter(|&len| len != 0)
        .ok_or(DecodeError::BadLength)?;

    // Terminator position is fixed by the declared length
    let body_end = BODY_START + record_len as usize * 2;
    if line.get(body_end..body_end + 2) != Some(&LINE_TERMINATOR[..]) {
        return Err(DecodeError::UnterminatedLine);
    }

    // Whatever is left after the address and the checksum byte
    let data_len = (record_len as usize)
        .checked_sub(address_len + 1)
        .filter(|&len| len <= MAX_PAYLOAD_LEN)
        .ok_or(DecodeError::BadLength)?;

    let mut address = [0u8; ADDRESS_LEN];
    let address_end = BODY_START + address_len * 2;
    decode_hex(
        &line[BODY_START..address_end],
        &mut address[ADDRESS_LEN - address_len..],
    )?;

    let mut payload = Payload::new();
    payload
        .resize(data_len, 0)
        .map_err(|_| DecodeError::BadLength)?;
    decode_hex(&line[address_end..address_end + data_len * 2], &mut payload)?;

    let checksum = decode_byte(&line[body_end - 2..body_end]);

    let record = Record {
        record_type,
        address,
        payload,
        record_len,
        checksum,
    };
    Ok((record, body_end + LINE_TERMINATOR.len()))
}

/// Iterator over the records of an image
///
/// Yields `(offset, record)` pairs and stops after the first decode error.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    image: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    /// Walk `image` from its first byte
    pub fn new(image: &'a [u8]) -> Self {
        Self {
            image,
            offset: 0,
            failed: false,
        }
    }

    /// Offset of the next record
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Records<'_> {
    type Item = Result<(usize, Record), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.image.len() {
            return None;
        }

        let offset = self.offset;
        match decode_record(self.image, offset) {
            Ok((record, consumed)) => {
                self.offset += consumed;
                Some(Ok((offset, record)))
            }
            Err(kind) => {
                self.failed = true;
                Some(Err(Error::Decode { offset, kind }))
            }
        }
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn decode_byte(digits: &[u8]) -> Option<u8> {
    match digits {
        [hi, lo] => Some((hex_nibble(*hi)? << 4) | hex_nibble(*lo)?),
        _ => None,
    }
}

fn decode_hex(digits: &[u8], out: &mut [u8]) -> Result<(), DecodeError> {
    for (byte, pair) in out.iter_mut().zip(digits.chunks(2)) {
        *byte = decode_byte(pair).ok_or(DecodeError::BadHex)?;
    }
    Ok(())
}
