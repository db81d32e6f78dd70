use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::io::{self, Read};

pub fn uvarint_encode(mut n: u64, out: &mut Vec<u8>) {
    while n >= 0x80 {
        out.push((n as u8) | 0x80);
        n >>= 7;
    }
    out.push(n as u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    Truncated,
    Overflow,
    /// Padded with a trailing zero group; the shortest form is required.
    NonCanonical,
}

/// Checked LEB128 read; never indexes past `data`. Only the shortest
/// encoding of a value is accepted, so decoded bytes re-encode identically.
pub fn uvarint_decode(data: &[u8]) -> Result<(u64, &[u8]), VarintError> {
    let mut x = 0u64;
    let mut s = 0u32;
    for (i, &b) in data.iter().enumerate() {
        if s == 63 && b > 1 {
            return Err(VarintError::Overflow);
        }
        if b < 0x80 {
            if b == 0 && i > 0 {
                return Err(VarintError::NonCanonical);
            }
            return Ok((x | ((b as u64) << s), &data[i + 1..]));
        }
        x |= ((b & 0x7F) as u64) << s;
        s += 7;
    }
    Err(VarintError::Truncated)
}

pub fn uvarint_len(mut n: u64) -> usize {
    let mut len = 1;
    while n >= 0x80 { n >>= 7; len += 1; }
    len
}

pub fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> { r.read_u64::<LE>() }
pub fn read_u16<R: Read>(r: &mut R) -> io::Result<u16> { r.read_u16::<LE>() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_boundaries() {
        for n in [0u64, 1, 0x7f, 0x80, 0x3fff, 0x4000, u32::MAX as u64, u64::MAX] {
            let mut buf = Vec::new();
            uvarint_encode(n, &mut buf);
            assert_eq!(buf.len(), uvarint_len(n));
            let (got, rest) = uvarint_decode(&buf).unwrap();
            assert_eq!(got, n);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn varint_truncated_and_overlong() {
        assert_eq!(uvarint_decode(&[]), Err(VarintError::Truncated));
        assert_eq!(uvarint_decode(&[0x80, 0x80]), Err(VarintError::Truncated));
        let overlong = [0xffu8; 11];
        assert_eq!(uvarint_decode(&overlong), Err(VarintError::Overflow));
    }

    #[test]
    fn varint_rejects_padded_forms() {
        assert_eq!(uvarint_decode(&[0x82, 0x00]), Err(VarintError::NonCanonical));
        assert_eq!(uvarint_decode(&[0x80, 0x00]), Err(VarintError::NonCanonical));
        assert_eq!(uvarint_decode(&[0x00, 0x00]), Ok((0, &[0x00][..])));
        assert_eq!(uvarint_decode(&[0x82, 0x01]), Ok((130, &[][..])));
    }
}
