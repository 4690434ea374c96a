//! Byte-level reader with bounded operations.

use crate::error::{ReadError, ReadResult};

/// Generates a plain read and a skip-then-read variant for a big-endian primitive.
macro_rules! be_reads {
    ($($ty:ty, $size:literal => $read:ident, $read_after:ident;)*) => {
        $(
            #[doc = concat!("Reads a big-endian `", stringify!($ty), "`.")]
            pub fn $read(&mut self) -> ReadResult<$ty> {
                self.$read_after(0)
            }

            #[doc = concat!(
                "Skips `skip` bytes, then reads a big-endian `",
                stringify!($ty),
                "`.\n\nThe cursor advances by `skip + ",
                stringify!($size),
                "` only if the whole read fits."
            )]
            pub fn $read_after(&mut self, skip: usize) -> ReadResult<$ty> {
                let bytes = self.read_array::<$size>(skip)?;
                Ok(<$ty>::from_be_bytes(bytes))
            }
        )*
    };
}

/// A cursor over a borrowed byte region.
///
/// All read operations are bounds-checked and return errors on failure.
/// A failed read leaves the cursor where it was, and the reader never panics
/// on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the total length of the region.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes remaining after the cursor.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the whole underlying region, ignoring the cursor.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the bytes after the cursor without consuming them.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    be_reads! {
        u8, 1 => read_u8, read_u8_after;
        i8, 1 => read_i8, read_i8_after;
        u16, 2 => read_u16, read_u16_after;
        i16, 2 => read_i16, read_i16_after;
        u32, 4 => read_u32, read_u32_after;
        i32, 4 => read_i32, read_i32_after;
        u64, 8 => read_u64, read_u64_after;
        i64, 8 => read_i64, read_i64_after;
        f32, 4 => read_f32, read_f32_after;
        f64, 8 => read_f64, read_f64_after;
    }

    /// Returns the next byte without advancing.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        let start = self.ensure(0, 1)?;
        Ok(self.data[start])
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let start = self.ensure(0, len)?;
        self.pos = start + len;
        Ok(&self.data[start..start + len])
    }

    /// Reads `len` bytes as a UTF-8 string.
    ///
    /// Invalid UTF-8 is reported without moving the cursor.
    pub fn read_str(&mut self, len: usize) -> ReadResult<&'a str> {
        let start = self.ensure(0, len)?;
        let text =
            std::str::from_utf8(&self.data[start..start + len]).map_err(|_| {
                ReadError::InvalidUtf8 {
                    position: start,
                    len,
                }
            })?;
        self.pos = start + len;
        Ok(text)
    }

    /// Splits off the next `len` bytes as an independent reader.
    ///
    /// The returned reader starts at 0; this reader advances past the taken bytes.
    pub fn take(&mut self, len: usize) -> ReadResult<ByteReader<'a>> {
        self.read_bytes(len).map(ByteReader::new)
    }

    /// Splits off every remaining byte as an independent reader.
    pub fn take_remaining(&mut self) -> ByteReader<'a> {
        let rest = self.rest();
        self.pos = self.data.len();
        ByteReader::new(rest)
    }

    /// Advances the cursor by `len` bytes.
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        let start = self.ensure(len, 0)?;
        self.pos = start;
        Ok(())
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Seeking to `len()` is allowed and leaves the reader empty.
    pub fn seek(&mut self, position: usize) -> ReadResult<()> {
        if position > self.data.len() {
            return Err(ReadError::SeekOutOfRange {
                position,
                len: self.data.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Validates `skip + size` bytes and returns the absolute start of the value.
    fn ensure(&self, skip: usize, size: usize) -> ReadResult<usize> {
        let requested = skip.saturating_add(size);
        let available = self.remaining();
        if requested > available {
            return Err(ReadError::EndOfBuffer {
                requested,
                available,
            });
        }
        Ok(self.pos + skip)
    }

    fn read_array<const N: usize>(&mut self, skip: usize) -> ReadResult<[u8; N]> {
        let start = self.ensure(skip, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[start..start + N]);
        self.pos = start + N;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(
            result,
            Err(ReadError::EndOfBuffer {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut reader = ByteReader::new(&[7, 8]);
        assert_eq!(reader.peek_u8().unwrap(), 7);
        assert_eq!(reader.position(), 0);
        reader.skip(2).unwrap();
        assert!(reader.peek_u8().is_err());
    }

    #[test]
    fn reads_are_big_endian() {
        let mut reader = ByteReader::new(&[0x12, 0x34, 0x56, 0x78, 0xFF, 0xFE]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_after_skips_then_reads() {
        let mut reader = ByteReader::new(&[0xAA, 0xBB, 0xCC, 0x00, 0x07]);
        assert_eq!(reader.read_u8().unwrap(), 0xAA);
        assert_eq!(reader.read_u16_after(2).unwrap(), 7);
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn failed_read_after_keeps_cursor() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        reader.read_u8().unwrap();
        let err = reader.read_u16_after(2).unwrap_err();
        assert_eq!(
            err,
            ReadError::EndOfBuffer {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_u16_after(1).unwrap(), 0x0304);
    }

    #[test]
    fn floats_roundtrip_bits() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f32.to_be_bytes());
        bytes.extend_from_slice(&(-2.25f64).to_be_bytes());
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_f32().unwrap().to_bits(), 1.5f32.to_bits());
        assert_eq!(reader.read_f64().unwrap().to_bits(), (-2.25f64).to_bits());
    }

    #[test]
    fn read_i64_min() {
        let bytes = i64::MIN.to_be_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
    }

    #[test]
    fn read_str_valid() {
        let mut reader = ByteReader::new(b"hello!");
        assert_eq!(reader.read_str(5).unwrap(), "hello");
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn read_str_invalid_utf8_keeps_cursor() {
        let mut reader = ByteReader::new(&[0x61, 0xFF, 0xFE]);
        reader.read_u8().unwrap();
        let err = reader.read_str(2).unwrap_err();
        assert_eq!(err, ReadError::InvalidUtf8 { position: 1, len: 2 });
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn take_yields_independent_reader() {
        let mut reader = ByteReader::new(&[9, 1, 2, 3, 4]);
        reader.read_u8().unwrap();
        let mut sub = reader.take(3).unwrap();
        assert_eq!(reader.position(), 4);
        assert_eq!(sub.position(), 0);
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u8().unwrap(), 4);
    }

    #[test]
    fn take_past_end_fails() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert!(reader.take(3).is_err());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn take_remaining_drains_parent() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        reader.skip(1).unwrap();
        let sub = reader.take_remaining();
        assert_eq!(sub.as_slice(), &[2, 3]);
        assert!(reader.is_empty());
    }

    #[test]
    fn seek_bounds() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        reader.seek(3).unwrap();
        assert!(reader.is_empty());
        reader.seek(1).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 2);
        let err = reader.seek(4).unwrap_err();
        assert_eq!(err, ReadError::SeekOutOfRange { position: 4, len: 3 });
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn skip_past_end_fails() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert!(reader.skip(3).is_err());
        reader.skip(2).unwrap();
        assert!(reader.is_empty());
    }

    #[test]
    fn huge_skip_does_not_overflow() {
        let mut reader = ByteReader::new(&[1]);
        let err = reader.read_u32_after(usize::MAX).unwrap_err();
        assert!(matches!(err, ReadError::EndOfBuffer { .. }));
        assert_eq!(reader.position(), 0);
    }
}
