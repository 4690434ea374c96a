//! Byte-level writer for encoding big-endian data.

/// A growable big-endian byte writer.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

macro_rules! be_writes {
    ($($ty:ty => $write:ident;)*) => {
        $(
            #[doc = concat!("Writes a big-endian `", stringify!($ty), "`.")]
            pub fn $write(&mut self, value: $ty) -> &mut Self {
                self.bytes.extend_from_slice(&value.to_be_bytes());
                self
            }
        )*
    };
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    be_writes! {
        u8 => write_u8;
        i8 => write_i8;
        u16 => write_u16;
        i16 => write_i16;
        u32 => write_u32;
        i32 => write_i32;
        u64 => write_u64;
        i64 => write_i64;
        f32 => write_f32;
        f64 => write_f64;
    }

    /// Writes raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Overwrites previously written bytes at `offset`.
    ///
    /// Returns `false` (and writes nothing) if the range is not fully written yet.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) -> bool {
        match self.bytes.get_mut(offset..offset.saturating_add(bytes.len())) {
            Some(slot) => {
                slot.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }
}
