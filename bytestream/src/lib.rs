//! Bounds-checked byte cursor for the Photon decoder.
//!
//! This crate provides [`ByteReader`] and [`ByteWriter`] for big-endian
//! byte-level decoding and encoding. Every other decoder layer reads through
//! [`ByteReader`].
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No partial reads** - A failed read never moves the cursor.
//! - **No domain knowledge** - This crate knows nothing about commands, fragments, or type tags.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u8(3).write_i32(-42);
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u8().unwrap(), 3);
//! assert_eq!(reader.read_i32().unwrap(), -42);
//! assert!(reader.read_u8().is_err());
//! ```

mod error;
mod reader;
mod writer;

pub use error::{ReadError, ReadResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;
