//! Protocol16 tagged values for the Photon decoder.
//!
//! Every value on the wire is preceded (or implied) by a one-byte
//! [`TypeCode`]. This crate provides:
//! - [`Value`], the decoded value tree
//! - [`ParameterTable`], the `u8 -> Value` map carried by every message
//! - A bounded decoder ([`decode_tagged`], [`decode_parameter_table`])
//! - A reference encoder used for fixtures and tooling
//!
//! # Design Principles
//!
//! - **Bounded work** - Counts are checked against [`Limits`] before iterating.
//! - **No coercion** - Builders read parameters through typed accessors that
//!   fail with [`ParameterError`].
//! - **Unknown tags are errors** - The reader is left at the offending tag.

mod decode;
mod encode;
mod error;
mod limits;
mod table;
mod types;
mod value;

pub use decode::{decode_parameter_table, decode_tagged, decode_value};
pub use encode::{encode_parameter_table, encode_tagged, encode_value};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, LimitKind};
pub use limits::Limits;
pub use table::{ParameterError, ParameterTable};
pub use types::TypeCode;
pub use value::{Value, ValueMap};

/// Parameter id carrying the event code override.
pub const EVENT_CODE_PARAMETER: u8 = 252;

/// Parameter id carrying the operation code of a request.
pub const OPERATION_CODE_PARAMETER: u8 = 253;
