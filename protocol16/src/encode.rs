//! Reference encoder, the inverse of [`crate::decode`].
//!
//! The decoder is the production path; the encoder exists to build fixtures
//! for tests, fuzzing seeds and tooling.

use bytestream::ByteWriter;

use crate::error::{EncodeError, EncodeResult};
use crate::table::ParameterTable;
use crate::types::TypeCode;
use crate::value::{Value, ValueMap};

/// Writes a value's tag byte followed by its payload.
pub fn encode_tagged(writer: &mut ByteWriter, value: &Value) -> EncodeResult<()> {
    writer.write_u8(value.type_code().raw());
    encode_value(writer, value)
}

/// Writes a value's payload without a tag.
pub fn encode_value(writer: &mut ByteWriter, value: &Value) -> EncodeResult<()> {
    match value {
        Value::Null => {}
        Value::Byte(v) => {
            writer.write_u8(*v);
        }
        Value::Boolean(v) => {
            writer.write_u8(u8::from(*v));
        }
        Value::Short(v) => {
            writer.write_u16(*v);
        }
        Value::Integer(v) => {
            writer.write_i32(*v);
        }
        Value::Long(v) => {
            writer.write_i64(*v);
        }
        Value::Float(v) => {
            writer.write_f32(*v);
        }
        Value::Double(v) => {
            writer.write_f64(*v);
        }
        Value::String(s) => write_string(writer, s)?,
        Value::StringArray(strings) => {
            write_count(writer, strings.len())?;
            for s in strings {
                write_string(writer, s)?;
            }
        }
        Value::IntegerArray(ints) => {
            let count = i32::try_from(ints.len()).map_err(|_| EncodeError::LengthOverflow {
                length: ints.len(),
                max: i32::MAX as usize,
            })?;
            writer.write_i32(count);
            for v in ints {
                writer.write_i32(*v);
            }
        }
        Value::ByteArray(bytes) => {
            let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::LengthOverflow {
                length: bytes.len(),
                max: u32::MAX as usize,
            })?;
            writer.write_u32(len).write_bytes(bytes);
        }
        Value::Array { element, values } => {
            write_count(writer, values.len())?;
            writer.write_u8(element.raw());
            for v in values {
                write_slot(writer, *element, v, false)?;
            }
        }
        Value::ObjectArray(values) => {
            write_count(writer, values.len())?;
            for v in values {
                encode_tagged(writer, v)?;
            }
        }
        Value::Dictionary {
            key,
            value,
            entries,
        } => {
            writer.write_u8(key.raw()).write_u8(value.raw());
            write_count(writer, entries.len())?;
            for (k, v) in entries.iter() {
                write_slot(writer, *key, k, true)?;
                write_slot(writer, *value, v, true)?;
            }
        }
        Value::Hashtable(entries) => write_hashtable(writer, entries)?,
        Value::OperationRequest {
            operation_code,
            parameters,
        } => {
            writer.write_u8(*operation_code);
            encode_parameter_table(writer, parameters)?;
        }
        Value::OperationResponse {
            operation_code,
            return_code,
            debug_message,
            parameters,
        } => {
            writer.write_u8(*operation_code).write_i16(*return_code);
            encode_tagged(writer, debug_message)?;
            encode_parameter_table(writer, parameters)?;
        }
    }
    Ok(())
}

/// Writes a parameter table in ascending id order.
pub fn encode_parameter_table(writer: &mut ByteWriter, table: &ParameterTable) -> EncodeResult<()> {
    write_count(writer, table.len())?;
    for (id, value) in table.iter() {
        writer.write_u8(id);
        encode_tagged(writer, value)?;
    }
    Ok(())
}

fn write_hashtable(writer: &mut ByteWriter, entries: &ValueMap) -> EncodeResult<()> {
    write_count(writer, entries.len())?;
    for (k, v) in entries.iter() {
        encode_tagged(writer, k)?;
        encode_tagged(writer, v)?;
    }
    Ok(())
}

/// Writes one element of a typed container.
///
/// A dynamic slot in a dictionary is written tagged; in an array it only
/// admits nulls, which take no bytes.
fn write_slot(
    writer: &mut ByteWriter,
    slot: TypeCode,
    value: &Value,
    tag_dynamic: bool,
) -> EncodeResult<()> {
    if slot.is_dynamic() {
        if tag_dynamic {
            return encode_tagged(writer, value);
        }
        if value.is_null() {
            return Ok(());
        }
    } else if value.type_code() == slot {
        return encode_value(writer, value);
    }
    Err(EncodeError::TypeMismatch {
        expected: slot,
        found: value.type_code(),
    })
}

fn write_string(writer: &mut ByteWriter, s: &str) -> EncodeResult<()> {
    write_count(writer, s.len())?;
    writer.write_bytes(s.as_bytes());
    Ok(())
}

fn write_count(writer: &mut ByteWriter, len: usize) -> EncodeResult<()> {
    let count = u16::try_from(len).map_err(|_| EncodeError::LengthOverflow {
        length: len,
        max: usize::from(u16::MAX),
    })?;
    writer.write_u16(count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: &Value) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        encode_tagged(&mut writer, value).unwrap();
        writer.finish()
    }

    #[test]
    fn tagged_string_layout() {
        assert_eq!(
            encoded(&Value::String("ab".into())),
            vec![b's', 0, 2, b'a', b'b']
        );
    }

    #[test]
    fn byte_array_has_u32_length() {
        assert_eq!(
            encoded(&Value::ByteArray(vec![9])),
            vec![b'x', 0, 0, 0, 1, 9]
        );
    }

    #[test]
    fn array_layout_is_count_then_tag() {
        let value = Value::Array {
            element: TypeCode::Byte,
            values: vec![Value::Byte(1), Value::Byte(2)],
        };
        assert_eq!(encoded(&value), vec![b'y', 0, 2, b'b', 1, 2]);
    }

    #[test]
    fn array_rejects_mixed_elements() {
        let value = Value::Array {
            element: TypeCode::Byte,
            values: vec![Value::Byte(1), Value::Integer(2)],
        };
        let err = encode_tagged(&mut ByteWriter::new(), &value).unwrap_err();
        assert_eq!(
            err,
            EncodeError::TypeMismatch {
                expected: TypeCode::Byte,
                found: TypeCode::Integer
            }
        );
    }

    #[test]
    fn string_too_long() {
        let value = Value::String("x".repeat(70_000));
        let err = encode_tagged(&mut ByteWriter::new(), &value).unwrap_err();
        assert!(matches!(err, EncodeError::LengthOverflow { length: 70_000, .. }));
    }

    #[test]
    fn dictionary_dynamic_slot_is_tagged() {
        let entries: ValueMap = [(Value::Byte(1), Value::Boolean(true))].into_iter().collect();
        let value = Value::Dictionary {
            key: TypeCode::Byte,
            value: TypeCode::Null,
            entries,
        };
        assert_eq!(encoded(&value), vec![b'D', b'b', b'*', 0, 1, 1, b'o', 1]);
    }

    #[test]
    fn parameter_table_layout() {
        let table = ParameterTable::from([(252, Value::Short(3)), (0, Value::Byte(7))]);
        let mut writer = ByteWriter::new();
        encode_parameter_table(&mut writer, &table).unwrap();
        assert_eq!(writer.finish(), vec![0, 2, 0, b'b', 7, 252, b'k', 0, 3]);
    }
}
