//! Tagged-value decoder.

use bytestream::ByteReader;

use crate::error::{DecodeError, DecodeResult, LimitKind};
use crate::limits::Limits;
use crate::table::ParameterTable;
use crate::types::TypeCode;
use crate::value::{Value, ValueMap};

/// Decodes one value whose type code is already known.
///
/// `Unknown` and `Null` consume no bytes and yield [`Value::Null`].
pub fn decode_value(
    reader: &mut ByteReader<'_>,
    code: TypeCode,
    limits: &Limits,
) -> DecodeResult<Value> {
    Deserializer::new(limits).value(reader, code)
}

/// Reads a one-byte tag, then the value it selects.
///
/// An unrecognized tag fails with [`DecodeError::UnrecognizedType`] and leaves
/// the reader where it was.
pub fn decode_tagged(reader: &mut ByteReader<'_>, limits: &Limits) -> DecodeResult<Value> {
    Deserializer::new(limits).tagged(reader)
}

/// Decodes a parameter table: a `u16` count, then `(id, tag, value)` entries.
pub fn decode_parameter_table(
    reader: &mut ByteReader<'_>,
    limits: &Limits,
) -> DecodeResult<ParameterTable> {
    Deserializer::new(limits).table(reader)
}

/// Tracks nesting depth and the value budget across one top-level decode.
struct Deserializer<'l> {
    limits: &'l Limits,
    depth: usize,
    values: usize,
}

impl<'l> Deserializer<'l> {
    const fn new(limits: &'l Limits) -> Self {
        Self {
            limits,
            depth: 0,
            values: 0,
        }
    }

    fn tag(reader: &mut ByteReader<'_>) -> DecodeResult<TypeCode> {
        let position = reader.position();
        let raw = reader.peek_u8()?;
        let code =
            TypeCode::from_raw(raw).ok_or(DecodeError::UnrecognizedType { code: raw, position })?;
        reader.skip(1)?;
        Ok(code)
    }

    fn tagged(&mut self, reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
        let code = Self::tag(reader)?;
        self.value(reader, code)
    }

    fn value(&mut self, reader: &mut ByteReader<'_>, code: TypeCode) -> DecodeResult<Value> {
        self.charge()?;
        let value = match code {
            TypeCode::Unknown | TypeCode::Null => Value::Null,
            TypeCode::Byte => Value::Byte(reader.read_u8()?),
            TypeCode::Boolean => Value::Boolean(reader.read_u8()? != 0),
            TypeCode::Short => Value::Short(reader.read_u16()?),
            TypeCode::Integer => Value::Integer(reader.read_i32()?),
            TypeCode::Long => Value::Long(reader.read_i64()?),
            TypeCode::Float => Value::Float(reader.read_f32()?),
            TypeCode::Double => Value::Double(reader.read_f64()?),
            TypeCode::String => Value::String(Self::string(reader)?),
            TypeCode::ByteArray => Value::ByteArray(self.byte_array(reader)?),
            TypeCode::StringArray => {
                let count = self.count(reader)?;
                let mut strings = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    strings.push(Self::string(reader)?);
                }
                Value::StringArray(strings)
            }
            TypeCode::IntegerArray => {
                let position = reader.position();
                let raw = reader.read_i32()?;
                let count = usize::try_from(raw)
                    .map_err(|_| DecodeError::NegativeLength { value: raw, position })?;
                self.check_collection(count)?;
                let mut ints = Vec::with_capacity(count.min(reader.remaining() / 4));
                for _ in 0..count {
                    ints.push(reader.read_i32()?);
                }
                Value::IntegerArray(ints)
            }
            TypeCode::Array => self.nested(|de| de.array(reader))?,
            TypeCode::ObjectArray => self.nested(|de| {
                let count = de.count(reader)?;
                let mut values = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    values.push(de.tagged(reader)?);
                }
                Ok(Value::ObjectArray(values))
            })?,
            TypeCode::Dictionary => self.nested(|de| de.dictionary(reader))?,
            TypeCode::Hashtable => self.nested(|de| {
                let count = de.count(reader)?;
                let mut entries = ValueMap::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    let key = de.tagged(reader)?;
                    let value = de.tagged(reader)?;
                    entries.insert(key, value);
                }
                Ok(Value::Hashtable(entries))
            })?,
            TypeCode::OperationRequest => self.nested(|de| {
                let operation_code = reader.read_u8()?;
                let parameters = de.table(reader)?;
                Ok(Value::OperationRequest {
                    operation_code,
                    parameters,
                })
            })?,
            TypeCode::OperationResponse => self.nested(|de| {
                let operation_code = reader.read_u8()?;
                let return_code = reader.read_i16()?;
                let debug_message = Box::new(de.tagged(reader)?);
                let parameters = de.table(reader)?;
                Ok(Value::OperationResponse {
                    operation_code,
                    return_code,
                    debug_message,
                    parameters,
                })
            })?,
        };
        Ok(value)
    }

    fn table(&mut self, reader: &mut ByteReader<'_>) -> DecodeResult<ParameterTable> {
        self.nested(|de| {
            let count = de.count(reader)?;
            let mut table = ParameterTable::new();
            for _ in 0..count {
                let id = reader.read_u8()?;
                let value = de.tagged(reader)?;
                table.insert(id, value);
            }
            Ok(table)
        })
    }

    fn array(&mut self, reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
        let count = self.count(reader)?;
        let element = Self::tag(reader)?;
        let mut values = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            values.push(self.value(reader, element)?);
        }
        Ok(Value::Array { element, values })
    }

    fn dictionary(&mut self, reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
        let key = Self::tag(reader)?;
        let value = Self::tag(reader)?;
        let count = self.count(reader)?;
        let mut entries = ValueMap::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let k = self.slot(reader, key)?;
            let v = self.slot(reader, value)?;
            entries.insert(k, v);
        }
        Ok(Value::Dictionary {
            key,
            value,
            entries,
        })
    }

    /// Decodes a dictionary slot; dynamic slots carry a per-entry tag.
    fn slot(&mut self, reader: &mut ByteReader<'_>, code: TypeCode) -> DecodeResult<Value> {
        if code.is_dynamic() {
            self.tagged(reader)
        } else {
            self.value(reader, code)
        }
    }

    fn string(reader: &mut ByteReader<'_>) -> DecodeResult<String> {
        let len = usize::from(reader.read_u16()?);
        if len == 0 {
            return Ok(String::new());
        }
        Ok(reader.read_str(len)?.to_owned())
    }

    fn byte_array(&self, reader: &mut ByteReader<'_>) -> DecodeResult<Vec<u8>> {
        let len = usize::try_from(reader.read_u32()?).unwrap_or(usize::MAX);
        if len > self.limits.max_byte_array_len {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::ByteArrayLength,
                limit: self.limits.max_byte_array_len,
                actual: len,
            });
        }
        Ok(reader.read_bytes(len)?.to_vec())
    }

    fn count(&self, reader: &mut ByteReader<'_>) -> DecodeResult<usize> {
        let count = usize::from(reader.read_u16()?);
        self.check_collection(count)?;
        Ok(count)
    }

    fn charge(&mut self) -> DecodeResult<()> {
        self.values += 1;
        if self.values > self.limits.max_total_values {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::TotalValues,
                limit: self.limits.max_total_values,
                actual: self.values,
            });
        }
        Ok(())
    }

    fn check_collection(&self, count: usize) -> DecodeResult<()> {
        if count > self.limits.max_collection_len {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::CollectionLength,
                limit: self.limits.max_collection_len,
                actual: count,
            });
        }
        Ok(())
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> DecodeResult<T>) -> DecodeResult<T> {
        if self.depth >= self.limits.max_depth {
            return Err(DecodeError::DepthExceeded {
                max_depth: self.limits.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
