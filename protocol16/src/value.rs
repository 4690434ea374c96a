//! Decoded tagged values.

use crate::table::ParameterTable;
use crate::types::TypeCode;

/// A decoded Protocol16 value.
///
/// Each variant corresponds to exactly one [`TypeCode`]; `Unknown` and `Null`
/// both decode to [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null,
    Byte(u8),
    Boolean(bool),
    /// Two bytes, read unsigned.
    Short(u16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    StringArray(Vec<String>),
    IntegerArray(Vec<i32>),
    ByteArray(Vec<u8>),
    /// Homogeneous array sharing one element tag.
    Array {
        element: TypeCode,
        values: Vec<Value>,
    },
    /// Heterogeneous array; every element carries its own tag.
    ObjectArray(Vec<Value>),
    /// Typed dictionary. A dynamic slot type (`Unknown`/`Null`) means each
    /// entry carries its own tag for that slot.
    Dictionary {
        key: TypeCode,
        value: TypeCode,
        entries: ValueMap,
    },
    Hashtable(ValueMap),
    OperationRequest {
        operation_code: u8,
        parameters: ParameterTable,
    },
    OperationResponse {
        operation_code: u8,
        return_code: i16,
        debug_message: Box<Value>,
        parameters: ParameterTable,
    },
}

impl Value {
    /// Returns the type code this value is encoded with.
    #[must_use]
    pub const fn type_code(&self) -> TypeCode {
        match self {
            Self::Null => TypeCode::Null,
            Self::Byte(_) => TypeCode::Byte,
            Self::Boolean(_) => TypeCode::Boolean,
            Self::Short(_) => TypeCode::Short,
            Self::Integer(_) => TypeCode::Integer,
            Self::Long(_) => TypeCode::Long,
            Self::Float(_) => TypeCode::Float,
            Self::Double(_) => TypeCode::Double,
            Self::String(_) => TypeCode::String,
            Self::StringArray(_) => TypeCode::StringArray,
            Self::IntegerArray(_) => TypeCode::IntegerArray,
            Self::ByteArray(_) => TypeCode::ByteArray,
            Self::Array { .. } => TypeCode::Array,
            Self::ObjectArray(_) => TypeCode::ObjectArray,
            Self::Dictionary { .. } => TypeCode::Dictionary,
            Self::Hashtable(_) => TypeCode::Hashtable,
            Self::OperationRequest { .. } => TypeCode::OperationRequest,
            Self::OperationResponse { .. } => TypeCode::OperationResponse,
        }
    }

    /// Returns a short human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_code().name()
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Widens any integral variant to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(i64::from(v)),
            Self::Short(v) => Some(i64::from(v)),
            Self::Integer(v) => Some(i64::from(v)),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a float for `Float`, or a narrowed `Double`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            Self::Double(v) => Some(v as f32),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteArray(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

/// Insertion-ordered key/value entries with unique keys.
///
/// Inserting an existing key replaces its value in place, keeping the
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
