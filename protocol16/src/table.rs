//! Parameter tables and typed accessors for message builders.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// Ordered map from one-byte parameter id to value.
///
/// Later inserts under the same id overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParameterTable(BTreeMap<u8, Value>);

/// Reasons a builder rejects a parameter table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParameterError {
    /// A required parameter is absent.
    Missing { id: u8 },

    /// A parameter has the wrong shape.
    TypeMismatch {
        id: u8,
        expected: &'static str,
        found: &'static str,
    },

    /// A sequence parameter is shorter than required.
    TooShort { id: u8, needed: usize, actual: usize },

    /// A parameter has the right shape but an unusable value.
    InvalidValue { id: u8, reason: &'static str },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { id } => write!(f, "missing parameter {id}"),
            Self::TypeMismatch {
                id,
                expected,
                found,
            } => {
                write!(f, "parameter {id}: expected {expected}, found {found}")
            }
            Self::TooShort { id, needed, actual } => {
                write!(
                    f,
                    "parameter {id}: needs at least {needed} elements, has {actual}"
                )
            }
            Self::InvalidValue { id, reason } => {
                write!(f, "parameter {id}: {reason}")
            }
        }
    }
}

impl std::error::Error for ParameterError {}

impl ParameterTable {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a parameter, returning the value it replaced.
    pub fn insert(&mut self, id: u8, value: Value) -> Option<Value> {
        self.0.insert(id, value)
    }

    #[must_use]
    pub fn get(&self, id: u8) -> Option<&Value> {
        self.0.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: u8) -> bool {
        self.0.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates parameters in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Value)> {
        self.0.iter().map(|(id, value)| (*id, value))
    }

    /// Returns the parameter or [`ParameterError::Missing`].
    pub fn require(&self, id: u8) -> Result<&Value, ParameterError> {
        self.get(id).ok_or(ParameterError::Missing { id })
    }

    /// Reads a numeric code, used for routing by parameter 252/253.
    ///
    /// Returns `None` when absent, non-integral, or outside `u16`.
    #[must_use]
    pub fn code(&self, id: u8) -> Option<u16> {
        self.get(id)
            .and_then(Value::as_i64)
            .and_then(|v| u16::try_from(v).ok())
    }

    /// Reads any integral parameter widened to `i64`.
    pub fn integral(&self, id: u8) -> Result<i64, ParameterError> {
        let value = self.require(id)?;
        value.as_i64().ok_or_else(|| mismatch(id, "integral", value))
    }

    /// Like [`integral`](Self::integral) but absent parameters are `None`.
    pub fn optional_integral(&self, id: u8) -> Result<Option<i64>, ParameterError> {
        match self.get(id) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| mismatch(id, "integral", value)),
        }
    }

    pub fn float(&self, id: u8) -> Result<f32, ParameterError> {
        let value = self.require(id)?;
        value.as_f32().ok_or_else(|| mismatch(id, "float", value))
    }

    pub fn string(&self, id: u8) -> Result<&str, ParameterError> {
        let value = self.require(id)?;
        value.as_str().ok_or_else(|| mismatch(id, "string", value))
    }

    /// Reads an identifier that may be sent as a string or a number.
    pub fn identifier(&self, id: u8) -> Result<String, ParameterError> {
        let value = self.require(id)?;
        match value {
            Value::String(s) => Ok(s.clone()),
            other => other
                .as_i64()
                .map(|n| n.to_string())
                .ok_or_else(|| mismatch(id, "string or integral", other)),
        }
    }

    pub fn byte_array(&self, id: u8) -> Result<&[u8], ParameterError> {
        let value = self.require(id)?;
        value
            .as_bytes()
            .ok_or_else(|| mismatch(id, "byte array", value))
    }

    /// Reads a byte array of at least `needed` bytes.
    pub fn byte_array_min(&self, id: u8, needed: usize) -> Result<&[u8], ParameterError> {
        let bytes = self.byte_array(id)?;
        if bytes.len() < needed {
            return Err(ParameterError::TooShort {
                id,
                needed,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }

    /// Reads a list of floats from a float/double array or an object array.
    pub fn float_list(&self, id: u8) -> Result<Vec<f32>, ParameterError> {
        let value = self.require(id)?;
        let elements = match value {
            Value::Array { values, .. } | Value::ObjectArray(values) => values,
            other => return Err(mismatch(id, "float array", other)),
        };
        elements
            .iter()
            .map(|v| v.as_f32().ok_or_else(|| mismatch(id, "float array", v)))
            .collect()
    }

    /// Reads the first two floats of a float list, as used for positions.
    pub fn float_pair(&self, id: u8) -> Result<[f32; 2], ParameterError> {
        match self.float_list(id)?.as_slice() {
            [x, y, ..] => Ok([*x, *y]),
            short => Err(ParameterError::TooShort {
                id,
                needed: 2,
                actual: short.len(),
            }),
        }
    }

    /// Reads a list of integers from any integral array shape.
    pub fn integral_list(&self, id: u8) -> Result<Vec<i64>, ParameterError> {
        let value = self.require(id)?;
        match value {
            Value::ByteArray(bytes) => Ok(bytes.iter().map(|b| i64::from(*b)).collect()),
            Value::IntegerArray(ints) => Ok(ints.iter().map(|i| i64::from(*i)).collect()),
            Value::Array { values, .. } | Value::ObjectArray(values) => values
                .iter()
                .map(|v| v.as_i64().ok_or_else(|| mismatch(id, "integral array", v)))
                .collect(),
            other => Err(mismatch(id, "integral array", other)),
        }
    }
}

fn mismatch(id: u8, expected: &'static str, found: &Value) -> ParameterError {
    ParameterError::TypeMismatch {
        id,
        expected,
        found: found.type_name(),
    }
}

impl FromIterator<(u8, Value)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (u8, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(u8, Value); N]> for ParameterTable {
    fn from(entries: [(u8, Value); N]) -> Self {
        entries.into_iter().collect()
    }
}
