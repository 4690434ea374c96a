//! Protocol16 type codes.

/// One-byte type tag selecting a decode rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TypeCode {
    /// Untyped slot; decodes as null, or selects a per-entry tag in dictionaries.
    Unknown = 0,
    Null = 42,
    Dictionary = 68,
    StringArray = 97,
    Byte = 98,
    Double = 100,
    Float = 102,
    Hashtable = 104,
    Integer = 105,
    Short = 107,
    Long = 108,
    IntegerArray = 110,
    Boolean = 111,
    OperationResponse = 112,
    OperationRequest = 113,
    String = 115,
    ByteArray = 120,
    Array = 121,
    ObjectArray = 122,
}

impl TypeCode {
    /// Parses a type code from a raw tag byte.
    ///
    /// Returns `None` for tags without a decode rule.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        let code = match raw {
            0 => Self::Unknown,
            42 => Self::Null,
            68 => Self::Dictionary,
            97 => Self::StringArray,
            98 => Self::Byte,
            100 => Self::Double,
            102 => Self::Float,
            104 => Self::Hashtable,
            105 => Self::Integer,
            107 => Self::Short,
            108 => Self::Long,
            110 => Self::IntegerArray,
            111 => Self::Boolean,
            112 => Self::OperationResponse,
            113 => Self::OperationRequest,
            115 => Self::String,
            120 => Self::ByteArray,
            121 => Self::Array,
            122 => Self::ObjectArray,
            _ => return None,
        };
        Some(code)
    }

    /// Returns the raw tag byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Returns `true` if a dictionary slot with this code carries its own
    /// per-entry tag.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::Unknown | Self::Null)
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Null => "null",
            Self::Dictionary => "dictionary",
            Self::StringArray => "string array",
            Self::Byte => "byte",
            Self::Double => "double",
            Self::Float => "float",
            Self::Hashtable => "hashtable",
            Self::Integer => "integer",
            Self::Short => "short",
            Self::Long => "long",
            Self::IntegerArray => "integer array",
            Self::Boolean => "boolean",
            Self::OperationResponse => "operation response",
            Self::OperationRequest => "operation request",
            Self::String => "string",
            Self::ByteArray => "byte array",
            Self::Array => "array",
            Self::ObjectArray => "object array",
        }
    }
}
