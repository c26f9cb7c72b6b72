//! Element types and scalar values.
//!
//! A [`SemanticType`] names what a column's elements *mean* (a calendar
//! date, a 32-bit integer, free text). A [`Value`] is one concrete,
//! present element. Absence is never a value: missing cells are tracked
//! by the owning column's missing-set, so there is deliberately no
//! `Null` variant here.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

/// The element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Variable-length string.
    Utf8,
    /// Unbounded text. Shares the string container with [`SemanticType::Utf8`]
    /// but maps to a large-object SQL type.
    Text,
    /// UUID.
    Uuid,
    /// Calendar date without a time component.
    LocalDate,
    /// Wall-clock time without a date component.
    LocalTime,
    /// Date and time without a zone, interpreted as an absolute instant.
    Instant,
    /// Date and time carrying a UTC offset.
    ZonedDateTime,
    /// Elapsed time in microseconds.
    Duration,
    /// Opaque, driver-specific elements with no dense container.
    Object,
}

impl SemanticType {
    /// The canonical lowercase name, as used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Utf8 => "string",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::LocalDate => "local-date",
            Self::LocalTime => "local-time",
            Self::Instant => "instant",
            Self::ZonedDateTime => "zoned-date-time",
            Self::Duration => "duration",
            Self::Object => "object",
        }
    }

    /// Whether this is a signed or unsigned integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Whether this is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether elements are stored in the string container.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Utf8 | Self::Text)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single present element of a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    Int8(i8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 8-bit integer.
    UInt8(u8),
    /// Unsigned 16-bit integer.
    UInt16(u16),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// String.
    Utf8(String),
    /// UUID.
    Uuid(Uuid),
    /// Calendar date.
    Date(NaiveDate),
    /// Wall-clock time.
    Time(NaiveTime),
    /// Zone-less timestamp.
    Timestamp(NaiveDateTime),
    /// Timestamp in UTC.
    TimestampTz(DateTime<Utc>),
    /// Elapsed microseconds.
    Duration(i64),
}

impl Value {
    /// The element type this value belongs to.
    ///
    /// String values report [`SemanticType::Utf8`]; whether a column treats
    /// them as bounded strings or unbounded text is a column-level property.
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Self::Bool(_) => SemanticType::Bool,
            Self::Int8(_) => SemanticType::Int8,
            Self::Int16(_) => SemanticType::Int16,
            Self::Int32(_) => SemanticType::Int32,
            Self::Int64(_) => SemanticType::Int64,
            Self::UInt8(_) => SemanticType::UInt8,
            Self::UInt16(_) => SemanticType::UInt16,
            Self::UInt32(_) => SemanticType::UInt32,
            Self::UInt64(_) => SemanticType::UInt64,
            Self::Float32(_) => SemanticType::Float32,
            Self::Float64(_) => SemanticType::Float64,
            Self::Utf8(_) => SemanticType::Utf8,
            Self::Uuid(_) => SemanticType::Uuid,
            Self::Date(_) => SemanticType::LocalDate,
            Self::Time(_) => SemanticType::LocalTime,
            Self::Timestamp(_) => SemanticType::Instant,
            Self::TimestampTz(_) => SemanticType::ZonedDateTime,
            Self::Duration(_) => SemanticType::Duration,
        }
    }

    /// Interpret as a boolean, if possible.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int8(i) => Some(*i != 0),
            Self::Int16(i) => Some(*i != 0),
            Self::Int32(i) => Some(*i != 0),
            Self::Int64(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Interpret as a signed 64-bit integer, if representable.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int8(i) => Some(i64::from(*i)),
            Self::Int16(i) => Some(i64::from(*i)),
            Self::Int32(i) => Some(i64::from(*i)),
            Self::Int64(i) => Some(*i),
            Self::UInt8(u) => Some(i64::from(*u)),
            Self::UInt16(u) => Some(i64::from(*u)),
            Self::UInt32(u) => Some(i64::from(*u)),
            Self::UInt64(u) => i64::try_from(*u).ok(),
            Self::Duration(us) => Some(*us),
            _ => None,
        }
    }

    /// Interpret as a 64-bit float, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(f64::from(*f)),
            Self::Float64(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    /// Borrow as a string slice, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interpret as a UUID, parsing string values on demand.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::Utf8(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    /// Interpret as a calendar date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Timestamp(ts) => Some(ts.date()),
            Self::TimestampTz(ts) => Some(ts.naive_utc().date()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Canonical textual rendering, used when widening mixed columns to
    /// strings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int8(i) => write!(f, "{i}"),
            Self::Int16(i) => write!(f, "{i}"),
            Self::Int32(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::UInt8(u) => write!(f, "{u}"),
            Self::UInt16(u) => write!(f, "{u}"),
            Self::UInt32(u) => write!(f, "{u}"),
            Self::UInt64(u) => write!(f, "{u}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::TimestampTz(ts) => write!(f, "{ts}"),
            Self::Duration(us) => write!(f, "{us}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::Int8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::UInt8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::UInt16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Utf8(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::TimestampTz(v)
    }
}
