//! Dense typed columns with an explicit missing-set.
//!
//! A [`Column`] stores its elements in one contiguous vector per type and
//! records absent rows in a sorted index set. Slots at missing indices are
//! filled with a fixed per-type sentinel so the container stays dense, but
//! the sentinel is a storage artifact only: every read consults the
//! missing-set first and never compares against sentinel values.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::{FrameError, Result};
use crate::types::{SemanticType, Value};

/// Typed backing storage for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Boolean storage. Sentinel: `false`.
    Bool(Vec<bool>),
    /// Int8 storage. Sentinel: `i8::MIN`.
    Int8(Vec<i8>),
    /// Int16 storage. Sentinel: `i16::MIN`.
    Int16(Vec<i16>),
    /// Int32 storage. Sentinel: `i32::MIN`.
    Int32(Vec<i32>),
    /// Int64 storage. Sentinel: `i64::MIN`.
    Int64(Vec<i64>),
    /// UInt8 storage. Sentinel: `0`.
    UInt8(Vec<u8>),
    /// UInt16 storage. Sentinel: `0`.
    UInt16(Vec<u16>),
    /// UInt32 storage. Sentinel: `0`.
    UInt32(Vec<u32>),
    /// UInt64 storage. Sentinel: `0`.
    UInt64(Vec<u64>),
    /// Float32 storage. Sentinel: `NaN`.
    Float32(Vec<f32>),
    /// Float64 storage. Sentinel: `NaN`.
    Float64(Vec<f64>),
    /// String storage, shared by the `Utf8` and `Text` element types.
    /// Sentinel: the empty string.
    Utf8(Vec<String>),
    /// UUID storage. Sentinel: the nil UUID.
    Uuid(Vec<Uuid>),
    /// Date storage. Sentinel: the Unix epoch date.
    Date(Vec<NaiveDate>),
    /// Time storage. Sentinel: midnight.
    Time(Vec<NaiveTime>),
    /// Timestamp storage. Sentinel: the Unix epoch.
    Timestamp(Vec<NaiveDateTime>),
    /// UTC timestamp storage. Sentinel: the Unix epoch.
    TimestampTz(Vec<DateTime<Utc>>),
    /// Duration storage in microseconds. Sentinel: `0`.
    Duration(Vec<i64>),
}

impl ColumnData {
    /// Create empty storage for the given element type.
    ///
    /// Returns `None` for [`SemanticType::Object`], which has no dense
    /// container.
    pub fn for_type(datatype: SemanticType) -> Option<Self> {
        let data = match datatype {
            SemanticType::Bool => Self::Bool(Vec::new()),
            SemanticType::Int8 => Self::Int8(Vec::new()),
            SemanticType::Int16 => Self::Int16(Vec::new()),
            SemanticType::Int32 => Self::Int32(Vec::new()),
            SemanticType::Int64 => Self::Int64(Vec::new()),
            SemanticType::UInt8 => Self::UInt8(Vec::new()),
            SemanticType::UInt16 => Self::UInt16(Vec::new()),
            SemanticType::UInt32 => Self::UInt32(Vec::new()),
            SemanticType::UInt64 => Self::UInt64(Vec::new()),
            SemanticType::Float32 => Self::Float32(Vec::new()),
            SemanticType::Float64 => Self::Float64(Vec::new()),
            SemanticType::Utf8 | SemanticType::Text => Self::Utf8(Vec::new()),
            SemanticType::Uuid => Self::Uuid(Vec::new()),
            SemanticType::LocalDate => Self::Date(Vec::new()),
            SemanticType::LocalTime => Self::Time(Vec::new()),
            SemanticType::Instant => Self::Timestamp(Vec::new()),
            SemanticType::ZonedDateTime => Self::TimestampTz(Vec::new()),
            SemanticType::Duration => Self::Duration(Vec::new()),
            SemanticType::Object => return None,
        };
        Some(data)
    }

    /// Create storage pre-filled with `len` sentinel slots.
    pub fn with_sentinels(datatype: SemanticType, len: usize) -> Option<Self> {
        let mut data = Self::for_type(datatype)?;
        for _ in 0..len {
            data.push_sentinel();
        }
        Some(data)
    }

    /// Number of slots, including sentinel slots.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Utf8(v) => v.len(),
            Self::Uuid(v) => v.len(),
            Self::Date(v) => v.len(),
            Self::Time(v) => v.len(),
            Self::Timestamp(v) => v.len(),
            Self::TimestampTz(v) => v.len(),
            Self::Duration(v) => v.len(),
        }
    }

    /// Whether the storage holds no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one value. On a container mismatch the value is handed back
    /// so the caller can report the column it belongs to.
    pub fn push(&mut self, value: Value) -> std::result::Result<(), Value> {
        match (self, value) {
            (Self::Bool(v), Value::Bool(x)) => v.push(x),
            (Self::Int8(v), Value::Int8(x)) => v.push(x),
            (Self::Int16(v), Value::Int16(x)) => v.push(x),
            (Self::Int32(v), Value::Int32(x)) => v.push(x),
            (Self::Int64(v), Value::Int64(x)) => v.push(x),
            (Self::UInt8(v), Value::UInt8(x)) => v.push(x),
            (Self::UInt16(v), Value::UInt16(x)) => v.push(x),
            (Self::UInt32(v), Value::UInt32(x)) => v.push(x),
            (Self::UInt64(v), Value::UInt64(x)) => v.push(x),
            (Self::Float32(v), Value::Float32(x)) => v.push(x),
            (Self::Float64(v), Value::Float64(x)) => v.push(x),
            (Self::Utf8(v), Value::Utf8(x)) => v.push(x),
            (Self::Uuid(v), Value::Uuid(x)) => v.push(x),
            (Self::Date(v), Value::Date(x)) => v.push(x),
            (Self::Time(v), Value::Time(x)) => v.push(x),
            (Self::Timestamp(v), Value::Timestamp(x)) => v.push(x),
            (Self::TimestampTz(v), Value::TimestampTz(x)) => v.push(x),
            (Self::Duration(v), Value::Duration(x)) => v.push(x),
            (_, value) => return Err(value),
        }
        Ok(())
    }

    /// Append the per-type sentinel slot.
    pub fn push_sentinel(&mut self) {
        match self {
            Self::Bool(v) => v.push(false),
            Self::Int8(v) => v.push(i8::MIN),
            Self::Int16(v) => v.push(i16::MIN),
            Self::Int32(v) => v.push(i32::MIN),
            Self::Int64(v) => v.push(i64::MIN),
            Self::UInt8(v) => v.push(0),
            Self::UInt16(v) => v.push(0),
            Self::UInt32(v) => v.push(0),
            Self::UInt64(v) => v.push(0),
            Self::Float32(v) => v.push(f32::NAN),
            Self::Float64(v) => v.push(f64::NAN),
            Self::Utf8(v) => v.push(String::new()),
            Self::Uuid(v) => v.push(Uuid::nil()),
            Self::Date(v) => v.push(NaiveDate::default()),
            Self::Time(v) => v.push(NaiveTime::default()),
            Self::Timestamp(v) => v.push(NaiveDateTime::default()),
            Self::TimestampTz(v) => v.push(DateTime::<Utc>::default()),
            Self::Duration(v) => v.push(0),
        }
    }

    /// Read the slot at `idx`, sentinel or not. Returns `None` out of range.
    pub fn get(&self, idx: usize) -> Option<Value> {
        match self {
            Self::Bool(v) => v.get(idx).map(|x| Value::Bool(*x)),
            Self::Int8(v) => v.get(idx).map(|x| Value::Int8(*x)),
            Self::Int16(v) => v.get(idx).map(|x| Value::Int16(*x)),
            Self::Int32(v) => v.get(idx).map(|x| Value::Int32(*x)),
            Self::Int64(v) => v.get(idx).map(|x| Value::Int64(*x)),
            Self::UInt8(v) => v.get(idx).map(|x| Value::UInt8(*x)),
            Self::UInt16(v) => v.get(idx).map(|x| Value::UInt16(*x)),
            Self::UInt32(v) => v.get(idx).map(|x| Value::UInt32(*x)),
            Self::UInt64(v) => v.get(idx).map(|x| Value::UInt64(*x)),
            Self::Float32(v) => v.get(idx).map(|x| Value::Float32(*x)),
            Self::Float64(v) => v.get(idx).map(|x| Value::Float64(*x)),
            Self::Utf8(v) => v.get(idx).map(|x| Value::Utf8(x.clone())),
            Self::Uuid(v) => v.get(idx).map(|x| Value::Uuid(*x)),
            Self::Date(v) => v.get(idx).map(|x| Value::Date(*x)),
            Self::Time(v) => v.get(idx).map(|x| Value::Time(*x)),
            Self::Timestamp(v) => v.get(idx).map(|x| Value::Timestamp(*x)),
            Self::TimestampTz(v) => v.get(idx).map(|x| Value::TimestampTz(*x)),
            Self::Duration(v) => v.get(idx).map(|x| Value::Duration(*x)),
        }
    }
}

/// A named, typed column with missing-value tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    datatype: SemanticType,
    data: ColumnData,
    missing: BTreeSet<usize>,
    sql_type: Option<String>,
}

impl Column {
    /// Create an empty column of the given element type.
    ///
    /// Fails with [`FrameError::Unbuildable`] for element types that have
    /// no dense container.
    pub fn new(name: impl Into<String>, datatype: SemanticType) -> Result<Self> {
        let data =
            ColumnData::for_type(datatype).ok_or(FrameError::Unbuildable { datatype })?;
        Ok(Self {
            name: name.into(),
            datatype,
            data,
            missing: BTreeSet::new(),
            sql_type: None,
        })
    }

    /// Create a column from fully-present values.
    pub fn from_values(
        name: impl Into<String>,
        datatype: SemanticType,
        values: Vec<Value>,
    ) -> Result<Self> {
        let mut column = Self::new(name, datatype)?;
        for value in values {
            column.push(value)?;
        }
        Ok(column)
    }

    /// Create a column from optional values, where `None` marks a missing
    /// row.
    pub fn from_options(
        name: impl Into<String>,
        datatype: SemanticType,
        values: Vec<Option<Value>>,
    ) -> Result<Self> {
        let mut column = Self::new(name, datatype)?;
        for value in values {
            column.push_opt(value)?;
        }
        Ok(column)
    }

    /// Attach a verbatim SQL type for this column, overriding registry
    /// resolution when a table is created from the owning frame.
    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type.
    pub fn datatype(&self) -> SemanticType {
        self.datatype
    }

    /// The column-local SQL type override, if any.
    pub fn sql_type_override(&self) -> Option<&str> {
        self.sql_type.as_deref()
    }

    /// Number of rows, present and missing.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a present value.
    pub fn push(&mut self, value: Value) -> Result<()> {
        self.data.push(value).map_err(|rejected| {
            FrameError::type_mismatch(&self.name, self.datatype, rejected.semantic_type())
        })
    }

    /// Append a missing row. The backing store receives the per-type
    /// sentinel and the row index joins the missing-set.
    pub fn push_missing(&mut self) {
        self.missing.insert(self.data.len());
        self.data.push_sentinel();
    }

    /// Append an optional value, `None` meaning missing.
    pub fn push_opt(&mut self, value: Option<Value>) -> Result<()> {
        match value {
            Some(value) => self.push(value),
            None => {
                self.push_missing();
                Ok(())
            }
        }
    }

    /// Read row `row`. Returns `None` when the row is missing or out of
    /// range; the sentinel stored at a missing slot is never surfaced.
    pub fn value(&self, row: usize) -> Option<Value> {
        if self.missing.contains(&row) {
            return None;
        }
        self.data.get(row)
    }

    /// Whether row `row` is in the missing-set.
    pub fn is_missing(&self, row: usize) -> bool {
        self.missing.contains(&row)
    }

    /// The sorted indices of missing rows.
    pub fn missing(&self) -> &BTreeSet<usize> {
        &self.missing
    }

    /// Number of missing rows.
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Materialize all rows as optionals. Intended for assertions and
    /// small frames.
    pub fn to_options(&self) -> Vec<Option<Value>> {
        (0..self.len()).map(|row| self.value(row)).collect()
    }

    /// Append all rows of `other`, which must share this column's element
    /// type. Missing indices are shifted past the existing rows.
    pub fn extend_from(&mut self, other: &Column) -> Result<()> {
        if other.datatype != self.datatype {
            return Err(FrameError::shape_mismatch(format!(
                "cannot append {} rows to {} column '{}'",
                other.datatype, self.datatype, self.name
            )));
        }
        let offset = self.len();
        for row in 0..other.len() {
            if other.is_missing(row) {
                self.push_missing();
            } else if let Some(value) = other.data.get(row) {
                self.push(value)?;
            }
        }
        debug_assert_eq!(self.len(), offset + other.len());
        Ok(())
    }

    pub(crate) fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn into_parts(self) -> (String, ColumnData, BTreeSet<usize>, Option<String>) {
        (self.name, self.data, self.missing, self.sql_type)
    }

    pub(crate) fn from_parts(
        name: String,
        datatype: SemanticType,
        data: ColumnData,
        missing: BTreeSet<usize>,
        sql_type: Option<String>,
    ) -> Self {
        Self {
            name,
            datatype,
            data,
            missing,
            sql_type,
        }
    }
}
