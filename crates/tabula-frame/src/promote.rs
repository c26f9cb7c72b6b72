//! Promotional column building for values of unknown element type.
//!
//! When a result set column carries no usable type information, values are
//! collected through a [`PromotedBuilder`] that keeps the narrowest
//! container able to represent everything seen so far and widens it on
//! demand. Numeric content climbs the ladder `bool` to `int64` to
//! `float64` to `string`; a column holding a single non-numeric type (a
//! date, a UUID) keeps that type until conflicting content forces the
//! string fallback. A column with no present values at all materializes as
//! an all-missing boolean column.

use std::collections::BTreeSet;

use crate::column::{Column, ColumnData};
use crate::error::{FrameError, Result};
use crate::types::{SemanticType, Value};

/// Position of a type on the widening ladder, or `None` for types that
/// only unify with themselves.
fn ladder_rank(datatype: SemanticType) -> Option<u8> {
    match datatype {
        SemanticType::Bool => Some(0),
        t if t.is_integer() => Some(1),
        t if t.is_float() => Some(2),
        t if t.is_textual() => Some(3),
        _ => None,
    }
}

/// The narrowest common element type for two column types.
///
/// Equal types unify to themselves. Distinct ladder types unify to the
/// wider rung (`int64`, `float64` or `string`). Any other combination
/// falls back to `string`, the universal representation.
pub fn unify(a: SemanticType, b: SemanticType) -> SemanticType {
    if a == b {
        return a;
    }
    match (ladder_rank(a), ladder_rank(b)) {
        (Some(ra), Some(rb)) => match ra.max(rb) {
            0 => SemanticType::Bool,
            1 => SemanticType::Int64,
            2 => SemanticType::Float64,
            _ => SemanticType::Utf8,
        },
        _ => SemanticType::Utf8,
    }
}

/// The container type a freshly observed value claims for itself.
fn natural_type(value: &Value) -> SemanticType {
    match value {
        Value::Bool(_) => SemanticType::Bool,
        Value::UInt64(u) if i64::try_from(*u).is_err() => SemanticType::Utf8,
        v if v.semantic_type().is_integer() => SemanticType::Int64,
        v if v.semantic_type().is_float() => SemanticType::Float64,
        v => v.semantic_type(),
    }
}

/// Convert a value into the representation of `target`.
///
/// Callers guarantee `target` is at or above the value's natural type, so
/// the conversion is total; the string fallback covers every case.
fn convert(value: &Value, target: SemanticType) -> Value {
    let converted = match target {
        SemanticType::Bool => value.as_bool().map(Value::Bool),
        SemanticType::Int64 => value.as_i64().map(Value::Int64),
        SemanticType::Float64 => value.as_f64().map(Value::Float64),
        SemanticType::Utf8 | SemanticType::Text => Some(Value::Utf8(value.to_string())),
        _ => Some(value.clone()),
    };
    converted.unwrap_or_else(|| Value::Utf8(value.to_string()))
}

/// Rewrite a container into `target`, keeping sentinel slots at the given
/// missing indices.
fn promote_data(
    data: &ColumnData,
    missing: &BTreeSet<usize>,
    target: SemanticType,
) -> Result<ColumnData> {
    let mut out =
        ColumnData::for_type(target).ok_or(FrameError::Unbuildable { datatype: target })?;
    for idx in 0..data.len() {
        match data.get(idx) {
            Some(value) if !missing.contains(&idx) => {
                if let Err(rejected) = out.push(convert(&value, target)) {
                    return Err(FrameError::type_mismatch(
                        "<promoted>",
                        target,
                        rejected.semantic_type(),
                    ));
                }
            }
            _ => out.push_sentinel(),
        }
    }
    Ok(out)
}

/// Rewrite a column into `target`, preserving its missing-set and
/// metadata. A no-op when the column already has that type.
pub fn promote_column(column: Column, target: SemanticType) -> Result<Column> {
    if column.datatype() == target {
        return Ok(column);
    }
    let datatype = column.datatype();
    let (name, data, missing, sql_type) = column.into_parts();
    let promoted = promote_data(&data, &missing, target).map_err(|_| {
        FrameError::shape_mismatch(format!(
            "cannot promote column '{name}' from {datatype} to {target}"
        ))
    })?;
    Ok(Column::from_parts(name, target, promoted, missing, sql_type))
}

/// Incremental column builder that infers its element type from the
/// values it receives.
#[derive(Debug)]
pub struct PromotedBuilder {
    name: String,
    datatype: Option<SemanticType>,
    data: ColumnData,
    missing: BTreeSet<usize>,
}

impl PromotedBuilder {
    /// Create a builder with no committed element type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: None,
            // Placeholder container while every row is missing.
            data: ColumnData::Bool(Vec::new()),
            missing: BTreeSet::new(),
        }
    }

    /// Rows collected so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no rows have been collected.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The element type committed so far, if any value has been seen.
    pub fn datatype(&self) -> Option<SemanticType> {
        self.datatype
    }

    /// Append a present value, widening the container if needed.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let incoming = natural_type(&value);
        let target = match self.datatype {
            None => incoming,
            Some(current) => unify(current, incoming),
        };
        if self.datatype != Some(target) {
            self.data = promote_data(&self.data, &self.missing, target)?;
            self.datatype = Some(target);
        }
        if let Err(rejected) = self.data.push(convert(&value, target)) {
            return Err(FrameError::type_mismatch(
                &self.name,
                target,
                rejected.semantic_type(),
            ));
        }
        Ok(())
    }

    /// Append a missing row.
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

    /// Materialize the column. With no present values the result is an
    /// all-missing boolean column.
    pub fn finish(self) -> Column {
        let datatype = self.datatype.unwrap_or(SemanticType::Bool);
        Column::from_parts(self.name, datatype, self.data, self.missing, None)
    }
}
