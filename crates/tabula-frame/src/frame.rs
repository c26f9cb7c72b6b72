//! Named collections of equal-length columns.

use crate::column::Column;
use crate::error::{FrameError, Result};
use crate::promote::{promote_column, unify};

/// A columnar dataset: equal-length named columns plus optional table
/// metadata used when the frame is written to a database.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    name: Option<String>,
    primary_key: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Create a frame from columns, which must all have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        for column in &columns {
            if column.len() != row_count {
                return Err(FrameError::shape_mismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    row_count
                )));
            }
        }
        Ok(Self {
            name: None,
            primary_key: Vec::new(),
            columns,
            row_count,
        })
    }

    /// A frame with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            name: None,
            primary_key: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Attach a dataset name, used as the default table name on write.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare the primary key columns, used for DDL emission and upserts.
    pub fn with_primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    /// The dataset name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared primary key columns, possibly empty.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Whether the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Concatenate frames that share the same column names, in order.
    ///
    /// Column element types may differ between frames (a type-inferred
    /// column can widen partway through a stream); differing types are
    /// unified upward before appending, so the result is identical
    /// whatever batch boundaries the inputs were cut at. Metadata comes
    /// from the first frame.
    pub fn concat(frames: Vec<DataFrame>) -> Result<DataFrame> {
        let mut iter = frames.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| FrameError::shape_mismatch("no frames to concatenate"))?;
        let rest: Vec<DataFrame> = iter.collect();
        if rest.is_empty() {
            return Ok(first);
        }

        for frame in &rest {
            if frame.column_names() != first.column_names() {
                return Err(FrameError::shape_mismatch(format!(
                    "column names {:?} do not match {:?}",
                    frame.column_names(),
                    first.column_names()
                )));
            }
        }

        let mut targets: Vec<_> = first.columns.iter().map(|c| c.datatype()).collect();
        for frame in &rest {
            for (target, column) in targets.iter_mut().zip(&frame.columns) {
                *target = unify(*target, column.datatype());
            }
        }

        let name = first.name.clone();
        let primary_key = first.primary_key.clone();
        let mut merged: Vec<Column> = Vec::with_capacity(first.columns.len());
        for (column, target) in first.columns.into_iter().zip(targets.iter()) {
            merged.push(promote_column(column, *target)?);
        }
        for frame in rest {
            for ((dst, column), target) in
                merged.iter_mut().zip(frame.columns).zip(targets.iter())
            {
                let column = promote_column(column, *target)?;
                dst.extend_from(&column)?;
            }
        }

        let mut out = DataFrame::new(merged)?;
        out.name = name;
        out.primary_key = primary_key;
        Ok(out)
    }
}
