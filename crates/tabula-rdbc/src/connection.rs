//! Database capability traits and result-set metadata.
//!
//! The bridge talks to databases through three object-safe traits:
//! [`Connection`] for statement execution and transaction control,
//! [`QueryCursor`] for walking a result set row by row, and
//! [`PreparedStatement`] for parameter binding and batched execution.
//! Drivers implement these; everything above them is driver-agnostic.

use async_trait::async_trait;
use tabula_frame::Value;

use crate::error::Result;

/// SQL type indices, following the JDBC `java.sql.Types` numbering so
/// metadata from JDBC-shaped drivers maps one to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// `BIT` (-7).
    Bit,
    /// `TINYINT` (-6).
    TinyInt,
    /// `SMALLINT` (5).
    SmallInt,
    /// `INTEGER` (4).
    Integer,
    /// `BIGINT` (-5).
    BigInt,
    /// `FLOAT` (6).
    Float,
    /// `REAL` (7).
    Real,
    /// `DOUBLE` (8).
    Double,
    /// `NUMERIC` (2).
    Numeric,
    /// `DECIMAL` (3).
    Decimal,
    /// `CHAR` (1).
    Char,
    /// `VARCHAR` (12).
    Varchar,
    /// `NVARCHAR` (-9).
    NVarchar,
    /// `LONGVARCHAR` (-1).
    LongVarchar,
    /// `DATE` (91).
    Date,
    /// `TIME` (92).
    Time,
    /// `TIMESTAMP` (93).
    Timestamp,
    /// `TIMESTAMP_WITH_TIMEZONE` (2014).
    TimestampWithTimezone,
    /// `BOOLEAN` (16).
    Boolean,
    /// `OTHER` (1111), for driver-specific types such as `uuid`.
    Other,
}

impl SqlType {
    /// The numeric type index.
    pub const fn code(self) -> i32 {
        match self {
            Self::Bit => -7,
            Self::TinyInt => -6,
            Self::SmallInt => 5,
            Self::Integer => 4,
            Self::BigInt => -5,
            Self::Float => 6,
            Self::Real => 7,
            Self::Double => 8,
            Self::Numeric => 2,
            Self::Decimal => 3,
            Self::Char => 1,
            Self::Varchar => 12,
            Self::NVarchar => -9,
            Self::LongVarchar => -1,
            Self::Date => 91,
            Self::Time => 92,
            Self::Timestamp => 93,
            Self::TimestampWithTimezone => 2014,
            Self::Boolean => 16,
            Self::Other => 1111,
        }
    }

    /// Map a numeric type index back to a variant. Unknown indices map to
    /// [`SqlType::Other`].
    pub const fn from_code(code: i32) -> Self {
        match code {
            -7 => Self::Bit,
            -6 => Self::TinyInt,
            5 => Self::SmallInt,
            4 => Self::Integer,
            -5 => Self::BigInt,
            6 => Self::Float,
            7 => Self::Real,
            8 => Self::Double,
            2 => Self::Numeric,
            3 => Self::Decimal,
            1 => Self::Char,
            12 => Self::Varchar,
            -9 => Self::NVarchar,
            -1 => Self::LongVarchar,
            91 => Self::Date,
            92 => Self::Time,
            93 => Self::Timestamp,
            2014 => Self::TimestampWithTimezone,
            16 => Self::Boolean,
            _ => Self::Other,
        }
    }

    /// The uppercase JDBC-style name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Float => "FLOAT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Numeric => "NUMERIC",
            Self::Decimal => "DECIMAL",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::LongVarchar => "LONGVARCHAR",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            Self::Boolean => "BOOLEAN",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata for one result-set column, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column label, before any caller-side renaming.
    pub label: String,
    /// Database-specific type name, lowercased base name without
    /// arguments (`varchar`, not `VARCHAR(40)`).
    pub type_name: String,
    /// SQL type index.
    pub sql_type: SqlType,
    /// Host-language class name the driver materializes values as, when
    /// reported. Used as a last-resort typing heuristic.
    pub class_name: Option<String>,
    /// Whether the column admits NULLs.
    pub nullable: bool,
    /// Precision for sized types.
    pub precision: Option<u32>,
    /// Scale for decimal types.
    pub scale: Option<u32>,
}

impl ColumnDescriptor {
    /// Create a descriptor with the required fields.
    pub fn new(
        label: impl Into<String>,
        type_name: impl Into<String>,
        sql_type: SqlType,
    ) -> Self {
        Self {
            label: label.into(),
            type_name: type_name.into(),
            sql_type,
            class_name: None,
            nullable: true,
            precision: None,
            scale: None,
        }
    }

    /// Set the reported host-language class name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set scale.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// A positioned, forward-only view over a result set.
///
/// A fresh cursor sits before the first row; [`QueryCursor::advance`]
/// moves to the next row and reports whether one exists. Cell reads use
/// 1-based positions, matching the parameter numbering of prepared
/// statements.
#[async_trait]
pub trait QueryCursor: Send {
    /// Metadata for the columns of this result set, in position order.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Move to the next row. Returns `false` once the result set is
    /// exhausted.
    async fn advance(&mut self) -> Result<bool>;

    /// Read the cell at 1-based position `pos` of the current row.
    /// `Ok(None)` means the cell is NULL.
    fn get(&self, pos: usize) -> Result<Option<Value>>;

    /// Release the cursor and its server-side resources. Safe to call
    /// more than once.
    async fn close(&mut self) -> Result<()>;
}

/// A parameterized statement supporting batched execution.
///
/// Parameters use 1-based positions. A row is staged with
/// [`PreparedStatement::add_batch`] once every position is bound, and
/// staged rows are applied together by
/// [`PreparedStatement::execute_batch`].
#[async_trait]
pub trait PreparedStatement: Send {
    /// The statement text this was prepared from.
    fn sql(&self) -> &str;

    /// Bind a value at 1-based position `pos` for the row being staged.
    fn bind(&mut self, pos: usize, value: &Value) -> Result<()>;

    /// Bind NULL at 1-based position `pos`, with the SQL type the driver
    /// should send.
    fn bind_null(&mut self, pos: usize, sql_type: SqlType) -> Result<()>;

    /// Stage the currently bound row and clear the bindings.
    fn add_batch(&mut self) -> Result<()>;

    /// Execute all staged rows. Returns the number of affected rows.
    async fn execute_batch(&mut self) -> Result<u64>;

    /// Release the statement. Safe to call more than once.
    async fn close(&mut self) -> Result<()>;
}

/// A live database connection.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Identifier of the database product, lowercased (`postgresql`,
    /// `sqlserver`), used to select type mappings.
    fn database_id(&self) -> &str;

    /// Whether the connection commits each statement implicitly.
    fn auto_commit(&self) -> bool;

    /// Switch implicit commit on or off.
    async fn set_auto_commit(&self, enabled: bool) -> Result<()>;

    /// Execute a statement that returns no rows. Returns the affected
    /// row count.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Execute a query and return a cursor over its result set.
    async fn query(&self, sql: &str) -> Result<Box<dyn QueryCursor>>;

    /// Prepare a parameterized statement.
    async fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>>;

    /// Commit the open transaction.
    async fn commit(&self) -> Result<()>;

    /// Roll back the open transaction.
    async fn rollback(&self) -> Result<()>;

    /// Close the connection. Safe to call more than once.
    async fn close(&self) -> Result<()>;
}
