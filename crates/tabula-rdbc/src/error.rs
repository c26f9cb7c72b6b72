//! Error types for the bridge.

use tabula_frame::SemanticType;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No SQL type mapping exists for a column's element type on the
    /// target database.
    #[error("no SQL type mapping for datatype {datatype} on database '{database}'")]
    UnmappedType {
        /// The element type that could not be mapped.
        datatype: SemanticType,
        /// The database identifier the mapping was resolved against.
        database: String,
    },

    /// An upsert was requested but no primary key is known.
    #[error("no primary key declared for table '{table}'")]
    MissingPrimaryKey {
        /// The target table.
        table: String,
    },

    /// A statement failed to prepare, bind or execute.
    #[error("statement error: {message}")]
    Statement {
        /// What went wrong.
        message: String,
        /// The statement text, when known.
        sql: Option<String>,
        /// The column being bound or decoded, when known.
        column: Option<String>,
        /// Underlying driver error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller supplied unusable options or metadata.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong.
        message: String,
    },

    /// The connection is unusable or was used after close.
    #[error("connection error: {message}")]
    Connection {
        /// What went wrong.
        message: String,
    },

    /// A value could not be converted between its wire and columnar
    /// representations.
    #[error("type conversion error: {message}")]
    TypeConversion {
        /// What could not be converted.
        message: String,
    },
}

impl Error {
    /// Create an unmapped-type error.
    pub fn unmapped(datatype: SemanticType, database: impl Into<String>) -> Self {
        Self::UnmappedType {
            datatype,
            database: database.into(),
        }
    }

    /// Create a missing-primary-key error.
    pub fn missing_primary_key(table: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            table: table.into(),
        }
    }

    /// Create a statement error.
    pub fn statement(message: impl Into<String>) -> Self {
        Self::Statement {
            message: message.into(),
            sql: None,
            column: None,
            source: None,
        }
    }

    /// Create a statement error carrying the statement text.
    pub fn statement_with_sql(message: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::Statement {
            message: message.into(),
            sql: Some(sql.into()),
            column: None,
            source: None,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a type-conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Attach column context. Statement errors without a column get it
    /// filled in; any other error is wrapped as the cause of a new
    /// statement error naming the column.
    pub fn in_column(self, column: &str) -> Self {
        match self {
            Self::Statement {
                message,
                sql,
                column: None,
                source,
            } => Self::Statement {
                message,
                sql,
                column: Some(column.to_string()),
                source,
            },
            other => Self::Statement {
                message: format!("column '{column}': {other}"),
                sql: None,
                column: Some(column.to_string()),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Attach statement text. Statement errors without SQL get it filled
    /// in; any other error is wrapped as the cause of a new statement
    /// error carrying the text.
    pub fn with_sql(self, sql: &str) -> Self {
        match self {
            Self::Statement {
                message,
                sql: None,
                column,
                source,
            } => Self::Statement {
                message,
                sql: Some(sql.to_string()),
                column,
                source,
            },
            other => Self::Statement {
                message: other.to_string(),
                sql: Some(sql.to_string()),
                column: None,
                source: Some(Box::new(other)),
            },
        }
    }

    /// The statement text attached to this error, if any.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Statement { sql, .. } => sql.as_deref(),
            _ => None,
        }
    }

    /// The column attached to this error, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Statement { column, .. } => column.as_deref(),
            _ => None,
        }
    }
}

impl From<tabula_frame::FrameError> for Error {
    fn from(err: tabula_frame::FrameError) -> Self {
        Self::TypeConversion {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unmapped(SemanticType::Duration, "postgresql");
        assert_eq!(
            err.to_string(),
            "no SQL type mapping for datatype duration on database 'postgresql'"
        );

        let err = Error::missing_primary_key("trades");
        assert_eq!(err.to_string(), "no primary key declared for table 'trades'");
    }

    #[test]
    fn test_in_column_fills_statement_context() {
        let err = Error::statement("bind failed").in_column("price");
        assert_eq!(err.column(), Some("price"));
        assert_eq!(err.to_string(), "statement error: bind failed");
    }

    #[test]
    fn test_in_column_wraps_other_errors() {
        let err = Error::type_conversion("bad uuid").in_column("id");
        assert_eq!(err.column(), Some("id"));
        assert!(err.to_string().contains("column 'id'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_with_sql() {
        let err = Error::statement("boom").with_sql("DROP TABLE t");
        assert_eq!(err.sql(), Some("DROP TABLE t"));

        let err = Error::connection("closed").with_sql("SELECT 1");
        assert_eq!(err.sql(), Some("SELECT 1"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_frame_error_conversion() {
        let frame_err = tabula_frame::FrameError::shape_mismatch("bad");
        let err: Error = frame_err.into();
        assert!(matches!(err, Error::TypeConversion { .. }));
    }
}
