//! DDL emission from frame schemas.

use tabula_frame::DataFrame;

use crate::error::{Error, Result};
use crate::registry::TypeRegistry;

/// Make a dataset or column name usable as a SQL identifier. Dashes are
/// common in dataset names and invalid in unquoted SQL, so they become
/// underscores; everything else passes through.
pub fn sanitize_ident(name: &str) -> String {
    name.replace('-', "_")
}

/// Emit a `CREATE TABLE` statement for a frame's schema.
///
/// Column types resolve through the registry, honoring per-column SQL
/// type overrides, so an unmappable column fails here before anything
/// reaches the database. Output is deterministic: columns in frame
/// order, one per line, with a trailing `PRIMARY KEY` clause when
/// `primary_key` is non-empty.
pub fn create_table_ddl(
    registry: &TypeRegistry,
    database: &str,
    table: &str,
    frame: &DataFrame,
    primary_key: &[String],
) -> Result<String> {
    if frame.column_count() == 0 {
        return Err(Error::configuration(format!(
            "cannot create table '{table}' from a frame with no columns"
        )));
    }
    for key in primary_key {
        if frame.column(key).is_none() {
            return Err(Error::configuration(format!(
                "primary key column '{key}' is not in the frame"
            )));
        }
    }

    let mut lines = Vec::with_capacity(frame.column_count() + 1);
    for column in frame.columns() {
        let mapping = registry.resolve_write(database, column)?;
        lines.push(format!(
            "  {} {}",
            sanitize_ident(column.name()),
            mapping.sql_type_name
        ));
    }
    if !primary_key.is_empty() {
        let keys: Vec<String> = primary_key.iter().map(|k| sanitize_ident(k)).collect();
        lines.push(format!("  PRIMARY KEY ({})", keys.join(", ")));
    }

    Ok(format!(
        "CREATE TABLE {} (\n{}\n)",
        sanitize_ident(table),
        lines.join(",\n")
    ))
}

/// Emit a `DROP TABLE` statement.
pub fn drop_table_ddl(table: &str) -> String {
    format!("DROP TABLE {}", sanitize_ident(table))
}
