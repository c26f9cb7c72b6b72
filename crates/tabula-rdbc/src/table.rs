//! Table lifecycle helpers built from probes and DDL.

use tabula_frame::DataFrame;

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::schema::{create_table_ddl, drop_table_ddl, sanitize_ident};
use crate::writer::{execute_update, WriteOptions};

/// The sanitized table name a write would target: the options' table if
/// set, otherwise the frame's dataset name.
pub fn resolve_table_name(frame: &DataFrame, options: &WriteOptions) -> Result<String> {
    options
        .table
        .as_deref()
        .or_else(|| frame.name())
        .map(sanitize_ident)
        .ok_or_else(|| {
            Error::configuration("no table name: set one in the options or name the dataset")
        })
}

/// The key columns an upsert or DDL emission would use: the options'
/// primary key if set, otherwise the frame's declaration. May be empty.
pub fn effective_primary_key(frame: &DataFrame, options: &WriteOptions) -> Vec<String> {
    if !options.primary_key.is_empty() {
        options.primary_key.clone()
    } else {
        frame.primary_key().to_vec()
    }
}

/// Probe whether a table exists by running a zero-row query against it.
///
/// Any failure at all reads as "no": permission problems and connection
/// hiccups are indistinguishable from a missing table here, which is the
/// useful answer for `ensure`-style callers.
pub async fn table_exists(conn: &dyn Connection, table: &str) -> bool {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE 1=0", sanitize_ident(table));
    match conn.query(&sql).await {
        Ok(mut cursor) => {
            if let Err(e) = cursor.close().await {
                tracing::debug!(error = %e, "failed to close probe cursor");
            }
            true
        }
        Err(_) => false,
    }
}

/// Create the table for a frame's schema.
///
/// Type resolution happens before anything reaches the database, so an
/// unmappable column fails without side effects.
pub async fn create_table(
    conn: &dyn Connection,
    registry: &TypeRegistry,
    frame: &DataFrame,
    options: &WriteOptions,
) -> Result<()> {
    let table = resolve_table_name(frame, options)?;
    let primary_key = effective_primary_key(frame, options);
    let ddl = create_table_ddl(registry, conn.database_id(), &table, frame, &primary_key)?;
    execute_update(conn, &ddl).await?;
    Ok(())
}

/// Create the table unless it already exists. Returns `true` when this
/// call created it. Calling twice is safe; the second call is a no-op.
pub async fn ensure_table(
    conn: &dyn Connection,
    registry: &TypeRegistry,
    frame: &DataFrame,
    options: &WriteOptions,
) -> Result<bool> {
    let table = resolve_table_name(frame, options)?;
    if table_exists(conn, &table).await {
        return Ok(false);
    }
    create_table(conn, registry, frame, options).await?;
    Ok(true)
}

/// Drop a table.
pub async fn drop_table(conn: &dyn Connection, table: &str) -> Result<()> {
    execute_update(conn, &drop_table_ddl(table)).await?;
    Ok(())
}

/// Drop a table if it exists. Returns `true` when this call dropped it.
pub async fn drop_table_when_exists(conn: &dyn Connection, table: &str) -> Result<bool> {
    if !table_exists(conn, table).await {
        return Ok(false);
    }
    drop_table(conn, table).await?;
    Ok(true)
}
