//! Frame writing: columns in, batched parameterized statements out.
//!
//! [`write_dataset`] turns a frame into one prepared `INSERT` (optionally
//! with an upsert clause), binds rows column by column through the
//! registry's write mappings, and flushes in batches. The whole write is
//! one transaction: commit after the last batch, roll back on the first
//! error.

use tabula_frame::DataFrame;

use crate::connection::{Connection, PreparedStatement};
use crate::error::{Error, Result};
use crate::registry::{TypeRegistry, WriteMapping};
use crate::schema::sanitize_ident;
use crate::table::{effective_primary_key, resolve_table_name};

/// Default number of staged rows per batch execution.
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 1024;

/// Options for the write path.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Target table. Defaults to the frame's dataset name.
    pub table: Option<String>,
    /// Primary key columns for upserts, overriding the frame's own
    /// declaration.
    pub primary_key: Vec<String>,
    /// Staged rows per batch execution. `0` stages everything and
    /// flushes once.
    pub batch_size: usize,
    /// Insert-or-update instead of plain insert. Requires a primary key
    /// from either these options or the frame.
    pub upsert: bool,
}

impl WriteOptions {
    /// Options for a plain batched insert.
    pub fn new() -> Self {
        Self {
            table: None,
            primary_key: Vec::new(),
            batch_size: DEFAULT_WRITE_BATCH_SIZE,
            upsert: false,
        }
    }

    /// Write into `table` instead of the frame's dataset name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Use these key columns for upserts.
    pub fn with_primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    /// Set the rows-per-batch limit.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Insert new rows and update existing ones in place.
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn column_mappings(
    registry: &TypeRegistry,
    database: &str,
    frame: &DataFrame,
) -> Result<Vec<WriteMapping>> {
    frame
        .columns()
        .iter()
        .map(|column| registry.resolve_write(database, column))
        .collect()
}

fn insert_sql_from(
    table: &str,
    frame: &DataFrame,
    mappings: &[WriteMapping],
    upsert_keys: &[String],
) -> Result<String> {
    if frame.column_count() == 0 {
        return Err(Error::configuration(format!(
            "cannot insert into '{table}' from a frame with no columns"
        )));
    }
    for key in upsert_keys {
        if frame.column(key).is_none() {
            return Err(Error::configuration(format!(
                "upsert key column '{key}' is not in the frame"
            )));
        }
    }

    let names: Vec<String> = frame
        .columns()
        .iter()
        .map(|c| sanitize_ident(c.name()))
        .collect();
    let placeholders: Vec<&str> = mappings.iter().map(|m| m.placeholder.as_str()).collect();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        sanitize_ident(table),
        names.join(", "),
        placeholders.join(", ")
    );

    if !upsert_keys.is_empty() {
        let keys: Vec<String> = upsert_keys.iter().map(|k| sanitize_ident(k)).collect();
        let updates: Vec<String> = frame
            .columns()
            .iter()
            .filter(|c| !upsert_keys.iter().any(|k| k == c.name()))
            .map(|c| {
                let name = sanitize_ident(c.name());
                format!("{name} = excluded.{name}")
            })
            .collect();
        if updates.is_empty() {
            // Every column is part of the key; a conflicting row is
            // already identical.
            sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", keys.join(", ")));
        } else {
            sql.push_str(&format!(
                " ON CONFLICT ({}) DO UPDATE SET {}",
                keys.join(", "),
                updates.join(", ")
            ));
        }
    }
    Ok(sql)
}

/// Build the `INSERT` statement for writing `frame` into `table`.
///
/// With `upsert_keys` non-empty the statement carries an
/// `ON CONFLICT` clause updating every non-key column from the incoming
/// row. Placeholders come from the registry, so a postgres UUID column
/// renders as `?::UUID` rather than a bare `?`.
pub fn insert_sql(
    registry: &TypeRegistry,
    database: &str,
    table: &str,
    frame: &DataFrame,
    upsert_keys: &[String],
) -> Result<String> {
    let mappings = column_mappings(registry, database, frame)?;
    insert_sql_from(table, frame, &mappings, upsert_keys)
}

async fn stream_rows(
    conn: &dyn Connection,
    frame: &DataFrame,
    mappings: &[WriteMapping],
    sql: &str,
    batch_size: usize,
) -> Result<u64> {
    let mut stmt = conn.prepare(sql).await?;
    match bind_and_flush(stmt.as_mut(), frame, mappings, batch_size).await {
        Ok(affected) => {
            stmt.close().await?;
            Ok(affected)
        }
        Err(e) => {
            if let Err(close_err) = stmt.close().await {
                tracing::warn!(error = %close_err, "statement close failed after write error");
            }
            Err(e)
        }
    }
}

async fn bind_and_flush(
    stmt: &mut dyn PreparedStatement,
    frame: &DataFrame,
    mappings: &[WriteMapping],
    batch_size: usize,
) -> Result<u64> {
    let limit = if batch_size == 0 { usize::MAX } else { batch_size };
    let mut pending = 0usize;
    let mut affected = 0u64;

    for row in 0..frame.row_count() {
        for (idx, (column, mapping)) in
            frame.columns().iter().zip(mappings.iter()).enumerate()
        {
            // Missing-set first: a sentinel-valued slot is data, absence
            // is only ever what the missing-set says.
            let bound: Result<()> = match column.value(row) {
                Some(value) => match &mapping.encode {
                    Some(encode) => {
                        encode(&value).and_then(|encoded| stmt.bind(idx + 1, &encoded))
                    }
                    None => stmt.bind(idx + 1, &value),
                },
                None => stmt.bind_null(idx + 1, mapping.sql_type),
            };
            bound.map_err(|e| e.in_column(column.name()))?;
        }
        stmt.add_batch()?;
        pending += 1;
        if pending >= limit {
            affected += stmt.execute_batch().await?;
            pending = 0;
        }
    }
    if pending > 0 {
        affected += stmt.execute_batch().await?;
    }
    Ok(affected)
}

/// Write a frame into a table as one transaction.
///
/// Rows are bound in frame order and flushed every
/// [`WriteOptions::batch_size`] staged rows; a trailing short batch
/// flushes at the end, so batch size never changes what lands in the
/// table. Returns the number of affected rows. On any error the
/// transaction is rolled back and the error is returned with statement
/// context attached.
pub async fn write_dataset(
    conn: &dyn Connection,
    frame: &DataFrame,
    registry: &TypeRegistry,
    options: &WriteOptions,
) -> Result<u64> {
    let table = resolve_table_name(frame, options)?;
    let upsert_keys = if options.upsert {
        let keys = effective_primary_key(frame, options);
        if keys.is_empty() {
            return Err(Error::missing_primary_key(&table));
        }
        keys
    } else {
        Vec::new()
    };

    let mappings = column_mappings(registry, conn.database_id(), frame)?;
    let sql = insert_sql_from(&table, frame, &mappings, &upsert_keys)?;
    if frame.row_count() == 0 {
        return Ok(0);
    }
    if conn.auto_commit() {
        tracing::warn!(table = %table, "auto-commit is on; batched write will not be atomic");
    }

    match stream_rows(conn, frame, &mappings, &sql, options.batch_size).await {
        Ok(affected) => {
            conn.commit().await?;
            tracing::debug!(table = %table, rows = affected, "wrote frame");
            Ok(affected)
        }
        Err(e) => {
            if let Err(rb) = conn.rollback().await {
                tracing::warn!(error = %rb, "rollback failed after write error");
            }
            Err(e.with_sql(&sql))
        }
    }
}

/// Execute one statement as its own transaction: commit on success, roll
/// back and return the error (with the statement text attached) on
/// failure.
pub async fn execute_update(conn: &dyn Connection, sql: &str) -> Result<u64> {
    match conn.execute(sql).await {
        Ok(affected) => {
            conn.commit().await?;
            Ok(affected)
        }
        Err(e) => {
            if let Err(rb) = conn.rollback().await {
                tracing::warn!(error = %rb, "rollback failed after statement error");
            }
            Err(e.with_sql(sql))
        }
    }
}
