//! Result-set decoding: cursors in, frames out.
//!
//! [`FrameReader`] walks a [`QueryCursor`] and materializes batches of
//! rows as [`DataFrame`]s. Column typing is planned once per query from
//! the cursor's metadata; each batch then runs the same plan, so a query
//! decoded in one batch or in fifty produces the same concatenated rows.
//! Columns the plan cannot type are built promotively from their values.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tabula_frame::{Column, DataFrame, PromotedBuilder, Value};

use crate::connection::{Connection, QueryCursor};
use crate::error::{Error, Result};
use crate::registry::{ParserOverride, ReadMapping, TypeRegistry};
use crate::schema::sanitize_ident;

/// Default number of rows per decoded batch.
pub const DEFAULT_READ_BATCH_SIZE: usize = 64_000;

/// Options for the read path.
#[derive(Clone)]
pub struct ReadOptions {
    /// Rows per batch. `0` (or `usize::MAX`) reads everything into a
    /// single batch.
    pub batch_size: usize,
    /// Whether the cursor is released once the stream is exhausted or
    /// fails. Defaults to `true`; turn off only when the caller manages
    /// the cursor's lifetime itself.
    pub close: bool,
    /// Optional renaming applied to every column label before it is used
    /// as a column name or override key.
    pub key_fn: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,
    /// Per-column read overrides, keyed by post-rename label.
    pub parsers: HashMap<String, ParserOverride>,
}

impl ReadOptions {
    /// Options with the default batch size and cursor release on.
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_READ_BATCH_SIZE,
            close: true,
            key_fn: None,
            parsers: HashMap::new(),
        }
    }

    /// Set the rows-per-batch limit.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Read the whole result set as one batch.
    pub fn unbounded(mut self) -> Self {
        self.batch_size = 0;
        self
    }

    /// Control cursor release on exhaustion or failure.
    pub fn with_close(mut self, close: bool) -> Self {
        self.close = close;
        self
    }

    /// Rename column labels through `key_fn`.
    pub fn with_key_fn(mut self, key_fn: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.key_fn = Some(Arc::new(key_fn));
        self
    }

    /// Override how the column labeled `label` (after renaming) decodes.
    pub fn with_parser(mut self, label: impl Into<String>, parser: ParserOverride) -> Self {
        self.parsers.insert(label.into(), parser);
        self
    }

    fn batch_limit(&self) -> Option<usize> {
        match self.batch_size {
            0 | usize::MAX => None,
            n => Some(n),
        }
    }

    fn rename(&self, label: &str) -> String {
        match &self.key_fn {
            Some(f) => f(label),
            None => label.to_string(),
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("batch_size", &self.batch_size)
            .field("close", &self.close)
            .field("key_fn", &self.key_fn.is_some())
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Cursor open, nothing pulled yet.
    Open,
    /// Mid-stream, at a batch boundary.
    BatchReady,
    /// Source exhausted.
    Drained,
    /// Explicitly closed.
    Closed,
}

struct ColumnPlan {
    label: String,
    mapping: ReadMapping,
}

enum ColumnSink {
    Fixed(Column),
    Inferred(PromotedBuilder),
}

impl ColumnSink {
    fn push_opt(&mut self, value: Option<Value>) -> tabula_frame::Result<()> {
        match self {
            Self::Fixed(column) => column.push_opt(value),
            Self::Inferred(builder) => builder.push_opt(value),
        }
    }

    fn finish(self) -> Column {
        match self {
            Self::Fixed(column) => column,
            Self::Inferred(builder) => builder.finish(),
        }
    }
}

/// A streaming decoder over one query's result set.
///
/// Each call to [`FrameReader::next_batch`] pulls up to one batch of rows
/// and returns them as a frame, or `None` once the stream is done. The
/// first batch is returned even when empty, so callers always observe the
/// result's column structure. Decode errors propagate to the caller;
/// the cursor is still released on the way out unless
/// [`ReadOptions::close`] was turned off.
pub struct FrameReader {
    cursor: Option<Box<dyn QueryCursor>>,
    plans: Vec<ColumnPlan>,
    batch_limit: Option<usize>,
    close_on_drain: bool,
    state: ReaderState,
    rows_read: u64,
}

impl FrameReader {
    /// Plan decoding for an already-open cursor.
    pub fn new(
        cursor: Box<dyn QueryCursor>,
        database: &str,
        registry: &TypeRegistry,
        options: &ReadOptions,
    ) -> Self {
        let overrides = if options.parsers.is_empty() {
            None
        } else {
            Some(&options.parsers)
        };
        let plans = cursor
            .columns()
            .iter()
            .map(|descriptor| {
                let label = options.rename(&descriptor.label);
                let mapping = registry.resolve_read(database, descriptor, &label, overrides);
                ColumnPlan { label, mapping }
            })
            .collect();
        Self {
            cursor: Some(cursor),
            plans,
            batch_limit: options.batch_limit(),
            close_on_drain: options.close,
            state: ReaderState::Open,
            rows_read: 0,
        }
    }

    /// Run `sql` on `conn` and plan decoding for its result set.
    pub async fn query(
        conn: &dyn Connection,
        sql: &str,
        registry: &TypeRegistry,
        options: &ReadOptions,
    ) -> Result<Self> {
        let cursor = conn.query(sql).await.map_err(|e| e.with_sql(sql))?;
        Ok(Self::new(cursor, conn.database_id(), registry, options))
    }

    /// Labels of the planned output columns, in position order.
    pub fn labels(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.label.as_str()).collect()
    }

    /// Total rows decoded so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Whether the stream has ended, by exhaustion or by closing.
    pub fn is_done(&self) -> bool {
        matches!(self.state, ReaderState::Drained | ReaderState::Closed)
    }

    /// Decode the next batch. Returns `None` once the stream is
    /// exhausted or the reader was closed.
    pub async fn next_batch(&mut self) -> Result<Option<DataFrame>> {
        match self.state {
            ReaderState::Drained | ReaderState::Closed => return Ok(None),
            ReaderState::Open | ReaderState::BatchReady => {}
        }
        let first_pull = self.state == ReaderState::Open;

        let mut sinks = make_sinks(&self.plans)?;
        let mut rows = 0usize;
        // Ok(true) means the source ran out inside this pull.
        let outcome: Result<bool>;
        {
            let Some(cursor) = self.cursor.as_mut() else {
                return Err(Error::connection("cursor already released"));
            };
            let plans = &self.plans;
            outcome = 'pull: loop {
                if self.batch_limit.is_some_and(|limit| rows == limit) {
                    break 'pull Ok(false);
                }
                match cursor.advance().await {
                    Ok(true) => {
                        for (idx, (plan, sink)) in
                            plans.iter().zip(sinks.iter_mut()).enumerate()
                        {
                            let cell = match (plan.mapping.decode)(&**cursor, idx + 1) {
                                Ok(cell) => cell,
                                Err(e) => break 'pull Err(e.in_column(&plan.label)),
                            };
                            if let Err(e) = sink.push_opt(cell) {
                                break 'pull Err(Error::from(e).in_column(&plan.label));
                            }
                        }
                        rows += 1;
                    }
                    Ok(false) => break 'pull Ok(true),
                    Err(e) => break 'pull Err(e),
                }
            };
        }

        match outcome {
            Err(e) => {
                self.state = ReaderState::Closed;
                if self.close_on_drain {
                    self.release_cursor().await;
                }
                Err(e)
            }
            Ok(exhausted) => {
                if exhausted {
                    self.state = ReaderState::Drained;
                    if self.close_on_drain {
                        self.release_cursor().await;
                    }
                    if rows == 0 && !first_pull {
                        return Ok(None);
                    }
                } else {
                    self.state = ReaderState::BatchReady;
                }
                self.rows_read += rows as u64;
                let columns: Vec<Column> =
                    sinks.into_iter().map(ColumnSink::finish).collect();
                Ok(Some(DataFrame::new(columns)?))
            }
        }
    }

    /// Release the cursor now. Safe to call at any point, any number of
    /// times; a closed reader yields no further batches.
    pub async fn close(&mut self) -> Result<()> {
        self.state = ReaderState::Closed;
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close().await?;
        }
        Ok(())
    }

    async fn release_cursor(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            if let Err(e) = cursor.close().await {
                tracing::warn!(error = %e, "failed to release cursor");
            }
        }
    }
}

impl fmt::Debug for FrameReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameReader")
            .field("labels", &self.labels())
            .field("state", &self.state)
            .field("rows_read", &self.rows_read)
            .finish()
    }
}

fn make_sinks(plans: &[ColumnPlan]) -> Result<Vec<ColumnSink>> {
    plans
        .iter()
        .map(|plan| {
            Ok(match plan.mapping.datatype {
                Some(datatype) => ColumnSink::Fixed(Column::new(&plan.label, datatype)?),
                None => ColumnSink::Inferred(PromotedBuilder::new(&plan.label)),
            })
        })
        .collect()
}

/// Run a query and decode its whole result set into one frame.
///
/// Batches are pulled per [`ReadOptions::batch_size`] and concatenated,
/// so the options only affect peak memory, never the resulting rows.
pub async fn read_dataset(
    conn: &dyn Connection,
    sql: &str,
    registry: &TypeRegistry,
    options: &ReadOptions,
) -> Result<DataFrame> {
    let mut reader = FrameReader::query(conn, sql, registry, options).await?;
    let mut frames = Vec::new();
    while let Some(frame) = reader.next_batch().await? {
        frames.push(frame);
    }
    tracing::debug!(
        batches = frames.len(),
        rows = reader.rows_read(),
        "drained query into frame"
    );
    if frames.is_empty() {
        return Ok(DataFrame::empty());
    }
    Ok(DataFrame::concat(frames)?)
}

/// Read a whole table with default options.
pub async fn read_table(
    conn: &dyn Connection,
    table: &str,
    registry: &TypeRegistry,
) -> Result<DataFrame> {
    let sql = format!("SELECT * FROM {}", sanitize_ident(table));
    read_dataset(conn, &sql, registry, &ReadOptions::default()).await
}
