//! In-memory database backend for tests and examples.
//!
//! [`MemoryDb`] implements the capability traits over a shared in-memory
//! table store. It understands exactly the statement shapes the bridge
//! emits (`CREATE TABLE`, `DROP TABLE`, `INSERT ... VALUES`, the
//! existence probe and `SELECT * FROM t [ORDER BY ...]`), enforces
//! primary keys, honors the upsert clause, and models one transaction at
//! a time with snapshot-and-restore rollback. Failure injection knobs
//! make error paths reachable without a real database.
//!
//! The backend models a single connection with a single in-flight
//! statement; it is a test harness, not a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tabula_frame::Value;

use crate::connection::{ColumnDescriptor, Connection, PreparedStatement, QueryCursor, SqlType};
use crate::error::{Error, Result};

#[derive(Clone)]
struct MemColumn {
    name: String,
    declared: String,
    base: String,
}

#[derive(Clone)]
struct MemTable {
    columns: Vec<MemColumn>,
    primary_key: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl MemTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

#[derive(Default)]
struct DbState {
    tables: HashMap<String, MemTable>,
    /// Pre-transaction copy of `tables`, taken lazily at the first
    /// mutation while auto-commit is off.
    snapshot: Option<HashMap<String, MemTable>>,
    auto_commit: bool,
    open_cursors: usize,
    open_statements: usize,
    batch_executions: usize,
    statements: Vec<String>,
    fail_next_execute: Option<String>,
    fail_next_query: Option<String>,
    fail_batch_at: Option<(usize, String)>,
}

impl DbState {
    /// Snapshot before the first mutation of an explicit transaction.
    fn touch(&mut self) {
        if !self.auto_commit && self.snapshot.is_none() {
            self.snapshot = Some(self.tables.clone());
        }
    }
}

/// Shared in-memory table store. Cloning is cheap and every clone sees
/// the same tables.
#[derive(Clone)]
pub struct MemoryDb {
    inner: Arc<Mutex<DbState>>,
}

impl MemoryDb {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DbState {
                auto_commit: true,
                ..DbState::default()
            })),
        }
    }

    /// Open a connection reporting the database id `memdb`.
    pub fn connect(&self) -> MemoryConnection {
        self.connect_as("memdb")
    }

    /// Open a connection reporting an arbitrary database id, for
    /// exercising per-database mappings against the same store.
    pub fn connect_as(&self, database_id: impl Into<String>) -> MemoryConnection {
        MemoryConnection {
            db: self.clone(),
            database_id: database_id.into(),
            closed: AtomicBool::new(false),
        }
    }

    /// Fail the next `execute` call with a statement error.
    pub fn fail_next_execute(&self, message: impl Into<String>) {
        self.inner.lock().fail_next_execute = Some(message.into());
    }

    /// Fail the next `query` call with a statement error.
    pub fn fail_next_query(&self, message: impl Into<String>) {
        self.inner.lock().fail_next_query = Some(message.into());
    }

    /// Fail the `nth` batch execution (1-based, counted across the whole
    /// store) with a statement error.
    pub fn fail_batch_execution(&self, nth: usize, message: impl Into<String>) {
        self.inner.lock().fail_batch_at = Some((nth, message.into()));
    }

    /// Names of all current tables.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a table exists right now.
    pub fn has_table(&self, table: &str) -> bool {
        self.inner.lock().tables.contains_key(table)
    }

    /// Row count of a table, if it exists.
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.inner.lock().tables.get(table).map(|t| t.rows.len())
    }

    /// Primary key declared for a table, if it exists.
    pub fn primary_key(&self, table: &str) -> Option<Vec<String>> {
        self.inner
            .lock()
            .tables
            .get(table)
            .map(|t| t.primary_key.clone())
    }

    /// Column names and their declared SQL types, if the table exists.
    pub fn declared_columns(&self, table: &str) -> Option<Vec<(String, String)>> {
        self.inner.lock().tables.get(table).map(|t| {
            t.columns
                .iter()
                .map(|c| (c.name.clone(), c.declared.clone()))
                .collect()
        })
    }

    /// Number of cursors currently open.
    pub fn open_cursors(&self) -> usize {
        self.inner.lock().open_cursors
    }

    /// Number of prepared statements not yet closed.
    pub fn open_statements(&self) -> usize {
        self.inner.lock().open_statements
    }

    /// Number of batch executions performed so far.
    pub fn batch_executions(&self) -> usize {
        self.inner.lock().batch_executions
    }

    /// Every statement text passed to `execute` or `query`, in order.
    pub fn statement_log(&self) -> Vec<String> {
        self.inner.lock().statements.clone()
    }

    fn release_cursor(&self) {
        let mut state = self.inner.lock();
        state.open_cursors = state.open_cursors.saturating_sub(1);
    }
}

impl Default for MemoryDb {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("MemoryDb")
            .field("tables", &state.tables.keys().collect::<Vec<_>>())
            .field("open_cursors", &state.open_cursors)
            .field("open_statements", &state.open_statements)
            .finish()
    }
}

/// A connection into a [`MemoryDb`].
pub struct MemoryConnection {
    db: MemoryDb,
    database_id: String,
    closed: AtomicBool,
}

impl MemoryConnection {
    /// The store this connection talks to.
    pub fn db(&self) -> &MemoryDb {
        &self.db
    }

    fn check_open(&self) -> Result<()> {
        if self.closed.load(AtomicOrdering::SeqCst) {
            return Err(Error::connection("connection is closed"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnection")
            .field("database_id", &self.database_id)
            .field("closed", &self.closed.load(AtomicOrdering::SeqCst))
            .finish()
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    fn database_id(&self) -> &str {
        &self.database_id
    }

    fn auto_commit(&self) -> bool {
        self.db.inner.lock().auto_commit
    }

    async fn set_auto_commit(&self, enabled: bool) -> Result<()> {
        self.check_open()?;
        let mut state = self.db.inner.lock();
        state.auto_commit = enabled;
        if enabled {
            // Turning implicit commit back on commits the open
            // transaction, as drivers do.
            state.snapshot = None;
        }
        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        self.check_open()?;
        let mut state = self.db.inner.lock();
        state.statements.push(sql.to_string());
        if let Some(message) = state.fail_next_execute.take() {
            return Err(Error::statement_with_sql(message, sql));
        }

        let trimmed = sql.trim();
        if let Some(rest) = trimmed.strip_prefix("CREATE TABLE ") {
            let (name, table) = parse_create(rest)?;
            if state.tables.contains_key(&name) {
                return Err(Error::statement_with_sql(
                    format!("table '{name}' already exists"),
                    sql,
                ));
            }
            state.touch();
            state.tables.insert(name, table);
            Ok(0)
        } else if let Some(rest) = trimmed.strip_prefix("DROP TABLE ") {
            let name = rest.trim();
            state.touch();
            if state.tables.remove(name).is_none() {
                return Err(Error::statement_with_sql(
                    format!("no such table '{name}'"),
                    sql,
                ));
            }
            Ok(0)
        } else {
            Err(Error::statement_with_sql("unsupported statement", sql))
        }
    }

    async fn query(&self, sql: &str) -> Result<Box<dyn QueryCursor>> {
        self.check_open()?;
        let mut state = self.db.inner.lock();
        state.statements.push(sql.to_string());
        if let Some(message) = state.fail_next_query.take() {
            return Err(Error::statement_with_sql(message, sql));
        }

        let trimmed = sql.trim();
        let (columns, rows) = if let Some(rest) = probe_table(trimmed) {
            if !state.tables.contains_key(rest) {
                return Err(Error::statement_with_sql(
                    format!("no such table '{rest}'"),
                    sql,
                ));
            }
            (
                vec![ColumnDescriptor::new("count", "bigint", SqlType::BigInt)
                    .with_class_name("i64")],
                vec![vec![Some(Value::Int64(0))]],
            )
        } else if let Some(rest) = trimmed.strip_prefix("SELECT * FROM ") {
            let (name, order_by) = match rest.split_once(" ORDER BY ") {
                Some((name, order)) => (name.trim(), Some(order)),
                None => (rest.trim(), None),
            };
            let table = state.tables.get(name).ok_or_else(|| {
                Error::statement_with_sql(format!("no such table '{name}'"), sql)
            })?;
            let columns: Vec<ColumnDescriptor> =
                table.columns.iter().map(describe_column).collect();
            let mut rows = table.rows.clone();
            if let Some(order) = order_by {
                let keys: Vec<usize> = order
                    .split(',')
                    .map(|k| {
                        table.column_index(k.trim()).ok_or_else(|| {
                            Error::statement_with_sql(
                                format!("unknown ORDER BY column '{}'", k.trim()),
                                sql,
                            )
                        })
                    })
                    .collect::<Result<_>>()?;
                rows.sort_by(|a, b| {
                    keys.iter()
                        .map(|&k| cell_cmp(&a[k], &b[k]))
                        .find(|o| !o.is_eq())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            (columns, rows)
        } else {
            return Err(Error::statement_with_sql("unsupported query", sql));
        };

        state.open_cursors += 1;
        drop(state);
        Ok(Box::new(MemoryCursor {
            db: self.db.clone(),
            columns,
            rows,
            at: None,
            open: true,
        }))
    }

    async fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>> {
        self.check_open()?;
        let mut state = self.db.inner.lock();
        let plan = parse_insert(sql, &state.tables)?;
        state.open_statements += 1;
        drop(state);
        Ok(Box::new(MemoryStatement {
            db: self.db.clone(),
            sql: sql.to_string(),
            plan,
            bindings: Vec::new(),
            staged: Vec::new(),
            closed: false,
        }))
    }

    async fn commit(&self) -> Result<()> {
        self.check_open()?;
        self.db.inner.lock().snapshot = None;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.check_open()?;
        let mut state = self.db.inner.lock();
        if let Some(snapshot) = state.snapshot.take() {
            state.tables = snapshot;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, AtomicOrdering::SeqCst) {
            return Ok(());
        }
        // An open transaction dies with the connection.
        let mut state = self.db.inner.lock();
        if let Some(snapshot) = state.snapshot.take() {
            state.tables = snapshot;
        }
        Ok(())
    }
}

struct InsertPlan {
    table: String,
    /// For each statement parameter, the index of the table column it
    /// lands in.
    column_indices: Vec<usize>,
    table_width: usize,
    conflict_keys: Vec<usize>,
    do_nothing: bool,
}

struct MemoryStatement {
    db: MemoryDb,
    sql: String,
    plan: InsertPlan,
    bindings: Vec<Option<Option<Value>>>,
    staged: Vec<Vec<Option<Value>>>,
    closed: bool,
}

impl MemoryStatement {
    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::statement("statement is closed"));
        }
        Ok(())
    }

    fn slot(&mut self, pos: usize) -> Result<&mut Option<Option<Value>>> {
        let params = self.plan.column_indices.len();
        if pos == 0 || pos > params {
            return Err(Error::statement(format!(
                "parameter position {pos} out of range 1..={params}"
            )));
        }
        if self.bindings.len() != params {
            self.bindings.resize(params, None);
        }
        Ok(&mut self.bindings[pos - 1])
    }
}

#[async_trait]
impl PreparedStatement for MemoryStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind(&mut self, pos: usize, value: &Value) -> Result<()> {
        self.check_open()?;
        *self.slot(pos)? = Some(Some(value.clone()));
        Ok(())
    }

    fn bind_null(&mut self, pos: usize, _sql_type: SqlType) -> Result<()> {
        self.check_open()?;
        *self.slot(pos)? = Some(None);
        Ok(())
    }

    fn add_batch(&mut self) -> Result<()> {
        self.check_open()?;
        let params = self.plan.column_indices.len();
        if self.bindings.len() != params {
            self.bindings.resize(params, None);
        }
        let mut row: Vec<Option<Value>> = vec![None; self.plan.table_width];
        for (slot, &column) in self.bindings.iter_mut().zip(&self.plan.column_indices) {
            match slot.take() {
                Some(cell) => row[column] = cell,
                None => {
                    return Err(Error::statement_with_sql(
                        "row staged with unbound parameters",
                        &self.sql,
                    ))
                }
            }
        }
        self.staged.push(row);
        Ok(())
    }

    async fn execute_batch(&mut self) -> Result<u64> {
        self.check_open()?;
        let mut state = self.db.inner.lock();
        state.batch_executions += 1;
        if let Some((nth, message)) = state.fail_batch_at.take() {
            if state.batch_executions == nth {
                return Err(Error::statement_with_sql(message, &self.sql));
            }
            state.fail_batch_at = Some((nth, message));
        }
        state.touch();

        let table = state.tables.get_mut(&self.plan.table).ok_or_else(|| {
            Error::statement_with_sql(
                format!("no such table '{}'", self.plan.table),
                &self.sql,
            )
        })?;
        let key_indices: Vec<usize> = if self.plan.conflict_keys.is_empty() {
            table
                .primary_key
                .iter()
                .filter_map(|k| table.column_index(k))
                .collect()
        } else {
            self.plan.conflict_keys.clone()
        };

        let mut affected = 0u64;
        for row in self.staged.drain(..) {
            let existing = if key_indices.is_empty() {
                None
            } else {
                table
                    .rows
                    .iter_mut()
                    .find(|r| key_indices.iter().all(|&k| r[k] == row[k]))
            };
            match existing {
                Some(found) => {
                    if self.plan.conflict_keys.is_empty() {
                        // Plain insert hitting the table's primary key.
                        return Err(Error::statement_with_sql(
                            format!("duplicate key in table '{}'", self.plan.table),
                            &self.sql,
                        ));
                    }
                    if !self.plan.do_nothing {
                        for idx in 0..found.len() {
                            if !key_indices.contains(&idx) {
                                found[idx] = row[idx].clone();
                            }
                        }
                        affected += 1;
                    }
                }
                None => {
                    table.rows.push(row);
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            let mut state = self.db.inner.lock();
            state.open_statements = state.open_statements.saturating_sub(1);
        }
        Ok(())
    }
}

struct MemoryCursor {
    db: MemoryDb,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Vec<Option<Value>>>,
    at: Option<usize>,
    open: bool,
}

#[async_trait]
impl QueryCursor for MemoryCursor {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    async fn advance(&mut self) -> Result<bool> {
        if !self.open {
            return Err(Error::statement("cursor is closed"));
        }
        let next = self.at.map_or(0, |i| i + 1);
        if next < self.rows.len() {
            self.at = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn get(&self, pos: usize) -> Result<Option<Value>> {
        if !self.open {
            return Err(Error::statement("cursor is closed"));
        }
        let row = self
            .at
            .ok_or_else(|| Error::statement("cursor has no current row"))?;
        if pos == 0 || pos > self.columns.len() {
            return Err(Error::statement(format!(
                "column position {pos} out of range 1..={}",
                self.columns.len()
            )));
        }
        Ok(self.rows[row][pos - 1].clone())
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.db.release_cursor();
        }
        Ok(())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        if self.open {
            self.db.release_cursor();
        }
    }
}

fn probe_table(sql: &str) -> Option<&str> {
    sql.strip_prefix("SELECT COUNT(*) FROM ")?
        .strip_suffix("WHERE 1=0")
        .map(str::trim)
}

fn parse_create(rest: &str) -> Result<(String, MemTable)> {
    let bad = || Error::statement(format!("cannot parse CREATE TABLE {rest}"));
    let open = rest.find('(').ok_or_else(bad)?;
    let close = rest.rfind(')').ok_or_else(bad)?;
    let name = rest[..open].trim().to_string();
    if name.is_empty() || close <= open {
        return Err(bad());
    }

    let mut columns = Vec::new();
    let mut primary_key = Vec::new();
    for line in rest[open + 1..close].split(",\n") {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(keys) = line.strip_prefix("PRIMARY KEY") {
            let keys = keys.trim().trim_start_matches('(').trim_end_matches(')');
            primary_key = keys.split(',').map(|k| k.trim().to_string()).collect();
        } else {
            let (name, declared) = line.split_once(' ').ok_or_else(bad)?;
            columns.push(MemColumn {
                name: name.to_string(),
                declared: declared.trim().to_string(),
                base: base_name(declared),
            });
        }
    }
    if columns.is_empty() {
        return Err(bad());
    }
    Ok((
        name,
        MemTable {
            columns,
            primary_key,
            rows: Vec::new(),
        },
    ))
}

fn parse_insert(sql: &str, tables: &HashMap<String, MemTable>) -> Result<InsertPlan> {
    let bad = |what: &str| Error::statement_with_sql(format!("cannot parse insert: {what}"), sql);
    let rest = sql
        .trim()
        .strip_prefix("INSERT INTO ")
        .ok_or_else(|| bad("expected INSERT INTO"))?;

    let open = rest.find('(').ok_or_else(|| bad("missing column list"))?;
    let table_name = rest[..open].trim().to_string();
    let table = tables
        .get(&table_name)
        .ok_or_else(|| Error::statement_with_sql(format!("no such table '{table_name}'"), sql))?;

    let close = rest[open..]
        .find(')')
        .map(|i| i + open)
        .ok_or_else(|| bad("unterminated column list"))?;
    let column_indices: Vec<usize> = rest[open + 1..close]
        .split(',')
        .map(|name| {
            let name = name.trim();
            table
                .column_index(name)
                .ok_or_else(|| Error::statement_with_sql(format!("unknown column '{name}'"), sql))
        })
        .collect::<Result<_>>()?;

    let values = rest[close + 1..].trim_start();
    let values = values
        .strip_prefix("VALUES ")
        .ok_or_else(|| bad("expected VALUES"))?;
    let vopen = values.find('(').ok_or_else(|| bad("missing placeholder list"))?;
    let vclose = values[vopen..]
        .find(')')
        .map(|i| i + vopen)
        .ok_or_else(|| bad("unterminated placeholder list"))?;
    let placeholders = values[vopen + 1..vclose].split(',').count();
    if placeholders != column_indices.len() {
        return Err(bad("placeholder count does not match column count"));
    }

    let tail = values[vclose + 1..].trim();
    let (conflict_keys, do_nothing) = if tail.is_empty() {
        (Vec::new(), false)
    } else if let Some(conflict) = tail.strip_prefix("ON CONFLICT ") {
        let kopen = conflict.find('(').ok_or_else(|| bad("missing conflict keys"))?;
        let kclose = conflict[kopen..]
            .find(')')
            .map(|i| i + kopen)
            .ok_or_else(|| bad("unterminated conflict keys"))?;
        let keys: Vec<usize> = conflict[kopen + 1..kclose]
            .split(',')
            .map(|name| {
                let name = name.trim();
                table.column_index(name).ok_or_else(|| {
                    Error::statement_with_sql(format!("unknown conflict key '{name}'"), sql)
                })
            })
            .collect::<Result<_>>()?;
        let action = conflict[kclose + 1..].trim();
        let do_nothing = action == "DO NOTHING";
        if !do_nothing && !action.starts_with("DO UPDATE SET ") {
            return Err(bad("unsupported conflict action"));
        }
        (keys, do_nothing)
    } else {
        return Err(bad("unsupported insert tail"));
    };

    Ok(InsertPlan {
        table: table_name,
        column_indices,
        table_width: table.columns.len(),
        conflict_keys,
        do_nothing,
    })
}

fn base_name(declared: &str) -> String {
    let name = match declared.find('(') {
        Some(idx) => &declared[..idx],
        None => declared,
    };
    name.trim().to_lowercase()
}

fn describe_column(column: &MemColumn) -> ColumnDescriptor {
    let sql_type = sql_type_for(&column.base);
    let descriptor = ColumnDescriptor::new(&column.name, &column.base, sql_type);
    match class_name_for(&column.base) {
        Some(class) => descriptor.with_class_name(class),
        None => descriptor,
    }
}

fn sql_type_for(base: &str) -> SqlType {
    match base {
        "tinyint" => SqlType::TinyInt,
        "smallint" => SqlType::SmallInt,
        "int" | "integer" => SqlType::Integer,
        "bigint" => SqlType::BigInt,
        "float" => SqlType::Float,
        "real" => SqlType::Real,
        "double precision" => SqlType::Double,
        "varchar" => SqlType::Varchar,
        "nvarchar" => SqlType::NVarchar,
        "text" | "clob" => SqlType::LongVarchar,
        "date" => SqlType::Date,
        "time" => SqlType::Time,
        "timestamp" | "datetime2" => SqlType::Timestamp,
        "timestamptz" | "datetimeoffset" => SqlType::TimestampWithTimezone,
        "bool" | "boolean" => SqlType::Boolean,
        "bit" => SqlType::Bit,
        _ => SqlType::Other,
    }
}

fn class_name_for(base: &str) -> Option<&'static str> {
    let class = match base {
        "tinyint" => "i8",
        "smallint" => "i16",
        "int" | "integer" => "i32",
        "bigint" => "i64",
        "float" | "real" => "f32",
        "double precision" => "f64",
        "varchar" | "nvarchar" | "text" | "clob" => "String",
        "bool" | "boolean" | "bit" => "bool",
        _ => return None,
    };
    Some(class)
}

fn cell_cmp(a: &Option<Value>, b: &Option<Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => value_cmp(a, b),
    }
}

fn value_cmp(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // 64-bit integers keep integer ordering; a float detour loses
        // distinctions above 2^53.
        (Value::Int64(x), Value::Int64(y)) => x.cmp(y),
        (Value::UInt64(x), Value::UInt64(y)) => x.cmp(y),
        (Value::Duration(x), Value::Duration(y)) => x.cmp(y),
        (Value::Utf8(x), Value::Utf8(y)) => x.cmp(y),
        (Value::Uuid(x), Value::Uuid(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Time(x), Value::Time(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::TimestampTz(x), Value::TimestampTz(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}
