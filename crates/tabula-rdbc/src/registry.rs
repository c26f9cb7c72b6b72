//! Per-database type mapping.
//!
//! The [`TypeRegistry`] answers two questions. On the write path: given a
//! column's element type, which SQL type does a database want, and how
//! should values be encoded and placeholders rendered? On the read path:
//! given a result-set column's reported metadata, which element type
//! should the decoded column have, and which function turns cursor cells
//! into values?
//!
//! Both directions resolve through a fixed precedence chain so quirks can
//! be layered per database without touching bridge code.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tabula_frame::{Column, SemanticType, Value};

use crate::connection::{ColumnDescriptor, QueryCursor, SqlType};
use crate::error::{Error, Result};

/// Encodes one in-memory value into the representation a driver should
/// bind. Identity for most types; databases without a native type for,
/// say, UUIDs encode them as strings here.
pub type EncodeFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Decodes the cell at a 1-based position of the cursor's current row.
/// `Ok(None)` means NULL.
pub type DecodeFn =
    Arc<dyn Fn(&dyn QueryCursor, usize) -> Result<Option<Value>> + Send + Sync>;

/// How to write one element type to one database.
#[derive(Clone)]
pub struct WriteEntry {
    /// SQL type name used in DDL, possibly with arguments
    /// (`varchar(4096)`).
    pub sql_type_name: String,
    /// SQL type index sent with NULL bindings.
    pub sql_type: SqlType,
    /// Value encoder applied before binding, if the type needs one.
    pub encode: Option<EncodeFn>,
    /// Parameter placeholder, when the database needs more than `?`
    /// (postgres UUID parameters bind as `?::UUID`).
    pub placeholder: Option<String>,
}

impl WriteEntry {
    /// Create an entry with no encoder and the default placeholder.
    pub fn new(sql_type_name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            sql_type_name: sql_type_name.into(),
            sql_type,
            encode: None,
            placeholder: None,
        }
    }

    /// Attach a value encoder.
    pub fn with_encode(mut self, encode: EncodeFn) -> Self {
        self.encode = Some(encode);
        self
    }

    /// Use a custom parameter placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

impl fmt::Debug for WriteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteEntry")
            .field("sql_type_name", &self.sql_type_name)
            .field("sql_type", &self.sql_type)
            .field("encode", &self.encode.is_some())
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

/// How to read one reported SQL type name from one database.
#[derive(Clone)]
pub struct ReadEntry {
    /// Element type of the decoded column. `None` leaves the column to
    /// promotional inference over the decoded values.
    pub datatype: Option<SemanticType>,
    /// Cell decoder.
    pub decode: DecodeFn,
}

impl ReadEntry {
    /// Create an entry using the standard coercing decoder for
    /// `datatype`.
    pub fn new(datatype: SemanticType) -> Self {
        Self {
            datatype: Some(datatype),
            decode: decoder_for(datatype),
        }
    }

    /// Create an entry whose column type is inferred from the values
    /// `decode` produces.
    pub fn inferred(decode: DecodeFn) -> Self {
        Self {
            datatype: None,
            decode,
        }
    }

    /// Replace the decoder.
    pub fn with_decode(mut self, decode: DecodeFn) -> Self {
        self.decode = decode;
        self
    }
}

impl fmt::Debug for ReadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadEntry")
            .field("datatype", &self.datatype)
            .finish()
    }
}

/// A caller-supplied per-column override for the read path, keyed by the
/// column's post-rename label.
#[derive(Clone, Default)]
pub struct ParserOverride {
    /// Element type to decode into, if fixed.
    pub datatype: Option<SemanticType>,
    /// Custom decoder. When absent, the standard decoder for `datatype`
    /// is used.
    pub decode: Option<DecodeFn>,
}

impl ParserOverride {
    /// Decode into `datatype` with the standard coercing decoder.
    pub fn datatype(datatype: SemanticType) -> Self {
        Self {
            datatype: Some(datatype),
            decode: None,
        }
    }

    /// Decode with a custom function into a column of `datatype`.
    pub fn with_decode(datatype: SemanticType, decode: DecodeFn) -> Self {
        Self {
            datatype: Some(datatype),
            decode: Some(decode),
        }
    }
}

impl fmt::Debug for ParserOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOverride")
            .field("datatype", &self.datatype)
            .field("decode", &self.decode.is_some())
            .finish()
    }
}

/// Fully resolved write mapping for one column.
#[derive(Clone)]
pub struct WriteMapping {
    /// SQL type name for DDL.
    pub sql_type_name: String,
    /// SQL type index for NULL bindings.
    pub sql_type: SqlType,
    /// Encoder to run before binding, if any.
    pub encode: Option<EncodeFn>,
    /// Parameter placeholder for statement text.
    pub placeholder: String,
}

impl fmt::Debug for WriteMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteMapping")
            .field("sql_type_name", &self.sql_type_name)
            .field("sql_type", &self.sql_type)
            .field("encode", &self.encode.is_some())
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

/// Fully resolved read mapping for one result-set column.
#[derive(Clone)]
pub struct ReadMapping {
    /// Element type to build, or `None` to infer promotively from the
    /// values themselves.
    pub datatype: Option<SemanticType>,
    /// Cell decoder.
    pub decode: DecodeFn,
}

impl fmt::Debug for ReadMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadMapping")
            .field("datatype", &self.datatype)
            .finish()
    }
}

/// The database-independent write mapping for element types that have
/// one. Returns the SQL type name and index, or `None` for types that
/// must be mapped per database.
pub fn default_write_mapping(datatype: SemanticType) -> Option<(&'static str, SqlType)> {
    let mapping = match datatype {
        SemanticType::Int8 => ("tinyint", SqlType::TinyInt),
        SemanticType::Int16 => ("smallint", SqlType::SmallInt),
        SemanticType::Int32 => ("int", SqlType::Integer),
        SemanticType::Int64 => ("bigint", SqlType::BigInt),
        // Unsigned widths land in the next wider signed SQL type.
        SemanticType::UInt8 => ("smallint", SqlType::SmallInt),
        SemanticType::UInt16 => ("int", SqlType::Integer),
        SemanticType::UInt32 => ("bigint", SqlType::BigInt),
        SemanticType::UInt64 => ("bigint", SqlType::BigInt),
        SemanticType::Float32 => ("float", SqlType::Float),
        SemanticType::Float64 => ("double precision", SqlType::Double),
        SemanticType::Utf8 => ("varchar(4096)", SqlType::Varchar),
        SemanticType::Text => ("text", SqlType::LongVarchar),
        SemanticType::LocalDate => ("date", SqlType::Date),
        SemanticType::LocalTime => ("time", SqlType::Time),
        SemanticType::Instant => ("timestamp", SqlType::Timestamp),
        // Everything else differs enough across engines that a generic
        // guess would be wrong somewhere. Map per database or override
        // per column.
        _ => return None,
    };
    Some(mapping)
}

/// SQL type names whose columns decode as unbounded text whatever the
/// database calls them.
const LONG_TEXT_TYPE_NAMES: &[&str] = &[
    "text",
    "tinytext",
    "mediumtext",
    "longtext",
    "clob",
    "ntext",
    "longvarchar",
    "long varchar",
];

/// Last-resort typing from the host-language class name a driver reports
/// for a column.
fn heuristic_datatype(class_name: &str) -> Option<SemanticType> {
    let name = class_name.to_lowercase();
    let name = name.strip_prefix("java.lang.").unwrap_or(&name);
    let datatype = match name {
        "string" | "str" => SemanticType::Utf8,
        "boolean" | "bool" => SemanticType::Bool,
        "byte" | "i8" => SemanticType::Int8,
        "short" | "i16" => SemanticType::Int16,
        "integer" | "int" | "i32" => SemanticType::Int32,
        "long" | "i64" => SemanticType::Int64,
        "float" | "f32" => SemanticType::Float32,
        "double" | "f64" => SemanticType::Float64,
        _ => return None,
    };
    Some(datatype)
}

/// Lowercased type name with any argument list removed:
/// `VARCHAR(40)` becomes `varchar`.
fn base_type_name(type_name: &str) -> String {
    let name = match type_name.find('(') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    };
    name.trim().to_lowercase()
}

/// Convert a decoded value into the representation `target` columns
/// store. Numeric values move between widths when they fit; strings
/// parse into UUIDs and temporal types.
fn coerce(value: Value, target: SemanticType) -> Result<Value> {
    if value.semantic_type() == target {
        return Ok(value);
    }
    if target.is_textual() {
        return Ok(match value {
            Value::Utf8(s) => Value::Utf8(s),
            other => Value::Utf8(other.to_string()),
        });
    }

    let fail = |value: &Value| {
        Err(Error::type_conversion(format!(
            "cannot convert {} value to {target}",
            value.semantic_type()
        )))
    };

    match target {
        SemanticType::Bool => match value.as_bool() {
            Some(b) => Ok(Value::Bool(b)),
            None => fail(&value),
        },
        t if t.is_integer() => coerce_integer(value, t),
        SemanticType::Float32 => match value.as_f64() {
            Some(f) => Ok(Value::Float32(f as f32)),
            None => fail(&value),
        },
        SemanticType::Float64 => match value.as_f64() {
            Some(f) => Ok(Value::Float64(f)),
            None => fail(&value),
        },
        SemanticType::Uuid => match value.as_uuid() {
            Some(u) => Ok(Value::Uuid(u)),
            None => fail(&value),
        },
        SemanticType::LocalDate => match &value {
            Value::Timestamp(ts) => Ok(Value::Date(ts.date())),
            Value::Utf8(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Value::Date)
                .or_else(|_| fail(&value)),
            _ => fail(&value),
        },
        SemanticType::LocalTime => match &value {
            Value::Utf8(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .map(Value::Time)
                .or_else(|_| fail(&value)),
            _ => fail(&value),
        },
        SemanticType::Instant => match &value {
            Value::TimestampTz(ts) => Ok(Value::Timestamp(ts.naive_utc())),
            Value::Date(d) => Ok(Value::Timestamp(d.and_time(NaiveTime::default()))),
            Value::Utf8(s) => parse_timestamp(s)
                .map(Value::Timestamp)
                .ok_or(())
                .or_else(|()| fail(&value)),
            _ => fail(&value),
        },
        SemanticType::ZonedDateTime => match &value {
            Value::Timestamp(ts) => Ok(Value::TimestampTz(ts.and_utc())),
            Value::Utf8(s) => DateTime::parse_from_rfc3339(s)
                .map(|ts| Value::TimestampTz(ts.to_utc()))
                .or_else(|_| fail(&value)),
            _ => fail(&value),
        },
        SemanticType::Duration => match value.as_i64() {
            Some(us) => Ok(Value::Duration(us)),
            None => fail(&value),
        },
        _ => fail(&value),
    }
}

fn coerce_integer(value: Value, target: SemanticType) -> Result<Value> {
    let fail = || {
        Err(Error::type_conversion(format!(
            "cannot convert {} value to {target}",
            value.semantic_type()
        )))
    };
    if target == SemanticType::UInt64 {
        return match &value {
            Value::UInt64(u) => Ok(Value::UInt64(*u)),
            _ => match value.as_i64().and_then(|i| u64::try_from(i).ok()) {
                Some(u) => Ok(Value::UInt64(u)),
                None => fail(),
            },
        };
    }
    let Some(i) = value.as_i64() else {
        return fail();
    };
    let converted = match target {
        SemanticType::Int8 => i8::try_from(i).ok().map(Value::Int8),
        SemanticType::Int16 => i16::try_from(i).ok().map(Value::Int16),
        SemanticType::Int32 => i32::try_from(i).ok().map(Value::Int32),
        SemanticType::Int64 => Some(Value::Int64(i)),
        SemanticType::UInt8 => u8::try_from(i).ok().map(Value::UInt8),
        SemanticType::UInt16 => u16::try_from(i).ok().map(Value::UInt16),
        SemanticType::UInt32 => u32::try_from(i).ok().map(Value::UInt32),
        _ => None,
    };
    match converted {
        Some(v) => Ok(v),
        None => fail(),
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// The standard decoder for an element type: read the cell, pass NULL
/// through, coerce anything else into `datatype`'s representation.
pub fn decoder_for(datatype: SemanticType) -> DecodeFn {
    Arc::new(move |cursor, pos| match cursor.get(pos)? {
        Some(value) => coerce(value, datatype).map(Some),
        None => Ok(None),
    })
}

/// A decoder that hands cells through untouched, for columns whose type
/// is inferred promotively from the values.
pub fn opaque_decoder() -> DecodeFn {
    Arc::new(|cursor, pos| cursor.get(pos))
}

/// Bidirectional type-mapping table, keyed by database identifier.
///
/// A registry is a plain value: build one, register quirks, and share it
/// by reference. [`TypeRegistry::default`] returns the built-in table
/// with per-engine entries for postgres, SQL Server and the in-memory
/// test backend; [`TypeRegistry::new`] starts empty apart from the
/// database-independent defaults, which are always consulted last.
#[derive(Clone)]
pub struct TypeRegistry {
    write: HashMap<(String, SemanticType), WriteEntry>,
    read: HashMap<(String, String), ReadEntry>,
}

impl TypeRegistry {
    /// An empty registry. Write resolution still falls back to
    /// [`default_write_mapping`].
    pub fn new() -> Self {
        Self {
            write: HashMap::new(),
            read: HashMap::new(),
        }
    }

    /// The built-in table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.install_postgresql();
        registry.install_sqlserver();
        registry.install_memdb();
        registry
    }

    /// Register both directions for one element type: writes of
    /// `datatype` use `sql_type_name`, and reads of that type name decode
    /// back into `datatype`. Re-registering replaces the previous entry.
    pub fn register(
        &mut self,
        database: impl Into<String>,
        datatype: SemanticType,
        sql_type_name: impl Into<String>,
        sql_type: SqlType,
    ) -> &mut Self {
        let database = database.into();
        let sql_type_name = sql_type_name.into();
        self.register_read(&database, base_type_name(&sql_type_name), ReadEntry::new(datatype));
        self.register_write(database, datatype, WriteEntry::new(sql_type_name, sql_type));
        self
    }

    /// Register a write-direction entry only.
    pub fn register_write(
        &mut self,
        database: impl Into<String>,
        datatype: SemanticType,
        entry: WriteEntry,
    ) -> &mut Self {
        self.write
            .insert((database.into().to_lowercase(), datatype), entry);
        self
    }

    /// Register a read-direction entry only, keyed by the reported SQL
    /// type name.
    pub fn register_read(
        &mut self,
        database: impl Into<String>,
        type_name: impl Into<String>,
        entry: ReadEntry,
    ) -> &mut Self {
        self.read.insert(
            (
                database.into().to_lowercase(),
                base_type_name(&type_name.into()),
            ),
            entry,
        );
        self
    }

    /// Look up the write entry for an element type, without defaults.
    pub fn write_entry(&self, database: &str, datatype: SemanticType) -> Option<&WriteEntry> {
        self.write.get(&(database.to_lowercase(), datatype))
    }

    /// Look up the read entry for a reported type name, without
    /// fallbacks.
    pub fn read_entry(&self, database: &str, type_name: &str) -> Option<&ReadEntry> {
        self.read
            .get(&(database.to_lowercase(), base_type_name(type_name)))
    }

    /// Resolve how to write one column to `database`.
    ///
    /// Precedence: the column's own SQL type override, then the
    /// registered entry for its element type, then the
    /// database-independent default. With none of the three the column
    /// cannot be written and resolution fails.
    pub fn resolve_write(&self, database: &str, column: &Column) -> Result<WriteMapping> {
        let datatype = column.datatype();
        let entry = self.write_entry(database, datatype);
        let default = default_write_mapping(datatype);

        let (sql_type_name, sql_type) = match (column.sql_type_override(), entry, default) {
            (Some(over), entry, default) => {
                let sql_type = entry
                    .map(|e| e.sql_type)
                    .or(default.map(|d| d.1))
                    .unwrap_or(SqlType::Other);
                (over.to_string(), sql_type)
            }
            (None, Some(entry), _) => (entry.sql_type_name.clone(), entry.sql_type),
            (None, None, Some(default)) => (default.0.to_string(), default.1),
            (None, None, None) => return Err(Error::unmapped(datatype, database)),
        };

        Ok(WriteMapping {
            sql_type_name,
            sql_type,
            encode: entry.and_then(|e| e.encode.clone()),
            placeholder: entry
                .and_then(|e| e.placeholder.clone())
                .unwrap_or_else(|| "?".to_string()),
        })
    }

    /// Resolve how to read one result-set column from `database`.
    ///
    /// Precedence: a caller override for the column's post-rename
    /// `label`, then the registered entry for the reported type name,
    /// then the long-text name set, then the class-name heuristic, and
    /// finally an opaque pass-through that leaves typing to promotional
    /// inference.
    pub fn resolve_read(
        &self,
        database: &str,
        descriptor: &ColumnDescriptor,
        label: &str,
        overrides: Option<&HashMap<String, ParserOverride>>,
    ) -> ReadMapping {
        if let Some(over) = overrides.and_then(|m| m.get(label)) {
            let decode = match (&over.decode, over.datatype) {
                (Some(decode), _) => decode.clone(),
                (None, Some(datatype)) => decoder_for(datatype),
                (None, None) => opaque_decoder(),
            };
            return ReadMapping {
                datatype: over.datatype,
                decode,
            };
        }

        let type_name = base_type_name(&descriptor.type_name);
        if let Some(entry) = self.read.get(&(database.to_lowercase(), type_name.clone())) {
            return ReadMapping {
                datatype: entry.datatype,
                decode: entry.decode.clone(),
            };
        }

        if LONG_TEXT_TYPE_NAMES.contains(&type_name.as_str()) {
            return ReadMapping {
                datatype: Some(SemanticType::Text),
                decode: decoder_for(SemanticType::Text),
            };
        }

        if let Some(datatype) = descriptor
            .class_name
            .as_deref()
            .and_then(heuristic_datatype)
        {
            return ReadMapping {
                datatype: Some(datatype),
                decode: decoder_for(datatype),
            };
        }

        ReadMapping {
            datatype: None,
            decode: opaque_decoder(),
        }
    }

    fn install_postgresql(&mut self) {
        const DB: &str = "postgresql";
        self.register(DB, SemanticType::Bool, "bool", SqlType::Boolean);
        self.register(
            DB,
            SemanticType::ZonedDateTime,
            "timestamptz",
            SqlType::TimestampWithTimezone,
        );
        // Postgres has a native uuid type but its wire parameter needs an
        // explicit cast when bound as text.
        self.register_write(
            DB,
            SemanticType::Uuid,
            WriteEntry::new("uuid", SqlType::Other).with_placeholder("?::UUID"),
        );
        self.register_read(DB, "uuid", ReadEntry::new(SemanticType::Uuid));

        // Reported names for types the generic table writes.
        self.register_read(DB, "int2", ReadEntry::new(SemanticType::Int16));
        self.register_read(DB, "int4", ReadEntry::new(SemanticType::Int32));
        self.register_read(DB, "int8", ReadEntry::new(SemanticType::Int64));
        self.register_read(DB, "float4", ReadEntry::new(SemanticType::Float32));
        self.register_read(DB, "float8", ReadEntry::new(SemanticType::Float64));
        self.register_read(DB, "smallint", ReadEntry::new(SemanticType::Int16));
        self.register_read(DB, "int", ReadEntry::new(SemanticType::Int32));
        self.register_read(DB, "integer", ReadEntry::new(SemanticType::Int32));
        self.register_read(DB, "bigint", ReadEntry::new(SemanticType::Int64));
        self.register_read(DB, "double precision", ReadEntry::new(SemanticType::Float64));
        self.register_read(DB, "varchar", ReadEntry::new(SemanticType::Utf8));
        self.register_read(DB, "date", ReadEntry::new(SemanticType::LocalDate));
        self.register_read(DB, "time", ReadEntry::new(SemanticType::LocalTime));
        self.register_read(DB, "timestamp", ReadEntry::new(SemanticType::Instant));
    }

    fn install_sqlserver(&mut self) {
        const DB: &str = "sqlserver";
        // SQL Server has no boolean; bit is the conventional stand-in.
        self.register(DB, SemanticType::Bool, "bit", SqlType::Bit);
        self.register(DB, SemanticType::Text, "nvarchar(max)", SqlType::NVarchar);
        self.register(
            DB,
            SemanticType::ZonedDateTime,
            "datetimeoffset",
            SqlType::TimestampWithTimezone,
        );
        // UUIDs travel as their string rendering; the standard decoder
        // parses them back.
        self.register_write(
            DB,
            SemanticType::Uuid,
            WriteEntry::new("uniqueidentifier", SqlType::Char).with_encode(Arc::new(|value| {
                match value.as_uuid() {
                    Some(u) => Ok(Value::Utf8(u.to_string())),
                    None => Err(Error::type_conversion(format!(
                        "cannot encode {} value as uniqueidentifier",
                        value.semantic_type()
                    ))),
                }
            })),
        );
        self.register_read(DB, "uniqueidentifier", ReadEntry::new(SemanticType::Uuid));

        self.register_read(DB, "datetime2", ReadEntry::new(SemanticType::Instant));
        self.register_read(DB, "nvarchar", ReadEntry::new(SemanticType::Utf8));
        self.register_read(DB, "varchar", ReadEntry::new(SemanticType::Utf8));
        self.register_read(DB, "date", ReadEntry::new(SemanticType::LocalDate));
        self.register_read(DB, "time", ReadEntry::new(SemanticType::LocalTime));
        self.register_read(DB, "datetime", ReadEntry::new(SemanticType::Instant));
    }

    fn install_memdb(&mut self) {
        const DB: &str = "memdb";
        self.register(DB, SemanticType::Bool, "bool", SqlType::Boolean);
        self.register(DB, SemanticType::Uuid, "uuid", SqlType::Other);
        self.register(DB, SemanticType::Duration, "interval", SqlType::Other);
        self.register(
            DB,
            SemanticType::ZonedDateTime,
            "timestamptz",
            SqlType::TimestampWithTimezone,
        );

        // Read-side coverage for everything the generic table writes, so
        // frames round-trip through the test backend without heuristics.
        self.register_read(DB, "tinyint", ReadEntry::new(SemanticType::Int8));
        self.register_read(DB, "smallint", ReadEntry::new(SemanticType::Int16));
        self.register_read(DB, "int", ReadEntry::new(SemanticType::Int32));
        self.register_read(DB, "bigint", ReadEntry::new(SemanticType::Int64));
        self.register_read(DB, "float", ReadEntry::new(SemanticType::Float32));
        self.register_read(DB, "double precision", ReadEntry::new(SemanticType::Float64));
        self.register_read(DB, "varchar", ReadEntry::new(SemanticType::Utf8));
        self.register_read(DB, "date", ReadEntry::new(SemanticType::LocalDate));
        self.register_read(DB, "time", ReadEntry::new(SemanticType::LocalTime));
        self.register_read(DB, "timestamp", ReadEntry::new(SemanticType::Instant));
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("write_entries", &self.write.len())
            .field("read_entries", &self.read.len())
            .finish()
    }
}
