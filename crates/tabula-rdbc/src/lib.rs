//! # tabula-rdbc
//!
//! Relational database connectivity for [`tabula_frame`] datasets.
//!
//! This crate bridges columnar, missing-aware datasets and row-oriented
//! databases reached through a JDBC-shaped driver surface: cursors in,
//! prepared statement batches out, with a per-database type registry
//! deciding how values cross the boundary in each direction.
//!
//! ## Features
//!
//! - **Typed Batches**: query cursors stream into [`DataFrame`] batches
//!   with missing cells tracked per column, never as sentinel values
//! - **Schema Inference**: `CREATE TABLE` DDL derived from dataset
//!   column types, with per-column SQL type overrides
//! - **Batched Writes**: parameterized inserts staged row by row and
//!   flushed in configurable batches inside one transaction
//! - **Upsert Support**: `ON CONFLICT` emission keyed on the dataset
//!   primary key
//! - **Type Registry**: per-database mappings in both directions, with
//!   encode hooks, placeholder casts and result-set parser overrides
//! - **In-Memory Backend**: a complete [`testing::MemoryDb`] backend so
//!   the whole surface is exercisable without a server
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabula_rdbc::prelude::*;
//!
//! let registry = TypeRegistry::default();
//! let conn = connect_somehow().await?;
//! let options = WriteOptions::new().with_table("ohlcv").with_upsert(true);
//!
//! // Create the table from the dataset's own schema and write it.
//! ensure_table(&conn, &registry, &frame, &options).await?;
//! let written = write_dataset(&conn, &frame, &registry, &options).await?;
//!
//! // Stream it back in typed batches.
//! let mut reader = FrameReader::query(
//!     &conn,
//!     "SELECT * FROM ohlcv ORDER BY date",
//!     &registry,
//!     &ReadOptions::new().with_batch_size(10_000),
//! )
//! .await?;
//! while let Some(batch) = reader.next_batch().await? {
//!     process(batch);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod connection;
pub mod error;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod table;
pub mod testing;
pub mod writer;

/// Prelude module for convenient imports
pub mod prelude {
    // Error types
    pub use crate::error::{Error, Result};

    // Dataset types
    pub use tabula_frame::{Column, DataFrame, PromotedBuilder, SemanticType, Value};

    // Capability traits and metadata
    pub use crate::connection::{
        ColumnDescriptor, Connection, PreparedStatement, QueryCursor, SqlType,
    };

    // Type registry
    pub use crate::registry::{
        DecodeFn, EncodeFn, ParserOverride, ReadEntry, ReadMapping, TypeRegistry, WriteEntry,
        WriteMapping,
    };

    // Schema emission
    pub use crate::schema::{create_table_ddl, drop_table_ddl, sanitize_ident};

    // Read path
    pub use crate::reader::{
        read_dataset, read_table, FrameReader, ReadOptions, DEFAULT_READ_BATCH_SIZE,
    };

    // Write path
    pub use crate::writer::{
        execute_update, insert_sql, write_dataset, WriteOptions, DEFAULT_WRITE_BATCH_SIZE,
    };

    // Table lifecycle
    pub use crate::table::{
        create_table, drop_table, drop_table_when_exists, effective_primary_key, ensure_table,
        resolve_table_name, table_exists,
    };

    // In-memory backend
    pub use crate::testing::{MemoryConnection, MemoryDb};
}

// Re-export commonly used items at crate root
pub use error::{Error, Result};
pub use registry::TypeRegistry;
