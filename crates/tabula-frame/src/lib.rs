//! Columnar, missing-value-aware datasets.
//!
//! `tabula-frame` provides the in-memory side of the tabula database
//! bridge: dense typed columns with an explicit missing-set, assembled
//! into named [`DataFrame`]s. Columns never store nulls; absent rows are
//! tracked in a sorted index set while the backing store keeps a per-type
//! sentinel in the vacated slot.
//!
//! # Features
//!
//! - **Typed columns** - one contiguous vector per element type, no boxing
//! - **Missing-set tracking** - absence is an index set, not a value
//! - **Promotional building** - unknown-type columns widen `bool` →
//!   `int64` → `float64` → `string` as values arrive
//! - **Structural concat** - batches cut at arbitrary boundaries merge
//!   back into one frame, unifying element types where inference diverged
//!
//! # Quick Start
//!
//! ```
//! use tabula_frame::{Column, DataFrame, SemanticType, Value};
//!
//! # fn main() -> tabula_frame::Result<()> {
//! let mut price = Column::new("price", SemanticType::Float64)?;
//! price.push(Value::Float64(101.5))?;
//! price.push_missing();
//! price.push(Value::Float64(99.25))?;
//!
//! let frame = DataFrame::new(vec![price])?.with_name("quotes");
//! assert_eq!(frame.row_count(), 3);
//! assert_eq!(frame.column("price").map(|c| c.missing_count()), Some(1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod column;
pub mod error;
pub mod frame;
pub mod promote;
pub mod types;

pub use column::{Column, ColumnData};
pub use error::{FrameError, Result};
pub use frame::DataFrame;
pub use promote::PromotedBuilder;
pub use types::{SemanticType, Value};
