//! Read-only tabular store
//!
//! Datasets are produced by an external pipeline and loaded into immutable
//! columnar [`Table`]s. The [`Catalog`] owns the loaded handles; queries only
//! ever see `&Table`.

pub mod catalog;
pub mod error;
pub mod source;
pub mod table;
pub mod value;

pub use catalog::{Catalog, DatasetStatus};
pub use error::{StoreError, StoreResult};
pub use source::{Dataset, DatasetSource, FileSource};
pub use table::{AggOp, Column, JoinKind, Record, Row, Table};
pub use value::Value;
