//! gridhead - column-header interaction for spreadsheet-like data grids.
//!
//! The crate coordinates the gestures a grid header supports: reordering
//! columns by drag (pointer or keyboard), resizing them, and the per-column
//! menu with sort, pin and hide actions. Gestures never overlap: a single
//! [`GestureArbiter`](header::GestureArbiter) decides which one owns the
//! pointer, and the others stand down until it is released.
//!
//! Column state lives behind the [`ColumnModel`](model::ColumnModel) trait;
//! [`ColumnTable`](model::ColumnTable) is an in-memory implementation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gridhead::prelude::*;
//!
//! let table = Arc::new(ColumnTable::new(vec![
//!     Column::new("name").with_label("Name"),
//!     Column::new("price").with_variant(ColumnVariant::Number),
//! ]));
//! let row = ColumnHeaderRow::new(table.clone(), HeaderConfig::default());
//!
//! assert!(row.menu().open_at(&"price".into(), 220.0, 18.0));
//! row.activate_menu(MenuAction::Sort(SortDirection::Descending)).unwrap();
//! assert_eq!(table.sorting().direction_of(&"price".into()), Some(SortDirection::Descending));
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod header;
pub mod model;
pub mod prelude;

pub use config::HeaderConfig;
pub use error::{ConfigError, HeaderError, HeaderResult};
pub use header::ColumnHeaderRow;

pub use gridhead_core::{ConnectionGuard, ConnectionId, PerfSpan, Property, Signal, logging};
