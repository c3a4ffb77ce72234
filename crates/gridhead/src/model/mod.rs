//! Column model: descriptors, order, sort spec and the table-model seam.
//!
//! The header controllers read column state through [`ColumnModel`] and
//! commit changes through its synchronous setters. [`ColumnTable`] is the
//! in-memory implementation used by tests and simple hosts.

mod column;
mod order;
mod sort;
mod table;

pub use column::{
    Column, ColumnCapabilities, ColumnId, ColumnVariant, HeaderDescriptor, PinSide,
    SizeOverrides, SortDirection,
};
pub use order::{ColumnOrder, StepDirection};
pub use sort::{SortEntry, SortSpec};
pub use table::{ColumnModel, ColumnSignals, ColumnTable};
