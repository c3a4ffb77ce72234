//! Column descriptors and the small enums they carry.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identity of a column, unique within a grid.
///
/// Cheap to clone; the string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(Arc<str>);

impl ColumnId {
    /// Create a column id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ColumnId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ColumnId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ColumnId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Semantic type of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnVariant {
    /// Single-line text.
    ShortText,
    /// Multi-line text.
    LongText,
    /// Numeric values.
    Number,
    /// One option from a fixed list.
    Select,
    /// Several options from a fixed list.
    MultiSelect,
    /// Boolean cells.
    Checkbox,
    /// Calendar dates.
    Date,
    /// File attachments.
    Attachment,
    /// No semantic type; the header shows no icon.
    #[default]
    None,
}

/// Sort direction of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// Direction encoded as the `desc` flag used by sort specs.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Whether this is descending.
    pub fn is_descending(self) -> bool {
        self == Self::Descending
    }
}

/// Side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinSide {
    /// Pinned to the leading edge.
    Left,
    /// Pinned to the trailing edge.
    Right,
}

/// What a user may do with a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnCapabilities {
    /// May appear in the sort spec.
    pub sortable: bool,
    /// May be pinned to either side.
    pub pinnable: bool,
    /// May be hidden from the menu.
    pub hideable: bool,
    /// Has a resize handle.
    pub resizable: bool,
}

impl Default for ColumnCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl ColumnCapabilities {
    /// Every action permitted.
    pub const fn all() -> Self {
        Self {
            sortable: true,
            pinnable: true,
            hideable: true,
            resizable: true,
        }
    }

    /// No action permitted.
    pub const fn none() -> Self {
        Self {
            sortable: false,
            pinnable: false,
            hideable: false,
            resizable: false,
        }
    }
}

/// Optional per-column overrides of the row's size settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeOverrides {
    /// Replaces [`HeaderConfig::default_size`](crate::HeaderConfig::default_size).
    pub default_size: Option<f32>,
    /// Replaces [`HeaderConfig::min_size`](crate::HeaderConfig::min_size).
    pub min_size: Option<f32>,
    /// Replaces [`HeaderConfig::max_size`](crate::HeaderConfig::max_size).
    pub max_size: Option<f32>,
}

/// A column definition as registered with the table model.
///
/// Mutable state (order, size, sort, pin, visibility) lives in the model, not
/// here; this is the static part plus initial values.
///
/// ```
/// use gridhead::model::{Column, ColumnVariant, PinSide};
///
/// let column = Column::new("price")
///     .with_header("Price")
///     .with_variant(ColumnVariant::Number)
///     .with_size_bounds(80.0, 240.0)
///     .with_pinned(Some(PinSide::Left));
/// assert_eq!(column.display_label(), "Price");
/// assert_eq!(column.size_overrides.max_size, Some(240.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Unique identity.
    pub id: ColumnId,
    /// Display label. `None` falls back to the header text, then the id.
    pub label: Option<String>,
    /// Plain header text from the column definition.
    pub header: Option<String>,
    /// Semantic cell type, drives the header icon.
    pub variant: ColumnVariant,
    /// Actions the user may take.
    pub capabilities: ColumnCapabilities,
    /// Per-column size bounds and default.
    pub size_overrides: SizeOverrides,
    /// Initial size; `None` means the configured default.
    pub size: Option<f32>,
    /// Initial visibility.
    pub visible: bool,
    /// Initial pin side.
    pub pinned: Option<PinSide>,
}

impl Column {
    /// Create a visible, unpinned column with all capabilities.
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            header: None,
            variant: ColumnVariant::None,
            capabilities: ColumnCapabilities::all(),
            size_overrides: SizeOverrides::default(),
            size: None,
            visible: true,
            pinned: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the plain header text.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Sets the cell variant.
    pub fn with_variant(mut self, variant: ColumnVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the permitted actions.
    pub fn with_capabilities(mut self, capabilities: ColumnCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets the initial size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Overrides the size bounds for this column.
    pub fn with_size_bounds(mut self, min: f32, max: f32) -> Self {
        self.size_overrides.min_size = Some(min);
        self.size_overrides.max_size = Some(max);
        self
    }

    /// Overrides the default size for this column.
    pub fn with_default_size(mut self, size: f32) -> Self {
        self.size_overrides.default_size = Some(size);
        self
    }

    /// Sets the initial visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the initial pin side.
    pub fn with_pinned(mut self, pinned: Option<PinSide>) -> Self {
        self.pinned = pinned;
        self
    }

    /// The label shown in the header: explicit label, else header text, else id.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.header.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// A read-only view of one column's current state, as served by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDescriptor {
    pub id: ColumnId,
    pub label: String,
    pub variant: ColumnVariant,
    /// Current size; `None` if the model never stored one.
    pub size: Option<f32>,
    pub size_overrides: SizeOverrides,
    pub sorted: Option<SortDirection>,
    pub pinned: Option<PinSide>,
    pub visible: bool,
    pub capabilities: ColumnCapabilities,
}
