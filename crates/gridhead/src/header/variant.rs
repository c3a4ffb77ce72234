//! Icon and label lookup for column variants.

use crate::model::ColumnVariant;

/// Display information for a column variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantInfo {
    /// Icon name understood by the host's icon set.
    pub icon: &'static str,
    /// Human readable type name, shown as the icon's tooltip.
    pub label: &'static str,
}

/// Stateless mapping from [`ColumnVariant`] to [`VariantInfo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnVariantRegistry;

impl ColumnVariantRegistry {
    pub const fn new() -> Self {
        Self
    }

    /// Icon and label for a variant. `None` for columns without a variant.
    pub const fn lookup(&self, variant: ColumnVariant) -> Option<VariantInfo> {
        let (icon, label) = match variant {
            ColumnVariant::ShortText => ("baseline", "Short text"),
            ColumnVariant::LongText => ("text-initial", "Long text"),
            ColumnVariant::Number => ("hash", "Number"),
            ColumnVariant::Select => ("circle-chevron-down", "Select"),
            ColumnVariant::MultiSelect => ("list", "Multi-select"),
            ColumnVariant::Checkbox => ("check-square", "Checkbox"),
            ColumnVariant::Date => ("calendar", "Date"),
            ColumnVariant::Attachment => ("paperclip", "Attachment"),
            ColumnVariant::None => return None,
        };
        Some(VariantInfo { icon, label })
    }

    /// Tooltip text for the variant icon.
    pub fn tooltip(&self, variant: ColumnVariant) -> Option<&'static str> {
        self.lookup(variant).map(|info| info.label)
    }
}
