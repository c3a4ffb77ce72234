//! Header row configuration.
//!
//! [`HeaderConfig`] holds the row-wide defaults: column size bounds, the drag
//! activation distance and the presentation sizes the drag overlay needs.
//! Individual columns can override the size bounds on their descriptor.
//!
//! # Example
//!
//! ```
//! use gridhead::HeaderConfig;
//!
//! let config = HeaderConfig::from_toml_str(
//!     r#"
//!     default_size = 180
//!     min_size = 80
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.default_size, 180.0);
//! assert_eq!(config.max_size, 800.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use gridhead_core::logging::targets;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_SIZE: f32 = 150.0;
/// Default lower bound for column width.
pub const DEFAULT_MIN_COLUMN_SIZE: f32 = 60.0;
/// Default upper bound for column width.
pub const DEFAULT_MAX_COLUMN_SIZE: f32 = 800.0;
/// Pointer travel (px) before a press on a header turns into a reorder drag.
pub const DEFAULT_DRAG_ACTIVATION_DISTANCE: f32 = 8.0;
/// Half-width (px) of the grab area around a column's trailing edge.
pub const DEFAULT_RESIZE_GRAB_RADIUS: f32 = 9.0;
/// Step (px) applied by arrow keys on a focused resize handle.
pub const DEFAULT_KEYBOARD_RESIZE_STEP: f32 = 10.0;

/// Configuration for a [`ColumnHeaderRow`](crate::ColumnHeaderRow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Size used for columns without an explicit size and by reset-to-default.
    pub default_size: f32,
    /// Minimum column size.
    pub min_size: f32,
    /// Maximum column size.
    pub max_size: f32,
    /// Distance the pointer must travel before a press becomes a drag.
    pub drag_activation_distance: f32,
    /// Half-width of the resize handle's hit area.
    pub resize_grab_radius: f32,
    /// Step for keyboard resizing.
    pub keyboard_resize_step: f32,
    /// Height of the header row.
    pub header_height: f32,
    /// Height of the grid body, used for the drag overlay.
    pub grid_height: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_COLUMN_SIZE,
            min_size: DEFAULT_MIN_COLUMN_SIZE,
            max_size: DEFAULT_MAX_COLUMN_SIZE,
            drag_activation_distance: DEFAULT_DRAG_ACTIVATION_DISTANCE,
            resize_grab_radius: DEFAULT_RESIZE_GRAB_RADIUS,
            keyboard_resize_step: DEFAULT_KEYBOARD_RESIZE_STEP,
            header_height: 36.0,
            grid_height: 600.0,
        }
    }
}

impl HeaderConfig {
    /// Parse and validate a configuration from TOML. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        tracing::debug!(target: targets::CONFIG, ?config, "loaded header config");
        Ok(config)
    }

    /// Check the size bounds, the default size and positive settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_size", self.min_size),
            ("max_size", self.max_size),
            ("default_size", self.default_size),
            ("header_height", self.header_height),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::InvalidBounds {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if !(self.min_size..=self.max_size).contains(&self.default_size) {
            return Err(ConfigError::DefaultOutOfBounds {
                default: self.default_size,
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Sets the default column size.
    pub fn with_default_size(mut self, size: f32) -> Self {
        self.default_size = size;
        self
    }

    /// Sets the column size bounds.
    pub fn with_size_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Sets the drag activation distance.
    pub fn with_drag_activation_distance(mut self, distance: f32) -> Self {
        self.drag_activation_distance = distance;
        self
    }

    /// Sets the resize grab radius.
    pub fn with_resize_grab_radius(mut self, radius: f32) -> Self {
        self.resize_grab_radius = radius;
        self
    }

    /// Sets the header row height.
    pub fn with_header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    /// Sets the grid body height.
    pub fn with_grid_height(mut self, height: f32) -> Self {
        self.grid_height = height;
        self
    }

    /// `(min, max)` safe to clamp with: a negative or NaN minimum reads as
    /// zero and the maximum is never below the minimum.
    pub fn size_bounds(&self) -> (f32, f32) {
        ordered_bounds(self.min_size, self.max_size)
    }

    /// The default size clamped into the configured bounds.
    pub fn clamped_default_size(&self) -> f32 {
        let (min, max) = self.size_bounds();
        self.default_size.clamp(min, max)
    }

    /// Repair a config that fails [`validate`](Self::validate) well enough to
    /// drive a row: inverted bounds are swapped and the default size is
    /// clamped into them. A valid config is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let Err(error) = self.validate() else {
            return self;
        };
        tracing::warn!(target: targets::CONFIG, %error, "normalizing header config");
        if self.min_size > self.max_size {
            std::mem::swap(&mut self.min_size, &mut self.max_size);
        }
        (self.min_size, self.max_size) = self.size_bounds();
        self.default_size = self.clamped_default_size();
        self
    }
}

/// Order a `(min, max)` pair so it can be passed to `f32::clamp`.
pub(crate) fn ordered_bounds(min: f32, max: f32) -> (f32, f32) {
    let min = min.max(0.0);
    (min, max.max(min))
}
