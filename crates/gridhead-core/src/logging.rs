//! Logging facilities for gridhead.
//!
//! gridhead uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("gridhead::gesture=debug,gridhead::reorder=trace")
//!     .init();
//! ```
//!
//! Every event is emitted with one of the [`targets`] below so a single
//! subsystem can be filtered in or out.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "gridhead_core::signal";
    /// Gesture arbitration (claim, release, refusal).
    pub const GESTURE: &str = "gridhead::gesture";
    /// Reorder drag lifecycle and commits.
    pub const REORDER: &str = "gridhead::reorder";
    /// Column resizing.
    pub const RESIZE: &str = "gridhead::resize";
    /// Header context menu and its actions.
    pub const MENU: &str = "gridhead::menu";
    /// Column model mutations.
    pub const MODEL: &str = "gridhead::model";
    /// Pointer/keyboard routing through the handler chain.
    pub const INPUT: &str = "gridhead::input";
    /// Configuration loading.
    pub const CONFIG: &str = "gridhead::config";
}

/// RAII guard for a timed span.
///
/// The span stays entered until the guard is dropped, which makes it handy
/// around a whole event dispatch.
///
/// ```ignore
/// let _span = PerfSpan::new("relayout");
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!(target: "gridhead::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::GESTURE,
            targets::REORDER,
            targets::RESIZE,
            targets::MENU,
            targets::MODEL,
            targets::INPUT,
            targets::CONFIG,
        ] {
            assert!(target.starts_with("gridhead::"));
        }
    }
}
