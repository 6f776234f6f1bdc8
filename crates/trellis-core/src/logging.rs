//! Logging conventions for Trellis.
//!
//! Trellis instruments itself with the `tracing` crate. Install a subscriber
//! in the host application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! The constants below are the `target` names used throughout the workspace,
//! for use in filter directives such as `trellis::datasource=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Data-source layer target (registration, mapping rebuilds, events).
    pub const DATASOURCE: &str = "trellis::datasource";
}
