//! Convenient re-exports of the most commonly used Trellis types.
//!
//! ```
//! use trellis::prelude::*;
//! ```

pub use crate::datasource::{
    ComposedDataSource, DataSource, DataSourceContainer, DataSourceCore, DataSourceEvent,
    GridView, IndexPath, ItemData, LoadError, LoadingState, LocalView, SectionMetrics, Size,
    TransitionDirection,
};
pub use trellis_core::Signal;
