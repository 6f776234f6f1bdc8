//! The data-source layer.
//!
//! A data source supplies sections and items to a scrollable grid or list
//! view. This module provides the contract individual sources implement and
//! the machinery to compose several of them into one:
//!
//! # Core Types
//!
//! - [`IndexPath`]: addresses one item as a (section, item) pair
//! - [`ItemData`]: type-erased per-item content
//! - [`DataSource`]: the trait sources implement
//! - [`DataSourceCore`]: shared state every source embeds
//! - [`DataSourceEvent`]: the mutation/lifecycle event vocabulary
//! - [`LoadingState`] / [`LoadError`]: content lifecycle status
//! - [`ComposedDataSource`]: composes children into one global section space
//! - [`SectionMetrics`]: per-section layout configuration
//! - [`GridView`] / [`LocalView`]: the narrow rendering-view contract and
//!   the translation context handed to children
//!
//! # Index spaces
//!
//! Every child numbers its own sections from zero (its *local* space). A
//! [`ComposedDataSource`] assigns each child a contiguous range of *global*
//! sections, in registration order, and keeps the assignment current as
//! children mutate:
//!
//! ```text
//!  child A (3 sections)      child B (2 sections)
//!  local:  0   1   2         local:  0   1
//!          │   │   │                 │   │
//!  global: 0   1   2                 3   4
//!  └──────── ComposedDataSource (5 sections) ────────┘
//! ```
//!
//! Mutation events flow the other way: a child reports changes in its local
//! space through its embedded [`DataSourceCore`], and the owning composite
//! re-emits them translated into global space, ordered exactly as received.

mod composed;
mod data;
mod events;
mod index;
mod loading;
mod mapping;
mod metrics;
mod traits;
mod view;

pub use composed::ComposedDataSource;
pub use data::ItemData;
pub use events::{BatchUpdates, DataSourceEvent, TransitionDirection};
pub use index::IndexPath;
pub use loading::{LoadError, LoadingState, aggregate_loading_state};
pub use mapping::IndexMapping;
pub use metrics::{Edges, SectionMetrics};
pub use traits::{DataSource, DataSourceContainer, DataSourceCore, SourceId};
pub use view::{GridView, LocalView, Size};
