//! Trellis - composable sectioned data sources for grid and list views.
//!
//! A scrollable grid or list is rendered from a *data source*: an object
//! that reports how many sections it has, how many items each section
//! holds, and what content each item carries. Trellis lets several
//! independent data sources be composed into one
//! [`ComposedDataSource`](datasource::ComposedDataSource) that presents a
//! single contiguous section space, translating every index and every
//! mutation event between the children's local numbering and the flattened
//! global numbering.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trellis::datasource::{ComposedDataSource, DataSource};
//!
//! let composed = ComposedDataSource::new();
//! composed.add_data_source(contacts);   // 3 sections -> global 0..3
//! composed.add_data_source(favorites);  // 2 sections -> global 3..5
//!
//! assert_eq!(composed.section_count(), 5);
//!
//! composed.events().connect(|event| {
//!     // events arrive in the composed (global) index space
//! });
//! ```

pub use trellis_core::{ConnectionGuard, ConnectionId, Signal};

pub mod datasource;
pub mod prelude;
