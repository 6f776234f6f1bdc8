//! Core traits for the data-source layer.
//!
//! [`DataSource`] is the contract a unit of content implements to supply
//! sections and items to a grid or list view. [`DataSourceContainer`] is
//! the sink a composite implements to receive a registered child's mutation
//! events. [`DataSourceCore`] is the shared state every source embeds: its
//! event signal, its own loading state, and the back-reference to the
//! container that currently owns it.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use trellis_core::Signal;

use super::data::ItemData;
use super::events::DataSourceEvent;
use super::index::IndexPath;
use super::loading::LoadingState;
use super::metrics::SectionMetrics;
use super::view::{GridView, Size};

/// Stable identity token for a data source.
///
/// Sources are compared by reference identity, never by value: two sources
/// with identical content are still distinct children. The token is the
/// address of the source's embedded [`DataSourceCore`], which is pinned for
/// as long as the `Arc` holding the source is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

impl SourceId {
    /// The identity of `source`.
    pub fn of(source: &dyn DataSource) -> Self {
        Self::of_core(source.core())
    }

    pub(crate) fn of_core(core: &DataSourceCore) -> Self {
        Self(core as *const DataSourceCore as usize)
    }
}

/// The event sink a composite implements for its registered children.
///
/// A source owned by a container routes every notification here instead of
/// emitting on its own signal; the container translates the indices into
/// its own space and re-emits.
pub trait DataSourceContainer: Send + Sync {
    /// A registered source reported a mutation or lifecycle event, with all
    /// indices in that source's local space.
    fn child_event(&self, source: SourceId, event: DataSourceEvent);

    /// A registered source's loading state changed outside the will/did
    /// load lifecycle, so any aggregate derived from it is stale.
    fn child_state_changed(&self);
}

/// Shared state embedded by every data source.
///
/// Implementations hold a `DataSourceCore` and return it from
/// [`DataSource::core`]; the provided trait methods delegate to it.
pub struct DataSourceCore {
    events: Signal<DataSourceEvent>,
    loading: RwLock<LoadingState>,
    container: Mutex<Option<Weak<dyn DataSourceContainer>>>,
}

impl Default for DataSourceCore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSourceCore {
    /// Creates a fresh core in the `Initial` loading state with no
    /// container.
    pub fn new() -> Self {
        Self {
            events: Signal::new(),
            loading: RwLock::new(LoadingState::Initial),
            container: Mutex::new(None),
        }
    }

    /// The event signal observed when this source is not inside a
    /// container.
    pub fn events(&self) -> &Signal<DataSourceEvent> {
        &self.events
    }

    /// This source's own loading state.
    pub fn loading_state(&self) -> LoadingState {
        self.loading.read().clone()
    }

    /// Sets this source's own loading state and informs the owning
    /// container, if any, that derived aggregates are stale.
    pub fn set_loading_state(&self, state: LoadingState) {
        *self.loading.write() = state;
        if let Some(container) = self.container() {
            container.child_state_changed();
        }
    }

    /// The container currently owning this source, if any.
    pub fn container(&self) -> Option<Arc<dyn DataSourceContainer>> {
        self.container.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Routes an event to the owning container for translation, or emits it
    /// on this source's own signal when the source stands alone.
    pub fn notify(&self, event: DataSourceEvent) {
        match self.container() {
            Some(container) => container.child_event(SourceId::of_core(self), event),
            None => self.events.emit(event),
        }
    }

    pub(crate) fn set_container(&self, container: Weak<dyn DataSourceContainer>) {
        *self.container.lock() = Some(container);
    }

    /// Clears the container back-reference, but only while it still points
    /// at `owner`; a source that was re-parented elsewhere keeps its new
    /// owner.
    pub(crate) fn release_container(&self, owner: *const ()) {
        let mut slot = self.container.lock();
        if let Some(weak) = slot.as_ref()
            && std::ptr::eq(weak.as_ptr() as *const (), owner)
        {
            *slot = None;
        }
    }
}

/// A unit of sectioned content pluggable into a grid or list view.
///
/// # Implementation Requirements
///
/// At minimum, implement:
/// - [`core`](DataSource::core) - return the embedded [`DataSourceCore`]
/// - [`section_count`](DataSource::section_count)
/// - [`item_count`](DataSource::item_count)
/// - [`item`](DataSource::item) - content for one item
///
/// Sources that load content asynchronously drive the lifecycle
/// themselves: emit `WillLoadContent`, update the loading state, then emit
/// `DidLoadContent` via [`DataSourceCore::notify`]. Structural changes are
/// reported the same way, with indices in the source's own local space,
/// after the backing storage already reflects them.
///
/// # Example
///
/// ```
/// use trellis::datasource::{
///     DataSource, DataSourceCore, GridView, IndexPath, ItemData,
/// };
///
/// struct Names {
///     core: DataSourceCore,
///     names: Vec<String>,
/// }
///
/// impl DataSource for Names {
///     fn core(&self) -> &DataSourceCore {
///         &self.core
///     }
///
///     fn section_count(&self) -> usize {
///         1
///     }
///
///     fn item_count(&self, _section: usize) -> usize {
///         self.names.len()
///     }
///
///     fn item(&self, _view: &dyn GridView, path: IndexPath) -> ItemData {
///         self.names
///             .get(path.item)
///             .map(|name| ItemData::from(name.as_str()))
///             .unwrap_or(ItemData::None)
///     }
/// }
/// ```
pub trait DataSource: Send + Sync {
    /// The shared state embedded by this source.
    fn core(&self) -> &DataSourceCore;

    /// Number of sections this source currently provides.
    fn section_count(&self) -> usize;

    /// Number of items in `section`.
    fn item_count(&self, section: usize) -> usize;

    /// Content for the item at `path`.
    ///
    /// `view` is the rendering-view handle scoped to this source's own
    /// index space; any path read through it is already local.
    fn item(&self, view: &dyn GridView, path: IndexPath) -> ItemData;

    /// Preferred size for the cell at `path`, given the proposed size.
    ///
    /// The default accepts the proposal unchanged.
    fn cell_size_fitting(&self, proposed: Size, _path: IndexPath, _view: &dyn GridView) -> Size {
        proposed
    }

    /// Preferred size for a section's supplementary element (header or
    /// footer), given the proposed size.
    fn supplementary_size_fitting(
        &self,
        proposed: Size,
        _section: usize,
        _view: &dyn GridView,
    ) -> Size {
        proposed
    }

    /// Layout configuration override for `section`.
    ///
    /// The default has no opinion on any field.
    fn metrics(&self, _section: usize) -> SectionMetrics {
        SectionMetrics::default()
    }

    /// Begins loading content. Fire-and-forget: completion is reported
    /// through the `WillLoadContent`/`DidLoadContent` events. The default
    /// does nothing (static content).
    fn load_content(&self) {}

    /// Discards loaded content and returns to the `Initial` state. Does
    /// not cancel an in-flight load.
    fn reset_content(&self) {
        self.core().set_loading_state(LoadingState::Initial);
    }

    /// Current loading state. The default reads the core's own state;
    /// composites override this with an aggregate.
    fn loading_state(&self) -> LoadingState {
        self.core().loading_state()
    }

    /// Directly sets this source's own loading state.
    fn set_loading_state(&self, state: LoadingState) {
        self.core().set_loading_state(state);
    }

    /// The mutation-event stream, in this source's own index space. Only
    /// delivered here while the source is not registered with a container.
    fn events(&self) -> &Signal<DataSourceEvent> {
        self.core().events()
    }

    /// The container currently owning this source, if any.
    fn container(&self) -> Option<Arc<dyn DataSourceContainer>> {
        self.core().container()
    }
}
