//! A data source composed of other data sources.
//!
//! `ComposedDataSource` aggregates any number of child data sources into
//! one contiguous section space. Children keep their own local numbering
//! and stay unaware of the composition: queries arriving in global space
//! are translated and delegated to the owning child, and mutation events
//! reported by a child are translated back into global space before being
//! re-emitted.
//!
//! Children change their section counts independently, so the internal
//! section mapping is rebuilt defensively before every read that depends
//! on it.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use trellis_core::logging::targets;

use super::data::ItemData;
use super::events::{DataSourceEvent, TransitionDirection};
use super::index::IndexPath;
use super::loading::{LoadingState, aggregate_loading_state};
use super::mapping::{IndexMapping, MappingTable};
use super::metrics::SectionMetrics;
use super::traits::{DataSource, DataSourceContainer, DataSourceCore, SourceId};
use super::view::{GridView, LocalView, Size};

/// A structural notification deferred while a placeholder is displayed.
type PendingUpdate = Box<dyn FnOnce() + Send>;

/// Cached aggregate loading state with an explicit dirty flag.
///
/// The stale value is kept around: the did-load path needs to know whether
/// a placeholder *was* displayed before recomputing.
struct AggregateCache {
    value: LoadingState,
    dirty: bool,
}

/// A data source that composes multiple child data sources into a single
/// contiguous global section space.
///
/// Children are registered in order with [`add_data_source`]; the first
/// child's sections come first, the second child's follow, and so on. The
/// assigned global ranges always tile `[0, section_count)` with no gaps,
/// renumbering whenever a child is added, removed, or changes its section
/// count.
///
/// The composite implements [`DataSource`] itself, so composites nest: a
/// composed source registered inside another composes transparently.
///
/// [`add_data_source`]: ComposedDataSource::add_data_source
///
/// # Example
///
/// ```ignore
/// let composed = ComposedDataSource::new();
/// composed.add_data_source(contacts);   // 3 sections -> global 0..3
/// composed.add_data_source(favorites);  // 2 sections -> global 3..5
/// assert_eq!(composed.section_count(), 5);
/// ```
pub struct ComposedDataSource {
    core: DataSourceCore,
    weak_self: Weak<ComposedDataSource>,
    table: RwLock<MappingTable>,
    default_metrics: RwLock<SectionMetrics>,
    aggregate: Mutex<AggregateCache>,
    pending_updates: Mutex<Vec<PendingUpdate>>,
}

impl ComposedDataSource {
    /// Creates an empty composed data source.
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            core: DataSourceCore::new(),
            weak_self: weak.clone(),
            table: RwLock::new(MappingTable::new()),
            default_metrics: RwLock::new(SectionMetrics::default()),
            aggregate: Mutex::new(AggregateCache {
                value: LoadingState::Initial,
                dirty: true,
            }),
            pending_updates: Mutex::new(Vec::new()),
        })
    }

    /// Registers `source` at the end of the tiling order and notifies
    /// listeners of the newly inserted global sections.
    ///
    /// # Panics
    ///
    /// Panics if `source` is already registered with this composite.
    pub fn add_data_source(&self, source: Arc<dyn DataSource>) {
        let id = SourceId::of(source.as_ref());
        let inserted = {
            let mut table = self.table.write();
            assert!(
                !table.contains(id),
                "data source is already registered with this container"
            );
            let container: Weak<dyn DataSourceContainer> = self.weak_self.clone();
            source.core().set_container(container);
            table.push(source);
            table.rebuild();
            table.mapping_for(id).global_range()
        };
        tracing::debug!(
            target: targets::DATASOURCE,
            sections = ?inserted,
            "data source added"
        );
        self.invalidate_aggregate();
        if !inserted.is_empty() {
            self.notify(DataSourceEvent::SectionsInserted {
                sections: inserted.collect(),
                direction: TransitionDirection::None,
            });
        }
    }

    /// Unregisters `source` and notifies listeners that the global sections
    /// it previously occupied were removed.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not registered with this composite.
    pub fn remove_data_source(&self, source: &dyn DataSource) {
        let id = SourceId::of(source);
        let removed = {
            let mut table = self.table.write();
            let entry = table.remove(id);
            entry
                .source
                .core()
                .release_container(self as *const Self as *const ());
            // The range the source occupied before the rebuild renumbers
            // everything behind it.
            let range = entry.mapping.global_range();
            table.rebuild();
            range
        };
        tracing::debug!(
            target: targets::DATASOURCE,
            sections = ?removed,
            "data source removed"
        );
        self.invalidate_aggregate();
        if !removed.is_empty() {
            self.notify(DataSourceEvent::SectionsRemoved {
                sections: removed.collect(),
                direction: TransitionDirection::None,
            });
        }
    }

    /// Unregisters every child without emitting granular removal events.
    ///
    /// Bulk removal is a reset: listeners are expected to reload wholesale
    /// rather than animate a diff. Back-references are cleared only for
    /// children still owned by this composite.
    pub fn remove_all_data_sources(&self) {
        let entries = self.table.write().clear();
        for entry in &entries {
            entry
                .source
                .core()
                .release_container(self as *const Self as *const ());
        }
        tracing::debug!(
            target: targets::DATASOURCE,
            removed = entries.len(),
            "all data sources removed"
        );
        self.invalidate_aggregate();
    }

    /// Number of registered child data sources.
    pub fn data_source_count(&self) -> usize {
        self.table.read().len()
    }

    /// The registered children, in registration order.
    pub fn data_sources(&self) -> Vec<Arc<dyn DataSource>> {
        self.table
            .read()
            .entries()
            .iter()
            .map(|entry| entry.source.clone())
            .collect()
    }

    /// The composite's own default section metrics, merged underneath every
    /// child's override.
    pub fn default_metrics(&self) -> SectionMetrics {
        *self.default_metrics.read()
    }

    /// Sets the composite's default section metrics.
    pub fn set_default_metrics(&self, metrics: SectionMetrics) {
        *self.default_metrics.write() = metrics;
    }

    /// Whether the aggregate state calls for a placeholder instead of
    /// content: an initial load in progress, no content, or a failure.
    pub fn should_display_placeholder(&self) -> bool {
        displays_placeholder(&self.aggregate_state())
    }

    /// Applies every structural notification that was queued while a
    /// placeholder was displayed, in arrival order.
    pub fn execute_pending_updates(&self) {
        let updates: Vec<PendingUpdate> = std::mem::take(&mut *self.pending_updates.lock());
        for update in updates {
            update();
        }
    }

    /// Rebuilds the mapping and resolves a global section to its owning
    /// child and current mapping.
    fn resolve(&self, global_section: usize) -> (Arc<dyn DataSource>, IndexMapping) {
        let mut table = self.table.write();
        table.rebuild();
        let entry = table.entry_for_global_section(global_section);
        (entry.source.clone(), entry.mapping)
    }

    /// Marks the aggregate stale, propagating upward when this composite is
    /// itself nested inside another container.
    fn invalidate_aggregate(&self) {
        self.aggregate.lock().dirty = true;
        if let Some(container) = self.core.container() {
            container.child_state_changed();
        }
    }

    /// The aggregate loading state, recomputed if stale.
    fn aggregate_state(&self) -> LoadingState {
        let mut cache = self.aggregate.lock();
        if cache.dirty {
            let mut states: Vec<LoadingState> = self
                .table
                .read()
                .entries()
                .iter()
                .map(|entry| entry.source.loading_state())
                .collect();
            // The composite's own directly-set state is considered last.
            states.push(self.core.loading_state());
            cache.value = aggregate_loading_state(states.iter());
            cache.dirty = false;
        }
        cache.value.clone()
    }

    /// The last computed aggregate, without recomputing. Stale by design:
    /// the did-load path compares against the pre-load value.
    fn cached_aggregate(&self) -> LoadingState {
        self.aggregate.lock().value.clone()
    }

    /// Emits `event` to this composite's listeners, or queues it when a
    /// placeholder is displayed and the event is structural.
    fn notify(&self, event: DataSourceEvent) {
        if event.is_structural() && self.should_display_placeholder() {
            tracing::trace!(
                target: targets::DATASOURCE,
                ?event,
                "queueing structural update while placeholder is displayed"
            );
            let weak = self.weak_self.clone();
            self.pending_updates.lock().push(Box::new(move || {
                if let Some(composed) = weak.upgrade() {
                    composed.core.notify(event);
                }
            }));
            return;
        }
        self.core.notify(event);
    }
}

fn displays_placeholder(state: &LoadingState) -> bool {
    matches!(
        state,
        LoadingState::Loading | LoadingState::NoContent | LoadingState::Error(_)
    )
}

impl DataSource for ComposedDataSource {
    fn core(&self) -> &DataSourceCore {
        &self.core
    }

    fn section_count(&self) -> usize {
        let mut table = self.table.write();
        table.rebuild();
        table.global_section_count()
    }

    fn item_count(&self, section: usize) -> usize {
        let (source, mapping) = self.resolve(section);
        source.item_count(mapping.local_section(section))
    }

    fn item(&self, view: &dyn GridView, path: IndexPath) -> ItemData {
        let (source, mapping) = self.resolve(path.section);
        let local_view = LocalView::new(view, mapping);
        source.item(&local_view, mapping.local_path(path))
    }

    fn cell_size_fitting(&self, proposed: Size, path: IndexPath, view: &dyn GridView) -> Size {
        let (source, mapping) = self.resolve(path.section);
        let local_view = LocalView::new(view, mapping);
        source.cell_size_fitting(proposed, mapping.local_path(path), &local_view)
    }

    fn supplementary_size_fitting(
        &self,
        proposed: Size,
        section: usize,
        view: &dyn GridView,
    ) -> Size {
        let (source, mapping) = self.resolve(section);
        let local_view = LocalView::new(view, mapping);
        source.supplementary_size_fitting(proposed, mapping.local_section(section), &local_view)
    }

    fn metrics(&self, section: usize) -> SectionMetrics {
        let (source, mapping) = self.resolve(section);
        let overrides = source.metrics(mapping.local_section(section));
        self.default_metrics().merged(&overrides)
    }

    fn load_content(&self) {
        // Fire-and-forget: children report progress through their
        // will/did-load events.
        for source in self.data_sources() {
            source.load_content();
        }
    }

    fn reset_content(&self) {
        self.invalidate_aggregate();
        self.core.set_loading_state(LoadingState::Initial);
        for source in self.data_sources() {
            source.reset_content();
        }
    }

    fn loading_state(&self) -> LoadingState {
        self.aggregate_state()
    }

    fn set_loading_state(&self, state: LoadingState) {
        self.invalidate_aggregate();
        self.core.set_loading_state(state);
    }
}

impl DataSourceContainer for ComposedDataSource {
    fn child_event(&self, source: SourceId, event: DataSourceEvent) {
        match event {
            DataSourceEvent::SectionsInserted {
                sections,
                direction,
            } => {
                // Inserted indexes only resolve against the post-insert
                // mapping, so rebuild first.
                let global = {
                    let mut table = self.table.write();
                    table.rebuild();
                    table.mapping_for(source).global_sections(&sections)
                };
                self.notify(DataSourceEvent::SectionsInserted {
                    sections: global,
                    direction,
                });
            }
            DataSourceEvent::SectionsRemoved {
                sections,
                direction,
            } => {
                // Removed indexes refer to the layout before the change, so
                // translate with the pre-removal mapping.
                let global = {
                    let mut table = self.table.write();
                    let global = table.mapping_for(source).global_sections(&sections);
                    table.rebuild();
                    global
                };
                self.notify(DataSourceEvent::SectionsRemoved {
                    sections: global,
                    direction,
                });
            }
            DataSourceEvent::SectionsReloaded { sections } => {
                let global = self.table.read().mapping_for(source).global_sections(&sections);
                self.notify(DataSourceEvent::SectionsReloaded { sections: global });
                self.table.write().rebuild();
            }
            DataSourceEvent::SectionMoved {
                from,
                to,
                direction,
            } => {
                let (global_from, global_to) = {
                    let mut table = self.table.write();
                    let mapping = table.mapping_for(source);
                    let endpoints = (mapping.global_section(from), mapping.global_section(to));
                    table.rebuild();
                    endpoints
                };
                self.notify(DataSourceEvent::SectionMoved {
                    from: global_from,
                    to: global_to,
                    direction,
                });
            }
            DataSourceEvent::ItemsInserted { paths } => {
                let paths = self.table.read().mapping_for(source).global_paths(&paths);
                self.notify(DataSourceEvent::ItemsInserted { paths });
            }
            DataSourceEvent::ItemsRemoved { paths } => {
                let paths = self.table.read().mapping_for(source).global_paths(&paths);
                self.notify(DataSourceEvent::ItemsRemoved { paths });
            }
            DataSourceEvent::ItemsReloaded { paths } => {
                let paths = self.table.read().mapping_for(source).global_paths(&paths);
                self.notify(DataSourceEvent::ItemsReloaded { paths });
            }
            DataSourceEvent::ItemMoved { from, to } => {
                let mapping = self.table.read().mapping_for(source);
                self.notify(DataSourceEvent::ItemMoved {
                    from: mapping.global_path(from),
                    to: mapping.global_path(to),
                });
            }
            DataSourceEvent::WillLoadContent => {
                self.invalidate_aggregate();
                self.notify(DataSourceEvent::WillLoadContent);
            }
            DataSourceEvent::DidLoadContent { error } => {
                let was_placeholder = displays_placeholder(&self.cached_aggregate());
                self.invalidate_aggregate();
                let is_placeholder = displays_placeholder(&self.aggregate_state());
                if was_placeholder && is_placeholder {
                    // The placeholder stays up: hand listeners one batched
                    // re-application so it refreshes atomically.
                    let weak = self.weak_self.clone();
                    self.notify(DataSourceEvent::BatchUpdate {
                        updates: Arc::new(move || {
                            if let Some(composed) = weak.upgrade() {
                                composed.execute_pending_updates();
                            }
                        }),
                    });
                } else if was_placeholder {
                    // Placeholder dismissed: queued updates can flow again.
                    self.execute_pending_updates();
                }
                self.notify(DataSourceEvent::DidLoadContent { error });
            }
            // Everything else carries no indices; forward unchanged.
            other => self.notify(other),
        }
    }

    fn child_state_changed(&self) {
        self.invalidate_aggregate();
    }
}

impl Drop for ComposedDataSource {
    fn drop(&mut self) {
        self.remove_all_data_sources();
    }
}
