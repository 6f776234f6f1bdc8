//! Index mapping between a child's local section space and the composed
//! global section space.
//!
//! Each registered source owns a contiguous half-open range of global
//! sections. Taken in registration order, the ranges tile
//! `[0, total_sections)` with no gaps and no overlap; translating between
//! spaces is a single additive offset on the section component.

use std::ops::Range;
use std::sync::Arc;

use trellis_core::logging::targets;

use super::index::IndexPath;
use super::traits::{DataSource, SourceId};

/// The contiguous global section range assigned to one registered source.
///
/// Local section `i` maps to global section `global_start + i`. Item
/// components of index paths pass through untranslated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexMapping {
    global_start: usize,
    global_end: usize,
}

impl Default for IndexMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexMapping {
    /// Creates an empty mapping covering no sections.
    pub fn new() -> Self {
        Self {
            global_start: 0,
            global_end: 0,
        }
    }

    /// The half-open global range `[global_start, global_end)` this mapping
    /// covers.
    pub fn global_range(&self) -> Range<usize> {
        self.global_start..self.global_end
    }

    /// Number of sections covered.
    pub fn section_count(&self) -> usize {
        self.global_end - self.global_start
    }

    /// Whether `global` falls inside this mapping's range.
    pub fn contains_global(&self, global: usize) -> bool {
        self.global_range().contains(&global)
    }

    /// Translates a local section index to global space.
    ///
    /// # Panics
    ///
    /// Panics if `local` is outside the mapped section count.
    pub fn global_section(&self, local: usize) -> usize {
        assert!(
            local < self.section_count(),
            "local section {local} out of range for mapping {:?}",
            self.global_range()
        );
        self.global_start + local
    }

    /// Translates a global section index to local space.
    ///
    /// # Panics
    ///
    /// Panics if `global` is outside this mapping's range.
    pub fn local_section(&self, global: usize) -> usize {
        assert!(
            self.contains_global(global),
            "global section {global} out of range for mapping {:?}",
            self.global_range()
        );
        global - self.global_start
    }

    /// Translates a set of local section indices to global space.
    pub fn global_sections(&self, locals: &[usize]) -> Vec<usize> {
        locals.iter().map(|&local| self.global_section(local)).collect()
    }

    /// Translates a set of global section indices to local space.
    pub fn local_sections(&self, globals: &[usize]) -> Vec<usize> {
        globals.iter().map(|&global| self.local_section(global)).collect()
    }

    /// Translates the section component of a local index path to global
    /// space; the item component passes through.
    pub fn global_path(&self, local: IndexPath) -> IndexPath {
        local.with_section(self.global_section(local.section))
    }

    /// Translates the section component of a global index path to local
    /// space; the item component passes through.
    pub fn local_path(&self, global: IndexPath) -> IndexPath {
        global.with_section(self.local_section(global.section))
    }

    /// Translates a set of local index paths to global space.
    pub fn global_paths(&self, locals: &[IndexPath]) -> Vec<IndexPath> {
        locals.iter().map(|&path| self.global_path(path)).collect()
    }

    /// Reassigns this mapping to `section_count` sections starting at
    /// `global_offset`. Returns the new end so the caller can chain the
    /// next mapping's offset.
    pub fn update(&mut self, global_offset: usize, section_count: usize) -> usize {
        self.global_start = global_offset;
        self.global_end = global_offset + section_count;
        self.global_end
    }
}

/// One registered source with its current mapping.
pub(crate) struct MappingEntry {
    pub(crate) source: Arc<dyn DataSource>,
    pub(crate) id: SourceId,
    pub(crate) mapping: IndexMapping,
}

/// Ordered association of registered sources to their index mappings.
///
/// Registration order determines how global sections are tiled. The table
/// also maintains a dense derived cache from global section index to owning
/// entry, refilled by [`rebuild`](Self::rebuild). Sources change their
/// section counts independently, so the cache must be rebuilt before any
/// read that depends on it.
pub(crate) struct MappingTable {
    entries: Vec<MappingEntry>,
    /// Derived cache: global section index -> index into `entries`.
    section_owner: Vec<usize>,
}

impl MappingTable {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            section_owner: Vec::new(),
        }
    }

    /// Number of registered sources.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total global sections, per the last rebuild.
    pub(crate) fn global_section_count(&self) -> usize {
        self.section_owner.len()
    }

    pub(crate) fn contains(&self, id: SourceId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub(crate) fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Registers `source` at the end of the tiling order.
    pub(crate) fn push(&mut self, source: Arc<dyn DataSource>) {
        let id = SourceId::of(source.as_ref());
        self.entries.push(MappingEntry {
            source,
            id,
            mapping: IndexMapping::new(),
        });
    }

    /// Unregisters the source identified by `id`, returning its entry with
    /// the mapping it held before removal.
    ///
    /// # Panics
    ///
    /// Panics if no source with that identity is registered.
    pub(crate) fn remove(&mut self, id: SourceId) -> MappingEntry {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .expect("cannot remove a data source that is not registered");
        self.entries.remove(position)
    }

    /// Unregisters every source, returning the entries in registration
    /// order.
    pub(crate) fn clear(&mut self) -> Vec<MappingEntry> {
        self.section_owner.clear();
        std::mem::take(&mut self.entries)
    }

    /// Recomputes every mapping and the derived section-owner cache from
    /// the sources' current section counts.
    ///
    /// Walks the entries in registration order, chaining each mapping's
    /// global offset from the previous one's end. O(total sections), always
    /// a full rebuild.
    pub(crate) fn rebuild(&mut self) {
        self.section_owner.clear();
        let mut offset = 0;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let count = entry.source.section_count();
            offset = entry.mapping.update(offset, count);
            self.section_owner.extend(std::iter::repeat_n(index, count));
        }
        tracing::trace!(
            target: targets::DATASOURCE,
            sources = self.entries.len(),
            sections = self.section_owner.len(),
            "rebuilt section mapping"
        );
    }

    /// The entry owning `global` section, per the last rebuild.
    ///
    /// # Panics
    ///
    /// Panics if `global` is outside the composed section space.
    pub(crate) fn entry_for_global_section(&self, global: usize) -> &MappingEntry {
        let index = self.section_owner.get(global).copied().unwrap_or_else(|| {
            panic!(
                "global section {global} out of range ({} total)",
                self.section_owner.len()
            )
        });
        &self.entries[index]
    }

    /// The current mapping of the source identified by `id`.
    ///
    /// # Panics
    ///
    /// Panics if no source with that identity is registered.
    pub(crate) fn mapping_for(&self, id: SourceId) -> IndexMapping {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.mapping)
            .expect("received an event from a data source that is not registered")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::data::ItemData;
    use crate::datasource::traits::DataSourceCore;
    use crate::datasource::view::GridView;
    use parking_lot::RwLock;

    struct StaticSource {
        core: DataSourceCore,
        sections: RwLock<usize>,
    }

    impl StaticSource {
        fn new(sections: usize) -> Arc<Self> {
            Arc::new(Self {
                core: DataSourceCore::new(),
                sections: RwLock::new(sections),
            })
        }

        fn set_sections(&self, sections: usize) {
            *self.sections.write() = sections;
        }
    }

    impl DataSource for StaticSource {
        fn core(&self) -> &DataSourceCore {
            &self.core
        }

        fn section_count(&self) -> usize {
            *self.sections.read()
        }

        fn item_count(&self, _section: usize) -> usize {
            0
        }

        fn item(&self, _view: &dyn GridView, _path: IndexPath) -> ItemData {
            ItemData::None
        }
    }

    #[test]
    fn test_round_trip_law() {
        let mut mapping = IndexMapping::new();
        mapping.update(4, 3);

        for global in 4..7 {
            assert_eq!(mapping.global_section(mapping.local_section(global)), global);
        }
        for local in 0..3 {
            assert_eq!(mapping.local_section(mapping.global_section(local)), local);
        }
    }

    #[test]
    fn test_update_chains_offsets() {
        let mut first = IndexMapping::new();
        let mut second = IndexMapping::new();

        let end = first.update(0, 3);
        let end = second.update(end, 2);

        assert_eq!(end, 5);
        assert_eq!(first.global_range(), 0..3);
        assert_eq!(second.global_range(), 3..5);
    }

    #[test]
    fn test_batch_section_translation_round_trips() {
        let mut mapping = IndexMapping::new();
        mapping.update(3, 3);

        assert_eq!(mapping.global_sections(&[0, 2]), vec![3, 5]);
        assert_eq!(mapping.local_sections(&[3, 5]), vec![0, 2]);
    }

    #[test]
    fn test_path_translation_keeps_item_component() {
        let mut mapping = IndexMapping::new();
        mapping.update(2, 4);

        assert_eq!(
            mapping.global_path(IndexPath::new(1, 9)),
            IndexPath::new(3, 9)
        );
        assert_eq!(
            mapping.local_path(IndexPath::new(5, 0)),
            IndexPath::new(3, 0)
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_local_section_panics_outside_range() {
        let mut mapping = IndexMapping::new();
        mapping.update(0, 2);
        mapping.local_section(2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_global_section_panics_outside_count() {
        let mut mapping = IndexMapping::new();
        mapping.update(0, 2);
        mapping.global_section(2);
    }

    #[test]
    fn test_rebuild_tiles_ranges_in_registration_order() {
        let a = StaticSource::new(3);
        let b = StaticSource::new(2);

        let mut table = MappingTable::new();
        table.push(a.clone());
        table.push(b.clone());
        table.rebuild();

        assert_eq!(table.global_section_count(), 5);
        assert_eq!(table.mapping_for(SourceId::of(a.as_ref())).global_range(), 0..3);
        assert_eq!(table.mapping_for(SourceId::of(b.as_ref())).global_range(), 3..5);

        for global in 0..3 {
            assert_eq!(table.entry_for_global_section(global).id, SourceId::of(a.as_ref()));
        }
        for global in 3..5 {
            assert_eq!(table.entry_for_global_section(global).id, SourceId::of(b.as_ref()));
        }
    }

    #[test]
    fn test_rebuild_follows_section_count_changes() {
        let a = StaticSource::new(1);
        let b = StaticSource::new(1);

        let mut table = MappingTable::new();
        table.push(a.clone());
        table.push(b.clone());
        table.rebuild();
        assert_eq!(table.global_section_count(), 2);

        a.set_sections(4);
        table.rebuild();
        assert_eq!(table.global_section_count(), 5);
        assert_eq!(table.mapping_for(SourceId::of(b.as_ref())).global_range(), 4..5);
    }

    #[test]
    fn test_remove_renumbers_remaining_sources() {
        let a = StaticSource::new(3);
        let b = StaticSource::new(2);

        let mut table = MappingTable::new();
        table.push(a.clone());
        table.push(b.clone());
        table.rebuild();

        let removed = table.remove(SourceId::of(a.as_ref()));
        assert_eq!(removed.mapping.global_range(), 0..3);

        table.rebuild();
        assert_eq!(table.global_section_count(), 2);
        assert_eq!(table.mapping_for(SourceId::of(b.as_ref())).global_range(), 0..2);
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_remove_unregistered_panics() {
        let a = StaticSource::new(1);
        let mut table = MappingTable::new();
        table.remove(SourceId::of(a.as_ref()));
    }

    #[test]
    fn test_zero_section_source_occupies_no_range() {
        let a = StaticSource::new(0);
        let b = StaticSource::new(2);

        let mut table = MappingTable::new();
        table.push(a.clone());
        table.push(b.clone());
        table.rebuild();

        assert_eq!(table.global_section_count(), 2);
        assert_eq!(
            table.mapping_for(SourceId::of(a.as_ref())).section_count(),
            0
        );
        assert_eq!(table.mapping_for(SourceId::of(b.as_ref())).global_range(), 0..2);
    }
}
