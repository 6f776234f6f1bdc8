//! The narrow rendering-view contract and the local translation context.

use super::index::IndexPath;
use super::mapping::IndexMapping;

/// A width/height pair used by size-fitting queries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The capabilities a data source may query on the rendering view.
///
/// The view itself is an opaque collaborator; this trait is the narrow
/// surface the data layer calls through. All paths are expressed in the
/// index space of whoever holds the handle.
pub trait GridView {
    /// Index paths of the currently selected items.
    fn selected_paths(&self) -> Vec<IndexPath>;

    /// Index paths of the items currently on screen.
    fn visible_paths(&self) -> Vec<IndexPath>;
}

/// Translation context handed to a child data source during delegation.
///
/// A composite cannot give a child the real view handle: any path the
/// child reads back would be in the composite's global space. `LocalView`
/// bundles the real view with the child's [`IndexMapping`] and implements
/// [`GridView`] by localizing every result, dropping paths that belong to
/// other children. Nested composites stack these contexts naturally.
pub struct LocalView<'a> {
    view: &'a dyn GridView,
    mapping: IndexMapping,
}

impl<'a> LocalView<'a> {
    /// Wraps `view` so results are translated through `mapping`.
    pub fn new(view: &'a dyn GridView, mapping: IndexMapping) -> Self {
        Self { view, mapping }
    }

    /// The mapping this context translates through.
    pub fn mapping(&self) -> IndexMapping {
        self.mapping
    }

    fn localize(&self, paths: Vec<IndexPath>) -> Vec<IndexPath> {
        paths
            .into_iter()
            .filter(|path| self.mapping.contains_global(path.section))
            .map(|path| self.mapping.local_path(path))
            .collect()
    }
}

impl GridView for LocalView<'_> {
    fn selected_paths(&self) -> Vec<IndexPath> {
        self.localize(self.view.selected_paths())
    }

    fn visible_paths(&self) -> Vec<IndexPath> {
        self.localize(self.view.visible_paths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubView {
        selected: Vec<IndexPath>,
        visible: Vec<IndexPath>,
    }

    impl GridView for StubView {
        fn selected_paths(&self) -> Vec<IndexPath> {
            self.selected.clone()
        }

        fn visible_paths(&self) -> Vec<IndexPath> {
            self.visible.clone()
        }
    }

    fn mapping(start: usize, count: usize) -> IndexMapping {
        let mut mapping = IndexMapping::new();
        mapping.update(start, count);
        mapping
    }

    #[test]
    fn test_localizes_paths_in_range() {
        let view = StubView {
            selected: vec![IndexPath::new(3, 2), IndexPath::new(4, 0)],
            visible: vec![],
        };
        let local = LocalView::new(&view, mapping(3, 2));

        assert_eq!(
            local.selected_paths(),
            vec![IndexPath::new(0, 2), IndexPath::new(1, 0)]
        );
    }

    #[test]
    fn test_drops_paths_outside_range() {
        let view = StubView {
            selected: vec![],
            visible: vec![
                IndexPath::new(0, 0),
                IndexPath::new(3, 1),
                IndexPath::new(9, 9),
            ],
        };
        let local = LocalView::new(&view, mapping(3, 2));

        assert_eq!(local.visible_paths(), vec![IndexPath::new(0, 1)]);
    }

    #[test]
    fn test_nested_contexts_stack() {
        // Outer composite maps the child to global 5..8; an inner context
        // over the outer one maps a grandchild to inner-local 1..3.
        let view = StubView {
            selected: vec![IndexPath::new(6, 4)],
            visible: vec![],
        };
        let outer = LocalView::new(&view, mapping(5, 3));
        let inner = LocalView::new(&outer, mapping(1, 2));

        assert_eq!(inner.selected_paths(), vec![IndexPath::new(0, 4)]);
    }
}
