//! Mutation and lifecycle events emitted by data sources.

use std::fmt;
use std::sync::Arc;

use super::index::IndexPath;
use super::loading::LoadError;

/// Animation hint carried by section-level events.
///
/// Purely advisory; the rendering layer may use it to slide sections in
/// from one side. Registration-driven inserts and removes use `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionDirection {
    /// No directional animation.
    #[default]
    None,
    /// Transition toward the leading edge.
    Left,
    /// Transition toward the trailing edge.
    Right,
}

/// Deferred-work payload of [`DataSourceEvent::BatchUpdate`].
///
/// Invoking it applies the wrapped updates; the listener decides the
/// batching context (e.g. inside the view's batch-update block).
pub type BatchUpdates = Arc<dyn Fn() + Send + Sync>;

/// A structural or lifecycle notification from a data source.
///
/// Indices are always expressed in the emitting source's own index space.
/// When a source is registered with a composite, the composite receives the
/// event, translates every index into its global space, and re-emits it to
/// its own listeners with the same kind.
#[derive(Clone)]
pub enum DataSourceEvent {
    /// Sections were inserted at the given (post-insert) indices.
    SectionsInserted {
        sections: Vec<usize>,
        direction: TransitionDirection,
    },
    /// Sections were removed from the given (pre-removal) indices.
    SectionsRemoved {
        sections: Vec<usize>,
        direction: TransitionDirection,
    },
    /// The given sections should be re-rendered in place.
    SectionsReloaded { sections: Vec<usize> },
    /// A section moved from one index to another.
    SectionMoved {
        from: usize,
        to: usize,
        direction: TransitionDirection,
    },
    /// Items were inserted at the given (post-insert) paths.
    ItemsInserted { paths: Vec<IndexPath> },
    /// Items were removed from the given (pre-removal) paths.
    ItemsRemoved { paths: Vec<IndexPath> },
    /// The items at the given paths should be re-rendered in place.
    ItemsReloaded { paths: Vec<IndexPath> },
    /// An item moved from one path to another.
    ItemMoved { from: IndexPath, to: IndexPath },
    /// The source's entire content changed; listeners should reload
    /// wholesale rather than apply a granular diff.
    ContentReloaded,
    /// A content load is about to begin.
    WillLoadContent,
    /// A content load finished, possibly with a failure.
    DidLoadContent { error: Option<LoadError> },
    /// Queued structural updates that must be applied atomically, in one
    /// batching context.
    BatchUpdate { updates: BatchUpdates },
}

impl DataSourceEvent {
    /// Whether this event describes a structural change to sections or
    /// items (as opposed to a lifecycle notification).
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            DataSourceEvent::WillLoadContent
                | DataSourceEvent::DidLoadContent { .. }
                | DataSourceEvent::BatchUpdate { .. }
        )
    }
}

impl fmt::Debug for DataSourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionsInserted {
                sections,
                direction,
            } => f
                .debug_struct("SectionsInserted")
                .field("sections", sections)
                .field("direction", direction)
                .finish(),
            Self::SectionsRemoved {
                sections,
                direction,
            } => f
                .debug_struct("SectionsRemoved")
                .field("sections", sections)
                .field("direction", direction)
                .finish(),
            Self::SectionsReloaded { sections } => f
                .debug_struct("SectionsReloaded")
                .field("sections", sections)
                .finish(),
            Self::SectionMoved {
                from,
                to,
                direction,
            } => f
                .debug_struct("SectionMoved")
                .field("from", from)
                .field("to", to)
                .field("direction", direction)
                .finish(),
            Self::ItemsInserted { paths } => f
                .debug_struct("ItemsInserted")
                .field("paths", paths)
                .finish(),
            Self::ItemsRemoved { paths } => {
                f.debug_struct("ItemsRemoved").field("paths", paths).finish()
            }
            Self::ItemsReloaded { paths } => f
                .debug_struct("ItemsReloaded")
                .field("paths", paths)
                .finish(),
            Self::ItemMoved { from, to } => f
                .debug_struct("ItemMoved")
                .field("from", from)
                .field("to", to)
                .finish(),
            Self::ContentReloaded => write!(f, "ContentReloaded"),
            Self::WillLoadContent => write!(f, "WillLoadContent"),
            Self::DidLoadContent { error } => f
                .debug_struct("DidLoadContent")
                .field("error", error)
                .finish(),
            Self::BatchUpdate { .. } => write!(f, "BatchUpdate {{ .. }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        assert!(
            DataSourceEvent::SectionsInserted {
                sections: vec![0],
                direction: TransitionDirection::None,
            }
            .is_structural()
        );
        assert!(
            DataSourceEvent::ItemMoved {
                from: IndexPath::new(0, 0),
                to: IndexPath::new(0, 1),
            }
            .is_structural()
        );
        assert!(DataSourceEvent::ContentReloaded.is_structural());
        assert!(!DataSourceEvent::WillLoadContent.is_structural());
        assert!(!DataSourceEvent::DidLoadContent { error: None }.is_structural());
        assert!(
            !DataSourceEvent::BatchUpdate {
                updates: Arc::new(|| {}),
            }
            .is_structural()
        );
    }

    #[test]
    fn test_debug_hides_batch_payload() {
        let event = DataSourceEvent::BatchUpdate {
            updates: Arc::new(|| {}),
        };
        assert_eq!(format!("{event:?}"), "BatchUpdate { .. }");
    }
}
