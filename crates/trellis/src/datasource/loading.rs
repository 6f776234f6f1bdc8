//! Loading states and their aggregation.
//!
//! Every data source carries a [`LoadingState`] describing where its content
//! stands in the load lifecycle. A composed data source reduces the states
//! of all of its children plus its own into a single aggregate via
//! [`aggregate_loading_state`].

use std::fmt;

/// A content-load failure, carried as a value inside
/// [`LoadingState::Error`].
///
/// Load failures are not fatal: they surface through the aggregate loading
/// state and the `DidLoadContent` lifecycle event. Retrying is the
/// responsibility of the individual data source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
    message: String,
}

impl LoadError {
    /// Creates a load error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Lifecycle status of a data source's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState {
    /// No load has been requested yet.
    #[default]
    Initial,
    /// The initial content load is in progress.
    Loading,
    /// Content exists and a reload is in progress.
    Refreshing,
    /// Content loaded successfully.
    Loaded,
    /// The load completed but produced no content.
    NoContent,
    /// The load failed.
    Error(LoadError),
}

impl LoadingState {
    /// Returns `true` while a load or refresh is in progress.
    pub fn is_busy(&self) -> bool {
        matches!(self, LoadingState::Loading | LoadingState::Refreshing)
    }

    /// Returns `true` once content has loaded (even if empty).
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded | LoadingState::NoContent)
    }

    /// The failure cause, if this is an error state.
    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadingState::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "Initial"),
            Self::Loading => write!(f, "Loading"),
            Self::Refreshing => write!(f, "Refreshing"),
            Self::Loaded => write!(f, "Loaded"),
            Self::NoContent => write!(f, "NoContent"),
            Self::Error(err) => write!(f, "Error({err})"),
        }
    }
}

/// Reduces a set of loading states into one aggregate state.
///
/// Precedence, highest first: any `Loading` wins, then any `Refreshing`,
/// then any `Error` (the first cause encountered, in iteration order), then
/// any `NoContent`, then any `Loaded`. An empty or all-`Initial` input
/// aggregates to `Initial`.
pub fn aggregate_loading_state<'a, I>(states: I) -> LoadingState
where
    I: IntoIterator<Item = &'a LoadingState>,
{
    let mut any_refreshing = false;
    let mut any_no_content = false;
    let mut any_loaded = false;
    let mut first_error = None;

    for state in states {
        match state {
            LoadingState::Loading => return LoadingState::Loading,
            LoadingState::Refreshing => any_refreshing = true,
            LoadingState::Error(err) => {
                if first_error.is_none() {
                    first_error = Some(err.clone());
                }
            }
            LoadingState::NoContent => any_no_content = true,
            LoadingState::Loaded => any_loaded = true,
            LoadingState::Initial => {}
        }
    }

    if any_refreshing {
        LoadingState::Refreshing
    } else if let Some(err) = first_error {
        LoadingState::Error(err)
    } else if any_no_content {
        LoadingState::NoContent
    } else if any_loaded {
        LoadingState::Loaded
    } else {
        LoadingState::Initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregates_to_initial() {
        assert_eq!(aggregate_loading_state([]), LoadingState::Initial);
    }

    #[test]
    fn test_loading_has_highest_precedence() {
        let states = [
            LoadingState::Loaded,
            LoadingState::Error(LoadError::new("boom")),
            LoadingState::Loading,
        ];
        assert_eq!(aggregate_loading_state(&states), LoadingState::Loading);
    }

    #[test]
    fn test_first_error_cause_wins() {
        let states = [
            LoadingState::Loaded,
            LoadingState::Error(LoadError::new("first")),
            LoadingState::Error(LoadError::new("second")),
        ];
        assert_eq!(
            aggregate_loading_state(&states),
            LoadingState::Error(LoadError::new("first"))
        );
    }

    #[test]
    fn test_refreshing_beats_error() {
        let states = [
            LoadingState::Error(LoadError::new("boom")),
            LoadingState::Refreshing,
        ];
        assert_eq!(aggregate_loading_state(&states), LoadingState::Refreshing);
    }

    #[test]
    fn test_no_content_beats_loaded() {
        let states = [LoadingState::Loaded, LoadingState::NoContent];
        assert_eq!(aggregate_loading_state(&states), LoadingState::NoContent);
    }

    #[test]
    fn test_initial_is_ignored_next_to_loaded() {
        let states = [LoadingState::Initial, LoadingState::Loaded];
        assert_eq!(aggregate_loading_state(&states), LoadingState::Loaded);
    }

    #[test]
    fn test_display() {
        assert_eq!(LoadingState::Loaded.to_string(), "Loaded");
        assert_eq!(
            LoadingState::Error(LoadError::new("nope")).to_string(),
            "Error(nope)"
        );
    }
}
