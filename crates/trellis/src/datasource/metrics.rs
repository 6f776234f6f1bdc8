//! Per-section layout configuration.

/// Insets around a section's content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Edges {
    /// Creates insets from the four edge values.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates uniform insets on all four edges.
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Layout configuration for one section.
///
/// Every field is optional: `None` means "no opinion". A composed data
/// source resolves the metrics for a global section by merging its own
/// defaults with the owning child's override, field by field, with the
/// child winning wherever it has a value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionMetrics {
    /// Fixed height for every row in the section.
    pub row_height: Option<f32>,
    /// Estimated row height, used before cells are measured.
    pub estimated_row_height: Option<f32>,
    /// Number of columns the section lays out.
    pub columns: Option<usize>,
    /// Insets around the section's content.
    pub padding: Option<Edges>,
    /// Whether the section shows a header.
    pub show_header: Option<bool>,
    /// Whether the section shows a footer.
    pub show_footer: Option<bool>,
}

impl SectionMetrics {
    /// Merges `overrides` on top of `self`, field by field.
    ///
    /// A field set in `overrides` wins; otherwise the value from `self`
    /// is kept.
    pub fn merged(&self, overrides: &SectionMetrics) -> SectionMetrics {
        SectionMetrics {
            row_height: overrides.row_height.or(self.row_height),
            estimated_row_height: overrides.estimated_row_height.or(self.estimated_row_height),
            columns: overrides.columns.or(self.columns),
            padding: overrides.padding.or(self.padding),
            show_header: overrides.show_header.or(self.show_header),
            show_footer: overrides.show_footer.or(self.show_footer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_override_per_field() {
        let defaults = SectionMetrics {
            row_height: Some(44.0),
            columns: Some(1),
            show_header: Some(true),
            ..Default::default()
        };
        let overrides = SectionMetrics {
            columns: Some(3),
            padding: Some(Edges::uniform(8.0)),
            ..Default::default()
        };

        let merged = defaults.merged(&overrides);
        assert_eq!(merged.row_height, Some(44.0));
        assert_eq!(merged.columns, Some(3));
        assert_eq!(merged.padding, Some(Edges::uniform(8.0)));
        assert_eq!(merged.show_header, Some(true));
        assert_eq!(merged.show_footer, None);
    }

    #[test]
    fn test_merge_with_empty_override_keeps_defaults() {
        let defaults = SectionMetrics {
            row_height: Some(20.0),
            ..Default::default()
        };
        assert_eq!(defaults.merged(&SectionMetrics::default()), defaults);
    }
}
