use serde::{Deserialize, Serialize};

/// Horizontal alignment of a list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Right aligned.
    Right,
}

/// One column of a record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListColumn {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    align: Option<ColumnAlign>,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    not_sortable: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_label: Option<String>,
}

impl ListColumn {
    /// Creates a sortable, visible column for the named field.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: None,
            width_px: None,
            align: None,
            link: false,
            not_sortable: false,
            hidden: false,
            custom_label: None,
        }
    }

    /// Sets the width as a percentage.
    #[must_use]
    pub fn with_width(mut self, percent: f64) -> Self {
        self.width = Some(percent);
        self
    }

    /// Sets the width in pixels.
    #[must_use]
    pub fn with_width_px(mut self, pixels: f64) -> Self {
        self.width_px = Some(pixels);
        self
    }

    /// Sets the alignment.
    #[must_use]
    pub fn with_align(mut self, align: ColumnAlign) -> Self {
        self.align = Some(align);
        self
    }

    /// Renders the value as a link to the record.
    #[must_use]
    pub fn with_link(mut self) -> Self {
        self.link = true;
        self
    }

    /// Disables sorting by this column.
    #[must_use]
    pub fn not_sortable(mut self) -> Self {
        self.not_sortable = true;
        self
    }

    /// Sets the static hidden flag.
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Replaces the header label.
    #[must_use]
    pub fn with_custom_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the percentage width.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Returns the pixel width.
    #[must_use]
    pub fn width_px(&self) -> Option<f64> {
        self.width_px
    }

    /// Returns the declared alignment.
    #[must_use]
    pub fn align(&self) -> Option<ColumnAlign> {
        self.align
    }

    /// Returns whether the value links to the record.
    #[must_use]
    pub fn is_link(&self) -> bool {
        self.link
    }

    /// Returns whether sorting is allowed.
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        !self.not_sortable
    }

    /// Returns whether the column is statically hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns the header label override.
    #[must_use]
    pub fn custom_label(&self) -> Option<&str> {
        self.custom_label.as_deref()
    }
}

/// Ordered columns of a record list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListLayout {
    columns: Vec<ListColumn>,
}

impl ListLayout {
    /// Creates a list layout from columns.
    #[must_use]
    pub fn new(columns: Vec<ListColumn>) -> Self {
        Self { columns }
    }

    /// Returns the columns.
    #[must_use]
    pub fn columns(&self) -> &[ListColumn] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ColumnAlign, ListLayout};

    #[test]
    fn list_layout_parses_column_options() {
        let layout = serde_json::from_value::<ListLayout>(json!([
            {"name": "name", "link": true, "width": 30},
            {"name": "amount", "align": "right", "widthPx": 120, "notSortable": true},
            {"name": "legacyCode", "hidden": true}
        ]))
        .unwrap_or_default();

        let columns = layout.columns();
        assert_eq!(columns.len(), 3);
        assert!(columns[0].is_link());
        assert_eq!(columns[0].width(), Some(30.0));
        assert!(columns[0].is_sortable());
        assert_eq!(columns[1].align(), Some(ColumnAlign::Right));
        assert_eq!(columns[1].width_px(), Some(120.0));
        assert!(!columns[1].is_sortable());
        assert!(columns[2].is_hidden());
    }
}
