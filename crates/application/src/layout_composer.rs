use std::collections::BTreeMap;

use crmdesk_domain::{ColumnAlign, DetailLayout, FieldDefinitions, FieldType, ListLayout};
use serde::Serialize;
use serde_json::Value;

use crate::{EntityDynamicState, FieldPermissions};

mod defaults;
mod detail;
mod list;

#[cfg(test)]
mod tests;

pub use defaults::{default_detail_layout, default_list_layout};

/// Inputs for composing a detail or edit view.
#[derive(Debug, Clone, Copy)]
pub struct DetailComposition<'a> {
    /// Declared or synthesized panels.
    pub layout: &'a DetailLayout,
    /// Entity field metadata.
    pub fields: &'a FieldDefinitions,
    /// Saved record values.
    pub record: &'a Value,
    /// Unsaved form values, taking precedence over the record.
    pub form_data: Option<&'a Value>,
    /// Evaluated dynamic logic.
    pub dynamic_state: &'a EntityDynamicState,
    /// Field access keyed by field name; missing fields are denied.
    pub field_permissions: &'a BTreeMap<String, FieldPermissions>,
}

/// Inputs for composing a record list.
#[derive(Debug, Clone, Copy)]
pub struct ListComposition<'a> {
    /// Declared or synthesized columns.
    pub layout: &'a ListLayout,
    /// Entity field metadata.
    pub fields: &'a FieldDefinitions,
    /// Field access keyed by field name; missing fields are denied.
    pub field_permissions: &'a BTreeMap<String, FieldPermissions>,
}

/// Rendering plan for a detail or edit view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DetailPlan {
    /// Visible panels in layout order.
    pub panels: Vec<PanelPlan>,
}

/// One rendered panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelPlan {
    /// Panel name, when declared.
    pub name: Option<String>,
    /// Panel label, when declared.
    pub label: Option<String>,
    /// Style tag.
    pub style: String,
    /// Rows with at least one field.
    pub rows: Vec<RowPlan>,
}

/// How the slots of a row are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowArrangement {
    /// One block per line.
    Stacked,
    /// Side-by-side columns.
    Columns,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPlan {
    /// Row arrangement.
    pub arrangement: RowArrangement,
    /// Slots in layout order.
    pub slots: Vec<SlotPlan>,
}

/// One rendered slot of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotPlan {
    /// A field with its merged state.
    Field(CellPlan),
    /// An empty column.
    Placeholder,
}

impl SlotPlan {
    /// Returns the field cell, if any.
    #[must_use]
    pub fn cell(&self) -> Option<&CellPlan> {
        match self {
            Self::Field(cell) => Some(cell),
            Self::Placeholder => None,
        }
    }
}

/// One rendered field with metadata, layout overrides, dynamic logic and ACL merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPlan {
    /// Field name.
    pub name: String,
    /// Effective field kind.
    pub field_type: FieldType,
    /// Effective label.
    pub label: Option<String>,
    /// Whether the label is rendered.
    pub show_label: bool,
    /// Whether the cell spans the row.
    pub full_width: bool,
    /// Effective requiredness.
    pub required: bool,
    /// Effective read-only flag.
    pub read_only: bool,
    /// Whether dynamic logic flags the value invalid.
    pub invalid: bool,
    /// Offered options of enumerated fields.
    pub options: Option<Vec<String>>,
    /// Current value; form data wins over the record.
    pub value: Value,
}

/// Rendering plan for a record list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ListPlan {
    /// Visible columns in layout order.
    pub columns: Vec<ColumnPlan>,
}

/// One rendered list column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPlan {
    /// Field name.
    pub name: String,
    /// Field kind.
    pub field_type: FieldType,
    /// Header label.
    pub label: Option<String>,
    /// Percentage width as declared.
    pub width: Option<f64>,
    /// Pixel width as declared.
    pub width_px: Option<f64>,
    /// Alignment as declared.
    pub align: Option<ColumnAlign>,
    /// Whether the value links to the record.
    pub link: bool,
    /// Whether sorting is allowed.
    pub sortable: bool,
}

/// Composes the ordered rendering plan of a detail or edit view.
#[must_use]
pub fn compose_detail(input: &DetailComposition<'_>) -> DetailPlan {
    detail::compose(input)
}

/// Composes the ordered rendering plan of a record list.
#[must_use]
pub fn compose_list(input: &ListComposition<'_>) -> ListPlan {
    list::compose(input)
}

fn field_access(
    permissions: &BTreeMap<String, FieldPermissions>,
    name: &str,
) -> FieldPermissions {
    permissions.get(name).copied().unwrap_or(FieldPermissions {
        read: false,
        edit: false,
    })
}
