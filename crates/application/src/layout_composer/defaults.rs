use crmdesk_domain::{
    DetailLayout, FieldDefinitions, LayoutCell, LayoutPanel, LayoutSlot, ListColumn, ListLayout,
};
use tracing::debug;

const NON_LAYOUT_FIELDS: [&str; 6] = [
    "id",
    "deleted",
    "createdAt",
    "modifiedAt",
    "createdById",
    "modifiedById",
];

const LIST_PREFERRED_FIELDS: [&str; 3] = ["status", "createdAt", "modifiedAt"];

const LIST_MIN_COLUMNS: usize = 4;

/// Synthesizes a detail layout: `name` first, then the remaining fields in metadata
/// order, two per row, with a placeholder after an odd last field.
#[must_use]
pub fn default_detail_layout(fields: &FieldDefinitions) -> DetailLayout {
    let ordered: Vec<&str> = fields
        .contains("name")
        .then_some("name")
        .into_iter()
        .chain(
            fields
                .iter()
                .map(|(name, _)| name)
                .filter(|name| *name != "name" && !NON_LAYOUT_FIELDS.contains(name)),
        )
        .collect();

    let rows: Vec<Vec<LayoutSlot>> = ordered
        .chunks(2)
        .map(|pair| {
            let mut row: Vec<LayoutSlot> = pair
                .iter()
                .map(|name| LayoutSlot::from(LayoutCell::new(*name)))
                .collect();
            if row.len() == 1 {
                row.push(LayoutSlot::Placeholder);
            }
            row
        })
        .collect();

    debug!(fields = ordered.len(), rows = rows.len(), "synthesized detail layout");
    DetailLayout::new(vec![LayoutPanel::new(None, rows)])
}

/// Synthesizes a list layout: linked `name`, then `status`, `createdAt` and
/// `modifiedAt` when present, then other fields until there are four columns.
#[must_use]
pub fn default_list_layout(fields: &FieldDefinitions) -> ListLayout {
    let mut columns = Vec::new();
    if fields.contains("name") {
        columns.push(ListColumn::new("name").with_link());
    }
    for preferred in LIST_PREFERRED_FIELDS {
        if fields.contains(preferred) {
            columns.push(ListColumn::new(preferred));
        }
    }

    for (name, _) in fields.iter() {
        if columns.len() >= LIST_MIN_COLUMNS {
            break;
        }
        let taken = columns.iter().any(|column| column.name() == name);
        if taken || name == "description" || NON_LAYOUT_FIELDS.contains(&name) {
            continue;
        }
        columns.push(ListColumn::new(name));
    }

    debug!(columns = columns.len(), "synthesized list layout");
    ListLayout::new(columns)
}
