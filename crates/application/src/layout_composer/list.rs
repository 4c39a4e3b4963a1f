use tracing::debug;

use super::{ColumnPlan, ListComposition, ListPlan, field_access};

pub(super) fn compose(input: &ListComposition<'_>) -> ListPlan {
    let columns = input
        .layout
        .columns()
        .iter()
        .filter(|column| !column.is_hidden())
        .filter_map(|column| {
            let name = column.name();
            let Some(definition) = input.fields.get(name) else {
                debug!(field = %name, "skipping list column for unknown field");
                return None;
            };
            if !field_access(input.field_permissions, name).read {
                debug!(field = %name, "skipping unreadable list column");
                return None;
            }

            Some(ColumnPlan {
                name: name.to_owned(),
                field_type: definition.field_type().clone(),
                label: column
                    .custom_label()
                    .or(definition.label())
                    .map(str::to_owned),
                width: column.width(),
                width_px: column.width_px(),
                align: column.align(),
                link: column.is_link(),
                sortable: column.is_sortable(),
            })
        })
        .collect();

    ListPlan { columns }
}
