use crmdesk_domain::{LayoutCell, LayoutPanel, LayoutSlot};
use serde_json::Value;
use tracing::debug;

use super::{
    CellPlan, DetailComposition, DetailPlan, PanelPlan, RowArrangement, RowPlan, SlotPlan,
    field_access,
};

pub(super) fn compose(input: &DetailComposition<'_>) -> DetailPlan {
    let panels = input
        .layout
        .panels()
        .iter()
        .filter_map(|panel| compose_panel(input, panel))
        .collect();

    DetailPlan { panels }
}

fn compose_panel(input: &DetailComposition<'_>, panel: &LayoutPanel) -> Option<PanelPlan> {
    if panel.is_hidden() {
        return None;
    }
    if let Some(name) = panel.name()
        && !input.dynamic_state.panel_visible(name)
    {
        debug!(panel = %name, "panel hidden by dynamic logic");
        return None;
    }

    let rows: Vec<RowPlan> = panel
        .rows()
        .iter()
        .filter_map(|row| compose_row(input, row))
        .collect();
    if rows.is_empty() {
        return None;
    }

    Some(PanelPlan {
        name: panel.name().map(str::to_owned),
        label: panel.label().map(str::to_owned),
        style: panel.style().to_owned(),
        rows,
    })
}

fn compose_row(input: &DetailComposition<'_>, row: &[LayoutSlot]) -> Option<RowPlan> {
    let stacked = row.len() == 1
        || row
            .iter()
            .any(|slot| slot.cell().is_some_and(LayoutCell::is_full_width));
    let arrangement = if stacked {
        RowArrangement::Stacked
    } else {
        RowArrangement::Columns
    };

    let mut slots = Vec::with_capacity(row.len());
    for slot in row {
        match slot {
            LayoutSlot::Placeholder if !stacked => slots.push(SlotPlan::Placeholder),
            LayoutSlot::Placeholder => {}
            LayoutSlot::Cell(cell) => {
                if let Some(plan) = compose_cell(input, cell) {
                    slots.push(SlotPlan::Field(plan));
                }
            }
        }
    }

    slots
        .iter()
        .any(|slot| slot.cell().is_some())
        .then_some(RowPlan { arrangement, slots })
}

fn compose_cell(input: &DetailComposition<'_>, cell: &LayoutCell) -> Option<CellPlan> {
    let name = cell.name();
    let Some(definition) = input.fields.get(name) else {
        debug!(field = %name, "skipping layout cell for unknown field");
        return None;
    };

    let access = field_access(input.field_permissions, name);
    if !access.read {
        debug!(field = %name, "skipping unreadable field");
        return None;
    }

    let dynamic = input.dynamic_state.field(name);
    if !dynamic.visible {
        return None;
    }

    let field_type = cell
        .type_override()
        .unwrap_or(definition.field_type())
        .clone();
    let read_only = cell.read_only() == Some(true)
        || definition.is_read_only()
        || !access.edit
        || dynamic.read_only;
    let required = definition.is_required() || dynamic.required;
    let options = if field_type.is_enumerated() {
        dynamic
            .filtered_options
            .or_else(|| definition.options().map(<[String]>::to_vec))
    } else {
        None
    };
    let value = input
        .form_data
        .and_then(|form| form.get(name))
        .or_else(|| input.record.get(name))
        .cloned()
        .unwrap_or(Value::Null);

    Some(CellPlan {
        name: name.to_owned(),
        field_type,
        label: cell
            .custom_label()
            .or(definition.label())
            .map(str::to_owned),
        show_label: !cell.hides_label(),
        full_width: cell.is_full_width(),
        required,
        read_only,
        invalid: dynamic.invalid,
        options,
        value,
    })
}
