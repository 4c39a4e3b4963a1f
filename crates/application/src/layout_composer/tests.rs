use std::collections::BTreeMap;

use crmdesk_domain::{
    ColumnAlign, DetailLayout, DynamicFieldState, FieldDefinition, FieldDefinitions, FieldType,
    LayoutCell, LayoutPanel, LayoutSlot, ListColumn, ListLayout,
};
use serde_json::{Value, json};

use super::{
    DetailComposition, ListComposition, RowArrangement, SlotPlan, compose_detail, compose_list,
    default_detail_layout, default_list_layout,
};
use crate::{EntityDynamicState, FieldPermissions};

const FULL: FieldPermissions = FieldPermissions {
    read: true,
    edit: true,
};

fn opportunity_fields() -> FieldDefinitions {
    FieldDefinitions::new()
        .with_field(
            "name",
            FieldDefinition::new(FieldType::ShortText).with_required(true),
        )
        .with_field(
            "stage",
            FieldDefinition::new(FieldType::SingleChoice)
                .with_options(["Prospecting", "Closed Won", "Closed Lost"]),
        )
        .with_field("amount", FieldDefinition::new(FieldType::Decimal))
        .with_field(
            "closeReason",
            FieldDefinition::new(FieldType::SingleChoice).with_options(["Price", "Other"]),
        )
        .with_field("description", FieldDefinition::new(FieldType::LongText))
        .with_field(
            "number",
            FieldDefinition::new(FieldType::Integer).with_read_only(true),
        )
}

fn all_permissions(fields: &FieldDefinitions) -> BTreeMap<String, FieldPermissions> {
    fields
        .iter()
        .map(|(name, _)| (name.to_owned(), FULL))
        .collect()
}

fn cell(name: &str) -> LayoutSlot {
    LayoutSlot::from(LayoutCell::new(name))
}

fn cell_names(slots: &[SlotPlan]) -> Vec<&str> {
    slots
        .iter()
        .map(|slot| slot.cell().map_or("-", |cell| cell.name.as_str()))
        .collect()
}

#[test]
fn default_detail_layout_pairs_fields_and_pads_the_last_row() {
    let fields = FieldDefinitions::new()
        .with_field("name", FieldDefinition::new(FieldType::ShortText))
        .with_field("email", FieldDefinition::new(FieldType::Email))
        .with_field("phone", FieldDefinition::new(FieldType::Phone));

    let layout = default_detail_layout(&fields);

    assert_eq!(layout.panels().len(), 1);
    assert_eq!(
        layout.panels()[0].rows(),
        &[
            vec![cell("name"), cell("email")],
            vec![cell("phone"), LayoutSlot::Placeholder],
        ][..]
    );
}

#[test]
fn default_detail_layout_puts_name_first_and_skips_system_fields() {
    let fields = FieldDefinitions::new()
        .with_field("id", FieldDefinition::new(FieldType::ShortText))
        .with_field("website", FieldDefinition::new(FieldType::Url))
        .with_field("createdAt", FieldDefinition::new(FieldType::DateTime))
        .with_field("name", FieldDefinition::new(FieldType::ShortText))
        .with_field("modifiedById", FieldDefinition::new(FieldType::ReferenceToOne));

    let layout = default_detail_layout(&fields);

    assert_eq!(
        layout.panels()[0].rows(),
        &[vec![cell("name"), cell("website")]][..]
    );
}

#[test]
fn default_list_layout_prefers_name_status_and_timestamps() {
    let fields = FieldDefinitions::new()
        .with_field("description", FieldDefinition::new(FieldType::LongText))
        .with_field("website", FieldDefinition::new(FieldType::Url))
        .with_field("createdAt", FieldDefinition::new(FieldType::DateTime))
        .with_field("name", FieldDefinition::new(FieldType::ShortText))
        .with_field("industry", FieldDefinition::new(FieldType::SingleChoice))
        .with_field("id", FieldDefinition::new(FieldType::ShortText));

    let layout = default_list_layout(&fields);
    let names: Vec<&str> = layout.columns().iter().map(ListColumn::name).collect();

    assert_eq!(names, vec!["name", "createdAt", "website", "industry"]);
    assert!(layout.columns()[0].is_link());
}

#[test]
fn default_list_layout_stops_at_four_columns() {
    let fields = FieldDefinitions::new()
        .with_field("name", FieldDefinition::new(FieldType::ShortText))
        .with_field("status", FieldDefinition::new(FieldType::SingleChoice))
        .with_field("createdAt", FieldDefinition::new(FieldType::DateTime))
        .with_field("modifiedAt", FieldDefinition::new(FieldType::DateTime))
        .with_field("source", FieldDefinition::new(FieldType::SingleChoice));

    let layout = default_list_layout(&fields);
    let names: Vec<&str> = layout.columns().iter().map(ListColumn::name).collect();

    assert_eq!(names, vec!["name", "status", "createdAt", "modifiedAt"]);
}

#[test]
fn rows_stack_single_or_full_width_cells() {
    let fields = opportunity_fields();
    let permissions = all_permissions(&fields);
    let layout = DetailLayout::new(vec![LayoutPanel::new(
        Some("Overview".to_owned()),
        vec![
            vec![cell("name"), LayoutSlot::Placeholder],
            vec![cell("description")],
            vec![
                LayoutSlot::from(LayoutCell::new("amount").with_full_width()),
                LayoutSlot::Placeholder,
            ],
        ],
    )]);
    let dynamic_state = EntityDynamicState::default();

    let plan = compose_detail(&DetailComposition {
        layout: &layout,
        fields: &fields,
        record: &json!({}),
        form_data: None,
        dynamic_state: &dynamic_state,
        field_permissions: &permissions,
    });

    let rows = &plan.panels[0].rows;
    assert_eq!(rows[0].arrangement, RowArrangement::Columns);
    assert_eq!(cell_names(&rows[0].slots), vec!["name", "-"]);
    assert_eq!(rows[1].arrangement, RowArrangement::Stacked);
    assert_eq!(rows[2].arrangement, RowArrangement::Stacked);
    assert_eq!(cell_names(&rows[2].slots), vec!["amount"]);
}

#[test]
fn hidden_unknown_and_unreadable_content_is_dropped() {
    let fields = opportunity_fields();
    let mut permissions = all_permissions(&fields);
    permissions.insert(
        "amount".to_owned(),
        FieldPermissions {
            read: false,
            edit: false,
        },
    );
    let layout = DetailLayout::new(vec![
        LayoutPanel::new(Some("Static".to_owned()), vec![vec![cell("name")]]).with_hidden(true),
        LayoutPanel::new(Some("Loss".to_owned()), vec![vec![cell("closeReason")]])
            .with_name("loss"),
        LayoutPanel::new(
            Some("Main".to_owned()),
            vec![
                vec![cell("ghost"), cell("amount")],
                vec![cell("name"), cell("closeReason"), cell("stage")],
            ],
        ),
    ]);
    let mut dynamic_state = EntityDynamicState::default();
    dynamic_state.panels.insert("loss".to_owned(), false);
    dynamic_state.fields.insert(
        "closeReason".to_owned(),
        DynamicFieldState {
            visible: false,
            ..DynamicFieldState::default()
        },
    );

    let plan = compose_detail(&DetailComposition {
        layout: &layout,
        fields: &fields,
        record: &json!({}),
        form_data: None,
        dynamic_state: &dynamic_state,
        field_permissions: &permissions,
    });

    assert_eq!(plan.panels.len(), 1);
    assert_eq!(plan.panels[0].label.as_deref(), Some("Main"));
    assert_eq!(plan.panels[0].rows.len(), 1);
    assert_eq!(cell_names(&plan.panels[0].rows[0].slots), vec!["name", "stage"]);
}

#[test]
fn cell_state_merges_metadata_overrides_dynamic_logic_and_acl() {
    let fields = opportunity_fields();
    let mut permissions = all_permissions(&fields);
    permissions.insert(
        "amount".to_owned(),
        FieldPermissions {
            read: true,
            edit: false,
        },
    );
    let layout = DetailLayout::new(vec![LayoutPanel::new(
        None,
        vec![
            vec![
                LayoutSlot::from(LayoutCell::new("name").with_custom_label("Deal")),
                cell("amount"),
            ],
            vec![
                cell("closeReason"),
                LayoutSlot::from(LayoutCell::new("stage").with_read_only(true).without_label()),
            ],
            vec![
                cell("number"),
                LayoutSlot::from(
                    LayoutCell::new("description").with_type_override(FieldType::ShortText),
                ),
            ],
        ],
    )]);
    let mut dynamic_state = EntityDynamicState::default();
    dynamic_state.fields.insert(
        "closeReason".to_owned(),
        DynamicFieldState {
            required: true,
            invalid: true,
            filtered_options: Some(vec!["Price".to_owned()]),
            ..DynamicFieldState::default()
        },
    );

    let plan = compose_detail(&DetailComposition {
        layout: &layout,
        fields: &fields,
        record: &json!({"name": "Saved", "amount": 100, "stage": "Prospecting"}),
        form_data: Some(&json!({"name": "Edited"})),
        dynamic_state: &dynamic_state,
        field_permissions: &permissions,
    });

    let cells: Vec<_> = plan.panels[0]
        .rows
        .iter()
        .flat_map(|row| row.slots.iter().filter_map(SlotPlan::cell))
        .collect();
    let [name, amount, close_reason, stage, number, description] = cells[..] else {
        unreachable!()
    };

    assert_eq!(name.label.as_deref(), Some("Deal"));
    assert!(name.required);
    assert!(!name.read_only);
    assert_eq!(name.value, json!("Edited"));

    assert!(amount.read_only);
    assert_eq!(amount.value, json!(100));

    assert!(close_reason.required);
    assert!(close_reason.invalid);
    assert_eq!(close_reason.options, Some(vec!["Price".to_owned()]));
    assert_eq!(close_reason.value, Value::Null);

    assert!(stage.read_only);
    assert!(!stage.show_label);
    assert_eq!(
        stage.options.as_ref().map(Vec::len),
        Some(3)
    );

    assert!(number.read_only);
    assert_eq!(description.field_type, FieldType::ShortText);
    assert_eq!(description.options, None);
}

#[test]
fn list_columns_keep_declared_widths_and_skip_hidden_ones() {
    let fields = opportunity_fields();
    let mut permissions = all_permissions(&fields);
    permissions.remove("description");
    let layout = ListLayout::new(vec![
        ListColumn::new("name").with_link().with_width(40.0),
        ListColumn::new("amount")
            .with_align(ColumnAlign::Right)
            .with_width_px(120.0)
            .not_sortable(),
        ListColumn::new("stage").with_hidden(true),
        ListColumn::new("ghost"),
        ListColumn::new("description"),
    ]);

    let plan = compose_list(&ListComposition {
        layout: &layout,
        fields: &fields,
        field_permissions: &permissions,
    });

    let names: Vec<&str> = plan.columns.iter().map(|column| column.name.as_str()).collect();
    assert_eq!(names, vec!["name", "amount"]);
    assert!(plan.columns[0].link);
    assert_eq!(plan.columns[0].width, Some(40.0));
    assert_eq!(plan.columns[1].align, Some(ColumnAlign::Right));
    assert_eq!(plan.columns[1].width_px, Some(120.0));
    assert!(!plan.columns[1].sortable);
    assert_eq!(plan.columns[1].field_type, FieldType::Decimal);
}

#[test]
fn detail_plan_serializes_slots_with_a_kind_tag() {
    let fields = FieldDefinitions::new()
        .with_field("name", FieldDefinition::new(FieldType::ShortText))
        .with_field("email", FieldDefinition::new(FieldType::Email))
        .with_field("phone", FieldDefinition::new(FieldType::Phone));
    let permissions = all_permissions(&fields);
    let layout = default_detail_layout(&fields);
    let dynamic_state = EntityDynamicState::default();

    let plan = compose_detail(&DetailComposition {
        layout: &layout,
        fields: &fields,
        record: &json!({"phone": "+33 1 23"}),
        form_data: None,
        dynamic_state: &dynamic_state,
        field_permissions: &permissions,
    });
    let serialized = serde_json::to_value(&plan).unwrap_or_default();

    let last_row = &serialized["panels"][0]["rows"][1];
    assert_eq!(last_row["arrangement"], json!("columns"));
    assert_eq!(last_row["slots"][0]["kind"], json!("field"));
    assert_eq!(last_row["slots"][0]["fieldType"], json!("phone"));
    assert_eq!(last_row["slots"][0]["value"], json!("+33 1 23"));
    assert_eq!(last_row["slots"][1], json!({"kind": "placeholder"}));
}
