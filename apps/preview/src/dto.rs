use std::collections::BTreeMap;

use crmdesk_application::{
    CellPlan, ColumnPlan, DetailPlan, ListPlan, PanelPlan, RowArrangement, RowPlan, SlotPlan,
    ValidationOutcome,
};
use crmdesk_domain::ColumnAlign;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

/// Rendered preview, tagged by mode.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "snake_case", tag = "mode")]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/preview-response.ts"
)]
pub enum PreviewResponse {
    Detail(DetailPlanResponse),
    List(ListPlanResponse),
    Validate(ValidationReportResponse),
}

/// Detail/edit view of one record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/detail-plan-response.ts"
)]
pub struct DetailPlanResponse {
    pub entity_type: String,
    pub panels: Vec<PanelResponse>,
}

impl DetailPlanResponse {
    pub fn from_plan(entity_type: &str, plan: DetailPlan) -> Self {
        Self {
            entity_type: entity_type.to_owned(),
            panels: plan.panels.into_iter().map(PanelResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/panel-response.ts"
)]
pub struct PanelResponse {
    pub name: Option<String>,
    pub label: Option<String>,
    pub style: String,
    pub rows: Vec<RowResponse>,
}

impl From<PanelPlan> for PanelResponse {
    fn from(value: PanelPlan) -> Self {
        Self {
            name: value.name,
            label: value.label,
            style: value.style,
            rows: value.rows.into_iter().map(RowResponse::from).collect(),
        }
    }
}

/// One layout row; `null` cells are placeholders.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/row-response.ts"
)]
pub struct RowResponse {
    pub arrangement: String,
    pub cells: Vec<Option<CellResponse>>,
}

impl From<RowPlan> for RowResponse {
    fn from(value: RowPlan) -> Self {
        let arrangement = match value.arrangement {
            RowArrangement::Stacked => "stacked",
            RowArrangement::Columns => "columns",
        };

        Self {
            arrangement: arrangement.to_owned(),
            cells: value
                .slots
                .into_iter()
                .map(|slot| match slot {
                    SlotPlan::Field(cell) => Some(CellResponse::from(cell)),
                    SlotPlan::Placeholder => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/cell-response.ts"
)]
pub struct CellResponse {
    pub name: String,
    pub field_type: String,
    pub label: Option<String>,
    pub show_label: bool,
    pub full_width: bool,
    pub required: bool,
    pub read_only: bool,
    pub invalid: bool,
    pub options: Option<Vec<String>>,
    #[ts(type = "unknown")]
    pub value: Value,
}

impl From<CellPlan> for CellResponse {
    fn from(value: CellPlan) -> Self {
        Self {
            name: value.name,
            field_type: String::from(value.field_type),
            label: value.label,
            show_label: value.show_label,
            full_width: value.full_width,
            required: value.required,
            read_only: value.read_only,
            invalid: value.invalid,
            options: value.options,
            value: value.value,
        }
    }
}

/// List columns of an entity type.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/list-plan-response.ts"
)]
pub struct ListPlanResponse {
    pub entity_type: String,
    pub columns: Vec<ColumnResponse>,
}

impl ListPlanResponse {
    pub fn from_plan(entity_type: &str, plan: ListPlan) -> Self {
        Self {
            entity_type: entity_type.to_owned(),
            columns: plan.columns.into_iter().map(ColumnResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/column-response.ts"
)]
pub struct ColumnResponse {
    pub name: String,
    pub field_type: String,
    pub label: Option<String>,
    pub width: Option<f64>,
    pub width_px: Option<f64>,
    pub align: Option<String>,
    pub link: bool,
    pub sortable: bool,
}

impl From<ColumnPlan> for ColumnResponse {
    fn from(value: ColumnPlan) -> Self {
        Self {
            name: value.name,
            field_type: String::from(value.field_type),
            label: value.label,
            width: value.width,
            width_px: value.width_px,
            align: value.align.map(|align| {
                match align {
                    ColumnAlign::Left => "left",
                    ColumnAlign::Right => "right",
                }
                .to_owned()
            }),
            link: value.link,
            sortable: value.sortable,
        }
    }
}

/// Validation result; `errors` is empty on success.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/view-types/src/generated/validation-report-response.ts"
)]
pub struct ValidationReportResponse {
    pub entity_type: String,
    pub success: bool,
    #[ts(type = "Record<string, unknown> | null")]
    pub data: Option<Value>,
    pub errors: BTreeMap<String, String>,
}

impl ValidationReportResponse {
    pub fn from_outcome(entity_type: &str, outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Success { data } => Self {
                entity_type: entity_type.to_owned(),
                success: true,
                data: Some(Value::Object(data)),
                errors: BTreeMap::new(),
            },
            ValidationOutcome::Failure { errors } => Self {
                entity_type: entity_type.to_owned(),
                success: false,
                data: None,
                errors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crmdesk_application::{
        CellPlan, DetailPlan, PanelPlan, RowArrangement, RowPlan, SlotPlan, ValidationOutcome,
    };
    use crmdesk_domain::FieldType;
    use serde_json::json;
    use ts_rs::{Config, TS};

    use super::{
        CellResponse, ColumnResponse, DetailPlanResponse, ListPlanResponse, PanelResponse,
        PreviewResponse, RowResponse, ValidationReportResponse,
    };

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        PreviewResponse::export(&config)?;
        DetailPlanResponse::export(&config)?;
        PanelResponse::export(&config)?;
        RowResponse::export(&config)?;
        CellResponse::export(&config)?;
        ListPlanResponse::export(&config)?;
        ColumnResponse::export(&config)?;
        ValidationReportResponse::export(&config)?;

        Ok(())
    }

    #[test]
    fn placeholders_become_null_cells() {
        let plan = DetailPlan {
            panels: vec![PanelPlan {
                name: None,
                label: Some("Overview".to_owned()),
                style: "default".to_owned(),
                rows: vec![RowPlan {
                    arrangement: RowArrangement::Columns,
                    slots: vec![
                        SlotPlan::Field(CellPlan {
                            name: "website".to_owned(),
                            field_type: FieldType::Url,
                            label: None,
                            show_label: true,
                            full_width: false,
                            required: false,
                            read_only: true,
                            invalid: false,
                            options: None,
                            value: json!("https://example.com"),
                        }),
                        SlotPlan::Placeholder,
                    ],
                }],
            }],
        };

        let response = PreviewResponse::Detail(DetailPlanResponse::from_plan("Account", plan));
        let payload = serde_json::to_value(&response).unwrap_or_default();

        assert_eq!(payload["mode"], "detail");
        assert_eq!(payload["entity_type"], "Account");
        let cells = &payload["panels"][0]["rows"][0]["cells"];
        assert_eq!(cells[0]["field_type"], "url");
        assert_eq!(cells[0]["read_only"], true);
        assert!(cells[1].is_null());
    }

    #[test]
    fn failed_validation_reports_errors_without_data() {
        let mut errors = BTreeMap::new();
        errors.insert("name".to_owned(), "name is required".to_owned());

        let report = ValidationReportResponse::from_outcome(
            "Lead",
            ValidationOutcome::Failure { errors },
        );

        assert!(!report.success);
        assert!(report.data.is_none());
        assert_eq!(
            report.errors.get("name").map(String::as_str),
            Some("name is required")
        );
    }
}
