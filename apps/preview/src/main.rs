//! CRM entity view preview composition root.

#![forbid(unsafe_code)]

mod dto;
mod preview_config;

use std::path::Path;
use std::sync::Arc;

use crmdesk_application::{EntitySchemaOptions, EntityViewService, SessionService, SessionSnapshot};
use crmdesk_core::{AppError, AppResult};
use crmdesk_infrastructure::{JsonDirectorySource, read_json_file};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dto::{
    DetailPlanResponse, ListPlanResponse, PreviewResponse, ValidationReportResponse,
};
use crate::preview_config::{PreviewConfig, PreviewMode};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PreviewConfig::load()?;
    let source = Arc::new(JsonDirectorySource::new(config.snapshot_dir.clone()));
    let session_service = SessionService::new(source.clone(), source.clone());
    let view_service = EntityViewService::new(source);

    let snapshot = session_service.load_snapshot().await?;
    info!(
        entity_type = %config.entity_type,
        mode = config.mode.as_str(),
        snapshot_dir = %config.snapshot_dir.display(),
        "rendering preview"
    );

    let response = render(&config, &snapshot, &view_service).await?;
    let output = serde_json::to_string_pretty(&response)
        .map_err(|error| AppError::Internal(format!("failed to serialize preview: {error}")))?;
    println!("{output}");

    Ok(())
}

async fn render(
    config: &PreviewConfig,
    snapshot: &SessionSnapshot,
    view_service: &EntityViewService,
) -> AppResult<PreviewResponse> {
    let entity_type = config.entity_type.as_str();
    let record = match &config.record_path {
        Some(path) => read_object(path).await?,
        None => Value::Object(Map::new()),
    };
    let form = match &config.form_path {
        Some(path) => Some(read_object(path).await?),
        None => None,
    };

    let response = match config.mode {
        PreviewMode::Detail => {
            let plan = view_service
                .detail_plan(snapshot, entity_type, &record, form.as_ref())
                .await?;
            PreviewResponse::Detail(DetailPlanResponse::from_plan(entity_type, plan))
        }
        PreviewMode::List => {
            let plan = view_service.list_plan(snapshot, entity_type).await?;
            PreviewResponse::List(ListPlanResponse::from_plan(entity_type, plan))
        }
        PreviewMode::Validate => {
            let payload = form.as_ref().unwrap_or(&record);
            let outcome = view_service.validate(
                snapshot,
                entity_type,
                payload,
                &EntitySchemaOptions::default(),
            )?;
            PreviewResponse::Validate(ValidationReportResponse::from_outcome(
                entity_type,
                outcome,
            ))
        }
    };

    Ok(response)
}

async fn read_object(path: &Path) -> AppResult<Value> {
    let value: Value = read_json_file(path).await?;
    if !value.is_object() {
        return Err(AppError::Validation(format!(
            "'{}' must contain a JSON object",
            path.display()
        )));
    }

    Ok(value)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
