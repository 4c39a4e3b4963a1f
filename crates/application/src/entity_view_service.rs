use std::sync::Arc;

use crmdesk_core::{AppError, AppResult};
use crmdesk_domain::{AclAction, DetailLayout, FieldDefinitions, ListLayout};
use serde_json::Value;
use tracing::debug;

use crate::layout_composer::{
    DetailComposition, DetailPlan, ListComposition, ListPlan, compose_detail, compose_list,
    default_detail_layout, default_list_layout,
};
use crate::schema_generator::{EntitySchemaOptions, ValidationOutcome, validate_entity_data};
use crate::view_ports::{EntityLayout, LayoutKind, MetadataSource};
use crate::{SessionSnapshot, evaluate_entity};


/// Application service turning a session snapshot and entity metadata into view plans.
#[derive(Clone)]
pub struct EntityViewService {
    metadata_source: Arc<dyn MetadataSource>,
}

impl EntityViewService {
    /// Creates a new view service from a metadata source.
    #[must_use]
    pub fn new(metadata_source: Arc<dyn MetadataSource>) -> Self {
        Self { metadata_source }
    }

    /// Builds the detail/edit plan of one record, overlaying unsaved form data.
    pub async fn detail_plan(
        &self,
        snapshot: &SessionSnapshot,
        entity_type: &str,
        record: &Value,
        form_data: Option<&Value>,
    ) -> AppResult<DetailPlan> {
        let fields = Self::readable_fields(snapshot, entity_type)?;
        let layout = self.detail_layout(entity_type, fields).await?;

        let data = merged_data(record, form_data);
        let dynamic_state = snapshot
            .metadata()
            .dynamic_logic(entity_type)
            .map(|logic| {
                evaluate_entity(
                    logic,
                    &data,
                    &snapshot.metadata().field_options(entity_type),
                )
            })
            .unwrap_or_default();
        let field_permissions = snapshot
            .acl_resolver()
            .field_permissions(entity_type, fields.iter().map(|(name, _)| name));

        Ok(compose_detail(&DetailComposition {
            layout: &layout,
            fields,
            record,
            form_data,
            dynamic_state: &dynamic_state,
            field_permissions: &field_permissions,
        }))
    }

    /// Builds the list plan of an entity type.
    pub async fn list_plan(
        &self,
        snapshot: &SessionSnapshot,
        entity_type: &str,
    ) -> AppResult<ListPlan> {
        let fields = Self::readable_fields(snapshot, entity_type)?;
        let layout = self.list_layout(entity_type, fields).await?;
        let field_permissions = snapshot
            .acl_resolver()
            .field_permissions(entity_type, fields.iter().map(|(name, _)| name));

        Ok(compose_list(&ListComposition {
            layout: &layout,
            fields,
            field_permissions: &field_permissions,
        }))
    }

    /// Validates a record payload against the entity's schema.
    ///
    /// The session must be able to create or edit records of the entity type.
    pub fn validate(
        &self,
        snapshot: &SessionSnapshot,
        entity_type: &str,
        data: &Value,
        options: &EntitySchemaOptions,
    ) -> AppResult<ValidationOutcome> {
        let fields = Self::readable_fields(snapshot, entity_type)?;
        let resolver = snapshot.acl_resolver();
        if !resolver.check_scope(entity_type, AclAction::Create)
            && !resolver.check_scope(entity_type, AclAction::Edit)
        {
            return Err(AppError::Forbidden(format!(
                "user '{}' cannot create or edit '{entity_type}' records",
                snapshot.user().user_name()
            )));
        }

        Ok(validate_entity_data(fields, data, options))
    }

    fn readable_fields<'s>(
        snapshot: &'s SessionSnapshot,
        entity_type: &str,
    ) -> AppResult<&'s FieldDefinitions> {
        if !snapshot
            .acl_resolver()
            .check_scope(entity_type, AclAction::Read)
        {
            return Err(AppError::Forbidden(format!(
                "user '{}' cannot read '{entity_type}' records",
                snapshot.user().user_name()
            )));
        }

        snapshot.metadata().require_fields(entity_type)
    }

    async fn detail_layout(
        &self,
        entity_type: &str,
        fields: &FieldDefinitions,
    ) -> AppResult<DetailLayout> {
        match self
            .metadata_source
            .fetch_layout(entity_type, LayoutKind::Detail)
            .await?
        {
            Some(EntityLayout::Detail(layout)) => Ok(layout),
            Some(other) => Err(mismatched_layout(entity_type, LayoutKind::Detail, &other)),
            None => {
                debug!(entity_type, "no detail layout declared");
                Ok(default_detail_layout(fields))
            }
        }
    }

    async fn list_layout(
        &self,
        entity_type: &str,
        fields: &FieldDefinitions,
    ) -> AppResult<ListLayout> {
        match self
            .metadata_source
            .fetch_layout(entity_type, LayoutKind::List)
            .await?
        {
            Some(EntityLayout::List(layout)) => Ok(layout),
            Some(other) => Err(mismatched_layout(entity_type, LayoutKind::List, &other)),
            None => {
                debug!(entity_type, "no list layout declared");
                Ok(default_list_layout(fields))
            }
        }
    }
}

fn mismatched_layout(entity_type: &str, expected: LayoutKind, actual: &EntityLayout) -> AppError {
    AppError::Internal(format!(
        "metadata source returned a {} layout for the {} layout of '{entity_type}'",
        actual.kind().as_str(),
        expected.as_str()
    ))
}

/// Overlays form values on the record for dynamic-logic evaluation.
fn merged_data(record: &Value, form_data: Option<&Value>) -> Value {
    let mut merged = record.as_object().cloned().unwrap_or_default();
    if let Some(form) = form_data.and_then(Value::as_object) {
        for (key, value) in form {
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}
